use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs;
use std::io::Cursor;

/// 起動時に読み込むアラート音
///
/// 音声ファイルが無い・壊れている場合は起動時に失敗させる。
/// 一方で出力デバイスの問題は致命傷にしない: 警告を1回出して
/// 以後のアラートは無音になる（画面上の表示が主で、音は従）
pub struct AlertSound {
    data: Vec<u8>,
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl AlertSound {
    pub fn load(path: &str) -> Result<Self> {
        let data =
            fs::read(path).with_context(|| format!("Failed to read alert sound: {}", path))?;
        Decoder::new(Cursor::new(data.clone()))
            .with_context(|| format!("Alert sound is not decodable audio: {}", path))?;

        let output = match OutputStream::try_default() {
            Ok(pair) => Some(pair),
            Err(e) => {
                eprintln!("Audio output unavailable, alerts will be silent: {}", e);
                None
            }
        };

        Ok(Self { data, output })
    }

    /// 発火して戻る（再生完了は待たない）
    pub fn play(&mut self) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        if let Err(e) = Self::dispatch(handle, self.data.clone()) {
            eprintln!("Audio playback failed, alerts will be silent: {}", e);
            self.output = None;
        }
    }

    fn dispatch(handle: &OutputStreamHandle, data: Vec<u8>) -> Result<()> {
        let source = Decoder::new(Cursor::new(data))?;
        let sink = Sink::try_new(handle)?;
        sink.append(source);
        sink.detach();
        Ok(())
    }
}
