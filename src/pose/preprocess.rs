use anyhow::Result;
use ndarray::Array4;
use opencv::{
    core::{AlgorithmHint, Mat, Size},
    imgproc,
    prelude::*,
};

/// MoveNet SinglePose Lightning の入力サイズ
pub const MODEL_INPUT_SIZE: i32 = 192;

/// BGRフレームを MoveNet の入力テンソル [1, 192, 192, 3] に変換する
///
/// 値域は 0.0〜255.0 のまま（モデル側が正規化を内包している）
pub fn to_model_input(frame: &Mat) -> Result<Array4<f32>> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(
        frame,
        &mut rgb,
        imgproc::COLOR_BGR2RGB,
        0,
        AlgorithmHint::ALGO_HINT_DEFAULT,
    )?;

    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let size = MODEL_INPUT_SIZE as usize;
    let mut input = Array4::<f32>::zeros((1, size, size, 3));
    for y in 0..MODEL_INPUT_SIZE {
        for x in 0..MODEL_INPUT_SIZE {
            let pixel = resized.at_2d::<opencv::core::Vec3b>(y, x)?;
            for channel in 0..3 {
                input[[0, y as usize, x as usize, channel]] = pixel[channel] as f32;
            }
        }
    }

    Ok(input)
}
