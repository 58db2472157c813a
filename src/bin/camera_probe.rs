use opencv::core::Mat;
use opencv::imgcodecs;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture, VideoCaptureAPIs};

/// 接続されているカメラを列挙し、config.toml の [camera] index を選ぶための情報を出す
fn main() {
    println!("=== カメラプローブ ===");
    println!();

    for index in 0..5 {
        print!("index {}: ", index);
        let mut cap = match VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32) {
            Ok(c) => c,
            Err(_) => {
                println!("open failed");
                break;
            }
        };
        if !cap.is_opened().unwrap_or(false) {
            println!("not available");
            break;
        }

        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap_or(0.0);
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0);
        let fps = cap.get(videoio::CAP_PROP_FPS).unwrap_or(0.0);
        let backend = cap.get_backend_name().unwrap_or_default();
        println!("{}x{} fps={} backend={}", width, height, fps, backend);

        let mut frame = Mat::default();
        match cap.read(&mut frame) {
            Ok(true) if !frame.empty() => {
                let filename = format!("probe_cam{}.png", index);
                match imgcodecs::imwrite(&filename, &frame, &opencv::core::Vector::new()) {
                    Ok(_) => println!("       saved: {}", filename),
                    Err(e) => println!("       save err: {}", e),
                }
            }
            Ok(_) => println!("       frame: EMPTY"),
            Err(e) => println!("       frame err: {}", e),
        }
        println!();
    }
}
