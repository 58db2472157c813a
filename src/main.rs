use anyhow::Result;
use std::time::{Duration, Instant};

use shisei_monitor::alert::AlertSound;
use shisei_monitor::camera::Camera;
use shisei_monitor::config::Config;
use shisei_monitor::pose::{to_model_input, PoseDetector};
use shisei_monitor::posture::{Assessment, PostureEvaluator};
use shisei_monitor::render::{overlay, DisplayWindow};

const CONFIG_PATH: &str = "config.toml";

/// これだけ連続でフレームが取れなければカメラ喪失とみなす
const MAX_CONSECUTIVE_DROPS: u32 = 90;

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Shisei Monitor ===");
    println!("Camera index: {}", config.camera.index);
    println!("Calibration: {} samples, mode={}",
        config.calibration.window_size, config.calibration.threshold_mode);
    println!("Alert cooldown: {}s", config.alert.cooldown_secs);
    println!();
    println!("キャリブレーション中は良い姿勢で座ってください");
    println!("操作: [Esc]/[Q] 終了");
    println!();

    // アラート音はメインループより先に検証する
    let mut alert = AlertSound::load(&config.alert.sound_path)?;

    let mut camera = Camera::open(config.camera.index, config.camera.width, config.camera.height)?;
    let (width, height) = camera.resolution();
    println!("Camera: {}x{}", width, height);

    let mut detector = PoseDetector::new(&config.detector.model_path)?;
    println!("Model loaded: {}", config.detector.model_path);

    let mut evaluator = PostureEvaluator::from_config(&config)?;
    let mut window = DisplayWindow::new("Shisei Monitor", width as usize, height as usize)?;

    let frame_duration = Duration::from_secs_f64(1.0 / config.app.target_fps as f64);
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut consecutive_drops = 0u32;

    while window.is_open() {
        let loop_start = Instant::now();

        let mut frame = match camera.read_frame() {
            Ok(Some(f)) => {
                consecutive_drops = 0;
                f
            }
            result => {
                if let Err(e) = result {
                    eprintln!("Frame capture error: {}", e);
                }
                consecutive_drops += 1;
                if consecutive_drops >= MAX_CONSECUTIVE_DROPS {
                    eprintln!("Camera stream ended");
                    break;
                }
                std::thread::sleep(Duration::from_millis(10));
                continue;
            }
        };

        // 推論失敗はそのフレームを捨てて継続する
        let pose = match to_model_input(&frame).and_then(|input| detector.detect(input)) {
            Ok(pose) => pose,
            Err(e) => {
                eprintln!("Inference error: {:#}", e);
                continue;
            }
        };

        let assessment = evaluator.assess(&pose, Instant::now());

        overlay::draw_status(&mut frame, &assessment)?;
        window.draw_frame(&frame)?;
        window.draw_pose(&pose, config.posture.visibility_threshold);
        window.update()?;

        if let Assessment::Evaluated {
            alert_fired: true, ..
        } = assessment
        {
            alert.play();
        }

        // FPS計測
        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            println!("FPS: {:.1}", frame_count as f32 / elapsed);
            frame_count = 0;
            fps_timer = Instant::now();
        }

        let spent = loop_start.elapsed();
        if spent < frame_duration {
            std::thread::sleep(frame_duration - spent);
        }
    }

    println!("Shutting down...");
    Ok(())
}
