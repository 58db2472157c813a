use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub posture: PostureConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub alert: AlertConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラデバイス番号 (camera_probe で確認できる)
    #[serde(default = "default_camera_index")]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// メインループの目標FPS
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// MoveNet ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostureConfig {
    /// 視点判定に使う可視度の閾値
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
    /// 平均可視度がこれ未満なら「人物なし」とみなす
    #[serde(default = "default_presence_threshold")]
    pub presence_threshold: f32,
    /// 角度サンプルのEMA係数 (1.0 = 平滑化なし)
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalibrationConfig {
    /// キャリブレーションに使うサンプル数
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// 閾値の算出方式: "stddev" | "offset"
    #[serde(default = "default_threshold_mode")]
    pub threshold_mode: String,
    /// "stddev" 方式の標準偏差係数
    #[serde(default = "default_stddev_multiple")]
    pub stddev_multiple: f32,
    /// "offset" 方式の固定オフセット（度）
    #[serde(default = "default_offset_degrees")]
    pub offset_degrees: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// アラート音声ファイルのパス
    #[serde(default = "default_sound_path")]
    pub sound_path: String,
    /// アラートの再発火を抑制する秒数
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: f32,
}

fn default_camera_index() -> i32 { 0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_target_fps() -> u32 { 30 }
fn default_model_path() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_visibility_threshold() -> f32 { 0.5 }
fn default_presence_threshold() -> f32 { 0.2 }
fn default_smoothing_alpha() -> f32 { 0.6 }
fn default_window_size() -> usize { 30 }
fn default_threshold_mode() -> String { "stddev".to_string() }
fn default_stddev_multiple() -> f32 { 1.5 }
fn default_offset_degrees() -> f32 { 5.0 }
fn default_sound_path() -> String { "assets/alert.wav".to_string() }
fn default_cooldown_secs() -> f32 { 5.0 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_camera_width(),
            height: default_camera_height(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
        }
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility_threshold(),
            presence_threshold: default_presence_threshold(),
            smoothing_alpha: default_smoothing_alpha(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            threshold_mode: default_threshold_mode(),
            stddev_multiple: default_stddev_multiple(),
            offset_degrees: default_offset_degrees(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sound_path: default_sound_path(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 読み込みに失敗したらデフォルト設定で続行する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Config not loaded ({}), using defaults: {}",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.camera.index, 0);
        assert_eq!(config.calibration.window_size, 30);
        assert_eq!(config.calibration.threshold_mode, "stddev");
        assert_eq!(config.alert.cooldown_secs, 5.0);
        assert_eq!(config.posture.visibility_threshold, 0.5);
    }

    #[test]
    fn test_parse_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.app.target_fps, 30);
        assert_eq!(config.detector.model_path, "models/movenet_lightning.onnx");
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [calibration]
            threshold_mode = "offset"
            offset_degrees = 8.0

            [camera]
            index = 2
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.calibration.threshold_mode, "offset");
        assert_eq!(config.calibration.offset_degrees, 8.0);
        // 省略したフィールドはデフォルト
        assert_eq!(config.calibration.window_size, 30);
        assert_eq!(config.camera.index, 2);
        assert_eq!(config.camera.width, 640);
    }
}
