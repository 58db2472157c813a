use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::landmark::{BodyPose, Landmark, LandmarkId};

/// MoveNet SinglePose Lightning による姿勢推定器
pub struct PoseDetector {
    session: Session,
}

impl PoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .with_context(|| {
                format!("Failed to load ONNX model: {}", model_path.as_ref().display())
            })?;

        Ok(Self { session })
    }

    /// 前処理済みテンソル [1, 192, 192, 3] から全身ランドマークを推定する
    ///
    /// MoveNet の出力は [1, 1, 17, 3] で、各行が (y, x, score)
    pub fn detect(&mut self, input: Array4<f32>) -> Result<BodyPose> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])
            .context("Pose inference failed")?;

        let output: ndarray::ArrayViewD<f32> = outputs["StatefulPartitionedCall_0"]
            .try_extract_array()
            .context("Failed to extract output tensor")?;

        let mut landmarks = [Landmark::default(); LandmarkId::COUNT];
        for (i, landmark) in landmarks.iter_mut().enumerate() {
            let y = output[[0, 0, i, 0]];
            let x = output[[0, 0, i, 1]];
            let score = output[[0, 0, i, 2]];
            *landmark = Landmark::new(x, y, score);
        }

        Ok(BodyPose::new(landmarks))
    }
}
