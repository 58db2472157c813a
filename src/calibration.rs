use anyhow::{bail, Result};

use crate::config::CalibrationConfig;

/// 閾値の算出方式
///
/// FixedOffset は平均から固定の度数だけ離す。StdDevMultiple は
/// サンプルのばらつきに応じて離す（揺れの大きい人ほど閾値が緩くなる）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdRule {
    FixedOffset(f32),
    StdDevMultiple(f32),
}

impl ThresholdRule {
    /// 設定から算出方式を選ぶ
    pub fn from_config(config: &CalibrationConfig) -> Result<Self> {
        match config.threshold_mode.as_str() {
            "offset" => Ok(ThresholdRule::FixedOffset(config.offset_degrees)),
            "stddev" => Ok(ThresholdRule::StdDevMultiple(config.stddev_multiple)),
            other => bail!("Unknown threshold_mode: {} (expected \"stddev\" or \"offset\")", other),
        }
    }
}

/// 指標の劣化方向
///
/// 猫背で角度が下がる指標は LowerIsWorse、肩の非対称など
/// 上がるほど悪い指標は HigherIsWorse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricDirection {
    HigherIsWorse,
    LowerIsWorse,
}

/// キャリブレーションエンジンの状態。Ready への遷移は一方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    Collecting,
    Ready,
}

/// 1指標ぶんのキャリブレーションエンジン
///
/// 固定長ウィンドウに角度サンプルを集め、満了時に個人別の閾値を
/// 1回だけ導出する。Ready 後の再キャリブレーションはプロセス再起動のみ
pub struct CalibrationEngine {
    capacity: usize,
    direction: MetricDirection,
    rule: ThresholdRule,
    window: Vec<f32>,
    threshold: Option<f32>,
}

impl CalibrationEngine {
    pub fn new(capacity: usize, direction: MetricDirection, rule: ThresholdRule) -> Self {
        Self {
            capacity,
            direction,
            rule,
            window: Vec::with_capacity(capacity),
            threshold: None,
        }
    }

    pub fn state(&self) -> CalibrationState {
        if self.threshold.is_some() {
            CalibrationState::Ready
        } else {
            CalibrationState::Collecting
        }
    }

    /// 閾値。Ready になるまでは None
    pub fn threshold(&self) -> Option<f32> {
        self.threshold
    }

    /// 収集済みサンプル数と必要サンプル数
    pub fn progress(&self) -> (usize, usize) {
        (self.window.len(), self.capacity)
    }

    /// Collecting 中のみサンプルを取り込む。ウィンドウ満了時に閾値を確定する
    pub fn feed(&mut self, sample: f32) {
        if self.threshold.is_some() {
            return;
        }
        self.window.push(sample);
        if self.window.len() >= self.capacity {
            self.threshold = Some(self.derive_threshold());
        }
    }

    /// Ready なら角度を判定する。true = 姿勢不良
    pub fn is_poor(&self, angle: f32) -> Option<bool> {
        self.threshold.map(|threshold| match self.direction {
            MetricDirection::HigherIsWorse => angle > threshold,
            MetricDirection::LowerIsWorse => angle < threshold,
        })
    }

    fn derive_threshold(&self) -> f32 {
        let mean = mean(&self.window);
        let severity = match self.rule {
            ThresholdRule::FixedOffset(degrees) => degrees,
            ThresholdRule::StdDevMultiple(k) => k * std_dev(&self.window),
        };
        match self.direction {
            MetricDirection::HigherIsWorse => mean + severity,
            MetricDirection::LowerIsWorse => mean - severity,
        }
    }
}

fn mean(samples: &[f32]) -> f32 {
    samples.iter().sum::<f32>() / samples.len() as f32
}

/// 母標準偏差（除数 n）
fn std_dev(samples: &[f32]) -> f32 {
    let m = mean(samples);
    let variance = samples.iter().map(|s| (s - m) * (s - m)).sum::<f32>() / samples.len() as f32;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_engine(capacity: usize) -> CalibrationEngine {
        CalibrationEngine::new(
            capacity,
            MetricDirection::LowerIsWorse,
            ThresholdRule::FixedOffset(5.0),
        )
    }

    #[test]
    fn test_collecting_until_window_full() {
        let mut engine = offset_engine(30);
        for i in 0..29 {
            engine.feed(170.0);
            assert_eq!(engine.state(), CalibrationState::Collecting, "sample {}", i);
            assert_eq!(engine.threshold(), None);
        }
        assert_eq!(engine.progress(), (29, 30));

        // 30個目で Ready へ遷移する
        engine.feed(170.0);
        assert_eq!(engine.state(), CalibrationState::Ready);
        assert!(engine.threshold().is_some());
    }

    #[test]
    fn test_ready_is_terminal() {
        let mut engine = offset_engine(5);
        for _ in 0..5 {
            engine.feed(160.0);
        }
        let threshold = engine.threshold().unwrap();

        // Ready 後のサンプルはウィンドウにも閾値にも影響しない
        engine.feed(10.0);
        engine.feed(10.0);
        assert_eq!(engine.progress(), (5, 5));
        assert_eq!(engine.threshold(), Some(threshold));
    }

    #[test]
    fn test_fixed_offset_threshold() {
        let mut engine = offset_engine(4);
        for sample in [168.0, 172.0, 170.0, 170.0] {
            engine.feed(sample);
        }
        // mean = 170, lower-is-worse → 170 - 5
        let threshold = engine.threshold().unwrap();
        assert!((threshold - 165.0).abs() < 1e-4);
    }

    #[test]
    fn test_stddev_threshold() {
        let mut engine = CalibrationEngine::new(
            4,
            MetricDirection::LowerIsWorse,
            ThresholdRule::StdDevMultiple(1.5),
        );
        for sample in [168.0, 172.0, 168.0, 172.0] {
            engine.feed(sample);
        }
        // mean = 170, 母標準偏差 = 2 → 170 - 1.5*2 = 167
        let threshold = engine.threshold().unwrap();
        assert!((threshold - 167.0).abs() < 1e-4);
    }

    #[test]
    fn test_higher_is_worse_direction() {
        let mut engine = CalibrationEngine::new(
            3,
            MetricDirection::HigherIsWorse,
            ThresholdRule::FixedOffset(5.0),
        );
        for sample in [10.0, 12.0, 14.0] {
            engine.feed(sample);
        }
        // mean = 12 → threshold = 17、超えたら不良
        assert_eq!(engine.is_poor(18.0), Some(true));
        assert_eq!(engine.is_poor(16.0), Some(false));
    }

    #[test]
    fn test_lower_is_worse_evaluation() {
        let mut engine = offset_engine(2);
        assert_eq!(engine.is_poor(100.0), None);

        engine.feed(170.0);
        engine.feed(170.0);
        // threshold = 165
        assert_eq!(engine.is_poor(150.0), Some(true));
        assert_eq!(engine.is_poor(172.0), Some(false));
        assert_eq!(engine.is_poor(165.0), Some(false));
    }

    #[test]
    fn test_threshold_is_deterministic() {
        let samples: Vec<f32> = (0..30).map(|i| 165.0 + (i % 7) as f32).collect();

        let run = |samples: &[f32]| {
            let mut engine = CalibrationEngine::new(
                30,
                MetricDirection::LowerIsWorse,
                ThresholdRule::StdDevMultiple(1.5),
            );
            for &s in samples {
                engine.feed(s);
            }
            engine.threshold().unwrap()
        };

        assert_eq!(run(&samples), run(&samples));
    }

    #[test]
    fn test_rule_from_config() {
        let mut config = CalibrationConfig::default();
        assert_eq!(
            ThresholdRule::from_config(&config).unwrap(),
            ThresholdRule::StdDevMultiple(1.5)
        );

        config.threshold_mode = "offset".to_string();
        assert_eq!(
            ThresholdRule::from_config(&config).unwrap(),
            ThresholdRule::FixedOffset(5.0)
        );

        config.threshold_mode = "adaptive".to_string();
        assert!(ThresholdRule::from_config(&config).is_err());
    }
}
