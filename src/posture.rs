use anyhow::Result;
use std::time::{Duration, Instant};

use crate::calibration::{CalibrationEngine, MetricDirection, ThresholdRule};
use crate::config::Config;
use crate::geometry::angle_at;
use crate::pose::{BodyPose, LandmarkId};
use crate::smooth::AngleSmoother;
use crate::view::{classify_view, ViewOrientation};

/// 追跡する姿勢指標
///
/// どちらも耳-肩-腰の3点がなす角度で、直立時は 180度 近く、
/// 前屈・猫背で小さくなる。正面視点では肩指標、側面視点では首指標を使う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Shoulder,
    Neck,
}

impl MetricKind {
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Shoulder => "shoulder",
            MetricKind::Neck => "neck",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Poor,
}

/// 1フレームぶんの評価結果
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// 被写体が検出できない
    NoSubject,
    /// 視点または可視度が足りず評価できない
    InsufficientView { view: ViewOrientation },
    /// ベースライン収集中
    Calibrating {
        metric: MetricKind,
        angle: f32,
        done: usize,
        total: usize,
    },
    /// 判定済み
    Evaluated {
        metric: MetricKind,
        verdict: Verdict,
        angle: f32,
        threshold: f32,
        alert_fired: bool,
    },
}

/// アラートの再発火をクールダウンで抑制する
pub struct AlertPolicy {
    cooldown: Duration,
    last_fired: Option<Instant>,
}

impl AlertPolicy {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: None,
        }
    }

    /// 姿勢不良フレームで呼ぶ。発火する場合のみ last_fired を更新して true
    ///
    /// Good 側からは呼ばれないため、一度発火したクールダウンは
    /// Poor→Good→Poor と揺れても途中でリセットされない
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_fired {
            if now.duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }
}

#[derive(Debug, Clone, Copy)]
enum BodySide {
    Left,
    Right,
}

impl BodySide {
    fn triple(self) -> (LandmarkId, LandmarkId, LandmarkId) {
        match self {
            BodySide::Left => (
                LandmarkId::LeftEar,
                LandmarkId::LeftShoulder,
                LandmarkId::LeftHip,
            ),
            BodySide::Right => (
                LandmarkId::RightEar,
                LandmarkId::RightShoulder,
                LandmarkId::RightHip,
            ),
        }
    }
}

/// 視点に応じた指標を選び、キャリブレーション済みベースラインと
/// 比較して毎フレームの判定を下す
pub struct PostureEvaluator {
    visibility_floor: f32,
    presence_floor: f32,
    shoulder: CalibrationEngine,
    neck: CalibrationEngine,
    shoulder_smoother: AngleSmoother,
    neck_smoother: AngleSmoother,
    alert: AlertPolicy,
}

impl PostureEvaluator {
    pub fn from_config(config: &Config) -> Result<Self> {
        let rule = ThresholdRule::from_config(&config.calibration)?;
        let window = config.calibration.window_size;
        let alpha = config.posture.smoothing_alpha;

        Ok(Self {
            visibility_floor: config.posture.visibility_threshold,
            presence_floor: config.posture.presence_threshold,
            shoulder: CalibrationEngine::new(window, MetricDirection::LowerIsWorse, rule),
            neck: CalibrationEngine::new(window, MetricDirection::LowerIsWorse, rule),
            shoulder_smoother: AngleSmoother::new(alpha),
            neck_smoother: AngleSmoother::new(alpha),
            alert: AlertPolicy::new(Duration::from_secs_f32(config.alert.cooldown_secs)),
        })
    }

    /// 1フレーム評価する。now はアラートのクールダウン判定に使う
    pub fn assess(&mut self, pose: &BodyPose, now: Instant) -> Assessment {
        if pose.mean_visibility() < self.presence_floor {
            self.shoulder_smoother.reset();
            self.neck_smoother.reset();
            return Assessment::NoSubject;
        }

        let view = classify_view(pose, self.visibility_floor);
        let selected = match view {
            ViewOrientation::Front => self.front_triple(pose).map(|p| (MetricKind::Shoulder, p)),
            ViewOrientation::LeftSide => self
                .usable_triple(pose, BodySide::Left)
                .map(|p| (MetricKind::Neck, p)),
            ViewOrientation::RightSide => self
                .usable_triple(pose, BodySide::Right)
                .map(|p| (MetricKind::Neck, p)),
            ViewOrientation::Back | ViewOrientation::Unknown => None,
        };
        let Some((metric, [ear, shoulder, hip])) = selected else {
            return Assessment::InsufficientView { view };
        };

        let raw = angle_at(ear, shoulder, hip);
        let angle = match metric {
            MetricKind::Shoulder => self.shoulder_smoother.apply(raw),
            MetricKind::Neck => self.neck_smoother.apply(raw),
        };

        let engine = match metric {
            MetricKind::Shoulder => &mut self.shoulder,
            MetricKind::Neck => &mut self.neck,
        };
        match (engine.threshold(), engine.is_poor(angle)) {
            (Some(threshold), Some(poor)) => {
                let verdict = if poor { Verdict::Poor } else { Verdict::Good };
                let alert_fired = poor && self.alert.try_fire(now);
                Assessment::Evaluated {
                    metric,
                    verdict,
                    angle,
                    threshold,
                    alert_fired,
                }
            }
            _ => {
                engine.feed(angle);
                let (done, total) = engine.progress();
                Assessment::Calibrating {
                    metric,
                    angle,
                    done,
                    total,
                }
            }
        }
    }

    /// 正面視点では可視度の高い側の耳-肩-腰を使い、だめなら反対側へ
    fn front_triple(&self, pose: &BodyPose) -> Option<[(f32, f32); 3]> {
        let left_vis = self.triple_visibility(pose, BodySide::Left);
        let right_vis = self.triple_visibility(pose, BodySide::Right);
        let (first, second) = if left_vis >= right_vis {
            (BodySide::Left, BodySide::Right)
        } else {
            (BodySide::Right, BodySide::Left)
        };
        self.usable_triple(pose, first)
            .or_else(|| self.usable_triple(pose, second))
    }

    fn triple_visibility(&self, pose: &BodyPose, side: BodySide) -> f32 {
        let (ear, shoulder, hip) = side.triple();
        pose.get(ear).visibility + pose.get(shoulder).visibility + pose.get(hip).visibility
    }

    /// 3点すべてが可視度の下限を満たすときだけ座標を返す。
    /// 1点でも欠ければ角度は計算しない（不正確な判定を出すより評価を飛ばす）
    fn usable_triple(&self, pose: &BodyPose, side: BodySide) -> Option<[(f32, f32); 3]> {
        let (ear, shoulder, hip) = side.triple();
        let e = pose.get(ear);
        let s = pose.get(shoulder);
        let h = pose.get(hip);
        if e.is_visible(self.visibility_floor)
            && s.is_visible(self.visibility_floor)
            && h.is_visible(self.visibility_floor)
        {
            Some([e.point(), s.point(), h.point()])
        } else {
            None
        }
    }
}
