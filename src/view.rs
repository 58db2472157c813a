use crate::pose::{BodyPose, LandmarkId};

/// 被写体がカメラに対してどちらを向いているか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOrientation {
    Front,
    Back,
    LeftSide,
    RightSide,
    Unknown,
}

impl ViewOrientation {
    pub fn label(&self) -> &'static str {
        match self {
            ViewOrientation::Front => "front",
            ViewOrientation::Back => "back",
            ViewOrientation::LeftSide => "left side",
            ViewOrientation::RightSide => "right side",
            ViewOrientation::Unknown => "unknown",
        }
    }
}

/// ランドマークの可視度から視点を分類する
///
/// 判定は優先順: 鼻が見えていれば正面。鼻が見えず両肩が見えていれば背面。
/// 片肩のみなら側面。どれでもなければ判定不能
pub fn classify_view(pose: &BodyPose, visibility_threshold: f32) -> ViewOrientation {
    let nose = pose.get(LandmarkId::Nose);
    let left_shoulder = pose.get(LandmarkId::LeftShoulder);
    let right_shoulder = pose.get(LandmarkId::RightShoulder);

    if nose.is_visible(visibility_threshold) {
        ViewOrientation::Front
    } else if left_shoulder.is_visible(visibility_threshold)
        && right_shoulder.is_visible(visibility_threshold)
    {
        ViewOrientation::Back
    } else if left_shoulder.is_visible(visibility_threshold) {
        ViewOrientation::LeftSide
    } else if right_shoulder.is_visible(visibility_threshold) {
        ViewOrientation::RightSide
    } else {
        ViewOrientation::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Landmark;

    const THRESHOLD: f32 = 0.5;

    fn make_pose(nose: f32, left_shoulder: f32, right_shoulder: f32) -> BodyPose {
        let mut pose = BodyPose::default();
        pose.landmarks[LandmarkId::Nose as usize] = Landmark::new(0.5, 0.3, nose);
        pose.landmarks[LandmarkId::LeftShoulder as usize] = Landmark::new(0.4, 0.5, left_shoulder);
        pose.landmarks[LandmarkId::RightShoulder as usize] = Landmark::new(0.6, 0.5, right_shoulder);
        pose
    }

    #[test]
    fn test_front_takes_precedence_over_back() {
        // 鼻も両肩も見えている → 正面を優先
        let pose = make_pose(0.9, 0.9, 0.9);
        assert_eq!(classify_view(&pose, THRESHOLD), ViewOrientation::Front);
    }

    #[test]
    fn test_back() {
        let pose = make_pose(0.1, 0.8, 0.8);
        assert_eq!(classify_view(&pose, THRESHOLD), ViewOrientation::Back);
    }

    #[test]
    fn test_left_side() {
        let pose = make_pose(0.2, 0.8, 0.3);
        assert_eq!(classify_view(&pose, THRESHOLD), ViewOrientation::LeftSide);
    }

    #[test]
    fn test_right_side() {
        let pose = make_pose(0.2, 0.3, 0.8);
        assert_eq!(classify_view(&pose, THRESHOLD), ViewOrientation::RightSide);
    }

    #[test]
    fn test_unknown() {
        let pose = make_pose(0.1, 0.2, 0.1);
        assert_eq!(classify_view(&pose, THRESHOLD), ViewOrientation::Unknown);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let pose = make_pose(0.5, 0.0, 0.0);
        assert_eq!(classify_view(&pose, THRESHOLD), ViewOrientation::Front);
    }
}
