use crate::pose::LandmarkId;

/// 骨格の接続定義 (始点, 終点)
pub const SKELETON_BONES: [(LandmarkId, LandmarkId); 16] = [
    // 頭部
    (LandmarkId::LeftEar, LandmarkId::LeftEye),
    (LandmarkId::LeftEye, LandmarkId::Nose),
    (LandmarkId::Nose, LandmarkId::RightEye),
    (LandmarkId::RightEye, LandmarkId::RightEar),
    // 腕
    (LandmarkId::LeftShoulder, LandmarkId::LeftElbow),
    (LandmarkId::LeftElbow, LandmarkId::LeftWrist),
    (LandmarkId::RightShoulder, LandmarkId::RightElbow),
    (LandmarkId::RightElbow, LandmarkId::RightWrist),
    // 体幹（姿勢評価で使う耳-肩-腰のラインを含む）
    (LandmarkId::LeftShoulder, LandmarkId::RightShoulder),
    (LandmarkId::LeftShoulder, LandmarkId::LeftHip),
    (LandmarkId::RightShoulder, LandmarkId::RightHip),
    (LandmarkId::LeftHip, LandmarkId::RightHip),
    // 脚
    (LandmarkId::LeftHip, LandmarkId::LeftKnee),
    (LandmarkId::LeftKnee, LandmarkId::LeftAnkle),
    (LandmarkId::RightHip, LandmarkId::RightKnee),
    (LandmarkId::RightKnee, LandmarkId::RightAnkle),
];

/// 可視なランドマークの色 (RGB)
pub const JOINT_COLOR: u32 = 0x00FF00;

/// 骨格線の色 (RGB)
pub const BONE_COLOR: u32 = 0xFFFF00;

/// 可視度の低いランドマークの色 (RGB)
pub const FAINT_JOINT_COLOR: u32 = 0xFF0000;
