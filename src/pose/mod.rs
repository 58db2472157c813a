pub mod detector;
pub mod landmark;
pub mod preprocess;

pub use detector::PoseDetector;
pub use landmark::{BodyPose, Landmark, LandmarkId};
pub use preprocess::{to_model_input, MODEL_INPUT_SIZE};
