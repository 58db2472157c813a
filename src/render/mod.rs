pub mod overlay;
pub mod skeleton;
pub mod window;

pub use skeleton::SKELETON_BONES;
pub use window::DisplayWindow;
