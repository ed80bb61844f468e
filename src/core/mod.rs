pub mod animate;
pub mod field;
pub mod perf;
pub mod pulse;

pub use field::*;
pub use perf::*;
pub use pulse::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../../shaders/post.wgsl");
