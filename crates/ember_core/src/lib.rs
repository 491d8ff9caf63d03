pub use glam;

pub mod camera;
pub mod logging;
pub mod math;
pub mod sampler;
pub mod texel;
pub mod texture;
pub mod transform;

pub use camera::Camera;
pub use math::{IRect, Rect};
pub use sampler::{Filter, Sampler, Wrap};
pub use texel::{Rgba8, Texel};
pub use texture::{Texture, TextureStorage};
pub use transform::Transform;
