pub use ember_core;
pub use ember_core::glam;

pub mod buffer;
pub mod framebuffer;
pub mod program;
mod raster;
pub mod renderer;
pub mod varying;

pub use buffer::{Buffer, Geometry, IndexType, IndexedBuffer, Primitive, Vertex};
pub use framebuffer::{
    DefaultFramebuffer, DefaultTargets, Depth, Framebuffer, Pixel, RenderTarget, TargetAt,
    TargetSet,
};
pub use program::Program;
pub use renderer::{DrawStats, FrontFace, RenderOptions, Renderer};
pub use varying::{Interpolate, Varying};
