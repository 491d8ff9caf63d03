pub mod error;
pub mod mipmaps;
pub mod texture_io;

pub use error::TextureIoError;
pub use mipmaps::{load_mipmaps, mip_level_path, save_mipmaps};
pub use texture_io::TextureIo;
