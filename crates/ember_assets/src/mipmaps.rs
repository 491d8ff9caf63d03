//! Mip chains stored as one image per level: `<stem>_<level>.<ext>`.

use std::path::{Path, PathBuf};

use ember_core::texture::max_mip_levels;
use ember_core::{Texel, Texture};

use crate::error::TextureIoError;
use crate::texture_io::TextureIo;

/// Path of level `level` for `filename` inside `folder`,
/// e.g. `("probes", "sky.exr", 2)` -> `probes/sky_2.exr`.
pub fn mip_level_path(folder: impl AsRef<Path>, filename: &str, level: usize) -> PathBuf {
    let name = Path::new(filename);
    let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
    let file = match name.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{level}.{ext}"),
        None => format!("{stem}_{level}"),
    };
    folder.as_ref().join(file)
}

/// Writes every level of `texture`, creating `folder` if needed.
pub fn save_mipmaps<T>(
    texture: &Texture<T>,
    folder: impl AsRef<Path>,
    filename: &str,
) -> Result<(), TextureIoError>
where
    T: Texel,
    Texture<T>: TextureIo,
{
    let folder = folder.as_ref();
    std::fs::create_dir_all(folder)?;

    for (level, storage) in texture.levels().iter().enumerate() {
        let path = mip_level_path(folder, filename, level);
        Texture::from_storage(storage.clone()).save(&path)?;
    }

    log::debug!(
        "Saved {} mip levels of {filename} to {}",
        texture.mip_count(),
        folder.display()
    );
    Ok(())
}

/// Reads a full mip chain written by [`save_mipmaps`].
///
/// Every level down to 1x1 must be present and half the size of the one
/// before it.
pub fn load_mipmaps<T>(
    folder: impl AsRef<Path>,
    filename: &str,
) -> Result<Texture<T>, TextureIoError>
where
    T: Texel,
    Texture<T>: TextureIo,
{
    let folder = folder.as_ref();
    let base = load_level::<T>(folder, filename, 0)?;
    let count = max_mip_levels(base.width(), base.height());

    let mut levels = Vec::with_capacity(count);
    levels.push(base.base().clone());

    for level in 1..count {
        let prev = &levels[level - 1];
        let expected = ((prev.width() / 2).max(1), (prev.height() / 2).max(1));
        let texture = load_level::<T>(folder, filename, level)?;
        let actual = (texture.width(), texture.height());
        if actual != expected {
            return Err(TextureIoError::DimensionMismatch {
                level,
                expected,
                actual,
            });
        }
        levels.push(texture.base().clone());
    }

    log::debug!("Loaded {count} mip levels of {filename} from {}", folder.display());
    Ok(Texture::from_levels(levels))
}

fn load_level<T>(folder: &Path, filename: &str, level: usize) -> Result<Texture<T>, TextureIoError>
where
    T: Texel,
    Texture<T>: TextureIo,
{
    let path = mip_level_path(folder, filename, level);
    if !path.is_file() {
        log::warn!("Mip level {level} of {filename} is missing");
        return Err(TextureIoError::MissingLevel { level, path });
    }
    Texture::load(&path)
}
