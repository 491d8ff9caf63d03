use std::ops::{Index, IndexMut};

use glam::UVec2;

use crate::texel::{Rgba8, Texel};

/// A single 2D grid of texels, row-major, row 0 at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureStorage<T: Texel> {
    width: usize,
    height: usize,
    texels: Vec<T>,
}

impl<T: Texel> TextureStorage<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            texels: vec![fill; width * height],
        }
    }

    pub fn from_texels(width: usize, height: usize, texels: Vec<T>) -> Self {
        assert_eq!(
            texels.len(),
            width * height,
            "texel count does not match {width}x{height}"
        );
        Self {
            width,
            height,
            texels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width as u32, self.height as u32)
    }

    pub fn fill(&mut self, value: T) {
        self.texels.fill(value);
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        self.texels[self.offset(x, y)]
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut T {
        let offset = self.offset(x, y);
        &mut self.texels[offset]
    }

    #[inline]
    pub fn texels(&self) -> &[T] {
        &self.texels
    }

    #[inline]
    pub fn texels_mut(&mut self) -> &mut [T] {
        &mut self.texels
    }

    pub fn into_texels(self) -> Vec<T> {
        self.texels
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "texel ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Half-size copy by 2x2 box filtering, clamping at odd edges.
    fn downsample(&self) -> Self {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut texels = Vec::with_capacity(width * height);

        for y in 0..height {
            let y0 = (2 * y).min(self.height - 1);
            let y1 = (2 * y + 1).min(self.height - 1);
            for x in 0..width {
                let x0 = (2 * x).min(self.width - 1);
                let x1 = (2 * x + 1).min(self.width - 1);
                let sum = self.at(x0, y0).to_value()
                    + self.at(x1, y0).to_value()
                    + self.at(x0, y1).to_value()
                    + self.at(x1, y1).to_value();
                texels.push(T::from_value(sum * 0.25));
            }
        }

        Self {
            width,
            height,
            texels,
        }
    }
}

impl<T: Texel> Index<(usize, usize)> for TextureStorage<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.texels[self.offset(x, y)]
    }
}

impl<T: Texel> IndexMut<(usize, usize)> for TextureStorage<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        self.at_mut(x, y)
    }
}

/// Number of levels in a full mip chain: `floor(log2(max(w, h))) + 1`.
pub fn max_mip_levels(width: usize, height: usize) -> usize {
    let largest = width.max(height).max(1);
    (usize::BITS - largest.leading_zeros()) as usize
}

/// A texture and its mip chain. Level 0 is always present.
///
/// Level-0 accessors (`at`, `fill`, ...) never touch the other levels;
/// call [`Texture::generate_mipmaps`] after editing to refresh them.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture<T: Texel> {
    levels: Vec<TextureStorage<T>>,
}

impl<T: Texel> Default for Texture<T> {
    /// 1x1 texture with the default texel.
    fn default() -> Self {
        Self::new(1, 1, T::default())
    }
}

impl<T: Texel> Texture<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self::from_storage(TextureStorage::new(width, height, fill))
    }

    pub fn from_storage(base: TextureStorage<T>) -> Self {
        Self { levels: vec![base] }
    }

    /// Builds a texture from an existing mip chain.
    ///
    /// # Panics
    /// If `levels` is empty or a level is not `max(1, previous / 2)` in size.
    pub fn from_levels(levels: Vec<TextureStorage<T>>) -> Self {
        assert!(!levels.is_empty(), "a texture needs at least one level");
        for pair in levels.windows(2) {
            assert!(
                is_next_level(&pair[0], &pair[1]),
                "mip level {}x{} does not follow {}x{}",
                pair[1].width,
                pair[1].height,
                pair[0].width,
                pair[0].height
            );
        }
        Self { levels }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.base().width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.base().height
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        self.base().size()
    }

    #[inline]
    pub fn mip_count(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn base(&self) -> &TextureStorage<T> {
        &self.levels[0]
    }

    #[inline]
    pub fn base_mut(&mut self) -> &mut TextureStorage<T> {
        &mut self.levels[0]
    }

    /// Mip level `level`; panics if the chain is shorter.
    #[inline]
    pub fn level(&self, level: usize) -> &TextureStorage<T> {
        &self.levels[level]
    }

    #[inline]
    pub fn levels(&self) -> &[TextureStorage<T>] {
        &self.levels
    }

    pub fn fill(&mut self, value: T) {
        self.base_mut().fill(value);
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        self.base().at(x, y)
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut T {
        self.base_mut().at_mut(x, y)
    }

    #[inline]
    pub fn texels(&self) -> &[T] {
        self.base().texels()
    }

    #[inline]
    pub fn texels_mut(&mut self) -> &mut [T] {
        self.base_mut().texels_mut()
    }

    /// Rebuilds every level above 0 down to 1x1.
    pub fn generate_mipmaps(&mut self) {
        self.levels.truncate(1);
        let count = max_mip_levels(self.width(), self.height());
        if self.texels().is_empty() {
            return;
        }
        for _ in 1..count {
            let next = self.levels[self.levels.len() - 1].downsample();
            self.levels.push(next);
        }
        log::trace!(
            "generated {} mip levels for {}x{} texture",
            self.levels.len(),
            self.width(),
            self.height()
        );
    }
}

impl<T: Texel> Index<(usize, usize)> for Texture<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &T {
        &self.base()[index]
    }
}

impl<T: Texel> IndexMut<(usize, usize)> for Texture<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut T {
        &mut self.base_mut()[index]
    }
}

impl Texture<Rgba8> {
    /// Level 0 as tightly packed RGBA8 rows, bottom row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.texels())
    }
}

fn is_next_level<T: Texel>(prev: &TextureStorage<T>, next: &TextureStorage<T>) -> bool {
    next.width == (prev.width / 2).max(1) && next.height == (prev.height / 2).max(1)
}
