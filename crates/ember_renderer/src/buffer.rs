use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// How consecutive elements are grouped into primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Primitive {
    #[default]
    Triangles,
    Lines,
}

impl Primitive {
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            Primitive::Triangles => 3,
            Primitive::Lines => 2,
        }
    }
}

/// A general purpose vertex: position, normal and texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub const fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Vertex data the renderer can assemble into primitives.
pub trait Geometry<V> {
    fn primitive(&self) -> Primitive;
    fn vertices(&self) -> &[V];

    /// Number of elements (vertex references) to assemble.
    fn element_count(&self) -> usize;

    /// Vertex index of element `i`.
    fn element(&self, i: usize) -> usize;

    /// Whole primitives described; a trailing partial group is ignored.
    fn primitive_count(&self) -> usize {
        self.element_count() / self.primitive().vertices_per_primitive()
    }
}

/// Vertices drawn in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer<V> {
    pub primitive: Primitive,
    pub vertices: Vec<V>,
}

impl<V> Buffer<V> {
    pub fn new(primitive: Primitive, vertices: Vec<V>) -> Self {
        Self {
            primitive,
            vertices,
        }
    }

    pub fn triangles(vertices: Vec<V>) -> Self {
        Self::new(Primitive::Triangles, vertices)
    }

    pub fn lines(vertices: Vec<V>) -> Self {
        Self::new(Primitive::Lines, vertices)
    }
}

impl<V> Geometry<V> for Buffer<V> {
    fn primitive(&self) -> Primitive {
        self.primitive
    }

    fn vertices(&self) -> &[V] {
        &self.vertices
    }

    fn element_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn element(&self, i: usize) -> usize {
        i
    }
}

/// Integer types usable as vertex indices.
pub trait IndexType: Copy {
    fn to_usize(self) -> usize;
}

macro_rules! index_type {
    ($($ty:ty),*) => {
        $(
            impl IndexType for $ty {
                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

index_type!(u8, u16, u32, usize);

/// Vertices drawn in the order of an index list.
///
/// Every index must be smaller than `vertices.len()`; the renderer checks
/// this before drawing and panics otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedBuffer<V, I: IndexType = u32> {
    pub primitive: Primitive,
    pub vertices: Vec<V>,
    pub indices: Vec<I>,
}

impl<V, I: IndexType> IndexedBuffer<V, I> {
    pub fn new(primitive: Primitive, vertices: Vec<V>, indices: Vec<I>) -> Self {
        Self {
            primitive,
            vertices,
            indices,
        }
    }
}

impl<V, I: IndexType> Geometry<V> for IndexedBuffer<V, I> {
    fn primitive(&self) -> Primitive {
        self.primitive
    }

    fn vertices(&self) -> &[V] {
        &self.vertices
    }

    fn element_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    fn element(&self, i: usize) -> usize {
        self.indices[i].to_usize()
    }
}
