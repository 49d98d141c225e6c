//! Mesh geometry and the vertex format
//!
//! CPU-side geometry the renderer uploads into device-local buffers.

use ash::vk;
use bytemuck::{Pod, Zeroable};

/// Byte offset of a field inside a repr(C) struct
macro_rules! memoffset_of {
    ($ty:ty, $field:ident) => {{
        let base = std::mem::MaybeUninit::<$ty>::uninit();
        let base_ptr = base.as_ptr();
        // addr_of! does not dereference the uninitialized memory.
        let field_ptr = unsafe { std::ptr::addr_of!((*base_ptr).$field) };
        (field_ptr as usize - base_ptr as usize) as u32
    }};
}

/// Vertex format consumed by every material pipeline
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Vertex color (RGBA)
    pub color: [f32; 4],
    /// Texture coordinates
    pub uv: [f32; 2],
    /// Object-space normal
    pub normal: [f32; 3],
    /// Object-space tangent
    pub tangent: [f32; 3],
}

impl Vertex {
    /// Binding description for the single interleaved vertex buffer
    pub fn binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription {
            binding: 0,
            stride: std::mem::size_of::<Vertex>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        }
    }

    /// Attribute descriptions matching the shader input locations
    pub fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 5] {
        [
            vk::VertexInputAttributeDescription {
                location: 0,
                binding: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: memoffset_of!(Vertex, position),
            },
            vk::VertexInputAttributeDescription {
                location: 1,
                binding: 0,
                format: vk::Format::R32G32B32A32_SFLOAT,
                offset: memoffset_of!(Vertex, color),
            },
            vk::VertexInputAttributeDescription {
                location: 2,
                binding: 0,
                format: vk::Format::R32G32_SFLOAT,
                offset: memoffset_of!(Vertex, uv),
            },
            vk::VertexInputAttributeDescription {
                location: 3,
                binding: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: memoffset_of!(Vertex, normal),
            },
            vk::VertexInputAttributeDescription {
                location: 4,
                binding: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: memoffset_of!(Vertex, tangent),
            },
        ]
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Unit quad in the XY plane, facing +Z, counter-clockwise winding
    pub fn quad() -> Self {
        let normal = [0.0, 0.0, 1.0];
        let tangent = [1.0, 0.0, 0.0];
        let white = [1.0, 1.0, 1.0, 1.0];

        Self {
            vertices: vec![
                Vertex {
                    position: [-0.5, -0.5, 0.0],
                    color: white,
                    uv: [0.0, 1.0],
                    normal,
                    tangent,
                },
                Vertex {
                    position: [0.5, -0.5, 0.0],
                    color: white,
                    uv: [1.0, 1.0],
                    normal,
                    tangent,
                },
                Vertex {
                    position: [0.5, 0.5, 0.0],
                    color: white,
                    uv: [1.0, 0.0],
                    normal,
                    tangent,
                },
                Vertex {
                    position: [-0.5, 0.5, 0.0],
                    color: white,
                    uv: [0.0, 0.0],
                    normal,
                    tangent,
                },
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The interleaved layout matches what the pipelines declare
    #[test]
    fn vertex_layout_offsets() {
        assert_eq!(std::mem::size_of::<Vertex>(), 60);
        assert_eq!(Vertex::binding_description().stride, 60);

        let attrs = Vertex::attribute_descriptions();
        assert_eq!(attrs[0].offset, 0); // position
        assert_eq!(attrs[1].offset, 12); // color
        assert_eq!(attrs[2].offset, 28); // uv
        assert_eq!(attrs[3].offset, 36); // normal
        assert_eq!(attrs[4].offset, 48); // tangent
    }

    #[test]
    fn quad_is_two_counter_clockwise_triangles() {
        let quad = Mesh::quad();
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices, vec![0, 1, 2, 2, 3, 0]);

        // Cross product of the first triangle's edges points toward +Z.
        let [a, b, c] = [0, 1, 2].map(|i| quad.vertices[quad.indices[i] as usize].position);
        let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let z = ab[0] * ac[1] - ab[1] * ac[0];
        assert!(z > 0.0);
    }
}
