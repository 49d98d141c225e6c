//! Rendering subsystem
//!
//! `vulkan` holds the device-level primitives; `material`, `mesh`, and
//! `camera` build the scene-facing layer on top; `renderer` ties it all
//! together into a frame loop. GPU resources are referenced through
//! generational slotmap handles so stale handles fail lookups instead
//! of aliasing freed objects.

pub mod camera;
pub mod material;
pub mod mesh;
pub mod renderer;
pub mod vulkan;

slotmap::new_key_type! {
    /// Handle to a texture owned by the renderer
    pub struct TextureHandle;
    /// Handle to a material instance owned by the renderer
    pub struct MaterialHandle;
    /// Handle to a registered mesh in the draw list
    pub struct MeshHandle;
}

pub use camera::Camera;
pub use material::{ColorUniforms, Material, MaterialKind, MaterialManager, StandardUniforms};
pub use mesh::{Mesh, Vertex};
pub use renderer::{FrameOutcome, GlobalUniforms, Renderer, MAX_OBJECTS};
pub use vulkan::{ImageData, VulkanError, VulkanResult, Window, WindowError};
