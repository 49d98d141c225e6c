//! Material system
//!
//! A material type pairs a named descriptor-set layout with a graphics
//! pipeline built from `<name>.vert.spv` / `<name>.frag.spv`. The layout
//! survives swapchain rebuilds; the pipeline is rebuilt against the new
//! render pass and extent. Material instances are a closed set of
//! variants; their descriptor sets are allocated lazily and tied to the
//! descriptor pool's generation, so a pool reset invalidates them
//! without any explicit bookkeeping at the rebuild site.

use ash::{vk, Device};
use bytemuck::{Pod, Zeroable};
use slotmap::SlotMap;
use std::path::{Path, PathBuf};

use crate::render::vulkan::descriptor::{
    DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder, DescriptorSetWriter,
};
use crate::render::vulkan::shader::GraphicsPipeline;
use crate::render::vulkan::texture::Texture;
use crate::render::vulkan::{UniformBuffer, VulkanError, VulkanResult};
use crate::render::TextureHandle;

/// The material type names the engine knows how to build
pub const MATERIAL_TYPE_NAMES: [&str; 3] = ["basic", "colored", "standard"];

/// A value paired with a dirty flag, cleared when taken
#[derive(Debug, Clone, Copy)]
pub struct DirtyCell<T> {
    value: T,
    dirty: bool,
}

impl<T: Copy> DirtyCell<T> {
    /// Wrap an initial value, marked dirty so the first flush uploads it
    pub fn new(value: T) -> Self {
        Self { value, dirty: true }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value
    }

    /// Replace the value and mark it dirty
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.dirty = true;
    }

    /// Whether the value changed since the last take
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the value if dirty, clearing the flag
    pub fn take_dirty(&mut self) -> Option<T> {
        if self.dirty {
            self.dirty = false;
            Some(self.value)
        } else {
            None
        }
    }
}

/// Fragment uniforms for the colored material
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorUniforms {
    /// Flat RGBA color
    pub color: [f32; 4],
}

/// Fragment uniforms for the standard material
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StandardUniforms {
    /// Base color factor multiplied into the albedo texture
    pub base_color: [f32; 4],
    /// Metallic factor
    pub metallic: f32,
    /// Roughness factor
    pub roughness: f32,
    /// Keeps the struct 16-byte aligned for std140
    pub _padding: [f32; 2],
}

impl Default for StandardUniforms {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            metallic: 0.0,
            roughness: 1.0,
            _padding: [0.0; 2],
        }
    }
}

/// Named pairing of a per-material descriptor layout and a pipeline
pub struct MaterialType {
    name: String,
    layout: DescriptorSetLayout,
    pipeline: Option<GraphicsPipeline>,
}

impl MaterialType {
    /// Create the layout for a known material type name
    pub fn new(device: Device, name: &str) -> VulkanResult<Self> {
        let builder = match name {
            "basic" => DescriptorSetLayoutBuilder::new()
                .add_combined_image_sampler(0, vk::ShaderStageFlags::FRAGMENT),
            "colored" => {
                DescriptorSetLayoutBuilder::new().add_uniform_buffer(0, vk::ShaderStageFlags::FRAGMENT)
            }
            "standard" => DescriptorSetLayoutBuilder::new()
                .add_uniform_buffer(0, vk::ShaderStageFlags::FRAGMENT)
                .add_combined_image_sampler(1, vk::ShaderStageFlags::FRAGMENT)
                .add_combined_image_sampler(2, vk::ShaderStageFlags::FRAGMENT)
                .add_combined_image_sampler(3, vk::ShaderStageFlags::FRAGMENT),
            other => return Err(VulkanError::UnknownMaterialType(other.to_string())),
        };

        Ok(Self {
            name: name.to_string(),
            layout: builder.build(device)?,
            pipeline: None,
        })
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-material descriptor set layout
    pub fn layout(&self) -> &DescriptorSetLayout {
        &self.layout
    }

    /// Build the pipeline against the current render pass and extent
    ///
    /// Set 0 is the shared global layout, set 1 this type's own layout.
    pub fn rebuild_pipeline(
        &mut self,
        device: Device,
        render_pass: vk::RenderPass,
        shader_dir: &Path,
        global_layout: vk::DescriptorSetLayout,
        extent: vk::Extent2D,
    ) -> VulkanResult<()> {
        let set_layouts = [global_layout, self.layout.handle()];
        self.pipeline = Some(GraphicsPipeline::for_material_type(
            device,
            render_pass,
            shader_dir,
            &self.name,
            &set_layouts,
            extent,
        )?);
        Ok(())
    }

    /// Drop the pipeline ahead of a render pass rebuild
    pub fn destroy_pipeline(&mut self) {
        self.pipeline = None;
    }

    /// The current pipeline, if built
    pub fn pipeline(&self) -> VulkanResult<&GraphicsPipeline> {
        self.pipeline
            .as_ref()
            .ok_or(VulkanError::ResourceNotFound { kind: "pipeline" })
    }
}

/// Per-instance material payload
pub enum MaterialKind {
    /// One sampled texture, no uniforms
    Basic {
        /// Texture sampled at binding 0
        texture: TextureHandle,
    },
    /// Flat color from a uniform buffer
    Colored {
        /// Color value with upload tracking
        uniforms: DirtyCell<ColorUniforms>,
        /// Device buffer backing binding 0
        buffer: UniformBuffer<ColorUniforms>,
    },
    /// Textured PBR-style material
    Standard {
        /// Scalar parameters with upload tracking
        uniforms: DirtyCell<StandardUniforms>,
        /// Device buffer backing binding 0
        buffer: UniformBuffer<StandardUniforms>,
        /// Albedo texture at binding 1
        albedo: TextureHandle,
        /// Normal map at binding 2
        normal: TextureHandle,
        /// Metallic-roughness texture at binding 3
        pbr: TextureHandle,
    },
}

impl MaterialKind {
    fn type_name(&self) -> &'static str {
        match self {
            MaterialKind::Basic { .. } => "basic",
            MaterialKind::Colored { .. } => "colored",
            MaterialKind::Standard { .. } => "standard",
        }
    }
}

/// A material instance bound to one of the named types
pub struct Material {
    kind: MaterialKind,
    descriptor_set: vk::DescriptorSet,
    /// Pool generation the set was allocated under; `None` before the
    /// first use.
    set_generation: Option<u64>,
}

impl Material {
    /// Wrap a material payload
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            descriptor_set: vk::DescriptorSet::null(),
            set_generation: None,
        }
    }

    /// Name of the material type this instance uses
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Set the color of a colored material
    pub fn set_color(&mut self, color: [f32; 4]) -> VulkanResult<()> {
        match &mut self.kind {
            MaterialKind::Colored { uniforms, .. } => {
                uniforms.set(ColorUniforms { color });
                Ok(())
            }
            _ => Err(VulkanError::InvalidOperation {
                reason: format!("set_color on a {} material", self.kind.type_name()),
            }),
        }
    }

    /// Set the scalar parameters of a standard material
    pub fn set_standard_uniforms(&mut self, value: StandardUniforms) -> VulkanResult<()> {
        match &mut self.kind {
            MaterialKind::Standard { uniforms, .. } => {
                uniforms.set(value);
                Ok(())
            }
            _ => Err(VulkanError::InvalidOperation {
                reason: format!("set_standard_uniforms on a {} material", self.kind.type_name()),
            }),
        }
    }

    /// Upload any dirty uniform values to the material's buffer
    pub fn flush_uniforms(&mut self) -> VulkanResult<()> {
        match &mut self.kind {
            MaterialKind::Basic { .. } => Ok(()),
            MaterialKind::Colored { uniforms, buffer } => match uniforms.take_dirty() {
                Some(value) => buffer.update(&value),
                None => Ok(()),
            },
            MaterialKind::Standard { uniforms, buffer, .. } => match uniforms.take_dirty() {
                Some(value) => buffer.update(&value),
                None => Ok(()),
            },
        }
    }

    /// Get the descriptor set, (re)building it when the pool generation
    /// has moved past the one it was allocated under.
    pub fn descriptor_set(
        &mut self,
        device: &Device,
        pool: &DescriptorPool,
        layout: &DescriptorSetLayout,
        textures: &SlotMap<TextureHandle, Texture>,
    ) -> VulkanResult<vk::DescriptorSet> {
        if self.set_generation == Some(pool.generation()) {
            return Ok(self.descriptor_set);
        }

        let set = pool.allocate(layout.handle())?;

        let lookup = |handle: TextureHandle| {
            textures
                .get(handle)
                .ok_or(VulkanError::ResourceNotFound { kind: "texture" })
        };

        match &self.kind {
            MaterialKind::Basic { texture } => {
                let texture = lookup(*texture)?;
                DescriptorSetWriter::new(set)
                    .write_image(0, texture.view(), texture.sampler())
                    .update(device);
            }
            MaterialKind::Colored { buffer, .. } => {
                DescriptorSetWriter::new(set)
                    .write_buffer(0, buffer.handle(), buffer.size())
                    .update(device);
            }
            MaterialKind::Standard {
                buffer,
                albedo,
                normal,
                pbr,
                ..
            } => {
                let albedo = lookup(*albedo)?;
                let normal = lookup(*normal)?;
                let pbr = lookup(*pbr)?;
                DescriptorSetWriter::new(set)
                    .write_buffer(0, buffer.handle(), buffer.size())
                    .write_image(1, albedo.view(), albedo.sampler())
                    .write_image(2, normal.view(), normal.sampler())
                    .write_image(3, pbr.view(), pbr.sampler())
                    .update(device);
            }
        }

        self.descriptor_set = set;
        self.set_generation = Some(pool.generation());
        Ok(set)
    }
}

/// Owns the known material types, keyed by name
pub struct MaterialManager {
    types: Vec<MaterialType>,
    shader_dir: PathBuf,
}

impl MaterialManager {
    /// Create every known material type
    pub fn new(device: Device, shader_dir: PathBuf) -> VulkanResult<Self> {
        let types = MATERIAL_TYPE_NAMES
            .iter()
            .map(|name| MaterialType::new(device.clone(), name))
            .collect::<VulkanResult<Vec<_>>>()?;

        Ok(Self { types, shader_dir })
    }

    /// Look up a material type by name
    pub fn get(&self, name: &str) -> VulkanResult<&MaterialType> {
        self.types
            .iter()
            .find(|ty| ty.name() == name)
            .ok_or_else(|| VulkanError::UnknownMaterialType(name.to_string()))
    }

    /// Rebuild every type's pipeline for a new render pass and extent
    pub fn rebuild_pipelines(
        &mut self,
        device: &Device,
        render_pass: vk::RenderPass,
        global_layout: vk::DescriptorSetLayout,
        extent: vk::Extent2D,
    ) -> VulkanResult<()> {
        for ty in &mut self.types {
            ty.rebuild_pipeline(
                device.clone(),
                render_pass,
                &self.shader_dir,
                global_layout,
                extent,
            )?;
        }
        Ok(())
    }

    /// Drop every type's pipeline ahead of a swapchain rebuild
    pub fn destroy_pipelines(&mut self) {
        for ty in &mut self.types {
            ty.destroy_pipeline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fresh cell is dirty so the first flush uploads the initial value
    #[test]
    fn dirty_cell_starts_dirty() {
        let mut cell = DirtyCell::new(ColorUniforms { color: [1.0; 4] });
        assert!(cell.is_dirty());
        assert_eq!(cell.take_dirty(), Some(ColorUniforms { color: [1.0; 4] }));
        assert!(!cell.is_dirty());
        assert_eq!(cell.take_dirty(), None);
    }

    /// Setting a value re-arms the dirty flag; reads do not
    #[test]
    fn dirty_cell_set_marks_dirty() {
        let mut cell = DirtyCell::new(0u32);
        cell.take_dirty();

        let _ = cell.get();
        assert!(!cell.is_dirty());

        cell.set(7);
        assert!(cell.is_dirty());
        assert_eq!(cell.take_dirty(), Some(7));
    }

    #[test]
    fn standard_uniforms_are_std140_sized() {
        assert_eq!(std::mem::size_of::<StandardUniforms>(), 32);
        assert_eq!(std::mem::size_of::<ColorUniforms>(), 16);
    }
}
