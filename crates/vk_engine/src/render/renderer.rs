//! Frame orchestration
//!
//! `Renderer` owns everything from the device context up: registered
//! meshes and materials, per-image command buffers with dirty tracking,
//! the global uniform buffers, and the frames-in-flight sync objects.
//! Out-of-date swapchains are recovered by rebuilding every
//! extent-dependent object and reporting the rebuild to the caller.

use ash::vk;
use slotmap::SlotMap;
use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::foundation::math::Mat4;
use crate::render::camera::Camera;
use crate::render::material::{
    ColorUniforms, DirtyCell, Material, MaterialKind, MaterialManager, StandardUniforms,
};
use crate::render::mesh::Mesh;
use crate::render::vulkan::commands::CommandRecorder;
use crate::render::vulkan::descriptor::{
    DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder, DescriptorSetWriter,
};
use crate::render::vulkan::shader::PUSH_CONSTANT_SIZE;
use crate::render::vulkan::texture::ImageData;
use crate::render::vulkan::{
    CommandPool, DepthBuffer, Framebuffer, FrameSync, IndexBuffer, RenderPass, Texture,
    UniformBuffer, VertexBuffer, VulkanContext, VulkanError, VulkanResult, Window,
};
use crate::render::{MaterialHandle, MeshHandle, TextureHandle};

/// Maximum number of registered meshes; bounds the global model-matrix
/// array so it stays well inside the guaranteed 16 KiB UBO range.
pub const MAX_OBJECTS: usize = 64;

/// Per-image uniform block shared by every material pipeline
///
/// Vertex shaders index `model` with the push-constant object index.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct GlobalUniforms {
    /// Model matrix per registered object (column-major)
    pub model: [[[f32; 4]; 4]; MAX_OBJECTS],
    /// World-to-view matrix
    pub view: [[f32; 4]; 4],
    /// View-to-clip matrix
    pub proj: [[f32; 4]; 4],
    /// Camera position in world space (w unused, kept 1 for std140)
    pub camera_pos: [f32; 4],
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Mat4::identity().into();
        Self {
            model: [identity; MAX_OBJECTS],
            view: identity,
            proj: identity,
            camera_pos: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Outcome of a non-fatal frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was submitted and presented
    Rendered,
    /// The swapchain went stale this frame and has been rebuilt. At
    /// acquire time nothing was presented; after present the image may
    /// still have reached the screen. Either way the caller simply
    /// renders again.
    SwapchainRebuilt,
}

/// Cycles the in-flight frame slot: 0, 1, .., count-1, 0, ..
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameSlots {
    current: usize,
    count: usize,
}

impl FrameSlots {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    pub(crate) fn current(&self) -> usize {
        self.current
    }

    pub(crate) fn advance(&mut self) {
        self.current = (self.current + 1) % self.count;
    }
}

/// Per-image command buffer dirty flags
#[derive(Debug, Default)]
pub(crate) struct DirtyFlags {
    flags: Vec<bool>,
}

impl DirtyFlags {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            flags: vec![true; count],
        }
    }

    pub(crate) fn mark_all(&mut self) {
        for flag in &mut self.flags {
            *flag = true;
        }
    }

    pub(crate) fn clear(&mut self, index: usize) {
        if let Some(flag) = self.flags.get_mut(index) {
            *flag = false;
        }
    }

    pub(crate) fn is_dirty(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(true)
    }
}

struct MeshEntry {
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    material: MaterialHandle,
    model: [[f32; 4]; 4],
}

/// Resolved state for one draw, gathered before recording begins
struct DrawCommand {
    pipeline: vk::Pipeline,
    layout: vk::PipelineLayout,
    material_set: vk::DescriptorSet,
    vertex_buffer: vk::Buffer,
    index_buffer: vk::Buffer,
    index_count: u32,
    object_index: u32,
}

/// Top-level renderer owning the full Vulkan object graph
pub struct Renderer {
    meshes: SlotMap<MeshHandle, MeshEntry>,
    draw_order: Vec<MeshHandle>,
    materials: SlotMap<MaterialHandle, Material>,
    textures: SlotMap<TextureHandle, Texture>,
    material_manager: MaterialManager,

    command_buffers: Vec<vk::CommandBuffer>,
    dirty: DirtyFlags,
    global_uniforms: Vec<UniformBuffer<GlobalUniforms>>,
    global_sets: Vec<vk::DescriptorSet>,
    descriptor_pool: DescriptorPool,
    global_layout: DescriptorSetLayout,
    framebuffers: Vec<Framebuffer>,
    depth_buffer: Option<DepthBuffer>,
    render_pass: Option<RenderPass>,
    command_pool: CommandPool,
    frame_sync: Vec<FrameSync>,
    frame_slots: FrameSlots,
    clear_color: [f32; 4],

    // Dropped last: everything above holds device children.
    context: VulkanContext,
}

impl Renderer {
    /// Create a renderer for the window using the given configuration
    pub fn new(window: &mut Window, config: &EngineConfig) -> VulkanResult<Self> {
        let context = VulkanContext::new(
            window,
            &config.application.name,
            config.application.version,
            config.validation_enabled(),
        )?;
        let device = context.raw_device();
        let memory_properties = context.memory_properties();

        let swapchain = context.swapchain()?;
        let extent = swapchain.extent();
        let color_format = swapchain.format().format;
        let image_count = swapchain.image_count();

        let render_pass = RenderPass::new_forward_pass(device.clone(), color_format)?;

        let global_layout = DescriptorSetLayoutBuilder::new()
            .add_uniform_buffer(
                0,
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            )
            .build(device.clone())?;

        let mut material_manager =
            MaterialManager::new(device.clone(), PathBuf::from(&config.renderer.shader_dir))?;
        material_manager.rebuild_pipelines(
            &device,
            render_pass.handle(),
            global_layout.handle(),
            extent,
        )?;

        let depth_buffer = DepthBuffer::new(device.clone(), &memory_properties, extent)?;
        let framebuffers = Self::create_framebuffers(
            &context,
            render_pass.handle(),
            depth_buffer.view(),
            extent,
        )?;

        let command_pool = CommandPool::new(device.clone(), context.device().graphics_family)?;
        let command_buffers = command_pool.allocate_command_buffers(image_count as u32)?;

        let mut descriptor_pool = DescriptorPool::new(device.clone(), image_count as u32)?;
        let (global_uniforms, global_sets) = Self::create_global_bindings(
            &context,
            &mut descriptor_pool,
            &global_layout,
            image_count,
        )?;

        let frames_in_flight = config.renderer.frames_in_flight.max(1);
        let frame_sync = (0..frames_in_flight)
            .map(|_| FrameSync::new(device.clone()))
            .collect::<VulkanResult<Vec<_>>>()?;

        log::info!(
            "Renderer initialized: {} swapchain images, {} frames in flight",
            image_count,
            frames_in_flight
        );

        Ok(Self {
            meshes: SlotMap::with_key(),
            draw_order: Vec::new(),
            materials: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            material_manager,
            command_buffers,
            dirty: DirtyFlags::new(image_count),
            global_uniforms,
            global_sets,
            descriptor_pool,
            global_layout,
            framebuffers,
            depth_buffer: Some(depth_buffer),
            render_pass: Some(render_pass),
            command_pool,
            frame_sync,
            frame_slots: FrameSlots::new(frames_in_flight),
            clear_color: config.renderer.clear_color,
            context,
        })
    }

    fn create_framebuffers(
        context: &VulkanContext,
        render_pass: vk::RenderPass,
        depth_view: vk::ImageView,
        extent: vk::Extent2D,
    ) -> VulkanResult<Vec<Framebuffer>> {
        context
            .swapchain()?
            .image_views()
            .iter()
            .map(|&view| {
                Framebuffer::new(
                    context.raw_device(),
                    render_pass,
                    &[view, depth_view],
                    extent,
                )
            })
            .collect()
    }

    fn create_global_bindings(
        context: &VulkanContext,
        descriptor_pool: &mut DescriptorPool,
        global_layout: &DescriptorSetLayout,
        image_count: usize,
    ) -> VulkanResult<(Vec<UniformBuffer<GlobalUniforms>>, Vec<vk::DescriptorSet>)> {
        let device = context.raw_device();
        let memory_properties = context.memory_properties();

        let mut uniforms = Vec::with_capacity(image_count);
        let mut sets = Vec::with_capacity(image_count);

        for _ in 0..image_count {
            let buffer = UniformBuffer::<GlobalUniforms>::new(device.clone(), &memory_properties)?;
            buffer.update(&GlobalUniforms::default())?;

            let set = descriptor_pool.allocate(global_layout.handle())?;
            DescriptorSetWriter::new(set)
                .write_buffer(0, buffer.handle(), buffer.size())
                .update(&device);

            uniforms.push(buffer);
            sets.push(set);
        }

        Ok((uniforms, sets))
    }

    /// Upload image data into a new texture
    pub fn create_texture(&mut self, data: &ImageData) -> VulkanResult<TextureHandle> {
        let texture = Texture::new(
            self.context.raw_device(),
            &self.context.memory_properties(),
            &self.command_pool,
            self.context.graphics_queue(),
            data,
        )?;
        Ok(self.textures.insert(texture))
    }

    /// Create a basic material sampling one texture
    pub fn create_basic_material(&mut self, texture: TextureHandle) -> VulkanResult<MaterialHandle> {
        if !self.textures.contains_key(texture) {
            return Err(VulkanError::ResourceNotFound { kind: "texture" });
        }
        Ok(self
            .materials
            .insert(Material::new(MaterialKind::Basic { texture })))
    }

    /// Create a colored material with an initial RGBA color
    pub fn create_colored_material(&mut self, color: [f32; 4]) -> VulkanResult<MaterialHandle> {
        let buffer = UniformBuffer::<ColorUniforms>::new(
            self.context.raw_device(),
            &self.context.memory_properties(),
        )?;
        Ok(self.materials.insert(Material::new(MaterialKind::Colored {
            uniforms: DirtyCell::new(ColorUniforms { color }),
            buffer,
        })))
    }

    /// Create a standard material from three textures
    pub fn create_standard_material(
        &mut self,
        albedo: TextureHandle,
        normal: TextureHandle,
        pbr: TextureHandle,
        uniforms: StandardUniforms,
    ) -> VulkanResult<MaterialHandle> {
        for handle in [albedo, normal, pbr] {
            if !self.textures.contains_key(handle) {
                return Err(VulkanError::ResourceNotFound { kind: "texture" });
            }
        }
        let buffer = UniformBuffer::<StandardUniforms>::new(
            self.context.raw_device(),
            &self.context.memory_properties(),
        )?;
        Ok(self.materials.insert(Material::new(MaterialKind::Standard {
            uniforms: DirtyCell::new(uniforms),
            buffer,
            albedo,
            normal,
            pbr,
        })))
    }

    /// Change the color of a colored material
    pub fn set_material_color(
        &mut self,
        handle: MaterialHandle,
        color: [f32; 4],
    ) -> VulkanResult<()> {
        self.materials
            .get_mut(handle)
            .ok_or(VulkanError::ResourceNotFound { kind: "material" })?
            .set_color(color)
    }

    /// Change the scalar parameters of a standard material
    pub fn set_standard_uniforms(
        &mut self,
        handle: MaterialHandle,
        value: StandardUniforms,
    ) -> VulkanResult<()> {
        self.materials
            .get_mut(handle)
            .ok_or(VulkanError::ResourceNotFound { kind: "material" })?
            .set_standard_uniforms(value)
    }

    /// Upload a mesh and append it to the draw list
    ///
    /// Every command buffer is marked dirty so the new mesh is picked up
    /// the next time each image is recorded.
    pub fn register_mesh(
        &mut self,
        mesh: &Mesh,
        material: MaterialHandle,
    ) -> VulkanResult<MeshHandle> {
        if !self.materials.contains_key(material) {
            return Err(VulkanError::ResourceNotFound { kind: "material" });
        }
        if self.draw_order.len() >= MAX_OBJECTS {
            return Err(VulkanError::InvalidOperation {
                reason: format!("draw list is full ({MAX_OBJECTS} objects)"),
            });
        }

        let device = self.context.raw_device();
        let memory_properties = self.context.memory_properties();
        let queue = self.context.graphics_queue();

        let vertex_buffer = VertexBuffer::new(
            device.clone(),
            &memory_properties,
            &self.command_pool,
            queue,
            &mesh.vertices,
        )?;
        let index_buffer = IndexBuffer::new(
            device,
            &memory_properties,
            &self.command_pool,
            queue,
            &mesh.indices,
        )?;

        let handle = self.meshes.insert(MeshEntry {
            vertex_buffer,
            index_buffer,
            material,
            model: Mat4::identity().into(),
        });
        self.draw_order.push(handle);
        self.dirty.mark_all();
        Ok(handle)
    }

    /// Set the model matrix of a registered mesh
    ///
    /// Takes effect on the next frame's uniform update; no command
    /// buffer re-record is needed.
    pub fn set_transform(&mut self, handle: MeshHandle, model: &Mat4) -> VulkanResult<()> {
        let entry = self
            .meshes
            .get_mut(handle)
            .ok_or(VulkanError::ResourceNotFound { kind: "mesh" })?;
        entry.model = (*model).into();
        Ok(())
    }

    /// Remove a mesh from the draw list and free its buffers
    pub fn remove_mesh(&mut self, handle: MeshHandle) -> VulkanResult<()> {
        if !self.meshes.contains_key(handle) {
            return Err(VulkanError::ResourceNotFound { kind: "mesh" });
        }

        // The buffers may still be referenced by in-flight frames.
        self.context.wait_idle()?;

        self.meshes.remove(handle);
        self.draw_order.retain(|&h| h != handle);
        self.dirty.mark_all();
        Ok(())
    }

    /// Render one frame from the camera's point of view
    ///
    /// Returns `FrameOutcome::SwapchainRebuilt` when the swapchain was
    /// stale (resize, minimize) and had to be rebuilt; the caller just
    /// calls `render` again next iteration. Fatal device errors are
    /// returned as `Err`.
    pub fn render(&mut self, window: &mut Window, camera: &Camera) -> VulkanResult<FrameOutcome> {
        let frame = self.frame_slots.current();
        self.frame_sync[frame].in_flight.wait(u64::MAX)?;

        let swapchain = self.context.swapchain()?;
        let acquire_result = unsafe {
            swapchain.loader().acquire_next_image(
                swapchain.handle(),
                u64::MAX,
                self.frame_sync[frame].image_available.handle(),
                vk::Fence::null(),
            )
        };

        let image_index = match acquire_result {
            Ok((index, _suboptimal)) => index as usize,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                self.rebuild_swapchain(window)?;
                return Ok(FrameOutcome::SwapchainRebuilt);
            }
            Err(e) => return Err(VulkanError::Api(e)),
        };

        // If an earlier frame still renders into this image, wait for it
        // before touching its uniforms or command buffer.
        let image_fence = self.context.swapchain()?.image_fence(image_index);
        if image_fence != vk::Fence::null() {
            unsafe {
                self.context
                    .device()
                    .device
                    .wait_for_fences(&[image_fence], true, u64::MAX)
                    .map_err(VulkanError::Api)?;
            }
        }
        let frame_fence = self.frame_sync[frame].in_flight.handle();
        self.context
            .swapchain_mut()?
            .set_image_fence(image_index, frame_fence);

        for material in self.materials.values_mut() {
            material.flush_uniforms()?;
        }

        if self.dirty.is_dirty(image_index) {
            self.record_command_buffer(image_index)?;
            self.dirty.clear(image_index);
        }

        self.update_global_uniforms(image_index, camera)?;

        self.frame_sync[frame].in_flight.reset()?;

        let wait_semaphores = [self.frame_sync[frame].image_available.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [self.command_buffers[image_index]];
        let signal_semaphores = [self.frame_sync[frame].render_finished.handle()];

        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores)
            .build();

        unsafe {
            self.context
                .device()
                .device
                .queue_submit(self.context.graphics_queue(), &[submit_info], frame_fence)
                .map_err(VulkanError::Api)?;
        }

        let swapchain = self.context.swapchain()?;
        let swapchains = [swapchain.handle()];
        let image_indices = [image_index as u32];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let present_result = unsafe {
            swapchain
                .loader()
                .queue_present(self.context.present_queue(), &present_info)
        };

        let resized = window.take_framebuffer_resized();
        let needs_rebuild = match present_result {
            Ok(suboptimal) => suboptimal || resized,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => true,
            Err(e) => return Err(VulkanError::Api(e)),
        };

        self.frame_slots.advance();

        if needs_rebuild {
            self.rebuild_swapchain(window)?;
            return Ok(FrameOutcome::SwapchainRebuilt);
        }

        Ok(FrameOutcome::Rendered)
    }

    fn update_global_uniforms(&self, image_index: usize, camera: &Camera) -> VulkanResult<()> {
        let extent = self.context.swapchain()?.extent();
        let aspect = extent.width as f32 / extent.height.max(1) as f32;

        let mut uniforms = GlobalUniforms::default();
        uniforms.view = camera.view_matrix().into();
        uniforms.proj = camera.projection_matrix(aspect).into();
        let eye = camera.transform.position;
        uniforms.camera_pos = [eye.x, eye.y, eye.z, 1.0];

        for (object_index, &handle) in self.draw_order.iter().enumerate() {
            if let Some(entry) = self.meshes.get(handle) {
                uniforms.model[object_index] = entry.model;
            }
        }

        self.global_uniforms
            .get(image_index)
            .ok_or(VulkanError::ResourceNotFound {
                kind: "global uniform buffer",
            })?
            .update(&uniforms)
    }

    fn record_command_buffer(&mut self, image_index: usize) -> VulkanResult<()> {
        let device = self.context.raw_device();

        // Resolve pipelines and descriptor sets before recording starts;
        // lazy material sets may allocate from the pool here.
        let mut draws = Vec::with_capacity(self.draw_order.len());
        for (object_index, &handle) in self.draw_order.iter().enumerate() {
            let entry = self
                .meshes
                .get(handle)
                .ok_or(VulkanError::ResourceNotFound { kind: "mesh" })?;
            let material = self
                .materials
                .get_mut(entry.material)
                .ok_or(VulkanError::ResourceNotFound { kind: "material" })?;
            let material_type = self.material_manager.get(material.type_name())?;
            let material_set = material.descriptor_set(
                &device,
                &self.descriptor_pool,
                material_type.layout(),
                &self.textures,
            )?;
            let pipeline = material_type.pipeline()?;

            draws.push(DrawCommand {
                pipeline: pipeline.handle(),
                layout: pipeline.layout(),
                material_set,
                vertex_buffer: entry.vertex_buffer.handle(),
                index_buffer: entry.index_buffer.handle(),
                index_count: entry.index_buffer.index_count(),
                object_index: object_index as u32,
            });
        }

        let render_pass = self
            .render_pass
            .as_ref()
            .ok_or(VulkanError::ResourceNotFound { kind: "render pass" })?
            .handle();
        let framebuffer = self
            .framebuffers
            .get(image_index)
            .ok_or(VulkanError::ResourceNotFound { kind: "framebuffer" })?
            .handle();
        let extent = self.context.swapchain()?.extent();
        let global_set = self.global_sets[image_index];

        let clear_values = [
            vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: self.clear_color,
                },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            },
        ];

        let mut recorder = CommandRecorder::new(device, self.command_buffers[image_index]);
        recorder.begin()?;
        {
            let mut pass =
                recorder.begin_render_pass(render_pass, framebuffer, extent, &clear_values)?;

            let mut bound_pipeline = vk::Pipeline::null();
            for draw in &draws {
                if draw.pipeline != bound_pipeline {
                    pass.bind_pipeline(draw.pipeline);
                    bound_pipeline = draw.pipeline;
                }
                pass.bind_descriptor_sets(draw.layout, 0, &[global_set, draw.material_set]);
                debug_assert_eq!(
                    draw.object_index.to_ne_bytes().len(),
                    PUSH_CONSTANT_SIZE as usize
                );
                pass.push_constants(
                    draw.layout,
                    vk::ShaderStageFlags::VERTEX,
                    0,
                    &draw.object_index.to_ne_bytes(),
                );
                pass.bind_vertex_buffers(&[draw.vertex_buffer], &[0]);
                pass.bind_index_buffer(draw.index_buffer, vk::IndexType::UINT32);
                pass.draw_indexed(draw.index_count);
            }
        }
        recorder.end()?;
        Ok(())
    }

    /// Tear down and recreate everything tied to the swapchain
    ///
    /// Blocks while the framebuffer has zero extent (minimized window).
    /// Material descriptor sets heal themselves through the pool
    /// generation; material uniform buffers and layouts persist.
    pub fn rebuild_swapchain(&mut self, window: &mut Window) -> VulkanResult<()> {
        let mut size = window.get_framebuffer_size();
        while size.0 == 0 || size.1 == 0 {
            window.wait_events();
            size = window.get_framebuffer_size();
        }

        self.context.wait_idle()?;

        // Teardown, in dependency order.
        self.framebuffers.clear();
        self.depth_buffer = None;
        self.global_uniforms.clear();
        self.global_sets.clear();
        self.descriptor_pool.reset()?;
        self.command_pool.free_command_buffers(&self.command_buffers);
        self.command_buffers.clear();
        self.material_manager.destroy_pipelines();
        self.render_pass = None;

        self.context.recreate_swapchain(size)?;

        // Recreation, mirroring initial construction.
        let device = self.context.raw_device();
        let memory_properties = self.context.memory_properties();
        let swapchain = self.context.swapchain()?;
        let extent = swapchain.extent();
        let color_format = swapchain.format().format;
        let image_count = swapchain.image_count();

        let render_pass = RenderPass::new_forward_pass(device.clone(), color_format)?;
        self.material_manager.rebuild_pipelines(
            &device,
            render_pass.handle(),
            self.global_layout.handle(),
            extent,
        )?;

        let depth_buffer = DepthBuffer::new(device.clone(), &memory_properties, extent)?;
        self.framebuffers = Self::create_framebuffers(
            &self.context,
            render_pass.handle(),
            depth_buffer.view(),
            extent,
        )?;

        self.command_buffers = self
            .command_pool
            .allocate_command_buffers(image_count as u32)?;

        let (global_uniforms, global_sets) = Self::create_global_bindings(
            &self.context,
            &mut self.descriptor_pool,
            &self.global_layout,
            image_count,
        )?;
        self.global_uniforms = global_uniforms;
        self.global_sets = global_sets;

        self.depth_buffer = Some(depth_buffer);
        self.render_pass = Some(render_pass);
        self.dirty = DirtyFlags::new(image_count);

        log::debug!(
            "Swapchain rebuilt: {}x{}, {} images",
            extent.width,
            extent.height,
            image_count
        );
        Ok(())
    }

    /// Block until the device finishes all submitted work
    pub fn wait_idle(&self) -> VulkanResult<()> {
        self.context.wait_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame slots cycle 0, 1, 0, 1 with two frames in flight
    #[test]
    fn frame_slots_cycle() {
        let mut slots = FrameSlots::new(2);
        let observed: Vec<usize> = (0..5)
            .map(|_| {
                let slot = slots.current();
                slots.advance();
                slot
            })
            .collect();
        assert_eq!(observed, vec![0, 1, 0, 1, 0]);
    }

    /// Registration-style events dirty every buffer; recording one image
    /// clears only that image.
    #[test]
    fn dirty_flags_propagate_per_image() {
        let mut dirty = DirtyFlags::new(3);
        assert!((0..3).all(|i| dirty.is_dirty(i)));

        dirty.clear(0);
        dirty.clear(1);
        dirty.clear(2);
        assert!((0..3).all(|i| !dirty.is_dirty(i)));

        dirty.mark_all();
        dirty.clear(1);
        assert!(dirty.is_dirty(0));
        assert!(!dirty.is_dirty(1));
        assert!(dirty.is_dirty(2));
    }

    /// Out-of-range images report dirty so a stale index is re-recorded
    #[test]
    fn dirty_flags_out_of_range_is_dirty() {
        let dirty = DirtyFlags::new(2);
        assert!(dirty.is_dirty(7));
    }

    #[test]
    fn global_uniforms_fit_guaranteed_ubo_range() {
        // maxUniformBufferRange is at least 16384 on all conforming devices.
        assert!(std::mem::size_of::<GlobalUniforms>() <= 16384);
        assert_eq!(
            std::mem::size_of::<GlobalUniforms>(),
            (MAX_OBJECTS + 2) * 64 + 16
        );
    }

    #[test]
    fn global_uniforms_default_places_camera_at_origin() {
        let uniforms = GlobalUniforms::default();
        assert_eq!(uniforms.camera_pos, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms.view[0][0], 1.0);
        assert_eq!(uniforms.model[MAX_OBJECTS - 1][3][3], 1.0);
    }
}
