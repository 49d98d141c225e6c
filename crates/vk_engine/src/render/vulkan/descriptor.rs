//! Descriptor set layouts, pool, and writes
//!
//! The pool carries a generation counter bumped on every reset. Material
//! descriptor sets remember the generation they were allocated under and
//! rebuild themselves lazily when the pool has moved on, which replaces
//! handle-null checks after a swapchain rebuild.

use ash::{vk, Device};

use crate::render::vulkan::{VulkanError, VulkanResult};

/// Builder for descriptor set layouts
#[derive(Default)]
pub struct DescriptorSetLayoutBuilder {
    bindings: Vec<vk::DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayoutBuilder {
    /// Start an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a uniform buffer binding
    pub fn add_uniform_buffer(mut self, binding: u32, stage_flags: vk::ShaderStageFlags) -> Self {
        self.bindings.push(
            vk::DescriptorSetLayoutBinding::builder()
                .binding(binding)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .descriptor_count(1)
                .stage_flags(stage_flags)
                .build(),
        );
        self
    }

    /// Add a combined image sampler binding
    pub fn add_combined_image_sampler(
        mut self,
        binding: u32,
        stage_flags: vk::ShaderStageFlags,
    ) -> Self {
        self.bindings.push(
            vk::DescriptorSetLayoutBinding::builder()
                .binding(binding)
                .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .descriptor_count(1)
                .stage_flags(stage_flags)
                .build(),
        );
        self
    }

    /// Build the layout
    pub fn build(self, device: Device) -> VulkanResult<DescriptorSetLayout> {
        let create_info = vk::DescriptorSetLayoutCreateInfo::builder().bindings(&self.bindings);

        let layout = unsafe {
            device
                .create_descriptor_set_layout(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        Ok(DescriptorSetLayout { device, layout })
    }
}

/// Descriptor set layout wrapper with RAII cleanup
pub struct DescriptorSetLayout {
    device: Device,
    layout: vk::DescriptorSetLayout,
}

impl DescriptorSetLayout {
    /// Get the layout handle
    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.layout
    }
}

impl Drop for DescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

/// Descriptor sets allocated per swapchain image, with generous slack
/// for materials created at runtime.
const SETS_PER_IMAGE: u32 = 30;

/// Descriptor pool with a generation counter
pub struct DescriptorPool {
    device: Device,
    pool: vk::DescriptorPool,
    generation: u64,
}

impl DescriptorPool {
    /// Create a pool sized for the given swapchain image count
    pub fn new(device: Device, image_count: u32) -> VulkanResult<Self> {
        let capacity = SETS_PER_IMAGE * image_count.max(1);

        let pool_sizes = [
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::UNIFORM_BUFFER,
                descriptor_count: capacity,
            },
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
                descriptor_count: capacity,
            },
        ];

        let create_info = vk::DescriptorPoolCreateInfo::builder()
            .pool_sizes(&pool_sizes)
            .max_sets(capacity);

        let pool = unsafe {
            device
                .create_descriptor_pool(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        Ok(Self {
            device,
            pool,
            generation: 0,
        })
    }

    /// Allocate one descriptor set with the given layout
    pub fn allocate(&self, layout: vk::DescriptorSetLayout) -> VulkanResult<vk::DescriptorSet> {
        let layouts = [layout];
        let alloc_info = vk::DescriptorSetAllocateInfo::builder()
            .descriptor_pool(self.pool)
            .set_layouts(&layouts);

        let sets = unsafe {
            self.device
                .allocate_descriptor_sets(&alloc_info)
                .map_err(VulkanError::Api)?
        };

        Ok(sets[0])
    }

    /// Return every allocated set to the pool and advance the generation
    ///
    /// All previously allocated descriptor sets become invalid; holders
    /// detect this through [`DescriptorPool::generation`].
    pub fn reset(&mut self) -> VulkanResult<()> {
        unsafe {
            self.device
                .reset_descriptor_pool(self.pool, vk::DescriptorPoolResetFlags::empty())
                .map_err(VulkanError::Api)?;
        }
        self.generation += 1;
        Ok(())
    }

    /// Current pool generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get the pool handle
    pub fn handle(&self) -> vk::DescriptorPool {
        self.pool
    }
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_descriptor_pool(self.pool, None);
        }
    }
}

/// Batches descriptor writes for one set
pub struct DescriptorSetWriter {
    set: vk::DescriptorSet,
    buffer_infos: Vec<(u32, vk::DescriptorBufferInfo)>,
    image_infos: Vec<(u32, vk::DescriptorImageInfo)>,
}

impl DescriptorSetWriter {
    /// Start a write batch for a set
    pub fn new(set: vk::DescriptorSet) -> Self {
        Self {
            set,
            buffer_infos: Vec::new(),
            image_infos: Vec::new(),
        }
    }

    /// Queue a uniform buffer write
    pub fn write_buffer(mut self, binding: u32, buffer: vk::Buffer, range: vk::DeviceSize) -> Self {
        self.buffer_infos.push((
            binding,
            vk::DescriptorBufferInfo {
                buffer,
                offset: 0,
                range,
            },
        ));
        self
    }

    /// Queue a combined image sampler write
    pub fn write_image(mut self, binding: u32, view: vk::ImageView, sampler: vk::Sampler) -> Self {
        self.image_infos.push((
            binding,
            vk::DescriptorImageInfo {
                sampler,
                image_view: view,
                image_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            },
        ));
        self
    }

    /// Flush all queued writes to the device
    pub fn update(self, device: &Device) {
        let mut writes = Vec::with_capacity(self.buffer_infos.len() + self.image_infos.len());

        for (binding, info) in &self.buffer_infos {
            writes.push(
                vk::WriteDescriptorSet::builder()
                    .dst_set(self.set)
                    .dst_binding(*binding)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .buffer_info(std::slice::from_ref(info))
                    .build(),
            );
        }

        for (binding, info) in &self.image_infos {
            writes.push(
                vk::WriteDescriptorSet::builder()
                    .dst_set(self.set)
                    .dst_binding(*binding)
                    .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                    .image_info(std::slice::from_ref(info))
                    .build(),
            );
        }

        unsafe {
            device.update_descriptor_sets(&writes, &[]);
        }
    }
}
