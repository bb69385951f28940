//! GPU buffer management with RAII cleanup
//!
//! All buffers use host-visible coherent memory: scene meshes are uploaded
//! once when the scene is attached and uniform data is rewritten per frame,
//! so a staging path would buy nothing here.

use std::marker::PhantomData;

use ash::{vk, Device, Instance};
use bytemuck::Pod;

use crate::render::vulkan::context::{VulkanError, VulkanResult};

/// Find a memory type matching the filter and property requirements
pub fn find_memory_type(
    instance: &Instance,
    physical_device: vk::PhysicalDevice,
    type_filter: u32,
    properties: vk::MemoryPropertyFlags,
) -> VulkanResult<u32> {
    let mem_properties =
        unsafe { instance.get_physical_device_memory_properties(physical_device) };

    for i in 0..mem_properties.memory_type_count {
        if (type_filter & (1 << i)) != 0
            && mem_properties.memory_types[i as usize]
                .property_flags
                .contains(properties)
        {
            return Ok(i);
        }
    }

    Err(VulkanError::NoSuitableMemoryType)
}

/// Raw buffer with bound device memory
pub struct Buffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    size: vk::DeviceSize,
}

impl Buffer {
    /// Create a buffer and allocate memory for it
    pub fn new(
        device: Device,
        instance: Instance,
        physical_device: vk::PhysicalDevice,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<Self> {
        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe {
            device
                .create_buffer(&buffer_info, None)
                .map_err(VulkanError::Api)?
        };

        let mem_requirements = unsafe { device.get_buffer_memory_requirements(buffer) };

        let memory_type_index = find_memory_type(
            &instance,
            physical_device,
            mem_requirements.memory_type_bits,
            properties,
        )?;

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(mem_requirements.size)
            .memory_type_index(memory_type_index);

        let memory = unsafe {
            device
                .allocate_memory(&alloc_info, None)
                .map_err(VulkanError::Api)?
        };

        unsafe {
            device
                .bind_buffer_memory(buffer, memory, 0)
                .map_err(VulkanError::Api)?;
        }

        Ok(Self {
            device,
            buffer,
            memory,
            size,
        })
    }

    /// Write data into the buffer
    ///
    /// The buffer must have been created with host-visible memory.
    pub fn write_data<T: Pod>(&self, data: &[T]) -> VulkanResult<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);

        unsafe {
            let ptr = self
                .device
                .map_memory(self.memory, 0, self.size, vk::MemoryMapFlags::empty())
                .map_err(VulkanError::Api)? as *mut u8;

            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());

            self.device.unmap_memory(self.memory);
        }

        Ok(())
    }

    /// Get the buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Get the buffer size in bytes
    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_buffer(self.buffer, None);
            self.device.free_memory(self.memory, None);
        }
    }
}

/// Vertex buffer for mesh geometry
pub struct VertexBuffer {
    buffer: Buffer,
    vertex_count: u32,
}

impl VertexBuffer {
    /// Create a vertex buffer and upload the vertex data
    pub fn new<T: Pod>(
        device: Device,
        instance: Instance,
        physical_device: vk::PhysicalDevice,
        vertices: &[T],
    ) -> VulkanResult<Self> {
        let size = std::mem::size_of_val(vertices) as vk::DeviceSize;

        let buffer = Buffer::new(
            device,
            instance,
            physical_device,
            size,
            vk::BufferUsageFlags::VERTEX_BUFFER,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;

        buffer.write_data(vertices)?;

        Ok(Self {
            buffer,
            vertex_count: vertices.len() as u32,
        })
    }

    /// Get the buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer.handle()
    }

    /// Get the vertex count
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Index buffer for indexed drawing
pub struct IndexBuffer {
    buffer: Buffer,
    index_count: u32,
}

impl IndexBuffer {
    /// Create an index buffer and upload the index data
    pub fn new(
        device: Device,
        instance: Instance,
        physical_device: vk::PhysicalDevice,
        indices: &[u32],
    ) -> VulkanResult<Self> {
        let size = std::mem::size_of_val(indices) as vk::DeviceSize;

        let buffer = Buffer::new(
            device,
            instance,
            physical_device,
            size,
            vk::BufferUsageFlags::INDEX_BUFFER,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;

        buffer.write_data(indices)?;

        Ok(Self {
            buffer,
            index_count: indices.len() as u32,
        })
    }

    /// Get the buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer.handle()
    }

    /// Get the index count
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// Typed uniform buffer rewritten from the CPU each frame
pub struct UniformBuffer<T: Pod> {
    buffer: Buffer,
    _phantom: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    /// Create a uniform buffer sized for one `T` and write the initial value
    pub fn new(
        device: Device,
        instance: Instance,
        physical_device: vk::PhysicalDevice,
        initial: &T,
    ) -> VulkanResult<Self> {
        let size = std::mem::size_of::<T>() as vk::DeviceSize;

        let buffer = Buffer::new(
            device,
            instance,
            physical_device,
            size,
            vk::BufferUsageFlags::UNIFORM_BUFFER,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;

        buffer.write_data(std::slice::from_ref(initial))?;

        Ok(Self {
            buffer,
            _phantom: PhantomData,
        })
    }

    /// Overwrite the buffer contents
    pub fn update(&self, data: &T) -> VulkanResult<()> {
        self.buffer.write_data(std::slice::from_ref(data))
    }

    /// Get the buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer.handle()
    }

    /// Get the buffer size in bytes
    pub fn size(&self) -> vk::DeviceSize {
        self.buffer.size()
    }
}
