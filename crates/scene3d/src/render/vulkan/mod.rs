//! Vulkan rendering backend
//!
//! Thin ownership wrappers over ash handles. Every wrapper destroys what it
//! creates in Drop, and the renderer orders its fields so the device
//! outlives everything created from it.

pub mod buffer;
pub mod commands;
pub mod context;
pub mod descriptor_set;
pub mod framebuffer;
pub mod render_pass;
pub mod renderer;
pub mod shader;
pub mod surface;
pub mod swapchain;
pub mod sync;
pub mod vertex_layout;

pub use buffer::{Buffer, IndexBuffer, UniformBuffer, VertexBuffer};
pub use commands::{CommandPool, CommandRecorder};
pub use context::{
    LogicalDevice, PhysicalDeviceInfo, VulkanContext, VulkanError, VulkanInstance, VulkanResult,
};
pub use descriptor_set::{DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder};
pub use framebuffer::{DepthBuffer, Framebuffer};
pub use render_pass::RenderPass;
pub use renderer::VulkanRenderer;
pub use shader::{GraphicsPipeline, ShaderModule};
pub use surface::Surface;
pub use swapchain::Swapchain;
pub use sync::{Fence, FrameSync, Semaphore};
pub use vertex_layout::VertexLayout;
