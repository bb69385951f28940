//! Forward renderer
//!
//! Owns the full Vulkan object graph for the untextured forward pass and
//! records one command buffer per frame from a retained draw list. Camera
//! and lighting state live in uniform buffers duplicated per frame in
//! flight; per-shape state rides in push constants.

use ash::vk;
use bytemuck::Zeroable;

use crate::config::RendererConfig;
use crate::foundation::math::Mat3;
use crate::render::camera::Camera;
use crate::render::lighting::{Light, LightKind, MAX_DIRECTIONAL_LIGHTS};
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::render::vulkan::buffer::{IndexBuffer, UniformBuffer, VertexBuffer};
use crate::render::vulkan::commands::CommandPool;
use crate::render::vulkan::context::{VulkanContext, VulkanError, VulkanResult};
use crate::render::vulkan::descriptor_set::{
    DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder,
};
use crate::render::vulkan::framebuffer::{DepthBuffer, Framebuffer};
use crate::render::vulkan::render_pass::RenderPass;
use crate::render::vulkan::shader::{GraphicsPipeline, ShaderModule};
use crate::render::vulkan::sync::{FrameSync, Semaphore};
use crate::render::vulkan::vertex_layout::VertexLayout;
use crate::scene::DrawItem;
use crate::window::Window;

/// Per-frame camera state, laid out to match the vertex shader block
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct CameraUniformData {
    view_matrix: [[f32; 4]; 4],
    projection_matrix: [[f32; 4]; 4],
    view_projection_matrix: [[f32; 4]; 4],
    camera_position: [f32; 4],
}

unsafe impl bytemuck::Pod for CameraUniformData {}
unsafe impl bytemuck::Zeroable for CameraUniformData {}

impl CameraUniformData {
    fn identity() -> Self {
        let identity: [[f32; 4]; 4] = crate::foundation::math::Mat4::identity().into();
        Self {
            view_matrix: identity,
            projection_matrix: identity,
            view_projection_matrix: identity,
            camera_position: [0.0, 0.0, 0.0, 1.0],
        }
    }

    fn from_camera(camera: &Camera) -> Self {
        Self {
            view_matrix: camera.view_matrix().into(),
            projection_matrix: camera.projection_matrix().into(),
            view_projection_matrix: camera.view_projection_matrix().into(),
            camera_position: [
                camera.position.x,
                camera.position.y,
                camera.position.z,
                1.0,
            ],
        }
    }
}

/// Per-frame lighting state, laid out to match the fragment shader block
///
/// Directions and colors are fixed-size arrays; `light_counts[0]` holds the
/// number of active directional lights. Ambient contributions from every
/// active ambient light are pre-summed into `ambient_color`.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy)]
struct LightingUniformData {
    ambient_color: [f32; 4],
    light_directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    light_colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    light_counts: [u32; 4],
}

unsafe impl bytemuck::Pod for LightingUniformData {}
unsafe impl bytemuck::Zeroable for LightingUniformData {}

impl LightingUniformData {
    fn from_lights(lights: &[&Light]) -> Self {
        let mut data = Self::zeroed();
        let mut count = 0;
        let mut dropped = 0;
        for light in lights {
            match light.kind() {
                LightKind::Ambient => {
                    data.ambient_color[0] += light.color[0];
                    data.ambient_color[1] += light.color[1];
                    data.ambient_color[2] += light.color[2];
                }
                LightKind::Directional { .. } => {
                    let direction = match light.direction() {
                        Some(direction) => direction,
                        None => continue,
                    };
                    if count == MAX_DIRECTIONAL_LIGHTS {
                        dropped += 1;
                        continue;
                    }
                    data.light_directions[count] = [direction.x, direction.y, direction.z, 0.0];
                    data.light_colors[count] =
                        [light.color[0], light.color[1], light.color[2], 1.0];
                    count += 1;
                }
            }
        }
        if dropped > 0 {
            log::warn!(
                "Dropped {} directional lights over the {} slot limit",
                dropped,
                MAX_DIRECTIONAL_LIGHTS
            );
        }
        data.light_counts[0] = count as u32;
        data
    }
}

/// Per-draw state pushed with each draw call
///
/// Packed to exactly 128 bytes, the push constant budget every Vulkan
/// implementation guarantees. The otherwise padded w lanes of the normal
/// matrix columns carry the specular color, and `material_color.w` carries
/// the shininess exponent; zero shininess selects the unlit vertex-color
/// path in the fragment shader.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct PushConstants {
    model_matrix: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 3],
    material_color: [f32; 4],
}

unsafe impl bytemuck::Pod for PushConstants {}
unsafe impl bytemuck::Zeroable for PushConstants {}

impl PushConstants {
    fn for_item(item: &DrawItem) -> Self {
        let model = &item.world;
        let linear = Mat3::new(
            model[(0, 0)],
            model[(0, 1)],
            model[(0, 2)],
            model[(1, 0)],
            model[(1, 1)],
            model[(1, 2)],
            model[(2, 0)],
            model[(2, 1)],
            model[(2, 2)],
        );
        // Normals transform by the inverse transpose so non-uniform scale
        // does not skew them.
        let normal = match linear.try_inverse() {
            Some(inverse) => inverse.transpose(),
            None => {
                log::warn!("Model matrix is not invertible, using identity for normal matrix");
                Mat3::identity()
            }
        };

        let (diffuse, specular, shininess) = match item.material {
            Material::VertexColor => ([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], 0.0),
            Material::Lit(phong) => (phong.diffuse, phong.specular, phong.shininess),
        };

        Self {
            model_matrix: item.world.into(),
            normal_matrix: [
                [normal[(0, 0)], normal[(1, 0)], normal[(2, 0)], specular[0]],
                [normal[(0, 1)], normal[(1, 1)], normal[(2, 1)], specular[1]],
                [normal[(0, 2)], normal[(1, 2)], normal[(2, 2)], specular[2]],
            ],
            material_color: [diffuse[0], diffuse[1], diffuse[2], shininess],
        }
    }
}

/// Geometry uploaded to the GPU, addressed by shape index
struct GpuMesh {
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
}

/// Vulkan forward renderer
///
/// Fields are ordered so Drop releases every resource before the context
/// destroys the device.
pub struct VulkanRenderer {
    /// Command buffers from earlier frames, freed once their fence signals
    pending_command_buffers: Vec<Option<vk::CommandBuffer>>,
    current_frame: usize,
    max_frames_in_flight: usize,
    clear_color: [f32; 4],
    prefer_vsync: bool,
    /// Uniform state staged on the CPU, written to the current frame's
    /// buffers once its fence has signaled
    camera_data: CameraUniformData,
    lighting_data: LightingUniformData,
    frame_sync_objects: Vec<FrameSync>,
    /// One per swapchain image; present waits on the image's own semaphore
    render_finished_semaphores: Vec<Semaphore>,
    meshes: Vec<GpuMesh>,
    camera_ubos: Vec<UniformBuffer<CameraUniformData>>,
    lighting_ubos: Vec<UniformBuffer<LightingUniformData>>,
    descriptor_sets: Vec<vk::DescriptorSet>,
    descriptor_pool: DescriptorPool,
    descriptor_set_layout: DescriptorSetLayout,
    framebuffers: Vec<Framebuffer>,
    depth_buffers: Vec<DepthBuffer>,
    command_pool: CommandPool,
    pipeline: GraphicsPipeline,
    render_pass: RenderPass,
    context: VulkanContext,
}

impl VulkanRenderer {
    /// Create a renderer targeting the given window
    pub fn new(window: &Window, config: &RendererConfig, prefer_vsync: bool) -> VulkanResult<Self> {
        let (width, height) = window.framebuffer_size();
        let window_extent = vk::Extent2D { width, height };
        let enable_validation = config.enable_validation.unwrap_or(cfg!(debug_assertions));

        let context = VulkanContext::new(
            window,
            &config.application_name,
            config.application_version,
            enable_validation,
            window_extent,
            prefer_vsync,
        )?;

        let device = context.raw_device();
        let instance = context.instance().clone();
        let physical_device = context.physical_device().device;

        let render_pass =
            RenderPass::new_forward_pass(device.clone(), context.swapchain().format().format)?;

        let vertex_shader = ShaderModule::from_file(&device, &config.shaders.vertex_shader_path)?;
        let fragment_shader =
            ShaderModule::from_file(&device, &config.shaders.fragment_shader_path)?;

        let binding_descriptions = [VertexLayout::binding_description()];
        let attribute_descriptions = VertexLayout::attribute_descriptions();
        let vertex_input_info = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(&binding_descriptions)
            .vertex_attribute_descriptions(&attribute_descriptions)
            .build();

        let descriptor_set_layout = DescriptorSetLayoutBuilder::new()
            .add_uniform_buffer(
                0,
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            )
            .add_uniform_buffer(1, vk::ShaderStageFlags::FRAGMENT)
            .build(&device)?;

        let pipeline = GraphicsPipeline::new(
            &device,
            render_pass.handle(),
            &vertex_shader,
            &fragment_shader,
            vertex_input_info,
            &[descriptor_set_layout.handle()],
        )?;
        log::debug!("Graphics pipeline created");

        let max_frames_in_flight = config.max_frames_in_flight.max(1);
        let descriptor_pool = DescriptorPool::new(device.clone(), max_frames_in_flight as u32)?;
        let command_pool = CommandPool::new(device.clone(), context.graphics_queue_family())?;

        let (depth_buffers, framebuffers) = Self::create_framebuffers(&context, &render_pass)?;

        let image_count = context.swapchain().image_count() as usize;
        let mut render_finished_semaphores = Vec::with_capacity(image_count);
        for _ in 0..image_count {
            render_finished_semaphores.push(Semaphore::new(device.clone())?);
        }
        let mut frame_sync_objects = Vec::with_capacity(max_frames_in_flight);
        for _ in 0..max_frames_in_flight {
            frame_sync_objects.push(FrameSync::new(device.clone())?);
        }

        let camera_data = CameraUniformData::identity();
        let lighting_data = LightingUniformData::zeroed();
        let mut camera_ubos = Vec::with_capacity(max_frames_in_flight);
        let mut lighting_ubos = Vec::with_capacity(max_frames_in_flight);
        for _ in 0..max_frames_in_flight {
            camera_ubos.push(UniformBuffer::new(
                device.clone(),
                instance.clone(),
                physical_device,
                &camera_data,
            )?);
            lighting_ubos.push(UniformBuffer::new(
                device.clone(),
                instance.clone(),
                physical_device,
                &lighting_data,
            )?);
        }

        let set_layouts = vec![descriptor_set_layout.handle(); max_frames_in_flight];
        let descriptor_sets = descriptor_pool.allocate_descriptor_sets(&set_layouts)?;
        for frame in 0..max_frames_in_flight {
            // The buffer info arrays must outlive update_descriptor_sets;
            // the write structs only borrow them.
            let camera_info = [vk::DescriptorBufferInfo::builder()
                .buffer(camera_ubos[frame].handle())
                .offset(0)
                .range(camera_ubos[frame].size())
                .build()];
            let lighting_info = [vk::DescriptorBufferInfo::builder()
                .buffer(lighting_ubos[frame].handle())
                .offset(0)
                .range(lighting_ubos[frame].size())
                .build()];
            let writes = [
                vk::WriteDescriptorSet::builder()
                    .dst_set(descriptor_sets[frame])
                    .dst_binding(0)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .buffer_info(&camera_info)
                    .build(),
                vk::WriteDescriptorSet::builder()
                    .dst_set(descriptor_sets[frame])
                    .dst_binding(1)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .buffer_info(&lighting_info)
                    .build(),
            ];
            unsafe { device.update_descriptor_sets(&writes, &[]) };
        }

        log::info!(
            "Vulkan renderer initialized: {} swapchain images, {} frames in flight",
            image_count,
            max_frames_in_flight
        );

        Ok(Self {
            pending_command_buffers: vec![None; max_frames_in_flight],
            current_frame: 0,
            max_frames_in_flight,
            clear_color: config.clear_color,
            prefer_vsync,
            camera_data,
            lighting_data,
            frame_sync_objects,
            render_finished_semaphores,
            meshes: Vec::new(),
            camera_ubos,
            lighting_ubos,
            descriptor_sets,
            descriptor_pool,
            descriptor_set_layout,
            framebuffers,
            depth_buffers,
            command_pool,
            pipeline,
            render_pass,
            context,
        })
    }

    fn create_framebuffers(
        context: &VulkanContext,
        render_pass: &RenderPass,
    ) -> VulkanResult<(Vec<DepthBuffer>, Vec<Framebuffer>)> {
        let extent = context.swapchain().extent();
        let mut depth_buffers = Vec::new();
        let mut framebuffers = Vec::new();
        for image_view in context.swapchain().image_views() {
            let depth_buffer = DepthBuffer::new(
                context.raw_device(),
                context.instance(),
                context.physical_device().device,
                extent,
            )?;
            let framebuffer = Framebuffer::new(
                context.raw_device(),
                render_pass.handle(),
                &[*image_view, depth_buffer.image_view()],
                extent,
            )?;
            depth_buffers.push(depth_buffer);
            framebuffers.push(framebuffer);
        }
        Ok((depth_buffers, framebuffers))
    }

    /// Upload mesh geometry and return the shape index draw items refer to
    pub fn upload_mesh(&mut self, mesh: &Mesh) -> VulkanResult<usize> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(VulkanError::InvalidOperation {
                reason: "cannot upload an empty mesh".to_string(),
            });
        }

        let device = self.context.raw_device();
        let instance = self.context.instance().clone();
        let physical_device = self.context.physical_device().device;

        let vertex_buffer = VertexBuffer::new(
            device.clone(),
            instance.clone(),
            physical_device,
            &mesh.vertices,
        )?;
        let index_buffer = IndexBuffer::new(device, instance, physical_device, &mesh.indices)?;

        let index = self.meshes.len();
        log::debug!(
            "Uploaded mesh {}: {} vertices, {} indices",
            index,
            vertex_buffer.vertex_count(),
            index_buffer.index_count()
        );
        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
        });
        Ok(index)
    }

    /// Stage camera state for the next recorded frame
    pub fn update_camera(&mut self, camera: &Camera) {
        self.camera_data = CameraUniformData::from_camera(camera);
    }

    /// Stage lighting state for the next recorded frame
    pub fn update_lighting(&mut self, lights: &[&Light]) {
        self.lighting_data = LightingUniformData::from_lights(lights);
    }

    /// Record, submit and present one frame of the draw list
    ///
    /// Returns `Err(VulkanError::Api(ERROR_OUT_OF_DATE_KHR))` when the
    /// swapchain no longer matches the surface; the caller recreates the
    /// swapchain and tries again next frame.
    pub fn draw_frame(&mut self, items: &[DrawItem]) -> VulkanResult<()> {
        for item in items {
            if item.shape_index >= self.meshes.len() {
                return Err(VulkanError::InvalidOperation {
                    reason: format!(
                        "draw item references shape {} but only {} meshes are uploaded",
                        item.shape_index,
                        self.meshes.len()
                    ),
                });
            }
        }

        let frame = self.current_frame;
        self.frame_sync_objects[frame].in_flight.wait(u64::MAX)?;

        if let Some(previous) = self.pending_command_buffers[frame].take() {
            self.command_pool.free_command_buffer(previous);
        }

        // The previous use of this frame slot has retired, so its uniform
        // buffers are safe to overwrite.
        self.camera_ubos[frame].update(&self.camera_data)?;
        self.lighting_ubos[frame].update(&self.lighting_data)?;

        let image_available = self.frame_sync_objects[frame].image_available.handle();
        let acquire_result = unsafe {
            self.context.swapchain_loader().acquire_next_image(
                self.context.swapchain().handle(),
                u64::MAX,
                image_available,
                vk::Fence::null(),
            )
        };
        let (image_index, _suboptimal) = match acquire_result {
            Ok(result) => result,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::warn!("Swapchain out of date during image acquire");
                return Err(VulkanError::Api(vk::Result::ERROR_OUT_OF_DATE_KHR));
            }
            Err(err) => return Err(VulkanError::Api(err)),
        };

        // Reset only after the acquire succeeds so an out-of-date bailout
        // leaves the fence signaled for the next attempt.
        self.frame_sync_objects[frame].in_flight.reset()?;

        let render_finished = self.render_finished_semaphores[image_index as usize].handle();

        let extent = self.context.swapchain().extent();
        let render_area = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };
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

        let mut recorder = self.command_pool.begin_single_time()?;
        {
            let mut pass = recorder.begin_render_pass(
                self.render_pass.handle(),
                self.framebuffers[image_index as usize].handle(),
                render_area,
                &clear_values,
            )?;

            pass.cmd_bind_pipeline(vk::PipelineBindPoint::GRAPHICS, self.pipeline.handle());

            let viewport = vk::Viewport {
                x: 0.0,
                y: 0.0,
                width: extent.width as f32,
                height: extent.height as f32,
                min_depth: 0.0,
                max_depth: 1.0,
            };
            pass.set_viewport(&viewport);
            pass.set_scissor(&render_area);

            pass.cmd_bind_descriptor_sets(
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline.layout(),
                0,
                &self.descriptor_sets[frame..=frame],
                &[],
            );

            for item in items {
                let mesh = &self.meshes[item.shape_index];
                let push = PushConstants::for_item(item);
                pass.cmd_push_constants(
                    self.pipeline.layout(),
                    vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
                    0,
                    bytemuck::cast_slice(&[push]),
                );
                pass.cmd_bind_vertex_buffers(0, &[mesh.vertex_buffer.handle()], &[0]);
                pass.cmd_bind_index_buffer(mesh.index_buffer.handle(), 0, vk::IndexType::UINT32);
                pass.cmd_draw_indexed(mesh.index_buffer.index_count(), 1, 0, 0, 0);
            }
        }
        let command_buffer = recorder.end()?;
        self.pending_command_buffers[frame] = Some(command_buffer);

        let wait_semaphores = [image_available];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [command_buffer];
        let signal_semaphores = [render_finished];
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
                .queue_submit(
                    self.context.graphics_queue(),
                    &[submit_info],
                    self.frame_sync_objects[frame].in_flight.handle(),
                )
                .map_err(VulkanError::Api)?;
        }

        let swapchains = [self.context.swapchain().handle()];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let present_result = unsafe {
            self.context
                .swapchain_loader()
                .queue_present(self.context.present_queue(), &present_info)
        };
        match present_result {
            Ok(_) => {}
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::warn!("Swapchain out of date during present");
                return Err(VulkanError::Api(vk::Result::ERROR_OUT_OF_DATE_KHR));
            }
            Err(err) => return Err(VulkanError::Api(err)),
        }

        self.current_frame = (self.current_frame + 1) % self.max_frames_in_flight;
        Ok(())
    }

    /// Rebuild the swapchain and everything sized to it after a resize
    pub fn recreate_swapchain(&mut self, window: &Window) -> VulkanResult<()> {
        let (width, height) = window.framebuffer_size();
        if width == 0 || height == 0 {
            log::debug!("Window minimized, deferring swapchain recreation");
            return Ok(());
        }

        log::info!("Recreating swapchain at {}x{}", width, height);
        self.wait_idle()?;

        self.context
            .recreate_swapchain(vk::Extent2D { width, height }, self.prefer_vsync)?;

        let (depth_buffers, framebuffers) =
            Self::create_framebuffers(&self.context, &self.render_pass)?;
        self.depth_buffers = depth_buffers;
        self.framebuffers = framebuffers;

        // Per-image sync objects belong to the old swapchain, and the new
        // one may not have the same image count.
        let image_count = self.context.swapchain().image_count() as usize;
        let device = self.context.raw_device();
        self.render_finished_semaphores.clear();
        for _ in 0..image_count {
            self.render_finished_semaphores
                .push(Semaphore::new(device.clone())?);
        }

        Ok(())
    }

    /// Current swapchain extent, for aspect ratio updates
    pub fn swapchain_extent(&self) -> (u32, u32) {
        let extent = self.context.swapchain().extent();
        (extent.width, extent.height)
    }

    /// Block until the device finishes all submitted work
    pub fn wait_idle(&self) -> VulkanResult<()> {
        unsafe {
            self.context
                .device()
                .device
                .device_wait_idle()
                .map_err(VulkanError::Api)
        }
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        log::debug!("Cleaning up Vulkan renderer");
        let _ = self.wait_idle();
        for pending in self.pending_command_buffers.iter_mut() {
            if let Some(command_buffer) = pending.take() {
                self.command_pool.free_command_buffer(command_buffer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Point3, Vec3};
    use crate::render::material::PhongMaterial;
    use crate::scene::BoundingSphere;
    use approx::assert_relative_eq;
    use std::mem;

    fn item_with(world: Mat4, material: Material) -> DrawItem {
        DrawItem {
            shape_index: 0,
            world,
            bounds: BoundingSphere::new(Point3::origin(), 1.0),
            material,
        }
    }

    #[test]
    fn push_constants_fill_the_guaranteed_budget() {
        assert_eq!(
            mem::size_of::<PushConstants>() as u32,
            GraphicsPipeline::PUSH_CONSTANT_SIZE
        );
    }

    #[test]
    fn uniform_blocks_have_std140_sizes() {
        assert_eq!(mem::size_of::<CameraUniformData>(), 208);
        assert_eq!(mem::size_of::<LightingUniformData>(), 160);
    }

    #[test]
    fn translation_keeps_identity_normal_matrix() {
        let world = Mat4::new_translation(&Vec3::new(3.0, -2.0, 5.0));
        let push = PushConstants::for_item(&item_with(world, Material::VertexColor));
        assert_eq!(push.normal_matrix[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(push.normal_matrix[1], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(push.normal_matrix[2], [0.0, 0.0, 1.0, 0.0]);
        // Column-major model matrix: translation sits in the last column.
        assert_eq!(push.model_matrix[3], [3.0, -2.0, 5.0, 1.0]);
    }

    #[test]
    fn uniform_scale_inverts_in_normal_matrix() {
        let world = Mat4::new_scaling(2.0);
        let push = PushConstants::for_item(&item_with(world, Material::VertexColor));
        assert_eq!(push.normal_matrix[0][0], 0.5);
        assert_eq!(push.normal_matrix[1][1], 0.5);
        assert_eq!(push.normal_matrix[2][2], 0.5);
    }

    #[test]
    fn lit_material_packs_specular_and_shininess() {
        let material = Material::Lit(
            PhongMaterial::new()
                .with_diffuse(0.2, 0.8, 0.2)
                .with_specular(0.9, 0.7, 0.5)
                .with_shininess(100.0),
        );
        let push = PushConstants::for_item(&item_with(Mat4::identity(), material));
        assert_eq!(push.material_color, [0.2, 0.8, 0.2, 100.0]);
        assert_eq!(push.normal_matrix[0][3], 0.9);
        assert_eq!(push.normal_matrix[1][3], 0.7);
        assert_eq!(push.normal_matrix[2][3], 0.5);
    }

    #[test]
    fn vertex_color_material_zeroes_the_shininess_lane() {
        let push = PushConstants::for_item(&item_with(Mat4::identity(), Material::VertexColor));
        assert_eq!(push.material_color[3], 0.0);
        assert_eq!(push.normal_matrix[0][3], 0.0);
    }

    #[test]
    fn lighting_data_sums_ambient_and_normalizes_directions() {
        let ambient_a = Light::ambient([0.3, 0.3, 0.3]);
        let ambient_b = Light::ambient([0.1, 0.0, 0.2]);
        let directional = Light::directional([1.0, 1.0, 1.0], Vec3::new(-1.0, -1.0, -1.0));
        let lights = [&ambient_a, &ambient_b, &directional];

        let data = LightingUniformData::from_lights(&lights);
        assert_relative_eq!(data.ambient_color[0], 0.4, epsilon = 1e-6);
        assert_relative_eq!(data.ambient_color[1], 0.3, epsilon = 1e-6);
        assert_relative_eq!(data.ambient_color[2], 0.5, epsilon = 1e-6);
        assert_eq!(data.light_counts[0], 1);

        let inv_sqrt3 = 1.0 / 3.0_f32.sqrt();
        assert_relative_eq!(data.light_directions[0][0], -inv_sqrt3, epsilon = 1e-6);
        assert_relative_eq!(data.light_directions[0][1], -inv_sqrt3, epsilon = 1e-6);
        assert_relative_eq!(data.light_directions[0][2], -inv_sqrt3, epsilon = 1e-6);
    }

    #[test]
    fn lighting_data_caps_directional_lights() {
        let lights: Vec<Light> = (0..MAX_DIRECTIONAL_LIGHTS + 2)
            .map(|i| Light::directional([1.0, 1.0, 1.0], Vec3::new(i as f32 + 1.0, 0.0, 0.0)))
            .collect();
        let refs: Vec<&Light> = lights.iter().collect();

        let data = LightingUniformData::from_lights(&refs);
        assert_eq!(data.light_counts[0], MAX_DIRECTIONAL_LIGHTS as u32);
    }

    #[test]
    fn degenerate_light_direction_is_skipped() {
        let zero = Light::directional([1.0, 1.0, 1.0], Vec3::zeros());
        let data = LightingUniformData::from_lights(&[&zero]);
        assert_eq!(data.light_counts[0], 0);
    }
}
