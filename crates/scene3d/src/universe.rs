//! Virtual universe facade
//!
//! Ties the window, renderer and camera together behind one type, the
//! retained-mode convenience this toolkit is built around. An application
//! builds and compiles a scene graph, attaches it, and calls [`Universe::run`];
//! the universe owns the frame loop from there and the application is not
//! called back per frame.

use glfw::{Action, Key, WindowEvent};
use thiserror::Error;

use crate::config::UniverseConfig;
use crate::display::{self, DisplayError};
use crate::foundation::time::Timer;
use crate::render::camera::Camera;
use crate::render::vulkan::{VulkanError, VulkanRenderer};
use crate::scene::{SceneError, SceneGraph};
use crate::window::{Window, WindowError};

/// How many frames between FPS log lines
const FPS_LOG_INTERVAL: u64 = 300;

/// Errors surfaced by universe construction and the frame loop
#[derive(Error, Debug)]
pub enum UniverseError {
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error("window error: {0}")]
    Window(#[from] WindowError),
    #[error("render error: {0}")]
    Render(#[from] VulkanError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("a scene graph is already attached")]
    SceneAlreadyAttached,
    #[error("no scene graph attached")]
    NoScene,
}

/// Window, renderer and camera bundled into a ready-to-run viewer
pub struct Universe {
    window: Window,
    renderer: VulkanRenderer,
    camera: Camera,
    timer: Timer,
    scene: Option<SceneGraph>,
}

impl Universe {
    /// Open a window and bring up the renderer per the configuration
    ///
    /// Fails with [`UniverseError::Display`] before touching any GPU path
    /// when the session has no display server.
    pub fn new(config: &UniverseConfig) -> Result<Self, UniverseError> {
        display::require_display()?;

        // GLFW refusing to start is treated like the environment probe
        // failing: same headless error, same exit path for applications.
        let window = Window::new(&config.window).map_err(|err| match err {
            WindowError::InitializationFailed => {
                UniverseError::Display(DisplayError::InitFailed(err.to_string()))
            }
            other => UniverseError::Window(other),
        })?;

        let renderer = VulkanRenderer::new(&window, &config.renderer, config.window.vsync)?;

        let (width, height) = window.framebuffer_size();
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let camera = Camera::nominal(45.0, aspect, 0.1, 100.0);

        log::info!(
            "Universe ready: \"{}\" at {}x{}",
            config.window.title,
            width,
            height
        );

        Ok(Self {
            window,
            renderer,
            camera,
            timer: Timer::new(),
            scene: None,
        })
    }

    /// Attach a compiled scene graph and upload its geometry
    ///
    /// The graph must be compiled first; shape order established at compile
    /// time becomes the GPU mesh order.
    pub fn attach(&mut self, scene: SceneGraph) -> Result<(), UniverseError> {
        if self.scene.is_some() {
            return Err(UniverseError::SceneAlreadyAttached);
        }
        for mesh in scene.compiled_meshes()? {
            self.renderer.upload_mesh(mesh)?;
        }
        log::info!("Scene attached: {} nodes", scene.node_count());
        self.scene = Some(scene);
        Ok(())
    }

    /// The viewing camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the viewing camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Run the frame loop until the window closes
    ///
    /// Each frame: pump window events, advance the timer, tick behaviors,
    /// flatten the scene into draw items, filter lights against them, and
    /// render. Swapchain invalidation from resizes is handled in place.
    pub fn run(&mut self) -> Result<(), UniverseError> {
        if self.scene.is_none() {
            return Err(UniverseError::NoScene);
        }

        log::info!("Entering render loop");
        let mut framebuffer_resized = false;

        while !self.window.should_close() {
            self.window.poll_events();

            // Collect first so handling can mutate the window.
            let events: Vec<(f64, WindowEvent)> = self.window.flush_events().collect();
            for (_, event) in events {
                match event {
                    WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                        self.window.set_should_close(true);
                    }
                    WindowEvent::FramebufferSize(width, height) => {
                        framebuffer_resized = true;
                        if width > 0 && height > 0 {
                            self.camera.set_aspect_ratio(width as f32 / height as f32);
                        }
                    }
                    _ => {}
                }
            }

            if framebuffer_resized {
                self.renderer.recreate_swapchain(&self.window)?;
                framebuffer_resized = false;
                continue;
            }

            self.timer.update();

            let scene = match self.scene.as_mut() {
                Some(scene) => scene,
                None => return Err(UniverseError::NoScene),
            };
            scene.tick_behaviors(self.timer.elapsed(), self.camera.position_point())?;
            let items = scene.draw_items()?;
            let lights = scene.active_lights(&items)?;

            self.renderer.update_camera(&self.camera);
            self.renderer.update_lighting(&lights);

            match self.renderer.draw_frame(&items) {
                Ok(()) => {}
                Err(VulkanError::Api(ash::vk::Result::ERROR_OUT_OF_DATE_KHR)) => {
                    self.renderer.recreate_swapchain(&self.window)?;
                }
                Err(err) => return Err(err.into()),
            }

            if self.timer.frame_count() % FPS_LOG_INTERVAL == 0 {
                log::debug!(
                    "{:.1} fps average over {} frames",
                    self.timer.average_fps(),
                    self.timer.frame_count()
                );
            }
        }

        log::info!(
            "Render loop finished after {} frames",
            self.timer.frame_count()
        );
        self.renderer.wait_idle()?;
        Ok(())
    }
}
