pub mod components;
pub mod scene;
pub mod systems;
pub mod world;

use cgmath::SquareMatrix;
use components::{
    camera::CameraComponent, material::MaterialComponent, mesh::MeshComponent,
    render_pipelines::RenderPipelineComponent,
};
use scene::{assemble_scene, default_pin_table, SceneLayout};
use std::sync::Arc;
use systems::{
    camera::CameraSystem,
    geospatial::arc::ArcStyle,
    material::MaterialSystem,
    mesh::MeshSystem,
    render_pipelines::{
        ArcRenderPipelineSystem, GlobeRenderPipelineSystem, PinRenderPipelineSystem, DEPTH_FORMAT,
    },
    ticker::Ticker,
};
use wgpu::Surface;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use world::World;

const GLOBE_RADIUS: f32 = 1.0;
const GLOBE_SEGMENTS: u32 = 50;
const PIN_RADIUS: f32 = 0.05;
const PIN_SEGMENTS: u32 = 32;
const TEXTURE_WIDTH: u32 = 1024;
const TEXTURE_HEIGHT: u32 = 512;

fn matrix4_to_array(mat: cgmath::Matrix4<f32>) -> [[f32; 4]; 4] {
    mat.into()
}

struct State {
    // renderer
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    // scene
    world: World,
    layout: SceneLayout,
    ticker: Ticker,

    camera_component: CameraComponent,
}

impl State {
    async fn new(window: &Window) -> Self {
        let size = window.inner_size();

        let instance = State::create_instance();

        // # Safety
        // The surface needs to live as long as the window that created it.
        // State owns the window so this should be safe.
        let surface = unsafe { instance.create_surface(&window) }.unwrap();
        let adapter = State::create_adapter(&instance, &surface).await;
        let (device, queue) = State::create_device_and_queue(&adapter).await;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an sRGB surface texture; fall back to whatever
        // the adapter offers first if there is none.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = State::create_depth_texture(&device, &config);

        // init world and systems
        let mut world = World::new();
        let mesh_system = MeshSystem::new(&device);
        let material_system = MaterialSystem::new(&device, &queue);
        let globe_pipeline_system = GlobeRenderPipelineSystem::new(&device);
        let pin_pipeline_system = PinRenderPipelineSystem::new(&device);
        let arc_pipeline_system = ArcRenderPipelineSystem::new(&device);

        // CAMERA
        let camera_system = CameraSystem::new(&device);
        let (
            camera,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
            camera_controller,
        ) = camera_system.create_camera(config.width, config.height);
        let camera_component = CameraComponent {
            camera,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
            camera_controller,
        };

        // the pin table is compiled in, so a parse failure here is a bug
        let layout =
            assemble_scene(&default_pin_table(), &ArcStyle::default()).expect("demo pin table");

        // Bind group layouts, shader modules, and pipelines are created
        // once per kind and shared; per-entity bind groups must come from
        // these exact layouts.
        let model_matrix_layout = mesh_system.create_model_matrix_bind_group_layout();
        let texture_layout = material_system.texture_layout();
        let color_layout = material_system.color_layout();
        let arc_material_layout = material_system.arc_layout();

        let globe_shader =
            device.create_shader_module(wgpu::include_wgsl!("./shaders/globe_shader.wgsl"));
        let pin_shader =
            device.create_shader_module(wgpu::include_wgsl!("./shaders/pin_shader.wgsl"));
        let arc_shader =
            device.create_shader_module(wgpu::include_wgsl!("./shaders/arc_shader.wgsl"));

        let globe_pipeline_layout = globe_pipeline_system.layout_desc(&[
            &camera_component.camera_bind_group_layout,
            &texture_layout,
            &model_matrix_layout,
        ]);
        let globe_pipeline = Arc::new(globe_pipeline_system.pipeline_desc(
            &globe_pipeline_layout,
            &globe_shader,
            config.format,
        ));
        let pin_pipeline_layout = pin_pipeline_system.layout_desc(&[
            &camera_component.camera_bind_group_layout,
            &color_layout,
            &model_matrix_layout,
        ]);
        let pin_pipeline = Arc::new(pin_pipeline_system.pipeline_desc(
            &pin_pipeline_layout,
            &pin_shader,
            config.format,
        ));
        let arc_pipeline_layout = arc_pipeline_system.layout_desc(&[
            &camera_component.camera_bind_group_layout,
            &arc_material_layout,
            &model_matrix_layout,
        ]);
        let arc_pipeline = Arc::new(arc_pipeline_system.pipeline_desc(
            &arc_pipeline_layout,
            &arc_shader,
            config.format,
        ));

        // GLOBE
        let globe_matrix = matrix4_to_array(cgmath::Matrix4::identity());
        let (globe_vertices, globe_indices) =
            MeshSystem::generate_sphere_mesh(GLOBE_RADIUS, GLOBE_SEGMENTS);
        let graticule = MaterialSystem::graticule_texture(TEXTURE_WIDTH, TEXTURE_HEIGHT);

        let globe_entity = world.new_entity();
        world.attach(
            globe_entity,
            MeshComponent {
                vertex_buffer: mesh_system.create_vertex_buffer(&globe_vertices),
                index_buffer: mesh_system.create_index_buffer(&globe_indices),
                num_indices: globe_indices.len() as u32,
                model_matrix_bind_group: mesh_system
                    .create_model_matrix_bind_group(&model_matrix_layout, globe_matrix),
                model_matrix: globe_matrix,
            },
        );
        world.attach(
            globe_entity,
            MaterialComponent {
                bind_group: material_system.create_2d_texture(&texture_layout, graticule),
                time_buffer: None,
            },
        );
        world.attach(
            globe_entity,
            RenderPipelineComponent {
                render_pipeline: globe_pipeline,
            },
        );

        // PINS
        let (pin_vertices, pin_indices) = MeshSystem::generate_sphere_mesh(PIN_RADIUS, PIN_SEGMENTS);
        for pin in &layout.pins {
            let translation = cgmath::Vector3::new(
                pin.position[0] as f32,
                pin.position[1] as f32,
                pin.position[2] as f32,
            );
            let pin_matrix = matrix4_to_array(cgmath::Matrix4::from_translation(translation));

            let pin_entity = world.new_entity();
            world.attach(
                pin_entity,
                MeshComponent {
                    vertex_buffer: mesh_system.create_vertex_buffer(&pin_vertices),
                    index_buffer: mesh_system.create_index_buffer(&pin_indices),
                    num_indices: pin_indices.len() as u32,
                    model_matrix_bind_group: mesh_system
                        .create_model_matrix_bind_group(&model_matrix_layout, pin_matrix),
                    model_matrix: pin_matrix,
                },
            );
            world.attach(
                pin_entity,
                MaterialComponent {
                    bind_group: material_system.create_color_material(&color_layout, pin.color),
                    time_buffer: None,
                },
            );
            world.attach(
                pin_entity,
                RenderPipelineComponent {
                    render_pipeline: Arc::clone(&pin_pipeline),
                },
            );
        }

        // ARCS
        for arc in &layout.arcs {
            let arc_matrix = matrix4_to_array(cgmath::Matrix4::identity());
            let (arc_vertices, arc_indices) = MeshSystem::arc_strip(&arc.points);
            let (arc_bind_group, arc_time_buffer) =
                material_system.create_arc_material(&arc_material_layout, arc.color);

            let arc_entity = world.new_entity();
            world.attach(
                arc_entity,
                MeshComponent {
                    vertex_buffer: mesh_system.create_vertex_buffer(&arc_vertices),
                    index_buffer: mesh_system.create_index_buffer(&arc_indices),
                    num_indices: arc_indices.len() as u32,
                    model_matrix_bind_group: mesh_system
                        .create_model_matrix_bind_group(&model_matrix_layout, arc_matrix),
                    model_matrix: arc_matrix,
                },
            );
            world.attach(
                arc_entity,
                MaterialComponent {
                    bind_group: arc_bind_group,
                    time_buffer: Some(arc_time_buffer),
                },
            );
            world.attach(
                arc_entity,
                RenderPipelineComponent {
                    render_pipeline: Arc::clone(&arc_pipeline),
                },
            );
        }

        Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            size,
            world,
            layout,
            ticker: Ticker::default(),
            camera_component,
        }
    }

    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            dx12_shader_compiler: Default::default(),
        })
    }

    pub async fn create_adapter(instance: &wgpu::Instance, surface: &Surface) -> wgpu::Adapter {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap()
    }

    pub async fn create_device_and_queue(adapter: &wgpu::Adapter) -> (wgpu::Device, wgpu::Queue) {
        adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    // stay within WebGL2 limits so the wasm build works
                    limits: wgpu::Limits::downlevel_webgl2_defaults(),
                    label: None,
                },
                None,
            )
            .await
            .unwrap()
    }

    // The depth texture must match the surface size, so resize rebuilds it.
    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = State::create_depth_texture(&self.device, &self.config);
            self.camera_component.camera.aspect =
                new_size.width as f32 / new_size.height as f32;
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        if let WindowEvent::KeyboardInput {
            input:
                KeyboardInput {
                    state: ElementState::Pressed,
                    virtual_keycode: Some(VirtualKeyCode::Space),
                    ..
                },
            ..
        } = event
        {
            self.ticker.toggle();
            return true;
        }

        self.camera_component
            .camera_controller
            .process_key_events(event)
    }

    fn update(&mut self) {
        self.camera_component
            .camera_controller
            .update_camera(&mut self.camera_component.camera);
        self.camera_component
            .camera_uniform
            .update_view_proj(&self.camera_component.camera);
        self.queue.write_buffer(
            &self.camera_component.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_component.camera_uniform]),
        );

        // animation time only advances while the ticker is playing
        if let Some(time) = self.ticker.tick() {
            for entity in self
                .world
                .entities_with_pair::<MeshComponent, MaterialComponent>()
            {
                if let Some(material) = self.world.get::<MaterialComponent>(entity) {
                    if let Some(time_buffer) = &material.time_buffer {
                        self.queue.write_buffer(
                            time_buffer,
                            0,
                            bytemuck::bytes_of(&[time, 0.0, 0.0, 0.0]),
                        );
                    }
                }
            }
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    // light-gray backdrop
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.93,
                        g: 0.93,
                        b: 0.93,
                        a: 1.0,
                    }),
                    store: true,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: true,
                }),
                stencil_ops: None,
            }),
        });

        render_pass.set_bind_group(0, &self.camera_component.camera_bind_group, &[]);

        // globe, pins, and arcs all share the same bind group slots:
        // camera (0), material (1), model matrix (2)
        for entity in self
            .world
            .entities_with_pair::<MeshComponent, MaterialComponent>()
        {
            let render_pipeline = self.world.get::<RenderPipelineComponent>(entity);
            let mesh = self.world.get::<MeshComponent>(entity);
            let material = self.world.get::<MaterialComponent>(entity);

            if let (Some(render_pipeline), Some(mesh), Some(material)) =
                (render_pipeline, mesh, material)
            {
                render_pass.set_pipeline(&render_pipeline.render_pipeline);
                render_pass.set_bind_group(1, &material.bind_group, &[]);
                render_pass.set_bind_group(2, &mesh.model_matrix_bind_group, &[]);

                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
            }
        }

        drop(render_pass);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            console_error_panic_hook::set_once();
            tracing_wasm::set_as_global_default();
        } else {
            tracing_subscriber::fmt::init()
        }
    }

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new().build(&event_loop).unwrap();

    #[cfg(target_arch = "wasm32")]
    {
        // Winit prevents sizing with CSS, so we have to
        // set the size manually when on web.
        use winit::dpi::PhysicalSize;
        window.set_inner_size(PhysicalSize::new(1080, 1080));

        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("pinsphere")?;
                let canvas = web_sys::Element::from(window.canvas());

                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .expect("Couldn't append canvas to div.");
    }

    let mut state = State::new(&window).await;
    tracing::info!(
        pins = state.layout.pins.len(),
        arcs = state.layout.arcs.len(),
        "scene assembled"
    );

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == window.id() => {
            if !state.input(event) {
                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state: ElementState::Pressed,
                                virtual_keycode: Some(VirtualKeyCode::Escape),
                                ..
                            },
                        ..
                    } => *control_flow = ControlFlow::Exit,
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        // new_inner_size is &&mut so we have to dereference it twice
                        state.resize(**new_inner_size);
                    }
                    _ => {}
                }
            }
        }
        Event::RedrawRequested(window_id) if window_id == window.id() => {
            state.update();
            match state.render() {
                Ok(_) => {}
                // Reconfigure the surface if lost
                Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                // The system is out of memory, we should probably quit
                Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                // All other errors (Outdated, Timeout) should be resolved by the next frame
                Err(e) => tracing::error!("{:?}", e),
            }
        }
        Event::MainEventsCleared => {
            // RedrawRequested will only trigger once, unless we manually
            // request it.
            window.request_redraw();
        }

        _ => {}
    });
}
