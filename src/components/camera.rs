use cgmath::{InnerSpace, SquareMatrix};
use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub struct CameraComponent {
    pub camera: Camera,
    pub camera_uniform: CameraUniform,
    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub camera_controller: CameraController,
}

pub struct Camera {
    pub eye: cgmath::Point3<f32>,
    pub target: cgmath::Point3<f32>,
    pub up: cgmath::Vector3<f32>,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn build_view_projection_matrix(&self) -> cgmath::Matrix4<f32> {
        let view = cgmath::Matrix4::look_at_rh(self.eye, self.target, self.up);
        let proj = cgmath::perspective(cgmath::Deg(self.fovy), self.aspect, self.znear, self.zfar);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

/// Orbit-style controls: arrow keys swing the eye around the globe,
/// W/S move it in and out along the view direction.
pub struct CameraController {
    orbit_step_deg: f32,
    zoom_step: f32,
    is_orbit_left_pressed: bool,
    is_orbit_right_pressed: bool,
    is_orbit_up_pressed: bool,
    is_orbit_down_pressed: bool,
    is_zoom_in_pressed: bool,
    is_zoom_out_pressed: bool,
}

// Keep the eye off the poles so `up` never becomes parallel to the
// view direction.
const PITCH_LIMIT_DEG: f32 = 85.0;

impl CameraController {
    pub fn new(orbit_step_deg: f32, zoom_step: f32) -> Self {
        Self {
            orbit_step_deg,
            zoom_step,
            is_orbit_left_pressed: false,
            is_orbit_right_pressed: false,
            is_orbit_up_pressed: false,
            is_orbit_down_pressed: false,
            is_zoom_in_pressed: false,
            is_zoom_out_pressed: false,
        }
    }

    pub fn process_key_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => {
                let is_pressed = *state == ElementState::Pressed;
                match keycode {
                    VirtualKeyCode::W | VirtualKeyCode::Plus => {
                        self.is_zoom_in_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::S | VirtualKeyCode::Minus => {
                        self.is_zoom_out_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::Left => {
                        self.is_orbit_left_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::Right => {
                        self.is_orbit_right_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::Up => {
                        self.is_orbit_up_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::Down => {
                        self.is_orbit_down_pressed = is_pressed;
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    pub fn update_camera(&self, camera: &mut Camera) {
        let forward = camera.target - camera.eye;
        let forward_norm = forward.normalize();
        let forward_mag = forward.magnitude();

        // Never push the eye through the globe surface.
        if self.is_zoom_in_pressed && forward_mag > 1.0 + self.zoom_step {
            camera.eye += forward_norm * self.zoom_step;
        }
        if self.is_zoom_out_pressed {
            camera.eye -= forward_norm * self.zoom_step;
        }

        let step = cgmath::Rad(self.orbit_step_deg.to_radians());
        let up = camera.up;
        let right = forward_norm.cross(up).normalize();
        if self.is_orbit_right_pressed {
            self.orbit_around(camera, up, -step);
        }
        if self.is_orbit_left_pressed {
            self.orbit_around(camera, up, step);
        }

        // rotating the eye around `right` by -step raises its elevation
        if self.is_orbit_up_pressed && self.pitch_allows(camera, step.0) {
            self.orbit_around(camera, right, -step);
        }
        if self.is_orbit_down_pressed && self.pitch_allows(camera, -step.0) {
            self.orbit_around(camera, right, step);
        }
    }

    fn orbit_around(
        &self,
        camera: &mut Camera,
        axis: cgmath::Vector3<f32>,
        angle: cgmath::Rad<f32>,
    ) {
        let rotation = cgmath::Matrix3::from_axis_angle(axis, angle);
        let relative = camera.eye - camera.target;
        camera.eye = camera.target + rotation * relative;
    }

    fn pitch_allows(&self, camera: &Camera, delta_rad: f32) -> bool {
        let dir = (camera.eye - camera.target).normalize();
        let elevation = dir.dot(camera.up).asin();
        (elevation + delta_rad).abs() < PITCH_LIMIT_DEG.to_radians()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath matrices aren't Pod, so the uniform carries a plain array
    pub view_proj_matrix: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj_matrix: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj_matrix = camera.build_view_projection_matrix().into();
    }
}
