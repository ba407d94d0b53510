//! Orbit camera rig driven by gesture channels, pointer drag and scroll.

use glam::{Mat4, Quat, Vec3};

use crate::mapping::MappedParams;
use crate::params::{CameraParams, RenderConfig};

/// Camera orientation and zoom
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub yaw: f32,
    /// Tilt (rotation about X)
    pub pitch: f32,
    /// Lift (rotation about Z)
    pub roll: f32,
    pub target_yaw: f32,
    pub zoom_radius: f32,
    pub auto_rotate: bool,
    pub pointer_control_enabled: bool,
}

/// Camera rig with detent and drag bookkeeping
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub state: CameraState,
    params: CameraParams,
    dragging: bool,
    /// Set while the rotate pair is held past the deadzone
    detent_latched: bool,
}

impl CameraRig {
    pub fn new(params: CameraParams) -> Self {
        let state = CameraState {
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            target_yaw: 0.0,
            zoom_radius: params.initial_zoom,
            auto_rotate: params.auto_rotate,
            pointer_control_enabled: params.pointer_control,
        };
        Self {
            state,
            params,
            dragging: false,
            detent_latched: false,
        }
    }

    /// Advance one tick from the mapped gesture parameters
    pub fn update(&mut self, mapped: &MappedParams) {
        self.state.pitch = mapped.tilt;
        self.state.roll = mapped.lift;

        // One step per deflection; re-arms when back inside the deadzone
        if mapped.rotate_step == 0 {
            self.detent_latched = false;
        } else if !self.detent_latched {
            self.detent_latched = true;
            self.state.target_yaw += mapped.rotate_step as f32 * self.params.rotate_detent_rad;
        }

        if self.state.auto_rotate && !self.dragging {
            self.state.target_yaw += self.params.auto_rotate_rate;
        }

        if self.state.pointer_control_enabled {
            self.state.yaw += (self.state.target_yaw - self.state.yaw) * self.params.yaw_follow;
        } else {
            self.state.yaw = self.state.target_yaw;
        }
    }

    pub fn pointer_down(&mut self) {
        self.dragging = self.state.pointer_control_enabled;
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Horizontal drag in pixels; ignored unless a drag is active
    pub fn pointer_drag(&mut self, dx: f32) {
        if !self.dragging || !self.state.pointer_control_enabled || !dx.is_finite() {
            return;
        }
        self.state.target_yaw += dx * self.params.drag_sensitivity;
    }

    /// Scroll wheel delta; positive zooms out
    pub fn scroll(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let (min, max) = self.params.zoom_range;
        self.state.zoom_radius =
            (self.state.zoom_radius + delta * self.params.zoom_per_scroll).clamp(min, max);
    }

    pub fn toggle_pointer_control(&mut self) -> bool {
        self.state.pointer_control_enabled = !self.state.pointer_control_enabled;
        if !self.state.pointer_control_enabled {
            self.dragging = false;
        }
        self.state.pointer_control_enabled
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.state.auto_rotate = !self.state.auto_rotate;
        self.state.auto_rotate
    }

    /// Yaw, then pitch, then roll
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_z(self.state.roll)
            * Quat::from_rotation_x(self.state.pitch)
            * Quat::from_rotation_y(self.state.yaw)
    }

    /// Camera position orbiting the origin
    pub fn eye(&self) -> Vec3 {
        let zoom = self.state.zoom_radius;
        let base = Vec3::new(0.0, zoom * self.params.elevation_fraction, zoom);
        self.orientation() * base
    }

    pub fn view_matrix(&self) -> Mat4 {
        let up = self.orientation() * Vec3::Y;
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, up)
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn view_proj(&self, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );
        (proj * self.view_matrix(), self.eye())
    }
}
