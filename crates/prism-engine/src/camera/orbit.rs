use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};

use crate::input::{InputFrame, InputState, MouseButton};

/// Tuning for [`OrbitCamera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    /// Radians per logical pixel of drag.
    pub sensitivity: f32,
    /// Zoom units per wheel line.
    pub scroll_sensitivity: f32,
    pub zoom_range: (f32, f32),
    /// Fraction of the angular velocity kept each frame after release.
    pub inertia: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.01,
            scroll_sensitivity: 0.1,
            zoom_range: (-2.0, 2.0),
            inertia: 0.9,
            fov_y_degrees: 45.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

const MAX_PITCH: f32 = FRAC_PI_2 - 1e-5;
const MIN_VELOCITY: f32 = 1e-4;

/// Yaw/pitch around the origin (`angles.x`, `angles.y`) and a log-scale
/// zoom; distance is `exp(-zoom)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub angles: Vec2,
    pub zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            angles: Vec2::new(0.8, 0.5),
            zoom: -1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    active: bool,
    start_mouse: Vec2,
    start_state: CameraState,
    velocity: Vec2,
    previous_delta: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct OrbitCamera {
    pub settings: OrbitSettings,
    pub state: CameraState,
    drag: DragState,
}

impl OrbitCamera {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    /// Feeds one frame of input. Presses and wheel motion are ignored while
    /// `gui_wants_pointer`; an ongoing drag still tracks the pointer.
    ///
    /// Returns `true` if the camera moved.
    pub fn handle_input(&mut self, input: &InputState, frame: &InputFrame, gui_wants_pointer: bool) -> bool {
        let pointer = input.pointer_pos.map(|(x, y)| Vec2::new(x, y));
        let mut changed = false;

        if frame.button_released(MouseButton::Left) {
            self.end_drag();
        }
        if frame.button_pressed(MouseButton::Left) && !gui_wants_pointer {
            if let Some(p) = pointer {
                self.begin_drag(p);
            }
        }
        if self.drag.active {
            if let Some(p) = pointer {
                changed |= self.drag_to(p);
            }
        }
        if !gui_wants_pointer && frame.scroll_lines != 0.0 {
            changed |= self.scroll(frame.scroll_lines);
        }

        changed
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.drag.active = true;
        self.drag.start_mouse = flip_x(pointer);
        self.drag.start_state = self.state;
        self.drag.velocity = Vec2::ZERO;
        self.drag.previous_delta = Vec2::ZERO;
    }

    pub fn drag_to(&mut self, pointer: Vec2) -> bool {
        if !self.drag.active {
            return false;
        }
        let delta = (flip_x(pointer) - self.drag.start_mouse) * self.settings.sensitivity;
        let before = self.state.angles;
        self.state.angles = clamp_pitch(self.drag.start_state.angles + delta);

        self.drag.velocity = delta - self.drag.previous_delta;
        self.drag.previous_delta = delta;
        self.state.angles != before
    }

    pub fn end_drag(&mut self) {
        self.drag.active = false;
    }

    pub fn scroll(&mut self, lines: f32) -> bool {
        let (lo, hi) = self.settings.zoom_range;
        let before = self.state.zoom;
        self.state.zoom = (self.state.zoom + self.settings.scroll_sensitivity * lines).clamp(lo, hi);
        self.state.zoom != before
    }

    /// Keeps rotating after release, decaying by `inertia` per call.
    ///
    /// Returns `true` if the camera moved.
    pub fn update_inertia(&mut self) -> bool {
        if self.drag.active {
            return false;
        }
        if self.drag.velocity.length() < MIN_VELOCITY {
            self.drag.velocity = Vec2::ZERO;
            return false;
        }
        self.state.angles = clamp_pitch(self.state.angles + self.drag.velocity);
        self.drag.velocity *= self.settings.inertia;
        true
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        let Vec2 { x, y } = self.state.angles;
        let (cx, sx) = (x.cos(), x.sin());
        let (cy, sy) = (y.cos(), y.sin());
        -Vec3::new(cx * cy, sx * cy, sy) * (-self.state.zoom).exp()
    }

    /// Looks at the origin with +Z up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Z)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.settings.fov_y_degrees.to_radians(),
            aspect.max(1e-3),
            self.settings.near,
            self.settings.far,
        )
    }
}

/// Horizontal drag to the right orbits clockwise seen from above.
fn flip_x(p: Vec2) -> Vec2 {
    Vec2::new(-p.x, p.y)
}

fn clamp_pitch(mut angles: Vec2) -> Vec2 {
    angles.y = angles.y.clamp(-MAX_PITCH, MAX_PITCH);
    angles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonState, InputEvent, MouseWheelDelta, PointerButtonEvent};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn drag_rotates_by_sensitivity() {
        let mut cam = OrbitCamera::default();
        let start = cam.state.angles;
        cam.begin_drag(Vec2::new(100.0, 100.0));
        assert!(cam.drag_to(Vec2::new(90.0, 120.0)));

        // x is mirrored: moving left increases yaw.
        assert!(close(cam.state.angles.x, start.x + 0.1));
        assert!(close(cam.state.angles.y, start.y + 0.2));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.begin_drag(Vec2::ZERO);
        cam.drag_to(Vec2::new(0.0, 10_000.0));
        assert!(close(cam.state.angles.y, MAX_PITCH));
        cam.drag_to(Vec2::new(0.0, -10_000.0));
        assert!(close(cam.state.angles.y, -MAX_PITCH));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = OrbitCamera::default();
        for _ in 0..100 {
            cam.scroll(1.0);
        }
        assert_eq!(cam.state.zoom, 2.0);
        assert!(!cam.scroll(1.0));
        cam.scroll(-100.0);
        assert_eq!(cam.state.zoom, -2.0);
    }

    #[test]
    fn inertia_decays_to_rest() {
        let mut cam = OrbitCamera::default();
        cam.begin_drag(Vec2::ZERO);
        cam.drag_to(Vec2::new(0.0, 1.0));
        cam.end_drag();

        let mut steps = 0;
        while cam.update_inertia() {
            steps += 1;
            assert!(steps < 200, "inertia never settled");
        }
        assert!(steps > 0);
        assert!(!cam.update_inertia());
    }

    #[test]
    fn no_inertia_while_dragging() {
        let mut cam = OrbitCamera::default();
        cam.begin_drag(Vec2::ZERO);
        cam.drag_to(Vec2::new(5.0, 0.0));
        assert!(!cam.update_inertia());
    }

    #[test]
    fn position_distance_follows_zoom() {
        let mut cam = OrbitCamera::default();
        cam.state = CameraState { angles: Vec2::ZERO, zoom: 0.0 };
        let p = cam.position();
        assert!(close(p.x, -1.0) && close(p.y, 0.0) && close(p.z, 0.0));

        cam.state.zoom = 1.0;
        assert!(close(cam.position().length(), (-1.0f32).exp()));
    }

    #[test]
    fn view_maps_origin_in_front_of_eye() {
        let cam = OrbitCamera::default();
        let origin_in_view = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin_in_view.z < 0.0);
        assert!(close(origin_in_view.length(), cam.position().length()));
    }

    #[test]
    fn gui_capture_blocks_new_drags_and_scroll() {
        let mut cam = OrbitCamera::default();
        let mut input = InputState::default();
        let mut frame = InputFrame::default();

        input.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
                x: 10.0,
                y: 10.0,
            }),
        );
        input.apply_event(&mut frame, InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 }));

        let before = cam.state;
        assert!(!cam.handle_input(&input, &frame, true));
        assert!(!cam.is_dragging());
        assert_eq!(cam.state, before);

        assert!(cam.handle_input(&input, &frame, false));
        assert!(cam.is_dragging());
    }
}
