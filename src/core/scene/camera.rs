//=========================================================================
// Camera
//=========================================================================
//
// First-person perspective camera with pointer-lock look controls.
//
// Convention: right-handed, +Y up, yaw 0 looks down -Z.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use log::debug;

//=== Constants ===========================================================

const DEFAULT_POSITION: Vec3 = Vec3::new(1.5, 1.6, 2.3);
const DEFAULT_FOV_DEGREES: f32 = 80.0;
const DEFAULT_NEAR: f32 = 0.005;
const DEFAULT_FAR: f32 = 10_000.0;
const DEFAULT_SENSITIVITY: f32 = 0.002;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

//=== Camera ==============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Radians per pixel of mouse motion.
    pub sensitivity: f32,
    pointer_locked: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            aspect: 4.0 / 3.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            sensitivity: DEFAULT_SENSITIVITY,
            pointer_locked: false,
        }
    }
}

impl Camera {
    //--- Orientation ------------------------------------------------------

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Sets the view direction, clamping pitch short of straight up/down.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Turns the camera towards `target`.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.set_orientation((-dir.x).atan2(-dir.z), dir.y.asin());
    }

    /// Full view direction.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// View direction projected onto the ground plane.
    pub fn horizontal_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    //--- Movement ---------------------------------------------------------

    /// Steps along the horizontal view direction (negative steps back).
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.horizontal_forward() * distance;
    }

    /// Strafes sideways (negative moves left).
    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    //--- Pointer Lock -----------------------------------------------------

    pub fn lock_pointer(&mut self) {
        if !self.pointer_locked {
            debug!(target: "platform::input", "Pointer locked");
        }
        self.pointer_locked = true;
    }

    pub fn unlock_pointer(&mut self) {
        if self.pointer_locked {
            debug!(target: "platform::input", "Pointer unlocked");
        }
        self.pointer_locked = false;
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Applies mouse motion to yaw/pitch. Ignored unless the pointer is
    /// locked; returns whether the camera turned.
    pub fn rotate(&mut self, dx: f32, dy: f32) -> bool {
        if !self.pointer_locked {
            return false;
        }
        self.set_orientation(
            self.yaw - dx * self.sensitivity,
            self.pitch - dy * self.sensitivity,
        );
        true
    }

    //--- Projection -------------------------------------------------------

    /// Updates the aspect ratio from a surface size. Zero-sized surfaces
    /// (minimised windows) are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
