//! Scene objects the controller transforms: the surrounding cube, the anchor
//! spheres and the point light.
//!
//! Every object remembers its construction-time baseline so rescaling is
//! always relative to that baseline rather than cumulative.

use crate::error::BackdropError;
use glam::Vec3;

/// Scale/position pair recorded on each programmatic rescale of the cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeSnapshot {
    pub scale: Vec3,
    pub position: Vec3,
}

/// World-space face coordinates of the cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeFaces {
    pub left_x: f32,
    pub right_x: f32,
    pub bottom_y: f32,
    pub top_y: f32,
    pub back_z: f32,
    pub front_z: f32,
}

#[derive(Clone, Debug)]
pub struct BoundingCuboid {
    half_extents: Vec3,
    original_scale: Vec3,
    original_position: Vec3,
    pub scale: Vec3,
    pub position: Vec3,
    snapshot: Option<CubeSnapshot>,
}

impl BoundingCuboid {
    pub fn new(half_extents: Vec3, position: Vec3) -> Self {
        Self {
            half_extents,
            original_scale: Vec3::ONE,
            original_position: position,
            scale: Vec3::ONE,
            position,
            snapshot: None,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn snapshot(&self) -> Option<CubeSnapshot> {
        self.snapshot
    }

    /// Scales size and position uniformly from the baseline and records the
    /// result for the collision pass.
    pub fn rescale(&mut self, scale: f32) {
        self.scale = self.original_scale * scale;
        self.position = self.original_position * scale;
        self.snapshot = Some(CubeSnapshot {
            scale: self.scale,
            position: self.position,
        });
    }

    /// Faces from the last recorded snapshot, never from the raw geometry.
    pub fn faces(&self) -> Result<CubeFaces, BackdropError> {
        let snap = self.snapshot.ok_or(BackdropError::MissingCubeSnapshot)?;
        let half = self.half_extents * snap.scale;
        Ok(CubeFaces {
            left_x: snap.position.x - half.x,
            right_x: snap.position.x + half.x,
            bottom_y: snap.position.y - half.y,
            top_y: snap.position.y + half.y,
            back_z: snap.position.z - half.z,
            front_z: snap.position.z + half.z,
        })
    }
}

#[derive(Clone, Debug)]
pub struct AnchorSphere {
    original_scale: Vec3,
    original_position: Vec3,
    original_color: [f32; 3],
    pub scale: Vec3,
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub color: [f32; 3],
}

impl AnchorSphere {
    pub fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self {
            original_scale: Vec3::ONE,
            original_position: position,
            original_color: color,
            scale: Vec3::ONE,
            position,
            rotation: Vec3::ZERO,
            color,
        }
    }

    pub fn original_position(&self) -> Vec3 {
        self.original_position
    }

    pub fn original_scale(&self) -> Vec3 {
        self.original_scale
    }

    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.scale = self.original_scale * factor;
    }

    pub fn restore_color(&mut self) {
        self.color = self.original_color;
    }
}

#[derive(Clone, Debug)]
pub struct PointLight {
    original_intensity: f32,
    pub intensity: f32,
    pub position: Vec3,
}

impl PointLight {
    pub fn new(intensity: f32, position: Vec3) -> Self {
        Self {
            original_intensity: intensity,
            intensity,
            position,
        }
    }

    pub fn restore_intensity(&mut self) {
        self.intensity = self.original_intensity;
    }
}
