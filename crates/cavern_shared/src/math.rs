//! Geometry value types for level buffers.
//!
//! The mesh lives in the XZ plane with +Y up: grid columns map to X, grid
//! rows to Z, and walls hang down along -Y. Both types are `#[repr(C)]` and
//! `Pod`, so slices of them can be handed to a host as raw bytes.

use std::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Point or direction in level space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// Across the grid (columns).
    pub x: f32,
    /// Up.
    pub y: f32,
    /// Along the grid (rows).
    pub z: f32,
}

/// Point on the ground plane, `(x, z)` of a [`Vec3`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// Level X.
    pub x: f32,
    /// Level Z.
    pub y: f32,
}

/// Component-wise `+`, `-` and scalar `*`.
macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }
    };
}

impl_vector_ops!(Vec3 { x, y, z });
impl_vector_ops!(Vec2 { x, y });

impl Vec3 {
    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// +X, half a cell of which offsets a "right" mesh node.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Up.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// +Z, half a cell of which offsets an "above" mesh node.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// `[x, y, z]`, the layout used in exports.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product. Cave triangles `(a, b, c)` are wound so
    /// that `(b - a).cross(c - a)` points up.
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Drops the height, keeping `(x, z)`.
    #[must_use]
    pub const fn ground(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

impl Vec2 {
    /// Creates a ground point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `[x, y]`, the layout used in exports.
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}
