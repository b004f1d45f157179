//! Math types shared across the simulation kernel
//!
//! Thin aliases over nalgebra plus the two value types the kernel owns:
//! [`Transform`] (the spatial state every actor carries) and [`Bounds`]
//! (axis-aligned boxes aggregated from component extents).

pub mod rng;

pub use rng::DeterministicRng;

/// 2D vector type
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector type
pub type Vec3 = nalgebra::Vector3<f32>;

/// Spatial state of an actor: position, rotation, and scale
///
/// Rotation is stored as euler angles in radians. Most 2D-style games only
/// drive the `z` component; all three are kept so simulation code stays
/// dimension-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Euler rotation in radians
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform positioned at `(x, y)` on the z = 0 plane
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec3::new(x, y, 0.0))
    }
}

/// Axis-aligned bounding box
///
/// A default box is inverted (min above max) and reports itself invalid;
/// encapsulating the first point makes it valid. This lets aggregation code
/// fold any number of boxes together without special-casing "empty".
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,

    /// Maximum corner
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }
}

impl Bounds {
    /// Create an empty (invalid) bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a box from its center and full size
    pub fn centered(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Create the tightest box containing all of `points`
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::default();
        for p in points {
            bounds.encapsulate(*p);
        }
        bounds
    }

    /// Whether the box contains at least one point
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Grow the box to contain `point`
    pub fn encapsulate(&mut self, point: Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grow the box to contain `other`; invalid boxes are ignored
    pub fn encapsulate_bounds(&mut self, other: &Self) {
        if !other.is_valid() {
            return;
        }
        self.encapsulate(other.min);
        self.encapsulate(other.max);
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether two valid boxes overlap; an invalid box overlaps nothing
    pub fn intersects(&self, other: &Self) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}
