//! View frustum geometry
//!
//! Planes are stored in Hessian normal form with the normal pointing into
//! the frustum, so a positive signed distance means "inside". Classification
//! is what the traversal hot path runs per internal node, so everything here
//! is plain Copy data and branch-light math.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

/// Result of testing geometry against the frustum hull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Entirely within all six planes
    Inside,
    /// Straddles at least one plane
    Intersect,
    /// Entirely beyond at least one plane
    Outside,
}

/// A plane in Hessian normal form: dot(normal, p) + d = 0
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub d: f32,
}

impl Plane {
    /// Build a plane through three points. The winding of the points picks
    /// which half-space the normal faces; frustum construction winds all six
    /// so the normals face inward.
    pub fn from_points(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize();
        Self {
            normal,
            d: -normal.dot(p0.to_vec()),
        }
    }

    /// Signed distance from the plane; positive on the normal side
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(point.to_vec()) + self.d
    }
}

/// The eight corner points of the frustum volume
#[derive(Debug, Clone, Copy)]
pub struct FrustumCorners {
    pub near_top_left: Point3<f32>,
    pub near_top_right: Point3<f32>,
    pub near_bottom_left: Point3<f32>,
    pub near_bottom_right: Point3<f32>,
    pub far_top_left: Point3<f32>,
    pub far_top_right: Point3<f32>,
    pub far_bottom_left: Point3<f32>,
    pub far_bottom_right: Point3<f32>,
}

impl FrustumCorners {
    /// Corner points in outline order: near rectangle then far rectangle
    pub fn to_array(self) -> [Point3<f32>; 8] {
        [
            self.near_top_left,
            self.near_top_right,
            self.near_bottom_left,
            self.near_bottom_right,
            self.far_top_left,
            self.far_top_right,
            self.far_bottom_left,
            self.far_bottom_right,
        ]
    }
}

/// Six bounding planes plus the corner points they were built from
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Hull planes in order: top, bottom, left, right, far, near
    pub planes: [Plane; 6],
    pub corners: FrustumCorners,
}

impl Frustum {
    /// Derive the six planes from the corner rectangles. Each plane takes
    /// three corners wound so the normal points into the volume.
    pub fn from_corners(corners: FrustumCorners) -> Self {
        let c = &corners;
        let planes = [
            Plane::from_points(c.near_top_right, c.near_top_left, c.far_top_left),
            Plane::from_points(c.near_bottom_left, c.near_bottom_right, c.far_bottom_right),
            Plane::from_points(c.near_top_left, c.near_bottom_left, c.far_bottom_left),
            Plane::from_points(c.near_bottom_right, c.near_top_right, c.far_bottom_right),
            Plane::from_points(c.far_top_right, c.far_top_left, c.far_bottom_left),
            Plane::from_points(c.near_top_left, c.near_top_right, c.near_bottom_right),
        ];
        Self { planes, corners }
    }

    /// True when the point lies on or inside every hull plane
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= 0.0)
    }

    /// Classify a bounding sphere against the hull.
    ///
    /// Outside wins over Intersect wins over Inside, so the result does not
    /// depend on plane order. A sphere fully beyond any single plane
    /// short-circuits to Outside.
    pub fn classify_sphere(&self, center: Point3<f32>, radius: f32) -> Visibility {
        let mut result = Visibility::Inside;
        for plane in &self.planes {
            let distance = plane.signed_distance(center);
            if distance < -radius {
                return Visibility::Outside;
            }
            if distance < radius {
                result = Visibility::Intersect;
            }
        }
        result
    }
}

impl Default for Frustum {
    /// Placeholder hull, replaced by the first pose derivation
    fn default() -> Self {
        let origin = Point3::new(0.0, 0.0, 0.0);
        Self {
            planes: [Plane {
                normal: Vector3::unit_y(),
                d: 0.0,
            }; 6],
            corners: FrustumCorners {
                near_top_left: origin,
                near_top_right: origin,
                near_bottom_left: origin,
                near_bottom_right: origin,
                far_top_left: origin,
                far_top_right: origin,
                far_bottom_left: origin,
                far_bottom_right: origin,
            },
        }
    }
}
