//! Triangle primitive for hit-record production.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection. The
//! (u, v) it computes are exactly the barycentrics a `TriangleHit` stores.

use hitpack_math::{Interval, Ray, Vec2, Vec3};

/// A triangle in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

/// Where a ray crossed a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleIntersection {
    /// Ray parameter of the hit
    pub t: f32,
    /// Weights of v1 and v2; v0 gets 1 - x - y
    pub barycentrics: Vec2,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit face normal, following the v0 -> v1 -> v2 winding.
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0).normalize()
    }

    /// Möller-Trumbore ray-triangle intersection.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<TriangleIntersection> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        Some(TriangleIntersection {
            t,
            barycentrics: Vec2::new(u, v),
        })
    }
}
