//! Minimal scene description for the reference producer.
//!
//! Meshes are shared prototypes; instances place them with a transform.
//! Rays are moved into each instance's local space for testing, so one
//! mesh can back many instances.

use hitpack_core::{GeometryTypes, SceneStats, SdfGridBackend};
use hitpack_math::{Mat4, Ray, Vec3};

use crate::triangle::Triangle;

/// A triangle mesh in object space.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    /// Constant displacement along the normal. Displaced meshes produce
    /// displaced-triangle hits.
    pub displacement: Option<f32>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            displacement: None,
        }
    }

    /// Axis-aligned quad in the XY plane, facing +Z, as two triangles.
    pub fn quad(half_size: f32) -> Self {
        let a = Vec3::new(-half_size, -half_size, 0.0);
        let b = Vec3::new(half_size, -half_size, 0.0);
        let c = Vec3::new(half_size, half_size, 0.0);
        let d = Vec3::new(-half_size, half_size, 0.0);
        Self::new(vec![Triangle::new(a, b, c), Triangle::new(a, c, d)])
    }

    pub fn with_displacement(mut self, displacement: f32) -> Self {
        self.displacement = Some(displacement);
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// A placed copy of a mesh.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Index into `Scene::meshes`
    pub mesh: usize,
    /// Local-to-world transform
    pub transform: Mat4,
    /// World-to-local transform, for moving rays into mesh space
    inv_transform: Mat4,
}

impl Instance {
    pub fn new(mesh: usize, transform: Mat4) -> Self {
        Self {
            mesh,
            transform,
            inv_transform: transform.inverse(),
        }
    }

    /// The ray in this instance's local space.
    ///
    /// The direction is not renormalized, so ray parameters match world space.
    pub fn to_local(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.inv_transform.transform_point3(ray.origin),
            self.inv_transform.transform_vector3(ray.direction),
        )
    }
}

/// Homogeneous participating medium filling the whole scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Medium {
    /// Extinction coefficient (events per unit distance)
    pub density: f32,
    /// Henyey-Greenstein asymmetry parameter
    pub g: f32,
}

impl Medium {
    pub fn new(density: f32, g: f32) -> Self {
        Self { density, g }
    }

    /// Sample a free-flight distance from a uniform number in [0, 1).
    pub fn sample_distance(&self, u: f32) -> f32 {
        if self.density <= 0.0 {
            return f32::INFINITY;
        }
        -(1.0 - u).ln() / self.density
    }
}

/// Meshes, instances and an optional medium.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub instances: Vec<Instance>,
    pub medium: Option<Medium>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh and return its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Place a mesh and return the instance ID.
    pub fn add_instance(&mut self, mesh: usize, transform: Mat4) -> u32 {
        self.instances.push(Instance::new(mesh, transform));
        (self.instances.len() - 1) as u32
    }

    pub fn with_medium(mut self, medium: Medium) -> Self {
        self.medium = Some(medium);
        self
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Properties that size the hit record header for this scene.
    pub fn stats(&self) -> SceneStats {
        let max_primitive_count = self
            .meshes
            .iter()
            .map(|mesh| mesh.triangle_count() as u32)
            .max()
            .unwrap_or(0);

        let instanced = |displaced: bool| {
            self.instances
                .iter()
                .any(|instance| self.meshes[instance.mesh].displacement.is_some() == displaced)
        };

        SceneStats {
            instance_count: self.instances.len() as u32,
            max_primitive_count,
            geometry_types: GeometryTypes {
                triangle_mesh: instanced(false),
                displaced_triangle_mesh: instanced(true),
                curve: false,
                sdf_grid: false,
            },
            sdf_grid_backend: SdfGridBackend::default(),
        }
    }
}
