//! Closest-hit tracing into packed hit buffers.
//!
//! Every ray is traced independently and writes only its own slot of the
//! output buffer, so the batch runs in parallel with rayon and needs no
//! synchronization between rays.

use hitpack_core::{
    DisplacedTriangleHit, GeometryInstanceId, HitInfo, HitInfoConfig, PackedHitBuffer,
    TriangleHit, VolumeHit,
};
use hitpack_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::scene::Scene;

/// Find the closest surface hit along `ray`, or a medium scattering event
/// in front of it.
///
/// `rng` is only used when the scene has a medium.
pub fn trace_ray(scene: &Scene, ray: &Ray, ray_t: Interval, rng: &mut impl Rng) -> HitInfo {
    let mut closest = HitInfo::None;
    let mut closest_t = ray_t.max;

    for (instance_id, instance) in scene.instances.iter().enumerate() {
        let mesh = &scene.meshes[instance.mesh];
        let local_ray = instance.to_local(ray);

        for (primitive_index, triangle) in mesh.triangles.iter().enumerate() {
            let Some(hit) = triangle.intersect(&local_ray, ray_t.with_max(closest_t)) else {
                continue;
            };

            closest_t = hit.t;
            let instance_id = GeometryInstanceId(instance_id as u32);
            let primitive_index = primitive_index as u32;
            closest = match mesh.displacement {
                Some(displacement) => DisplacedTriangleHit::new(
                    instance_id,
                    primitive_index,
                    hit.barycentrics,
                    displacement,
                )
                .into(),
                None => TriangleHit::new(instance_id, primitive_index, hit.barycentrics).into(),
            };
        }
    }

    if let Some(medium) = scene.medium {
        let t = ray_t.min + medium.sample_distance(rng.gen::<f32>());
        if t < closest_t {
            return VolumeHit::new(t, medium.g).into();
        }
    }

    closest
}

/// Trace a batch of rays into a new buffer, one record per ray.
///
/// Each ray gets its own generator seeded from `seed` and its index, so
/// results do not depend on how rayon schedules the work.
pub fn trace(scene: &Scene, config: &HitInfoConfig, rays: &[Ray], seed: u64) -> PackedHitBuffer {
    let mut buffer = PackedHitBuffer::new(*config, rays.len());
    let stride = config.packed_words();

    buffer
        .words_mut()
        .par_chunks_exact_mut(stride)
        .zip(rays.par_iter())
        .enumerate()
        .for_each(|(index, (slot, ray))| {
            let mut rng = StdRng::seed_from_u64(seed ^ index as u64);
            let hit = trace_ray(scene, ray, Interval::FORWARD, &mut rng);
            slot.copy_from_slice(hit.pack(config).words(config));
        });

    log::info!(
        "Traced {} rays against {} instances ({} bytes of hit info)",
        rays.len(),
        scene.instance_count(),
        buffer.as_bytes().len()
    );

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Medium, Mesh};
    use hitpack_core::{HitType, HitInfoConfigDesc};
    use hitpack_math::{Mat4, Vec3};

    fn two_quads() -> Scene {
        let mut scene = Scene::new();
        let flat = scene.add_mesh(Mesh::quad(1.0));
        let bumpy = scene.add_mesh(Mesh::quad(1.0).with_displacement(0.25));
        // Flat quad at z = -2, displaced quad behind it at z = -4, offset in x
        scene.add_instance(flat, Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)));
        scene.add_instance(bumpy, Mat4::from_translation(Vec3::new(1.5, 0.0, -4.0)));
        scene
    }

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 0.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_closest_hit_wins() {
        let scene = two_quads();
        let mut rng = StdRng::seed_from_u64(0);

        // Both quads overlap at x = 0.75; the flat one is in front
        let hit = trace_ray(&scene, &down_z(0.75, 0.0), Interval::FORWARD, &mut rng);
        let HitInfo::Triangle(tri) = hit else {
            panic!("expected a triangle hit, got {:?}", hit);
        };
        assert_eq!(tri.instance_id, GeometryInstanceId(0));
    }

    #[test]
    fn test_displaced_hit() {
        let scene = two_quads();
        let mut rng = StdRng::seed_from_u64(0);

        let hit = trace_ray(&scene, &down_z(2.0, 0.3), Interval::FORWARD, &mut rng);
        let HitInfo::DisplacedTriangle(tri) = hit else {
            panic!("expected a displaced triangle hit, got {:?}", hit);
        };
        assert_eq!(tri.instance_id, GeometryInstanceId(1));
        assert_eq!(tri.displacement, 0.25);
    }

    #[test]
    fn test_miss() {
        let scene = two_quads();
        let mut rng = StdRng::seed_from_u64(0);
        let hit = trace_ray(&scene, &down_z(10.0, 10.0), Interval::FORWARD, &mut rng);
        assert_eq!(hit, HitInfo::None);
    }

    #[test]
    fn test_dense_medium_scatters_first() {
        let scene = two_quads().with_medium(Medium::new(1000.0, 0.6));
        let mut rng = StdRng::seed_from_u64(7);

        let hit = trace_ray(&scene, &down_z(0.0, 0.0), Interval::FORWARD, &mut rng);
        let HitInfo::Volume(volume) = hit else {
            panic!("expected a volume hit, got {:?}", hit);
        };
        assert!(volume.t < 2.0);
        assert_eq!(volume.g, 0.6);
    }

    #[test]
    fn test_trace_batch_matches_single_rays() {
        let scene = two_quads();
        let config = HitInfoConfig::from_scene(&scene.stats(), false).unwrap();
        let rays: Vec<Ray> = (0..16)
            .map(|i| down_z(-1.0 + i as f32 * 0.25, 0.1))
            .collect();

        let buffer = trace(&scene, &config, &rays, 42);
        assert_eq!(buffer.len(), rays.len());

        for (ray, record) in rays.iter().zip(buffer.records()) {
            let mut rng = StdRng::seed_from_u64(0);
            let expected = trace_ray(&scene, ray, Interval::FORWARD, &mut rng);
            assert_eq!(record.hit_type(), expected.hit_type());
            if let HitInfo::Triangle(tri) = expected {
                assert_eq!(record.triangle_hit(), tri);
            }
        }
    }

    #[test]
    fn test_trace_is_deterministic() {
        let scene = two_quads().with_medium(Medium::new(0.3, -0.2));
        let config = HitInfoConfig::from_scene(&scene.stats(), false).unwrap();
        let rays: Vec<Ray> = (0..64).map(|i| down_z((i % 8) as f32 * 0.3, 0.0)).collect();

        let a = trace(&scene, &config, &rays, 1234);
        let b = trace(&scene, &config, &rays, 1234);
        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_compressed() {
        let mut scene = Scene::new();
        let quad = scene.add_mesh(Mesh::quad(1.0));
        scene.add_instance(quad, Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)));

        let config = HitInfoConfig::new(HitInfoConfigDesc {
            use_compression: true,
            geometry_types: scene.stats().geometry_types,
            ..Default::default()
        })
        .unwrap();
        let buffer = trace(&scene, &config, &[down_z(0.5, -0.5), down_z(5.0, 0.0)], 0);

        assert_eq!(buffer.words().len(), 4);
        assert_eq!(buffer.record(0).hit_type(), HitType::Triangle);
        assert!(!buffer.record(1).is_valid());

        let b = buffer.record(0).triangle_hit().barycentrics;
        assert!(b.x >= 0.0 && b.y >= 0.0 && b.x + b.y <= 1.0 + 2.0 / 65535.0);
    }
}
