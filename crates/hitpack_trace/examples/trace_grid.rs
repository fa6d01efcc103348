//! Example: trace a grid of rays and print a map of the hit types.
//!
//! Run with: cargo run --example trace_grid -- [--compress] [config.json]
//!
//! Without a config file the hit info layout is derived from the scene.

use std::env;

use anyhow::Context;
use hitpack_core::{HitInfoConfig, HitType};
use hitpack_math::Mat4;
use hitpack_trace::{trace, HitSummary, Medium, Mesh, Ray, Scene, Vec3};

const WIDTH: usize = 48;
const HEIGHT: usize = 20;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let compress = args.iter().any(|arg| arg == "--compress");
    let config_path = args.iter().find(|arg| !arg.starts_with("--"));

    let scene = build_scene();

    let config = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path))?;
            serde_json::from_str::<HitInfoConfig>(&text)
                .with_context(|| format!("Invalid hit info config in {}", path))?
        }
        None => HitInfoConfig::from_scene(&scene.stats(), compress)?,
    };

    println!("Hit info layout:");
    for (name, value) in config.shader_defines() {
        println!("  #define {} {}", name, value);
    }
    println!("  {} bytes per record", config.packed_size_in_bytes());

    let rays = grid_rays();
    let start = std::time::Instant::now();
    let buffer = trace(&scene, &config, &rays, 0x5eed);
    println!("\nTraced {} rays in {:?}\n", rays.len(), start.elapsed());

    for row in 0..HEIGHT {
        let line: String = (0..WIDTH)
            .map(|col| glyph(buffer.record(row * WIDTH + col).hit_type()))
            .collect();
        println!("  {}", line);
    }

    println!("\n{}", HitSummary::from_buffer(&buffer));
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new().with_medium(Medium::new(0.02, 0.3));
    let flat = scene.add_mesh(Mesh::quad(1.0));
    let bumpy = scene.add_mesh(Mesh::quad(1.0).with_displacement(0.05));

    for i in 0..3 {
        let x = -2.5 + i as f32 * 2.5;
        scene.add_instance(flat, Mat4::from_translation(Vec3::new(x, 0.6, -5.0)));
        scene.add_instance(
            bumpy,
            Mat4::from_translation(Vec3::new(x + 0.5, -0.6, -6.0)) * Mat4::from_rotation_z(0.4),
        );
    }
    scene
}

/// Orthographic rays looking down -Z over a 8 x 4 window.
fn grid_rays() -> Vec<Ray> {
    let mut rays = Vec::with_capacity(WIDTH * HEIGHT);
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let x = -4.0 + 8.0 * (col as f32 + 0.5) / WIDTH as f32;
            let y = 2.0 - 4.0 * (row as f32 + 0.5) / HEIGHT as f32;
            rays.push(Ray::new(Vec3::new(x, y, 0.0), Vec3::new(0.0, 0.0, -1.0)));
        }
    }
    rays
}

fn glyph(hit_type: HitType) -> char {
    match hit_type {
        HitType::None => '.',
        HitType::Triangle => '#',
        HitType::DisplacedTriangle => '%',
        HitType::Volume => '~',
        HitType::Curve => 'c',
        HitType::SdfGrid => 's',
    }
}
