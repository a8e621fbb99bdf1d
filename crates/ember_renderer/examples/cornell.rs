//! Cornell-style demo scene.
//!
//! Builds a quad-walled box with a ceiling light, a metal sphere, and a
//! glass sphere from a scene descriptor, renders it, and writes a PNG.

use anyhow::Context;
use ember_core::{CameraDesc, MaterialDesc, PrimitiveDesc, QualityPreset, SceneDescription, ShapeDesc};
use ember_renderer::render_scene;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let desc = cornell_scene();
    println!(
        "rendering {} primitives at {:?} quality...",
        desc.primitives.len(),
        desc.quality
    );

    let start = std::time::Instant::now();
    let image = render_scene(&desc, 0)?;
    println!(
        "rendered {}x{} in {:?}",
        image.width,
        image.height,
        start.elapsed()
    );

    let filename = "cornell.png";
    image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
        .context("raster size mismatch")?
        .save(filename)
        .context("failed to write PNG")?;
    println!("saved to {filename}");

    Ok(())
}

fn cornell_scene() -> SceneDescription {
    let mut primitives = Vec::new();

    let white = [0.73, 0.73, 0.73];
    let green = [0.12, 0.45, 0.15];
    let red = [0.65, 0.05, 0.05];

    // Walls: left, right, floor, ceiling, back.
    let walls = [
        ([555.0, 0.0, 0.0], [0.0, 555.0, 0.0], [0.0, 0.0, 555.0], green),
        ([0.0, 0.0, 0.0], [0.0, 555.0, 0.0], [0.0, 0.0, 555.0], red),
        ([0.0, 0.0, 0.0], [555.0, 0.0, 0.0], [0.0, 0.0, 555.0], white),
        ([0.0, 555.0, 0.0], [555.0, 0.0, 0.0], [0.0, 0.0, 555.0], white),
        ([0.0, 0.0, 555.0], [555.0, 0.0, 0.0], [0.0, 555.0, 0.0], white),
    ];
    for (origin, edge_u, edge_v, albedo) in walls {
        primitives.push(PrimitiveDesc {
            shape: ShapeDesc::Quad {
                origin,
                edge_u,
                edge_v,
            },
            material: MaterialDesc::Lambertian {
                albedo,
                checker: None,
            },
        });
    }

    // Ceiling light.
    primitives.push(PrimitiveDesc {
        shape: ShapeDesc::Quad {
            origin: [343.0, 554.0, 332.0],
            edge_u: [-130.0, 0.0, 0.0],
            edge_v: [0.0, 0.0, -105.0],
        },
        material: MaterialDesc::DiffuseLight {
            emit: [15.0, 15.0, 15.0],
        },
    });

    // A checkered pedestal box and two spheres.
    primitives.push(PrimitiveDesc {
        shape: ShapeDesc::Box {
            corner_a: [130.0, 0.0, 65.0],
            corner_b: [295.0, 165.0, 230.0],
        },
        material: MaterialDesc::Lambertian {
            albedo: [0.45, 0.45, 0.65],
            checker: Some([0.9, 0.9, 0.9]),
        },
    });
    primitives.push(PrimitiveDesc {
        shape: ShapeDesc::Sphere {
            center: [400.0, 90.0, 300.0],
            center2: None,
            radius: 90.0,
        },
        material: MaterialDesc::Metal {
            albedo: [0.8, 0.85, 0.88],
            fuzz: 0.05,
        },
    });
    primitives.push(PrimitiveDesc {
        shape: ShapeDesc::Sphere {
            center: [212.0, 240.0, 147.0],
            center2: None,
            radius: 75.0,
        },
        material: MaterialDesc::Dielectric {
            refractive_index: 1.5,
        },
    });

    SceneDescription {
        primitives,
        camera: CameraDesc {
            vfov: 40.0,
            look_from: [278.0, 278.0, -800.0],
            look_at: [278.0, 278.0, 0.0],
            vup: [0.0, 1.0, 0.0],
            background: [0.0, 0.0, 0.0],
            image_width: 400,
        },
        quality: QualityPreset::Low,
    }
}
