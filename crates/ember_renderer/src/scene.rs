//! Building renderable scenes from descriptors.
//!
//! The descriptor is validated, primitives and their shared materials are
//! instantiated into a staging list, the list is consumed into a BVH, and
//! the camera is initialized from the view parameters. Everything the
//! returned [`Scene`] holds is immutable for the duration of the render.

use std::sync::Arc;

use ember_core::{MaterialDesc, SceneDescription, SceneError, ShapeDesc};
use ember_math::{Color, Point3, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::bvh::BvhNode;
use crate::camera::Camera;
use crate::hittable::HittableList;
use crate::material::{Dielectric, DiffuseLight, Lambertian, Material, Metal};
use crate::quad::{make_box, Quad};
use crate::renderer::{render, ImageBuffer, RenderConfig};
use crate::sphere::Sphere;
use crate::texture::Checker;

/// Spatial period of the checker pattern built for two-color lambertians.
const CHECKER_PERIOD: f64 = 2.0;

/// Output aspect ratio of descriptor-driven renders.
const ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Default focus distance; descriptor scenes are rendered pinhole, so this
/// only scales the viewport.
const FOCUS_DIST: f64 = 10.0;

/// A fully built, immutable scene ready to render.
pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
    pub config: RenderConfig,
}

/// Validate a descriptor and build the world, camera, and render settings.
///
/// `seed` drives both BVH construction and pixel sampling, making the whole
/// render reproducible.
pub fn build_scene(desc: &SceneDescription, seed: u64) -> Result<Scene, SceneError> {
    desc.validate()?;

    let mut list = HittableList::new();
    for primitive in &desc.primitives {
        let material = build_material(&primitive.material);
        match &primitive.shape {
            ShapeDesc::Sphere {
                center,
                center2,
                radius,
            } => {
                let center = Point3::from_array(*center);
                match center2 {
                    Some(center2) => list.add(Arc::new(Sphere::moving(
                        center,
                        Point3::from_array(*center2),
                        *radius,
                        material,
                    ))),
                    None => list.add(Arc::new(Sphere::stationary(center, *radius, material))),
                }
            }
            ShapeDesc::Quad {
                origin,
                edge_u,
                edge_v,
            } => list.add(Arc::new(Quad::new(
                Point3::from_array(*origin),
                Vec3::from_array(*edge_u),
                Vec3::from_array(*edge_v),
                material,
            ))),
            ShapeDesc::Box { corner_a, corner_b } => list.add(Arc::new(make_box(
                Point3::from_array(*corner_a),
                Point3::from_array(*corner_b),
                material,
            ))),
        }
    }

    log::debug!(
        "built {} primitives from {} descriptors",
        list.len(),
        desc.primitives.len()
    );

    let mut rng = SmallRng::seed_from_u64(seed);
    let world = BvhNode::from_list(list, &mut rng);

    let cam = &desc.camera;
    let mut camera = Camera::new()
        .with_image(ASPECT_RATIO, cam.image_width)
        .with_position(
            Point3::from_array(cam.look_from),
            Point3::from_array(cam.look_at),
            Vec3::from_array(cam.vup),
        )
        .with_lens(cam.vfov, 0.0, FOCUS_DIST);
    camera.initialize();

    let config =
        RenderConfig::from_preset(desc.quality, Color::from_array(cam.background)).with_seed(seed);

    Ok(Scene {
        world,
        camera,
        config,
    })
}

/// Build and render a descriptor in one call.
pub fn render_scene(desc: &SceneDescription, seed: u64) -> Result<ImageBuffer, SceneError> {
    let scene = build_scene(desc, seed)?;
    Ok(render(&scene.camera, &scene.world, &scene.config))
}

/// Instantiate the shared material for one primitive.
fn build_material(desc: &MaterialDesc) -> Arc<dyn Material> {
    match desc {
        MaterialDesc::Lambertian {
            albedo,
            checker: None,
        } => Arc::new(Lambertian::new(Color::from_array(*albedo))),
        MaterialDesc::Lambertian {
            albedo,
            checker: Some(secondary),
        } => Arc::new(Lambertian::textured(Arc::new(Checker::from_colors(
            CHECKER_PERIOD,
            Color::from_array(*albedo),
            Color::from_array(*secondary),
        )))),
        MaterialDesc::Metal { albedo, fuzz } => {
            Arc::new(Metal::new(Color::from_array(*albedo), *fuzz))
        }
        MaterialDesc::Dielectric { refractive_index } => {
            Arc::new(Dielectric::new(*refractive_index))
        }
        MaterialDesc::DiffuseLight { emit } => {
            Arc::new(DiffuseLight::new(Color::from_array(*emit)))
        }
    }
}
