//! Ember renderer: offline CPU Monte Carlo path tracing.
//!
//! Scene description in, RGB raster out. The pipeline: descriptors build
//! primitives into a staging list, the list is consumed once into a BVH,
//! the camera is initialized from the view parameters, and the integrator
//! casts `samples_per_pixel` recursive rays per pixel through the BVH.
//!
//! Windowing, display, and scene-file parsing are the caller's business;
//! this crate never touches a screen or a markup file.

mod bvh;
mod camera;
mod hittable;
mod material;
mod perlin;
mod quad;
mod renderer;
mod sampling;
pub mod scene;
mod sphere;
mod texture;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use perlin::Perlin;
pub use quad::{make_box, Quad};
pub use renderer::{color_to_rgb8, ray_color, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::{build_scene, render_scene, Scene};
pub use sphere::Sphere;
pub use texture::{Checker, ImageTexture, NoiseTexture, SolidColor, Texture};

/// Re-export the math types so downstream code needs only this crate.
pub use ember_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
