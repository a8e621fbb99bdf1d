//! Recursive Monte Carlo integrator and the parallel render driver.

use std::panic::{self, AssertUnwindSafe};

use ember_core::QualityPreset;
use ember_math::{Color, Interval, Ray};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::hittable::{HitRecord, Hittable};

/// Rays starting closer than this to a surface are ignored, which keeps
/// bounced rays from re-hitting their own origin ("shadow acne").
const T_MIN: f64 = 0.001;

/// Sampling parameters for one render call.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Rays averaged per pixel.
    pub samples_per_pixel: u32,
    /// Hard bounce budget per path.
    pub max_depth: u32,
    /// Color of rays that escape the scene.
    pub background: Color,
    /// Base seed for the per-pixel generators; same seed, same image.
    pub seed: u64,
}

impl RenderConfig {
    /// Map a quality preset onto sampling parameters.
    pub fn from_preset(preset: QualityPreset, background: Color) -> Self {
        Self {
            samples_per_pixel: preset.samples_per_pixel(),
            max_depth: preset.max_depth(),
            background,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            seed: 0,
        }
    }
}

/// Estimate the radiance arriving along `ray`.
///
/// Backward path tracing with a hard depth cutoff: a path that exhausts its
/// bounce budget contributes black. That slightly darkens deep paths;
/// compensate by raising `max_depth`, not with roulette termination.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(T_MIN, f64::INFINITY), &mut rec) {
        return background;
    }

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(scatter) => {
            emitted
                + scatter.attenuation
                    * ray_color(&scatter.scattered, world, depth - 1, background, rng)
        }
        // Absorbed: the path terminates here, e.g. at a light.
        None => emitted,
    }
}

/// Average `samples_per_pixel` independent estimates for pixel (i, j).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(i, j, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config.background, rng);
    }
    pixel_color / config.samples_per_pixel as f64
}

/// Linear radiance buffer; `to_rgb8` produces the encoded output raster.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Encode to row-major RGB8: gamma-2, clamped, quantized.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Gamma-2 encoding.
#[inline]
fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Encode one linear color as 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval {
        min: 0.0,
        max: 0.999,
    };
    [
        (256.0 * INTENSITY.clamp(linear_to_gamma(color.x))) as u8,
        (256.0 * INTENSITY.clamp(linear_to_gamma(color.y))) as u8,
        (256.0 * INTENSITY.clamp(linear_to_gamma(color.z))) as u8,
    ]
}

/// Render the scene into a linear image buffer.
///
/// Scanlines run sequentially; the pixels of each row are distributed over
/// rayon's worker pool, which load-balances the uneven per-pixel cost of
/// deep bounces. Pixels own disjoint buffer slots, and the scene is
/// read-only, so no synchronization is needed. Runs to completion; callers
/// wanting cancellation wrap the call in a task of their own.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    let mut image = ImageBuffer::new(width, height);

    for j in 0..height {
        log::debug!("scanlines remaining: {}", height - j);

        let row_start = (j * width) as usize;
        let row = &mut image.pixels[row_start..row_start + width as usize];

        row.par_iter_mut().enumerate().for_each(|(i, pixel)| {
            let i = i as u32;
            let mut rng = SmallRng::seed_from_u64(pixel_seed(config.seed, i, j, width));

            let shaded = panic::catch_unwind(AssertUnwindSafe(|| {
                render_pixel(camera, world, i, j, config, &mut rng)
            }));

            // One bad pixel must not take down the image.
            *pixel = match shaded {
                Ok(color) if color.is_finite() => color,
                Ok(color) => {
                    log::error!("non-finite sample at ({i}, {j}): {color:?}");
                    config.background
                }
                Err(_) => {
                    log::error!("shading panicked at ({i}, {j})");
                    config.background
                }
            };
        });
    }

    log::debug!("render complete: {width}x{height}");
    image
}

/// Decorrelate per-pixel generators while keeping them reproducible.
fn pixel_seed(seed: u64, i: u32, j: u32, width: u32) -> u64 {
    let index = j as u64 * width as u64 + i as u64;
    seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::BvhNode;
    use crate::hittable::HittableList;
    use crate::material::{DiffuseLight, Lambertian, Material};
    use crate::sphere::Sphere;
    use ember_math::Point3;
    use std::sync::Arc;

    /// Small square camera staring down -z at a sphere two units away.
    fn head_on_camera() -> Camera {
        let mut camera = Camera::new()
            .with_image(1.0, 11)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), crate::Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();
        camera
    }

    fn single_sphere_world(material: Arc<dyn Material>) -> BvhNode {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::stationary(
            Point3::new(0.0, 0.0, -2.0),
            0.5,
            material,
        )));
        let mut rng = SmallRng::seed_from_u64(0);
        BvhNode::from_list(list, &mut rng)
    }

    #[test]
    fn depth_zero_returns_black() {
        let world = single_sphere_world(Arc::new(Lambertian::new(Color::splat(0.5))));
        let ray = Ray::new_simple(Point3::ZERO, -crate::Vec3::Z);
        let mut rng = SmallRng::seed_from_u64(1);

        let c = ray_color(&ray, &world, 0, Color::new(0.7, 0.7, 0.7), &mut rng);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn miss_returns_background_exactly() {
        let world = single_sphere_world(Arc::new(Lambertian::new(Color::splat(0.5))));
        let background = Color::new(0.25, 0.5, 0.75);
        let ray = Ray::new_simple(Point3::ZERO, crate::Vec3::Y);
        let mut rng = SmallRng::seed_from_u64(2);

        let c = ray_color(&ray, &world, 10, background, &mut rng);
        assert_eq!(c, background);
    }

    #[test]
    fn emissive_sphere_lights_its_silhouette_only() {
        // Red light on black background: the terminal-emission path needs
        // just one bounce of budget.
        let world = single_sphere_world(Arc::new(DiffuseLight::new(Color::new(1.0, 0.0, 0.0))));
        let camera = head_on_camera();
        let config = RenderConfig {
            samples_per_pixel: 1,
            max_depth: 1,
            background: Color::ZERO,
            seed: 7,
        };

        let image = render(&camera, &world, &config);

        let center = image.get(5, 5);
        assert!(center.x > 0.0, "center pixel should see the light");
        assert_eq!(center.y, 0.0);

        let corner = image.get(0, 0);
        assert_eq!(corner, Color::ZERO, "background pixels match exactly");
    }

    #[test]
    fn diffuse_sphere_reflects_background_through_its_albedo() {
        // A scatter path needs depth 2: depth 1 exhausts the budget on the
        // bounce and returns black by the cutoff rule.
        let albedo = Color::new(0.9, 0.1, 0.1);
        let world = single_sphere_world(Arc::new(Lambertian::new(albedo)));
        let camera = head_on_camera();
        let background = Color::splat(0.5);
        let config = RenderConfig {
            samples_per_pixel: 1,
            max_depth: 2,
            background,
            seed: 7,
        };

        let image = render(&camera, &world, &config);

        // The bounced ray cannot re-hit a convex sphere, so the center
        // pixel is exactly albedo * background: strongly red-shifted.
        let center = image.get(5, 5);
        assert!((center.x - 0.45).abs() < 1e-12);
        assert!((center.y - 0.05).abs() < 1e-12);
        assert!(center.x > 4.0 * center.y);

        let corner = image.get(0, 0);
        assert_eq!(corner, background);
    }

    #[test]
    fn same_seed_reproduces_the_image() {
        let world = single_sphere_world(Arc::new(Lambertian::new(Color::new(0.6, 0.6, 0.2))));
        let camera = head_on_camera();
        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            background: Color::splat(0.3),
            seed: 99,
        };

        let first = render(&camera, &world, &config);
        let second = render(&camera, &world, &config);
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn gamma_encoding_and_clamping() {
        // 0.25 linear encodes to sqrt = 0.5 -> 128.
        assert_eq!(color_to_rgb8(Color::splat(0.25)), [128, 128, 128]);
        // Overbright values clamp below 256.
        assert_eq!(color_to_rgb8(Color::splat(4.0)), [255, 255, 255]);
        // Negative values floor to zero.
        assert_eq!(color_to_rgb8(Color::splat(-1.0)), [0, 0, 0]);
    }

    #[test]
    fn rgb8_buffer_is_row_major() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 0, Color::new(0.0, 1.0, 0.0));

        let bytes = image.to_rgb8();
        assert_eq!(bytes.len(), 6);
        assert_eq!(&bytes[0..3], &[255, 0, 0]);
        assert_eq!(&bytes[3..6], &[0, 255, 0]);
    }
}
