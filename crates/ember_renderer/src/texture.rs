//! Color-field textures sampled by materials.

use std::path::Path;
use std::sync::Arc;

use ember_core::RasterImage;
use ember_math::{Color, Interval, Point3};
use rand::RngCore;

use crate::perlin::Perlin;

/// Debug color returned when an image texture has no pixel data.
const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Octaves accumulated by the noise texture's turbulence.
const TURBULENCE_DEPTH: u32 = 7;

/// A color field over surface coordinates and world position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// Constant color everywhere.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// 3-D checker pattern alternating two sub-textures.
///
/// Keyed on world-space position, not (u, v): surfaces that share space
/// share the pattern, and scenes depend on that.
pub struct Checker {
    inv_period: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    pub fn new(period: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_period: 1.0 / period,
            even,
            odd,
        }
    }

    pub fn from_colors(period: f64, even: Color, odd: Color) -> Self {
        Self::new(
            period,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for Checker {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let x = (self.inv_period * p.x).floor() as i64;
        let y = (self.inv_period * p.y).floor() as i64;
        let z = (self.inv_period * p.z).floor() as i64;

        if (x + y + z) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Nearest-pixel lookup into a decoded raster.
pub struct ImageTexture {
    image: RasterImage,
}

impl ImageTexture {
    pub fn new(image: RasterImage) -> Self {
        Self { image }
    }

    /// Load from a file, degrading to the debug color if that fails.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::new(RasterImage::load_or_empty(path))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        if self.image.height() == 0 {
            return MISSING_IMAGE_COLOR;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Flip v to the raster's top-down row order.
        let v = 1.0 - unit.clamp(v);

        let i = ((u * self.image.width() as f64) as u32).min(self.image.width() - 1);
        let j = ((v * self.image.height() as f64) as u32).min(self.image.height() - 1);
        let pixel = self.image.pixel(i, j);

        let scale = 1.0 / 255.0;
        Color::new(
            scale * pixel[0] as f64,
            scale * pixel[1] as f64,
            scale * pixel[2] as f64,
        )
    }
}

/// Marble-like pattern: a sine through the z coordinate, phase-shifted by
/// turbulent Perlin noise.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        let s = self.scale * p;
        Color::ONE * 0.5 * (1.0 + (s.z + 10.0 * self.noise.turb(s, TURBULENCE_DEPTH)).sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn solid_color_ignores_coordinates() {
        let tex = SolidColor::from_rgb(0.2, 0.4, 0.6);
        let a = tex.value(0.0, 0.0, Point3::ZERO);
        let b = tex.value(0.9, 0.1, Point3::new(100.0, -3.0, 7.0));
        assert_eq!(a, b);
        assert_eq!(a, Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn checker_alternates_between_cells() {
        let even = Color::new(1.0, 1.0, 1.0);
        let odd = Color::new(0.0, 0.0, 0.0);
        let tex = Checker::from_colors(1.0, even, odd);

        assert_eq!(tex.value(0.0, 0.0, Point3::new(0.5, 0.5, 0.5)), even);
        assert_eq!(tex.value(0.0, 0.0, Point3::new(1.5, 0.5, 0.5)), odd);
    }

    #[test]
    fn checker_tiles_with_its_period() {
        let period = 2.0;
        let even = Color::new(1.0, 0.0, 0.0);
        let odd = Color::new(0.0, 1.0, 0.0);
        let tex = Checker::from_colors(period, even, odd);

        // Two periods along one axis land in a cell of the same parity.
        let here = tex.value(0.3, 0.7, Point3::ZERO);
        let there = tex.value(0.3, 0.7, Point3::new(2.0 * period, 0.0, 0.0));
        assert_eq!(here, there);
    }

    #[test]
    fn checker_is_independent_of_uv() {
        let tex = Checker::from_colors(1.0, Color::ONE, Color::ZERO);
        let p = Point3::new(0.5, 0.5, 0.5);
        assert_eq!(tex.value(0.0, 0.0, p), tex.value(0.99, 0.42, p));
    }

    #[test]
    fn image_texture_samples_nearest_pixel() {
        // 2x1 raster: left red, right blue.
        let raster = RasterImage::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]);
        let tex = ImageTexture::new(raster);

        let left = tex.value(0.1, 0.5, Point3::ZERO);
        let right = tex.value(0.9, 0.5, Point3::ZERO);
        assert!(left.x > 0.99 && left.z < 0.01);
        assert!(right.z > 0.99 && right.x < 0.01);
    }

    #[test]
    fn image_texture_clamps_out_of_range_uv() {
        let raster = RasterImage::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]);
        let tex = ImageTexture::new(raster);
        assert_eq!(
            tex.value(-3.0, 0.5, Point3::ZERO),
            tex.value(0.0, 0.5, Point3::ZERO)
        );
        assert_eq!(
            tex.value(7.0, 0.5, Point3::ZERO),
            tex.value(1.0, 0.5, Point3::ZERO)
        );
    }

    #[test]
    fn empty_image_yields_debug_color() {
        let tex = ImageTexture::new(RasterImage::empty());
        assert_eq!(tex.value(0.5, 0.5, Point3::ZERO), Color::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn unloadable_image_degrades_to_debug_color() {
        let tex = ImageTexture::load("/nonexistent/marble.png");
        assert_eq!(tex.value(0.5, 0.5, Point3::ZERO), Color::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn noise_texture_stays_in_unit_range() {
        let mut rng = SmallRng::seed_from_u64(21);
        let tex = NoiseTexture::new(4.0, &mut rng);
        for step in 0..100 {
            let t = step as f64 * 0.23;
            let c = tex.value(0.0, 0.0, Point3::new(t, 1.0 - t, t * 0.5));
            assert!(c.x >= 0.0 && c.x <= 1.0);
            // Grayscale: all channels equal.
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }
}
