//! Random sampling helpers shared by materials and the camera.
//!
//! Generators are always threaded explicitly as `&mut dyn RngCore`; there is
//! no global random state anywhere in the renderer, which keeps renders
//! reproducible from a seed and safe under data-parallel dispatch.

use ember_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform draw in [0, 1).
pub fn gen_f64(mut rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}

/// Uniform draw in [min, max).
pub fn gen_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Uniform integer draw in [min, max].
pub fn gen_index(mut rng: &mut dyn RngCore, min: usize, max: usize) -> usize {
    rng.gen_range(min..=max)
}

/// Rejection-sampled point strictly inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        let len_sq = p.length_squared();
        // Reject points outside the sphere and those too short to normalize.
        if len_sq > 1e-12 && len_sq < 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Rejection-sampled point inside the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
