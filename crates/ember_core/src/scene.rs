//! Scene descriptor types and validation.
//!
//! A [`SceneDescription`] is the full input to a render: a list of
//! primitives with their materials, the camera view, and a quality preset.
//! Descriptors are plain data; nothing here touches rendering state.

use ember_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing or validating a scene descriptor.
///
/// Validation rejects the whole scene on the first invalid entity rather
/// than silently skipping it, so a bad descriptor never half-renders.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("primitive {index}: sphere radius must be positive, got {radius}")]
    NonPositiveRadius { index: usize, radius: f64 },

    #[error("primitive {index}: quad edge vector is zero-length")]
    ZeroQuadEdge { index: usize },

    #[error("primitive {index}: quad edges are parallel, the plane normal is degenerate")]
    DegenerateQuadPlane { index: usize },

    #[error("primitive {index}: box has zero extent on axis {axis}")]
    FlatBox { index: usize, axis: usize },

    #[error("primitive {index}: refractive index must be positive, got {refractive_index}")]
    NonPositiveRefractiveIndex { index: usize, refractive_index: f64 },

    #[error("camera up vector is zero-length")]
    ZeroUpVector,

    #[error("camera look_from and look_at coincide")]
    DegenerateViewDirection,

    #[error("malformed scene descriptor: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Render quality preset, mapping to a (bounce depth, samples) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    Low,
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum ray bounce depth for this preset.
    pub fn max_depth(self) -> u32 {
        match self {
            QualityPreset::Low => 10,
            QualityPreset::Medium => 100,
            QualityPreset::High => 200,
        }
    }

    /// Rays averaged per pixel for this preset.
    pub fn samples_per_pixel(self) -> u32 {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 300,
            QualityPreset::High => 800,
        }
    }
}

/// Geometry of a single primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    /// A sphere, optionally sweeping linearly from `center` to `center2`
    /// over the shutter interval.
    Sphere {
        center: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        center2: Option<[f64; 3]>,
        radius: f64,
    },
    /// A planar parallelogram: origin plus two edge vectors.
    Quad {
        origin: [f64; 3],
        edge_u: [f64; 3],
        edge_v: [f64; 3],
    },
    /// An axis-aligned box spanned by two opposite corners, in any order.
    Box {
        corner_a: [f64; 3],
        corner_b: [f64; 3],
    },
}

/// Scattering model of a single primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    /// Diffuse surface. A secondary color turns the albedo into a
    /// world-space checker of the two colors.
    Lambertian {
        albedo: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checker: Option<[f64; 3]>,
    },
    /// Fuzzy-reflective surface; `fuzz` is clamped to [0, 1] downstream.
    Metal { albedo: [f64; 3], fuzz: f64 },
    /// Clear refractive surface (glass ~1.5, diamond ~2.4).
    Dielectric { refractive_index: f64 },
    /// Pure emitter; never scatters.
    DiffuseLight { emit: [f64; 3] },
}

/// One primitive: its geometry paired with its scattering model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimitiveDesc {
    pub shape: ShapeDesc,
    pub material: MaterialDesc,
}

/// Camera view parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDesc {
    /// Vertical field of view, degrees.
    pub vfov: f64,
    pub look_from: [f64; 3],
    pub look_at: [f64; 3],
    pub vup: [f64; 3],
    /// Color returned by rays that escape the scene.
    pub background: [f64; 3],
    /// Output raster width in pixels; height follows from the fixed 16:9
    /// aspect ratio.
    #[serde(default = "default_image_width")]
    pub image_width: u32,
}

fn default_image_width() -> u32 {
    300
}

/// Complete description of a render: what to draw, from where, how hard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    pub primitives: Vec<PrimitiveDesc>,
    pub camera: CameraDesc,
    pub quality: QualityPreset,
}

impl SceneDescription {
    /// Parse a descriptor from JSON text and validate it.
    ///
    /// Unknown shape or material identifiers surface here as
    /// [`SceneError::Parse`]; the closed enums reject them wholesale.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let desc: Self = serde_json::from_str(text)?;
        desc.validate()?;
        Ok(desc)
    }

    /// Check every entity for geometric and numeric sanity.
    ///
    /// Fails on the first offender so degenerate inputs never reach the
    /// intersection math as NaN or infinity.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, primitive) in self.primitives.iter().enumerate() {
            match &primitive.shape {
                ShapeDesc::Sphere { radius, .. } => {
                    if *radius <= 0.0 {
                        return Err(SceneError::NonPositiveRadius {
                            index,
                            radius: *radius,
                        });
                    }
                }
                ShapeDesc::Quad { edge_u, edge_v, .. } => {
                    let u = Vec3::from_array(*edge_u);
                    let v = Vec3::from_array(*edge_v);
                    if u.length_squared() == 0.0 || v.length_squared() == 0.0 {
                        return Err(SceneError::ZeroQuadEdge { index });
                    }
                    if u.cross(v).length_squared() < 1e-12 {
                        return Err(SceneError::DegenerateQuadPlane { index });
                    }
                }
                ShapeDesc::Box { corner_a, corner_b } => {
                    for axis in 0..3 {
                        if corner_a[axis] == corner_b[axis] {
                            return Err(SceneError::FlatBox { index, axis });
                        }
                    }
                }
            }

            if let MaterialDesc::Dielectric { refractive_index } = primitive.material {
                if refractive_index <= 0.0 {
                    return Err(SceneError::NonPositiveRefractiveIndex {
                        index,
                        refractive_index,
                    });
                }
            }
        }

        if Vec3::from_array(self.camera.vup).length_squared() == 0.0 {
            return Err(SceneError::ZeroUpVector);
        }
        if self.camera.look_from == self.camera.look_at {
            return Err(SceneError::DegenerateViewDirection);
        }

        Ok(())
    }
}
