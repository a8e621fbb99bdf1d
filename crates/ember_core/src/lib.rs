//! Ember core: the renderer's external interface.
//!
//! This crate provides:
//!
//! - **Scene descriptors**: plain-data types describing primitives, their
//!   materials, the camera, and a quality preset. Hosts build these from
//!   whatever source they like (the types are serde-enabled for convenience)
//!   and hand them to `ember_renderer` for rendering.
//! - **Descriptor validation**: geometric and numeric sanity checks that
//!   reject a malformed scene before any ray is cast.
//! - **Raster loading**: image files decoded into the flat RGB rasters that
//!   image-mapped textures sample.

pub mod raster;
pub mod scene;

pub use raster::{RasterError, RasterImage};
pub use scene::{
    CameraDesc, MaterialDesc, PrimitiveDesc, QualityPreset, SceneDescription, SceneError,
    ShapeDesc,
};
