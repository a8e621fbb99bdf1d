//! Hittable trait, hit records, and the flat primitive list.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

use crate::material::{Material, ScatterResult};

/// Placeholder material for freshly created hit records; absorbs everything.
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }
}

static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Transient record of the nearest ray-surface intersection found so far.
///
/// Created fresh per intersection query and overwritten as closer hits are
/// found; never retained across rays.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection.
    pub p: Point3,
    /// Surface normal, flipped to point against the incoming ray.
    pub normal: Vec3,
    /// Material at the intersection point.
    pub material: &'a dyn Material,
    /// Ray parameter of the intersection.
    pub t: f64,
    /// Surface parameterization, for texture lookup.
    pub u: f64,
    pub v: f64,
    /// Whether the ray struck the outward-facing side.
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Point3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            t: 0.0,
            u: 0.0,
            v: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Store `outward_normal` oriented against the ray, recording which side
    /// was struck. `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Any surface a ray can intersect.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection within `ray_t`, filling `rec` and
    /// returning true if one exists.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// A box bounding the surface over the whole shutter interval.
    fn bounding_box(&self) -> Aabb;
}

/// Unordered aggregate of hittables.
///
/// Serves two roles: the staging list a scene is assembled into before the
/// BVH consumes it, and the composite behind multi-face primitives like
/// boxes. Children are shared so the BVH can re-reference them.
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object, growing the aggregate bounding box.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Consume the list, yielding its children for BVH construction.
    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, Interval::new(ray_t.min, closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
