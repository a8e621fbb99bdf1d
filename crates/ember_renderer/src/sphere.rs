//! Sphere primitive, stationary or linearly moving.

use std::f64::consts::PI;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Point3, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// A sphere whose center may sweep linearly over the shutter interval.
pub struct Sphere {
    center1: Point3,
    /// Displacement to the shutter-end center; zero when stationary.
    center_vec: Vec3,
    is_moving: bool,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// A sphere fixed at `center`.
    pub fn stationary(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        Self {
            center1: center,
            center_vec: Vec3::ZERO,
            is_moving: false,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    /// A sphere sweeping from `center1` at time 0 to `center2` at time 1.
    /// The bounding box covers the whole sweep.
    pub fn moving(
        center1: Point3,
        center2: Point3,
        radius: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        let box2 = Aabb::from_points(center2 - rvec, center2 + rvec);
        Self {
            center1,
            center_vec: center2 - center1,
            is_moving: true,
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    fn center(&self, time: f64) -> Point3 {
        if self.is_moving {
            self.center1 + time * self.center_vec
        } else {
            self.center1
        }
    }

    /// Spherical parameterization of a point on the unit sphere:
    /// `u` wraps around the Y axis from X = -1, `v` runs pole to pole.
    fn sphere_uv(p: Point3) -> (f64, f64) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let center = self.center(ray.time());
        let oc = ray.origin() - center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return false;
        }
        let sqrtd = discriminant.sqrt();

        // Prefer the near root, fall back to the far one.
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
