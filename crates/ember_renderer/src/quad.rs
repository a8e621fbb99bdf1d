//! Planar parallelogram primitive, and the six-quad box built from it.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Point3, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;

/// Rays closer to parallel than this to the quad's plane never hit it.
const PARALLEL_EPSILON: f64 = 1e-8;

/// A parallelogram: origin `q` plus edge vectors `u` and `v`.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// Plane-coordinate helper: `n / (n . n)` for the unnormalized normal.
    w: Vec3,
    normal: Vec3,
    d: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        // Both diagonals, so slanted quads are bounded by all four corners.
        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }

    /// Interior test in plane coordinates; a parallelogram spans [0,1]².
    fn is_interior(alpha: f64, beta: f64) -> bool {
        (0.0..=1.0).contains(&alpha) && (0.0..=1.0).contains(&beta)
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        if !Self::is_interior(alpha, beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six-sided box spanned by two opposite corners `a` and `b`.
///
/// Returns the sides as a composite list sharing one material.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    )));
    // right
    sides.add(Arc::new(Quad::new(
        Point3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    )));
    // back
    sides.add(Arc::new(Quad::new(
        Point3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    )));
    // left
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    )));
    // top
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    )));
    // bottom
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    )));

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_math::Color;

    fn material() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn unit_quad() -> Quad {
        Quad::new(Point3::ZERO, Vec3::X, Vec3::Y, material())
    }

    #[test]
    fn ray_through_center_is_interior() {
        let quad = unit_quad();
        // Aim at plane coordinates (0.5, 0.5).
        let ray = Ray::new_simple(Point3::new(0.5, 0.5, 1.0), -Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!((rec.u - 0.5).abs() < 1e-12);
        assert!((rec.v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ray_outside_edge_misses() {
        let quad = unit_quad();
        // Plane coordinates (1.5, 0.5) lie outside the parallelogram.
        let ray = Ray::new_simple(Point3::new(1.5, 0.5, 1.0), -Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(!quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn near_parallel_ray_rejected() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Point3::new(0.5, 0.5, 1.0), Vec3::new(1.0, 0.0, 1e-12));

        let mut rec = HitRecord::default();
        assert!(!quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn slanted_quad_bbox_covers_all_corners() {
        let quad = Quad::new(
            Point3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            material(),
        );
        let bbox = quad.bounding_box();
        // Corners q+u = (1,1,0) and q+v = (-1,1,0) must be inside.
        assert!(bbox.x.min <= -1.0);
        assert!(bbox.x.max >= 1.0);
        assert!(bbox.y.max >= 2.0);
    }

    #[test]
    fn box_has_six_sides_spanning_corners() {
        let sides = make_box(
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, -1.0, -1.0),
            material(),
        );
        assert_eq!(sides.len(), 6);

        let bbox = sides.bounding_box();
        assert_eq!(bbox.x.min, -1.0);
        assert_eq!(bbox.x.max, 1.0);

        // A ray from outside strikes the near face first.
        let ray = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(sides.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-12);
        assert!((rec.normal - Vec3::Z).length() < 1e-12);
    }
}
