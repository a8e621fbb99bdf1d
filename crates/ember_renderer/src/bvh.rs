//! Bounding volume hierarchy over a primitive set.
//!
//! Construction is median-split: each node draws a uniformly random axis,
//! sorts its span by the box minimum on that axis, and recurses on the two
//! halves. Traversal prunes with the node box and narrows the right subtree
//! by the left subtree's hit. The BVH changes performance only; results
//! must be identical to a brute-force scan of the same primitives.

use std::cmp::Ordering;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::sampling::gen_index;

/// Binary BVH node; children are either primitives or further nodes.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Consume a staging list into a BVH.
    ///
    /// `rng` drives the per-node split-axis choice; seed it for
    /// reproducible trees.
    pub fn from_list(list: HittableList, rng: &mut dyn RngCore) -> Self {
        let mut objects = list.into_objects();
        if objects.is_empty() {
            // Degenerate but legal: a node that hits nothing.
            let nothing: Arc<dyn Hittable> = Arc::new(HittableList::new());
            return Self {
                left: nothing.clone(),
                right: nothing,
                bbox: Aabb::EMPTY,
            };
        }
        Self::build(&mut objects, rng)
    }

    fn build(objects: &mut [Arc<dyn Hittable>], rng: &mut dyn RngCore) -> Self {
        let axis = gen_index(rng, 0, 2);

        let (left, right) = match objects.len() {
            1 => {
                // Single primitive: reference it from both sides.
                (objects[0].clone(), objects[0].clone())
            }
            2 => {
                if Self::box_compare(&objects[0], &objects[1], axis) == Ordering::Greater {
                    (objects[1].clone(), objects[0].clone())
                } else {
                    (objects[0].clone(), objects[1].clone())
                }
            }
            len => {
                objects.sort_unstable_by(|a, b| Self::box_compare(a, b, axis));
                let (lo, hi) = objects.split_at_mut(len / 2);
                let left: Arc<dyn Hittable> = Arc::new(Self::build(lo, &mut *rng));
                let right: Arc<dyn Hittable> = Arc::new(Self::build(hi, rng));
                (left, right)
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        Self { left, right, bbox }
    }

    /// Order two hittables by their box minimum along `axis`.
    fn box_compare(a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>, axis: usize) -> Ordering {
        let a_min = a.bounding_box().axis_interval(axis).min;
        let b_min = b.bounding_box().axis_interval(axis).min;
        a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec);
        // The left hit narrows what the right subtree can still improve on.
        let right_max = if hit_left { rec.t } else { ray_t.max };
        let hit_right = self
            .right
            .hit(ray, Interval::new(ray_t.min, right_max), rec);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::quad::Quad;
    use crate::sampling::gen_range;
    use crate::sphere::Sphere;
    use ember_math::{Color, Point3, Vec3};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn material() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    /// A mixed bag of spheres and quads scattered around the origin.
    fn scatter_primitives(rng: &mut SmallRng) -> HittableList {
        let mut list = HittableList::new();
        for _ in 0..24 {
            let center = Point3::new(
                gen_range(rng, -10.0, 10.0),
                gen_range(rng, -10.0, 10.0),
                gen_range(rng, -10.0, 10.0),
            );
            list.add(Arc::new(Sphere::stationary(
                center,
                gen_range(rng, 0.2, 1.5),
                material(),
            )));
        }
        for _ in 0..12 {
            let q = Point3::new(
                gen_range(rng, -10.0, 10.0),
                gen_range(rng, -10.0, 10.0),
                gen_range(rng, -10.0, 10.0),
            );
            let u = Vec3::new(gen_range(rng, 0.5, 2.0), 0.0, gen_range(rng, -1.0, 1.0));
            let v = Vec3::new(0.0, gen_range(rng, 0.5, 2.0), gen_range(rng, -1.0, 1.0));
            list.add(Arc::new(Quad::new(q, u, v, material())));
        }
        list
    }

    #[test]
    fn single_primitive_duplicate_leaf_hits() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::stationary(
            Point3::new(0.0, 0.0, -3.0),
            1.0,
            material(),
        )));

        let mut rng = SmallRng::seed_from_u64(1);
        let bvh = BvhNode::from_list(list, &mut rng);

        let ray = Ray::new_simple(Point3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn node_box_bounds_both_children() {
        let mut rng = SmallRng::seed_from_u64(2);
        let list = scatter_primitives(&mut rng);
        let expected = list.bounding_box();
        let bvh = BvhNode::from_list(list, &mut rng);

        let bbox = bvh.bounding_box();
        assert_eq!(bbox.x.min, expected.x.min);
        assert_eq!(bbox.x.max, expected.x.max);
        assert_eq!(bbox.y.min, expected.y.min);
        assert_eq!(bbox.z.max, expected.z.max);
    }

    #[test]
    fn empty_scene_never_hits() {
        let mut rng = SmallRng::seed_from_u64(3);
        let bvh = BvhNode::from_list(HittableList::new(), &mut rng);

        let ray = Ray::new_simple(Point3::ZERO, Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn traversal_matches_brute_force_exactly() {
        let mut rng = SmallRng::seed_from_u64(4);

        // Build the same primitives twice: once for the flat list, once for
        // the BVH. Identical construction order gives identical objects.
        let list = scatter_primitives(&mut SmallRng::seed_from_u64(99));
        let staged = scatter_primitives(&mut SmallRng::seed_from_u64(99));
        let bvh = BvhNode::from_list(staged, &mut rng);

        for _ in 0..500 {
            let origin = Point3::new(
                gen_range(&mut rng, -15.0, 15.0),
                gen_range(&mut rng, -15.0, 15.0),
                gen_range(&mut rng, -15.0, 15.0),
            );
            let direction = Vec3::new(
                gen_range(&mut rng, -1.0, 1.0),
                gen_range(&mut rng, -1.0, 1.0),
                gen_range(&mut rng, -1.0, 1.0),
            );
            if direction.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new_simple(origin, direction);
            let span = Interval::new(0.001, f64::INFINITY);

            let mut brute = HitRecord::default();
            let mut accel = HitRecord::default();
            let hit_brute = list.hit(&ray, span, &mut brute);
            let hit_accel = bvh.hit(&ray, span, &mut accel);

            assert_eq!(hit_brute, hit_accel);
            if hit_brute {
                assert_eq!(brute.t, accel.t);
                assert_eq!(brute.p, accel.p);
                assert_eq!(brute.normal, accel.normal);
                assert_eq!(brute.front_face, accel.front_face);
            }
        }
    }
}
