use crate::{Point3, Vec3};

/// A parametric ray: origin plus scaled direction.
///
/// The `time` field records when during the shutter interval [0, 1) the ray
/// was fired, which is what moving primitives interpolate against.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Point3,
    direction: Vec3,
    time: f64,
}

impl Ray {
    #[inline]
    pub fn new(origin: Point3, direction: Vec3, time: f64) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// A ray fired at shutter time 0.
    #[inline]
    pub fn new_simple(origin: Point3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The point at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_walks_along_direction() {
        let ray = Ray::new_simple(Point3::new(2.0, 3.0, 4.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(0.0), Point3::new(2.0, 3.0, 4.0));
        assert_eq!(ray.at(1.0), Point3::new(3.0, 3.0, 4.0));
        assert_eq!(ray.at(-2.0), Point3::new(0.0, 3.0, 4.0));
    }

    #[test]
    fn accessors_round_trip() {
        let ray = Ray::new(Point3::ZERO, Vec3::Y, 0.25);
        assert_eq!(ray.origin(), Point3::ZERO);
        assert_eq!(ray.direction(), Vec3::Y);
        assert_eq!(ray.time(), 0.25);
    }
}
