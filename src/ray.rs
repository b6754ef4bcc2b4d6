use crate::vector::Vector3;
use crate::error::Result;

/// A ray with a unit-length direction.
///
/// A new ray is built for every primary, shadow and reflected cast, and rays
/// are never shared between threads.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Fails if `direction` has no length.
    pub fn new(origin: Vector3, direction: Vector3) -> Result<Ray> {
        Ok(Ray { origin, direction: direction.normalize()? })
    }

    /// Creates a ray towards `target`.
    pub fn towards(origin: Vector3, target: Vector3) -> Result<Ray> {
        Ray::new(origin, target - origin)
    }

    pub fn position(&self, t: f64) -> Vector3 {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
        Vector3::new(2.0, 3.0, 4.0),
        Vector3::new(1.0, 0.0, 0.0)
    ).unwrap();

    assert_eq!(r.position(0.0), Vector3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vector3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vector3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vector3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_direction_is_normalized() {
    let r = Ray::towards(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 10.0)
    ).unwrap();

    assert_eq!(r.direction, Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(r.position(10.0), Vector3::new(0.0, 0.0, 10.0));
}

#[test]
fn ray_without_direction_fails() {
    let p = Vector3::new(1.0, 1.0, 1.0);

    assert!(Ray::towards(p, p).is_err());
}
