use std::ops::{ Add, AddAssign, Sub, Neg, Mul, Div };

use serde::{ Serialize, Deserialize };

use crate::feq;
use crate::consts::EPSILON;
use crate::error::{ Error, Result };

/// A three dimensional vector.
///
/// Used for points and directions alike; the tracer never needs the `w`
/// component distinction since there are no affine transforms in play.
/// Operations return new values and leave their operands untouched.
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Partial equality, tolerant to floating point error per component.
impl PartialEq for Vector3 {
    fn eq(&self, other: &Vector3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Vector3 {
        Vector3 { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> [f64; 3] {
        [v.x, v.y, v.z]
    }
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3 { x, y, z }
    }

    pub fn zero() -> Vector3 {
        Vector3 { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(self.x.powi(2) + self.y.powi(2) + self.z.powi(2))
    }

    /// Scales a vector to unit length.
    ///
    /// Vectors shorter than `EPSILON` have no direction; normalizing them is
    /// a domain error rather than a silent division by zero.
    pub fn normalize(&self) -> Result<Vector3> {
        let mag = self.magnitude();
        if mag <= EPSILON {
            return Err(Error::ZeroLengthVector);
        }

        Ok(*self / mag)
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Reflects a vector across a normal.
    ///
    /// `normal` is expected to be unit length.
    pub fn reflect(&self, normal: &Vector3) -> Vector3 {
        *self - (*normal * 2.0 * self.dot(normal))
    }

    /// Rotates a vector around `axis` by `angle` degrees.
    ///
    /// Uses Rodrigues' rotation formula; the axis does not need to be unit
    /// length but must not be zero.
    pub fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Vector3> {
        let theta = angle.to_radians();
        let k = axis.normalize()?;

        Ok(*self * theta.cos()
            + k.cross(self) * theta.sin()
            + k * k.dot(self) * (1.0 - theta.cos()))
    }

    pub fn distance(&self, other: &Vector3) -> f64 {
        (*self - *other).magnitude()
    }

    pub fn is_normalized(&self) -> bool {
        (self.magnitude() - 1.0).abs() <= EPSILON
    }

    pub fn is_orthogonal(&self, other: &Vector3) -> bool {
        self.dot(other).abs() <= EPSILON
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y, z: -self.z }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use whitted_tracer::vector::Vector3;
///
/// let v = Vector3::new(1.0, 2.0, 3.0);
/// assert_eq!(v * 2.0, Vector3::new(2.0, 4.0, 6.0));
/// ```
impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, other: Vector3) -> Vector3 {
        other * self
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
        }
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vector3::new(3.0, -2.0, 5.0);
    let a2 = Vector3::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vector3::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_vectors() {
    let p1 = Vector3::new(3.0, 2.0, 1.0);
    let p2 = Vector3::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_and_scale() {
    let a = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3::new(-1.0, 2.0, -3.0));
    assert_eq!(a * 3.5, Vector3::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Vector3::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude_neg() {
    let v = Vector3::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Vector3::new(1.0, 2.0, 3.0);
    let e = Vector3::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    let n = v.normalize().unwrap();
    assert_eq!(n, e);
    assert!(n.is_normalized());
}

#[test]
fn normalize_zero_is_an_error() {
    let v = Vector3::zero();

    assert!(matches!(v.normalize(), Err(Error::ZeroLengthVector)));
}

#[test]
fn cross_vectors() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Vector3::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vector3::new(1.0, -2.0, 1.0));
    assert!(a.cross(&b).is_orthogonal(&a));
}

#[test]
fn reflect_45() {
    let v = Vector3::new(1.0, -1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Vector3::new(1.0, 1.0, 0.0));
}

#[test]
fn rotate_quarter_turn() {
    let v = Vector3::new(1.0, 0.0, 0.0);
    let z = Vector3::new(0.0, 0.0, 5.0);

    assert_eq!(v.rotate(&z, 90.0).unwrap(), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(v.rotate(&z, -90.0).unwrap(), Vector3::new(0.0, -1.0, 0.0));
    assert!(v.rotate(&Vector3::zero(), 10.0).is_err());
}

#[test]
fn deserialize_from_array() {
    let v: Vector3 = serde_json::from_str("[1.0, 2.5, -3.0]").unwrap();

    assert_eq!(v, Vector3::new(1.0, 2.5, -3.0));
}
