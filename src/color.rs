use std::ops::{ Add, AddAssign, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A color.
///
/// Represented with red-green-blue (RGB) values. Surface and light colors are
/// expected to lie in [0, 1], but accumulated shading results may exceed 1;
/// they are only clamped when written to a `Canvas`.
///
/// # Examples
///
/// Modulate a surface color by a light color:
///
/// ```
/// # use whitted_tracer::color::Color;
/// let yellow = Color::rgb(1.0, 1.0, 0.0);
/// let purple = Color::rgb(1.0, 0.0, 1.0);
/// assert_eq!(yellow * purple, Color::rgb(1.0, 0.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Component-wise equality, accounting for floating point error.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(c: [f64; 3]) -> Color {
        Color { r: c[0], g: c[1], b: c[2] }
    }
}

impl From<Color> for [f64; 3] {
    fn from(c: Color) -> [f64; 3] {
        [c.r, c.g, c.b]
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn black() -> Color {
        Color { r: 0.0, g: 0.0, b: 0.0 }
    }

    pub fn white() -> Color {
        Color { r: 1.0, g: 1.0, b: 1.0 }
    }

    /// Computes the Hadamard (component-wise) product of two colors.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        Color {
            r: c1.r * c2.r,
            g: c1.g * c2.g,
            b: c1.b * c2.b,
        }
    }

    /// Clamps every channel to [0, 1].
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Converts to 8-bit channels, clamping first.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamp();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        ]
    }

    /// Whether every channel is non-negative.
    pub fn is_non_negative(&self) -> bool {
        self.r >= 0.0 && self.g >= 0.0 && self.b >= 0.0
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

/// Multiplies each channel by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// Shorthand for `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let mut c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    c1 += c2;

    assert_eq!(c1, Color { r: 1.6, g: 0.7, b: 1.0 });
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c1 * 2.0, Color { r: 0.4, g: 0.6, b: 0.8 });
    assert_eq!(
        c1 * Color::rgb(0.5, 1.0, 0.0),
        Color::rgb(0.1, 0.3, 0.0)
    );
}

#[test]
fn clamp_over_bright() {
    let c = Color::rgb(1.7, -0.2, 0.5);

    assert_eq!(c.clamp(), Color::rgb(1.0, 0.0, 0.5));
    assert_eq!(c.to_rgb8(), [255, 0, 128]);
}
