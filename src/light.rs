use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::vector::Vector3;
use crate::error::{ Error, Result };

/// A material record.
///
/// Coefficients follow the Phong reflection model plus a mirror term. They
/// are expected in [0, 1] and conventionally sum to at most 1, but neither is
/// enforced.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub color: Color,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub reflection: f64,
    pub shininess: i32,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            reflection: 0.0,
            shininess: 200,
        }
    }
}

impl Material {
    /// The material given to the checkerboard floor when a scene doesn't
    /// specify one. The color is ignored; floors compute their own.
    pub fn floor() -> Material {
        Material {
            color: Color::white(),

            ambient: 0.4,
            diffuse: 0.2,
            specular: 0.1,
            reflection: 0.3,
            shininess: 5,
        }
    }

    pub fn coefficient_sum(&self) -> f64 {
        self.ambient + self.diffuse + self.specular + self.reflection
    }

    /// Fails if the shininess exponent is negative.
    pub fn validate(&self) -> Result<()> {
        if self.shininess < 0 {
            return Err(Error::DegenerateSurface(format!(
                "shininess must not be negative, got {}", self.shininess)));
        }

        Ok(())
    }
}

/// A point light.
///
/// Emits `color` equally in every direction from `position`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub position: Vector3,
    pub color: Color,
}

impl PointLight {
    pub fn new(position: Vector3, color: Color) -> PointLight {
        PointLight { position, color }
    }
}

/// A spotlight.
///
/// A point light restricted to a cone around `direction`. Points further
/// than `cutoff_angle` degrees off the axis receive nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vector3,
    pub color: Color,
    pub direction: Vector3,
    pub cutoff_angle: f64,
}

impl SpotLight {
    /// Creates a spotlight. Fails if `direction` has no length.
    pub fn new(position: Vector3, color: Color, direction: Vector3,
        cutoff_angle: f64) -> Result<SpotLight> {
        Ok(SpotLight {
            position,
            color,
            direction: direction.normalize()?,
            cutoff_angle,
        })
    }

    /// Whether a unit direction leaving the light lies inside the cone.
    pub fn illuminates(&self, lightv: &Vector3) -> bool {
        let cos = lightv.dot(&self.direction).clamp(-1.0, 1.0);
        cos.acos().to_degrees() < self.cutoff_angle
    }
}

/// Any light in a world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightSource {
    Point(PointLight),
    Spot(SpotLight),
}

impl LightSource {
    pub fn position(&self) -> Vector3 {
        match self {
            LightSource::Point(l) => l.position,
            LightSource::Spot(l) => l.position,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            LightSource::Point(l) => l.color,
            LightSource::Spot(l) => l.color,
        }
    }

    /// Whether light leaving along the unit vector `lightv` is emitted at all.
    ///
    /// Always true for point lights.
    pub fn illuminates(&self, lightv: &Vector3) -> bool {
        match self {
            LightSource::Point(_) => true,
            LightSource::Spot(l) => l.illuminates(lightv),
        }
    }
}

impl From<PointLight> for LightSource {
    fn from(light: PointLight) -> LightSource {
        LightSource::Point(light)
    }
}

impl From<SpotLight> for LightSource {
    fn from(light: SpotLight) -> LightSource {
        LightSource::Spot(light)
    }
}

/// Calculates the diffuse and specular light one unoccluded light adds to a
/// point.
///
/// `lightv` is the unit direction travelling from the light to the point,
/// `rayv` the unit direction of the ray that hit the point, and `normalv`
/// the facing-corrected surface normal. Ambient light is not included; it is
/// added once per hit rather than once per light.
pub fn lighting(m: &Material, local_color: Color, light_color: Color,
    normalv: Vector3, lightv: Vector3, rayv: Vector3) -> Color {
    // Lambert's cosine law, with the light arriving against the normal
    let lambert = normalv.dot(&-lightv).max(0.0);
    let diffuse = light_color * m.diffuse * lambert * local_color;

    // Mirror the incoming light about the normal and compare with the eye
    let reflectv = lightv.reflect(&normalv);
    let phong = reflectv.dot(&-rayv).max(0.0);
    let specular = light_color * m.specular * phong.powi(m.shininess)
        * local_color;

    diffuse + specular
}

#[test]
fn eye_between_light_and_surface() {
    let m: Material = Default::default();
    let normalv = Vector3::new(0.0, 0.0, -1.0);
    let lightv = Vector3::new(0.0, 0.0, 1.0);
    let rayv = Vector3::new(0.0, 0.0, 1.0);

    let res = lighting(&m, Color::white(), Color::white(),
        normalv, lightv, rayv);
    assert_eq!(res, Color::rgb(1.8, 1.8, 1.8));
}

#[test]
fn eye_offset_45_loses_specular() {
    let m: Material = Default::default();
    let normalv = Vector3::new(0.0, 0.0, -1.0);
    let lightv = Vector3::new(0.0, 0.0, 1.0);
    let rayv = Vector3::new(0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0);

    // cos(45)^200 is negligible
    let res = lighting(&m, Color::white(), Color::white(),
        normalv, lightv, rayv);
    assert_eq!(res, Color::rgb(0.9, 0.9, 0.9));
}

#[test]
fn light_behind_surface() {
    let m: Material = Default::default();
    let normalv = Vector3::new(0.0, 0.0, -1.0);
    let lightv = Vector3::new(0.0, 0.0, -1.0);
    let rayv = Vector3::new(0.0, 0.0, 1.0);

    let res = lighting(&m, Color::white(), Color::white(),
        normalv, lightv, rayv);
    assert_eq!(res, Color::black());
}

#[test]
fn lighting_is_modulated_by_local_color() {
    let m = Material { diffuse: 1.0, specular: 0.0, ..Default::default() };
    let normalv = Vector3::new(0.0, 0.0, 1.0);
    let lightv = Vector3::new(0.0, 0.0, -1.0);
    let rayv = Vector3::new(0.0, 0.0, -1.0);

    let res = lighting(&m, Color::rgb(0.5, 1.0, 0.0),
        Color::rgb(1.0, 0.5, 1.0), normalv, lightv, rayv);
    assert_eq!(res, Color::rgb(0.5, 0.5, 0.0));
}

#[test]
fn spotlight_cutoff() {
    let s = SpotLight::new(
        Vector3::new(0.0, 0.0, 10.0),
        Color::white(),
        Vector3::new(0.0, 0.0, -3.0),
        30.0
    ).unwrap();

    let inside = Vector3::new(0.0, 0.1, -1.0).normalize().unwrap();
    let outside = Vector3::new(0.0, 1.0, -1.0).normalize().unwrap();

    assert!(s.illuminates(&inside));
    assert!(!s.illuminates(&outside));
    assert!(LightSource::from(PointLight::default()).illuminates(&outside));
}

#[test]
fn spotlight_without_direction_fails() {
    assert!(SpotLight::new(Vector3::zero(), Color::white(),
        Vector3::zero(), 10.0).is_err());
}
