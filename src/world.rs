use crate::consts::EPSILON;
use crate::ray::Ray;
use crate::vector::Vector3;
use crate::color::Color;
use crate::light::{ LightSource, lighting };
use crate::surface::Surface;

/// A hit of some ray against a surface of a `World`.
#[derive(Copy, Clone, Debug)]
pub struct Hit<'a> {
    /// Ray parameter of the hit, always greater than `EPSILON`.
    pub t: f64,

    /// The surface that was hit.
    pub surface: &'a Surface,
}

/// A world with surfaces and lights.
///
/// Worlds own everything a render reads. They are built once, then shared
/// immutably (across threads, too) while rendering; nothing in here mutates
/// during a render.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub surfaces: Vec<Surface>,
    pub lights: Vec<LightSource>,
}

impl World {
    pub fn new(surfaces: Vec<Surface>, lights: Vec<LightSource>) -> World {
        World { surfaces, lights }
    }

    /// Creates a world with no surfaces and no lights.
    pub fn empty() -> World {
        Default::default()
    }

    /// Finds the nearest surface a ray hits in front of its origin.
    ///
    /// Surfaces are scanned in insertion order; the first of several equal
    /// `t` values wins.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut nearest: Option<Hit<'_>> = None;

        for surface in self.surfaces.iter() {
            if let Some(t) = surface.find_intersection(ray) {
                if nearest.map_or(true, |hit| t < hit.t) {
                    nearest = Some(Hit { t, surface });
                }
            }
        }

        nearest
    }

    /// Whether any surface blocks a shadow ray before it travels `distance`.
    ///
    /// Hits within `EPSILON` of either end don't count, so the surface being
    /// lit never shadows the point it is being lit at.
    fn is_occluded(&self, shadow_ray: &Ray, distance: f64) -> bool {
        self.surfaces.iter().any(|s| match s.find_intersection(shadow_ray) {
            Some(t) => t > EPSILON && t + EPSILON < distance,
            None => false,
        })
    }

    /// The unit direction light travels from `light` to `point`, if any of
    /// it arrives there.
    ///
    /// `None` when the light sits on the point, when a spotlight's cone
    /// misses the point, or when some surface blocks the way.
    pub fn light_reaching(&self, light: &LightSource, point: Vector3)
        -> Option<Vector3> {
        let to_point = point - light.position();
        let distance = to_point.magnitude();

        // Light source is at the point
        if distance < EPSILON {
            return None;
        }

        let lightv = to_point / distance;
        if !light.illuminates(&lightv) {
            return None;
        }

        let shadow_ray = Ray { origin: light.position(), direction: lightv };
        if self.is_occluded(&shadow_ray, distance) {
            return None;
        }

        Some(lightv)
    }

    /// Determines whether `point` receives nothing from `light`.
    pub fn is_shadowed(&self, light: &LightSource, point: Vector3) -> bool {
        self.light_reaching(light, point).is_none()
    }

    /// Calculates the color of a hit.
    ///
    /// Ambient light is added once, then diffuse and specular light for each
    /// light that reaches the point. With `depth` left, the mirror reflection
    /// of `ray` is traced into the world with one less bounce and blended in
    /// by the surface's reflection coefficient.
    ///
    /// The returned color is not clamped.
    pub fn shade_hit(&self, ray: &Ray, hit: &Hit<'_>, depth: usize) -> Color {
        let point = ray.position(hit.t);
        let material = &hit.surface.material;
        let local_color = hit.surface.color_at(&point);

        let mut color = local_color * material.ambient;

        // Only a quadric's singular points lack a normal; light them with
        // ambient only.
        let normalv = match hit.surface.facing_normal(ray, &point) {
            Some(n) => n,
            None => return color,
        };

        for light in self.lights.iter() {
            if let Some(lightv) = self.light_reaching(light, point) {
                color += lighting(material, local_color, light.color(),
                    normalv, lightv, ray.direction);
            }
        }

        if depth == 0 {
            return color;
        }

        // Step off the surface so the bounce doesn't hit it again straight
        // away.
        let reflectv = ray.direction.reflect(&normalv);
        let reflected = Ray {
            origin: point + reflectv * EPSILON,
            direction: reflectv,
        };

        if let Some(next) = self.nearest_hit(&reflected) {
            let bounce = self.shade_hit(&reflected, &next, depth - 1);
            color += bounce * material.reflection;
        }

        color
    }

    /// Shades `surface` as seen along `ray`, black if the ray misses it.
    pub fn shade(&self, surface: &Surface, ray: &Ray, depth: usize) -> Color {
        match surface.find_intersection(ray) {
            None => Color::black(),
            Some(t) => self.shade_hit(ray, &Hit { t, surface }, depth),
        }
    }

    /// Determines the color seen along a ray, black if it hits nothing.
    pub fn color_at(&self, ray: &Ray, depth: usize) -> Color {
        match self.nearest_hit(ray) {
            None => Color::black(),
            Some(hit) => self.shade_hit(ray, &hit, depth),
        }
    }
}

/* Tests */

#[cfg(test)]
use crate::light::{ Material, PointLight, SpotLight };

#[cfg(test)]
fn flat(color: Color, ambient: f64, diffuse: f64, reflection: f64) -> Material {
    Material {
        color,
        ambient,
        diffuse,
        specular: 0.0,
        reflection,
        shininess: 1,
    }
}

#[cfg(test)]
fn sphere(x: f64, y: f64, z: f64, radius: f64, m: Material) -> Surface {
    Surface::sphere(Vector3::new(x, y, z), radius).unwrap().with_material(m)
}

#[cfg(test)]
fn point_light(x: f64, y: f64, z: f64) -> LightSource {
    PointLight::new(Vector3::new(x, y, z), Color::white()).into()
}

#[cfg(test)]
fn ray_from(origin: Vector3, direction: Vector3) -> Ray {
    Ray::new(origin, direction).unwrap()
}

#[test]
fn nearest_hit_picks_closest_surface() {
    let m: Material = Default::default();
    let w = World::new(vec![
        sphere(0.0, 0.0, 40.0, 5.0, m),
        sphere(0.0, 0.0, 20.0, 5.0, m),
    ], vec![]);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    let hit = w.nearest_hit(&r).expect("ray should hit a sphere");
    assert!(crate::feq(hit.t, 15.0));
    assert!(std::ptr::eq(hit.surface, &w.surfaces[1]));
}

#[test]
fn color_ray_miss() {
    let w = World::new(
        vec![sphere(0.0, 0.0, 20.0, 5.0, Default::default())],
        vec![point_light(0.0, 0.0, -100.0)],
    );
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));

    assert_eq!(w.color_at(&r, 3), Color::black());
}

#[test]
fn shade_missed_surface_is_black() {
    let m = flat(Color::white(), 1.0, 0.0, 0.0);
    let w = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)], vec![]);
    let toward = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));
    let away = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    assert_eq!(w.shade(&w.surfaces[0], &toward, 2), Color::white());
    assert_eq!(w.shade(&w.surfaces[0], &away, 2), Color::black());
}

#[test]
fn ambient_only_ignores_lights() {
    let white = flat(Color::white(), 1.0, 0.0, 0.0);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    for light in [point_light(0.0, 0.0, -1e4), point_light(1e4, 0.0, 20.0)] {
        let w = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, white)],
            vec![light]);
        assert_eq!(w.color_at(&r, 0), Color::white());
    }
}

#[test]
fn diffuse_at_normal_incidence_is_full() {
    let m = flat(Color::white(), 0.0, 1.0, 0.0);
    let w = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)],
        vec![point_light(0.0, 0.0, -100.0)]);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    let c = w.color_at(&r, 0);
    assert!(c.r > 0.99 && c.g > 0.99 && c.b > 0.99);
}

#[test]
fn occluded_light_contributes_nothing() {
    let m = flat(Color::white(), 0.0, 1.0, 0.0);
    let target = sphere(0.0, 0.0, 20.0, 5.0, m);
    let blocker = sphere(0.0, 0.0, 0.0, 2.0, m);
    let light = point_light(0.0, 0.0, -100.0);

    let shadowed = World::new(vec![target.clone(), blocker], vec![light]);
    let open = World::new(vec![target], vec![light]);

    let lit_point = Vector3::new(0.0, 0.0, 15.0);
    assert!(shadowed.is_shadowed(&light, lit_point));
    assert!(!open.is_shadowed(&light, lit_point));

    // Start between the spheres so both worlds hit the target first.
    let r = ray_from(Vector3::new(0.0, 0.0, 14.0), Vector3::new(0.0, 0.0, 1.0));
    let dark = shadowed.color_at(&r, 0);
    let bright = open.color_at(&r, 0);

    assert_eq!(dark, Color::black());
    assert!(bright.r > dark.r);
}

#[test]
fn surface_does_not_shadow_itself() {
    let m = flat(Color::white(), 0.0, 1.0, 0.0);
    let w = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)], vec![]);
    let light = point_light(0.0, 30.0, 15.0);

    assert!(!w.is_shadowed(&light, Vector3::new(0.0, 0.0, 15.0)));
    assert!(w.is_shadowed(&light, Vector3::new(0.0, -5.0, 20.0)));
}

#[test]
fn shadow_query_agrees_with_shading() {
    let m = flat(Color::white(), 0.0, 1.0, 0.0);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));
    let lit_point = Vector3::new(0.0, 0.0, 15.0);

    let away: LightSource = SpotLight::new(Vector3::new(0.0, 0.0, -100.0),
        Color::white(), Vector3::new(0.0, 1.0, 0.0), 10.0).unwrap().into();
    let toward = point_light(0.0, 0.0, -100.0);

    for light in [away, toward] {
        let w = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)], vec![light]);
        let dark = w.color_at(&r, 0) == Color::black();

        assert_eq!(w.is_shadowed(&light, lit_point), dark);
    }

    let w = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)], vec![toward]);
    assert_eq!(w.light_reaching(&toward, lit_point),
        Some(Vector3::new(0.0, 0.0, 1.0)));
    assert_eq!(w.light_reaching(&away, lit_point), None);
    assert_eq!(w.light_reaching(&toward, Vector3::new(0.0, 0.0, -100.0)), None);
}

#[test]
fn spotlight_outside_cutoff_is_dark() {
    let m = flat(Color::white(), 0.0, 1.0, 0.0);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    let toward = SpotLight::new(Vector3::new(0.0, 0.0, -100.0), Color::white(),
        Vector3::new(0.0, 0.0, 1.0), 10.0).unwrap();
    let away = SpotLight::new(Vector3::new(0.0, 0.0, -100.0), Color::white(),
        Vector3::new(0.0, 1.0, 0.0), 10.0).unwrap();

    let lit = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)],
        vec![toward.into()]);
    let unlit = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)],
        vec![away.into()]);

    assert!(lit.color_at(&r, 0).r > 0.99);
    assert_eq!(unlit.color_at(&r, 0), Color::black());
}

#[test]
fn colors_are_not_clamped() {
    let m = flat(Color::white(), 0.5, 1.0, 0.0);
    let w = World::new(vec![sphere(0.0, 0.0, 20.0, 5.0, m)], vec![
        point_light(0.0, 0.0, -100.0),
        point_light(0.0, 0.0, -200.0),
    ]);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, 0), Color::rgb(2.5, 2.5, 2.5));
}

#[test]
fn reflection_needs_depth() {
    let mirror = flat(Color::white(), 0.0, 0.0, 1.0);
    let red = flat(Color::rgb(1.0, 0.0, 0.0), 1.0, 0.0, 0.0);
    let w = World::new(vec![
        sphere(0.0, 0.0, 20.0, 5.0, mirror),
        sphere(0.0, 0.0, -20.0, 5.0, red),
    ], vec![point_light(50.0, 50.0, 0.0)]);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, 0), Color::black());
    assert_eq!(w.color_at(&r, 1), Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(w.color_at(&r, 3), Color::rgb(1.0, 0.0, 0.0));
}

#[test]
fn each_bounce_costs_one_depth() {
    let front = flat(Color::white(), 0.5, 0.0, 0.5);
    let back = flat(Color::rgb(0.0, 0.0, 1.0), 0.5, 0.0, 0.5);
    let w = World::new(vec![
        sphere(0.0, 0.0, 20.0, 5.0, front),
        sphere(0.0, 0.0, -20.0, 5.0, back),
    ], vec![]);
    let r = ray_from(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, 0), Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(w.color_at(&r, 1), Color::rgb(0.5, 0.5, 0.75));
    assert_eq!(w.color_at(&r, 2), Color::rgb(0.625, 0.625, 0.875));
}

#[test]
fn accumulated_color_is_never_negative() {
    let shiny = Material {
        color: Color::rgb(0.8, 0.3, 0.1),
        ambient: 0.2,
        diffuse: 0.4,
        specular: 0.3,
        reflection: 0.3,
        shininess: 12,
    };
    let w = World::new(vec![
        sphere(0.0, 0.0, 20.0, 5.0, shiny),
        sphere(8.0, 3.0, 25.0, 3.0, shiny),
        Surface::triangle(
            Vector3::new(-30.0, -10.0, 40.0),
            Vector3::new(30.0, -10.0, 40.0),
            Vector3::new(0.0, 30.0, 40.0),
        ).unwrap().with_material(shiny),
        Surface::floor(200.0, 10.0).unwrap(),
    ], vec![
        point_light(-20.0, 20.0, 0.0),
        point_light(10.0, -30.0, 60.0),
    ]);

    let origin = Vector3::new(0.0, 0.0, 2.0);
    for i in -10..=10 {
        for j in -10..=10 {
            let dir = Vector3::new(i as f64 * 0.05, j as f64 * 0.05, 1.0);
            let c = w.color_at(&ray_from(origin, dir), 4);
            assert!(c.is_non_negative(), "negative channel in {:?}", c);
        }
    }
}
