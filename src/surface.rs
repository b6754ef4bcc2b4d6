use crate::color::Color;
use crate::vector::Vector3;
use crate::ray::Ray;
use crate::light::Material;
use crate::error::Result;
use crate::geometry::{ SphereInfo, TriangleInfo, FloorInfo,
    QuadricCoefficients, QuadricInfo, PrismInfo };

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceType {
    /// A sphere with an arbitrary center and radius.
    Sphere(SphereInfo),

    /// A single triangle, visible from both sides.
    Triangle(TriangleInfo),

    /// A checkerboard square in the `z = 0` plane.
    Floor(FloorInfo),

    /// A general quadric, optionally clipped to a box.
    Quadric(QuadricInfo),

    /// A triangular prism made of eight triangles.
    Prism(PrismInfo),
}

/// A renderable surface: some geometry plus the material it is shaded with.
///
/// Surfaces are built once when a scene is loaded and are read-only while it
/// renders. Every constructor validates its geometry, so a `Surface` that
/// exists can always be intersected.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub ty: SurfaceType,
    pub material: Material,
}

impl Surface {
    fn with_type(ty: SurfaceType) -> Surface {
        Surface { ty, material: Default::default() }
    }

    /// Creates a sphere with the default material.
    pub fn sphere(center: Vector3, radius: f64) -> Result<Surface> {
        Ok(Self::with_type(SurfaceType::Sphere(SphereInfo::new(center, radius)?)))
    }

    /// Creates a triangle, defined by three points in space.
    pub fn triangle(a: Vector3, b: Vector3, c: Vector3) -> Result<Surface> {
        Ok(Self::with_type(SurfaceType::Triangle(TriangleInfo::new(a, b, c)?)))
    }

    /// Creates a checkerboard floor `width` across, centered on the origin.
    ///
    /// The floor gets `Material::floor()`; its color is never used.
    pub fn floor(width: f64, tile_width: f64) -> Result<Surface> {
        Ok(Surface {
            ty: SurfaceType::Floor(FloorInfo::new(width, tile_width)?),
            material: Material::floor(),
        })
    }

    /// Creates a general quadric clipped to `[length, width, height]` from
    /// `reference`.
    pub fn quadric(k: QuadricCoefficients, reference: Vector3,
        dimensions: [f64; 3]) -> Result<Surface> {
        let [length, width, height] = dimensions;
        let info = QuadricInfo::new(k, reference, length, width, height)?;

        Ok(Self::with_type(SurfaceType::Quadric(info)))
    }

    /// Creates a prism from its two caps `a, b, c` and `d, e, f`.
    pub fn prism(vertices: [Vector3; 6]) -> Result<Surface> {
        Ok(Self::with_type(SurfaceType::Prism(PrismInfo::new(vertices)?)))
    }

    /// Replaces this surface's material.
    pub fn with_material(mut self, material: Material) -> Surface {
        self.material = material;
        self
    }

    /// A short name for the surface's kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self.ty {
            SurfaceType::Sphere(_) => "sphere",
            SurfaceType::Triangle(_) => "triangle",
            SurfaceType::Floor(_) => "floor",
            SurfaceType::Quadric(_) => "general",
            SurfaceType::Prism(_) => "prism",
        }
    }

    /// The point the surface is anchored at.
    ///
    /// A sphere's center, the floor's corner, a quadric's clipping origin,
    /// and the first vertex of triangles and prisms.
    pub fn reference_point(&self) -> Vector3 {
        match self.ty {
            SurfaceType::Sphere(ref s) => s.center,
            SurfaceType::Triangle(ref t) => t.p1,
            SurfaceType::Floor(ref f) => f.corner,
            SurfaceType::Quadric(ref q) => q.reference,
            SurfaceType::Prism(ref p) => p.vertices[0],
        }
    }

    /// Intersects a ray with the surface.
    ///
    /// Returns the smallest `t > EPSILON` such that `ray.position(t)` lies on
    /// the surface, or `None` on a miss.
    pub fn find_intersection(&self, ray: &Ray) -> Option<f64> {
        match self.ty {
            SurfaceType::Sphere(ref s) => s.intersect(ray),
            SurfaceType::Triangle(ref t) => t.intersect(ray),
            SurfaceType::Floor(ref f) => f.intersect(ray),
            SurfaceType::Quadric(ref q) => q.intersect(ray),
            SurfaceType::Prism(ref p) => p.intersect(ray),
        }
    }

    /// The geometric unit normal at a point on the surface.
    ///
    /// This is not corrected to face any particular ray; see
    /// `facing_normal`. `None` only at singular points of a quadric.
    pub fn normal_at(&self, point: &Vector3) -> Option<Vector3> {
        match self.ty {
            SurfaceType::Sphere(ref s) => Some(s.normal_at(point)),
            SurfaceType::Triangle(ref t) => Some(t.normal),
            SurfaceType::Floor(ref f) => Some(f.normal_at(point)),
            SurfaceType::Quadric(ref q) => q.normal_at(point),
            SurfaceType::Prism(ref p) => Some(p.normal_at(point)),
        }
    }

    /// The normal at `point`, flipped if needed to oppose `ray`.
    ///
    /// Spheres keep their outward normal; rays in this renderer reach them
    /// from outside.
    pub fn facing_normal(&self, ray: &Ray, point: &Vector3) -> Option<Vector3> {
        let normal = self.normal_at(point)?;

        match self.ty {
            SurfaceType::Sphere(_) => Some(normal),
            _ if ray.direction.dot(&normal) > 0.0 => Some(-normal),
            _ => Some(normal),
        }
    }

    /// The unlit color at a point on the surface.
    pub fn color_at(&self, point: &Vector3) -> Color {
        match self.ty {
            SurfaceType::Floor(ref f) => f.color_at(point),
            _ => self.material.color,
        }
    }
}

#[cfg(test)]
fn surfaces_for_facing_tests() -> Vec<Surface> {
    let k = QuadricCoefficients {
        a: 1.0, b: 1.0, c: 1.0, j: -4.0, ..Default::default()
    };

    vec![
        Surface::triangle(
            Vector3::new(-5.0, -5.0, 0.0),
            Vector3::new(5.0, -5.0, 0.0),
            Vector3::new(0.0, 5.0, 0.0),
        ).unwrap(),
        Surface::floor(100.0, 10.0).unwrap(),
        Surface::quadric(k, Vector3::zero(), [0.0, 0.0, 0.0]).unwrap(),
        Surface::prism([
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(0.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
        ]).unwrap(),
    ]
}

#[test]
fn facing_normal_opposes_ray() {
    let origins = [
        Vector3::new(0.3, 0.2, 10.0),
        Vector3::new(0.3, 0.2, -10.0),
        Vector3::new(0.0, 0.0, 0.5),
    ];
    let targets = [Vector3::new(0.1, -0.1, 0.0), Vector3::new(0.0, 0.0, 0.9)];

    for s in surfaces_for_facing_tests() {
        for origin in origins.iter() {
            for target in targets.iter() {
                let ray = Ray::towards(*origin, *target).unwrap();
                let t = match s.find_intersection(&ray) {
                    Some(t) => t,
                    None => continue,
                };

                let p = ray.position(t);
                let n = s.facing_normal(&ray, &p).unwrap();
                assert!(n.is_normalized(), "{} normal not unit", s.kind());
                assert!(ray.direction.dot(&n) <= 0.0,
                    "{} normal faces away from the ray", s.kind());
            }
        }
    }
}

#[test]
fn sphere_normal_is_not_flipped() {
    let s = Surface::sphere(Vector3::zero(), 1.0).unwrap();
    let ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0)).unwrap();

    let p = Vector3::new(0.0, 0.0, 1.0);
    assert_eq!(s.facing_normal(&ray, &p), Some(Vector3::new(0.0, 0.0, 1.0)));
}

#[test]
fn floor_color_ignores_material() {
    let red = Material { color: Color::rgb(1.0, 0.0, 0.0), ..Default::default() };
    let f = Surface::floor(1000.0, 20.0).unwrap().with_material(red);
    let s = Surface::sphere(Vector3::zero(), 1.0).unwrap().with_material(red);

    assert_eq!(f.color_at(&Vector3::new(1.0, 1.0, 0.0)), Color::black());
    assert_eq!(s.color_at(&Vector3::new(1.0, 0.0, 0.0)), Color::rgb(1.0, 0.0, 0.0));
}

#[test]
fn reference_points() {
    let f = Surface::floor(1000.0, 20.0).unwrap();
    let s = Surface::sphere(Vector3::new(1.0, 2.0, 3.0), 1.0).unwrap();

    assert_eq!(f.reference_point(), Vector3::new(-500.0, -500.0, 0.0));
    assert_eq!(s.reference_point(), Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(f.kind(), "floor");
}

#[test]
fn invalid_geometry_fails_construction() {
    assert!(Surface::sphere(Vector3::zero(), 0.0).is_err());
    assert!(Surface::floor(0.0, 1.0).is_err());
    assert!(Surface::prism([Vector3::zero(); 6]).is_err());
    assert!(Surface::quadric(Default::default(), Vector3::zero(),
        [0.0, 0.0, 0.0]).is_err());
}
