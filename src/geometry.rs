use serde::{ Serialize, Deserialize };

use crate::consts::EPSILON;
use crate::vector::Vector3;
use crate::ray::Ray;
use crate::color::Color;
use crate::error::{ Error, Result };

/// Tolerance for deciding that a computed hit point lies on a face.
///
/// Hit points carry the rounding of the intersection solve, so this is
/// looser than `EPSILON`.
const ON_FACE_EPSILON: f64 = 1e-6;

/// Picks the nearest root of `a*t^2 + b*t + c = 0` in front of the ray which
/// also passes `accept`.
///
/// Falls back to the linear solution when `a` vanishes.
fn nearest_root<F>(a: f64, b: f64, c: f64, accept: F) -> Option<f64>
    where F: Fn(f64) -> bool {
    let (t0, t1) = if a.abs() <= EPSILON {
        if b.abs() <= EPSILON {
            return None;
        }

        let t = -c / b;
        (t, t)
    } else {
        let discriminant = b.powi(2) - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t_minus = (-b - root) / (2.0 * a);
        let t_plus = (-b + root) / (2.0 * a);
        (t_minus.min(t_plus), t_minus.max(t_plus))
    };

    [t0, t1].iter().copied().find(|&t| t > EPSILON && accept(t))
}

/// Determinant of the 3x3 matrix with columns `u`, `v` and `w`.
fn det3(u: &Vector3, v: &Vector3, w: &Vector3) -> f64 {
    u.dot(&v.cross(w))
}

/// A sphere given by its center and radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereInfo {
    pub center: Vector3,
    pub radius: f64,
}

impl SphereInfo {
    pub fn new(center: Vector3, radius: f64) -> Result<SphereInfo> {
        if !(radius > EPSILON) {
            return Err(Error::DegenerateSurface(
                format!("sphere radius must be positive, got {}", radius)
            ));
        }

        Ok(SphereInfo { center, radius })
    }

    /// Solves `|o + t*d - c|^2 = r^2` for the nearest `t` in front of the
    /// ray. A ray starting inside the sphere gets the far root.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let center_to_origin = ray.origin - self.center;

        let a = 1.0;
        let b = 2.0 * ray.direction.dot(&center_to_origin);
        let c = center_to_origin.dot(&center_to_origin) - self.radius.powi(2);

        nearest_root(a, b, c, |_| true)
    }

    /// The outward normal. Exact for points on the sphere, so no
    /// normalization (and no failure) is needed.
    pub fn normal_at(&self, point: &Vector3) -> Vector3 {
        (*point - self.center) / self.radius
    }
}

/// A triangle, defined by three points in space.
///
/// The edges and the normal are precomputed. The normal's orientation
/// follows the vertex winding, `(p2 - p1) x (p3 - p1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleInfo {
    pub p1: Vector3,
    pub p2: Vector3,
    pub p3: Vector3,

    pub e1: Vector3,
    pub e2: Vector3,
    pub normal: Vector3,
    /// `|e1 x e2|`, twice the area.
    pub double_area: f64,
}

impl TriangleInfo {
    /// Creates a triangle. Collinear or coincident vertices are rejected.
    pub fn new(p1: Vector3, p2: Vector3, p3: Vector3) -> Result<TriangleInfo> {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let cross = e1.cross(&e2);
        let normal = cross.normalize()
            .map_err(|_| Error::DegenerateTriangle)?;
        let double_area = cross.magnitude();

        Ok(TriangleInfo { p1, p2, p3, e1, e2, normal, double_area })
    }

    /// Intersects a ray with the triangle.
    ///
    /// Solves `[a-b, a-c, d] * (beta, gamma, t) = a - o` with Cramer's rule.
    /// Triangles are hit from either side. Points on an edge don't count.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let (beta, gamma, t) = self.solve(ray)?;

        if beta > 0.0 && gamma > 0.0 && beta + gamma < 1.0 && t > EPSILON {
            Some(t)
        } else {
            None
        }
    }

    /// Like `intersect`, but points on an edge count as hits.
    ///
    /// Used where triangles tile a closed surface, so a ray through a shared
    /// edge still lands on one of them.
    pub fn intersect_closed(&self, ray: &Ray) -> Option<f64> {
        let (beta, gamma, t) = self.solve(ray)?;

        if beta >= -EPSILON && gamma >= -EPSILON
            && beta + gamma <= 1.0 + EPSILON && t > EPSILON {
            Some(t)
        } else {
            None
        }
    }

    /// Barycentric `(beta, gamma)` and ray distance `t` of the ray's
    /// crossing with the triangle's plane.
    fn solve(&self, ray: &Ray) -> Option<(f64, f64, f64)> {
        let col1 = self.p1 - self.p2;
        let col2 = self.p1 - self.p3;
        let col3 = ray.direction;
        let rhs = self.p1 - ray.origin;

        // A ray in the triangle's plane has no unique solution. The
        // determinant scales with the triangle's area, so the cutoff does too.
        let det = det3(&col1, &col2, &col3);
        if det.abs() <= EPSILON * self.double_area {
            return None;
        }

        let beta = det3(&rhs, &col2, &col3) / det;
        let gamma = det3(&col1, &rhs, &col3) / det;
        let t = det3(&col1, &col2, &rhs) / det;

        Some((beta, gamma, t))
    }

    /// Distance from `point` to the triangle's plane.
    pub fn plane_distance(&self, point: &Vector3) -> f64 {
        self.normal.dot(&(*point - self.p1)).abs()
    }

    /// Whether `point` lies on the triangle, to within `ON_FACE_EPSILON`.
    pub fn contains(&self, point: &Vector3) -> bool {
        if self.plane_distance(point) > ON_FACE_EPSILON {
            return false;
        }

        let v = *point - self.p1;
        let d00 = self.e1.dot(&self.e1);
        let d01 = self.e1.dot(&self.e2);
        let d11 = self.e2.dot(&self.e2);
        let d20 = v.dot(&self.e1);
        let d21 = v.dot(&self.e2);
        let denom = d00 * d11 - d01 * d01;

        let beta = (d11 * d20 - d01 * d21) / denom;
        let gamma = (d00 * d21 - d01 * d20) / denom;

        beta >= -ON_FACE_EPSILON
            && gamma >= -ON_FACE_EPSILON
            && beta + gamma <= 1.0 + ON_FACE_EPSILON
    }
}

/// A square checkerboard lying in the `z = 0` plane, centered on the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloorInfo {
    /// The corner with the smallest x and y, `(-width/2, -width/2, 0)`.
    pub corner: Vector3,
    pub width: f64,
    pub tile_width: f64,
}

impl FloorInfo {
    pub fn new(width: f64, tile_width: f64) -> Result<FloorInfo> {
        if !(width > EPSILON) || !(tile_width > EPSILON) {
            return Err(Error::DegenerateSurface(format!(
                "floor width and tile width must be positive, got {} and {}",
                width, tile_width
            )));
        }

        Ok(FloorInfo {
            corner: Vector3::new(-width / 2.0, -width / 2.0, 0.0),
            width,
            tile_width,
        })
    }

    /// Intersects the `z = 0` plane, then clips to the floor's square.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        if ray.direction.z.abs() <= EPSILON {
            return None;
        }

        let t = -ray.origin.z / ray.direction.z;
        if t <= EPSILON {
            return None;
        }

        let p = ray.position(t);
        let inside = |v: f64, lo: f64| v >= lo && v <= lo + self.width;
        if inside(p.x, self.corner.x) && inside(p.y, self.corner.y) {
            Some(t)
        } else {
            None
        }
    }

    pub fn normal_at(&self, _point: &Vector3) -> Vector3 {
        Vector3::new(0.0, 0.0, 1.0)
    }

    /// Black on tiles with even `i + j`, white on odd, where `i` and `j`
    /// count tiles from the corner.
    pub fn color_at(&self, point: &Vector3) -> Color {
        let i = ((point.x - self.corner.x) / self.tile_width).floor() as i64;
        let j = ((point.y - self.corner.y) / self.tile_width).floor() as i64;

        if (i + j).rem_euclid(2) == 0 {
            Color::black()
        } else {
            Color::white()
        }
    }
}

/// The ten coefficients of
/// `Ax^2 + By^2 + Cz^2 + Dxy + Eyz + Fzx + Gx + Hy + Iz + J = 0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 10]", into = "[f64; 10]")]
pub struct QuadricCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub i: f64,
    pub j: f64,
}

impl From<[f64; 10]> for QuadricCoefficients {
    fn from(k: [f64; 10]) -> QuadricCoefficients {
        QuadricCoefficients {
            a: k[0], b: k[1], c: k[2], d: k[3], e: k[4],
            f: k[5], g: k[6], h: k[7], i: k[8], j: k[9],
        }
    }
}

impl From<QuadricCoefficients> for [f64; 10] {
    fn from(q: QuadricCoefficients) -> [f64; 10] {
        [q.a, q.b, q.c, q.d, q.e, q.f, q.g, q.h, q.i, q.j]
    }
}

/// A general quadric surface, optionally clipped to a box.
///
/// The box starts at `reference` and extends `length`, `width` and
/// `height` along x, y and z. A dimension of zero leaves that axis
/// unbounded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadricInfo {
    pub k: QuadricCoefficients,
    pub reference: Vector3,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl QuadricInfo {
    /// Creates a quadric. Without any second-order term the surface is a
    /// plane (or nothing) and is rejected.
    pub fn new(k: QuadricCoefficients, reference: Vector3,
        length: f64, width: f64, height: f64) -> Result<QuadricInfo> {
        let second_order = [k.a, k.b, k.c, k.d, k.e, k.f];
        if second_order.iter().all(|c| c.abs() <= EPSILON) {
            return Err(Error::DegenerateSurface(
                "quadric has no second-order coefficients".into()
            ));
        }

        Ok(QuadricInfo { k, reference, length, width, height })
    }

    /// Whether `point` lies within every non-zero clipping dimension.
    pub fn within_bounds(&self, point: &Vector3) -> bool {
        let axes = [
            (self.length, point.x, self.reference.x),
            (self.width, point.y, self.reference.y),
            (self.height, point.z, self.reference.z),
        ];

        axes.iter().all(|&(dim, v, lo)| {
            dim.abs() <= EPSILON || (v >= lo && v <= lo + dim)
        })
    }

    /// Substitutes the ray into the implicit equation and solves for `t`,
    /// skipping roots clipped away by the bounding box.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let k = &self.k;
        let o = ray.origin;
        let d = ray.direction;

        let a = k.a * d.x * d.x + k.b * d.y * d.y + k.c * d.z * d.z
            + k.d * d.x * d.y + k.e * d.y * d.z + k.f * d.z * d.x;

        let b = 2.0 * (k.a * o.x * d.x + k.b * o.y * d.y + k.c * o.z * d.z)
            + k.d * (o.x * d.y + o.y * d.x)
            + k.e * (o.y * d.z + o.z * d.y)
            + k.f * (o.z * d.x + o.x * d.z)
            + k.g * d.x + k.h * d.y + k.i * d.z;

        let c = k.a * o.x * o.x + k.b * o.y * o.y + k.c * o.z * o.z
            + k.d * o.x * o.y + k.e * o.y * o.z + k.f * o.z * o.x
            + k.g * o.x + k.h * o.y + k.i * o.z + k.j;

        nearest_root(a, b, c, |t| self.within_bounds(&ray.position(t)))
    }

    /// The normalized gradient of the implicit function.
    ///
    /// `None` at singular points (e.g. a cone's apex) where the gradient
    /// vanishes.
    pub fn normal_at(&self, p: &Vector3) -> Option<Vector3> {
        let k = &self.k;
        Vector3::new(
            2.0 * k.a * p.x + k.d * p.y + k.f * p.z + k.g,
            2.0 * k.b * p.y + k.d * p.x + k.e * p.z + k.h,
            2.0 * k.c * p.z + k.e * p.y + k.f * p.x + k.i,
        ).normalize().ok()
    }
}

/// Which of a prism's five faces each of its eight triangles belongs to.
const PRISM_FACE_OF: [usize; 8] = [0, 1, 2, 2, 3, 3, 4, 4];

/// A triangular prism.
///
/// Vertices `a, b, c` and `d, e, f` are the two caps; `a-d`, `b-e` and
/// `c-f` are the lateral edges. The prism is stored as eight triangles: the
/// two caps followed by each quad split in two.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrismInfo {
    pub vertices: [Vector3; 6],
    pub triangles: [TriangleInfo; 8],
}

impl PrismInfo {
    pub fn new(vertices: [Vector3; 6]) -> Result<PrismInfo> {
        let [a, b, c, d, e, f] = vertices;
        let triangles = [
            TriangleInfo::new(a, b, c)?,
            TriangleInfo::new(d, e, f)?,
            TriangleInfo::new(a, b, e)?,
            TriangleInfo::new(a, e, d)?,
            TriangleInfo::new(b, c, f)?,
            TriangleInfo::new(b, f, e)?,
            TriangleInfo::new(c, a, d)?,
            TriangleInfo::new(c, d, f)?,
        ];

        Ok(PrismInfo { vertices, triangles })
    }

    /// The nearest hit among all eight triangles. Edges count, so the
    /// diagonal splitting each side quad is not a gap.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        self.triangles.iter()
            .filter_map(|tri| tri.intersect_closed(ray))
            .fold(None, |nearest: Option<f64>, t| match nearest {
                Some(n) if n <= t => Some(n),
                _ => Some(t),
            })
    }

    /// Index (0..5) of the face `point` lies on: 0 and 1 are the caps, 2..5
    /// the quads in the order `abed`, `bcfe`, `cadf`.
    ///
    /// A point on no face within tolerance is attributed to the face whose
    /// plane is closest.
    pub fn face_at(&self, point: &Vector3) -> usize {
        if let Some(i) = self.triangles.iter().position(|t| t.contains(point)) {
            return PRISM_FACE_OF[i];
        }

        let mut best = 0;
        for (i, tri) in self.triangles.iter().enumerate() {
            if tri.plane_distance(point)
                < self.triangles[best].plane_distance(point) {
                best = i;
            }
        }

        PRISM_FACE_OF[best]
    }

    pub fn normal_at(&self, point: &Vector3) -> Vector3 {
        let face = self.face_at(point);
        let first = PRISM_FACE_OF.iter().position(|&f| f == face)
            .unwrap_or(0);

        self.triangles[first].normal
    }
}

/* Tests */

#[cfg(test)]
use crate::feq;

#[cfg(test)]
fn ray(origin: (f64, f64, f64), direction: (f64, f64, f64)) -> Ray {
    Ray::new(
        Vector3::new(origin.0, origin.1, origin.2),
        Vector3::new(direction.0, direction.1, direction.2),
    ).unwrap()
}

#[cfg(test)]
fn unit_prism() -> PrismInfo {
    PrismInfo::new([
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 1.0),
        Vector3::new(0.0, 1.0, 1.0),
    ]).unwrap()
}

#[test]
fn ray_hits_sphere_front() {
    let s = SphereInfo::new(Vector3::new(0.0, 0.0, 20.0), 5.0).unwrap();

    assert_eq!(s.intersect(&ray((0., 0., 0.), (0., 0., 1.))), Some(15.0));
}

#[test]
fn ray_is_inside_sphere() {
    let s = SphereInfo::new(Vector3::new(0.0, 0.0, 20.0), 5.0).unwrap();

    assert_eq!(s.intersect(&ray((0., 0., 20.), (0., 0., 1.))), Some(5.0));
}

#[test]
fn sphere_is_behind_ray() {
    let s = SphereInfo::new(Vector3::new(0.0, 0.0, 20.0), 5.0).unwrap();

    assert_eq!(s.intersect(&ray((0., 0., 30.), (0., 0., 1.))), None);
    assert_eq!(s.intersect(&ray((0., 10., 0.), (0., 0., 1.))), None);
}

#[test]
fn sphere_normal_is_radial_and_unit() {
    let s = SphereInfo::new(Vector3::new(1.0, -2.0, 3.0), 2.0).unwrap();
    let r = ray((10., 4., -7.), (-1., -0.6, 1.0));

    let t = s.intersect(&r).expect("ray should hit the sphere");
    let p = r.position(t);
    let n = s.normal_at(&p);

    assert!(n.is_normalized());
    assert_eq!(n.cross(&(p - s.center)), Vector3::zero());
    assert!(n.dot(&(p - s.center)) > 0.0);
}

#[test]
fn sphere_needs_positive_radius() {
    assert!(SphereInfo::new(Vector3::zero(), 0.0).is_err());
    assert!(SphereInfo::new(Vector3::zero(), -1.0).is_err());
}

#[test]
fn ray_strikes_triangle() {
    let t = TriangleInfo::new(
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
    ).unwrap();

    assert_eq!(t.intersect(&ray((0., 0.5, -2.), (0., 0., 1.))), Some(2.0));
    // From the other side as well.
    assert_eq!(t.intersect(&ray((0., 0.5, 2.), (0., 0., -1.))), Some(2.0));
    assert_eq!(t.normal, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_misses_triangle() {
    let t = TriangleInfo::new(
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
    ).unwrap();

    // Past each edge
    assert_eq!(t.intersect(&ray((1., 1., -2.), (0., 0., 1.))), None);
    assert_eq!(t.intersect(&ray((-1., 1., -2.), (0., 0., 1.))), None);
    assert_eq!(t.intersect(&ray((0., -1., -2.), (0., 0., 1.))), None);
    // Parallel
    assert_eq!(t.intersect(&ray((0., -1., 0.), (0., 1., 0.))), None);
    // Behind
    assert_eq!(t.intersect(&ray((0., 0.5, -2.), (0., 0., -1.))), None);
}

#[test]
fn ray_strikes_tiny_triangle() {
    let t = TriangleInfo::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1e-5, 0.0, 0.0),
        Vector3::new(0.0, 1e-5, 0.0),
    ).unwrap();

    let hit = t.intersect(&ray((2e-6, 2e-6, -1.), (0., 0., 1.)));
    assert!(feq(hit.expect("tiny triangle should be hit"), 1.0));
    // Still parallel rays miss.
    assert_eq!(t.intersect(&ray((2e-6, -1., 0.), (0., 1., 0.))), None);
}

#[test]
fn triangle_edges_are_open_unless_closed() {
    let t = TriangleInfo::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    ).unwrap();
    // On the p1-p2 edge
    let r = ray((0.5, 0., -1.), (0., 0., 1.));

    assert_eq!(t.intersect(&r), None);
    assert!(feq(t.intersect_closed(&r).expect("edge should count"), 1.0));
}

#[test]
fn degenerate_triangle_is_rejected() {
    let r = TriangleInfo::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(2.0, 2.0, 2.0),
    );

    assert!(matches!(r, Err(Error::DegenerateTriangle)));
}

#[test]
fn ray_hits_floor() {
    let f = FloorInfo::new(1000.0, 20.0).unwrap();

    assert_eq!(f.intersect(&ray((3., 4., 10.), (0., 0., -1.))), Some(10.0));
    assert_eq!(f.intersect(&ray((3., 4., -10.), (0., 0., 1.))), Some(10.0));
    assert_eq!(f.normal_at(&Vector3::zero()), Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_misses_floor() {
    let f = FloorInfo::new(10.0, 1.0).unwrap();

    // Parallel, pointing away, and past the edge of the square
    assert_eq!(f.intersect(&ray((0., 0., 10.), (1., 0., 0.))), None);
    assert_eq!(f.intersect(&ray((0., 0., 10.), (0., 0., 1.))), None);
    assert_eq!(f.intersect(&ray((20., 0., 10.), (0., 0., -1.))), None);
}

#[test]
fn floor_checkerboard() {
    let f = FloorInfo::new(1000.0, 20.0).unwrap();

    assert_eq!(f.color_at(&Vector3::new(1.0, 1.0, 0.0)), Color::black());
    assert_eq!(f.color_at(&Vector3::new(21.0, 1.0, 0.0)), Color::white());
    assert_eq!(f.color_at(&Vector3::new(-1.0, 1.0, 0.0)), Color::white());
    assert_eq!(f.color_at(&Vector3::new(-1.0, -1.0, 0.0)), Color::black());
}

#[test]
fn quadric_sphere_matches_sphere() {
    let k = QuadricCoefficients {
        a: 1.0, b: 1.0, c: 1.0, j: -25.0, ..Default::default()
    };
    let q = QuadricInfo::new(k, Vector3::zero(), 0.0, 0.0, 0.0).unwrap();
    let r = ray((0., 0., -20.), (0., 0., 1.));

    assert_eq!(q.intersect(&r), Some(15.0));
    assert_eq!(
        q.normal_at(&Vector3::new(0.0, 0.0, 5.0)),
        Some(Vector3::new(0.0, 0.0, 1.0))
    );
}

#[test]
fn quadric_clipped_by_bounding_box() {
    // Cylinder x^2 + y^2 = 4, kept between z = 0 and z = 5
    let k = QuadricCoefficients {
        a: 1.0, b: 1.0, j: -4.0, ..Default::default()
    };
    let q = QuadricInfo::new(k, Vector3::zero(), 0.0, 0.0, 5.0).unwrap();

    assert_eq!(q.intersect(&ray((10., 0., 2.), (-1., 0., 0.))), Some(8.0));
    assert_eq!(q.intersect(&ray((10., 0., 7.), (-1., 0., 0.))), None);
    // Along the axis the equation has no t^2 or t term
    assert_eq!(q.intersect(&ray((0., 0., -5.), (0., 0., 1.))), None);
}

#[test]
fn quadric_near_root_clipped_far_root_kept() {
    let k = QuadricCoefficients {
        a: 1.0, b: 1.0, c: 1.0, j: -25.0, ..Default::default()
    };
    let reference = Vector3::new(-10.0, -10.0, 0.0);
    let q = QuadricInfo::new(k, reference, 0.0, 0.0, 10.0).unwrap();

    assert_eq!(q.intersect(&ray((0., 0., -20.), (0., 0., 1.))), Some(25.0));
}

#[test]
fn quadric_linear_in_t() {
    // Paraboloid z = x^2 + y^2, hit straight down its axis direction
    let k = QuadricCoefficients {
        a: 1.0, b: 1.0, i: -1.0, ..Default::default()
    };
    let q = QuadricInfo::new(k, Vector3::zero(), 0.0, 0.0, 0.0).unwrap();

    assert_eq!(q.intersect(&ray((1., 0., 10.), (0., 0., -1.))), Some(9.0));
}

#[test]
fn quadric_without_second_order_terms_is_rejected() {
    let k = QuadricCoefficients { i: 1.0, ..Default::default() };

    assert!(QuadricInfo::new(k, Vector3::zero(), 0.0, 0.0, 0.0).is_err());
}

#[test]
fn quadric_singular_point_has_no_normal() {
    // Cone x^2 + y^2 - z^2 = 0, apex at the origin
    let k = QuadricCoefficients {
        a: 1.0, b: 1.0, c: -1.0, ..Default::default()
    };
    let q = QuadricInfo::new(k, Vector3::zero(), 0.0, 0.0, 0.0).unwrap();

    assert_eq!(q.normal_at(&Vector3::zero()), None);
}

#[test]
fn ray_hits_prism_cap() {
    let p = unit_prism();
    let r = ray((0.2, 0.2, 5.), (0., 0., -1.));

    let t = p.intersect(&r).expect("ray should hit the top cap");
    assert_eq!(t, 4.0);
    assert_eq!(p.face_at(&r.position(t)), 1);
    assert_eq!(p.normal_at(&r.position(t)), Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_hits_prism_side() {
    let p = unit_prism();
    let r = ray((0.2, -5., 0.5), (0., 1., 0.));

    let t = p.intersect(&r).expect("ray should hit the abed side");
    assert_eq!(t, 5.0);
    assert_eq!(p.face_at(&r.position(t)), 2);

    let n = p.normal_at(&r.position(t));
    assert!(n.is_normalized());
    assert_eq!(n.cross(&Vector3::new(0.0, 1.0, 0.0)), Vector3::zero());
}

#[test]
fn ray_through_prism_side_diagonal_hits() {
    let p = unit_prism();
    // Crosses the abed quad exactly on its a-e diagonal.
    let r = ray((0.5, -5., 0.5), (0., 1., 0.));

    let t = p.intersect(&r).expect("ray should hit the abed diagonal");
    assert!(feq(t, 5.0));
    assert_eq!(p.face_at(&r.position(t)), 2);
}

#[test]
fn ray_misses_prism() {
    let p = unit_prism();

    assert_eq!(p.intersect(&ray((2., 2., 5.), (0., 0., -1.))), None);
}
