use crate::consts::EPSILON;
use crate::vector::Vector3;
use crate::ray::Ray;
use crate::error::{ Error, Result };

/// A camera pose.
///
/// The camera is an orthonormal frame at `position`. `look` points into the
/// scene, `up` towards the top of the image and `right` towards its right
/// edge, with `right = look × up`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub look: Vector3,
    pub up: Vector3,
    pub right: Vector3,
}

impl Camera {
    /// Creates a camera at `eye` looking towards `target`.
    ///
    /// When `up_hint` is already orthogonal to the look direction it is used
    /// as is. Otherwise the right vector is taken level with the `z = 0`
    /// plane and `up` is derived from it, so the image stays upright with
    /// `+z` pointing up. Looking straight along `z` in that case falls back to
    /// `+x` as the right vector.
    pub fn look_at(eye: Vector3, target: Vector3, up_hint: Vector3)
        -> Result<Camera> {
        let look = (target - eye).normalize()
            .map_err(|_| Error::InvalidCamera(
                "camera position and target coincide".to_string()))?;
        let hint = up_hint.normalize()
            .map_err(|_| Error::InvalidCamera(
                "up vector has no length".to_string()))?;

        let (up, right) = if look.dot(&hint).abs() <= EPSILON {
            (hint, look.cross(&hint).normalize()?)
        } else {
            let right = Vector3::new(look.y, -look.x, 0.0).normalize()
                .unwrap_or_else(|_| Vector3::new(1.0, 0.0, 0.0));
            (right.cross(&look).normalize()?, right)
        };

        Ok(Camera { position: eye, look, up, right })
    }

    /// Lays an image plane of `hsize × vsize` pixels in front of the camera.
    ///
    /// `view_angle` is the vertical field of view in degrees; the horizontal
    /// one follows from the aspect ratio.
    pub fn image_plane(&self, hsize: usize, vsize: usize, view_angle: f64)
        -> ImagePlane {
        ImagePlane::new(*self, hsize, vsize, view_angle)
    }
}

/// The grid of pixel centers primary rays are cast through.
///
/// The plane sits one unit in front of the camera along `look`. Pixel
/// `(i, j)` is column `i` counted from the left and row `j` counted from the
/// top.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImagePlane {
    pub camera: Camera,

    /// The horizontal size of the image, in pixels.
    pub hsize: usize,

    /// The vertical size of the image, in pixels.
    pub vsize: usize,

    pub half_width: f64,
    pub half_height: f64,

    /// Distance between neighbouring pixel centers along `right`.
    pub du: f64,

    /// Distance between neighbouring pixel centers along `up`.
    pub dv: f64,

    /// World position of the center of pixel `(0, 0)`.
    pub top_left: Vector3,
}

impl ImagePlane {
    pub fn new(camera: Camera, hsize: usize, vsize: usize, view_angle: f64)
        -> ImagePlane {
        let half_height = (view_angle.to_radians() / 2.0).tan();
        let aspect = hsize as f64 / vsize.max(1) as f64;
        let half_width = half_height * aspect;

        let du = 2.0 * half_width / hsize.max(1) as f64;
        let dv = 2.0 * half_height / vsize.max(1) as f64;

        // Upper left corner of the plane, moved to the first pixel's center
        let top_left = camera.position + camera.look
            - half_width * camera.right
            + half_height * camera.up
            + (0.5 * du) * camera.right
            - (0.5 * dv) * camera.up;

        ImagePlane {
            camera,
            hsize,
            vsize,
            half_width,
            half_height,
            du,
            dv,
            top_left,
        }
    }

    /// World position of the center of pixel `(i, j)`.
    pub fn pixel_center(&self, i: usize, j: usize) -> Vector3 {
        self.top_left
            + (i as f64 * self.du) * self.camera.right
            - (j as f64 * self.dv) * self.camera.up
    }

    /// Creates the primary ray through the center of pixel `(i, j)`.
    pub fn ray_for_pixel(&self, i: usize, j: usize) -> Ray {
        let v = self.pixel_center(i, j) - self.camera.position;

        // Every pixel lies at least one unit from the camera, along `look`.
        Ray { origin: self.camera.position, direction: v / v.magnitude() }
    }
}

#[cfg(test)]
fn facing_z() -> Camera {
    Camera::look_at(
        Vector3::zero(),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 1.0, 0.0),
    ).unwrap()
}

#[test]
fn orthogonal_hint_is_kept() {
    let c = facing_z();

    assert_eq!(c.look, Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(c.up, Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(c.right, Vector3::new(-1.0, 0.0, 0.0));
}

#[test]
fn default_pose_is_orthonormal() {
    let c = Camera::look_at(
        Vector3::new(125.0, 125.0, 125.0),
        Vector3::zero(),
        Vector3::new(0.0, 0.0, 1.0),
    ).unwrap();

    for v in [c.look, c.up, c.right] {
        assert!(v.is_normalized());
    }
    assert!(c.look.is_orthogonal(&c.up));
    assert!(c.look.is_orthogonal(&c.right));
    assert!(c.up.is_orthogonal(&c.right));
    assert_eq!(c.look.cross(&c.up), c.right);

    // The right vector stays level and up points towards +z
    assert!(crate::feq(c.right.z, 0.0));
    assert!(c.up.z > 0.0);
}

#[test]
fn looking_along_z_falls_back() {
    let c = Camera::look_at(
        Vector3::new(0.0, 0.0, 10.0),
        Vector3::zero(),
        Vector3::new(0.0, 0.0, 1.0),
    ).unwrap();

    assert_eq!(c.right, Vector3::new(1.0, 0.0, 0.0));
    assert!(c.up.is_normalized());
    assert!(c.up.is_orthogonal(&c.look));
}

#[test]
fn invalid_poses_fail() {
    let p = Vector3::new(1.0, 2.0, 3.0);

    assert!(Camera::look_at(p, p, Vector3::new(0.0, 0.0, 1.0)).is_err());
    assert!(Camera::look_at(p, Vector3::zero(), Vector3::zero()).is_err());
}

#[test]
fn ray_through_center() {
    let plane = facing_z().image_plane(11, 11, 90.0);
    let r = plane.ray_for_pixel(5, 5);

    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_through_corner() {
    let plane = facing_z().image_plane(2, 2, 90.0);
    let r = plane.ray_for_pixel(0, 0);

    assert_eq!(plane.pixel_center(0, 0), Vector3::new(0.5, 0.5, 1.0));
    assert_eq!(r.direction, Vector3::new(0.40825, 0.40825, 0.81650));
}

#[test]
fn wide_image_keeps_vertical_angle() {
    let plane = facing_z().image_plane(200, 100, 90.0);

    assert!(crate::feq(plane.half_height, 1.0));
    assert!(crate::feq(plane.half_width, 2.0));
    assert!(crate::feq(plane.du, plane.dv));
}
