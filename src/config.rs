use std::fs;
use std::path::{ Path, PathBuf };

use serde::Deserialize;

use crate::consts::{ DEFAULT_VIEW_ANGLE, DEFAULT_CAMERA_POSITION,
    DEFAULT_CAMERA_LOOK_AT, DEFAULT_CAMERA_UP, DEFAULT_OUT_FILE };
use crate::vector::Vector3;
use crate::camera::{ Camera, ImagePlane };
use crate::scene::SceneDescription;
use crate::error::Result;

#[derive(Deserialize, Copy, Clone, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    pub position: Option<Vector3>,
    pub look_at: Option<Vector3>,
    pub up: Option<Vector3>,

    /// Vertical field of view, in degrees.
    pub view_angle: Option<f64>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub path: Option<PathBuf>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

/// The contents of a TOML config file.
///
/// Settings are layered: built-in defaults, then this file, then command
/// line overrides. A config file may set any subset of:
///
/// ```toml
/// threads = 8
/// reflection_depth = 4
///
/// [camera]
/// position = [125.0, 125.0, 125.0]
/// look_at = [0.0, 0.0, 0.0]
/// up = [0.0, 0.0, 1.0]
/// view_angle = 80.0
///
/// [output]
/// path = "render.png"
/// width = 640
/// height = 480
/// ```
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TOMLConfig {
    pub camera: CameraSettings,
    pub output: OutputSettings,
    pub threads: Option<usize>,
    pub reflection_depth: Option<usize>,
}

impl TOMLConfig {
    pub fn parse(source: &str) -> Result<TOMLConfig> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<TOMLConfig> {
        TOMLConfig::parse(&fs::read_to_string(path)?)
    }
}

/// Settings given on the command line. They beat everything else.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub threads: Option<usize>,
    pub reflection_depth: Option<usize>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

/// Fully resolved settings for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub camera_position: Vector3,
    pub camera_look_at: Vector3,
    pub camera_up: Vector3,
    pub view_angle: f64,

    pub output: PathBuf,
    pub width: usize,
    pub height: usize,

    pub threads: usize,
    pub reflection_depth: usize,
}

impl RenderConfig {
    /// Resolves settings for rendering `scene`.
    ///
    /// Command line overrides win over the config file, which wins over
    /// built-in defaults. Image size and reflection depth fall back to what
    /// the scene asks for, and the thread count to the number of CPUs.
    pub fn resolve(file: &TOMLConfig, overrides: &Overrides,
        scene: &SceneDescription) -> RenderConfig {
        let camera = &file.camera;

        let threads = overrides.threads
            .or(file.threads)
            .filter(|&n| n > 0)
            .unwrap_or_else(num_cpus::get);

        RenderConfig {
            camera_position: camera.position
                .unwrap_or_else(|| DEFAULT_CAMERA_POSITION.into()),
            camera_look_at: camera.look_at
                .unwrap_or_else(|| DEFAULT_CAMERA_LOOK_AT.into()),
            camera_up: camera.up
                .unwrap_or_else(|| DEFAULT_CAMERA_UP.into()),
            view_angle: camera.view_angle.unwrap_or(DEFAULT_VIEW_ANGLE),

            output: overrides.output.clone()
                .or_else(|| file.output.path.clone())
                .unwrap_or_else(|| DEFAULT_OUT_FILE.into()),
            width: overrides.width
                .or(file.output.width)
                .unwrap_or(scene.pixels),
            height: overrides.height
                .or(file.output.height)
                .unwrap_or(scene.pixels),

            threads,
            reflection_depth: overrides.reflection_depth
                .or(file.reflection_depth)
                .unwrap_or(scene.reflection_depth),
        }
    }

    pub fn camera(&self) -> Result<Camera> {
        Camera::look_at(self.camera_position, self.camera_look_at,
            self.camera_up)
    }

    pub fn image_plane(&self) -> Result<ImagePlane> {
        Ok(self.camera()?.image_plane(self.width, self.height, self.view_angle))
    }
}

#[test]
fn empty_config_uses_defaults_and_scene() {
    let scene = SceneDescription { pixels: 320, reflection_depth: 5,
        ..Default::default() };
    let c = RenderConfig::resolve(&TOMLConfig::parse("").unwrap(),
        &Default::default(), &scene);

    assert_eq!(c.camera_position, Vector3::new(125.0, 125.0, 125.0));
    assert_eq!(c.camera_up, Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(c.view_angle, DEFAULT_VIEW_ANGLE);
    assert_eq!(c.output, PathBuf::from(DEFAULT_OUT_FILE));
    assert_eq!((c.width, c.height), (320, 320));
    assert_eq!(c.reflection_depth, 5);
    assert!(c.threads > 0);
}

#[test]
fn config_file_sections() {
    let file = TOMLConfig::parse(r#"
        threads = 3
        reflection_depth = 1

        [camera]
        position = [0.0, -50.0, 10.0]
        view_angle = 60.0

        [output]
        path = "render.png"
        width = 64
    "#).unwrap();
    let c = RenderConfig::resolve(&file, &Default::default(),
        &Default::default());

    assert_eq!(c.camera_position, Vector3::new(0.0, -50.0, 10.0));
    assert_eq!(c.camera_look_at, Vector3::zero());
    assert_eq!(c.view_angle, 60.0);
    assert_eq!(c.output, PathBuf::from("render.png"));
    assert_eq!((c.width, c.height), (64, 500));
    assert_eq!(c.threads, 3);
    assert_eq!(c.reflection_depth, 1);
    assert!(c.image_plane().is_ok());
}

#[test]
fn overrides_beat_config_file() {
    let file = TOMLConfig::parse("threads = 3\n[output]\nwidth = 64\n")
        .unwrap();
    let overrides = Overrides {
        threads: Some(7),
        width: Some(10),
        reflection_depth: Some(0),
        output: Some("x.bmp".into()),
        ..Default::default()
    };
    let c = RenderConfig::resolve(&file, &overrides, &Default::default());

    assert_eq!(c.threads, 7);
    assert_eq!(c.width, 10);
    assert_eq!(c.reflection_depth, 0);
    assert_eq!(c.output, PathBuf::from("x.bmp"));
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(TOMLConfig::parse("thread = 3\n").is_err());
    assert!(TOMLConfig::parse("[camera]\nfov = 3.0\n").is_err());
}
