use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{ debug, warn };
use serde::{ Serialize, Deserialize };

use crate::consts::{ DEFAULT_FLOOR_WIDTH, DEFAULT_TILE_WIDTH,
    DEFAULT_REFLECTION_DEPTH, DEFAULT_IMAGE_SIZE, FEQ_EPSILON };
use crate::vector::Vector3;
use crate::color::Color;
use crate::light::{ Material, PointLight, SpotLight, LightSource };
use crate::geometry::QuadricCoefficients;
use crate::surface::Surface;
use crate::world::World;
use crate::error::{ Error, Result };

/// One surface of a scene description, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SurfaceDescription {
    Sphere {
        center: Vector3,
        radius: f64,
        #[serde(default)]
        material: Material,
    },

    Triangle {
        vertices: [Vector3; 3],
        #[serde(default)]
        material: Material,
    },

    /// A general quadric. A zero dimension leaves that axis unclipped.
    General {
        coefficients: QuadricCoefficients,
        #[serde(default)]
        reference: Vector3,
        #[serde(default)]
        dimensions: [f64; 3],
        #[serde(default)]
        material: Material,
    },

    /// A prism with caps `vertices[0..3]` and `vertices[3..6]`.
    Prism {
        vertices: [Vector3; 6],
        #[serde(default)]
        material: Material,
    },
}

impl SurfaceDescription {
    pub fn material(&self) -> &Material {
        match self {
            SurfaceDescription::Sphere { material, .. } => material,
            SurfaceDescription::Triangle { material, .. } => material,
            SurfaceDescription::General { material, .. } => material,
            SurfaceDescription::Prism { material, .. } => material,
        }
    }

    /// Builds the surface, validating its geometry.
    pub fn build(&self) -> Result<Surface> {
        let surface = match self {
            SurfaceDescription::Sphere { center, radius, .. } =>
                Surface::sphere(*center, *radius)?,
            SurfaceDescription::Triangle { vertices: [a, b, c], .. } =>
                Surface::triangle(*a, *b, *c)?,
            SurfaceDescription::General {
                coefficients, reference, dimensions, ..
            } => Surface::quadric(*coefficients, *reference, *dimensions)?,
            SurfaceDescription::Prism { vertices, .. } =>
                Surface::prism(*vertices)?,
        };

        self.material().validate()?;
        Ok(surface.with_material(*self.material()))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLightDescription {
    pub position: Vector3,
    #[serde(default = "Color::white")]
    pub color: Color,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpotLightDescription {
    pub position: Vector3,
    #[serde(default = "Color::white")]
    pub color: Color,
    pub direction: Vector3,
    pub cutoff_angle: f64,
}

/// The checkerboard floor.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorDescription {
    pub width: f64,
    pub tile_width: f64,
    pub material: Material,
}

impl Default for FloorDescription {
    fn default() -> FloorDescription {
        FloorDescription {
            width: DEFAULT_FLOOR_WIDTH,
            tile_width: DEFAULT_TILE_WIDTH,
            material: Material::floor(),
        }
    }
}

fn default_reflection_depth() -> usize { DEFAULT_REFLECTION_DEPTH }
fn default_pixels() -> usize { DEFAULT_IMAGE_SIZE }
fn default_floor() -> Option<FloorDescription> { Some(Default::default()) }

/// Everything a scene file describes.
///
/// Scenes are loaded into a description first and only then built into a
/// `World`, so both formats share the same validation.
///
/// A scene lists surfaces and lights plus two render hints, the reflection
/// depth and the image size. It can be written as JSON, or in the plain
/// whitespace-separated text format:
///
/// ```text
/// 3                                   reflection depth
/// 500                                 image size in pixels
/// 1                                   number of surfaces
/// sphere                              surface kind
/// 40 0 10  10                         center, radius
/// 0 1 0                               color
/// 0.4 0.2 0.2 0.2                     ambient diffuse specular reflection
/// 10                                  shininess
/// 1                                   number of point lights
/// 70 70 70  1 1 1                     position, color
/// 1                                   number of spotlights
/// 100 100 100  1 1 1  -1 -1 -1  30    position, color, direction, cutoff
/// ```
///
/// Triangles take three vertices instead of a center and radius, prisms six,
/// and `general` quadrics their ten coefficients `A` to `J`, a reference point
/// and a `length width height` clipping box. The text format always gets the
/// default checkerboard floor appended after its surfaces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "default_reflection_depth")]
    pub reflection_depth: usize,

    /// Width and height of the (square) image the scene asks for.
    #[serde(default = "default_pixels")]
    pub pixels: usize,

    #[serde(default)]
    pub surfaces: Vec<SurfaceDescription>,

    #[serde(default)]
    pub point_lights: Vec<PointLightDescription>,

    #[serde(default)]
    pub spot_lights: Vec<SpotLightDescription>,

    /// The floor added after every other surface; `null` leaves it out.
    #[serde(default = "default_floor")]
    pub floor: Option<FloorDescription>,
}

impl Default for SceneDescription {
    fn default() -> SceneDescription {
        SceneDescription {
            reflection_depth: DEFAULT_REFLECTION_DEPTH,
            pixels: DEFAULT_IMAGE_SIZE,
            surfaces: Vec::new(),
            point_lights: Vec::new(),
            spot_lights: Vec::new(),
            floor: default_floor(),
        }
    }
}

impl SceneDescription {
    /// Loads a scene file, choosing the format by extension.
    ///
    /// `.json` files are read as JSON; anything else as the text format.
    pub fn load(path: &Path) -> Result<SceneDescription> {
        let source = fs::read_to_string(path)?;

        let is_json = path.extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            SceneDescription::from_json(&source)
        } else {
            SceneDescription::from_text(&source)
        }
    }

    pub fn from_json(source: &str) -> Result<SceneDescription> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses the text format described on `SceneDescription`.
    pub fn from_text(source: &str) -> Result<SceneDescription> {
        let mut tokens = Tokens::new(source);

        let reflection_depth = tokens.number("reflection depth")?;
        let pixels = tokens.number("image size")?;

        let surface_count: usize = tokens.number("surface count")?;
        let mut surfaces = Vec::new();
        for _ in 0..surface_count {
            surfaces.push(tokens.surface()?);
        }

        let point_count: usize = tokens.number("point light count")?;
        let mut point_lights = Vec::new();
        for _ in 0..point_count {
            point_lights.push(PointLightDescription {
                position: tokens.vector("point light position")?,
                color: tokens.color("point light color")?,
            });
        }

        let spot_count: usize = tokens.number("spotlight count")?;
        let mut spot_lights = Vec::new();
        for _ in 0..spot_count {
            spot_lights.push(SpotLightDescription {
                position: tokens.vector("spotlight position")?,
                color: tokens.color("spotlight color")?,
                direction: tokens.vector("spotlight direction")?,
                cutoff_angle: tokens.number("spotlight cutoff angle")?,
            });
        }

        if let Some((line, token)) = tokens.peek() {
            warn!("Ignoring trailing input from line {} (`{}`)", line, token);
        }

        Ok(SceneDescription {
            reflection_depth,
            pixels,
            surfaces,
            point_lights,
            spot_lights,
            floor: default_floor(),
        })
    }

    /// Builds the world this scene describes.
    ///
    /// Surfaces keep their order, and the floor (if any) comes last. Any
    /// invalid surface or light fails the whole build.
    pub fn build(&self) -> Result<World> {
        let mut world = World::empty();

        for (index, description) in self.surfaces.iter().enumerate() {
            let surface = description.build()?;

            let sum = surface.material.coefficient_sum();
            if sum > 1.0 + FEQ_EPSILON {
                warn!("Coefficients of {} #{} sum to {:.2}; it may look \
                    overexposed", surface.kind(), index, sum);
            }

            world.surfaces.push(surface);
        }

        if let Some(floor) = self.floor {
            floor.material.validate()?;
            world.surfaces.push(Surface::floor(floor.width, floor.tile_width)?
                .with_material(floor.material));
        }

        for light in self.point_lights.iter() {
            world.lights.push(PointLight::new(light.position, light.color).into());
        }

        for light in self.spot_lights.iter() {
            let spot = SpotLight::new(light.position, light.color,
                light.direction, light.cutoff_angle)?;
            world.lights.push(LightSource::from(spot));
        }

        debug!("Loaded {} surfaces and {} lights",
            world.surfaces.len(), world.lights.len());

        Ok(world)
    }
}

/// A cursor over the whitespace-separated tokens of a text scene.
struct Tokens<'a> {
    tokens: Vec<(usize, &'a str)>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(source: &'a str) -> Tokens<'a> {
        let tokens = source.lines()
            .enumerate()
            .flat_map(|(n, line)| {
                line.split_whitespace().map(move |token| (n + 1, token))
            })
            .collect();

        Tokens { tokens, position: 0 }
    }

    fn peek(&self) -> Option<(usize, &'a str)> {
        self.tokens.get(self.position).copied()
    }

    fn next(&mut self, expected: &str) -> Result<(usize, &'a str)> {
        let token = self.peek().ok_or_else(|| Error::UnexpectedEof {
            expected: expected.to_string(),
        })?;
        self.position += 1;

        Ok(token)
    }

    fn number<T: FromStr>(&mut self, expected: &str) -> Result<T> {
        let (line, token) = self.next(expected)?;

        token.parse().map_err(|_| Error::Parse {
            line,
            token: token.to_string(),
            message: format!("expected {}", expected),
        })
    }

    fn vector(&mut self, expected: &str) -> Result<Vector3> {
        Ok(Vector3::new(
            self.number(expected)?,
            self.number(expected)?,
            self.number(expected)?,
        ))
    }

    fn color(&mut self, expected: &str) -> Result<Color> {
        Ok(Color::rgb(
            self.number(expected)?,
            self.number(expected)?,
            self.number(expected)?,
        ))
    }

    /// Reads the color, coefficients and shininess ending every surface.
    fn material(&mut self) -> Result<Material> {
        Ok(Material {
            color: self.color("surface color")?,
            ambient: self.number("ambient coefficient")?,
            diffuse: self.number("diffuse coefficient")?,
            specular: self.number("specular coefficient")?,
            reflection: self.number("reflection coefficient")?,
            shininess: self.number("shininess")?,
        })
    }

    fn surface(&mut self) -> Result<SurfaceDescription> {
        let (line, kind) = self.next("surface kind")?;

        let surface = match kind {
            "sphere" => {
                let center = self.vector("sphere center")?;
                let radius = self.number("sphere radius")?;

                SurfaceDescription::Sphere {
                    center,
                    radius,
                    material: self.material()?,
                }
            },
            "triangle" => {
                let vertices = [
                    self.vector("triangle vertex")?,
                    self.vector("triangle vertex")?,
                    self.vector("triangle vertex")?,
                ];

                SurfaceDescription::Triangle {
                    vertices,
                    material: self.material()?,
                }
            },
            "general" => {
                let mut k = [0.0; 10];
                for value in k.iter_mut() {
                    *value = self.number("quadric coefficient")?;
                }
                let reference = self.vector("quadric reference point")?;
                let dimensions = [
                    self.number("quadric length")?,
                    self.number("quadric width")?,
                    self.number("quadric height")?,
                ];

                SurfaceDescription::General {
                    coefficients: k.into(),
                    reference,
                    dimensions,
                    material: self.material()?,
                }
            },
            "prism" => {
                let mut vertices = [Vector3::zero(); 6];
                for v in vertices.iter_mut() {
                    *v = self.vector("prism vertex")?;
                }

                SurfaceDescription::Prism {
                    vertices,
                    material: self.material()?,
                }
            },
            _ => {
                return Err(Error::UnknownSurface {
                    line,
                    kind: kind.to_string(),
                });
            }
        };

        Ok(surface)
    }
}

#[cfg(test)]
const SAMPLE: &str = "\
3
400
4
sphere
0 0 20 5
1 0 0
0.2 0.4 0.2 0.2
10
triangle
-10 0 0  10 0 0  0 10 0
0 1 0
0.4 0.2 0.1 0.3
5
general
1 1 1 0 0 0 0 0 0 -100
0 0 0
0 0 20
0 1 0
0.4 0.2 0.1 0.3
10
prism
-1 -1 0  1 -1 0  0 1 0  -1 -1 2  1 -1 2  0 1 2
0 0 1
0.4 0.2 0.2 0.2
3
1
70 70 70  1 1 1
1
0 0 100  1 1 1  0 0 -1  30
";

#[test]
fn text_scene_is_read_in_order() {
    let scene = SceneDescription::from_text(SAMPLE).unwrap();

    assert_eq!(scene.reflection_depth, 3);
    assert_eq!(scene.pixels, 400);
    assert_eq!(scene.surfaces.len(), 4);
    assert_eq!(scene.point_lights.len(), 1);
    assert_eq!(scene.spot_lights.len(), 1);
    assert_eq!(scene.floor, Some(Default::default()));

    match scene.surfaces[0] {
        SurfaceDescription::Sphere { center, radius, material } => {
            assert_eq!(center, Vector3::new(0.0, 0.0, 20.0));
            assert_eq!(radius, 5.0);
            assert_eq!(material.color, Color::rgb(1.0, 0.0, 0.0));
            assert_eq!(material.diffuse, 0.4);
            assert_eq!(material.shininess, 10);
        },
        ref other => panic!("expected a sphere, got {:?}", other),
    }

    let spot = scene.spot_lights[0];
    assert_eq!(spot.direction, Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(spot.cutoff_angle, 30.0);
}

#[test]
fn text_scene_builds_world_with_floor_last() {
    let world = SceneDescription::from_text(SAMPLE).unwrap().build().unwrap();
    let kinds: Vec<&str> = world.surfaces.iter().map(|s| s.kind()).collect();

    assert_eq!(kinds, vec!["sphere", "triangle", "general", "prism", "floor"]);
    assert_eq!(world.surfaces[4].material, Material::floor());
    assert_eq!(world.lights.len(), 2);
    assert!(matches!(world.lights[1], LightSource::Spot(_)));
}

#[test]
fn parse_errors_name_line_and_token() {
    let source = "3\n400\n1\nsphere\n0 0 x 5\n";

    match SceneDescription::from_text(source) {
        Err(Error::Parse { line, token, .. }) => {
            assert_eq!(line, 5);
            assert_eq!(token, "x");
        },
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn unknown_surface_kind() {
    let source = "3 400\n1\ncube 0 0 0 1\n";

    match SceneDescription::from_text(source) {
        Err(Error::UnknownSurface { line, kind }) => {
            assert_eq!(line, 3);
            assert_eq!(kind, "cube");
        },
        other => panic!("expected an unknown surface, got {:?}", other),
    }
}

#[test]
fn truncated_text_scene() {
    let source = "3 400 1 sphere 0 0 0 5 1 1 1";

    assert!(matches!(SceneDescription::from_text(source),
        Err(Error::UnexpectedEof { .. })));
}

#[test]
fn invalid_surface_fails_build() {
    let source = "3 400 1 sphere 0 0 0 0  1 1 1  0.1 0.1 0.1 0.1  1  0 0";
    let scene = SceneDescription::from_text(source).unwrap();

    assert!(scene.build().is_err());
}

#[test]
fn negative_shininess_fails_build() {
    let source = "3 400 1 sphere 0 0 20 5  1 1 1  0.1 0.1 0.1 0.1  -1  0 0";
    let scene = SceneDescription::from_text(source).unwrap();

    assert!(matches!(scene.build(), Err(Error::DegenerateSurface(_))));

    let mut scene = SceneDescription::default();
    if let Some(ref mut floor) = scene.floor {
        floor.material.shininess = -3;
    }
    assert!(matches!(scene.build(), Err(Error::DegenerateSurface(_))));
}

#[test]
fn json_scene() {
    let source = r#"{
        "reflection_depth": 2,
        "surfaces": [
            { "kind": "sphere", "center": [0, 0, 20], "radius": 5,
              "material": { "color": [1, 0, 0], "reflection": 0.5 } },
            { "kind": "general",
              "coefficients": [1, 1, 0, 0, 0, 0, 0, 0, 0, -4],
              "dimensions": [0, 0, 10] }
        ],
        "point_lights": [ { "position": [0, 0, -50] } ],
        "floor": null
    }"#;

    let scene = SceneDescription::from_json(source).unwrap();
    assert_eq!(scene.reflection_depth, 2);
    assert_eq!(scene.pixels, DEFAULT_IMAGE_SIZE);
    assert_eq!(scene.floor, None);
    assert_eq!(scene.surfaces[0].material().reflection, 0.5);
    assert_eq!(scene.surfaces[0].material().ambient, 0.1);
    assert_eq!(scene.point_lights[0].color, Color::white());

    let world = scene.build().unwrap();
    assert_eq!(world.surfaces.len(), 2);
    assert_eq!(world.surfaces[1].kind(), "general");
}

#[test]
fn json_floor_defaults_when_missing() {
    let scene = SceneDescription::from_json("{}").unwrap();

    assert_eq!(scene, SceneDescription::default());
    assert_eq!(scene.build().unwrap().surfaces[0].kind(), "floor");
}

#[test]
fn json_unknown_kind_is_rejected() {
    let source = r#"{ "surfaces": [ { "kind": "torus" } ] }"#;

    assert!(matches!(SceneDescription::from_json(source), Err(Error::Json(_))));
}
