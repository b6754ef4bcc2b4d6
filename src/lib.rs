pub mod consts;
pub mod error;

pub mod vector;
pub mod ray;
pub mod light;

pub mod geometry;
pub mod surface;
pub mod world;
pub mod camera;

pub mod color;
pub mod canvas;

pub mod parallel;
pub mod scene;
pub mod config;

use consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
