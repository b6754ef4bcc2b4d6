use std::ops::Range;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use log::{ debug, info };

use crate::world::World;
use crate::camera::ImagePlane;
use crate::canvas::Canvas;
use crate::color::Color;

/// A finished range of image columns.
///
/// Colors are stored column by column, top to bottom, unclamped; the canvas
/// clamps them as they are stitched in.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub first_column: usize,
    pub colors: Vec<Color>,
}

/// Splits `hsize` columns into at most `threads` contiguous ranges.
///
/// Range sizes differ by at most one column, and no range is empty.
pub fn column_bands(hsize: usize, threads: usize) -> Vec<Range<usize>> {
    let count = threads.max(1).min(hsize);
    let mut bands = Vec::with_capacity(count);

    let mut start = 0;
    for n in 0..count {
        // The first `hsize % count` bands take one extra column
        let len = hsize / count + usize::from(n < hsize % count);
        bands.push(start..start + len);
        start += len;
    }

    bands
}

/// Traces every pixel in a range of columns.
pub fn render_band(world: &World, plane: &ImagePlane, columns: Range<usize>,
    depth: usize) -> Band {
    let first_column = columns.start;
    let mut colors = Vec::with_capacity(columns.len() * plane.vsize);

    for i in columns {
        for j in 0..plane.vsize {
            let ray = plane.ray_for_pixel(i, j);
            colors.push(world.color_at(&ray, depth));
        }
    }

    Band { first_column, colors }
}

/// Renders a world through an image plane.
///
/// The image is cut into column bands, one per worker thread. Workers only
/// read the world and the plane and hand back their own band, so nothing is
/// locked while tracing; bands are stitched into the canvas after every
/// worker has been joined. The result does not depend on `threads`.
pub fn render(world: &World, plane: &ImagePlane, depth: usize,
    threads: usize) -> Canvas {
    let bands = column_bands(plane.hsize, threads);
    let mut canvas = Canvas::new(plane.hsize, plane.vsize);

    info!("Rendering {}x{} pixels using {} threads...",
        plane.hsize, plane.vsize, bands.len());
    let started = Instant::now();

    let (sender, receiver) = mpsc::channel();
    thread::scope(|s| {
        for columns in bands {
            let sender = sender.clone();

            s.spawn(move || {
                debug!("Tracing columns {:?}", columns);
                let band = render_band(world, plane, columns, depth);

                // The receiver outlives the scope, so this cannot fail.
                let _ = sender.send(band);
            });
        }
    });
    drop(sender);

    for band in receiver.iter() {
        canvas.write_columns(band.first_column, &band.colors);
    }

    info!("...done in {:.2?}.", started.elapsed());
    canvas
}

/* Tests */

#[cfg(test)]
use crate::camera::Camera;

#[cfg(test)]
use crate::vector::Vector3;

#[cfg(test)]
use crate::surface::Surface;

#[cfg(test)]
use crate::light::{ Material, PointLight };

#[cfg(test)]
fn plane(hsize: usize, vsize: usize) -> ImagePlane {
    Camera::look_at(
        Vector3::zero(),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 1.0, 0.0),
    ).unwrap().image_plane(hsize, vsize, 60.0)
}

#[cfg(test)]
fn busy_world() -> World {
    let shiny = Material {
        color: Color::rgb(0.9, 0.4, 0.2),
        reflection: 0.4,
        ..Default::default()
    };

    World::new(vec![
        Surface::sphere(Vector3::new(0.0, 0.0, 20.0), 5.0).unwrap()
            .with_material(shiny),
        Surface::sphere(Vector3::new(6.0, 4.0, 30.0), 4.0).unwrap(),
        Surface::triangle(
            Vector3::new(-20.0, -8.0, 40.0),
            Vector3::new(20.0, -8.0, 40.0),
            Vector3::new(0.0, 20.0, 45.0),
        ).unwrap().with_material(shiny),
    ], vec![
        PointLight::new(Vector3::new(-10.0, 10.0, 0.0), Color::white()).into(),
        PointLight::new(Vector3::new(10.0, -5.0, 5.0),
            Color::rgb(0.5, 0.5, 1.0)).into(),
    ])
}

#[test]
fn bands_cover_every_column() {
    for (hsize, threads) in [(500, 8), (10, 3), (3, 8), (7, 1), (1, 1)] {
        let bands = column_bands(hsize, threads);

        assert!(bands.len() <= threads);
        assert_eq!(bands[0].start, 0);
        assert_eq!(bands[bands.len() - 1].end, hsize);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }

        let sizes: Vec<usize> = bands.iter().map(|b| b.len()).collect();
        let min = sizes.iter().min().unwrap();
        let max = sizes.iter().max().unwrap();
        assert!(*min > 0);
        assert!(max - min <= 1);
    }
}

#[test]
fn zero_threads_still_renders() {
    assert_eq!(column_bands(4, 0), vec![0..4]);
}

#[test]
fn thread_count_does_not_change_image() {
    let w = busy_world();
    let p = plane(23, 17);

    let single = render(&w, &p, 3, 1);
    for threads in [2, 4, 7, 64] {
        let image = render(&w, &p, 3, threads);
        assert_eq!(image.to_image().as_raw(), single.to_image().as_raw());
    }
}

#[test]
fn render_is_deterministic() {
    let w = busy_world();
    let p = plane(16, 16);

    let first = render(&w, &p, 3, 4).to_image();
    let second = render(&w, &p, 3, 4).to_image();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn ambient_sphere_fills_center_pixel() {
    let color = Color::rgb(0.2, 0.6, 0.4);
    let m = Material {
        color,
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        reflection: 0.0,
        ..Default::default()
    };

    for light in [Vector3::new(0.0, 0.0, -1e4), Vector3::new(1e4, 1e4, 20.0)] {
        let w = World::new(vec![
            Surface::sphere(Vector3::new(0.0, 0.0, 20.0), 5.0).unwrap()
                .with_material(m),
        ], vec![PointLight::new(light, Color::white()).into()]);
        let p = plane(11, 11);

        assert!(w.nearest_hit(&p.ray_for_pixel(5, 5)).is_some());
        let image = render(&w, &p, 3, 4);
        assert_eq!(image.read_pixel(5, 5).unwrap(), color);
        assert_eq!(image.read_pixel(0, 0).unwrap(), Color::black());
    }
}

#[test]
fn head_on_light_is_near_full_brightness() {
    let m = Material {
        ambient: 0.0,
        diffuse: 1.0,
        specular: 0.0,
        reflection: 0.0,
        ..Default::default()
    };
    let w = World::new(vec![
        Surface::sphere(Vector3::new(0.0, 0.0, 20.0), 5.0).unwrap()
            .with_material(m),
    ], vec![
        PointLight::new(Vector3::new(0.0, 0.0, -100.0), Color::white()).into(),
    ]);

    let image = render(&w, &plane(11, 11), 0, 2);
    let center = image.read_pixel(5, 5).unwrap();
    assert!(center.r > 0.99 && center.g > 0.99 && center.b > 0.99);

    let edge = image.read_pixel(5, 3).unwrap();
    assert!(edge.r < center.r);
}
