use std::path::Path;

use image::{ Rgb, RgbImage };

use crate::color::Color;
use crate::error::Result;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer. The renderer writes
/// one color per pixel, and once it finishes the `Canvas` can be saved to an
/// image file.
///
/// Colors are clamped to [0, 1] when written, so every stored pixel is ready
/// for output.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector of rows.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a color to a location on the `Canvas`, clamping it first.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column of the pixel and
    /// `y` its row, both zero-indexed from the top left.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted_tracer::color::Color;
    /// # use whitted_tracer::canvas::Canvas;
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &Color::rgb(1.5, 0.0, 1.0));
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), Color::rgb(1.0, 0.0, 1.0));
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel.clamp();
    }

    /// Reads a color from column `x`, row `y` of the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Reads a color by `(row, column)`, the order images are indexed in.
    pub fn pixel_at_row_col(&self, row: usize, col: usize) -> Option<Color> {
        self.read_pixel(col, row)
    }

    /// Copies a band of columns into the canvas.
    ///
    /// `band` holds `columns.len()` columns of `height` colors each, stored
    /// column by column, the way the parallel renderer produces them.
    pub fn write_columns(&mut self, first_column: usize, band: &[Color]) {
        if self.height == 0 {
            return;
        }

        for (offset, column) in band.chunks(self.height).enumerate() {
            for (y, color) in column.iter().enumerate() {
                self.write_pixel(first_column + offset, y, color);
            }
        }
    }

    /// Converts the canvas into an 8-bit RGB image.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let color = self.pixels[(y as usize * self.width) + x as usize];
            Rgb(color.to_rgb8())
        })
    }

    /// Saves a canvas to an image file.
    ///
    /// The format follows the file extension (`.bmp`, `.png`, `.ppm`).
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_image().save(path)?;

        Ok(())
    }
}

#[test]
fn canvas_starts_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    for y in 0..20 {
        for x in 0..10 {
            assert_eq!(c.read_pixel(x, y).unwrap(), Color::black());
        }
    }
}

#[test]
fn write_is_clamped_and_bounded() {
    let mut c = Canvas::new(4, 3);
    c.write_pixel(1, 2, &Color::rgb(-0.5, 0.5, 3.0));
    c.write_pixel(4, 0, &Color::white());

    assert_eq!(c.read_pixel(1, 2).unwrap(), Color::rgb(0.0, 0.5, 1.0));
    assert_eq!(c.pixel_at_row_col(2, 1).unwrap(), Color::rgb(0.0, 0.5, 1.0));
    assert_eq!(c.read_pixel(4, 0), None);
}

#[test]
fn columns_land_in_place() {
    let mut c = Canvas::new(4, 2);
    let red = Color::rgb(1.0, 0.0, 0.0);
    let blue = Color::rgb(0.0, 0.0, 1.0);

    c.write_columns(2, &[red, red, blue, blue]);

    assert_eq!(c.read_pixel(1, 0).unwrap(), Color::black());
    assert_eq!(c.read_pixel(2, 1).unwrap(), red);
    assert_eq!(c.read_pixel(3, 0).unwrap(), blue);
}

#[test]
fn image_conversion() {
    let mut c = Canvas::new(2, 1);
    c.write_pixel(1, 0, &Color::rgb(1.0, 0.5, 0.0));

    let img = c.to_image();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    assert_eq!(img.get_pixel(1, 0), &Rgb([255, 128, 0]));
}
