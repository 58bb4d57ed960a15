use crate::colorings::{to_rgba, ColorFromMandel};
use crate::error::{Error, Result};
use crate::image::{image_data_size, Image, BYTES_PER_PIXEL};
use tracing::debug;

/// Iteration depth used when the caller does not choose one.
pub const DEFAULT_ITERATION_DEPTH: u32 = 255;

/// A rectangle of the complex plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub real_min: f64,
    pub real_max: f64,
    pub imag_min: f64,
    pub imag_max: f64,
}

impl Region {
    /// The view requested by the browser loader.
    pub const LOADER_VIEW: Region = Region::new(-2.0, 1.0, -1.5, 1.5);
    /// The view of the first, canvas-drawing version of the renderer.
    pub const CLASSIC_VIEW: Region = Region::new(-2.1, 0.6, -1.25, 1.25);

    pub const fn new(real_min: f64, real_max: f64, imag_min: f64, imag_max: f64) -> Region {
        Region {
            real_min,
            real_max,
            imag_min,
            imag_max,
        }
    }

    /// Rejects inverted, empty and non-finite bounds, and spans that
    /// overflow an `f64`.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.real_min,
            self.real_max,
            self.imag_min,
            self.imag_max,
            self.real_max - self.real_min,
            self.imag_max - self.imag_min,
        ]
        .iter()
        .all(|v| v.is_finite());
        if finite && self.real_min < self.real_max && self.imag_min < self.imag_max {
            Ok(())
        } else {
            Err(Error::InvalidRegion {
                real_min: self.real_min,
                real_max: self.real_max,
                imag_min: self.imag_min,
                imag_max: self.imag_max,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Parameters for mapping from mandelbrot space to a raster
pub struct Mapping {
    /// The part of the plane that is sampled
    pub region: Region,
    /// The maximum number of iterations used in the computation of the
    /// mandelbrot value. So, also the maximum mandelbrot value.
    pub iteration_depth: u32,
    /// The width of the raster in pixels
    pub width: u32,
    /// The height of the raster in pixels
    pub height: u32,
}

impl Mapping {
    pub fn new(region: Region, width: u32, height: u32) -> Mapping {
        Mapping {
            region,
            iteration_depth: DEFAULT_ITERATION_DEPTH,
            width,
            height,
        }
    }
    pub fn with_iteration_depth(mut self, iteration_depth: u32) -> Mapping {
        self.iteration_depth = iteration_depth;
        self
    }
    /// Checks everything except the output buffer. Returns the number of
    /// bytes the raster needs.
    pub fn validate(&self) -> Result<usize> {
        self.region.validate()?;
        let size = image_data_size(self.width, self.height)?;
        if self.iteration_depth == 0 {
            return Err(Error::InvalidIterationDepth);
        }
        Ok(size as usize)
    }
    /// Bytes in one row of the raster.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL as usize
    }
}

/*
Pixels are sampled at their centers. With w the raster width and
s = (real_max - real_min) / w the width of one pixel in the plane:
x_m(x_w) = real_min + (x_w + 0.5) * s
and likewise for rows, with row 0 at imag_min.
 */
#[derive(Debug, Clone, Copy)]
pub struct PixelToPlane {
    x0: f64,
    y0: f64,
    dx: f64,
    dy: f64,
}

impl PixelToPlane {
    pub fn from_mapping(mapping: &Mapping) -> PixelToPlane {
        let r = &mapping.region;
        PixelToPlane {
            x0: r.real_min,
            y0: r.imag_min,
            dx: (r.real_max - r.real_min) / mapping.width as f64,
            dy: (r.imag_max - r.imag_min) / mapping.height as f64,
        }
    }
    pub fn cvt(&self, px: u32, py: u32) -> (f64, f64) {
        (self.cvt_x(px), self.cvt_y(py))
    }
    pub fn cvt_x(&self, px: u32) -> f64 {
        self.x0 + (px as f64 + 0.5) * self.dx
    }
    pub fn cvt_y(&self, py: u32) -> f64 {
        self.y0 + (py as f64 + 0.5) * self.dy
    }
}

/// What is left of a point after iterating it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Escape {
    /// Steps taken before |z| exceeded 2, or the depth when it never did.
    pub iterations: u32,
    /// |z|² after the last step.
    pub norm_sqr: f64,
}

impl Escape {
    /// Continuous escape value for points that escaped.
    pub fn smooth_value(&self) -> f64 {
        let log_modulus = 0.5 * self.norm_sqr.ln();
        self.iterations as f64 + 1.0 - log_modulus.log2()
    }
}

// Iterate z <- z² + c from z = 0 until |z| > 2 or max_iter steps were taken
pub fn mandel_value(x: f64, y: f64, max_iter: u32) -> Escape {
    let (mut r, mut i, mut r2, mut i2) = (0.0, 0.0, 0.0, 0.0);
    let mut iter = 0;
    while r2 + i2 <= 4.0 && iter < max_iter {
        i = (r + r) * i + y;
        r = r2 - i2 + x;
        r2 = r * r;
        i2 = i * i;
        iter += 1;
    }
    Escape {
        iterations: iter,
        norm_sqr: r2 + i2,
    }
}

// Fill one row of pixels. `line` holds exactly one row.
pub(crate) fn fill_row(
    line: &mut [u8],
    py: u32,
    converter: &PixelToPlane,
    max: u32,
    coloring: &dyn ColorFromMandel,
) {
    let y = converter.cvt_y(py);
    for (px, pixel) in (0u32..).zip(line.chunks_exact_mut(BYTES_PER_PIXEL as usize)) {
        let x = converter.cvt_x(px);
        let color = coloring.get(mandel_value(x, y, max), max);
        pixel.copy_from_slice(&to_rgba(color));
    }
}

// Fill the bytes of an image with the mandelbrot image according to the parameters.
// Everything is validated before the first byte is written; bytes past the
// raster are left alone.
pub fn fill_mandel_image(
    data: &mut [u8],
    mapping: &Mapping,
    coloring: &dyn ColorFromMandel,
) -> Result<()> {
    let required = mapping.validate()?;
    if data.len() < required {
        return Err(Error::BufferTooSmall {
            required,
            provided: data.len(),
        });
    }
    debug!(
        width = mapping.width,
        height = mapping.height,
        depth = mapping.iteration_depth,
        "rendering"
    );
    let converter = PixelToPlane::from_mapping(mapping);
    let rows = data[..required].chunks_exact_mut(mapping.stride());
    for (py, line) in (0u32..).zip(rows) {
        fill_row(line, py, &converter, mapping.iteration_depth, coloring);
    }
    Ok(())
}

// Make an Image and fill it with a mandelbrot image, according to the parameters.
pub fn make_mandel_image(mapping: &Mapping, coloring: &dyn ColorFromMandel) -> Result<Image> {
    let size = mapping.validate()?;
    let mut data = vec![0; size];
    fill_mandel_image(&mut data, mapping, coloring)?;
    Ok(Image::new(data, mapping.width, mapping.height))
}
