//! Mandelbrot renderer for the browser.
//!
//! The crate compiles to a WebAssembly module whose raw exports
//! ([`exports`]) let a JavaScript loader size, allocate and fill an RGBA
//! buffer. The same renderer is usable natively through
//! [`mandel_image::fill_mandel_image`] and the threaded [`producer`].

use colorings::ColorFromMandel;
use mandel_image::Mapping;

pub mod colorings;
pub mod error;
pub mod exports;
pub mod image;
pub mod mandel_image;
pub mod presets;
pub mod producer;

pub use error::{Error, Result};
pub use image::{image_data_size, Image};
pub use mandel_image::{fill_mandel_image, make_mandel_image, Region};

/// A render request for the [`producer`].
pub struct MandelReq {
    pub mapping: Mapping,
    pub coloring: Box<dyn ColorFromMandel>,
}

/// The answer to a [`MandelReq`].
pub struct MandelReply {
    pub mapping: Mapping,
    pub result: Result<Image>,
}
