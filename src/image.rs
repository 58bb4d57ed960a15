use crate::error::{Error, Result};

/// Bytes per pixel: R, G, B, A.
pub const BYTES_PER_PIXEL: u32 = 4;

/// Number of bytes needed for a `width` x `height` RGBA8 raster.
///
/// Fails when a dimension is zero or when the size does not fit in a `u32`,
/// which is the address width of the wasm target.
pub fn image_data_size(width: u32, height: u32) -> Result<u32> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
        .ok_or(Error::InvalidDimension { width, height })
}

/// An owned RGBA8 raster, row-major, without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Image {
    pub(crate) fn new(data: Vec<u8>, width: u32, height: u32) -> Image {
        debug_assert_eq!(data.len(), (width * height * BYTES_PER_PIXEL) as usize);
        Image {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The four bytes of pixel (x, y), or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize * self.width as usize) + x as usize) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.data[offset..offset + 4]);
        Some(px)
    }
}
