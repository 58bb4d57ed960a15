//! Raw entry points for the browser loader.
//!
//! The loader instantiates the module without imports and works directly on
//! linear memory: it sizes a buffer, allocates it with [`create_array`],
//! fills it with [`generate`] and wraps the bytes in an `ImageData`.
//!
//! Every allocation handed out is recorded with its length. `generate` only
//! writes through pointers found in that table, and never past the recorded
//! length.

use crate::colorings::ColorInfo;
use crate::error::{Error, Result};
use crate::mandel_image::{fill_mandel_image, Mapping, Region};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Status returned by the exports on success.
pub const STATUS_OK: u32 = 0;

// address -> length of every live allocation
static ARRAYS: Mutex<BTreeMap<usize, usize>> = Mutex::new(BTreeMap::new());

fn arrays() -> MutexGuard<'static, BTreeMap<usize, usize>> {
    // The table is never left half-updated, so a poisoned lock is still usable
    ARRAYS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn status(result: Result<()>) -> u32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(e) => {
            warn!(error = %e, category = e.category(), "rejected call");
            e.code()
        }
    }
}

/// Bytes needed for a `width` x `height` RGBA raster, or 0 when the
/// dimensions are invalid.
#[no_mangle]
pub extern "C" fn image_data_size(width: u32, height: u32) -> u32 {
    crate::image::image_data_size(width, height).unwrap_or_else(|e| {
        warn!(error = %e, "image_data_size");
        0
    })
}

/// Allocate `size` zeroed bytes. Returns null for a size of 0.
///
/// The memory stays valid until it is passed to [`free_array`].
#[no_mangle]
pub extern "C" fn create_array(size: u32) -> *mut u8 {
    if size == 0 {
        return std::ptr::null_mut();
    }
    let boxed = vec![0u8; size as usize].into_boxed_slice();
    let ptr = Box::into_raw(boxed) as *mut u8;
    arrays().insert(ptr as usize, size as usize);
    ptr
}

/// Release memory obtained from [`create_array`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_array(ptr: *mut u8) -> u32 {
    let address = ptr as usize;
    status(match arrays().remove(&address) {
        Some(len) => {
            // SAFETY: the table only holds boxes leaked by create_array, with
            // their exact lengths, and the entry was just removed.
            drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) });
            Ok(())
        }
        None => Err(Error::UnknownBuffer { address }),
    })
}

/// Fill the buffer at `ptr` with the region at the default depth and
/// coloring. Returns 0 on success, otherwise an error code.
#[no_mangle]
pub extern "C" fn generate(
    real_min: f64,
    real_max: f64,
    imag_min: f64,
    imag_max: f64,
    ptr: *mut u8,
    width: u32,
    height: u32,
) -> u32 {
    let region = Region::new(real_min, real_max, imag_min, imag_max);
    let mapping = Mapping::new(region, width, height);
    status(generate_into(ptr, &mapping, 0))
}

/// Like [`generate`], with an explicit iteration depth and coloring index.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn generate_with(
    real_min: f64,
    real_max: f64,
    imag_min: f64,
    imag_max: f64,
    ptr: *mut u8,
    width: u32,
    height: u32,
    iteration_depth: u32,
    coloring: u32,
) -> u32 {
    let region = Region::new(real_min, real_max, imag_min, imag_max);
    let mapping = Mapping::new(region, width, height).with_iteration_depth(iteration_depth);
    status(generate_into(ptr, &mapping, coloring as usize))
}

fn generate_into(ptr: *mut u8, mapping: &Mapping, coloring: usize) -> Result<()> {
    let scheme = ColorInfo::new().scheme(coloring)?;
    // Checked before the table is consulted
    mapping.validate()?;
    let arrays = arrays();
    let address = ptr as usize;
    let len = *arrays
        .get(&address)
        .ok_or(Error::UnknownBuffer { address })?;
    // SAFETY: `ptr` is a live create_array allocation of `len` bytes. The lock
    // is held until the slice is gone, so free_array cannot release it early.
    let data = unsafe { std::slice::from_raw_parts_mut(ptr, len) };
    fill_mandel_image(data, mapping, scheme.as_ref())
}
