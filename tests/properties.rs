//! Property-based tests for the renderer.
//!
//! Run with: cargo test --test properties

use proptest::prelude::*;

use wasm_mandelbrot::colorings::ColorInfo;
use wasm_mandelbrot::mandel_image::{mandel_value, Mapping, PixelToPlane};
use wasm_mandelbrot::{fill_mandel_image, image_data_size, make_mandel_image, Error, Region};

/// Strategy for valid regions around the interesting part of the plane.
fn region_strategy() -> impl Strategy<Value = Region> {
    (-2.5f64..0.5, 0.01f64..3.0, -1.5f64..1.0, 0.01f64..3.0)
        .prop_map(|(re, w, im, h)| Region::new(re, re + w, im, im + h))
}

/// Strategy for small rasters.
fn raster_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..48, 1u32..48)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 100,
        ..ProptestConfig::default()
    })]

    /// Property: buffer size is four bytes per pixel.
    #[test]
    fn prop_size_formula(w in 1u32..4096, h in 1u32..4096) {
        prop_assert_eq!(image_data_size(w, h), Ok(w * h * 4));
    }

    /// Property: a zero dimension is always rejected.
    #[test]
    fn prop_zero_dimension(n in 0u32..100_000) {
        prop_assert!(
            matches!(image_data_size(0, n), Err(Error::InvalidDimension { .. })),
            "width 0 accepted with height {}",
            n
        );
        prop_assert!(
            matches!(image_data_size(n, 0), Err(Error::InvalidDimension { .. })),
            "height 0 accepted with width {}",
            n
        );
    }

    /// Property: every pixel is opaque and lands at (y*w+x)*4.
    #[test]
    fn prop_row_major_and_opaque(
        region in region_strategy(),
        (w, h) in raster_strategy(),
        x_frac in 0.0f64..1.0,
        y_frac in 0.0f64..1.0,
    ) {
        let scheme = ColorInfo::new().default_scheme();
        let m = Mapping::new(region, w, h).with_iteration_depth(64);
        let img = make_mandel_image(&m, scheme.as_ref()).unwrap();
        prop_assert!(img.data().chunks_exact(4).all(|p| p[3] == 255));

        let x = ((w as f64 * x_frac) as u32).min(w - 1);
        let y = ((h as f64 * y_frac) as u32).min(h - 1);
        let (cx, cy) = PixelToPlane::from_mapping(&m).cvt(x, y);
        let color = scheme.get(mandel_value(cx, cy, 64), 64);
        let offset = ((y * w + x) * 4) as usize;
        let expected = [(color >> 16) as u8, (color >> 8) as u8, color as u8, 255];
        prop_assert_eq!(&img.data()[offset..offset + 4], &expected[..]);
    }

    /// Property: identical arguments give identical bytes.
    #[test]
    fn prop_deterministic(region in region_strategy(), (w, h) in raster_strategy()) {
        let scheme = ColorInfo::new().by_name("smooth").unwrap();
        let m = Mapping::new(region, w, h);
        let mut a = vec![0u8; (w * h * 4) as usize];
        let mut b = vec![1u8; (w * h * 4) as usize];
        fill_mandel_image(&mut a, &m, scheme.as_ref()).unwrap();
        fill_mandel_image(&mut b, &m, scheme.as_ref()).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: swapped bounds fail and leave the buffer untouched.
    #[test]
    fn prop_inverted_region_writes_nothing(region in region_strategy(), swap_real in any::<bool>()) {
        let bad = if swap_real {
            Region::new(region.real_max, region.real_min, region.imag_min, region.imag_max)
        } else {
            Region::new(region.real_min, region.real_max, region.imag_max, region.imag_min)
        };
        let scheme = ColorInfo::new().default_scheme();
        let mut data = vec![9u8; 64];
        let res = fill_mandel_image(&mut data, &Mapping::new(bad, 4, 4), scheme.as_ref());
        prop_assert!(matches!(res, Err(Error::InvalidRegion { .. })), "unexpected result: {:?}", res);
        prop_assert!(data.iter().all(|&b| b == 9));
    }

    /// Property: the escape count never exceeds the depth and is at least one.
    #[test]
    fn prop_escape_bounded(re in -3.0f64..3.0, im in -3.0f64..3.0, depth in 1u32..500) {
        let e = mandel_value(re, im, depth);
        prop_assert!(e.iterations >= 1 && e.iterations <= depth);
        if e.iterations < depth {
            prop_assert!(e.norm_sqr > 4.0);
        }
    }
}

#[test]
fn doubling_the_raster_keeps_the_picture() {
    // The fraction of in-set pixels estimates the same area at both sizes
    let scheme = ColorInfo::new().default_scheme();
    let in_set = |w: u32, h: u32| {
        let m = Mapping::new(Region::LOADER_VIEW, w, h).with_iteration_depth(100);
        let img = make_mandel_image(&m, scheme.as_ref()).unwrap();
        let black = img
            .data()
            .chunks_exact(4)
            .filter(|p| p[..3] == [0, 0, 0])
            .count();
        black as f64 / (w * h) as f64
    };
    let small = in_set(100, 100);
    let large = in_set(200, 200);
    assert!(small > 0.1 && small < 0.3, "small fraction {small}");
    assert!((small - large).abs() / large < 0.1, "{small} vs {large}");
}

#[test]
fn doubled_raster_keeps_escape_behavior() {
    // The doubled raster is shifted by a quarter of a small pixel, so its
    // pixel (2x, 2y) is centered on the same plane point as pixel (x, y) of
    // the small raster.
    let (w, h) = (60u32, 40u32);
    let r = Region::LOADER_VIEW;
    let dx = (r.real_max - r.real_min) / w as f64;
    let dy = (r.imag_max - r.imag_min) / h as f64;
    let shifted = Region::new(
        r.real_min + 0.25 * dx,
        r.real_max + 0.25 * dx,
        r.imag_min + 0.25 * dy,
        r.imag_max + 0.25 * dy,
    );
    let scheme = ColorInfo::new().default_scheme();
    let small = make_mandel_image(&Mapping::new(r, w, h), scheme.as_ref()).unwrap();
    let large = make_mandel_image(&Mapping::new(shifted, 2 * w, 2 * h), scheme.as_ref()).unwrap();

    let mut same = 0;
    for y in 0..h {
        for x in 0..w {
            if small.pixel(x, y) == large.pixel(2 * x, 2 * y) {
                same += 1;
            }
        }
    }
    let total = w * h;
    // Rounding may flip a few points right on the boundary
    assert!(same * 100 >= total * 99, "{same} of {total} pixels agree");

    // The center of the view is inside the set at both sizes
    assert_eq!(small.pixel(w / 2, h / 2), Some([0, 0, 0, 255]));
    assert_eq!(large.pixel(w, h), Some([0, 0, 0, 255]));
}
