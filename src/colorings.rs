use crate::error::{Error, Result};
use crate::mandel_image::Escape;
use dyn_clone::DynClone;

pub trait ColorFromMandel: DynClone + Sync + Send {
    /// Get a color in 0xRRGGBB format, given the escape result
    /// and the maximum mandelbrot value
    fn get(&self, escape: Escape, max: u32) -> u32;
}

dyn_clone::clone_trait_object!(ColorFromMandel);

fn pack(r: f64, g: f64, b: f64) -> u32 {
    let ch = |c: f64| (u8::MAX as f64 * c) as u8 as u32;
    (ch(r) << 16) | (ch(g) << 8) | ch(b)
}

/// Two-segment HSV ramp: dark blue fading through white to dark yellow.
#[derive(Clone)]
struct Hsv {}

impl ColorFromMandel for Hsv {
    fn get(&self, escape: Escape, max: u32) -> u32 {
        if max <= escape.iterations {
            return 0x000000;
        }
        let n = escape.iterations as f64 / max as f64;
        let (h, s, v) = if n <= 0.5 {
            (240.0, 1.0 - 2.0 * n, 0.25 + 1.5 * n)
        } else {
            (60.0, 2.0 * n - 1.0, 1.75 - 1.5 * n)
        };
        let (r, g, b) = hsv_to_rgb(h, s, v);
        pack(r, g, b)
    }
}

/// Continuous escape value mapped onto a blue to white ramp.
#[derive(Clone)]
struct Smooth {}

impl ColorFromMandel for Smooth {
    fn get(&self, escape: Escape, max: u32) -> u32 {
        if max <= escape.iterations {
            return 0x000000;
        }
        let t = (escape.smooth_value() / max as f64).clamp(0.0, 1.0);
        // sqrt spreads the low counts, where most of the picture lives
        let t = t.sqrt();
        pack(t, t, 0.3 + 0.7 * t)
    }
}

#[derive(Clone)]
struct Rgb18 {}

impl ColorFromMandel for Rgb18 {
    fn get(&self, escape: Escape, max: u32) -> u32 {
        const CYCLE: [u32; 18] = [
            0xff3f3f, 0xff7f3f, 0xffbf3f, 0xffff3f, 0xbfff3f, 0x7fff3f, 0x3fff3f, 0x3fff7f,
            0x3fffbf, 0x3fffff, 0x3fbfff, 0x3f7fff, 0x3f3fff, 0x7f3fff, 0xbf3fff, 0xff3fff,
            0xff3fbf, 0xff3f7f,
        ];
        if max <= escape.iterations {
            return 0x000000;
        }
        CYCLE[(escape.iterations % 18) as usize]
    }
}

#[derive(Clone)]
struct RgbAlternating {}

impl ColorFromMandel for RgbAlternating {
    fn get(&self, escape: Escape, max: u32) -> u32 {
        const CYCLE: [u32; 3] = [0xff0000, 0x00ff00, 0x0000ff];
        if max <= escape.iterations {
            return 0x000000;
        }
        CYCLE[(escape.iterations % 3) as usize]
    }
}

#[derive(Clone)]
struct RedBlack {}

impl ColorFromMandel for RedBlack {
    fn get(&self, escape: Escape, _max: u32) -> u32 {
        if escape.iterations % 2 == 1 {
            0xff0000
        } else {
            0x0
        }
    }
}

/// Convert from HSV colour to RGB colour.
///
/// Input HSV range is ([0,360], [0,1], [0,1]).
/// Output RGB range is ([0,1], [0,1], [0,1]).
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let c = v * s;
    let h1 = h / 60.0;
    let x = c * (1.0 - (h1 % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h1 {
        h1 if h1 < 1.0 => (c, x, 0.0),
        h1 if h1 < 2.0 => (x, c, 0.0),
        h1 if h1 < 3.0 => (0.0, c, x),
        h1 if h1 < 4.0 => (0.0, x, c),
        h1 if h1 < 5.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    (r1 + m, g1 + m, b1 + m)
}

/// Expand 0xRRGGBB into opaque RGBA bytes.
pub fn to_rgba(color: u32) -> [u8; 4] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8, u8::MAX]
}

fn all_color_from_mandels() -> Vec<Box<dyn ColorFromMandel>> {
    vec![
        Box::new(Hsv {}),
        Box::new(Smooth {}),
        Box::new(Rgb18 {}),
        Box::new(RgbAlternating {}),
        Box::new(RedBlack {}),
    ]
}

/// The named coloring schemes. Index 0 is the default.
pub struct ColorInfo {
    names: [&'static str; 5],
    producers: Vec<Box<dyn ColorFromMandel>>,
}

impl Default for ColorInfo {
    fn default() -> Self {
        ColorInfo::new()
    }
}

impl ColorInfo {
    pub fn new() -> ColorInfo {
        let names = ["hsv", "smooth", "rgb18", "rgb", "red-black"];
        let producers = all_color_from_mandels();
        debug_assert_eq!(names.len(), producers.len());
        ColorInfo { names, producers }
    }
    pub fn names_iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    pub fn scheme(&self, i: usize) -> Result<Box<dyn ColorFromMandel>> {
        self.producers
            .get(i)
            .cloned()
            .ok_or_else(|| Error::UnknownColoring(i.to_string()))
    }
    pub fn by_name(&self, name: &str) -> Result<Box<dyn ColorFromMandel>> {
        match self.names.iter().position(|n| *n == name) {
            Some(i) => self.scheme(i),
            None => Err(Error::UnknownColoring(name.to_string())),
        }
    }
    pub fn default_scheme(&self) -> Box<dyn ColorFromMandel> {
        self.producers[0].clone()
    }
}
