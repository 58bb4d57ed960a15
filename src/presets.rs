use crate::error::Result;
use crate::mandel_image::{Mapping, Region};

/// The plane span of the shorter raster side at zoom 0.
const BASE_SPAN: f64 = 4.0;
// The value is chosen such that floating point approximation becomes clear near zoom == 1000
const ZOOM_BASE: f64 = 1.035;

pub struct Preset {
    cx: f64,
    cy: f64,
    zoom: i32,
    iter_depth: u32,
}

impl Preset {
    fn new(cx: f64, cy: f64, zoom: i32, iter_depth: u32) -> Preset {
        Preset {
            cx,
            cy,
            zoom,
            iter_depth,
        }
    }
    pub fn cx(&self) -> f64 {
        self.cx
    }
    pub fn cy(&self) -> f64 {
        self.cy
    }
    pub fn zoom(&self) -> f64 {
        self.zoom as f64
    }
    pub fn iter_depth(&self) -> u32 {
        self.iter_depth
    }
    /// A mapping of this view onto a `width` x `height` raster with square
    /// pixels, centered on (cx, cy).
    pub fn mapping(&self, width: u32, height: u32) -> Result<Mapping> {
        let scale = BASE_SPAN * ZOOM_BASE.powf(-self.zoom()) / width.min(height).max(1) as f64;
        let half_w = scale * width as f64 / 2.0;
        let half_h = scale * height as f64 / 2.0;
        let region = Region::new(
            self.cx - half_w,
            self.cx + half_w,
            self.cy - half_h,
            self.cy + half_h,
        );
        let mapping = Mapping::new(region, width, height).with_iteration_depth(self.iter_depth);
        mapping.validate()?;
        Ok(mapping)
    }
}

pub struct Presets {
    names: Vec<&'static str>,
    values: Vec<Preset>,
}

impl Default for Presets {
    fn default() -> Self {
        Presets::new()
    }
}

impl Presets {
    pub fn new() -> Presets {
        let names = vec!["Initial", "Flamenco", "Spiral"];
        let values = vec![
            Preset::new(0.0, 0.0, 0, 100),
            Preset::new(-1.7665088674631104, 0.04172334239500609, 750, 1000),
            Preset::new(-0.8099833738092991, 0.17004289101216644, 500, 1000),
        ];
        debug_assert_eq!(names.len(), values.len());
        Presets { names, values }
    }
    pub fn names(&self) -> &[&str] {
        self.names.as_slice()
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    pub fn get(&self, i: usize) -> Option<&Preset> {
        self.values.get(i)
    }
    pub fn by_name(&self, name: &str) -> Option<&Preset> {
        let i = self.names.iter().position(|n| *n == name)?;
        self.get(i)
    }
}
