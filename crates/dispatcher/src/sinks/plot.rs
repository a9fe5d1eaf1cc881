//! PlotSink - raw vs. interpolated attitude, one PNG per axis
//!
//! Each image shows the raw attitude samples as a blue polyline and the
//! per-frame interpolated values as an orange polyline with markers, on a
//! light grid. There is no text; the legend is two colour swatches in the
//! top-left corner (blue: raw, orange: interpolated).

use contracts::{Axis, ContractError, DataSink, SyncRun};
use image::{ImageFormat, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

use super::write_atomic;

const MIN_SIDE: u32 = 64;
const MARGIN: u32 = 16;
const GRID_DIVISIONS: u32 = 10;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([228, 228, 228]);
const FRAME: Rgb<u8> = Rgb([110, 110, 110]);
const RAW: Rgb<u8> = Rgb([31, 119, 180]);
const INTERPOLATED: Rgb<u8> = Rgb([255, 127, 14]);

/// Configuration for PlotSink
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSinkConfig {
    /// Output directory for `roll.png`, `pitch.png`, `yaw.png`
    pub dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotSinkConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("plots"),
            width: 800,
            height: 480,
        }
    }
}

impl PlotSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(dir) = params.get("dir") {
            config.dir = PathBuf::from(dir);
        }
        if let Some(raw) = params.get("width") {
            config.width = parse_side("width", raw)?;
        }
        if let Some(raw) = params.get("height") {
            config.height = parse_side("height", raw)?;
        }
        Ok(config)
    }
}

fn parse_side(key: &str, raw: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(v) if v >= MIN_SIDE => Ok(v),
        _ => Err(format!("{key} must be an integer >= {MIN_SIDE}, got '{raw}'")),
    }
}

/// Linear map from data range to pixel range
#[derive(Debug, Clone, Copy)]
struct Scale {
    lo: f64,
    hi: f64,
    px_lo: f64,
    px_hi: f64,
}

impl Scale {
    fn new(lo: f64, hi: f64, px_lo: f64, px_hi: f64) -> Self {
        let (lo, hi) = if hi - lo > f64::EPSILON * hi.abs().max(1.0) {
            (lo, hi)
        } else {
            (lo - 0.5, hi + 0.5)
        };
        Self {
            lo,
            hi,
            px_lo,
            px_hi,
        }
    }

    fn map(&self, v: f64) -> i64 {
        let frac = (v - self.lo) / (self.hi - self.lo);
        frac.mul_add(self.px_hi - self.px_lo, self.px_lo).round() as i64
    }
}

fn finite_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            put(img, x, y, color);
        }
    }
}

/// Render one axis: raw samples against interpolated frame values
pub fn render_axis(run: &SyncRun, axis: Axis, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let left = MARGIN as i64;
    let top = MARGIN as i64;
    let right = width.saturating_sub(MARGIN + 1) as i64;
    let bottom = height.saturating_sub(MARGIN + 1) as i64;

    for i in 0..=GRID_DIVISIONS as i64 {
        let gx = left + (right - left) * i / GRID_DIVISIONS as i64;
        let gy = top + (bottom - top) * i / GRID_DIVISIONS as i64;
        draw_line(&mut img, (gx, top), (gx, bottom), GRID);
        draw_line(&mut img, (left, gy), (right, gy), GRID);
    }
    draw_line(&mut img, (left, top), (right, top), FRAME);
    draw_line(&mut img, (left, bottom), (right, bottom), FRAME);
    draw_line(&mut img, (left, top), (left, bottom), FRAME);
    draw_line(&mut img, (right, top), (right, bottom), FRAME);

    let raw: Vec<(f64, f64)> = run
        .attitude
        .samples()
        .iter()
        .map(|s| (s.timestamp, s.axis(axis)))
        .collect();
    let interpolated: Vec<(f64, f64)> = run
        .table
        .records
        .iter()
        .map(|r| (r.timestamp, r.axis(axis)))
        .collect();

    let all = || raw.iter().chain(&interpolated);
    let (Some((t_lo, t_hi)), Some((v_lo, v_hi))) = (
        finite_bounds(all().map(|p| p.0)),
        finite_bounds(all().map(|p| p.1)),
    ) else {
        return img;
    };

    let pad = (v_hi - v_lo) * 0.05;
    let xs = Scale::new(t_lo, t_hi, (left + 2) as f64, (right - 2) as f64);
    // Pixel rows grow downwards
    let ys = Scale::new(v_lo - pad, v_hi + pad, (bottom - 2) as f64, (top + 2) as f64);
    // Non-finite points have no pixel; the polyline breaks around them
    let to_px = |&(t, v): &(f64, f64)| {
        (t.is_finite() && v.is_finite()).then(|| (xs.map(t), ys.map(v)))
    };

    let raw_px: Vec<Option<(i64, i64)>> = raw.iter().map(to_px).collect();
    for w in raw_px.windows(2) {
        if let [Some(a), Some(b)] = w {
            draw_line(&mut img, *a, *b, RAW);
        }
    }
    if let [Some(only)] = raw_px.as_slice() {
        fill_rect(&mut img, only.0 - 1, only.1 - 1, only.0 + 1, only.1 + 1, RAW);
    }

    let interp_px: Vec<Option<(i64, i64)>> = interpolated.iter().map(to_px).collect();
    for w in interp_px.windows(2) {
        if let [Some(a), Some(b)] = w {
            draw_line(&mut img, *a, *b, INTERPOLATED);
        }
    }
    for &(x, y) in interp_px.iter().flatten() {
        fill_rect(&mut img, x - 1, y - 1, x + 1, y + 1, INTERPOLATED);
    }

    // Legend
    fill_rect(&mut img, left + 6, top + 6, left + 20, top + 9, RAW);
    fill_rect(&mut img, left + 6, top + 14, left + 20, top + 17, INTERPOLATED);

    img
}

/// Sink that renders comparison plots
pub struct PlotSink {
    name: String,
    config: PlotSinkConfig,
}

impl PlotSink {
    pub fn new(name: impl Into<String>, config: PlotSinkConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, String> {
        Ok(Self::new(name, PlotSinkConfig::from_params(params)?))
    }

    fn save_axis(&self, run: &SyncRun, axis: Axis) -> Result<PathBuf, ContractError> {
        let img = render_axis(run, axis, self.config.width, self.config.height);
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png)
            .map_err(|e| ContractError::sink_write(&self.name, format!("encode {axis}: {e}")))?;

        let path = self.config.dir.join(format!("{axis}.png"));
        write_atomic(&path, png.get_ref()).map_err(|e| {
            ContractError::sink_write(&self.name, format!("cannot write {}: {e}", path.display()))
        })?;
        Ok(path)
    }
}

impl DataSink for PlotSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "plot_sink_write",
        skip(self, run),
        fields(sink = %self.name, records = run.table.len())
    )]
    async fn write(&mut self, run: &SyncRun) -> Result<(), ContractError> {
        if run.table.is_empty() {
            warn!(sink = %self.name, "empty table, plots skipped");
            return Ok(());
        }
        for axis in Axis::ALL {
            let path = self.save_axis(run, axis)?;
            debug!(sink = %self.name, path = %path.display(), "plot written");
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
