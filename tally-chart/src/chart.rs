use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use skia_safe as skia;

use crate::axis::Axis;
use crate::grid::{linspace, value_precision};
use crate::text::TextShaper;
use crate::types::{Insets, HEIGHT, WIDTH};

const X_TICKS: usize = 6;
const Y_TICKS: usize = 6;
const TIME_FORMAT: &str = "%m-%d %H:%M";
const TITLE_SIZE: f32 = 16.0;
const LABEL_SIZE: f32 = 13.0;
const TICK_SIZE: f32 = 11.0;
const MARKER_RADIUS: f32 = 4.0;

pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub background: skia::Color,
    /// Tests turn this off to keep output independent of installed fonts.
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            background: skia::Color::WHITE,
            draw_labels: true,
        }
    }
}

/// A single line series over time. Points are (epoch ms, value) and are drawn
/// in the order given.
#[derive(Clone, Debug)]
pub struct Chart {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub points: Vec<(i64, f64)>,
}

impl Chart {
    pub fn new(title: impl Into<String>, x_axis: Axis, y_axis: Axis, points: Vec<(i64, f64)>) -> Self {
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            points,
        }
    }

    /// Render the chart and write it as PNG to `path`, replacing any existing file.
    pub fn render_to_png(&self, opts: &RenderOptions, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.render_to_png_bytes(opts)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Render the chart to PNG bytes using a CPU raster surface.
    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create {}x{} raster surface", opts.width, opts.height))?;
        let canvas = surface.canvas();
        canvas.clear(opts.background);

        let plot = Plot::new(opts, &self.x_axis, &self.y_axis);
        let x_ticks = linspace(self.x_axis.min, self.x_axis.max, X_TICKS);
        let y_ticks = linspace(self.y_axis.min, self.y_axis.max, Y_TICKS);

        draw_grid(canvas, &plot, &x_ticks, &y_ticks);
        draw_axes(canvas, &plot);
        draw_series(canvas, &plot, &self.points);

        if opts.draw_labels {
            let text = TextShaper::new();
            self.draw_labels(canvas, &text, opts, &plot, &x_ticks, &y_ticks);
        }

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    fn draw_labels(
        &self,
        canvas: &skia::Canvas,
        text: &TextShaper,
        opts: &RenderOptions,
        plot: &Plot,
        x_ticks: &[f64],
        y_ticks: &[f64],
    ) {
        let ink = skia::Color::from_rgb(40, 40, 40);

        for &x in x_ticks {
            text.draw_centered(canvas, &time_label(x), plot.sx(x), plot.b + 6.0, TICK_SIZE, ink);
        }

        let step = y_ticks.get(1).zip(y_ticks.first()).map(|(b, a)| b - a).unwrap_or(0.0);
        let precision = value_precision(step);
        for &y in y_ticks {
            let label = format!("{y:.precision$}");
            text.draw_right(canvas, &label, plot.l - 6.0, plot.sy(y), TICK_SIZE, ink);
        }

        let cx = (plot.l + plot.r) / 2.0;
        text.draw_centered(canvas, &self.title, cx, 12.0, TITLE_SIZE, ink);
        text.draw_centered(canvas, &self.x_axis.label, cx, opts.height as f32 - 26.0, LABEL_SIZE, ink);
        text.draw_vertical(canvas, &self.y_axis.label, 18.0, (plot.t + plot.b) / 2.0, LABEL_SIZE, ink);
    }
}

fn time_label(ms: f64) -> String {
    Local
        .timestamp_millis_opt(ms.round() as i64)
        .single()
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Plot rectangle plus the data-to-pixel transform.
struct Plot<'a> {
    l: f32,
    t: f32,
    r: f32,
    b: f32,
    x: &'a Axis,
    y: &'a Axis,
}

impl<'a> Plot<'a> {
    fn new(opts: &RenderOptions, x: &'a Axis, y: &'a Axis) -> Self {
        Self {
            l: opts.insets.left as f32,
            t: opts.insets.top as f32,
            r: (opts.width - opts.insets.right as i32) as f32,
            b: (opts.height - opts.insets.bottom as i32) as f32,
            x,
            y,
        }
    }

    fn sx(&self, x: f64) -> f32 {
        self.l + ((x - self.x.min) / self.x.span()) as f32 * (self.r - self.l)
    }

    fn sy(&self, y: f64) -> f32 {
        self.b - ((y - self.y.min) / self.y.span()) as f32 * (self.b - self.t)
    }
}

fn draw_grid(canvas: &skia::Canvas, plot: &Plot, x_ticks: &[f64], y_ticks: &[f64]) {
    let mut paint = skia::Paint::default();
    paint.set_color(skia::Color::from_rgb(222, 222, 222));
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);

    for &x in x_ticks {
        let px = plot.sx(x);
        canvas.draw_line((px, plot.t), (px, plot.b), &paint);
    }
    for &y in y_ticks {
        let py = plot.sy(y);
        canvas.draw_line((plot.l, py), (plot.r, py), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, plot: &Plot) {
    let mut paint = skia::Paint::default();
    paint.set_color(skia::Color::from_rgb(60, 60, 60));
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(1.0);

    canvas.draw_rect(skia::Rect::from_ltrb(plot.l, plot.t, plot.r, plot.b), &paint);
}

fn draw_series(canvas: &skia::Canvas, plot: &Plot, points: &[(i64, f64)]) {
    let color = skia::Color::from_rgb(31, 119, 180);

    if points.len() >= 2 {
        let mut path = skia::Path::new();
        let (x0, y0) = points[0];
        path.move_to((plot.sx(x0 as f64), plot.sy(y0)));
        for &(x, y) in points.iter().skip(1) {
            path.line_to((plot.sx(x as f64), plot.sy(y)));
        }

        let mut stroke = skia::Paint::default();
        stroke.set_anti_alias(true);
        stroke.set_style(skia::paint::Style::Stroke);
        stroke.set_stroke_width(1.5);
        stroke.set_color(color);
        canvas.draw_path(&path, &stroke);
    }

    let mut marker = skia::Paint::default();
    marker.set_anti_alias(true);
    marker.set_style(skia::paint::Style::Fill);
    marker.set_color(color);
    for &(x, y) in points {
        canvas.draw_circle((plot.sx(x as f64), plot.sy(y)), MARKER_RADIUS, &marker);
    }
}
