//! SVG document writer.
//!
//! One Inkscape layer per threshold inside a single group that maps image
//! pixels onto the page. Stroke widths are given in millimetres and divided
//! by the page scale so they come out at the requested size.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use std::fmt::Write;

use kurbo::Point;

use crate::clip::PlotShape;
use crate::config::{PlotConfig, RenderMode};
use crate::error::TraceError;
use crate::page::{format_mm, PageLayout};
use crate::{ThresholdLayer, TraceResult};

const CLIP_ID: &str = "clip1";

/// Fill colours for the threshold layers and the background.
///
/// The k-th threshold in ascending order is filled with colour k, the
/// background with colour n for n thresholds. Lists shorter than that are
/// reused cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<String>,
    threshold_count: usize,
}

impl Palette {
    /// Parse `rrggbb`, `c1,c2,...`, or the gradient `c1-c2` which spreads
    /// `threshold_count + 1` colours evenly from `c1` to `c2`.
    pub fn parse(spec: &str, threshold_count: usize) -> Result<Self, TraceError> {
        let spec = spec.trim().to_ascii_lowercase();
        let invalid = || TraceError::InvalidColours(spec.clone());

        let colours = if let Some((from, to)) = spec.split_once('-') {
            if !is_hex_colour(from) || !is_hex_colour(to) {
                return Err(invalid());
            }
            gradient(from, to, threshold_count + 1)?
        } else {
            let list: Vec<String> = spec.split(',').map(str::to_string).collect();
            if !list.iter().all(|c| is_hex_colour(c)) {
                return Err(invalid());
            }
            if list.len() == 1 {
                vec![list[0].clone(), list[0].clone()]
            } else {
                list
            }
        };

        Ok(Self {
            colours,
            threshold_count,
        })
    }

    pub fn colours(&self) -> &[String] {
        &self.colours
    }

    /// Colour for the k-th threshold in ascending order.
    pub fn layer(&self, k: usize) -> &str {
        &self.colours[k % self.colours.len()]
    }

    pub fn background(&self) -> &str {
        self.layer(self.threshold_count)
    }
}

fn is_hex_colour(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn channels(hex: &str) -> Result<[i64; 3], TraceError> {
    let mut rgb = [0i64; 3];
    for (i, c) in rgb.iter_mut().enumerate() {
        let byte = hex.get(2 * i..2 * i + 2).unwrap_or_default();
        *c = i64::from_str_radix(byte, 16).map_err(|_| TraceError::InvalidColours(hex.to_string()))?;
    }
    Ok(rgb)
}

/// `count` colours from `from` to `to`, each channel stepped linearly and
/// rounded half away from zero.
fn gradient(from: &str, to: &str, count: usize) -> Result<Vec<String>, TraceError> {
    let start = channels(from)?;
    let end = channels(to)?;
    let mut colours = vec![from.to_string()];
    let steps = count.saturating_sub(1).max(1) as f64;
    for i in 1..count.saturating_sub(1) {
        let mut hex = String::with_capacity(6);
        for (c0, c1) in start.iter().zip(&end) {
            let step = (c1 - c0) as f64 / steps;
            let value = (c0 + (i as f64 * step).round() as i64).clamp(0, 255);
            let _ = write!(hex, "{:02x}", value);
        }
        colours.push(hex);
    }
    colours.push(to.to_string());
    Ok(colours)
}

/// Free-text parts of the document.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Output file name, recorded in a leading comment.
    pub filename: Option<&'a str>,
    /// Human-readable option summary, recorded in a leading comment.
    pub options: Option<&'a str>,
    /// Reference for the background `<image>`, usually the input file name.
    pub image_href: Option<&'a str>,
}

/// Escape the five XML special characters for attribute values.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Comments can't contain `--`.
fn comment_safe(input: &str) -> String {
    input.replace("--", "- -")
}

/// Per-threshold report lines in ascending threshold order, then the total.
/// Lengths are metres on the page.
pub fn summary_lines(result: &TraceResult, layout: &PageLayout) -> Vec<String> {
    let mut layers: Vec<&ThresholdLayer> = result.layers.iter().collect();
    layers.sort_by_key(|layer| layer.threshold);
    let mut lines: Vec<String> = layers
        .iter()
        .map(|layer| {
            format!(
                "{} contours found at threshold {}, with length {:.2}m",
                layer.contour_count,
                layer.threshold,
                layout.metres(layer.length)
            )
        })
        .collect();
    lines.push(format!(
        "Total contour length: {:.2}m",
        layout.metres(result.total_length)
    ));
    lines
}

/// Running element ids; each element kind counts separately.
#[derive(Debug, Default)]
struct IdCounters {
    polygon: usize,
    polyline: usize,
    path: usize,
}

fn next(counter: &mut usize) -> usize {
    let id = *counter;
    *counter += 1;
    id
}

fn write_points(out: &mut String, points: &[Point]) {
    for p in points {
        let _ = write!(out, "{:.2},{:.2} ", p.x, p.y);
    }
}

fn open_layer(out: &mut String, label: &str, fill: Option<&str>) {
    let fill = fill.map(|c| format!(" fill=\"#{}\"", c)).unwrap_or_default();
    let _ = writeln!(
        out,
        r#"<g inkscape:groupmode="layer" inkscape:label="{}" stroke="black"{} >"#,
        label, fill
    );
}

fn write_broken_shapes(out: &mut String, shapes: &[PlotShape], ids: &mut IdCounters) {
    for shape in shapes {
        match shape {
            PlotShape::Polygon(c) => {
                let _ = write!(out, r#"<polygon id="{}" points=""#, next(&mut ids.polygon));
                write_points(out, c.points());
            }
            PlotShape::Polyline(c) => {
                let _ = write!(out, r#"<polyline id="{}" points=""#, next(&mut ids.polyline));
                write_points(out, c.points());
            }
        }
        let _ = writeln!(out, r#"" />"#);
    }
}

/// All of a layer's contours as subpaths of one clipped path.
fn write_clipped_path(out: &mut String, shapes: &[PlotShape], ids: &mut IdCounters) {
    if shapes.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<path id="{}" clip-path="url(#{})" d=""#,
        next(&mut ids.path),
        CLIP_ID
    );
    for shape in shapes {
        let mut cmd = "M";
        for p in shape.contour().points() {
            let _ = write!(out, "{} {:.2},{:.2} ", cmd, p.x, p.y);
            cmd = "L";
        }
        out.push_str("Z ");
    }
    let _ = writeln!(out, r#"" />"#);
}

/// Render a traced image as an SVG document laid out on `plot.paper`.
pub fn to_svg(
    result: &TraceResult,
    plot: &PlotConfig,
    metadata: &SvgMetadata<'_>,
) -> Result<String, TraceError> {
    plot.paper.check_margin(plot.margin)?;
    let palette = plot
        .colours
        .as_deref()
        .map(|spec| Palette::parse(spec, result.layers.len()))
        .transpose()?;
    let (width, height) = (f64::from(result.width), f64::from(result.height));
    let layout = PageLayout::fit(
        (result.width, result.height),
        plot.margin,
        &plot.paper,
        plot.frame_width,
    );
    let clipped = result.render_mode == RenderMode::Clipped;
    let paper_w = format_mm(plot.paper.width);
    let paper_h = format_mm(plot.paper.height);

    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    if let Some(name) = metadata.filename {
        let _ = writeln!(
            out,
            "<!-- {}, created by lumatrace version {} -->",
            comment_safe(name),
            env!("CARGO_PKG_VERSION")
        );
    }
    if let Some(options) = metadata.options {
        let _ = writeln!(out, "<!-- Options used: {} -->", comment_safe(options));
    }
    let _ = writeln!(
        out,
        concat!(
            r#"<svg width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}" style="background-color:white" "#,
            r#"xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" >"#
        ),
        w = paper_w,
        h = paper_h,
    );

    if plot.debug {
        let _ = writeln!(
            out,
            r#"<rect id="papersize" width="{}" height="{}" stroke="blue" stroke-dasharray="4" fill="none"/>"#,
            paper_w, paper_h
        );
        let _ = writeln!(
            out,
            r#"<rect id="plotsize" width="{}" height="{}" x="{}" y="{}" stroke="green" stroke-dasharray="3" fill="none"/>"#,
            format_mm(width * layout.scale),
            format_mm(height * layout.scale),
            format_mm(layout.translate.x),
            format_mm(layout.translate.y)
        );
    }

    let _ = writeln!(
        out,
        concat!(
            r#"<g stroke="black" stroke-width="{:.4}" stroke-linecap="round" stroke-linejoin="round" fill="none" "#,
            r#"transform="translate({:.4},{:.4}) scale({:.4})">"#
        ),
        plot.line_width / layout.scale,
        layout.translate.x,
        layout.translate.y,
        layout.scale
    );

    // half a line width, in image units, trimmed off each side of the clip
    let clippage = if clipped {
        plot.line_width / 2.0 / layout.scale
    } else {
        0.0
    };
    if clipped {
        let _ = writeln!(
            out,
            r#"<defs><clipPath id="{}" ><rect id="cliprect" width="{:.4}" height="{:.4}" x="{:.4}" y="{:.4}" /></clipPath></defs>"#,
            CLIP_ID,
            width - 2.0 * clippage,
            height - 2.0 * clippage,
            clippage,
            clippage
        );
    }

    open_layer(&mut out, "0 background", palette.as_ref().map(Palette::background));
    if let Some(href) = metadata.image_href.filter(|_| plot.background_image) {
        let clip = if clipped {
            format!(r#" clip-path="url(#{})""#, CLIP_ID)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            r#"<image id="background" href="{}" width="{}" height="{}"{} />"#,
            xml_escape(href),
            result.width,
            result.height,
            clip
        );
    }
    if palette.is_some() {
        let _ = writeln!(
            out,
            r#"<rect id="plotsize" width="{}" height="{}" stroke="none" />"#,
            result.width, result.height
        );
    }
    if plot.frame_width > 0.0 {
        // the frame sits just outside the image
        let stroke = plot.frame_width / layout.scale;
        let mut w = width + stroke;
        let mut h = height + stroke;
        let mut x = -stroke / 2.0;
        let mut y = -stroke / 2.0;
        if clipped {
            w -= 2.0 * clippage;
            h -= 2.0 * clippage;
            x += clippage;
            y += clippage;
        }
        let _ = writeln!(
            out,
            r#"<rect id="frame" width="{:.4}" height="{:.4}" x="{:.4}" y="{:.4}" stroke-width="{:.4}" />"#,
            w, h, x, y, stroke
        );
    }
    let _ = writeln!(out, "</g>");

    let mut ids = IdCounters::default();
    for layer in &result.layers {
        let rank = result
            .layers
            .iter()
            .filter(|other| other.threshold < layer.threshold)
            .count();
        open_layer(
            &mut out,
            &format!("{} contour", layer.threshold),
            palette.as_ref().map(|p| p.layer(rank)),
        );
        if clipped {
            write_clipped_path(&mut out, &layer.shapes, &mut ids);
        } else {
            write_broken_shapes(&mut out, &layer.shapes, &mut ids);
        }
        let _ = writeln!(out, "</g>");
    }

    for line in summary_lines(result, &layout) {
        let _ = writeln!(out, "<!-- {} -->", line);
    }
    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</svg>");
    Ok(out)
}
