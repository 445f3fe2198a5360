//! Render stage: scene model plus the plotters back-end that paints it to **SVG** or **PNG**.
//!
//! - [`scene`]: retained primitives with enter transitions and hover states
//! - [`axis`], [`legend`]: axis, grid and legend primitives shared by every chart
//! - [`curve`]: monotone-X paths, partial reveal and dash splitting
//! - Locale-aware tick labels (`12,500` vs `12.500`)
//!
//! Static files always show the settled scene (transitions complete, nothing hovered).

pub mod axis;
pub mod curve;
pub mod legend;
pub mod scene;
pub mod text;
pub mod transition;
pub mod types;
pub mod util;

pub use scene::{Datum, Mark, Placement, Point, Primitive, Role, Scene, TooltipContent};
pub use transition::{Easing, Effect, Transition};
pub use types::{ImageFormat, LegendLayout, Margin, PlotArea};

use crate::error::DashboardError;
use anyhow::{Result, anyhow};
use log::{debug, info, warn};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::OnceLock;

/// Well-known TrueType locations tried for the bitmap back-end's "sans-serif" family.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// One-time registration of a "sans-serif" font for the `ab_glyph` text path.
/// `ab_glyph` doesn't discover OS fonts, so the bitmap back-end draws text only when this succeeds.
static FONT_READY: OnceLock<bool> = OnceLock::new();

fn ensure_fonts_registered() -> bool {
    *FONT_READY.get_or_init(|| {
        for path in FONT_CANDIDATES {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            // ab_glyph keeps the bytes for the lifetime of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            let registered = [
                FontStyle::Normal,
                FontStyle::Bold,
                FontStyle::Italic,
                FontStyle::Oblique,
            ]
            .into_iter()
            .all(|style| plotters::style::register_font("sans-serif", style, bytes).is_ok());
            if registered {
                debug!("registered sans-serif font from {path}");
                return true;
            }
        }
        warn!("no TrueType font found; PNG output will be drawn without text");
        false
    })
}

fn rgb(c: crate::color::Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn px(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn stroke_px(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

/// Paint marks onto a drawing area, in order. Text is skipped when `with_text` is false.
pub fn draw_marks<DB>(area: &DrawingArea<DB, Shift>, marks: &[Mark], with_text: bool) -> Result<()>
where
    DB: DrawingBackend,
{
    for mark in marks {
        if mark.opacity() <= 0.0 {
            continue;
        }
        match mark {
            Mark::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
                opacity,
                ..
            } => {
                let corners = [
                    px(Point::new(*x, *y)),
                    px(Point::new(x + width, y + height)),
                ];
                area.draw(&Rectangle::new(corners, rgb(*fill).mix(*opacity).filled()))
                    .map_err(|e| anyhow!("{:?}", e))?;
                if let Some(s) = stroke {
                    area.draw(&Rectangle::new(
                        corners,
                        rgb(s.color).mix(*opacity).stroke_width(stroke_px(s.width)),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
            Mark::Path {
                points,
                stroke,
                opacity,
            } => {
                let runs = match stroke.dash {
                    Some((dash, gap)) => curve::dashes(points, dash, gap),
                    None => vec![points.clone()],
                };
                let style = rgb(stroke.color)
                    .mix(*opacity)
                    .stroke_width(stroke_px(stroke.width));
                for run in runs.iter().filter(|r| r.len() > 1) {
                    let coords: Vec<(i32, i32)> = run.iter().map(|p| px(*p)).collect();
                    area.draw(&PathElement::new(coords, style))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
            Mark::Circle {
                center,
                radius,
                fill,
                stroke,
                opacity,
            } => {
                let r = radius.round() as i32;
                if r <= 0 {
                    continue;
                }
                if let Some(f) = fill {
                    area.draw(&Circle::new(px(*center), r, rgb(*f).mix(*opacity).filled()))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
                if let Some(s) = stroke {
                    area.draw(&Circle::new(
                        px(*center),
                        r,
                        rgb(s.color).mix(*opacity).stroke_width(stroke_px(s.width)),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
            Mark::Text {
                at,
                text,
                style,
                opacity,
            } => {
                if !with_text || text.is_empty() {
                    continue;
                }
                let h = match style.anchor {
                    scene::Anchor::Start => HPos::Left,
                    scene::Anchor::Middle => HPos::Center,
                    scene::Anchor::End => HPos::Right,
                };
                let mut font = ("sans-serif", style.size).into_font();
                if style.bold {
                    font = font.style(FontStyle::Bold);
                } else if style.italic {
                    font = font.style(FontStyle::Italic);
                }
                if style.vertical {
                    font = font.transform(FontTransform::Rotate270);
                }
                let text_style = font
                    .color(&rgb(style.color).mix(*opacity))
                    .pos(Pos::new(h, VPos::Bottom));
                area.draw(&Text::new(text.clone(), px(*at), text_style))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }
    Ok(())
}

fn paint<DB>(root: &DrawingArea<DB, Shift>, scene: &Scene, with_text: bool) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    draw_marks(root, &scene.settled(), with_text)?;
    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Write the settled scene to `out_path`; the extension (`svg` or `png`) picks the back-end.
pub fn render_to_file<P: AsRef<Path>>(scene: &Scene, out_path: P) -> Result<()> {
    let out_path = out_path.as_ref();
    let ext = out_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let format = ImageFormat::from_extension(ext)
        .ok_or_else(|| DashboardError::UnsupportedImageFormat(ext.to_string()))?;
    if scene.width == 0 || scene.height == 0 {
        return Err(anyhow!("cannot render a {}x{} surface", scene.width, scene.height));
    }
    let size = (scene.width, scene.height);
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(out_path, size).into_drawing_area();
            paint(&root, scene, true)?;
        }
        ImageFormat::Png => {
            let with_text = ensure_fonts_registered();
            let root = BitMapBackend::new(out_path, size).into_drawing_area();
            paint(&root, scene, with_text)?;
        }
    }
    info!("wrote {}", out_path.display());
    Ok(())
}

/// The settled scene as an SVG document.
pub fn render_svg_string(scene: &Scene) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (scene.width.max(1), scene.height.max(1)))
            .into_drawing_area();
        paint(&root, scene, true)?;
    }
    Ok(buf)
}
