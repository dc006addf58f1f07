//! Share image rendering.
//!
//! Turns a verse and its reference into a 1080x1920 portrait PNG using one of the
//! fixed [`ShareTemplate`] recipes. All drawing state lives inside the render call;
//! callers only see the finished bytes or data URI.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error, trace};
use rand::Rng;
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Point, Rect, SpreadMode, Stroke, Transform,
};

use crate::{wrap_text, FontSpec, JournalError, Result, ShareTemplate, Typesetter};

/// Output width in pixels
pub const SHARE_WIDTH: u32 = 1080;
/// Output height in pixels
pub const SHARE_HEIGHT: u32 = 1920;

const SPECKLE_COUNT: usize = 5000;

/// Three box passes of this radius approximate a gaussian with sigma 7.5, the
/// softness of a 15px canvas shadow blur.
const SHADOW_BOX_RADIUS: usize = 7;
const SHADOW_BOX_PASSES: usize = 3;

enum Background {
    Flat(Color),
    Gradient(Vec<(f32, Color)>),
    Parchment(Color),
}

struct TextStyle {
    font: FontSpec,
    color: Color,
}

struct Recipe {
    background: Background,
    verse: TextStyle,
    verse_shadow: Option<Color>,
    wrap_width: f32,
    line_pitch: f32,
    reference: TextStyle,
    reference_offset: f32,
    reference_format: fn(&str) -> String,
    branding: &'static str,
    branding_style: TextStyle,
    branding_y: f32,
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color {
    Color::from_rgba8(r, g, b, (a * 255.0).round() as u8)
}

fn gold() -> Color {
    rgb(0xb4, 0x94, 0x2b)
}

fn recipe(template: ShareTemplate) -> Recipe {
    let width = SHARE_WIDTH as f32;
    let height = SHARE_HEIGHT as f32;

    match template {
        ShareTemplate::Minimal => Recipe {
            background: Background::Flat(rgb(0xf7, 0xf5, 0xf0)),
            verse: TextStyle {
                font: FontSpec::serif(400, 80.0),
                color: rgb(0x1c, 0x19, 0x17),
            },
            verse_shadow: None,
            wrap_width: width - 200.0,
            line_pitch: 110.0,
            reference: TextStyle {
                font: FontSpec::serif(500, 40.0).italic(),
                color: rgb(0x57, 0x53, 0x4e),
            },
            reference_offset: 60.0,
            reference_format: |r| r.to_string(),
            branding: "SOULSCRIBE",
            branding_style: TextStyle {
                font: FontSpec::sans(500, 32.0),
                color: rgb(0x1c, 0x19, 0x17),
            },
            branding_y: 120.0,
        },
        ShareTemplate::Atmospheric => Recipe {
            background: Background::Gradient(vec![
                (0.0, rgb(0x0f, 0x17, 0x2a)),
                (0.5, rgb(0x31, 0x2e, 0x81)),
                (1.0, rgb(0xb4, 0x53, 0x09)),
            ]),
            verse: TextStyle {
                font: FontSpec::serif(500, 74.0).italic(),
                color: Color::WHITE,
            },
            verse_shadow: Some(rgba(0, 0, 0, 0.3)),
            wrap_width: width - 300.0,
            line_pitch: 90.0,
            reference: TextStyle {
                font: FontSpec::sans(600, 30.0),
                color: rgba(255, 255, 255, 0.9),
            },
            reference_offset: 80.0,
            reference_format: |r| r.to_uppercase(),
            branding: "SoulScribe App",
            branding_style: TextStyle {
                font: FontSpec::sans(400, 24.0),
                color: rgba(255, 255, 255, 0.5),
            },
            branding_y: height - 100.0,
        },
        ShareTemplate::Classic => Recipe {
            background: Background::Parchment(rgb(0xf5, 0xf5, 0xf4)),
            verse: TextStyle {
                font: FontSpec::serif(600, 70.0),
                color: rgb(0x29, 0x25, 0x24),
            },
            verse_shadow: None,
            wrap_width: width - 260.0,
            line_pitch: 100.0,
            reference: TextStyle {
                font: FontSpec::sans(700, 40.0),
                color: gold(),
            },
            reference_offset: 80.0,
            reference_format: |r| format!("~ {} ~", r),
            branding: "SoulScribe",
            branding_style: TextStyle {
                font: FontSpec::serif(400, 24.0).italic(),
                color: rgb(0xa8, 0xa2, 0x9e),
            },
            branding_y: height - 90.0,
        },
    }
}

/// Renders the share image and returns it as a `data:image/png;base64,...` URI.
pub fn render_share_image(
    verse: &str,
    reference: &str,
    template: ShareTemplate,
    typesetter: &dyn Typesetter,
) -> Result<String> {
    let png = render_share_png(verse, reference, template, typesetter)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Renders the share image as PNG bytes.
///
/// The classic template's paper texture uses the thread RNG, so its output differs
/// between calls. Use [`render_share_png_with_rng`] for reproducible output.
pub fn render_share_png(
    verse: &str,
    reference: &str,
    template: ShareTemplate,
    typesetter: &dyn Typesetter,
) -> Result<Vec<u8>> {
    render_share_png_with_rng(verse, reference, template, typesetter, &mut rand::thread_rng())
}

pub fn render_share_png_with_rng<R: Rng + ?Sized>(
    verse: &str,
    reference: &str,
    template: ShareTemplate,
    typesetter: &dyn Typesetter,
    rng: &mut R,
) -> Result<Vec<u8>> {
    debug!("Rendering {} share image", template);
    let pixmap = render_pixmap(verse, reference, template, typesetter, rng)?;

    pixmap.encode_png().map_err(|e| {
        error!("Failed to encode share image: {}", e);
        JournalError::RenderSurface {
            message: e.to_string(),
        }
    })
}

fn render_pixmap<R: Rng + ?Sized>(
    verse: &str,
    reference: &str,
    template: ShareTemplate,
    typesetter: &dyn Typesetter,
    rng: &mut R,
) -> Result<Pixmap> {
    let mut pixmap =
        Pixmap::new(SHARE_WIDTH, SHARE_HEIGHT).ok_or_else(|| JournalError::RenderSurface {
            message: format!("cannot allocate {}x{} surface", SHARE_WIDTH, SHARE_HEIGHT),
        })?;
    let recipe = recipe(template);
    let width = SHARE_WIDTH as f32;
    let height = SHARE_HEIGHT as f32;
    let center = width / 2.0;

    paint_background(&mut pixmap, &recipe.background, rng);
    if template == ShareTemplate::Atmospheric {
        paint_glass_card(&mut pixmap);
    }

    let lines = wrap_text(verse, recipe.wrap_width, |s| {
        typesetter.measure(&recipe.verse.font, s)
    });
    trace!("Verse wrapped into {} lines", lines.len());

    let first_baseline = (height - lines.len() as f32 * recipe.line_pitch) / 2.0;
    if let Some(shadow) = recipe.verse_shadow {
        paint_verse_shadow(
            &mut pixmap,
            typesetter,
            &recipe.verse.font,
            &lines,
            first_baseline,
            recipe.line_pitch,
            shadow,
        );
    }

    let mut y = first_baseline;
    for line in &lines {
        draw_centered(
            &mut pixmap,
            typesetter,
            &recipe.verse.font,
            line,
            center,
            y,
            recipe.verse.color,
        );
        y += recipe.line_pitch;
    }

    let reference_text = (recipe.reference_format)(reference);
    draw_centered(
        &mut pixmap,
        typesetter,
        &recipe.reference.font,
        &reference_text,
        center,
        y + recipe.reference_offset,
        recipe.reference.color,
    );

    draw_centered(
        &mut pixmap,
        typesetter,
        &recipe.branding_style.font,
        recipe.branding,
        center,
        recipe.branding_y,
        recipe.branding_style.color,
    );

    Ok(pixmap)
}

fn draw_centered(
    pixmap: &mut Pixmap,
    typesetter: &dyn Typesetter,
    font: &FontSpec,
    text: &str,
    center: f32,
    baseline: f32,
    color: Color,
) {
    let x = center - typesetter.measure(font, text) / 2.0;
    typesetter.draw(pixmap, font, text, x, baseline, color);
}

/// Draws the verse lines into a separate layer, blurs it and composites it under
/// where the text will go. The shadow has no offset.
fn paint_verse_shadow(
    pixmap: &mut Pixmap,
    typesetter: &dyn Typesetter,
    font: &FontSpec,
    lines: &[String],
    first_baseline: f32,
    pitch: f32,
    color: Color,
) {
    if lines.is_empty() {
        return;
    }
    let margin = (SHADOW_BOX_RADIUS * SHADOW_BOX_PASSES) as f32;
    let last_baseline = first_baseline + (lines.len() - 1) as f32 * pitch;
    let top = (first_baseline - font.size - margin).floor().max(0.0);
    let bottom = (last_baseline + font.size * 0.5 + margin)
        .ceil()
        .min(pixmap.height() as f32);
    if bottom <= top {
        return;
    }

    let Some(mut layer) = Pixmap::new(pixmap.width(), (bottom - top) as u32) else {
        return;
    };
    let center = pixmap.width() as f32 / 2.0;
    let mut y = first_baseline - top;
    for line in lines {
        draw_centered(&mut layer, typesetter, font, line, center, y, color);
        y += pitch;
    }

    box_blur(&mut layer, SHADOW_BOX_RADIUS, SHADOW_BOX_PASSES);
    pixmap.draw_pixmap(
        0,
        top as i32,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// Blurs all channels of a premultiplied pixmap with repeated box filters.
/// Pixels outside the pixmap count as transparent.
fn box_blur(pixmap: &mut Pixmap, radius: usize, passes: usize) {
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let mut buf: Vec<f32> = pixmap.data().iter().map(|&v| v as f32).collect();
    let mut tmp = vec![0.0; buf.len()];

    for _ in 0..passes {
        box_blur_pass(&buf, &mut tmp, width, height, radius, true);
        box_blur_pass(&tmp, &mut buf, width, height, radius, false);
    }

    for (dst, v) in pixmap.data_mut().iter_mut().zip(&buf) {
        *dst = v.round().clamp(0.0, 255.0) as u8;
    }
}

fn box_blur_pass(
    src: &[f32],
    dst: &mut [f32],
    width: usize,
    height: usize,
    radius: usize,
    horizontal: bool,
) {
    let (lines, len) = if horizontal {
        (height, width)
    } else {
        (width, height)
    };
    let index = |line: usize, i: usize| {
        if horizontal {
            (line * width + i) * 4
        } else {
            (i * width + line) * 4
        }
    };
    let norm = 1.0 / (2 * radius + 1) as f32;

    for line in 0..lines {
        let mut sum = [0.0f32; 4];
        for i in 0..radius.min(len) {
            let at = index(line, i);
            for (c, s) in sum.iter_mut().enumerate() {
                *s += src[at + c];
            }
        }
        for i in 0..len {
            if i + radius < len {
                let at = index(line, i + radius);
                for (c, s) in sum.iter_mut().enumerate() {
                    *s += src[at + c];
                }
            }
            let at = index(line, i);
            for (c, s) in sum.iter().enumerate() {
                dst[at + c] = s * norm;
            }
            if i >= radius {
                let at = index(line, i - radius);
                for (c, s) in sum.iter_mut().enumerate() {
                    *s -= src[at + c];
                }
            }
        }
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn full_rect() -> Option<Rect> {
    Rect::from_xywh(0.0, 0.0, SHARE_WIDTH as f32, SHARE_HEIGHT as f32)
}

fn paint_background<R: Rng + ?Sized>(pixmap: &mut Pixmap, background: &Background, rng: &mut R) {
    match background {
        Background::Flat(color) => pixmap.fill(*color),
        Background::Gradient(stops) => {
            let stops = stops
                .iter()
                .map(|(pos, color)| GradientStop::new(*pos, *color))
                .collect();
            let shader = LinearGradient::new(
                Point::from_xy(0.0, 0.0),
                Point::from_xy(0.0, SHARE_HEIGHT as f32),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            );
            if let (Some(shader), Some(rect)) = (shader, full_rect()) {
                let paint = Paint {
                    shader,
                    ..Paint::default()
                };
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
        Background::Parchment(color) => {
            pixmap.fill(*color);
            paint_speckles(pixmap, rng);
            paint_gold_border(pixmap);
        }
    }
}

fn paint_speckles<R: Rng + ?Sized>(pixmap: &mut Pixmap, rng: &mut R) {
    let paint = solid(rgba(180, 148, 43, 0.05));
    let (width, height) = (SHARE_WIDTH as f32, SHARE_HEIGHT as f32);
    for _ in 0..SPECKLE_COUNT {
        let x = rng.gen_range(0.0..width);
        let y = rng.gen_range(0.0..height);
        if let Some(rect) = Rect::from_xywh(x, y, 2.0, 2.0) {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}

fn paint_gold_border(pixmap: &mut Pixmap) {
    let paint = solid(gold());
    let (width, height) = (SHARE_WIDTH as f32, SHARE_HEIGHT as f32);

    for (inset, stroke_width) in [(60.0, 3.0), (80.0, 1.0)] {
        let rect = Rect::from_xywh(inset, inset, width - 2.0 * inset, height - 2.0 * inset);
        if let Some(rect) = rect {
            let path = PathBuilder::from_rect(rect);
            let stroke = Stroke {
                width: stroke_width,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

fn paint_glass_card(pixmap: &mut Pixmap) {
    let (width, height) = (SHARE_WIDTH as f32, SHARE_HEIGHT as f32);
    let Some(card) = rounded_rect(100.0, height / 2.0 - 400.0, width - 200.0, 800.0, 40.0) else {
        return;
    };

    pixmap.fill_path(
        &card,
        &solid(rgba(255, 255, 255, 0.08)),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    let stroke = Stroke {
        width: 2.0,
        ..Stroke::default()
    };
    pixmap.stroke_path(
        &card,
        &solid(rgba(255, 255, 255, 0.15)),
        &stroke,
        Transform::identity(),
        None,
    );
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<Path> {
    let r = r.min(w / 2.0).min(h / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}
