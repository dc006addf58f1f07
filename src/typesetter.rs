//! Font measuring and glyph drawing for the share image renderer.
//!
//! A [`Typesetter`] answers two questions for a given [`FontSpec`]: how wide is this
//! string, and what does it look like on a pixmap. The renderer wraps with the
//! first and paints with the second, so both must agree for the same spec.
//!
//! [`OutlineTypesetter`] rasterizes TrueType/OpenType faces. It either uses the
//! DejaVu faces compiled into the binary (Latin, Cyrillic and Greek coverage) or
//! loads faces from a configured font directory.
use std::{
    fs,
    path::{Path, PathBuf},
};

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use log::{debug, info, warn};
use tiny_skia::{Color, Mask, Paint, Pixmap, Rect, Transform};

use crate::{Config, JournalError, Result};

const SERIF_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSerif.ttf");
const SERIF_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSerif-Bold.ttf");
const SERIF_ITALIC: &[u8] = include_bytes!("../assets/fonts/DejaVuSerif-Italic.ttf");
const SANS_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const SANS_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Typeface family requested by a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Serif,
    Sans,
}

/// A complete font configuration, the equivalent of a CSS font shorthand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub weight: u16,
    /// Pixel size (em height)
    pub size: f32,
    pub italic: bool,
}

impl FontSpec {
    pub const fn serif(weight: u16, size: f32) -> Self {
        FontSpec {
            family: FontFamily::Serif,
            weight,
            size,
            italic: false,
        }
    }

    pub const fn sans(weight: u16, size: f32) -> Self {
        FontSpec {
            family: FontFamily::Sans,
            weight,
            size,
            italic: false,
        }
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

/// Measures and draws single lines of text.
pub trait Typesetter: Send + Sync {
    /// Width of `text` in pixels when set in `font`
    fn measure(&self, font: &FontSpec, text: &str) -> f32;

    /// Draws `text` with its left edge at `x` and its baseline at `baseline`
    fn draw(
        &self,
        pixmap: &mut Pixmap,
        font: &FontSpec,
        text: &str,
        x: f32,
        baseline: f32,
        color: Color,
    );
}

/// Loads faces from the configured font directory, or uses the bundled ones
pub fn typesetter_from_config(config: &Config) -> Result<Box<dyn Typesetter>> {
    match &config.font_dir {
        Some(dir) => {
            info!("Loading share image fonts from {}", dir.display());
            Ok(Box::new(OutlineTypesetter::from_dir(dir)?))
        }
        None => {
            debug!("No font directory configured, using bundled fonts");
            Ok(Box::new(OutlineTypesetter::bundled()?))
        }
    }
}

/// Accumulates glyph coverage for one draw call, then paints it in a single fill.
struct Coverage {
    mask: Mask,
    width: i32,
    height: i32,
    bounds: Option<(i32, i32, i32, i32)>,
}

impl Coverage {
    fn new(pixmap: &Pixmap) -> Option<Self> {
        Some(Coverage {
            mask: Mask::new(pixmap.width(), pixmap.height())?,
            width: pixmap.width() as i32,
            height: pixmap.height() as i32,
            bounds: None,
        })
    }

    fn plot(&mut self, x: i32, y: i32, alpha: u8) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height || alpha == 0 {
            return;
        }
        let idx = (y * self.width + x) as usize;
        let data = self.mask.data_mut();
        data[idx] = data[idx].max(alpha);

        self.bounds = Some(match self.bounds {
            None => (x, y, x + 1, y + 1),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
        });
    }

    fn paint(self, pixmap: &mut Pixmap, color: Color) {
        let Some((l, t, r, b)) = self.bounds else {
            return;
        };
        let Some(rect) = Rect::from_ltrb(l as f32, t as f32, r as f32, b as f32) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        pixmap.fill_rect(rect, &paint, Transform::identity(), Some(&self.mask));
    }
}

/// Faces of one family
struct FaceSet {
    regular: FontArc,
    bold: Option<FontArc>,
    italic: Option<FontArc>,
}

impl FaceSet {
    fn pick(&self, font: &FontSpec) -> &FontArc {
        let preferred = if font.italic {
            self.italic.as_ref()
        } else if font.is_bold() {
            self.bold.as_ref()
        } else {
            None
        };
        preferred.unwrap_or(&self.regular)
    }
}

fn bundled_face(name: &str, bytes: &'static [u8]) -> Result<FontArc> {
    FontArc::try_from_slice(bytes).map_err(|e| JournalError::Font {
        message: format!("bundled {}: {}", name, e),
    })
}

/// Anti-aliased outline fonts.
///
/// A font directory must hold `serif-regular` and `sans-regular` faces (`.ttf` or
/// `.otf`); the `-bold` and `-italic` variants are optional and fall back to the
/// regular face.
pub struct OutlineTypesetter {
    serif: FaceSet,
    sans: FaceSet,
}

impl OutlineTypesetter {
    /// The DejaVu faces shipped inside the binary
    pub fn bundled() -> Result<Self> {
        Ok(OutlineTypesetter {
            serif: FaceSet {
                regular: bundled_face("DejaVuSerif", SERIF_REGULAR)?,
                bold: Some(bundled_face("DejaVuSerif-Bold", SERIF_BOLD)?),
                italic: Some(bundled_face("DejaVuSerif-Italic", SERIF_ITALIC)?),
            },
            sans: FaceSet {
                regular: bundled_face("DejaVuSans", SANS_REGULAR)?,
                bold: Some(bundled_face("DejaVuSans-Bold", SANS_BOLD)?),
                italic: None,
            },
        })
    }

    pub fn from_dir(dir: &Path) -> Result<Self> {
        Ok(OutlineTypesetter {
            serif: Self::load_family(dir, "serif")?,
            sans: Self::load_family(dir, "sans")?,
        })
    }

    fn load_family(dir: &Path, family: &str) -> Result<FaceSet> {
        let regular_name = format!("{}-regular", family);
        let regular =
            Self::load_face(dir, &regular_name)?.ok_or_else(|| JournalError::Font {
                message: format!("missing {} face in {}", regular_name, dir.display()),
            })?;

        Ok(FaceSet {
            regular,
            bold: Self::load_face(dir, &format!("{}-bold", family))?,
            italic: Self::load_face(dir, &format!("{}-italic", family))?,
        })
    }

    fn load_face(dir: &Path, stem: &str) -> Result<Option<FontArc>> {
        let Some(path) = Self::find_face(dir, stem) else {
            debug!("No {} face found in {}", stem, dir.display());
            return Ok(None);
        };

        let bytes = fs::read(&path)?;
        let face = FontArc::try_from_vec(bytes).map_err(|e| JournalError::Font {
            message: format!("{}: {}", path.display(), e),
        })?;
        debug!("Loaded font face {}", path.display());
        Ok(Some(face))
    }

    fn find_face(dir: &Path, stem: &str) -> Option<PathBuf> {
        ["ttf", "otf"]
            .iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|p| p.is_file())
    }

    fn face(&self, font: &FontSpec) -> &FontArc {
        match font.family {
            FontFamily::Serif => self.serif.pick(font),
            FontFamily::Sans => self.sans.pick(font),
        }
    }

    /// Characters of `text` that the face picked for `font` has no glyph for
    pub fn missing_glyphs(&self, font: &FontSpec, text: &str) -> Vec<char> {
        let face = self.face(font);
        text.chars()
            .filter(|c| !c.is_whitespace() && face.glyph_id(*c) == GlyphId(0))
            .collect()
    }
}

impl Typesetter for OutlineTypesetter {
    fn measure(&self, font: &FontSpec, text: &str) -> f32 {
        let scaled = self.face(font).as_scaled(PxScale::from(font.size));
        let mut width = 0.0;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn draw(
        &self,
        pixmap: &mut Pixmap,
        font: &FontSpec,
        text: &str,
        x: f32,
        baseline: f32,
        color: Color,
    ) {
        let Some(mut coverage) = Coverage::new(pixmap) else {
            warn!("Could not allocate text mask");
            return;
        };
        let missing = self.missing_glyphs(font, text);
        if !missing.is_empty() {
            warn!(
                "No glyph for {:?} in the {:?} face, drawing placeholders",
                missing, font.family
            );
        }

        let face = self.face(font);
        let scale = PxScale::from(font.size);
        let scaled = face.as_scaled(scale);

        let mut pen = x;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                pen += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(pen, baseline));
            if let Some(outlined) = face.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, c| {
                    coverage.plot(
                        bounds.min.x as i32 + gx as i32,
                        bounds.min.y as i32 + gy as i32,
                        (c.clamp(0.0, 1.0) * 255.0) as u8,
                    );
                });
            }
            pen += scaled.h_advance(id);
            prev = Some(id);
        }

        coverage.paint(pixmap, color);
    }
}
