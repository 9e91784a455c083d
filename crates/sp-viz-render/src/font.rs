use std::sync::{Arc, OnceLock};

use ab_glyph::FontVec;
use usvg::fontdb;

use crate::primitives::{FontStyle, FontWeight};

/// `font-family` written on every SVG `<text>`.
pub const SVG_FONT_FAMILY: &str =
    "'TeX Gyre Heros', Helvetica, Arial, 'Liberation Sans', 'DejaVu Sans', sans-serif";

/// Same preference order, for face lookup in the font database.
const FAMILIES: &[&str] = &["TeX Gyre Heros", "Helvetica", "Arial", "Liberation Sans", "DejaVu Sans"];

static DATABASE: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
static HANDLE: OnceLock<FontHandle> = OnceLock::new();

/// System font database, scanned once per process.
pub fn shared_database() -> Arc<fontdb::Database> {
    DATABASE
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("font database: {} faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Faces used for text measurement. A missing face falls back to a width heuristic.
pub struct FontHandle {
    pub regular: Option<FontVec>,
    pub bold: Option<FontVec>,
    pub italic: Option<FontVec>,
}

impl FontHandle {
    /// Process-wide handle backed by [`shared_database`].
    pub fn shared() -> &'static FontHandle {
        HANDLE.get_or_init(|| FontHandle::from_database(&shared_database()))
    }

    pub fn from_database(db: &fontdb::Database) -> Self {
        let handle = Self {
            regular: load_face(db, fontdb::Weight::NORMAL, fontdb::Style::Normal),
            bold: load_face(db, fontdb::Weight::BOLD, fontdb::Style::Normal),
            italic: load_face(db, fontdb::Weight::NORMAL, fontdb::Style::Italic),
        };
        if handle.regular.is_none() {
            log::warn!("no sans-serif system font found, text widths are estimated");
        }
        handle
    }

    /// Handle without any face; every measurement uses the heuristic.
    pub fn empty() -> Self {
        Self { regular: None, bold: None, italic: None }
    }

    pub fn select(&self, weight: FontWeight, style: FontStyle) -> Option<&FontVec> {
        let face = match (weight, style) {
            (FontWeight::Bold, _) => self.bold.as_ref(),
            (_, FontStyle::Italic) => self.italic.as_ref(),
            _ => None,
        };
        face.or(self.regular.as_ref())
    }
}

fn load_face(
    db: &fontdb::Database,
    weight: fontdb::Weight,
    style: fontdb::Style,
) -> Option<FontVec> {
    let id = FAMILIES.iter().find_map(|family| normal_width_face(db, family, weight, style)).or_else(
        || {
            let families = [fontdb::Family::SansSerif];
            db.query(&fontdb::Query {
                families: &families,
                weight,
                stretch: fontdb::Stretch::Normal,
                style,
            })
        },
    )?;
    db.with_face_data(id, |data, index| FontVec::try_from_vec_and_index(data.to_vec(), index).ok())
        .flatten()
}

/// Non-condensed face of `family` with the closest weight, the one the SVG renderer picks
/// for the same `font-family`.
fn normal_width_face(
    db: &fontdb::Database,
    family: &str,
    weight: fontdb::Weight,
    style: fontdb::Style,
) -> Option<fontdb::ID> {
    let style_ok = |s: fontdb::Style| match style {
        fontdb::Style::Normal => s == fontdb::Style::Normal,
        _ => s != fontdb::Style::Normal,
    };
    db.faces()
        .filter(|f| f.stretch == fontdb::Stretch::Normal && style_ok(f.style))
        .filter(|f| f.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(family)))
        .min_by_key(|f| f.weight.0.abs_diff(weight.0))
        .map(|f| f.id)
}
