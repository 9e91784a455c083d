//! Writing rendered figures to disk.

pub mod pdf;
pub mod png;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Paths written by [`save_figure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFigure {
    pub pdf: PathBuf,
    pub png: PathBuf,
}

/// `<prefix>.<ext>`, appended rather than replacing any dot already in the prefix.
pub fn with_suffix(prefix: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(prefix.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Save one SVG document as `<prefix>.pdf` and `<prefix>.png`, creating the
/// parent directory when it is missing.
pub fn save_figure(svg: &str, prefix: &Path, dpi: u32) -> crate::Result<SavedFigure> {
    if let Some(parent) = prefix.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        log::debug!("creating output directory {}", parent.display());
        std::fs::create_dir_all(parent)?;
    }

    let saved = SavedFigure { pdf: with_suffix(prefix, "pdf"), png: with_suffix(prefix, "png") };
    std::fs::write(&saved.pdf, pdf::svg_to_pdf(svg)?)?;
    std::fs::write(&saved.png, png::svg_to_png(svg, dpi)?)?;
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_keeps_dots() {
        assert_eq!(
            with_suffix(Path::new("plots/run_2024.v2"), "pdf"),
            PathBuf::from("plots/run_2024.v2.pdf")
        );
        assert_eq!(with_suffix(Path::new("out"), "png"), PathBuf::from("out.png"));
    }
}
