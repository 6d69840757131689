use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::config::FontConfig;
use crate::error::{DiagramError, Result};

/// Which font family text will actually be drawn with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontChoice {
    Preferred,
    Fallback(String),
    /// No fonts at all; shapes still render, text is skipped.
    Unavailable,
}

pub fn choose_font<'a, I>(available: I, preferred: &str) -> FontChoice
where
    I: IntoIterator<Item = &'a str>,
{
    let mut first = None;
    for family in available {
        if family == preferred {
            return FontChoice::Preferred;
        }
        if first.is_none() {
            first = Some(family);
        }
    }
    match first {
        Some(family) => FontChoice::Fallback(family.to_string()),
        None => FontChoice::Unavailable,
    }
}

fn svg_options(fonts: &FontConfig) -> usvg::Options<'static> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let choice = choose_font(
        opt.fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str())),
        &fonts.family,
    );
    match choice {
        FontChoice::Preferred => {
            debug!(family = %fonts.family, "using preferred font");
            opt.font_family = fonts.family.clone();
        }
        FontChoice::Fallback(family) => {
            warn!(preferred = %fonts.family, fallback = %family, "preferred font not installed");
            opt.fontdb_mut().set_sans_serif_family(family.clone());
            opt.font_family = family;
        }
        FontChoice::Unavailable => {
            warn!("no fonts available, text will be omitted from the image");
        }
    }
    opt
}

pub fn svg_to_pixmap(
    svg: &str,
    width: u32,
    height: u32,
    fonts: &FontConfig,
) -> Result<tiny_skia::Pixmap> {
    let opt = svg_options(fonts);
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| DiagramError::SvgParse(e.to_string()))?;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(DiagramError::PixmapAlloc { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Rasterize the canvas at its own size and encode it as PNG.
pub fn to_png(canvas: &Canvas, fonts: &FontConfig) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(&canvas.to_svg(), canvas.width(), canvas.height(), fonts)?;
    pixmap
        .encode_png()
        .map_err(|e| DiagramError::PngEncode(e.to_string()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` next to `path` and rename into place, so readers never see a
/// partially written image.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    let wrap = |source| DiagramError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = std::fs::write(&tmp, bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(wrap(e));
    }
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(wrap(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoxRect;
    use pretty_assertions::assert_eq;

    #[test]
    fn choose_preferred_when_installed() {
        let families = ["Liberation Sans", "DejaVu Sans"];
        assert_eq!(choose_font(families, "DejaVu Sans"), FontChoice::Preferred);
    }

    #[test]
    fn choose_first_installed_as_fallback() {
        let families = ["Liberation Sans", "Noto Serif"];
        assert_eq!(
            choose_font(families, "DejaVu Sans"),
            FontChoice::Fallback("Liberation Sans".into())
        );
    }

    #[test]
    fn choose_unavailable_without_fonts() {
        assert_eq!(choose_font(Vec::<&str>::new(), "DejaVu Sans"), FontChoice::Unavailable);
    }

    #[test]
    fn png_has_canvas_size_and_background() {
        let mut canvas = Canvas::new(40, 30, "white");
        canvas.rect(
            BoxRect::new(10.0, 10.0, 10.0, 10.0),
            Some("#ff0000"),
            "#ff0000",
            1.0,
        );
        let bytes = to_png(&canvas, &FontConfig::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

        let pixmap = tiny_skia::Pixmap::decode_png(&bytes).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 30));
        let bg = pixmap.pixel(1, 1).unwrap();
        assert_eq!((bg.red(), bg.green(), bg.blue()), (255, 255, 255));
        let fill = pixmap.pixel(15, 15).unwrap();
        assert_eq!((fill.red(), fill.green(), fill.blue()), (255, 0, 0));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_atomic(&path, b"data").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"data");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn atomic_write_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.png");
        let err = write_atomic(&path, b"data").unwrap_err();

        assert!(matches!(err, DiagramError::OutputWrite { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("/srv/out/current.png"));
        assert_eq!(tmp, PathBuf::from("/srv/out/current.png.tmp"));
    }
}
