use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("failed to read inventory file {}: {source}", path.display())]
    InventoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rendered SVG: {0}")]
    SvgParse(String),
    #[error("failed to allocate {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    PngEncode(String),
    #[error("failed to write output image {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DiagramError>;
