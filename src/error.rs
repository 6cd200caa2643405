use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid hex color `{0}`, expected RRGGBB (e.g. 1a1b26)")]
    InvalidColor(String),

    #[error("surface of {cols}x{rows} cells is too small to draw on")]
    SurfaceTooSmall { cols: usize, rows: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
