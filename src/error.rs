use thiserror::Error;

/// Errors that can occur while tracing an image or laying out its plot.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TraceError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("no threshold levels given")]
    NoThresholds,

    #[error("can't make head nor tail of paper size '{0}'")]
    InvalidPaper(String),

    #[error("margin {margin} mm is too big for paper size {width} x {height} mm")]
    MarginTooLarge { margin: f64, width: f64, height: f64 },

    #[error("invalid colour specification: {0}")]
    InvalidColours(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
