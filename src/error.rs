use thiserror::Error;

/// Errors raised while building or saving a render: scene loading, geometry
/// construction and image output.
///
/// Nothing in here is produced per ray: misses, parallel rays and negative
/// discriminants are ordinary `None` results from the intersection routines.
#[derive(Error, Debug)]
pub enum Error {
    /// A vector with (near) zero magnitude was normalized.
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    /// Three triangle vertices are collinear or coincident.
    #[error("degenerate triangle: vertices do not span a plane")]
    DegenerateTriangle,

    /// Any other surface whose parameters cannot describe a solid.
    #[error("degenerate surface: {0}")]
    DegenerateSurface(String),

    /// The camera frame could not be built from the given pose.
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    /// A token in a text scene could not be read as the expected value.
    #[error("parse error at line {line}, token `{token}`: {message}")]
    Parse {
        /// Line number (1-indexed).
        line: usize,
        /// The offending token.
        token: String,
        /// What was expected instead.
        message: String,
    },

    /// A text scene names a surface kind that does not exist.
    #[error("unknown surface kind `{kind}` at line {line}")]
    UnknownSurface {
        /// Line number (1-indexed).
        line: usize,
        /// The unrecognized keyword.
        kind: String,
    },

    /// A text scene ended in the middle of a record.
    #[error("unexpected end of scene while reading {expected}")]
    UnexpectedEof {
        /// The value that was being read.
        expected: String,
    },

    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON scene description.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML render configuration.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The output raster could not be encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
