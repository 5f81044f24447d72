//! Error types for OBJ loading.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for OBJ loading.
pub type Result<T> = std::result::Result<T, ObjError>;

/// Which attribute table a face reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TextureCoordinate,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => write!(f, "position"),
            Attribute::TextureCoordinate => write!(f, "texture coordinate"),
            Attribute::Normal => write!(f, "normal"),
        }
    }
}

/// Errors that abort a single OBJ load. No partial model is ever returned.
#[derive(Debug, Error)]
pub enum ObjError {
    /// The file could not be opened or read.
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record of a known type did not match its grammar, e.g. a token
    /// that should be numeric is not.
    #[error("line {line}: malformed `{keyword}` record: {record:?}")]
    Parse {
        line: usize,
        keyword: String,
        record: String,
    },

    /// A face references an attribute that does not exist. `index` is the
    /// 1-based reference as written in the file.
    #[error("line {line}: {attribute} index {index} is out of range (table holds {len})")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: usize,
        len: usize,
    },

    /// A face with other than three vertices. Faces are not triangulated.
    #[error("line {line}: face has {vertices} vertices, only triangles are supported")]
    UnsupportedTopology { line: usize, vertices: usize },

    /// The mesh splits into more vertices than a 32-bit index buffer can address.
    #[error("mesh has {vertices} output vertices, too many for 32-bit indices")]
    TooManyVertices { vertices: usize },
}

/// Errors reading a TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
