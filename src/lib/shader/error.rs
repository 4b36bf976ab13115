//! Errors reported while compiling a description, one per failing line except for
//! [Error::IoFailure] and [Error::UnsupportedFormat] which abort the compile before it starts.

use std::{fmt::Display, io, path::PathBuf};

use crate::texture;

/// Result of processing a single line.
pub type LineResult<T> = Result<T, Error>;

#[derive(Debug, thiserror::Error)]
/// Possible errors returned while compiling a material description.
pub enum Error {
    #[error("Unknown node kind `{0}`")]
    /// First token is neither a registered kind nor `Connect`.
    UnknownKind(String),

    #[error("{context} expects {expected} argument(s), got {got}")]
    /// Wrong number of line arguments or vector components.
    ArityMismatch {
        /// What was being parsed, e.g. the node kind.
        context: String,
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        got: usize,
    },

    #[error("`{token}` is not a valid {expected}")]
    /// Token does not have the shape the parameter requires.
    MalformedLiteral {
        #[allow(missing_docs)]
        token: String,
        #[allow(missing_docs)]
        expected: Shape,
    },

    #[error("Reference to undeclared node `{0}`")]
    /// Reference token naming a node that was not declared before it.
    UndeclaredReference(String),

    #[error("Unknown input slot `{0}`")]
    /// `Connect` target is neither a material input nor a node sub-input.
    UnknownSlot(String),

    #[error("Could not load texture `{path}`: {source}")]
    /// The texture loader refused the path given to a texture node.
    ResourceLoadFailure {
        #[allow(missing_docs)]
        path: String,
        #[allow(missing_docs)]
        source: texture::Error,
    },

    #[error("Could not read `{}`: {source}", .path.display())]
    /// The description itself could not be read.
    IoFailure {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        source: io::Error,
    },

    #[error("Unsupported description `{}`, expected a .{} file", .0.display(), super::factory::EXTENSION)]
    /// The description does not have the material description extension.
    UnsupportedFormat(PathBuf),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Expected shape of a token.
pub enum Shape {
    /// A whole directive line.
    Line,
    /// Numeric literal.
    Number,
    /// Vector literal with the given component count.
    Vector(usize),
    /// Numeric literal or node reference.
    Operand,
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Line => write!(f, "directive"),
            Shape::Number => write!(f, "number"),
            Shape::Vector(n) => write!(f, "{n}-component vector"),
            Shape::Operand => write!(f, "number or node name"),
        }
    }
}

impl Error {
    pub(super) fn malformed(token: &str, expected: Shape) -> Self {
        Self::MalformedLiteral {
            token: token.to_owned(),
            expected,
        }
    }
}
