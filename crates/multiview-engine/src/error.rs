//! Error types for drawables, buffers and the view grid.
//!
//! Every variant is raised synchronously by the call that would have broken an
//! invariant. Nothing here is fatal: the offending call leaves all state as it was.

use thiserror::Error;

use crate::geometry::{Dimension, Topology};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("vertex dimension mismatch: buffer holds {expected} vertices, got {actual}")]
    DimensionMismatch { expected: Dimension, actual: Dimension },

    #[error("element index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{len} indices is not a whole number of {topology} primitives ({arity} per primitive)")]
    TopologyLengthMismatch {
        topology: Topology,
        len: usize,
        arity: usize,
    },

    #[error("invalid render target size {width}x{height}")]
    InvalidTargetSize { width: f32, height: f32 },

    #[error("drawable name must not be empty")]
    EmptyName,

    #[error("invalid view grid size {rows}x{cols}")]
    InvalidGridSize { rows: usize, cols: usize },

    #[error("cell ({row}, {col}) outside of {rows}x{cols} view grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("unknown drawable {0}")]
    UnknownDrawable(String),

    #[error("a drawable named '{0}' is already registered")]
    DuplicateName(String),

    #[error("{topology} drawables do not accept {attempted} vertices")]
    WrongCoordinateSpace {
        topology: Topology,
        attempted: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
