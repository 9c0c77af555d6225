//! StrideMat Array - dtype-tagged N-D containers with explicit strides.
//!
//! This crate is the storage collaborator for the StrideMat kernels: it owns
//! shape, stride, and dtype bookkeeping and the in-place reshape operations
//! (`resize_`, `squeeze_`, `unsqueeze_`) the reduction drivers rely on. It
//! performs no arithmetic itself; kernels pull dtype-checked typed slices out
//! of an [`NdArray`] and walk them with the strides the array reports.

use thiserror::Error;

pub mod array;
pub mod dtype;
pub mod storage;

pub use array::{contiguous_strides, wrap_dim, NdArray};
pub use dtype::DType;
pub use storage::{Element, Storage};

/// Errors reported by the array layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrayError {
    #[error("data length {len} does not match shape {shape:?}")]
    ShapeMismatch { len: usize, shape: Vec<usize> },

    #[error("expected dtype {expected}, got {actual}")]
    DTypeMismatch { expected: DType, actual: DType },

    #[error("dimension {dim} out of range for rank {rank}")]
    InvalidDimension { dim: isize, rank: usize },

    #[error("axis {dim} out of range for rank {rank}")]
    InvalidAxis { dim: usize, rank: usize },

    #[error("cannot squeeze axis {dim} with extent {extent}")]
    SqueezeNonUnit { dim: usize, extent: usize },

    #[error("index {coords:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { coords: Vec<usize>, shape: Vec<usize> },
}

pub type Result<T> = std::result::Result<T, ArrayError>;
