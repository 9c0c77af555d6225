//! StrideMat Kernels - extremum search with index tracking over strided
//! N-D arrays, plus elementwise ternary select and infinity predicates.
//!
//! The reduction entry points ([`min_dim`] / [`max_dim`]) produce both the
//! extremal value and the position of its first occurrence along one
//! dimension, with NaN-aware and complex-magnitude comparison semantics.
//! All kernels validate their configuration eagerly and abort before
//! mutating any output; a call either fully completes with correct output
//! shapes and contents or leaves the outputs untouched.

use thiserror::Error;

use stridemat_array::{ArrayError, DType};

pub mod compare;
pub mod infinity;
pub mod select;

pub use compare::{max_dim, min_dim};
pub use infinity::{is_neg_inf, is_pos_inf};
pub use select::where_cond;

/// Errors reported by the kernel layer. Everything here is a configuration
/// error detected before iteration begins; numeric edge cases such as NaN
/// are specified behavior, not faults.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("{op}: expected {operand} dtype {expected}, got {actual}")]
    DTypeMismatch {
        op: &'static str,
        operand: &'static str,
        expected: DType,
        actual: DType,
    },

    #[error("{op}: unsupported dtype {dtype}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    #[error("{op}: condition must be bool or u8, got {actual}")]
    ConditionDType { op: &'static str, actual: DType },

    #[error("{op}: operand shapes {left:?} and {right:?} differ")]
    ShapeMismatch {
        op: &'static str,
        left: Vec<usize>,
        right: Vec<usize>,
    },

    #[error("{op}: cannot reduce a dimension with extent 0")]
    EmptyDimension { op: &'static str },

    #[error("{op}: input must have rank >= 1")]
    ScalarInput { op: &'static str },

    #[error(
        "{op}: existing output of rank {rank} is inconsistent with input rank {input_rank}"
    )]
    OutputRankMismatch {
        op: &'static str,
        rank: usize,
        input_rank: usize,
    },

    #[error(transparent)]
    Array(#[from] ArrayError),
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Monomorphize `$body` for the element type behind a dtype tag. Selected
/// once per kernel call; the inner loops never branch on the tag again.
macro_rules! with_element_type {
    ($dtype:expr, $ty:ident, $body:block) => {
        match $dtype {
            stridemat_array::DType::Bool => {
                type $ty = bool;
                $body
            }
            stridemat_array::DType::U8 => {
                type $ty = u8;
                $body
            }
            stridemat_array::DType::U16 => {
                type $ty = u16;
                $body
            }
            stridemat_array::DType::U32 => {
                type $ty = u32;
                $body
            }
            stridemat_array::DType::U64 => {
                type $ty = u64;
                $body
            }
            stridemat_array::DType::I8 => {
                type $ty = i8;
                $body
            }
            stridemat_array::DType::I16 => {
                type $ty = i16;
                $body
            }
            stridemat_array::DType::I32 => {
                type $ty = i32;
                $body
            }
            stridemat_array::DType::I64 => {
                type $ty = i64;
                $body
            }
            stridemat_array::DType::F16 => {
                type $ty = half::f16;
                $body
            }
            stridemat_array::DType::BF16 => {
                type $ty = half::bf16;
                $body
            }
            stridemat_array::DType::F32 => {
                type $ty = f32;
                $body
            }
            stridemat_array::DType::F64 => {
                type $ty = f64;
                $body
            }
            stridemat_array::DType::C64 => {
                type $ty = num_complex::Complex32;
                $body
            }
            stridemat_array::DType::C128 => {
                type $ty = num_complex::Complex64;
                $body
            }
        }
    };
}

pub(crate) use with_element_type;
