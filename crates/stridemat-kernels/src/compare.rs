//! Dimension-reducing extremum search with index tracking.
//!
//! `min_dim` / `max_dim` scan each run of the reduced dimension once, in
//! order, tracking the best value and the index of its first occurrence.
//! Comparison happens through a magnitude key (identity for real kinds,
//! modulus for complex kinds) in negated form — `!(candidate >= best)` for
//! min — so a comparison made false by a NaN operand also replaces the best.
//! The first NaN that becomes the running best freezes the result for that
//! run: NaN is simultaneously the most extreme value and a terminal signal.

use half::{bf16, f16};
use log::trace;
use num_complex::{Complex32, Complex64};

use stridemat_array::{wrap_dim, DType, Element, NdArray};
use stridemat_iter::{reduce_runs, DimRuns};

use crate::{with_element_type, KernelError, Result};

/// Ordering key and NaN test used by the extremum scan.
pub trait CompareElement: Element {
    type Mag: PartialOrd + Copy;

    fn magnitude(self) -> Self::Mag;
    fn is_nan(self) -> bool;
}

macro_rules! impl_compare_exact {
    ($($ty:ty),*) => {
        $(
            impl CompareElement for $ty {
                type Mag = $ty;

                fn magnitude(self) -> $ty {
                    self
                }

                fn is_nan(self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_compare_exact!(bool, u8, u16, u32, u64, i8, i16, i32, i64);

macro_rules! impl_compare_float {
    ($($ty:ty),*) => {
        $(
            impl CompareElement for $ty {
                type Mag = $ty;

                fn magnitude(self) -> $ty {
                    self
                }

                fn is_nan(self) -> bool {
                    self.is_nan()
                }
            }
        )*
    };
}

impl_compare_float!(f16, bf16, f32, f64);

impl CompareElement for Complex32 {
    type Mag = f32;

    fn magnitude(self) -> f32 {
        self.norm()
    }

    fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

impl CompareElement for Complex64 {
    type Mag = f64;

    fn magnitude(self) -> f64 {
        self.norm()
    }

    fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Min,
    Max,
}

/// Reduce `input` over `dim`, writing the minimum of each run to `result`
/// and the index of its first occurrence to `index` (dtype `i64`).
///
/// With `keep_dim` the outputs keep the reduced dimension at extent 1;
/// otherwise it is squeezed away after the reduction. Both outputs are
/// resized in place and always share a shape.
pub fn min_dim(
    result: &mut NdArray,
    index: &mut NdArray,
    input: &NdArray,
    dim: isize,
    keep_dim: bool,
) -> Result<()> {
    compare_dim("min_dim", result, index, input, dim, keep_dim, Extremum::Min)
}

/// Reduce `input` over `dim` to each run's maximum and first-occurrence
/// index. See [`min_dim`] for the shape contract.
pub fn max_dim(
    result: &mut NdArray,
    index: &mut NdArray,
    input: &NdArray,
    dim: isize,
    keep_dim: bool,
) -> Result<()> {
    compare_dim("max_dim", result, index, input, dim, keep_dim, Extremum::Max)
}

fn compare_dim(
    op: &'static str,
    result: &mut NdArray,
    index: &mut NdArray,
    input: &NdArray,
    dim: isize,
    keep_dim: bool,
    which: Extremum,
) -> Result<()> {
    if input.rank() == 0 {
        return Err(KernelError::ScalarInput { op });
    }
    let dim = wrap_dim(dim, input.rank())?;
    if result.dtype() != input.dtype() {
        return Err(KernelError::DTypeMismatch {
            op,
            operand: "result",
            expected: input.dtype(),
            actual: result.dtype(),
        });
    }
    if index.dtype() != DType::I64 {
        return Err(KernelError::DTypeMismatch {
            op,
            operand: "index",
            expected: DType::I64,
            actual: index.dtype(),
        });
    }
    if input.shape()[dim] == 0 {
        return Err(KernelError::EmptyDimension { op });
    }
    check_output_rank(op, result, input)?;
    check_output_rank(op, index, input)?;

    trace!(
        "{op}: shape={:?} dim={dim} keep_dim={keep_dim}",
        input.shape()
    );

    let mut target_shape = input.shape().to_vec();
    target_shape[dim] = 1;

    // Outputs shaped by a previous keep_dim=false call are missing the
    // reduced axis; reinsert it so the resize below always happens at the
    // input's rank, then squeeze it back off at the end.
    if !keep_dim {
        if result.rank() >= dim + 1 {
            result.unsqueeze_(dim)?;
        }
        if index.rank() >= dim + 1 {
            index.unsqueeze_(dim)?;
        }
    }
    result.resize_(&target_shape);
    index.resize_(&target_shape);

    let runs = DimRuns::new(input.shape(), input.strides(), dim);
    with_element_type!(input.dtype(), T, {
        reduce_typed::<T>(result, index, input, &runs, which)
    })?;

    if !keep_dim {
        result.squeeze_(dim)?;
        index.squeeze_(dim)?;
    }
    Ok(())
}

/// A pre-existing, non-empty output must still be shaped like a previous
/// call's result: either the input's rank (keep_dim) or one less (squeezed).
/// Anything else is reported rather than guessed at.
fn check_output_rank(op: &'static str, output: &NdArray, input: &NdArray) -> Result<()> {
    if output.numel() == 0 {
        return Ok(());
    }
    let rank = output.rank();
    if rank != input.rank() && rank + 1 != input.rank() {
        return Err(KernelError::OutputRankMismatch {
            op,
            rank,
            input_rank: input.rank(),
        });
    }
    Ok(())
}

fn reduce_typed<T: CompareElement>(
    result: &mut NdArray,
    index: &mut NdArray,
    input: &NdArray,
    runs: &DimRuns,
    which: Extremum,
) -> Result<()> {
    let data = input.as_slice::<T>()?;
    let values = result.as_mut_slice::<T>()?;
    let indices = index.as_mut_slice::<i64>()?;
    match which {
        Extremum::Min => scan_runs(values, indices, data, runs, |candidate, best| {
            !(candidate >= best)
        }),
        Extremum::Max => scan_runs(values, indices, data, runs, |candidate, best| {
            !(candidate <= best)
        }),
    }
    Ok(())
}

fn scan_runs<T, F>(values: &mut [T], indices: &mut [i64], data: &[T], runs: &DimRuns, replace: F)
where
    T: CompareElement,
    F: Fn(T::Mag, T::Mag) -> bool + Send + Sync,
{
    let len = runs.run_len();
    let stride = runs.dim_stride();
    // Grain 1: one run per task, matching the driver's no-batching contract.
    reduce_runs(values, indices, runs, 1, |value, index, base| {
        let mut best = data[base as usize];
        let mut best_index = 0i64;
        for i in 0..len {
            let candidate = data[(base + i as isize * stride) as usize];
            if replace(candidate.magnitude(), best.magnitude()) {
                best = candidate;
                best_index = i as i64;
                // A NaN that became the running best ends the scan; position
                // 0 is covered because the self-comparison above is false
                // for a NaN magnitude.
                if candidate.is_nan() {
                    break;
                }
            }
        }
        *value = best;
        *index = best_index;
    });
}
