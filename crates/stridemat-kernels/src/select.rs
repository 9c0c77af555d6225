//! Elementwise ternary select.
//!
//! `where_cond` picks, per position, the element of `on_true` where the
//! condition holds and the element of `on_false` where it does not. The
//! condition is a `bool` mask or a legacy `u8` mask where any nonzero byte
//! counts as set.

use log::trace;

use stridemat_array::{DType, Element, NdArray};
use stridemat_iter::{map_strided, StridedIndexer, GRAIN_ELEMENTWISE};

use crate::{with_element_type, KernelError, Result};

/// Reads a condition mask element. `u8` masks treat every nonzero byte as
/// set, not just 1.
trait MaskElement: Element {
    fn is_set(self) -> bool;
}

impl MaskElement for bool {
    fn is_set(self) -> bool {
        self
    }
}

impl MaskElement for u8 {
    fn is_set(self) -> bool {
        self != 0
    }
}

/// Write `on_true[p]` to `out[p]` where `condition[p]` is set and
/// `on_false[p]` elsewhere.
///
/// All three inputs must share one shape; `on_true`, `on_false` and `out`
/// must share one dtype. `out` is resized in place to the common shape.
pub fn where_cond(
    out: &mut NdArray,
    condition: &NdArray,
    on_true: &NdArray,
    on_false: &NdArray,
) -> Result<()> {
    const OP: &str = "where_cond";

    if !matches!(condition.dtype(), DType::Bool | DType::U8) {
        return Err(KernelError::ConditionDType {
            op: OP,
            actual: condition.dtype(),
        });
    }
    if on_false.dtype() != on_true.dtype() {
        return Err(KernelError::DTypeMismatch {
            op: OP,
            operand: "on_false",
            expected: on_true.dtype(),
            actual: on_false.dtype(),
        });
    }
    if out.dtype() != on_true.dtype() {
        return Err(KernelError::DTypeMismatch {
            op: OP,
            operand: "out",
            expected: on_true.dtype(),
            actual: out.dtype(),
        });
    }
    if condition.shape() != on_true.shape() {
        return Err(KernelError::ShapeMismatch {
            op: OP,
            left: condition.shape().to_vec(),
            right: on_true.shape().to_vec(),
        });
    }
    if on_true.shape() != on_false.shape() {
        return Err(KernelError::ShapeMismatch {
            op: OP,
            left: on_true.shape().to_vec(),
            right: on_false.shape().to_vec(),
        });
    }

    trace!("{OP}: shape={:?} cond={}", on_true.shape(), condition.dtype());

    let shape = on_true.shape().to_vec();
    out.resize_(&shape);

    with_element_type!(on_true.dtype(), T, {
        match condition.dtype() {
            DType::U8 => select_typed::<T, u8>(out, condition, on_true, on_false),
            _ => select_typed::<T, bool>(out, condition, on_true, on_false),
        }
    })
}

fn select_typed<T: Element, C: MaskElement>(
    out: &mut NdArray,
    condition: &NdArray,
    on_true: &NdArray,
    on_false: &NdArray,
) -> Result<()> {
    let mask_ix = StridedIndexer::new(condition.shape(), condition.strides());
    let true_ix = StridedIndexer::new(on_true.shape(), on_true.strides());
    let false_ix = StridedIndexer::new(on_false.shape(), on_false.strides());

    let mask = condition.as_slice::<C>()?;
    let lhs = on_true.as_slice::<T>()?;
    let rhs = on_false.as_slice::<T>()?;
    let slots = out.as_mut_slice::<T>()?;

    map_strided(slots, GRAIN_ELEMENTWISE, |slot, p| {
        *slot = if mask[mask_ix.offset(p)].is_set() {
            lhs[true_ix.offset(p)]
        } else {
            rhs[false_ix.offset(p)]
        };
    });
    Ok(())
}
