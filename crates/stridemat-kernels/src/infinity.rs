//! Signed infinity predicates for the floating-point kinds.
//!
//! Each predicate is an exact equality against the signed infinity of the
//! input's dtype, so NaN and every finite value map to `false`. Integer,
//! bool and complex inputs are rejected: they have no representation of
//! infinity, and a complex modulus can be infinite without either component
//! equalling a signed infinity.

use half::{bf16, f16};
use log::trace;

use stridemat_array::{DType, Element, NdArray};
use stridemat_iter::{map_strided, StridedIndexer, GRAIN_ELEMENTWISE};

use crate::{KernelError, Result};

trait InfElement: Element {
    const POS_INF: Self;
    const NEG_INF: Self;
}

macro_rules! impl_inf_element {
    ($($ty:ty),*) => {
        $(
            impl InfElement for $ty {
                const POS_INF: $ty = <$ty>::INFINITY;
                const NEG_INF: $ty = <$ty>::NEG_INFINITY;
            }
        )*
    };
}

impl_inf_element!(f16, bf16, f32, f64);

/// Write `input[p] == +inf` into `out` as a bool mask of the input's shape.
pub fn is_pos_inf(out: &mut NdArray, input: &NdArray) -> Result<()> {
    infinity_mask("is_pos_inf", out, input, true)
}

/// Write `input[p] == -inf` into `out` as a bool mask of the input's shape.
pub fn is_neg_inf(out: &mut NdArray, input: &NdArray) -> Result<()> {
    infinity_mask("is_neg_inf", out, input, false)
}

fn infinity_mask(op: &'static str, out: &mut NdArray, input: &NdArray, positive: bool) -> Result<()> {
    if out.dtype() != DType::Bool {
        return Err(KernelError::DTypeMismatch {
            op,
            operand: "out",
            expected: DType::Bool,
            actual: out.dtype(),
        });
    }

    trace!("{op}: shape={:?} dtype={}", input.shape(), input.dtype());

    match input.dtype() {
        DType::F16 => mask_typed::<f16>(out, input, positive),
        DType::BF16 => mask_typed::<bf16>(out, input, positive),
        DType::F32 => mask_typed::<f32>(out, input, positive),
        DType::F64 => mask_typed::<f64>(out, input, positive),
        other => Err(KernelError::UnsupportedDType { op, dtype: other }),
    }
}

fn mask_typed<T: InfElement>(out: &mut NdArray, input: &NdArray, positive: bool) -> Result<()> {
    let target = if positive { T::POS_INF } else { T::NEG_INF };
    let shape = input.shape().to_vec();
    out.resize_(&shape);

    let ix = StridedIndexer::new(input.shape(), input.strides());
    let data = input.as_slice::<T>()?;
    let slots = out.as_mut_slice::<bool>()?;
    map_strided(slots, GRAIN_ELEMENTWISE, |slot, p| {
        *slot = data[ix.offset(p)] == target;
    });
    Ok(())
}
