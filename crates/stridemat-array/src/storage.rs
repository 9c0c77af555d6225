//! Dtype-tagged element storage.

use std::fmt;

use half::{bf16, f16};
use num_complex::{Complex32, Complex64};

use crate::dtype::DType;

/// One owned buffer per element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Bool(Vec<bool>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F16(Vec<f16>),
    BF16(Vec<bf16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C64(Vec<Complex32>),
    C128(Vec<Complex64>),
}

impl Storage {
    pub fn dtype(&self) -> DType {
        match self {
            Storage::Bool(_) => DType::Bool,
            Storage::U8(_) => DType::U8,
            Storage::U16(_) => DType::U16,
            Storage::U32(_) => DType::U32,
            Storage::U64(_) => DType::U64,
            Storage::I8(_) => DType::I8,
            Storage::I16(_) => DType::I16,
            Storage::I32(_) => DType::I32,
            Storage::I64(_) => DType::I64,
            Storage::F16(_) => DType::F16,
            Storage::BF16(_) => DType::BF16,
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
            Storage::C64(_) => DType::C64,
            Storage::C128(_) => DType::C128,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Storage::Bool(data) => data.len(),
            Storage::U8(data) => data.len(),
            Storage::U16(data) => data.len(),
            Storage::U32(data) => data.len(),
            Storage::U64(data) => data.len(),
            Storage::I8(data) => data.len(),
            Storage::I16(data) => data.len(),
            Storage::I32(data) => data.len(),
            Storage::I64(data) => data.len(),
            Storage::F16(data) => data.len(),
            Storage::BF16(data) => data.len(),
            Storage::F32(data) => data.len(),
            Storage::F64(data) => data.len(),
            Storage::C64(data) => data.len(),
            Storage::C128(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh zero-filled storage of the given kind and length.
    pub fn zeros(dtype: DType, len: usize) -> Storage {
        match dtype {
            DType::Bool => Storage::Bool(vec![false; len]),
            DType::U8 => Storage::U8(vec![0; len]),
            DType::U16 => Storage::U16(vec![0; len]),
            DType::U32 => Storage::U32(vec![0; len]),
            DType::U64 => Storage::U64(vec![0; len]),
            DType::I8 => Storage::I8(vec![0; len]),
            DType::I16 => Storage::I16(vec![0; len]),
            DType::I32 => Storage::I32(vec![0; len]),
            DType::I64 => Storage::I64(vec![0; len]),
            DType::F16 => Storage::F16(vec![f16::ZERO; len]),
            DType::BF16 => Storage::BF16(vec![bf16::ZERO; len]),
            DType::F32 => Storage::F32(vec![0.0; len]),
            DType::F64 => Storage::F64(vec![0.0; len]),
            DType::C64 => Storage::C64(vec![Complex32::new(0.0, 0.0); len]),
            DType::C128 => Storage::C128(vec![Complex64::new(0.0, 0.0); len]),
        }
    }
}

/// Rust-side element types backing the [`DType`] tags.
///
/// The storage accessors are what make dtype-checked slice extraction work:
/// `T::from_storage` succeeds exactly when the storage variant matches
/// `T::DTYPE`, so a kernel that dispatched on the tag can never read a buffer
/// through the wrong type.
pub trait Element: Copy + PartialEq + Send + Sync + fmt::Debug + 'static {
    const DTYPE: DType;

    fn zero() -> Self;
    fn from_storage(storage: &Storage) -> Option<&[Self]>;
    fn from_storage_mut(storage: &mut Storage) -> Option<&mut [Self]>;
    fn into_storage(data: Vec<Self>) -> Storage;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident, $zero:expr;)*) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$variant;

                fn zero() -> Self {
                    $zero
                }

                fn from_storage(storage: &Storage) -> Option<&[Self]> {
                    match storage {
                        Storage::$variant(data) => Some(data),
                        _ => None,
                    }
                }

                fn from_storage_mut(storage: &mut Storage) -> Option<&mut [Self]> {
                    match storage {
                        Storage::$variant(data) => Some(data),
                        _ => None,
                    }
                }

                fn into_storage(data: Vec<Self>) -> Storage {
                    Storage::$variant(data)
                }
            }
        )*
    };
}

impl_element! {
    bool => Bool, false;
    u8 => U8, 0;
    u16 => U16, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    i8 => I8, 0;
    i16 => I16, 0;
    i32 => I32, 0;
    i64 => I64, 0;
    f16 => F16, f16::ZERO;
    bf16 => BF16, bf16::ZERO;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
    Complex32 => C64, Complex32::new(0.0, 0.0);
    Complex64 => C128, Complex64::new(0.0, 0.0);
}
