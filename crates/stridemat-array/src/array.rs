//! The N-D array container.

use crate::dtype::DType;
use crate::storage::{Element, Storage};
use crate::{ArrayError, Result};

/// Row-major strides (in elements) for a densely packed buffer of `shape`.
pub fn contiguous_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![0isize; shape.len()];
    let mut acc = 1isize;
    for (stride, &extent) in strides.iter_mut().zip(shape.iter()).rev() {
        *stride = acc;
        acc *= extent as isize;
    }
    strides
}

/// Normalize a possibly-negative dimension index against `rank`.
///
/// Negative values count from the end, MATLAB/NumPy style; anything that does
/// not land in `[0, rank)` after wrapping is reported, never clamped.
pub fn wrap_dim(dim: isize, rank: usize) -> Result<usize> {
    let rank_i = rank as isize;
    let wrapped = if dim < 0 { dim + rank_i } else { dim };
    if rank == 0 || wrapped < 0 || wrapped >= rank_i {
        return Err(ArrayError::InvalidDimension { dim, rank });
    }
    Ok(wrapped as usize)
}

/// An owned N-D array: dtype-tagged storage plus shape and per-dimension
/// strides in elements.
///
/// Freshly constructed arrays are contiguous row-major; [`NdArray::transposed`]
/// produces genuinely non-contiguous layouts for exercising strided kernels.
/// Kernels mutate caller-owned arrays in place via `resize_` / `squeeze_` /
/// `unsqueeze_` and never replace their identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    storage: Storage,
    shape: Vec<usize>,
    strides: Vec<isize>,
}

impl NdArray {
    /// Build a contiguous array from row-major data.
    pub fn from_vec<T: Element>(data: Vec<T>, shape: Vec<usize>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(ArrayError::ShapeMismatch {
                len: data.len(),
                shape,
            });
        }
        let strides = contiguous_strides(&shape);
        Ok(NdArray {
            storage: T::into_storage(data),
            shape,
            strides,
        })
    }

    /// Zero-filled contiguous array.
    pub fn zeros(dtype: DType, shape: Vec<usize>) -> Self {
        let numel = shape.iter().product();
        let strides = contiguous_strides(&shape);
        NdArray {
            storage: Storage::zeros(dtype, numel),
            shape,
            strides,
        }
    }

    /// A fresh output buffer: shape `[0]`, no elements. Reduction drivers
    /// treat these as "never shaped by a previous call".
    pub fn empty(dtype: DType) -> Self {
        Self::zeros(dtype, vec![0])
    }

    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_contiguous(&self) -> bool {
        self.strides == contiguous_strides(&self.shape)
    }

    /// Dtype-checked read access to the underlying buffer.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::from_storage(&self.storage).ok_or(ArrayError::DTypeMismatch {
            expected: T::DTYPE,
            actual: self.dtype(),
        })
    }

    /// Dtype-checked write access to the underlying buffer.
    pub fn as_mut_slice<T: Element>(&mut self) -> Result<&mut [T]> {
        let actual = self.dtype();
        T::from_storage_mut(&mut self.storage).ok_or(ArrayError::DTypeMismatch {
            expected: T::DTYPE,
            actual,
        })
    }

    /// Read one element by coordinate; test and diagnostics helper.
    pub fn get<T: Element>(&self, coords: &[usize]) -> Result<T> {
        if coords.len() != self.rank()
            || coords.iter().zip(self.shape.iter()).any(|(&c, &e)| c >= e)
        {
            return Err(ArrayError::IndexOutOfBounds {
                coords: coords.to_vec(),
                shape: self.shape.clone(),
            });
        }
        let offset: isize = coords
            .iter()
            .zip(self.strides.iter())
            .map(|(&c, &s)| c as isize * s)
            .sum();
        Ok(self.as_slice::<T>()?[offset as usize])
    }

    /// Resize in place to `shape`, restoring a contiguous layout.
    ///
    /// When the element count already matches, only the shape and strides
    /// change and the contents survive; otherwise the storage is reallocated
    /// zero-filled. Idempotent for an already-matching shape.
    pub fn resize_(&mut self, shape: &[usize]) {
        let numel: usize = shape.iter().product();
        if numel != self.storage.len() {
            self.storage = Storage::zeros(self.dtype(), numel);
        }
        self.shape = shape.to_vec();
        self.strides = contiguous_strides(&self.shape);
    }

    /// Insert a size-1 axis at `dim` (which may equal the rank, appending).
    pub fn unsqueeze_(&mut self, dim: usize) -> Result<()> {
        if dim > self.rank() {
            return Err(ArrayError::InvalidAxis {
                dim,
                rank: self.rank(),
            });
        }
        // A size-1 axis never contributes to addressing; pick the stride that
        // keeps a contiguous array contiguous.
        let stride = if dim == self.rank() {
            1
        } else {
            self.strides[dim] * self.shape[dim] as isize
        };
        self.shape.insert(dim, 1);
        self.strides.insert(dim, stride);
        Ok(())
    }

    /// Remove the size-1 axis at `dim`.
    pub fn squeeze_(&mut self, dim: usize) -> Result<()> {
        if dim >= self.rank() {
            return Err(ArrayError::InvalidAxis {
                dim,
                rank: self.rank(),
            });
        }
        if self.shape[dim] != 1 {
            return Err(ArrayError::SqueezeNonUnit {
                dim,
                extent: self.shape[dim],
            });
        }
        self.shape.remove(dim);
        self.strides.remove(dim);
        Ok(())
    }

    /// A copy with axes `d0` and `d1` exchanged in shape and strides only;
    /// the element order in storage is untouched, so the result is
    /// non-contiguous whenever the axes differ in extent or stride.
    pub fn transposed(&self, d0: usize, d1: usize) -> Result<Self> {
        if d0 >= self.rank() {
            return Err(ArrayError::InvalidAxis {
                dim: d0,
                rank: self.rank(),
            });
        }
        if d1 >= self.rank() {
            return Err(ArrayError::InvalidAxis {
                dim: d1,
                rank: self.rank(),
            });
        }
        let mut out = self.clone();
        out.shape.swap(d0, d1);
        out.strides.swap(d0, d1);
        Ok(out)
    }
}
