//! StrideMat Iteration Engine - run enumeration over strided N-D layouts.
//!
//! The engine owns the loop shape so the kernels never compute addresses from
//! raw bytes: a kernel receives either a per-run base offset ([`reduce_runs`])
//! or a logical linear index it can turn into an element offset with a
//! [`StridedIndexer`]. Chunking is the engine's business; callers must be
//! correct for any grain from 1 up to the full iteration space, and with the
//! `parallel` feature chunks execute on the rayon pool. Output disjointness
//! comes from slice splitting, so no run ever needs a lock.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default grain for elementwise kernels; reductions pass their own.
pub const GRAIN_ELEMENTWISE: usize = 32_768;

fn contiguous_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![0isize; shape.len()];
    let mut acc = 1isize;
    for (stride, &extent) in strides.iter_mut().zip(shape.iter()).rev() {
        *stride = acc;
        acc *= extent as isize;
    }
    strides
}

/// Enumeration of the runs produced by collapsing one dimension of a shape.
///
/// Run `k` walks the collapsed dimension for the `k`-th combination of the
/// remaining dimensions, taken in row-major order. That order matches the
/// row-major linearization of the shape with the collapsed dimension forced
/// to extent 1, which is exactly how the reduction drivers lay out their
/// output buffers; run `k` therefore writes output slot `k` and nothing else.
#[derive(Debug, Clone)]
pub struct DimRuns {
    outer_shape: Vec<usize>,
    outer_strides: Vec<isize>,
    num_runs: usize,
    run_len: usize,
    dim_stride: isize,
}

impl DimRuns {
    pub fn new(shape: &[usize], strides: &[isize], dim: usize) -> Self {
        debug_assert!(dim < shape.len());
        debug_assert_eq!(shape.len(), strides.len());
        let mut outer_shape = Vec::with_capacity(shape.len().saturating_sub(1));
        let mut outer_strides = Vec::with_capacity(shape.len().saturating_sub(1));
        for (i, (&extent, &stride)) in shape.iter().zip(strides.iter()).enumerate() {
            if i != dim {
                outer_shape.push(extent);
                outer_strides.push(stride);
            }
        }
        let num_runs = outer_shape.iter().product();
        DimRuns {
            outer_shape,
            outer_strides,
            num_runs,
            run_len: shape[dim],
            dim_stride: strides[dim],
        }
    }

    pub fn num_runs(&self) -> usize {
        self.num_runs
    }

    /// Extent of the collapsed dimension: the length of every run.
    pub fn run_len(&self) -> usize {
        self.run_len
    }

    /// Stride (in elements) between consecutive run elements.
    pub fn dim_stride(&self) -> isize {
        self.dim_stride
    }

    /// Element offset of the first element of run `k`.
    pub fn run_base(&self, k: usize) -> isize {
        debug_assert!(k < self.num_runs);
        let mut rem = k;
        let mut offset = 0isize;
        for (&extent, &stride) in self
            .outer_shape
            .iter()
            .zip(self.outer_strides.iter())
            .rev()
        {
            offset += (rem % extent) as isize * stride;
            rem /= extent;
        }
        offset
    }
}

/// Invoke `f(&mut result[k], &mut index[k], run_base(k))` for every run.
///
/// Both output slices must hold exactly one slot per run. The run space is
/// split into `grain`-sized chunks; with the `parallel` feature the chunks
/// run on the rayon pool, each owning a disjoint pair of output sub-slices.
#[cfg(feature = "parallel")]
pub fn reduce_runs<R, I, F>(result: &mut [R], index: &mut [I], runs: &DimRuns, grain: usize, f: F)
where
    R: Send,
    I: Send,
    F: Fn(&mut R, &mut I, isize) + Send + Sync,
{
    assert_eq!(result.len(), runs.num_runs());
    assert_eq!(index.len(), runs.num_runs());
    let grain = grain.max(1);
    result
        .par_chunks_mut(grain)
        .zip(index.par_chunks_mut(grain))
        .enumerate()
        .for_each(|(chunk, (values, indices))| {
            let start = chunk * grain;
            for (i, (value, idx)) in values.iter_mut().zip(indices.iter_mut()).enumerate() {
                f(value, idx, runs.run_base(start + i));
            }
        });
}

#[cfg(not(feature = "parallel"))]
pub fn reduce_runs<R, I, F>(result: &mut [R], index: &mut [I], runs: &DimRuns, grain: usize, f: F)
where
    R: Send,
    I: Send,
    F: Fn(&mut R, &mut I, isize) + Send + Sync,
{
    assert_eq!(result.len(), runs.num_runs());
    assert_eq!(index.len(), runs.num_runs());
    let _ = grain;
    for (k, (value, idx)) in result.iter_mut().zip(index.iter_mut()).enumerate() {
        f(value, idx, runs.run_base(k));
    }
}

/// Maps a row-major logical linear index onto an element offset for one
/// operand. The contiguous case short-circuits to the identity.
#[derive(Debug, Clone)]
pub struct StridedIndexer {
    shape: Vec<usize>,
    strides: Vec<isize>,
    contiguous: bool,
}

impl StridedIndexer {
    pub fn new(shape: &[usize], strides: &[isize]) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        StridedIndexer {
            contiguous: strides == contiguous_strides(shape),
            shape: shape.to_vec(),
            strides: strides.to_vec(),
        }
    }

    pub fn offset(&self, linear: usize) -> usize {
        if self.contiguous {
            return linear;
        }
        let mut rem = linear;
        let mut offset = 0isize;
        for (&extent, &stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            offset += (rem % extent) as isize * stride;
            rem /= extent;
        }
        offset as usize
    }
}

/// Invoke `f(&mut out[p], p)` for every logical position `p`, chunked like
/// [`reduce_runs`]. Elementwise kernels combine this with one
/// [`StridedIndexer`] per input operand.
#[cfg(feature = "parallel")]
pub fn map_strided<O, F>(out: &mut [O], grain: usize, f: F)
where
    O: Send,
    F: Fn(&mut O, usize) + Send + Sync,
{
    let grain = grain.max(1);
    out.par_chunks_mut(grain)
        .enumerate()
        .for_each(|(chunk, slots)| {
            let start = chunk * grain;
            for (i, slot) in slots.iter_mut().enumerate() {
                f(slot, start + i);
            }
        });
}

#[cfg(not(feature = "parallel"))]
pub fn map_strided<O, F>(out: &mut [O], grain: usize, f: F)
where
    O: Send,
    F: Fn(&mut O, usize) + Send + Sync,
{
    let _ = grain;
    for (p, slot) in out.iter_mut().enumerate() {
        f(slot, p);
    }
}
