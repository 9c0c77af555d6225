//! End-to-end checks that cross the crate's module seams: reductions over
//! every dimension of a 3-d array against a naive reference, strided views
//! feeding each kernel, and kernels chained through shared output arrays.

use num_complex::Complex64;

use stridemat_array::{DType, NdArray};
use stridemat_kernels::{is_neg_inf, is_pos_inf, max_dim, min_dim, where_cond};

/// Naive reference: reduce `dim` of a dense f64 array with the same
/// first-occurrence and NaN rules the kernels promise.
fn naive_min(input: &NdArray, dim: usize) -> (Vec<f64>, Vec<i64>) {
    let shape = input.shape().to_vec();
    let mut out_shape = shape.clone();
    out_shape[dim] = 1;
    let num_runs: usize = out_shape.iter().product();

    let mut values = Vec::with_capacity(num_runs);
    let mut indices = Vec::with_capacity(num_runs);
    for k in 0..num_runs {
        // Decode k against out_shape, row-major.
        let mut coords = vec![0usize; shape.len()];
        let mut rem = k;
        for d in (0..shape.len()).rev() {
            coords[d] = rem % out_shape[d];
            rem /= out_shape[d];
        }
        let mut best = f64::INFINITY;
        let mut best_index = 0i64;
        let mut frozen = false;
        for i in 0..shape[dim] {
            coords[dim] = i;
            let v = input.get::<f64>(&coords).unwrap();
            if !frozen && !(v >= best) {
                best = v;
                best_index = i as i64;
                frozen = v.is_nan();
            }
        }
        values.push(best);
        indices.push(best_index);
    }
    (values, indices)
}

fn eq_with_nan(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

#[test]
fn min_matches_naive_reference_over_every_dimension() {
    // Pseudo-random but reproducible contents, with a few NaNs planted.
    let mut data: Vec<f64> = (0..210).map(|v| ((v * 73 + 11) % 47) as f64).collect();
    data[13] = f64::NAN;
    data[100] = f64::NAN;
    data[209] = f64::NAN;
    let input = NdArray::from_vec(data, vec![5, 6, 7]).unwrap();

    for dim in 0..3 {
        let (expected_v, expected_i) = naive_min(&input, dim);
        let mut result = NdArray::empty(DType::F64);
        let mut index = NdArray::empty(DType::I64);
        min_dim(&mut result, &mut index, &input, dim as isize, true).unwrap();
        assert!(eq_with_nan(result.as_slice::<f64>().unwrap(), &expected_v));
        assert_eq!(index.as_slice::<i64>().unwrap(), &expected_i[..]);
    }
}

#[test]
fn max_of_negated_input_mirrors_min() {
    let data: Vec<f64> = (0..24).map(|v| ((v * 31) % 13) as f64).collect();
    let negated: Vec<f64> = data.iter().map(|v| -v).collect();
    let input = NdArray::from_vec(data, vec![4, 6]).unwrap();
    let mirror = NdArray::from_vec(negated, vec![4, 6]).unwrap();

    let mut min_r = NdArray::empty(DType::F64);
    let mut min_i = NdArray::empty(DType::I64);
    min_dim(&mut min_r, &mut min_i, &input, 1, false).unwrap();

    let mut max_r = NdArray::empty(DType::F64);
    let mut max_i = NdArray::empty(DType::I64);
    max_dim(&mut max_r, &mut max_i, &mirror, 1, false).unwrap();

    let negated_max: Vec<f64> = max_r
        .as_slice::<f64>()
        .unwrap()
        .iter()
        .map(|v| -v)
        .collect();
    assert_eq!(min_r.as_slice::<f64>().unwrap(), &negated_max[..]);
    assert_eq!(min_i, max_i);
}

#[test]
fn transposed_view_reduces_like_its_dense_copy() {
    let data: Vec<f64> = (0..30).map(|v| ((v * 17 + 3) % 23) as f64).collect();
    let base = NdArray::from_vec(data, vec![5, 6]).unwrap();
    let view = base.transposed(0, 1).unwrap(); // logical [6, 5]

    // Densify the view through get().
    let mut dense_data = Vec::with_capacity(30);
    for i in 0..6 {
        for j in 0..5 {
            dense_data.push(view.get::<f64>(&[i, j]).unwrap());
        }
    }
    let dense = NdArray::from_vec(dense_data, vec![6, 5]).unwrap();

    for dim in 0..2isize {
        for keep_dim in [false, true] {
            let mut vr = NdArray::empty(DType::F64);
            let mut vi = NdArray::empty(DType::I64);
            max_dim(&mut vr, &mut vi, &view, dim, keep_dim).unwrap();

            let mut dr = NdArray::empty(DType::F64);
            let mut di = NdArray::empty(DType::I64);
            max_dim(&mut dr, &mut di, &dense, dim, keep_dim).unwrap();

            assert_eq!(vr, dr);
            assert_eq!(vi, di);
        }
    }
}

#[test]
fn complex_min_prefers_the_earliest_smallest_modulus() {
    // |3+4i| = 5, |5| = 5, |0+5i| = 5: a three-way modulus tie.
    let input = NdArray::from_vec(
        vec![
            Complex64::new(3.0, 4.0),
            Complex64::new(5.0, 0.0),
            Complex64::new(0.0, 5.0),
        ],
        vec![3],
    )
    .unwrap();
    let mut result = NdArray::empty(DType::C128);
    let mut index = NdArray::empty(DType::I64);
    min_dim(&mut result, &mut index, &input, 0, false).unwrap();
    assert_eq!(
        result.as_slice::<Complex64>().unwrap(),
        &[Complex64::new(3.0, 4.0)]
    );
    assert_eq!(index.as_slice::<i64>().unwrap(), &[0]);
}

#[test]
fn argmin_indices_gather_the_reduced_values() {
    // Cross-check value and index outputs against each other: walking back
    // through the reported index must land on the reported value.
    let data: Vec<f64> = (0..40).map(|v| ((v * 7 + 5) % 19) as f64).collect();
    let input = NdArray::from_vec(data, vec![8, 5]).unwrap();
    let mut result = NdArray::empty(DType::F64);
    let mut index = NdArray::empty(DType::I64);
    min_dim(&mut result, &mut index, &input, 1, false).unwrap();

    let values = result.as_slice::<f64>().unwrap();
    let indices = index.as_slice::<i64>().unwrap();
    for row in 0..8 {
        let picked = input.get::<f64>(&[row, indices[row] as usize]).unwrap();
        assert_eq!(picked, values[row]);
    }
}

#[test]
fn select_can_splice_reduction_results() {
    // min over rows, then use a mask to splice minima and maxima together.
    let data: Vec<f64> = vec![4.0, 9.0, 2.0, 7.0, 6.0, 1.0];
    let input = NdArray::from_vec(data, vec![3, 2]).unwrap();

    let mut mins = NdArray::empty(DType::F64);
    let mut maxs = NdArray::empty(DType::F64);
    let mut index = NdArray::empty(DType::I64);
    min_dim(&mut mins, &mut index, &input, 1, false).unwrap();
    max_dim(&mut maxs, &mut index, &input, 1, false).unwrap();

    let cond = NdArray::from_vec(vec![true, false, true], vec![3]).unwrap();
    let mut out = NdArray::empty(DType::F64);
    where_cond(&mut out, &cond, &mins, &maxs).unwrap();
    assert_eq!(out.as_slice::<f64>().unwrap(), &[4.0, 7.0, 1.0]);
}

#[test]
fn infinity_masks_partition_an_overflowing_reduction() {
    let input = NdArray::from_vec(
        vec![f64::INFINITY, 1.0, f64::NEG_INFINITY, 2.0],
        vec![2, 2],
    )
    .unwrap();

    let mut maxs = NdArray::empty(DType::F64);
    let mut index = NdArray::empty(DType::I64);
    max_dim(&mut maxs, &mut index, &input, 1, false).unwrap();

    let mut pos = NdArray::empty(DType::Bool);
    let mut neg = NdArray::empty(DType::Bool);
    is_pos_inf(&mut pos, &maxs).unwrap();
    is_neg_inf(&mut neg, &maxs).unwrap();
    assert_eq!(pos.as_slice::<bool>().unwrap(), &[true, false]);
    assert_eq!(neg.as_slice::<bool>().unwrap(), &[false, false]);
}

#[test]
fn outputs_are_reusable_across_same_rank_inputs() {
    let first = NdArray::from_vec((0..24).map(|v| v as f64).collect(), vec![2, 3, 4]).unwrap();
    let second = NdArray::from_vec((0..12).map(|v| (11 - v) as f64).collect(), vec![3, 2, 2])
        .unwrap();

    let mut result = NdArray::empty(DType::F64);
    let mut index = NdArray::empty(DType::I64);
    min_dim(&mut result, &mut index, &first, 2, true).unwrap();
    assert_eq!(result.shape(), &[2, 3, 1]);
    assert_eq!(
        result.as_slice::<f64>().unwrap(),
        &[0.0, 4.0, 8.0, 12.0, 16.0, 20.0]
    );
    assert!(index.as_slice::<i64>().unwrap().iter().all(|&i| i == 0));

    // The same output arrays then serve a reduction with a new shape.
    min_dim(&mut result, &mut index, &second, 0, true).unwrap();
    assert_eq!(result.shape(), &[1, 2, 2]);
    assert_eq!(result.as_slice::<f64>().unwrap(), &[3.0, 2.0, 1.0, 0.0]);
    assert!(index.as_slice::<i64>().unwrap().iter().all(|&i| i == 2));
}

#[test]
fn rank_incompatible_output_reuse_is_an_error() {
    let vector = NdArray::from_vec(vec![2.0f64, 1.0], vec![2]).unwrap();
    let cube = NdArray::from_vec((0..24).map(|v| v as f64).collect(), vec![2, 3, 4]).unwrap();

    let mut result = NdArray::empty(DType::F64);
    let mut index = NdArray::empty(DType::I64);
    min_dim(&mut result, &mut index, &vector, 0, false).unwrap();
    // A rank-1 input reduced without keep_dim leaves a scalar.
    assert_eq!(result.rank(), 0);
    assert_eq!(result.as_slice::<f64>().unwrap(), &[1.0]);
    assert_eq!(index.as_slice::<i64>().unwrap(), &[1]);

    // A scalar output cannot be reinterpreted for a rank-3 input.
    assert!(min_dim(&mut result, &mut index, &cube, 2, true).is_err());
}
