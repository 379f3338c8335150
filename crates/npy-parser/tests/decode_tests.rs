//! Integration tests for `.npy` decoding against files produced by the
//! reference writer in `test-utils`.

use npy_parser::{decode, decode_file, DType, NestedArray, NpyError};
use test_utils::{
    npy_bytes, npy_bytes_with_order, npy_f64_rows, npy_from_parts, npy_header, write_npy_file,
    NpyValues,
};

fn row_major_indices(shape: &[usize]) -> Vec<Vec<usize>> {
    let total: usize = shape.iter().product();
    (0..total)
        .map(|mut flat| {
            let mut idx = vec![0; shape.len()];
            for d in (0..shape.len()).rev() {
                idx[d] = flat % shape[d];
                flat /= shape[d];
            }
            idx
        })
        .collect()
}

#[test]
fn test_every_dtype_matches_written_values() {
    let cases = vec![
        NpyValues::F8(vec![1.5, -2.25, 1e300, 0.0, -0.0, 7.0]),
        NpyValues::F4(vec![1.5, -2.25, 3.0e38, 0.0, 0.5, 7.0]),
        NpyValues::I4(vec![i32::MIN, -1, 0, 1, 2, i32::MAX]),
        NpyValues::I2(vec![i16::MIN, -1, 0, 1, 2, i16::MAX]),
        NpyValues::I1(vec![i8::MIN, -1, 0, 1, 2, i8::MAX]),
        NpyValues::U4(vec![0, 1, 2, 3, 4, u32::MAX]),
        NpyValues::U2(vec![0, 1, 2, 3, 4, u16::MAX]),
        NpyValues::U1(vec![0, 1, 2, 3, 4, u8::MAX]),
    ];

    for values in cases {
        let shape = [2, 3];
        let tensor = decode(npy_bytes(&values, &shape)).unwrap();
        assert_eq!(tensor.dtype().descr(), values.descr());
        assert_eq!(tensor.shape(), &shape);

        let expected = values.as_f64();
        for (flat, idx) in row_major_indices(&shape).iter().enumerate() {
            assert_eq!(tensor.at(idx).unwrap(), expected[flat], "{} at {:?}", values.descr(), idx);
        }
    }
}

#[test]
fn test_rank3_at_is_row_major() {
    let shape = [2, 3, 4];
    let values: Vec<i32> = (0..24).collect();
    let tensor = decode(npy_bytes(&NpyValues::I4(values), &shape)).unwrap();

    for (flat, idx) in row_major_indices(&shape).iter().enumerate() {
        assert_eq!(tensor.at(idx).unwrap(), flat as f64);
    }
    assert_eq!(tensor.at(&[1, 2, 3]).unwrap(), 23.0);
    assert_eq!(tensor.at(&[1, 0, 0]).unwrap(), 12.0);
}

#[test]
fn test_to_array_2x3() {
    let tensor = decode(npy_f64_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])).unwrap();
    assert_eq!(tensor.dtype(), DType::F8);
    assert_eq!(
        tensor.to_array().unwrap(),
        NestedArray::D2(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
    );
}

#[test]
fn test_scalar_rank0() {
    let tensor = decode(npy_bytes(&NpyValues::F8(vec![42.0]), &[])).unwrap();
    assert_eq!(tensor.rank(), 0);
    assert_eq!(tensor.len(), 1);
    assert_eq!(tensor.at(&[]).unwrap(), 42.0);
    assert_eq!(tensor.to_array().unwrap(), NestedArray::Scalar(42.0));
}

#[test]
fn test_one_element_vector() {
    let tensor = decode(npy_bytes(&NpyValues::I2(vec![-7]), &[1])).unwrap();
    assert_eq!(tensor.to_array().unwrap(), NestedArray::D1(vec![-7.0]));
}

#[test]
fn test_empty_dimension() {
    let tensor = decode(npy_bytes(&NpyValues::F4(vec![]), &[0, 5])).unwrap();
    assert!(tensor.is_empty());
    assert_eq!(tensor.to_array().unwrap(), NestedArray::D2(vec![]));
}

#[test]
fn test_zero_width_rows_are_kept() {
    let tensor = decode(npy_bytes(&NpyValues::F8(vec![]), &[3, 0])).unwrap();
    assert_eq!(
        tensor.to_array().unwrap(),
        NestedArray::D2(vec![vec![], vec![], vec![]])
    );

    let tensor = decode(npy_bytes(&NpyValues::U1(vec![]), &[2, 3, 0])).unwrap();
    assert_eq!(
        tensor.to_array().unwrap(),
        NestedArray::D3(vec![vec![vec![], vec![], vec![]], vec![vec![], vec![], vec![]]])
    );
}

#[test]
fn test_to_array_agrees_with_at() {
    for shape in [vec![5], vec![3, 4], vec![2, 3, 4], vec![4, 1, 2]] {
        let n: usize = shape.iter().product();
        let values: Vec<f64> = (0..n).map(|i| i as f64 * 0.5 - 3.0).collect();
        let tensor = decode(npy_bytes(&NpyValues::F8(values), &shape)).unwrap();
        let nested = tensor.to_array().unwrap();

        let mut visited = 0;
        for idx in row_major_indices(&shape) {
            let element = match (&nested, idx.as_slice()) {
                (NestedArray::D1(v), [i]) => v[*i],
                (NestedArray::D2(v), [i, j]) => v[*i][*j],
                (NestedArray::D3(v), [i, j, k]) => v[*i][*j][*k],
                (other, _) => panic!("unexpected nesting {:?} for shape {:?}", other, shape),
            };
            assert_eq!(element, tensor.at(&idx).unwrap(), "{:?} at {:?}", shape, idx);
            visited += 1;
        }
        assert_eq!(visited, n);

        // nesting depth and lengths follow the shape
        match &nested {
            NestedArray::D1(v) => assert_eq!(v.len(), shape[0]),
            NestedArray::D2(v) => {
                assert_eq!(v.len(), shape[0]);
                assert!(v.iter().all(|row| row.len() == shape[1]));
            }
            NestedArray::D3(v) => {
                assert_eq!(v.len(), shape[0]);
                assert!(v.iter().all(|plane| plane.len() == shape[1]
                    && plane.iter().all(|row| row.len() == shape[2])));
            }
            NestedArray::Scalar(_) => panic!("rank {} became a scalar", shape.len()),
        }
    }
}

#[test]
fn test_rank4_decodes_but_cannot_convert() {
    let tensor = decode(npy_bytes(&NpyValues::U1(vec![0; 16]), &[2, 2, 2, 2])).unwrap();
    assert_eq!(tensor.at(&[1, 1, 1, 1]).unwrap(), 0.0);
    assert!(matches!(tensor.to_array(), Err(NpyError::UnsupportedRank(4))));
}

#[test]
fn test_fortran_order_rejected() {
    let bytes = npy_bytes_with_order(&NpyValues::F8(vec![1.0, 2.0]), &[2], true);
    let err = decode(bytes).unwrap_err();
    assert!(matches!(err, NpyError::Format(ref msg) if msg.contains("fortran")));
}

#[test]
fn test_truncated_payload_rejected() {
    let mut bytes = npy_bytes(&NpyValues::F8(vec![1.0, 2.0, 3.0]), &[3]);
    bytes.pop();
    assert!(matches!(decode(bytes), Err(NpyError::Format(_))));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = npy_bytes(&NpyValues::U1(vec![1, 2]), &[2]);
    bytes.push(0);
    assert!(matches!(decode(bytes), Err(NpyError::Format(_))));
}

#[test]
fn test_version_2_rejected() {
    let header = npy_header("<f8", false, &[1]);
    let bytes = npy_from_parts(2, 0, &header, &1.0f64.to_le_bytes());
    assert!(matches!(decode(bytes), Err(NpyError::Format(_))));
}

#[test]
fn test_big_endian_rejected() {
    let header = npy_header(">f8", false, &[1]);
    let bytes = npy_from_parts(1, 0, &header, &1.0f64.to_be_bytes());
    assert!(matches!(decode(bytes), Err(NpyError::Format(_))));
}

#[test]
fn test_wrong_index_count() {
    let tensor = decode(npy_bytes(&NpyValues::U1(vec![1, 2, 3, 4]), &[2, 2])).unwrap();
    assert!(matches!(tensor.at(&[0]), Err(NpyError::Index(_))));
    assert!(matches!(tensor.at(&[0, 0, 0]), Err(NpyError::Index(_))));
    assert!(matches!(tensor.at(&[0, 2]), Err(NpyError::Index(_))));
}

#[test]
fn test_decode_is_deterministic() {
    let bytes = npy_bytes(&NpyValues::I4(vec![5, 6, 7, 8]), &[2, 2]);
    assert_eq!(decode(bytes.clone()).unwrap(), decode(bytes).unwrap());
}

#[test]
fn test_flow_file_splits_into_planes() {
    let u = vec![0.1, 0.2, 0.3, 0.4];
    let v = vec![-0.1, -0.2, -0.3, -0.4];
    let flat: Vec<f64> = u.iter().chain(v.iter()).copied().collect();
    let tensor = decode(npy_bytes(&NpyValues::F8(flat), &[2, 2, 2])).unwrap();

    let planes = tensor.to_grids().unwrap();
    assert_eq!(planes.len(), 2);
    assert_eq!(planes[0].values(), u.as_slice());
    assert_eq!(planes[1].values(), v.as_slice());
}

#[test]
fn test_decode_file() {
    let bytes = npy_f64_rows(&[vec![12.5, f64::NAN]]);
    let (_dir, path) = write_npy_file("temperature/2022-02-14 18.npy", &bytes).unwrap();

    let tensor = decode_file(&path).unwrap();
    assert_eq!(tensor.at(&[0, 0]).unwrap(), 12.5);
    assert!(tensor.at(&[0, 1]).unwrap().is_nan());
}

#[test]
fn test_decode_missing_file() {
    let err = decode_file("/nonexistent/snapshot.npy").unwrap_err();
    assert!(matches!(err, NpyError::Io(_)));
}
