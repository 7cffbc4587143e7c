use super::*;
use approx::assert_relative_eq;

#[test]
fn test_standardize_zero_mean_unit_std() {
    let x = Matrix::from_rows(vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0], vec![4.0, 40.0]]).unwrap();
    let z = standardize(&x);
    let stats = Standardizer::fit(&z);
    for c in 0..2 {
        assert_relative_eq!(stats.mean()[c], 0.0, epsilon = 1e-12);
        assert_relative_eq!(stats.std()[c], 1.0, epsilon = 1e-12);
    }
    // Both columns are the same up to scale.
    assert_relative_eq!(z.get(0, 0).unwrap(), z.get(0, 1).unwrap(), epsilon = 1e-12);
}

#[test]
fn test_constant_column_is_only_centred() {
    let x = Matrix::from_rows(vec![vec![5.0, 1.0], vec![5.0, 3.0]]).unwrap();
    let z = standardize(&x);
    assert_eq!(z.data(), &[0.0, -1.0, 0.0, 1.0]);
}

#[test]
fn test_fit_then_transform_new_rows() {
    let train = Matrix::column(vec![0.0, 2.0, 4.0]);
    let stats = Standardizer::fit(&train);
    assert_relative_eq!(stats.mean()[0], 2.0);
    let z = stats.transform(&Matrix::column(vec![2.0])).unwrap();
    assert_relative_eq!(z.item().unwrap(), 0.0);
    assert!(stats.transform(&Matrix::zeros(1, 2)).is_err());
}
