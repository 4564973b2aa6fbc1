use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_reshape() {
    let t = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let r = t.reshape(&[3, 2]).unwrap();
    assert_eq!(r, Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]));
    assert!(t.reshape(&[4, 2]).is_err());
}

#[test]
fn test_squeeze() {
    let t = Tensor::zeros(&[1, 3, 1]);
    assert_eq!(t.squeeze(&[0, 2]).unwrap().shape(), &[3]);
    assert_eq!(t.squeeze(&[2]).unwrap().shape(), &[1, 3]);
    assert_eq!(
        t.squeeze(&[1]),
        Err(TensorError::NotUnitAxis { axis: 1, len: 3 })
    );
    assert_eq!(
        t.squeeze(&[3]),
        Err(TensorError::InvalidAxis { axis: 3, rank: 3 })
    );
}

#[test]
#[should_panic]
fn test_new_with_wrong_length() {
    let _ = Tensor::new(&[1.0, 2.0, 3.0], &[2, 2]);
}
