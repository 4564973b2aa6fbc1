use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::tensor::ops::conv::conv2d_output_shape;
use crate::tensor::{Padding, Tensor};

fn image_1_to_9() -> Tensor {
    let data: Vec<f32> = (1..=9).map(|x| x as f32).collect();
    Tensor::new(&data, &[1, 3, 3, 1])
}

#[test]
fn test_padding_output_size() {
    assert_eq!(Padding::Same.output_size(7, 5, 1), Some((7, 2)));
    assert_eq!(Padding::Same.output_size(14, 5, 2), Some((7, 1)));
    assert_eq!(Padding::Same.output_size(28, 5, 2), Some((14, 1)));
    assert_eq!(Padding::Valid.output_size(7, 5, 1), Some((3, 0)));
    assert_eq!(Padding::Valid.output_size(3, 5, 1), None);
}

#[test]
fn test_conv2d_output_shape() {
    assert_eq!(
        conv2d_output_shape(&[4, 28, 28, 1], &[5, 5, 1, 64], (2, 2), Padding::Same).unwrap(),
        vec![4, 14, 14, 64]
    );
    // 通道不一致
    assert!(conv2d_output_shape(&[4, 28, 28, 3], &[5, 5, 1, 64], (2, 2), Padding::Same).is_err());
    // 阶数不对
    assert!(conv2d_output_shape(&[28, 28, 1], &[5, 5, 1, 64], (2, 2), Padding::Same).is_err());
}

#[test]
fn test_conv2d_same_stride_1() {
    let x = image_1_to_9();
    let k = Tensor::ones(&[3, 3, 1, 1]);
    let y = x.conv2d(&k, (1, 1), Padding::Same).unwrap();
    assert_eq!(y.shape(), &[1, 3, 3, 1]);
    assert_eq!(y[[0, 0, 0, 0]], 12.0);
    assert_eq!(y[[0, 1, 1, 0]], 45.0);
    assert_eq!(y[[0, 2, 2, 0]], 28.0);
}

#[test]
fn test_conv2d_same_stride_2() {
    let x = image_1_to_9();
    let k = Tensor::ones(&[3, 3, 1, 1]);
    let y = x.conv2d(&k, (2, 2), Padding::Same).unwrap();
    assert_eq!(y.shape(), &[1, 2, 2, 1]);
    assert_eq!(y.to_vec(), vec![12.0, 16.0, 24.0, 28.0]);
}

#[test]
fn test_conv2d_valid_multi_channel() {
    let x = Tensor::ones(&[2, 3, 3, 2]);
    let k = Tensor::ones(&[3, 3, 2, 4]);
    let y = x.conv2d(&k, (1, 1), Padding::Valid).unwrap();
    assert_eq!(y, Tensor::full(18.0, &[2, 1, 1, 4]));
}

/// 转置卷积是卷积的伴随：<conv(x, f), g> == <x, conv_backprop_input(f, g)>
#[test]
fn test_conv2d_backprop_input_is_adjoint() {
    let mut rng = StdRng::seed_from_u64(7);
    let input_sizes = [2, 5, 4, 3];
    let x = Tensor::normal_with_rng(0.0, 1.0, &input_sizes, &mut rng);
    let f = Tensor::normal_with_rng(0.0, 1.0, &[5, 5, 3, 2], &mut rng);
    let y = x.conv2d(&f, (2, 2), Padding::Same).unwrap();
    assert_eq!(y.shape(), &[2, 3, 2, 2]);
    let g = Tensor::normal_with_rng(0.0, 1.0, y.shape(), &mut rng);

    let dx = Tensor::conv2d_backprop_input(&input_sizes, &f, &g, (2, 2), Padding::Same).unwrap();
    assert_eq!(dx.shape(), &input_sizes);

    let lhs: f32 = y.to_vec().iter().zip(g.to_vec()).map(|(a, b)| a * b).sum();
    let rhs: f32 = x.to_vec().iter().zip(dx.to_vec()).map(|(a, b)| a * b).sum();
    assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-2);
}

#[test]
fn test_conv2d_backprop_input_shape_mismatch() {
    let f = Tensor::ones(&[5, 5, 128, 256]);
    // [1,7,7,128] 经 stride 1 卷积后应为 [1,7,7,256]
    let g = Tensor::ones(&[1, 7, 7, 128]);
    assert!(Tensor::conv2d_backprop_input(&[1, 7, 7, 128], &f, &g, (1, 1), Padding::Same).is_err());
}
