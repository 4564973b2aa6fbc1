use approx::assert_abs_diff_eq;

use crate::nn::Graph;
use crate::nn::layer::Moments;
use crate::tensor::Tensor;

#[test]
fn test_moments_values() {
    let graph = Graph::new();
    let x = graph
        .constant(Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]))
        .unwrap();
    let moments = Moments::new(&graph, x, &[0], false).unwrap();
    assert_eq!(graph.shape_of(moments.mean).unwrap(), vec![2]);
    assert_eq!(graph.shape_of(moments.variance).unwrap(), vec![2]);

    let values = graph.run(&[moments.mean, moments.variance]).unwrap();
    assert_eq!(values[0].to_vec(), vec![3.0, 4.0]);
    for v in values[1].to_vec() {
        assert_abs_diff_eq!(v, 8.0 / 3.0, epsilon = 1e-6);
    }
}

#[test]
fn test_moments_keep_dims() {
    let graph = Graph::new();
    let x = graph.constant(Tensor::zeros(&[2, 4, 4, 3])).unwrap();
    let moments = Moments::new(&graph, x, &[0, 1, 2], true).unwrap();
    assert_eq!(graph.shape_of(moments.mean).unwrap(), vec![1, 1, 1, 3]);
    assert_eq!(graph.shape_of(moments.variance).unwrap(), vec![1, 1, 1, 3]);

    let squeezed = Moments::new(&graph, x, &[0, 1, 2], false).unwrap();
    assert_eq!(graph.shape_of(squeezed.mean).unwrap(), vec![3]);
}

#[test]
fn test_moments_of_constant_tensor() {
    // 大常数输入：方差必须恰好为0，而不是 E[x²] - E[x]² 的抵消误差
    let graph = Graph::new();
    let x = graph.constant(Tensor::full(1000.5, &[8, 5])).unwrap();
    let moments = Moments::new(&graph, x, &[0], false).unwrap();
    let values = graph.run(&[moments.mean, moments.variance]).unwrap();
    assert_eq!(values[0], Tensor::full(1000.5, &[5]));
    assert_eq!(values[1], Tensor::zeros(&[5]));
}
