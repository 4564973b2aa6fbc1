use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::nn::{Graph, GraphError, Init, Variable};
use crate::tensor::{Padding, Tensor};

#[test]
fn test_run_broadcast_arithmetic() {
    let graph = Graph::new();
    let a = graph
        .constant(Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]))
        .unwrap();
    let b = graph.constant(Tensor::new(&[10.0, 20.0, 30.0], &[3])).unwrap();
    let sum = graph.add(a, b).unwrap();
    let diff = graph.sub(b, a).unwrap();
    let prod = graph.mul(a, b).unwrap();
    let two = graph.scalar(2.0).unwrap();
    let quot = graph.div(a, two).unwrap();
    let sq = graph.squared_difference(a, two).unwrap();

    let values = graph.run(&[sum, diff, prod, quot, sq]).unwrap();
    assert_eq!(values[0].to_vec(), vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    assert_eq!(values[1].to_vec(), vec![9.0, 18.0, 27.0, 6.0, 15.0, 24.0]);
    assert_eq!(values[2].to_vec(), vec![10.0, 40.0, 90.0, 40.0, 100.0, 180.0]);
    assert_eq!(values[3].to_vec(), vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
    assert_eq!(values[4].to_vec(), vec![1.0, 0.0, 1.0, 4.0, 9.0, 16.0]);
    assert_eq!(values[0].shape(), &[2, 3]);
}

#[test]
fn test_run_unary_and_select() {
    let graph = Graph::new();
    let x = graph.constant(Tensor::new(&[-1.5, 0.0, 4.0], &[3])).unwrap();
    let zeros = graph.zeros_like(x).unwrap();
    let ones = graph.ones_like(x).unwrap();
    let cond = graph.greater_equal(x, zeros).unwrap();
    let picked = graph.select(cond, ones, x).unwrap();
    let neg = graph.neg(x).unwrap();
    let floor = graph.floor(x).unwrap();
    let stopped = graph.stop_gradient(x).unwrap();
    let relu = graph.leaky_relu(x, 0.3).unwrap();

    let values = graph
        .run(&[zeros, cond, picked, neg, floor, stopped, relu])
        .unwrap();
    assert_eq!(values[0].to_vec(), vec![0.0, 0.0, 0.0]);
    assert_eq!(values[1].to_vec(), vec![0.0, 1.0, 1.0]);
    assert_eq!(values[2].to_vec(), vec![-1.5, 1.0, 1.0]);
    assert_eq!(values[3].to_vec(), vec![1.5, -0.0, -4.0]);
    assert_eq!(values[4].to_vec(), vec![-2.0, 0.0, 4.0]);
    assert_eq!(values[5].to_vec(), vec![-1.5, 0.0, 4.0]);
    for (got, expected) in values[6].to_vec().into_iter().zip([-0.45, 0.0, 4.0]) {
        assert_abs_diff_eq!(got, expected, epsilon = 1e-6);
    }

    let y = graph.constant(Tensor::new(&[0.0, 1.0, 4.0], &[3])).unwrap();
    let exp = graph.exp(y).unwrap();
    let log1p = graph.log1p(y).unwrap();
    let y1 = graph.constant(Tensor::new(&[1.0, 4.0, 16.0], &[3])).unwrap();
    let rsqrt = graph.rsqrt(y1).unwrap();
    let values = graph.run(&[exp, log1p, rsqrt]).unwrap();
    assert_abs_diff_eq!(values[0][[1]], std::f32::consts::E, epsilon = 1e-6);
    assert_abs_diff_eq!(values[1][[2]], 5.0f32.ln(), epsilon = 1e-6);
    assert_eq!(values[2].to_vec(), vec![1.0, 0.5, 0.25]);
}

#[test]
fn test_run_matmul_and_bias() {
    let graph = Graph::new();
    let x = graph
        .constant(Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]))
        .unwrap();
    let w = graph
        .constant(Tensor::new(&[1.0, 0.0, 1.0, 0.0, 1.0, 1.0], &[2, 3]))
        .unwrap();
    let b = graph.constant(Tensor::new(&[0.5, -0.5, 0.0], &[3])).unwrap();
    let y = graph.matmul(x, w).unwrap();
    let z = graph.bias_add(y, b).unwrap();
    let flat = graph.reshape(z, &[6]).unwrap();
    let mean = graph.reduce_mean(z, &[0], false).unwrap();

    let values = graph.run(&[z, flat, mean]).unwrap();
    assert_eq!(values[0].to_vec(), vec![1.5, 1.5, 3.0, 3.5, 3.5, 7.0]);
    assert_eq!(values[1].shape(), &[6]);
    assert_eq!(values[2].to_vec(), vec![2.5, 2.5, 5.0]);
}

#[test]
fn test_run_conv2d() {
    let graph = Graph::new();
    let data: Vec<f32> = (1..=9).map(|x| x as f32).collect();
    let image = graph.constant(Tensor::new(&data, &[1, 3, 3, 1])).unwrap();
    let filter = graph.constant(Tensor::ones(&[3, 3, 1, 1])).unwrap();
    let conv = graph.conv2d(image, filter, (2, 2), Padding::Same).unwrap();
    let values = graph.run(&[conv]).unwrap();
    assert_eq!(values[0].shape(), &[1, 2, 2, 1]);
    assert_eq!(values[0].to_vec(), vec![12.0, 16.0, 24.0, 28.0]);
}

#[test]
fn test_random_ops_memo_and_seed() {
    let graph = Graph::new_with_seed(42);
    let u = graph.random_uniform(&[4]).unwrap();
    let doubled = graph.add(u, u).unwrap();

    // 同一次执行中同一节点只抽样一次
    let first = graph.run(&[u, doubled]).unwrap();
    for (a, b) in first[0].to_vec().iter().zip(first[1].to_vec()) {
        assert_eq!(2.0 * a, b);
        assert!((0.0..1.0).contains(a));
    }
    // 每次执行重新抽样
    let second = graph.run(&[u]).unwrap();
    assert_ne!(first[0], second[0]);

    // 相同种子可复现
    let other = Graph::new_with_seed(42);
    let u2 = other.random_uniform(&[4]).unwrap();
    assert_eq!(other.run(&[u2]).unwrap()[0], first[0]);
}

#[test]
fn test_variable_lifecycle() {
    let graph = Graph::new();
    let v = Variable::new(&graph, "v", &[2], Init::Ones, false).unwrap();

    // 未初始化时读取变量是执行期错误
    assert_err!(graph.run(&[v.output()]), GraphError::UninitializedVariable("v"));
    assert_err!(v.value(&graph), GraphError::UninitializedVariable("v"));
    // 执行期错误不影响图状态
    assert!(graph.status().is_none());

    graph.initialize().unwrap();
    assert_eq!(v.value(&graph).unwrap(), Tensor::ones(&[2]));
    assert_eq!(graph.run(&[v.output()]).unwrap()[0], Tensor::ones(&[2]));

    // 非变量不能读取存储槽
    let c = graph.scalar(1.0).unwrap();
    assert_err!(graph.variable_value(c), GraphError::InvalidOperation(_));
}

#[test]
fn test_run_with_targets_order() {
    let graph = Graph::new();
    let v = Variable::new(&graph, "counter", &[2], Init::Ones, false).unwrap();
    graph.initialize().unwrap();

    let delta = graph.constant(Tensor::ones(&[2])).unwrap();
    let update = graph.assign_sub(v.output(), delta, "decrement").unwrap();

    // fetches 先于 targets 执行，所以取到的是更新前的值
    let fetched = graph.run_with_targets(&[v.output()], &[update]).unwrap();
    assert_eq!(fetched[0], Tensor::ones(&[2]));
    assert_eq!(v.value(&graph).unwrap(), Tensor::zeros(&[2]));

    let fetched = graph.run_with_targets(&[v.output()], &[update]).unwrap();
    assert_eq!(fetched[0], Tensor::zeros(&[2]));
    assert_eq!(v.value(&graph).unwrap(), Tensor::full(-1.0, &[2]));

    // 再次初始化会恢复初始值
    graph.initialize().unwrap();
    assert_eq!(v.value(&graph).unwrap(), Tensor::ones(&[2]));
}
