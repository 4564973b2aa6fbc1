use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::nn::layer::{BatchNormalization, FusedBatchNorm};
use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;

const EPSILON: f32 = 1e-3;

fn input_2x2(graph: &Graph) -> crate::nn::Output {
    graph
        .constant(Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]))
        .unwrap()
}

/// NHWC：[1, 2, 2, 2]，通道0为1,3,5,7，通道1为2,4,6,8
fn input_nhwc(graph: &Graph) -> crate::nn::Output {
    let data: Vec<f32> = (1..=8).map(|x| x as f32).collect();
    graph.constant(Tensor::new(&data, &[1, 2, 2, 2])).unwrap()
}

#[test]
fn test_batch_norm_state() {
    let graph = Graph::new();
    let bn = BatchNormalization::new(&graph, &[2], 0.8).unwrap();
    let state = bn.state();
    assert!(!state.moving_mean.is_trainable());
    assert!(!state.moving_variance.is_trainable());
    assert!(state.scale.is_trainable());
    assert!(state.shift.is_trainable());
    assert_eq!(state.scale.name(), "gamma");
    assert_eq!(state.shift.name(), "beta");
    assert_eq!(graph.trainable_variables().len(), 2);

    graph.initialize().unwrap();
    assert_eq!(state.moving_mean.value(&graph).unwrap(), Tensor::zeros(&[2]));
    assert_eq!(state.moving_variance.value(&graph).unwrap(), Tensor::zeros(&[2]));
    assert_eq!(state.scale.value(&graph).unwrap(), Tensor::ones(&[2]));
    assert_eq!(state.shift.value(&graph).unwrap(), Tensor::zeros(&[2]));
}

#[test]
fn test_batch_norm_inference_with_fresh_state() {
    let graph = Graph::new();
    let bn = BatchNormalization::new(&graph, &[2], 0.8).unwrap();
    graph.initialize().unwrap();

    let x = input_2x2(&graph);
    let out = bn.build(&graph, x, &[0], EPSILON, false).unwrap();
    // 推理模式不登记更新节点
    assert!(graph.update_ops().is_empty());

    let value = &graph.run(&[out]).unwrap()[0];
    let inv = (1.0 / (0.0f32 + EPSILON).sqrt()) * 1.0;
    let expected: Vec<f32> = [1.0f32, 2.0, 3.0, 4.0]
        .iter()
        .map(|x| x * inv + (0.0 - 0.0 * inv))
        .collect();
    assert_eq!(value.to_vec(), expected);
}

#[test]
fn test_batch_norm_training_updates() {
    let graph = Graph::new();
    let bn = BatchNormalization::new(&graph, &[2], 0.8).unwrap();
    graph.initialize().unwrap();

    let x = input_2x2(&graph);
    let out = bn.build(&graph, x, &[0], EPSILON, true).unwrap();
    let updates = graph.update_ops();
    assert_eq!(updates.len(), 2);
    assert_eq!(graph.node_name(updates[0].node()).unwrap(), "update_moving_mean");
    assert_eq!(graph.node_name(updates[1].node()).unwrap(), "update_moving_variance");

    // 批均值[2, 3]，批方差（有偏）[1, 1]
    let value = &graph.run_with_targets(&[out], &updates).unwrap()[0];
    let inv = 1.0 / (1.0f32 + EPSILON).sqrt();
    for (got, expected) in value.to_vec().into_iter().zip([-inv, -inv, inv, inv]) {
        assert_abs_diff_eq!(got, expected, epsilon = 1e-5);
    }

    // moving -= (moving - batch) * (1 - momentum)
    let state = bn.state();
    let mean = state.moving_mean.value(&graph).unwrap().to_vec();
    let variance = state.moving_variance.value(&graph).unwrap().to_vec();
    assert_abs_diff_eq!(mean[0], 0.4, epsilon = 1e-6);
    assert_abs_diff_eq!(mean[1], 0.6, epsilon = 1e-6);
    assert_abs_diff_eq!(variance[0], 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(variance[1], 0.2, epsilon = 1e-6);

    // 第二次更新：0.4 - (0.4 - 2) * 0.2 = 0.72
    graph.run_with_targets(&[], &updates).unwrap();
    let mean = state.moving_mean.value(&graph).unwrap().to_vec();
    assert_abs_diff_eq!(mean[0], 0.72, epsilon = 1e-6);
}

#[test]
fn test_batch_norm_build_reuses_state() {
    let graph = Graph::new();
    let bn = BatchNormalization::new(&graph, &[2], 0.8).unwrap();
    let x = input_2x2(&graph);
    let trainables = graph.trainable_variables();

    bn.build(&graph, x, &[0], EPSILON, true).unwrap();
    bn.build(&graph, x, &[0], EPSILON, true).unwrap();
    bn.build(&graph, x, &[0], EPSILON, false).unwrap();
    assert_eq!(graph.trainable_variables(), trainables);
    assert_eq!(graph.update_ops().len(), 4);
}

#[test]
fn test_batch_norm_zero_momentum_parity() {
    // momentum = 0 时滑动统计量就是上一批的统计量，推理输出应与训练输出一致
    let graph = Graph::new();
    let bn = BatchNormalization::new(&graph, &[2], 0.0).unwrap();
    graph.initialize().unwrap();
    let x = input_2x2(&graph);

    let train_out = bn.build(&graph, x, &[0], EPSILON, true).unwrap();
    let train_value = graph
        .run_with_targets(&[train_out], &graph.update_ops())
        .unwrap()
        .remove(0);

    let infer_out = bn.build(&graph, x, &[0], EPSILON, false).unwrap();
    let infer_value = graph.run(&[infer_out]).unwrap().remove(0);
    for (a, b) in train_value.to_vec().into_iter().zip(infer_value.to_vec()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-5);
    }
}

#[test]
fn test_batch_norm_invalid_momentum() {
    let graph = Graph::new();
    assert_err!(
        BatchNormalization::new(&graph, &[2], 1.5),
        GraphError::InvalidConfig(msg) if msg.contains("momentum")
    );
    assert!(graph.status().is_some());
}

#[test]
fn test_fused_batch_norm_training() {
    let graph = Graph::new();
    let bn = FusedBatchNorm::new(&graph, &[2], 0.8).unwrap();
    assert_eq!(bn.state().scale.name(), "fused_gamma");
    assert_eq!(bn.state().shift.name(), "fused_beta");
    graph.initialize().unwrap();

    let x = input_nhwc(&graph);
    let y = bn.build(&graph, x, EPSILON, true).unwrap();
    assert_eq!(graph.shape_of(y).unwrap(), vec![1, 2, 2, 2]);
    let updates = graph.update_ops();
    assert_eq!(updates.len(), 2);
    assert_eq!(graph.node_name(updates[0].node()).unwrap(), "fused_update_moving_mean");
    assert_eq!(graph.node_name(updates[1].node()).unwrap(), "fused_update_moving_variance");

    let value = graph.run_with_targets(&[y], &updates).unwrap().remove(0);
    let data = value.to_vec();
    // 每个通道归一化后均值为0，且用有偏方差5归一化
    let inv = 1.0 / (5.0f32 + EPSILON).sqrt();
    for channel in 0..2 {
        let values: Vec<f32> = data.iter().skip(channel).step_by(2).copied().collect();
        assert_abs_diff_eq!(values.iter().sum::<f32>() / 4.0, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(values[0], -3.0 * inv, epsilon = 1e-5);
    }

    // 滑动方差用无偏估计更新：(1 - 0.8) * 20 / 3
    let state = bn.state();
    let mean = state.moving_mean.value(&graph).unwrap().to_vec();
    let variance = state.moving_variance.value(&graph).unwrap().to_vec();
    assert_abs_diff_eq!(mean[0], 0.8, epsilon = 1e-5);
    assert_abs_diff_eq!(mean[1], 1.0, epsilon = 1e-5);
    for v in variance {
        assert_abs_diff_eq!(v, 0.2 * 20.0 / 3.0, epsilon = 1e-5);
    }
}

#[test]
fn test_fused_batch_norm_inference() {
    let graph = Graph::new();
    let bn = FusedBatchNorm::new(&graph, &[2], 0.8).unwrap();
    graph.initialize().unwrap();

    let x = input_nhwc(&graph);
    let y = bn.build(&graph, x, EPSILON, false).unwrap();
    assert!(graph.update_ops().is_empty());

    let value = graph.run(&[y]).unwrap().remove(0);
    let inv = 1.0 / EPSILON.sqrt();
    for (i, got) in value.to_vec().into_iter().enumerate() {
        assert_abs_diff_eq!(got, (i + 1) as f32 * inv, epsilon = 1e-3);
    }
}

#[test]
fn test_fused_batch_norm_rejects_non_nhwc() {
    let graph = Graph::new();
    let bn = FusedBatchNorm::new(&graph, &[2], 0.8).unwrap();
    let x = input_2x2(&graph);
    assert_err!(
        bn.build(&graph, x, EPSILON, true),
        GraphError::ShapeMismatch([4], [2])
    );
}
