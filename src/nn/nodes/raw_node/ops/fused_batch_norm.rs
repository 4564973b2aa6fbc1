/*
 * @Description  : 融合批归一化节点（NHWC，按最后一维的通道归一化）
 *
 * 输入：x[N, H, W, C]、scale[C]、offset[C]、mean、variance
 * 输出：y、batch_mean[C]、batch_variance[C]
 *
 * 训练模式：mean/variance可为空张量[0]（也可为[C]，此时被忽略），统计量由当前批次算出；
 *   y 用有偏方差归一化，而输出的 batch_variance 是无偏估计（乘以 n/(n-1)，n = N*H*W）。
 * 推理模式：mean/variance必须为[C]，并原样作为第二、三个输出。
 */

use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::Tensor;

pub(crate) struct FusedBatchNorm {
    epsilon: f32,
    is_training: bool,
}

impl FusedBatchNorm {
    pub(crate) fn new(epsilon: f32, is_training: bool) -> Self {
        Self {
            epsilon,
            is_training,
        }
    }
}

impl TraitNode for FusedBatchNorm {
    fn kind(&self) -> &'static str {
        "FusedBatchNorm"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 5)?;
        let x = inputs[0];
        if x.len() != 4 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![4],
                got: vec![x.len()],
                message: format!("FusedBatchNorm的输入必须是NHWC四阶张量，但形状为{x:?}"),
            });
        }
        let channels = vec![x[3]];
        for (name, shape) in [("scale", inputs[1]), ("offset", inputs[2])] {
            if shape != channels.as_slice() {
                return Err(GraphError::ShapeMismatch {
                    expected: channels.clone(),
                    got: shape.to_vec(),
                    message: format!("FusedBatchNorm的{name}长度必须等于通道数"),
                });
            }
        }
        for (name, shape) in [("mean", inputs[3]), ("variance", inputs[4])] {
            let ok = shape == channels.as_slice() || (self.is_training && shape == [0]);
            if !ok {
                return Err(GraphError::ShapeMismatch {
                    expected: channels.clone(),
                    got: shape.to_vec(),
                    message: format!(
                        "FusedBatchNorm的{name}形状不合法（训练模式下允许为空张量[0]）"
                    ),
                });
            }
        }
        Ok(vec![x.to_vec(), channels.clone(), channels])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        let x = inputs[0];
        let shape = x.shape().to_vec();
        let c = shape[3];
        let n = shape[0] * shape[1] * shape[2];
        if c == 0 {
            return Err(GraphError::ComputationError(
                "FusedBatchNorm的通道数不能为0".to_string(),
            ));
        }
        let xs = x.to_vec();
        let scale = inputs[1].to_vec();
        let offset = inputs[2].to_vec();

        let (mean, variance) = if self.is_training {
            if n == 0 {
                return Err(GraphError::ComputationError(
                    "FusedBatchNorm无法对空批次求统计量".to_string(),
                ));
            }
            let mut mean = vec![0.0f32; c];
            for row in xs.chunks(c) {
                for (m, &v) in mean.iter_mut().zip(row) {
                    *m += v;
                }
            }
            mean.iter_mut().for_each(|m| *m /= n as f32);
            let mut variance = vec![0.0f32; c];
            for row in xs.chunks(c) {
                for ((s, &v), &m) in variance.iter_mut().zip(row).zip(&mean) {
                    *s += (v - m) * (v - m);
                }
            }
            variance.iter_mut().for_each(|s| *s /= n as f32);
            (mean, variance)
        } else {
            (inputs[3].to_vec(), inputs[4].to_vec())
        };

        let inv: Vec<f32> = variance
            .iter()
            .zip(&scale)
            .map(|(&v, &s)| s / (v + self.epsilon).sqrt())
            .collect();
        let mut y = Vec::with_capacity(xs.len());
        for row in xs.chunks(c) {
            for (ch, &v) in row.iter().enumerate() {
                y.push((v - mean[ch]) * inv[ch] + offset[ch]);
            }
        }

        let batch_variance = if self.is_training {
            // 只有一个样本时无偏修正无意义，保持有偏值
            let correction = if n > 1 { n as f32 / (n - 1) as f32 } else { 1.0 };
            variance.iter().map(|v| v * correction).collect()
        } else {
            variance
        };

        Ok(vec![
            Tensor::try_new(y, &shape)?,
            Tensor::try_new(mean, &[c])?,
            Tensor::try_new(batch_variance, &[c])?,
        ])
    }
}
