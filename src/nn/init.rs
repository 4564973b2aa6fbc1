/*
 * @Description  : 变量初始化策略：在图上发射计算初始值的节点
 */

use crate::nn::{Graph, GraphError, Output};
use crate::tensor::Tensor;

/// 参数初始化策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// Glorot/Xavier 均匀分布：U(-limit, limit)，limit = sqrt(3 / max(1, (fan_in + fan_out) / 2))
    GlorotUniform,
    /// 标准正态乘以给定系数
    ScaledNormal(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
}

impl Init {
    /// 在`graph`上发射计算初始值的节点，返回初始值输出
    pub fn build(&self, graph: &Graph, shape: &[usize]) -> Result<Output, GraphError> {
        match self {
            Self::GlorotUniform => {
                let limit = graph.record(Self::glorot_limit(shape))?;
                let (minval, maxval) = (-limit, limit);
                let uniform = graph.random_uniform(shape)?;
                let range = graph.scalar(maxval - minval)?;
                let scaled = graph.mul(uniform, range)?;
                let offset = graph.scalar(minval)?;
                graph.add(scaled, offset)
            }
            Self::ScaledNormal(scale) => {
                let normal = graph.random_normal(shape)?;
                let scale = graph.scalar(*scale)?;
                graph.mul(normal, scale)
            }
            Self::Zeros => graph.constant(Tensor::zeros(shape)),
            Self::Ones => graph.constant(Tensor::ones(shape)),
        }
    }

    /// 计算(fan_in, fan_out)。
    /// 二阶：[in, out]；四阶卷积核：[kH, kW, in, out]，感受野大小 kH*kW 分别乘到两侧。
    pub fn fans(shape: &[usize]) -> Result<(usize, usize), GraphError> {
        match *shape {
            [fan_in, fan_out] => Ok((fan_in, fan_out)),
            [kh, kw, input, output] => {
                let receptive = kh * kw;
                Ok((receptive * input, receptive * output))
            }
            _ => Err(GraphError::UnsupportedShape {
                shape: shape.to_vec(),
                message: "Glorot初始化只支持二阶（全连接）或四阶（卷积核）形状".to_string(),
            }),
        }
    }

    /// Glorot 均匀分布的边界
    pub fn glorot_limit(shape: &[usize]) -> Result<f32, GraphError> {
        let (fan_in, fan_out) = Self::fans(shape)?;
        let scale = 1.0 / f32::max(1.0, (fan_in + fan_out) as f32 / 2.0);
        Ok((3.0 * scale).sqrt())
    }
}
