/*
 * @Description  : 均值与方差（数值稳定版本）
 */

use crate::nn::{Graph, GraphError, Output};

/// 沿`axes`的均值与方差
///
/// 方差按 mean((x - stop_gradient(mean))²) 计算，而非 E[x²] - E[x]²，
/// 后者在均值较大时会有严重的抵消误差。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moments {
    pub mean: Output,
    pub variance: Output,
}

impl Moments {
    /// 两次归约都保留维度以便广播；`keep_dims`为false时再把`axes`挤掉
    pub fn new(graph: &Graph, x: Output, axes: &[usize], keep_dims: bool) -> Result<Self, GraphError> {
        let mean = graph.reduce_mean(x, axes, true)?;
        let stopped = graph.stop_gradient(mean)?;
        let squared = graph.squared_difference(x, stopped)?;
        let variance = graph.reduce_mean(squared, axes, true)?;
        if keep_dims {
            return Ok(Self { mean, variance });
        }
        Ok(Self {
            mean: graph.squeeze(mean, axes)?,
            variance: graph.squeeze(variance, axes)?,
        })
    }
}
