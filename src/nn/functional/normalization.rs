use crate::nn::{Graph, GraphError, Output};

/// 按给定统计量归一化：
/// inv = rsqrt(variance + epsilon) * scale；
/// output = x * inv + (offset - mean * inv)。
///
/// 运算顺序固定如上，不要改写成 (x - mean) * inv + offset，两者的浮点结果不同。
pub fn batch_normalization(
    graph: &Graph,
    x: Output,
    mean: Output,
    variance: Output,
    offset: Output,
    scale: Output,
    epsilon: f32,
) -> Result<Output, GraphError> {
    let eps = graph.scalar(epsilon)?;
    let shifted_variance = graph.add(variance, eps)?;
    let rsqrt = graph.rsqrt(shifted_variance)?;
    let inv = graph.mul(rsqrt, scale)?;

    let scaled_x = graph.mul(x, inv)?;
    let scaled_mean = graph.mul(mean, inv)?;
    let shift = graph.sub(offset, scaled_mean)?;
    graph.add(scaled_x, shift)
}
