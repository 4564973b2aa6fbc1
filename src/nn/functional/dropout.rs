use crate::nn::{Graph, GraphError, Output};

/// 随机失活：keep_prob = 1 - rate；mask = floor(U[0,1) + keep_prob)；
/// 输出 = (x / keep_prob) * mask。
///
/// `rate`必须在[0, 1)内。`rate = 0`时输出与输入逐元素完全相同。
pub fn dropout(graph: &Graph, x: Output, rate: f32) -> Result<Output, GraphError> {
    let checked = if (0.0..1.0).contains(&rate) {
        Ok(1.0 - rate)
    } else {
        Err(GraphError::InvalidOperation(format!(
            "dropout的rate必须在[0, 1)内，但得到{rate}"
        )))
    };
    let keep_prob = graph.record(checked)?;

    let shape = graph.shape_of(x)?;
    let keep = graph.scalar(keep_prob)?;
    let uniform = graph.random_uniform(&shape)?;
    let shifted = graph.add(uniform, keep)?;
    let mask = graph.floor(shifted)?;
    let scaled = graph.div(x, keep)?;
    graph.mul(scaled, mask)
}
