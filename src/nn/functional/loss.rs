use crate::nn::{Graph, GraphError, Output};

/// 数值稳定的 sigmoid 交叉熵：
/// max(x, 0) - x * z + log(1 + exp(-|x|))，其中 x 为 logits，z 为标签。
///
/// max 与 -|x| 都用`select`表达，避免对大的正 logits 求 exp。
pub fn sigmoid_cross_entropy_with_logits(
    graph: &Graph,
    labels: Output,
    logits: Output,
) -> Result<Output, GraphError> {
    let zeros = graph.zeros_like(logits)?;
    let cond = graph.greater_equal(logits, zeros)?;
    let relu_logits = graph.select(cond, logits, zeros)?;
    let negated = graph.neg(logits)?;
    let neg_abs_logits = graph.select(cond, negated, logits)?;

    let product = graph.mul(logits, labels)?;
    let linear = graph.sub(relu_logits, product)?;
    let exp = graph.exp(neg_abs_logits)?;
    let softplus = graph.log1p(exp)?;
    graph.add(linear, softplus)
}
