/*
 * @Description  : 无状态的组合层：每个函数只在图上追加节点，不持有任何变量
 */

mod conv;
mod dropout;
mod loss;
mod normalization;

pub use conv::{conv2d, conv2d_transpose};
pub use dropout::dropout;
pub use loss::sigmoid_cross_entropy_with_logits;
pub use normalization::batch_normalization;

use crate::nn::{Graph, GraphError, Output};

/// f(x) = x if x > 0, else alpha * x
pub fn leaky_relu(graph: &Graph, x: Output, alpha: f32) -> Result<Output, GraphError> {
    graph.leaky_relu(x, alpha)
}

/// 沿最后一维加偏置
pub fn bias_add(graph: &Graph, x: Output, bias: Output) -> Result<Output, GraphError> {
    graph.bias_add(x, bias)
}
