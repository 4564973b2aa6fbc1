use crate::nn::{Graph, GraphError, Output};
use crate::tensor::Padding;

/// NHWC 二维卷积（步长在高、宽两个方向相同）
pub fn conv2d(
    graph: &Graph,
    x: Output,
    filter: Output,
    stride: usize,
    padding: Padding,
) -> Result<Output, GraphError> {
    graph.conv2d(x, filter, (stride, stride), padding)
}

/// 转置卷积（SAME 填充）：用“卷积对输入的梯度”实现，结果形状即`output_shape`。
///
/// `filter`形状为[kH, kW, output_shape的通道数, x的通道数]，
/// 且`x`必须恰好是`output_shape`经同样步长正向卷积后的形状。
pub fn conv2d_transpose(
    graph: &Graph,
    x: Output,
    filter: Output,
    output_shape: &[usize],
    stride: usize,
) -> Result<Output, GraphError> {
    graph.conv2d_backprop_input(output_shape, filter, x, (stride, stride), Padding::Same)
}
