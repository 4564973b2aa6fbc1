/*
 * @Description  : 二维卷积节点及其对输入的梯度节点（后者即转置卷积的实现）
 */

use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::{Padding, Tensor, conv2d_output_shape};

fn conv_mismatch(input: &[usize], filter: &[usize], message: String) -> GraphError {
    GraphError::ShapeMismatch {
        expected: input.to_vec(),
        got: filter.to_vec(),
        message,
    }
}

/// NHWC 二维卷积：输入[N, H, W, C_in]，卷积核[kH, kW, C_in, C_out]
pub(crate) struct Conv2D {
    strides: (usize, usize),
    padding: Padding,
}

impl Conv2D {
    pub(crate) fn new(strides: (usize, usize), padding: Padding) -> Self {
        Self { strides, padding }
    }
}

impl TraitNode for Conv2D {
    fn kind(&self) -> &'static str {
        "Conv2D"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 2)?;
        let (input, filter) = (inputs[0], inputs[1]);
        let shape = conv2d_output_shape(input, filter, self.strides, self.padding)
            .map_err(|e| conv_mismatch(input, filter, e.to_string()))?;
        Ok(vec![shape])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![inputs[0].conv2d(inputs[1], self.strides, self.padding)?])
    }
}

/// 卷积对输入的梯度。输入依次为：卷积核、上游梯度；
/// `input_sizes`即结果形状，上游梯度必须恰好是该形状经正向卷积后的形状。
pub(crate) struct Conv2DBackpropInput {
    input_sizes: Vec<usize>,
    strides: (usize, usize),
    padding: Padding,
}

impl Conv2DBackpropInput {
    pub(crate) fn new(input_sizes: &[usize], strides: (usize, usize), padding: Padding) -> Self {
        Self {
            input_sizes: input_sizes.to_vec(),
            strides,
            padding,
        }
    }
}

impl TraitNode for Conv2DBackpropInput {
    fn kind(&self) -> &'static str {
        "Conv2DBackpropInput"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 2)?;
        let (filter, out_backprop) = (inputs[0], inputs[1]);
        let forward = conv2d_output_shape(&self.input_sizes, filter, self.strides, self.padding)
            .map_err(|e| conv_mismatch(&self.input_sizes, filter, e.to_string()))?;
        if forward.as_slice() != out_backprop {
            return Err(GraphError::ShapeMismatch {
                expected: forward,
                got: out_backprop.to_vec(),
                message: format!(
                    "转置卷积的上游张量形状必须等于输入形状{:?}经正向卷积后的形状",
                    self.input_sizes
                ),
            });
        }
        Ok(vec![self.input_sizes.clone()])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![Tensor::conv2d_backprop_input(
            &self.input_sizes,
            inputs[0],
            inputs[1],
            self.strides,
            self.padding,
        )?])
    }
}
