use crate::errors::Operator;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::Tensor;

/// 沿最后一维（通道）加偏置：x[..., C] + bias[C]
pub(crate) struct BiasAdd;

impl TraitNode for BiasAdd {
    fn kind(&self) -> &'static str {
        "BiasAdd"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 2)?;
        let (x, bias) = (inputs[0], inputs[1]);
        let channels = x.last().copied().unwrap_or(0);
        if x.len() < 2 || bias != [channels] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![channels],
                got: bias.to_vec(),
                message: format!("BiasAdd的偏置必须是长度等于输入{x:?}最后一维的向量"),
            });
        }
        Ok(vec![x.to_vec()])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![inputs[0].zip_with(inputs[1], Operator::Add, |x, b| x + b)?])
    }
}
