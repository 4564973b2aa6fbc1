use super::{ComputeContext, TraitNode, expect_inputs};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 常量节点：值在构图时给定
pub(crate) struct Constant {
    value: Tensor,
}

impl Constant {
    pub(crate) const fn new(value: Tensor) -> Self {
        Self { value }
    }
}

impl TraitNode for Constant {
    fn kind(&self) -> &'static str {
        "Const"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 0)?;
        Ok(vec![self.value.shape().to_vec()])
    }

    fn compute(&self, _: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![self.value.clone()])
    }
}

/// 与输入同形状的全零张量
pub(crate) struct ZerosLike;

impl TraitNode for ZerosLike {
    fn kind(&self) -> &'static str {
        "ZerosLike"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        Ok(vec![inputs[0].to_vec()])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![Tensor::zeros(inputs[0].shape())])
    }
}

/// 与输入同形状的全一张量
pub(crate) struct OnesLike;

impl TraitNode for OnesLike {
    fn kind(&self) -> &'static str {
        "OnesLike"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        Ok(vec![inputs[0].to_vec()])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![Tensor::ones(inputs[0].shape())])
    }
}
