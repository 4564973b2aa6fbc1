use super::{ComputeContext, TraitNode, expect_inputs};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// [0, 1) 上的均匀分布随机张量，每次执行重新抽样
pub(crate) struct RandomUniform {
    shape: Vec<usize>,
}

impl RandomUniform {
    pub(crate) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
        }
    }
}

impl TraitNode for RandomUniform {
    fn kind(&self) -> &'static str {
        "RandomUniform"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 0)?;
        Ok(vec![self.shape.clone()])
    }

    fn compute(&self, _: &[&Tensor], ctx: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![Tensor::uniform_with_rng(&self.shape, ctx.rng)])
    }
}

/// 标准正态分布随机张量，每次执行重新抽样
pub(crate) struct RandomNormal {
    shape: Vec<usize>,
}

impl RandomNormal {
    pub(crate) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
        }
    }
}

impl TraitNode for RandomNormal {
    fn kind(&self) -> &'static str {
        "RandomNormal"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 0)?;
        Ok(vec![self.shape.clone()])
    }

    fn compute(&self, _: &[&Tensor], ctx: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![Tensor::normal_with_rng(0.0, 1.0, &self.shape, ctx.rng)])
    }
}
