use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::Tensor;

pub(crate) struct Reshape {
    shape: Vec<usize>,
}

impl Reshape {
    pub(crate) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
        }
    }
}

impl TraitNode for Reshape {
    fn kind(&self) -> &'static str {
        "Reshape"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        let from: usize = inputs[0].iter().product();
        let to: usize = self.shape.iter().product();
        if from != to {
            return Err(GraphError::ShapeMismatch {
                expected: self.shape.clone(),
                got: inputs[0].to_vec(),
                message: format!("Reshape前后元素个数不一致（{from} vs {to}）"),
            });
        }
        Ok(vec![self.shape.clone()])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![inputs[0].reshape(&self.shape)?])
    }
}

/// 去掉指定的长度为1的轴
pub(crate) struct Squeeze {
    axes: Vec<usize>,
}

impl Squeeze {
    pub(crate) fn new(axes: &[usize]) -> Self {
        Self {
            axes: axes.to_vec(),
        }
    }
}

impl TraitNode for Squeeze {
    fn kind(&self) -> &'static str {
        "Squeeze"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        let x = inputs[0];
        for &axis in &self.axes {
            if x.get(axis) != Some(&1) {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![1],
                    got: x.get(axis).map(|&d| vec![d]).unwrap_or_default(),
                    message: format!("Squeeze只能去掉长度为1的轴，输入{x:?}的轴{axis}不满足"),
                });
            }
        }
        let shape = x
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.axes.contains(i))
            .map(|(_, &d)| d)
            .collect();
        Ok(vec![shape])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![inputs[0].squeeze(&self.axes)?])
    }
}
