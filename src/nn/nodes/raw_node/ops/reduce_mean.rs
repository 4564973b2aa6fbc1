use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::Tensor;

pub(crate) struct ReduceMean {
    axes: Vec<usize>,
    keep_dims: bool,
}

impl ReduceMean {
    pub(crate) fn new(axes: &[usize], keep_dims: bool) -> Self {
        Self {
            axes: axes.to_vec(),
            keep_dims,
        }
    }
}

impl TraitNode for ReduceMean {
    fn kind(&self) -> &'static str {
        "ReduceMean"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        let x = inputs[0];
        if self.axes.is_empty() {
            return Err(GraphError::InvalidOperation(
                "ReduceMean至少需要一个归约轴".to_string(),
            ));
        }
        if let Some(&axis) = self.axes.iter().find(|&&a| a >= x.len()) {
            return Err(GraphError::ShapeMismatch {
                expected: vec![x.len()],
                got: vec![axis],
                message: format!("ReduceMean的归约轴{axis}超出了输入{x:?}的阶数"),
            });
        }
        let shape = x
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| {
                if !self.axes.contains(&i) {
                    Some(d)
                } else if self.keep_dims {
                    Some(1)
                } else {
                    None
                }
            })
            .collect();
        Ok(vec![shape])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![inputs[0].reduce_mean(&self.axes, self.keep_dims)?])
    }
}
