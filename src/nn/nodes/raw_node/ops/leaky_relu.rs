use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::Tensor;

/// Leaky ReLU 激活函数节点
///
/// forward: f(x) = x if x > 0, else alpha * x
///
/// 当 alpha = 0 时，等价于标准 ReLU
pub(crate) struct LeakyRelu {
    alpha: f32,
}

impl LeakyRelu {
    pub(crate) fn new(alpha: f32) -> Result<Self, GraphError> {
        // 负半轴斜率通常应该是非负小数
        if !(alpha >= 0.0) {
            return Err(GraphError::InvalidOperation(format!(
                "LeakyRelu的alpha应为非负数，但得到: {alpha}"
            )));
        }
        Ok(Self { alpha })
    }
}

impl TraitNode for LeakyRelu {
    fn kind(&self) -> &'static str {
        "LeakyRelu"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        Ok(vec![inputs[0].to_vec()])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        let alpha = self.alpha;
        Ok(vec![inputs[0].map(|x| if x > 0.0 { x } else { alpha * x })])
    }
}
