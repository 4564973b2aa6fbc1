use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::Tensor;

/// 二阶矩阵乘法：[m, k] x [k, n] -> [m, n]
pub(crate) struct MatMul;

impl TraitNode for MatMul {
    fn kind(&self) -> &'static str {
        "MatMul"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 2)?;
        let (a, b) = (inputs[0], inputs[1]);
        if a.len() != 2 || b.len() != 2 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![2, 2],
                got: vec![a.len(), b.len()],
                message: "MatMul的两个输入都必须是2阶张量（括号内为两者的阶数）".to_string(),
            });
        }
        if a[1] != b[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![a[1]],
                got: vec![b[0]],
                message: format!("MatMul的内维不一致：{a:?} x {b:?}"),
            });
        }
        Ok(vec![vec![a[0], b[1]]])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![inputs[0].mat_mul(inputs[1])?])
    }
}
