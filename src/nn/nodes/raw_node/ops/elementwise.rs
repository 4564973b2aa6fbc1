/*
 * @Description  : 逐元素二元运算节点（numpy 风格广播）及条件选择节点
 */

use crate::errors::Operator;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::{Tensor, broadcast_shape};

fn infer_broadcast(kind: &str, a: &[usize], b: &[usize]) -> Result<Vec<usize>, GraphError> {
    broadcast_shape(a, b).ok_or_else(|| GraphError::ShapeMismatch {
        expected: a.to_vec(),
        got: b.to_vec(),
        message: format!("{kind}的两个输入无法广播"),
    })
}

macro_rules! binary_node {
    ($name:ident, $kind:literal, $operator:expr, $f:expr) => {
        pub(crate) struct $name;

        impl TraitNode for $name {
            fn kind(&self) -> &'static str {
                $kind
            }

            fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
                expect_inputs(self.kind(), inputs, 2)?;
                Ok(vec![infer_broadcast(self.kind(), inputs[0], inputs[1])?])
            }

            fn compute(
                &self,
                inputs: &[&Tensor],
                _: &mut ComputeContext<'_>,
            ) -> Result<Vec<Tensor>, GraphError> {
                Ok(vec![inputs[0].zip_with(inputs[1], $operator, $f)?])
            }
        }
    };
}

binary_node!(Add, "Add", Operator::Add, |a, b| a + b);
binary_node!(Sub, "Sub", Operator::Sub, |a, b| a - b);
binary_node!(Mul, "Mul", Operator::Mul, |a, b| a * b);
binary_node!(Div, "Div", Operator::Div, |a, b| a / b);
binary_node!(
    SquaredDifference,
    "SquaredDifference",
    Operator::SquaredDifference,
    |a, b| (a - b) * (a - b)
);
// 比较结果以 1.0/0.0 表示
binary_node!(GreaterEqual, "GreaterEqual", Operator::GreaterEqual, |a, b| {
    if a >= b { 1.0 } else { 0.0 }
});

/// `cond ? on_true : on_false`，三个输入相互广播
pub(crate) struct Select;

impl TraitNode for Select {
    fn kind(&self) -> &'static str {
        "Select"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 3)?;
        let values = infer_broadcast(self.kind(), inputs[1], inputs[2])?;
        Ok(vec![infer_broadcast(self.kind(), inputs[0], &values)?])
    }

    fn compute(&self, inputs: &[&Tensor], _: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![Tensor::select(inputs[0], inputs[1], inputs[2])?])
    }
}
