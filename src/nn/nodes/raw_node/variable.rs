/*
 * @Description  : 变量节点与赋值节点
 *
 * 变量的值不存放在节点里，而是存放在图的变量存储槽中（以变量节点 id 为键）。
 * 变量节点执行时读取存储槽；赋值节点执行时写入存储槽，这是图中唯一的副作用。
 */

use super::{ComputeContext, TraitNode, expect_inputs};
use crate::nn::{GraphError, NodeId};
use crate::tensor::Tensor;

pub(crate) struct VariableNode {
    shape: Vec<usize>,
}

impl VariableNode {
    pub(crate) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
        }
    }
}

impl TraitNode for VariableNode {
    fn kind(&self) -> &'static str {
        "Variable"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 0)?;
        Ok(vec![self.shape.clone()])
    }

    fn compute(&self, _: &[&Tensor], ctx: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        let value = ctx
            .variables
            .get(&ctx.node)
            .ok_or_else(|| GraphError::UninitializedVariable(ctx.node_name.to_string()))?;
        Ok(vec![value.clone()])
    }

    fn is_variable(&self) -> bool {
        true
    }
}

/// 目标变量的描述（赋值节点共用）
pub(crate) struct AssignTarget {
    pub(crate) var: NodeId,
    pub(crate) var_name: String,
    pub(crate) shape: Vec<usize>,
}

fn check_value_shape(kind: &str, target: &AssignTarget, value: &[usize]) -> Result<(), GraphError> {
    if value != target.shape.as_slice() {
        return Err(GraphError::ShapeMismatch {
            expected: target.shape.clone(),
            got: value.to_vec(),
            message: format!("{kind}的值形状必须与变量{}一致", target.var_name),
        });
    }
    Ok(())
}

/// `var = value`
pub(crate) struct Assign {
    target: AssignTarget,
}

impl Assign {
    pub(crate) const fn new(target: AssignTarget) -> Self {
        Self { target }
    }
}

impl TraitNode for Assign {
    fn kind(&self) -> &'static str {
        "Assign"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        check_value_shape(self.kind(), &self.target, inputs[0])?;
        Ok(vec![self.target.shape.clone()])
    }

    fn compute(&self, inputs: &[&Tensor], ctx: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        let value = inputs[0].clone();
        ctx.variables.insert(self.target.var, value.clone());
        Ok(vec![value])
    }
}

/// `var -= delta`
pub(crate) struct AssignSub {
    target: AssignTarget,
}

impl AssignSub {
    pub(crate) const fn new(target: AssignTarget) -> Self {
        Self { target }
    }
}

impl TraitNode for AssignSub {
    fn kind(&self) -> &'static str {
        "AssignSub"
    }

    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
        expect_inputs(self.kind(), inputs, 1)?;
        check_value_shape(self.kind(), &self.target, inputs[0])?;
        Ok(vec![self.target.shape.clone()])
    }

    fn compute(&self, inputs: &[&Tensor], ctx: &mut ComputeContext<'_>) -> Result<Vec<Tensor>, GraphError> {
        let current = ctx
            .variables
            .get(&self.target.var)
            .ok_or_else(|| GraphError::UninitializedVariable(self.target.var_name.clone()))?;
        let updated = current.zip_with(inputs[0], crate::errors::Operator::Sub, |v, d| v - d)?;
        ctx.variables.insert(self.target.var, updated.clone());
        Ok(vec![updated])
    }
}
