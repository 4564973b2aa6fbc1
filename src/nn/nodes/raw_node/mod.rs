mod constant;
mod ops;
mod random;
mod variable;

pub(crate) use constant::*;
pub(crate) use ops::*;
pub(crate) use random::*;
pub(crate) use variable::*;

use std::collections::HashMap;

use enum_dispatch::enum_dispatch;
use rand::rngs::StdRng;

use super::NodeId;
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[enum_dispatch]
pub(crate) enum NodeType {
    Constant(Constant),
    ZerosLike(ZerosLike),
    OnesLike(OnesLike),
    Variable(VariableNode),
    Assign(Assign),
    AssignSub(AssignSub),
    RandomUniform(RandomUniform),
    RandomNormal(RandomNormal),
    Add(Add),
    Sub(Sub),
    Mul(Mul),
    Div(Div),
    SquaredDifference(SquaredDifference),
    GreaterEqual(GreaterEqual),
    Select(Select),
    Neg(Neg),
    Exp(Exp),
    Log1p(Log1p),
    Rsqrt(Rsqrt),
    Floor(Floor),
    StopGradient(StopGradient),
    MatMul(MatMul),
    BiasAdd(BiasAdd),
    ReduceMean(ReduceMean),
    Squeeze(Squeeze),
    Reshape(Reshape),
    LeakyRelu(LeakyRelu),
    Conv2D(Conv2D),
    Conv2DBackpropInput(Conv2DBackpropInput),
    FusedBatchNorm(FusedBatchNorm),
}

/// 执行某个节点时可用的图级资源
pub(crate) struct ComputeContext<'a> {
    pub(crate) node: NodeId,
    pub(crate) node_name: &'a str,
    /// 图级别的随机数生成器
    pub(crate) rng: &'a mut StdRng,
    /// 变量存储槽：变量节点 id -> 当前值
    pub(crate) variables: &'a mut HashMap<NodeId, Tensor>,
}

#[enum_dispatch(NodeType)]
pub(crate) trait TraitNode {
    /// 节点类型名，用于自动命名（如"MatMul:3"）和错误信息
    fn kind(&self) -> &'static str;

    /// 构图阶段：根据各输入的形状推断本节点全部输出的形状。
    /// 形状不合法时必须在此报错，而不是拖到执行阶段。
    fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError>;

    /// 执行阶段：根据输入的值计算本节点全部输出的值
    fn compute(
        &self,
        inputs: &[&Tensor],
        ctx: &mut ComputeContext<'_>,
    ) -> Result<Vec<Tensor>, GraphError>;

    /// 是否为变量节点（赋值类节点只能作用于变量）
    fn is_variable(&self) -> bool {
        false
    }
}

/// 校验输入个数（只会在crate内部构图出错时触发）
pub(crate) fn expect_inputs(kind: &str, inputs: &[&[usize]], n: usize) -> Result<(), GraphError> {
    if inputs.len() != n {
        return Err(GraphError::InvalidOperation(format!(
            "{kind}节点需要{n}个输入，但得到{}个",
            inputs.len()
        )));
    }
    Ok(())
}
