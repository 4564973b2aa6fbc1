/*
 * @Description  : Graph 上的节点构建方法（每个原语一个）
 *
 * 所有方法都在构图期完成形状校验，失败时返回错误并记录为图的状态。
 */

use super::error::GraphError;
use super::handle::Graph;
use crate::nn::Output;
use crate::nn::nodes::raw_node::{
    Add, Assign, AssignSub, AssignTarget, BiasAdd, Constant, Conv2D, Conv2DBackpropInput, Div,
    Exp, Floor, FusedBatchNorm, GreaterEqual, LeakyRelu, Log1p, MatMul, Mul, Neg, NodeType,
    OnesLike, RandomNormal, RandomUniform, ReduceMean, Reshape, Rsqrt, Select, SquaredDifference,
    Squeeze, StopGradient, Sub, VariableNode, ZerosLike,
};
use crate::tensor::{Padding, Tensor};

/// 融合批归一化的三个输出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FusedBatchNormOutput {
    pub y: Output,
    pub batch_mean: Output,
    pub batch_variance: Output,
}

impl Graph {
    // ==================== 常量与随机 ====================

    pub fn constant(&self, value: Tensor) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Constant::new(value)), &[])
    }

    pub fn scalar(&self, value: f32) -> Result<Output, GraphError> {
        self.constant(Tensor::scalar(value))
    }

    /// [0, 1) 均匀分布，每次执行重新抽样
    pub fn random_uniform(&self, shape: &[usize]) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(RandomUniform::new(shape)), &[])
    }

    /// 标准正态分布，每次执行重新抽样
    pub fn random_normal(&self, shape: &[usize]) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(RandomNormal::new(shape)), &[])
    }

    pub fn zeros_like(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(ZerosLike), &[x])
    }

    pub fn ones_like(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(OnesLike), &[x])
    }

    // ==================== 变量 ====================

    /// 创建变量节点（未初始化）。通常应通过`nn::Variable::new`创建，它会同时登记初始赋值。
    pub(crate) fn variable(&self, shape: &[usize], name: &str) -> Result<Output, GraphError> {
        self.add_named_node(NodeType::from(VariableNode::new(shape)), &[], name)
    }

    fn assign_target(&self, var: Output) -> Result<AssignTarget, GraphError> {
        let inner = self.inner();
        if !inner.is_variable(var)? {
            return Err(GraphError::InvalidOperation(format!(
                "赋值的目标必须是变量，但{}不是",
                inner.node_name(var.node())?
            )));
        }
        Ok(AssignTarget {
            var: var.node(),
            var_name: inner.node_name(var.node())?.to_string(),
            shape: inner.shape_of(var)?,
        })
    }

    /// `var = value`
    pub fn assign(&self, var: Output, value: Output) -> Result<Output, GraphError> {
        let target = self.assign_target(var);
        let target = self.record(target)?;
        self.add_node(NodeType::from(Assign::new(target)), &[value])
    }

    /// `var -= delta`，节点以`name`命名
    pub fn assign_sub(&self, var: Output, delta: Output, name: &str) -> Result<Output, GraphError> {
        let target = self.assign_target(var);
        let target = self.record(target)?;
        self.add_named_node(NodeType::from(AssignSub::new(target)), &[delta], name)
    }

    /// 未经`add_node`的前置校验失败（初始化器、赋值目标等）同样要记入图状态
    pub(crate) fn record<T>(&self, result: Result<T, GraphError>) -> Result<T, GraphError> {
        if let Err(e) = &result {
            let mut inner = self.inner_mut();
            if inner.status.is_none() {
                inner.status = Some(e.clone());
            }
        }
        result
    }

    // ==================== 逐元素运算 ====================

    pub fn add(&self, a: Output, b: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Add), &[a, b])
    }

    pub fn sub(&self, a: Output, b: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Sub), &[a, b])
    }

    pub fn mul(&self, a: Output, b: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Mul), &[a, b])
    }

    pub fn div(&self, a: Output, b: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Div), &[a, b])
    }

    /// (a - b)²
    pub fn squared_difference(&self, a: Output, b: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(SquaredDifference), &[a, b])
    }

    /// a >= b 处为1.0，否则为0.0
    pub fn greater_equal(&self, a: Output, b: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(GreaterEqual), &[a, b])
    }

    pub fn select(&self, cond: Output, on_true: Output, on_false: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Select), &[cond, on_true, on_false])
    }

    pub fn neg(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Neg), &[x])
    }

    pub fn exp(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Exp), &[x])
    }

    pub fn log1p(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Log1p), &[x])
    }

    pub fn rsqrt(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Rsqrt), &[x])
    }

    pub fn floor(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Floor), &[x])
    }

    pub fn stop_gradient(&self, x: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(StopGradient), &[x])
    }

    pub fn leaky_relu(&self, x: Output, alpha: f32) -> Result<Output, GraphError> {
        let node = LeakyRelu::new(alpha);
        let node = self.record(node)?;
        self.add_node(NodeType::from(node), &[x])
    }

    // ==================== 矩阵与形状 ====================

    pub fn matmul(&self, a: Output, b: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(MatMul), &[a, b])
    }

    pub fn bias_add(&self, x: Output, bias: Output) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(BiasAdd), &[x, bias])
    }

    pub fn reduce_mean(&self, x: Output, axes: &[usize], keep_dims: bool) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(ReduceMean::new(axes, keep_dims)), &[x])
    }

    pub fn squeeze(&self, x: Output, axes: &[usize]) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Squeeze::new(axes)), &[x])
    }

    pub fn reshape(&self, x: Output, shape: &[usize]) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Reshape::new(shape)), &[x])
    }

    // ==================== 卷积与归一化 ====================

    /// NHWC 二维卷积，`filter`形状为[kH, kW, C_in, C_out]
    pub fn conv2d(
        &self,
        input: Output,
        filter: Output,
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Output, GraphError> {
        self.add_node(NodeType::from(Conv2D::new(strides, padding)), &[input, filter])
    }

    /// 卷积对输入的梯度，结果形状为`input_sizes`
    pub fn conv2d_backprop_input(
        &self,
        input_sizes: &[usize],
        filter: Output,
        out_backprop: Output,
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Output, GraphError> {
        self.add_node(
            NodeType::from(Conv2DBackpropInput::new(input_sizes, strides, padding)),
            &[filter, out_backprop],
        )
    }

    /// 融合批归一化。训练模式下`mean`/`variance`可传入形状为[0]的空常量。
    #[allow(clippy::too_many_arguments)]
    pub fn fused_batch_norm(
        &self,
        x: Output,
        scale: Output,
        offset: Output,
        mean: Output,
        variance: Output,
        epsilon: f32,
        is_training: bool,
    ) -> Result<FusedBatchNormOutput, GraphError> {
        let y = self.add_node(
            NodeType::from(FusedBatchNorm::new(epsilon, is_training)),
            &[x, scale, offset, mean, variance],
        )?;
        Ok(FusedBatchNormOutput {
            y,
            batch_mean: y.with_index(1),
            batch_variance: y.with_index(2),
        })
    }
}
