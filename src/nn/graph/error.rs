/*
 * @Description  : Graph 模块的错误类型
 */

use thiserror::Error;

use crate::errors::TensorError;
use crate::nn::NodeId;

/// 构图/执行错误类型
///
/// 构图阶段的错误（形状、阶数）在追加节点时立即返回，不会拖到执行阶段；
/// 同时会被记录为图的状态，之后在该图上的构图调用都会返回`GraphConstruction`。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// 初始化器等只支持特定阶数的形状
    #[error("不支持的形状{shape:?}：{message}")]
    UnsupportedShape { shape: Vec<usize>, message: String },
    #[error("形状不匹配：期望{expected:?}，实际{got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    /// 图此前已经构建失败
    #[error("计算图构建失败：{0}")]
    GraphConstruction(String),
    #[error("节点{0:?}不存在")]
    NodeNotFound(NodeId),
    #[error("非法操作：{0}")]
    InvalidOperation(String),
    #[error("变量{0}尚未初始化")]
    UninitializedVariable(String),
    #[error("计算错误：{0}")]
    ComputationError(String),
    #[error("配置无效：{0}")]
    InvalidConfig(String),
}

impl From<TensorError> for GraphError {
    fn from(e: TensorError) -> Self {
        Self::ComputationError(e.to_string())
    }
}
