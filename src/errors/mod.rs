use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不兼容，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("张量形状不兼容：{0}")]
    IncompatibleShape(String),
    #[error("轴{axis}超出了{rank}阶张量的范围")]
    InvalidAxis { axis: usize, rank: usize },
    #[error("只能压缩长度为1的轴，但轴{axis}的长度为{len}")]
    NotUnitAxis { axis: usize, len: usize },
    #[error("{op}需要{expected}阶张量，但得到的是{got}阶")]
    UnsupportedRank {
        op: &'static str,
        expected: usize,
        got: usize,
    },
}
