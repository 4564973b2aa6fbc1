/*
 * @Description  : 张量：计算图执行时流动的数值载体（f32，ndarray 动态维度）
 */

use ndarray::{ArrayD, IxDyn};

use crate::errors::TensorError;

mod ops {
    pub mod conv;
    pub mod elementwise;
    pub mod mat_mul;
    pub mod reduce;
}
mod print;
mod property;
mod random;
mod shape;

pub use ops::conv::{Padding, conv2d_output_shape};
pub use ops::elementwise::broadcast_shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]...
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    /// 需要可失败版本时请使用`try_new`。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let expected: usize = shape.iter().product();
        assert!(
            data.len() == expected,
            "{}",
            TensorError::IncompatibleShape(format!(
                "数据长度为{}，但形状{shape:?}需要{expected}个元素",
                data.len()
            ))
        );
        Self::try_new(data.to_vec(), shape).unwrap_or_else(|e| panic!("{e}"))
    }

    /// `new`的可失败版本，供图执行时内部使用
    pub fn try_new(data: Vec<f32>, shape: &[usize]) -> Result<Self, TensorError> {
        let len = data.len();
        ArrayD::from_shape_vec(IxDyn(shape), data)
            .map(|data| Self { data })
            .map_err(|_| {
                TensorError::IncompatibleShape(format!(
                    "数据长度为{len}，与形状{shape:?}不符"
                ))
            })
    }

    /// 标量张量（形状为`[]`）
    pub fn scalar(value: f32) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(&[]), value),
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(0.0, shape)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(1.0, shape)
    }

    /// 所有元素均为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    pub(crate) fn from_array(data: ArrayD<f32>) -> Self {
        Self { data }
    }

    /// 逐元素映射，形状不变
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }
}
