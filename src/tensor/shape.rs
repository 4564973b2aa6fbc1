use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Axis, IxDyn};

impl Tensor {
    /// 改变形状（元素总数必须一致），按行优先顺序重排
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        let new_total_elements: usize = shape.iter().product();
        if self.size() != new_total_elements {
            return Err(TensorError::IncompatibleShape(format!(
                "无法将形状{:?}（{}个元素）变形为{shape:?}（{new_total_elements}个元素）",
                self.shape(),
                self.size()
            )));
        }
        let data = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(shape))
            .map_err(|e| TensorError::IncompatibleShape(e.to_string()))?;
        Ok(Self { data })
    }

    /// 去掉`axes`中列出的轴，这些轴的长度必须都为1
    pub fn squeeze(&self, axes: &[usize]) -> Result<Self, TensorError> {
        let rank = self.dimension();
        for &axis in axes {
            if axis >= rank {
                return Err(TensorError::InvalidAxis { axis, rank });
            }
            let len = self.shape()[axis];
            if len != 1 {
                return Err(TensorError::NotUnitAxis { axis, len });
            }
        }
        let mut sorted = axes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut data = self.data.clone();
        for &axis in sorted.iter().rev() {
            data = data.remove_axis(Axis(axis));
        }
        Ok(Self { data })
    }
}
