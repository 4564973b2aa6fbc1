use crate::errors::TensorError;
use crate::tensor::Tensor;
use ndarray::Axis;

impl Tensor {
    /// 沿`axes`求平均。
    /// `keep_dims`为true时被归约的轴保留为长度1，否则直接去掉。
    pub fn reduce_mean(&self, axes: &[usize], keep_dims: bool) -> Result<Tensor, TensorError> {
        let rank = self.dimension();
        let mut sorted = axes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if let Some(&axis) = sorted.iter().find(|&&a| a >= rank) {
            return Err(TensorError::InvalidAxis { axis, rank });
        }

        let mut data = self.data.clone();
        // 从高轴往低轴归约，前面轴的序号不受影响
        for &axis in sorted.iter().rev() {
            data = data.mean_axis(Axis(axis)).ok_or_else(|| {
                TensorError::IncompatibleShape(format!(
                    "无法对长度为0的轴{axis}求平均（形状{:?}）",
                    self.shape()
                ))
            })?;
        }
        if keep_dims {
            for &axis in &sorted {
                data = data.insert_axis(Axis(axis));
            }
        }
        Ok(Tensor::from_array(data))
    }
}
