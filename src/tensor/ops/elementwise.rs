/*
 * @Description  : 逐元素运算（numpy 风格广播）
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{IxDyn, Zip};

/// 计算两个形状按numpy规则广播后的形状，不兼容时返回None
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut result = vec![0; rank];
    for i in 0..rank {
        // 从最后一维往前对齐
        let da = if i < rank - a.len() { 1 } else { a[i - (rank - a.len())] };
        let db = if i < rank - b.len() { 1 } else { b[i - (rank - b.len())] };
        result[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(result)
}

impl Tensor {
    /// 广播后逐元素地应用二元函数`f`
    pub fn zip_with<F>(&self, other: &Tensor, operator: Operator, f: F) -> Result<Tensor, TensorError>
    where
        F: Fn(f32, f32) -> f32,
    {
        let incompatible = || TensorError::OperatorError {
            operator,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        };
        let shape = broadcast_shape(self.shape(), other.shape()).ok_or_else(incompatible)?;
        let a = self.data.broadcast(IxDyn(&shape)).ok_or_else(incompatible)?;
        let b = other.data.broadcast(IxDyn(&shape)).ok_or_else(incompatible)?;
        let data = Zip::from(&a).and(&b).map_collect(|&x, &y| f(x, y));
        Ok(Tensor::from_array(data))
    }

    /// 三路广播的条件选择：`cond`非零处取`on_true`，否则取`on_false`
    pub fn select(cond: &Tensor, on_true: &Tensor, on_false: &Tensor) -> Result<Tensor, TensorError> {
        let incompatible = || TensorError::OperatorError {
            operator: Operator::Select,
            tensor1_shape: on_true.shape().to_vec(),
            tensor2_shape: on_false.shape().to_vec(),
        };
        let shape = broadcast_shape(on_true.shape(), on_false.shape())
            .and_then(|s| broadcast_shape(cond.shape(), &s))
            .ok_or_else(incompatible)?;
        let c = cond.data.broadcast(IxDyn(&shape)).ok_or_else(incompatible)?;
        let t = on_true.data.broadcast(IxDyn(&shape)).ok_or_else(incompatible)?;
        let e = on_false.data.broadcast(IxDyn(&shape)).ok_or_else(incompatible)?;
        let data = Zip::from(&c)
            .and(&t)
            .and(&e)
            .map_collect(|&c, &t, &e| if c != 0.0 { t } else { e });
        Ok(Tensor::from_array(data))
    }
}
