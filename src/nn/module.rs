/*
 * @Description  : Module trait 定义
 */

use super::Variable;

/// 模块 trait
///
/// # 设计原则
/// - `build()` **不是** trait 方法（各网络的签名不同）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回 `Vec<Variable>`（签名一致，放入 trait）
pub trait Module {
    /// 获取所有可训练变量（按构造顺序）
    fn parameters(&self) -> Vec<Variable>;

    /// 获取参数（变量）数量
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 所有可训练变量的标量元素总数
    fn num_param_elements(&self) -> usize {
        self.parameters()
            .iter()
            .map(|v| v.shape().iter().product::<usize>())
            .sum()
    }
}
