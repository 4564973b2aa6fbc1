//! # dcgan_graph
//!
//! 在符号计算图上构建 DCGAN 的层库：
//! 各个层在图句柄上追加节点，有状态的层（批归一化的滑动统计量、可训练变量）
//! 构建一次、前向多次，训练/推理两种模式只在发射哪些节点上有区别。
//!
//! 计算图本身由 [`nn::Graph`] 提供（CPU 参考实现，仅前向），
//! 生成器与判别器见 [`nn::model`]。

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
