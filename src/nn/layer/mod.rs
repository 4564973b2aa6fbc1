/*
 * @Description  : Layer 模块 - 有状态的层（持有变量，构建一次、前向多次）
 */

mod batch_norm;
mod moments;

pub use batch_norm::{BatchNormalization, FusedBatchNorm, NormalizationState};
pub use moments::Moments;
