/*
 * @Description  : 批归一化层（参考实现与融合实现）
 *
 * 两者持有相同的状态：
 * - moving_mean / moving_variance：不可训练，零初始化，训练构图时由更新节点维护
 * - gamma（scale）：可训练，一初始化
 * - beta（shift）：可训练，零初始化
 *
 * 滑动平均更新：moving -= (moving - batch) * (1 - momentum)
 */

use super::Moments;
use crate::nn::functional::batch_normalization;
use crate::nn::{Graph, GraphError, Init, Output, Variable};
use crate::tensor::Tensor;

/// 归一化层的全部状态，每个层实例独有
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationState {
    pub moving_mean: Variable,
    pub moving_variance: Variable,
    pub scale: Variable,
    pub shift: Variable,
}

impl NormalizationState {
    /// `prefix`为变量名前缀（参考实现为空，融合实现为`fused_`）
    pub fn new(graph: &Graph, shape: &[usize], prefix: &str) -> Result<Self, GraphError> {
        Ok(Self {
            moving_mean: Variable::new(graph, &format!("{prefix}moving_mean"), shape, Init::Zeros, false)?,
            moving_variance: Variable::new(
                graph,
                &format!("{prefix}moving_variance"),
                shape,
                Init::Zeros,
                false,
            )?,
            scale: Variable::new(graph, &format!("{prefix}gamma"), shape, Init::Ones, true)?,
            shift: Variable::new(graph, &format!("{prefix}beta"), shape, Init::Zeros, true)?,
        })
    }

    /// 可训练部分：gamma、beta
    pub fn parameters(&self) -> Vec<Variable> {
        vec![self.scale.clone(), self.shift.clone()]
    }

    /// 发射 moving -= (moving - batch) * (1 - momentum) 并登记为更新节点
    fn emit_update(
        graph: &Graph,
        moving: &Variable,
        batch: Output,
        momentum: f32,
        name: &str,
    ) -> Result<Output, GraphError> {
        let decay = graph.scalar(1.0 - momentum)?;
        let diff = graph.sub(moving.output(), batch)?;
        let delta = graph.mul(diff, decay)?;
        let update = graph.assign_sub(moving.output(), delta, name)?;
        graph.register_update_op(update)?;
        Ok(update)
    }
}

fn check_momentum(graph: &Graph, momentum: f32) -> Result<(), GraphError> {
    let checked = if (0.0..=1.0).contains(&momentum) {
        Ok(())
    } else {
        Err(GraphError::InvalidConfig(format!(
            "momentum必须在[0, 1]内，但得到{momentum}"
        )))
    };
    graph.record(checked)
}

/// 参考批归一化：统计量由 `Moments` 计算，归一化公式逐个原语展开
#[derive(Debug, Clone, PartialEq)]
pub struct BatchNormalization {
    state: NormalizationState,
    momentum: f32,
}

impl BatchNormalization {
    /// `shape`为特征形状（即归约后剩下的形状）
    pub fn new(graph: &Graph, shape: &[usize], momentum: f32) -> Result<Self, GraphError> {
        check_momentum(graph, momentum)?;
        Ok(Self {
            state: NormalizationState::new(graph, shape, "")?,
            momentum,
        })
    }

    pub const fn state(&self) -> &NormalizationState {
        &self.state
    }

    pub const fn momentum(&self) -> f32 {
        self.momentum
    }

    /// 训练模式：用当前批次沿`axes`的统计量归一化，并登记两个滑动平均更新节点；
    /// 推理模式：用滑动统计量归一化，不登记任何节点。
    pub fn build(
        &self,
        graph: &Graph,
        x: Output,
        axes: &[usize],
        epsilon: f32,
        training: bool,
    ) -> Result<Output, GraphError> {
        let state = &self.state;
        let (mean, variance) = if training {
            let moments = Moments::new(graph, x, axes, false)?;
            NormalizationState::emit_update(
                graph,
                &state.moving_mean,
                moments.mean,
                self.momentum,
                "update_moving_mean",
            )?;
            NormalizationState::emit_update(
                graph,
                &state.moving_variance,
                moments.variance,
                self.momentum,
                "update_moving_variance",
            )?;
            (moments.mean, moments.variance)
        } else {
            (state.moving_mean.output(), state.moving_variance.output())
        };
        batch_normalization(
            graph,
            x,
            mean,
            variance,
            state.shift.output(),
            state.scale.output(),
            epsilon,
        )
    }
}

/// 融合批归一化：NHWC 输入，按通道（最后一维）归一化，由单个融合原语完成
#[derive(Debug, Clone, PartialEq)]
pub struct FusedBatchNorm {
    state: NormalizationState,
    momentum: f32,
}

impl FusedBatchNorm {
    /// `shape`为通道形状[C]
    pub fn new(graph: &Graph, shape: &[usize], momentum: f32) -> Result<Self, GraphError> {
        check_momentum(graph, momentum)?;
        Ok(Self {
            state: NormalizationState::new(graph, shape, "fused_")?,
            momentum,
        })
    }

    pub const fn state(&self) -> &NormalizationState {
        &self.state
    }

    pub const fn momentum(&self) -> f32 {
        self.momentum
    }

    /// 训练模式下原语返回的批方差是无偏估计，滑动方差也据此更新
    pub fn build(
        &self,
        graph: &Graph,
        x: Output,
        epsilon: f32,
        training: bool,
    ) -> Result<Output, GraphError> {
        let state = &self.state;
        if !training {
            let fused = graph.fused_batch_norm(
                x,
                state.scale.output(),
                state.shift.output(),
                state.moving_mean.output(),
                state.moving_variance.output(),
                epsilon,
                false,
            )?;
            return Ok(fused.y);
        }

        let empty = graph.constant(Tensor::zeros(&[0]))?;
        let fused = graph.fused_batch_norm(
            x,
            state.scale.output(),
            state.shift.output(),
            empty,
            empty,
            epsilon,
            true,
        )?;
        NormalizationState::emit_update(
            graph,
            &state.moving_mean,
            fused.batch_mean,
            self.momentum,
            "fused_update_moving_mean",
        )?;
        NormalizationState::emit_update(
            graph,
            &state.moving_variance,
            fused.batch_variance,
            self.momentum,
            "fused_update_moving_variance",
        )?;
        Ok(fused.y)
    }
}
