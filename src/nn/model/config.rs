/*
 * @Description  : DCGAN 超参数配置（可从 JSON 加载）
 */

use crate::nn::GraphError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// DCGAN 超参数
///
/// 缺省字段取默认值，因此`{}`也是合法配置（对应 28x28 单通道图像）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcganConfig {
    /// 噪声向量维度
    pub noise_dim: usize,
    /// 图像通道数
    pub channels: usize,
    /// 图像边长，必须是4的正整数倍
    pub image_size: usize,
    /// 滑动平均的动量
    pub momentum: f32,
    pub epsilon: f32,
    /// Leaky ReLU 负半轴斜率
    pub leaky_alpha: f32,
    pub dropout_rate: f32,
    /// 生成器全连接权重的初始化系数
    pub noise_scale: f32,
}

impl Default for DcganConfig {
    fn default() -> Self {
        Self {
            noise_dim: 100,
            channels: 1,
            image_size: 28,
            momentum: 0.8,
            epsilon: 1e-3,
            leaky_alpha: 0.3,
            dropout_rate: 0.3,
            noise_scale: 0.01,
        }
    }
}

impl DcganConfig {
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GraphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GraphError::InvalidConfig(format!("无法读取{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if self.image_size == 0 || self.image_size % 4 != 0 {
            return Err(GraphError::InvalidConfig(format!(
                "image_size必须是4的正整数倍，但得到{}",
                self.image_size
            )));
        }
        if self.channels == 0 || self.noise_dim == 0 {
            return Err(GraphError::InvalidConfig(
                "channels和noise_dim都必须大于0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.momentum) {
            return Err(GraphError::InvalidConfig(format!(
                "momentum必须在[0, 1]内，但得到{}",
                self.momentum
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(GraphError::InvalidConfig(format!(
                "epsilon必须为正，但得到{}",
                self.epsilon
            )));
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(GraphError::InvalidConfig(format!(
                "dropout_rate必须在[0, 1)内，但得到{}",
                self.dropout_rate
            )));
        }
        if !(self.leaky_alpha >= 0.0) {
            return Err(GraphError::InvalidConfig(format!(
                "leaky_alpha必须非负，但得到{}",
                self.leaky_alpha
            )));
        }
        Ok(())
    }

    /// 生成器起始特征图边长
    pub const fn base(&self) -> usize {
        self.image_size / 4
    }

    /// 生成器全连接层输出维度：base² * 256
    pub const fn units(&self) -> usize {
        self.base() * self.base() * 256
    }

    /// 判别器展平后的维度：base² * 128
    pub const fn flattened_size(&self) -> usize {
        self.base() * self.base() * 128
    }
}
