/*
 * @Description  : DCGAN 判别器：两次步长为2的卷积 + 全连接，输出 logits
 *
 * [b, S, S, C] -> [b, S/2, S/2, 64] -> [b, S/4, S/4, 128] -> [b, (S/4)²*128] -> [b, 1]
 */

use super::DcganConfig;
use crate::nn::functional::{bias_add, conv2d, dropout, leaky_relu};
use crate::nn::{Graph, GraphError, Init, Module, Output, Variable};
use crate::tensor::Padding;

pub struct Discriminator {
    config: DcganConfig,
    conv1_weight: Variable,
    conv1_bias: Variable,
    conv2_weight: Variable,
    conv2_bias: Variable,
    dense_weight: Variable,
    dense_bias: Variable,
}

impl Discriminator {
    pub fn new(graph: &Graph, config: &DcganConfig) -> Result<Self, GraphError> {
        graph.record(config.validate())?;
        let g = graph.with_name("discriminator");
        let discriminator = Self {
            config: config.clone(),
            conv1_weight: Variable::new(
                &g,
                "conv1_weight",
                &[5, 5, config.channels, 64],
                Init::GlorotUniform,
                true,
            )?,
            conv1_bias: Variable::new(&g, "conv1_bias", &[64], Init::Zeros, true)?,
            conv2_weight: Variable::new(&g, "conv2_weight", &[5, 5, 64, 128], Init::GlorotUniform, true)?,
            conv2_bias: Variable::new(&g, "conv2_bias", &[128], Init::Zeros, true)?,
            dense_weight: Variable::new(
                &g,
                "dense_weight",
                &[config.flattened_size(), 1],
                Init::GlorotUniform,
                true,
            )?,
            dense_bias: Variable::new(&g, "dense_bias", &[1], Init::Zeros, true)?,
        };
        tracing::info!(
            image_size = config.image_size,
            channels = config.channels,
            flattened_size = config.flattened_size(),
            "判别器构造完成"
        );
        Ok(discriminator)
    }

    pub const fn config(&self) -> &DcganConfig {
        &self.config
    }

    /// 对一批图像发射前向，返回形状为[batch_size, 1]的 logits。
    /// `input`必须是[batch_size, image_size, image_size, channels]。
    pub fn build(&self, graph: &Graph, input: Output, batch_size: usize) -> Result<Output, GraphError> {
        let c = &self.config;
        let expected = vec![batch_size, c.image_size, c.image_size, c.channels];
        let got = graph.shape_of(input)?;
        if got != expected {
            return graph.record(Err(GraphError::ShapeMismatch {
                expected,
                got,
                message: "判别器的输入形状与配置不符".to_string(),
            }));
        }
        let g = graph.with_name("discriminator");

        let mut x = input;
        for (weight, bias) in [
            (&self.conv1_weight, &self.conv1_bias),
            (&self.conv2_weight, &self.conv2_bias),
        ] {
            let conv = conv2d(&g, x, weight.output(), 2, Padding::Same)?;
            let biased = bias_add(&g, conv, bias.output())?;
            let activated = leaky_relu(&g, biased, c.leaky_alpha)?;
            x = dropout(&g, activated, c.dropout_rate)?;
        }

        let flat = g.reshape(x, &[batch_size, c.flattened_size()])?;
        let dense = g.matmul(flat, self.dense_weight.output())?;
        bias_add(&g, dense, self.dense_bias.output())
    }
}

impl Module for Discriminator {
    fn parameters(&self) -> Vec<Variable> {
        vec![
            self.conv1_weight.clone(),
            self.conv1_bias.clone(),
            self.conv2_weight.clone(),
            self.conv2_bias.clone(),
            self.dense_weight.clone(),
            self.dense_bias.clone(),
        ]
    }
}
