/*
 * @Description  : DCGAN 生成器：噪声 -> 全连接 -> 三次转置卷积 -> 图像
 *
 * 形状变化（b 为批大小，base = image_size / 4）：
 * [b, noise_dim] -> [b, base²*256] -> [b, base, base, 256]
 *   -> [b, base, base, 128] -> [b, 2base, 2base, 64] -> [b, image_size, image_size, channels]
 */

use super::DcganConfig;
use crate::nn::functional::{conv2d_transpose, leaky_relu};
use crate::nn::layer::{BatchNormalization, FusedBatchNorm};
use crate::nn::{Graph, GraphError, Init, Module, Output, Variable};

pub struct Generator {
    config: DcganConfig,
    dense_weight: Variable,
    /// 三个转置卷积核：[5,5,128,256]、[5,5,64,128]、[5,5,channels,64]
    filters: [Variable; 3],
    dense_norm: BatchNormalization,
    conv_norms: [FusedBatchNorm; 2],
}

impl Generator {
    /// 创建全部变量与归一化状态（只做一次）；节点都在`generator`作用域下
    pub fn new(graph: &Graph, config: &DcganConfig) -> Result<Self, GraphError> {
        graph.record(config.validate())?;
        let g = graph.with_name("generator");
        let units = config.units();

        let dense_weight = Variable::new(
            &g,
            "dense_weight",
            &[config.noise_dim, units],
            Init::ScaledNormal(config.noise_scale),
            true,
        )?;
        let filters = [
            Variable::new(&g, "conv_t1_filter", &[5, 5, 128, 256], Init::GlorotUniform, true)?,
            Variable::new(&g, "conv_t2_filter", &[5, 5, 64, 128], Init::GlorotUniform, true)?,
            Variable::new(
                &g,
                "conv_t3_filter",
                &[5, 5, config.channels, 64],
                Init::GlorotUniform,
                true,
            )?,
        ];
        let dense_norm = BatchNormalization::new(&g.with_name("batch_norm"), &[units], config.momentum)?;
        let conv_norms = [
            FusedBatchNorm::new(&g.with_name("fused_batch_norm_1"), &[128], config.momentum)?,
            FusedBatchNorm::new(&g.with_name("fused_batch_norm_2"), &[64], config.momentum)?,
        ];
        tracing::info!(
            noise_dim = config.noise_dim,
            image_size = config.image_size,
            channels = config.channels,
            "生成器构造完成"
        );

        Ok(Self {
            config: config.clone(),
            dense_weight,
            filters,
            dense_norm,
            conv_norms,
        })
    }

    pub const fn config(&self) -> &DcganConfig {
        &self.config
    }

    /// 发射一次前向：从新抽样的噪声生成一批图像。
    /// 可多次调用，每次复用同一组变量；训练模式下会登记批归一化的更新节点。
    pub fn build(&self, graph: &Graph, batch_size: usize, training: bool) -> Result<Output, GraphError> {
        if batch_size == 0 {
            return graph.record(Err(GraphError::ShapeMismatch {
                expected: vec![1],
                got: vec![0],
                message: "生成器的batch_size必须大于0".to_string(),
            }));
        }
        let g = graph.with_name("generator");
        let c = &self.config;
        let base = c.base();

        let noise = g.random_normal(&[batch_size, c.noise_dim])?;
        let dense = g.matmul(noise, self.dense_weight.output())?;
        let normed = self.dense_norm.build(&g, dense, &[0], c.epsilon, training)?;
        let activated = leaky_relu(&g, normed, c.leaky_alpha)?;
        let mut x = g.reshape(activated, &[batch_size, base, base, 256])?;

        let stages = [
            ([batch_size, base, base, 128], 1),
            ([batch_size, 2 * base, 2 * base, 64], 2),
        ];
        for (((shape, stride), filter), norm) in stages.iter().zip(&self.filters).zip(&self.conv_norms) {
            let up = conv2d_transpose(&g, x, filter.output(), shape, *stride)?;
            let normed = norm.build(&g, up, c.epsilon, training)?;
            x = leaky_relu(&g, normed, c.leaky_alpha)?;
        }

        conv2d_transpose(
            &g,
            x,
            self.filters[2].output(),
            &[batch_size, c.image_size, c.image_size, c.channels],
            2,
        )
    }
}

impl Module for Generator {
    fn parameters(&self) -> Vec<Variable> {
        let mut params = vec![self.dense_weight.clone()];
        params.extend(self.filters.iter().cloned());
        params.extend(self.dense_norm.state().parameters());
        for norm in &self.conv_norms {
            params.extend(norm.state().parameters());
        }
        params
    }
}
