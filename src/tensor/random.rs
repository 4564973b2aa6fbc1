/*
 * @Description  : 随机张量：全部从调用方给出的 RNG 抽样，便于图级别播种
 */

use super::Tensor;
use rand::Rng;
use rand::rngs::StdRng;

/// 均匀分布的分辨率：[0, 1) 内 2^-23 的整数倍
const UNIFORM_RESOLUTION: f32 = 1.0 / (1u32 << 23) as f32;

impl Tensor {
    /// 创建一个在[0, 1)上均匀分布的随机张量。
    /// 取值均为2^-23的整数倍，因此`u + 1.0`不会被舍入到2.0（dropout依赖这一点）。
    pub fn uniform_with_rng(shape: &[usize], rng: &mut StdRng) -> Self {
        let data_len = shape.iter().product::<usize>();
        let data = (0..data_len)
            .map(|_| (rng.r#gen::<u32>() >> 9) as f32 * UNIFORM_RESOLUTION)
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller）。
    pub fn normal_with_rng(mean: f32, std_dev: f32, shape: &[usize], rng: &mut StdRng) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor::new(&data, shape)
    }
}
