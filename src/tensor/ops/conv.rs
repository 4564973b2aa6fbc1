/*
 * @Description  : NHWC 布局的二维卷积及其对输入的梯度（转置卷积）
 *
 * 形状约定：
 * - 输入：[batch, H, W, in_channels]
 * - 卷积核：[kH, kW, in_channels, out_channels]
 * - 输出：[batch, H', W', out_channels]
 *
 * SAME 填充：H' = ceil(H / stride)，总填充 = max((H'-1)*stride + kH - H, 0)，前侧取一半（向下取整）
 * VALID 填充：H' = (H - kH) / stride + 1
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;

/// 卷积的填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    #[default]
    Same,
    Valid,
}

impl Padding {
    /// 返回某一空间维度上的（输出长度，前侧填充），VALID 下输入比卷积核小时返回None
    pub fn output_size(&self, input: usize, kernel: usize, stride: usize) -> Option<(usize, usize)> {
        match self {
            Self::Same => {
                let out = input.div_ceil(stride);
                let needed = (out.saturating_sub(1)) * stride + kernel;
                let pad_total = needed.saturating_sub(input);
                Some((out, pad_total / 2))
            }
            Self::Valid => {
                if input < kernel {
                    None
                } else {
                    Some(((input - kernel) / stride + 1, 0))
                }
            }
        }
    }
}

fn rank4<'a>(op: &'static str, shape: &'a [usize]) -> Result<&'a [usize], TensorError> {
    if shape.len() != 4 {
        return Err(TensorError::UnsupportedRank {
            op,
            expected: 4,
            got: shape.len(),
        });
    }
    Ok(shape)
}

/// 仅根据形状推断卷积输出形状（构图阶段与执行阶段共用）
pub fn conv2d_output_shape(
    input: &[usize],
    filter: &[usize],
    strides: (usize, usize),
    padding: Padding,
) -> Result<Vec<usize>, TensorError> {
    let input = rank4("conv2d的输入", input)?;
    let filter = rank4("conv2d的卷积核", filter)?;
    if strides.0 == 0 || strides.1 == 0 {
        return Err(TensorError::IncompatibleShape(format!(
            "卷积步长必须为正，但得到{strides:?}"
        )));
    }
    if input[3] != filter[2] {
        return Err(TensorError::IncompatibleShape(format!(
            "输入通道数{}与卷积核{filter:?}的输入通道数{}不一致",
            input[3], filter[2]
        )));
    }
    let (oh, _) = padding
        .output_size(input[1], filter[0], strides.0)
        .ok_or_else(|| too_small(input, filter))?;
    let (ow, _) = padding
        .output_size(input[2], filter[1], strides.1)
        .ok_or_else(|| too_small(input, filter))?;
    Ok(vec![input[0], oh, ow, filter[3]])
}

fn too_small(input: &[usize], filter: &[usize]) -> TensorError {
    TensorError::IncompatibleShape(format!(
        "VALID填充下输入{input:?}的空间尺寸小于卷积核{filter:?}"
    ))
}

impl Tensor {
    /// 前向二维卷积，`self`为 NHWC 输入
    pub fn conv2d(
        &self,
        filter: &Tensor,
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Tensor, TensorError> {
        let out_shape = conv2d_output_shape(self.shape(), filter.shape(), strides, padding)?;
        let (n, h, w, c) = (self.shape()[0], self.shape()[1], self.shape()[2], self.shape()[3]);
        let (kh, kw, oc) = (filter.shape()[0], filter.shape()[1], filter.shape()[3]);
        let (oh, ow) = (out_shape[1], out_shape[2]);
        let pad_top = padding.output_size(h, kh, strides.0).map_or(0, |(_, p)| p);
        let pad_left = padding.output_size(w, kw, strides.1).map_or(0, |(_, p)| p);

        let xs = self.to_vec();
        let fs = filter.to_vec();
        let mut out = vec![0.0f32; out_shape.iter().product()];

        for b in 0..n {
            for oy in 0..oh {
                for ox in 0..ow {
                    let out_base = ((b * oh + oy) * ow + ox) * oc;
                    for ky in 0..kh {
                        let Some(iy) = (oy * strides.0 + ky).checked_sub(pad_top) else {
                            continue;
                        };
                        if iy >= h {
                            continue;
                        }
                        for kx in 0..kw {
                            let Some(ix) = (ox * strides.1 + kx).checked_sub(pad_left) else {
                                continue;
                            };
                            if ix >= w {
                                continue;
                            }
                            let in_base = ((b * h + iy) * w + ix) * c;
                            for ci in 0..c {
                                let xv = xs[in_base + ci];
                                let f_base = ((ky * kw + kx) * c + ci) * oc;
                                let row = &fs[f_base..f_base + oc];
                                for (acc, &fv) in out[out_base..out_base + oc].iter_mut().zip(row) {
                                    *acc += xv * fv;
                                }
                            }
                        }
                    }
                }
            }
        }
        Tensor::try_new(out, &out_shape)
    }

    /// 卷积对输入的梯度：给定期望的输入形状`input_sizes`、卷积核和上游“输出梯度”，
    /// 求出形状为`input_sizes`的结果。转置卷积即由此实现。
    pub fn conv2d_backprop_input(
        input_sizes: &[usize],
        filter: &Tensor,
        out_backprop: &Tensor,
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Tensor, TensorError> {
        let expected = conv2d_output_shape(input_sizes, filter.shape(), strides, padding)?;
        if out_backprop.shape() != expected.as_slice() {
            return Err(TensorError::IncompatibleShape(format!(
                "输出梯度的形状{:?}与输入形状{input_sizes:?}经卷积后的形状{expected:?}不一致",
                out_backprop.shape()
            )));
        }
        let (n, h, w, c) = (input_sizes[0], input_sizes[1], input_sizes[2], input_sizes[3]);
        let (kh, kw, oc) = (filter.shape()[0], filter.shape()[1], filter.shape()[3]);
        let (oh, ow) = (expected[1], expected[2]);
        let pad_top = padding.output_size(h, kh, strides.0).map_or(0, |(_, p)| p);
        let pad_left = padding.output_size(w, kw, strides.1).map_or(0, |(_, p)| p);

        let gs = out_backprop.to_vec();
        let fs = filter.to_vec();
        let mut dx = vec![0.0f32; input_sizes.iter().product()];

        for b in 0..n {
            for oy in 0..oh {
                for ox in 0..ow {
                    let g_base = ((b * oh + oy) * ow + ox) * oc;
                    let grad = &gs[g_base..g_base + oc];
                    for ky in 0..kh {
                        let Some(iy) = (oy * strides.0 + ky).checked_sub(pad_top) else {
                            continue;
                        };
                        if iy >= h {
                            continue;
                        }
                        for kx in 0..kw {
                            let Some(ix) = (ox * strides.1 + kx).checked_sub(pad_left) else {
                                continue;
                            };
                            if ix >= w {
                                continue;
                            }
                            let in_base = ((b * h + iy) * w + ix) * c;
                            for ci in 0..c {
                                let f_base = ((ky * kw + kx) * c + ci) * oc;
                                let row = &fs[f_base..f_base + oc];
                                let acc: f32 = grad.iter().zip(row).map(|(g, f)| g * f).sum();
                                dx[in_base + ci] += acc;
                            }
                        }
                    }
                }
            }
        }
        Tensor::try_new(dx, input_sizes)
    }
}
