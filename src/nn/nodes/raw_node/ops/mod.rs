mod bias_add;
mod conv2d;
mod elementwise;
mod fused_batch_norm;
mod leaky_relu;
mod mat_mul;
mod reduce_mean;
mod reshape;
mod unary;

pub(crate) use bias_add::BiasAdd;
pub(crate) use conv2d::{Conv2D, Conv2DBackpropInput};
pub(crate) use elementwise::{Add, Div, GreaterEqual, Mul, Select, SquaredDifference, Sub};
pub(crate) use fused_batch_norm::FusedBatchNorm;
pub(crate) use leaky_relu::LeakyRelu;
pub(crate) use mat_mul::MatMul;
pub(crate) use reduce_mean::ReduceMean;
pub(crate) use reshape::{Reshape, Squeeze};
pub(crate) use unary::{Exp, Floor, Log1p, Neg, Rsqrt, StopGradient};
