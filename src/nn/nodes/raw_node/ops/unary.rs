use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ComputeContext, TraitNode, expect_inputs};
use crate::tensor::Tensor;

macro_rules! unary_node {
    ($(#[$doc:meta])* $name:ident, $kind:literal, $f:expr) => {
        $(#[$doc])*
        pub(crate) struct $name;

        impl TraitNode for $name {
            fn kind(&self) -> &'static str {
                $kind
            }

            fn infer_shapes(&self, inputs: &[&[usize]]) -> Result<Vec<Vec<usize>>, GraphError> {
                expect_inputs(self.kind(), inputs, 1)?;
                Ok(vec![inputs[0].to_vec()])
            }

            fn compute(
                &self,
                inputs: &[&Tensor],
                _: &mut ComputeContext<'_>,
            ) -> Result<Vec<Tensor>, GraphError> {
                Ok(vec![inputs[0].map($f)])
            }
        }
    };
}

unary_node!(Neg, "Neg", |x: f32| -x);
unary_node!(Exp, "Exp", f32::exp);
unary_node!(Log1p, "Log1p", f32::ln_1p);
unary_node!(Rsqrt, "Rsqrt", |x: f32| 1.0 / x.sqrt());
unary_node!(Floor, "Floor", f32::floor);
unary_node!(
    /// 前向为恒等映射；对求导引擎而言，梯度不穿过本节点
    StopGradient,
    "StopGradient",
    |x: f32| x
);
