use crate::tensor::Tensor;
use std::fmt;

impl Tensor {
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shape = self.shape();
        if shape.len() > 2 && !self.is_scalar() {
            // 高阶张量（如 NHWC 图像批）只给出概要
            return writeln!(
                f,
                "<阶数大于二（rank>2）的张量，形状：{shape:?}，最小值{:.4}，最大值{:.4}，均值{:.4}>",
                self.min(),
                self.max(),
                self.mean()
            );
        }
        writeln!(f, "{:8.4}", self.data)?;
        writeln!(f, "形状: {shape:?}")
    }
}
