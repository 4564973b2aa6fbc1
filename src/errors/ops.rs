use std::fmt::{self, Display};

/// 张量的二元运算符（用于错误信息）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    SquaredDifference,
    GreaterEqual,
    Select,
    MatMul,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Operator::Add => "相加",
            Operator::Sub => "相减",
            Operator::Mul => "相乘",
            Operator::Div => "相除",
            Operator::SquaredDifference => "求差的平方",
            Operator::GreaterEqual => "比较大小",
            Operator::Select => "按条件选择",
            Operator::MatMul => "矩阵相乘",
        };
        write!(f, "{}", operation_name)
    }
}
