/*
 * @Description  : 有状态变量：图中的一个存储槽，外加它的初始赋值
 */

use crate::nn::{Graph, GraphError, Init, Output};
use crate::tensor::Tensor;

/// 变量句柄
///
/// 构造时在图上创建变量节点，并登记一个初始赋值（由`Graph::initialize`执行）；
/// `trainable`为true时同时登记为可训练变量。
/// 句柄本身只是节点的引用，可随意克隆，值始终存放在图中。
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    output: Output,
    name: String,
    shape: Vec<usize>,
    trainable: bool,
}

impl Variable {
    pub fn new(
        graph: &Graph,
        name: &str,
        shape: &[usize],
        init: Init,
        trainable: bool,
    ) -> Result<Self, GraphError> {
        let output = graph.variable(shape, name)?;
        let full_name = graph.node_name(output.node())?;
        let initial = init.build(&graph.with_name(name), shape)?;
        let assign = graph.assign(output, initial)?;
        graph.register_init_op(assign)?;
        if trainable {
            graph.register_trainable(output)?;
        }
        Ok(Self {
            output,
            name: full_name,
            shape: shape.to_vec(),
            trainable,
        })
    }

    /// 读取该变量的输出（每次执行时取存储槽中的当前值）
    pub const fn output(&self) -> Output {
        self.output
    }

    /// 节点全名（含作用域）
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub const fn is_trainable(&self) -> bool {
        self.trainable
    }

    /// 当前存储的值
    pub fn value(&self, graph: &Graph) -> Result<Tensor, GraphError> {
        graph.variable_value(self.output)
    }
}
