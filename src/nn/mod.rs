/*
 * @Description  : 负责神经网络（neural network）的构建：计算图、层与 DCGAN 模型
 */

pub mod functional;
mod graph;
mod init;
pub mod layer;
pub mod model;
mod module;
mod nodes;
mod variable;

pub use graph::{FusedBatchNormOutput, Graph, GraphError, GraphInner};
pub use init::Init;
pub use module::Module;
pub use nodes::{GraphId, NodeId, Output};
pub use variable::Variable;

#[cfg(test)]
mod tests;
