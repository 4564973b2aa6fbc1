use super::raw_node::{ComputeContext, NodeType, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 计算图的标识：每张图在创建时分配一个进程内唯一的值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// 节点的某一个输出。除融合批归一化（3个输出）外，节点都只有第0号输出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Output {
    graph: GraphId,
    node: NodeId,
    index: usize,
}

impl Output {
    pub(crate) const fn new(graph: GraphId, node: NodeId, index: usize) -> Self {
        Self { graph, node, index }
    }

    pub const fn graph_id(&self) -> GraphId {
        self.graph
    }

    pub const fn node(&self) -> NodeId {
        self.node
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    /// 同一节点的另一个输出
    pub(crate) const fn with_index(&self, index: usize) -> Self {
        Self {
            graph: self.graph,
            node: self.node,
            index,
        }
    }
}

pub(crate) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    inputs: Vec<Output>,
    output_shapes: Vec<Vec<usize>>,
}

impl NodeHandle {
    pub(crate) fn new(
        id: NodeId,
        name: String,
        raw_node: NodeType,
        inputs: Vec<Output>,
        output_shapes: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            id,
            name,
            raw_node,
            inputs,
            output_shapes,
        }
    }

    pub(crate) const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn kind(&self) -> &'static str {
        self.raw_node.kind()
    }

    pub(crate) const fn raw_node(&self) -> &NodeType {
        &self.raw_node
    }

    pub(crate) fn inputs(&self) -> &[Output] {
        &self.inputs
    }

    pub(crate) fn output_shapes(&self) -> &[Vec<usize>] {
        &self.output_shapes
    }

    pub(crate) fn compute(
        &self,
        inputs: &[&Tensor],
        ctx: &mut ComputeContext<'_>,
    ) -> Result<Vec<Tensor>, GraphError> {
        self.raw_node.compute(inputs, ctx)
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id.0,
            self.name,
            self.kind()
        )
    }
}
