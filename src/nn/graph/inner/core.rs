/*
 * @Description  : GraphInner 核心操作：创建、追加节点、查询、注册表
 */

use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{NodeType, TraitNode};
use crate::nn::{GraphError, GraphId, NodeId, Output};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    /// 创建一个带固定种子的计算图（确保可重复性）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::build("default_graph", StdRng::seed_from_u64(seed))
    }

    pub fn with_name(name: &str) -> Self {
        Self::build(name, StdRng::from_entropy())
    }

    /// 创建一个带名称和固定种子的计算图
    pub fn with_name_and_seed(name: &str, seed: u64) -> Self {
        Self::build(name, StdRng::seed_from_u64(seed))
    }

    fn build(name: &str, rng: StdRng) -> Self {
        Self {
            id: GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.to_string(),
            nodes: Vec::new(),
            name_counts: HashMap::new(),
            variables: HashMap::new(),
            trainables: Vec::new(),
            init_ops: Vec::new(),
            update_ops: Vec::new(),
            rng,
            status: None,
        }
    }

    // ========== 基础访问 ==========

    pub const fn id(&self) -> GraphId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 第一次构图失败时记录下的错误，图健康时为None
    pub const fn status(&self) -> Option<&GraphError> {
        self.status.as_ref()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.nodes.get(i))
            .ok_or(GraphError::NodeNotFound(id))
    }

    pub fn node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn node_kind(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.get_node(id)?.kind())
    }

    /// 某个输出在构图期推断出的形状
    pub fn shape_of(&self, output: Output) -> Result<Vec<usize>, GraphError> {
        self.check_output(output)?;
        let node = self.get_node(output.node())?;
        Ok(node.output_shapes()[output.index()].clone())
    }

    pub fn is_variable(&self, output: Output) -> Result<bool, GraphError> {
        self.check_output(output)?;
        Ok(self.get_node(output.node())?.raw_node().is_variable())
    }

    /// 输出必须属于本图、节点存在且输出下标合法
    fn check_output(&self, output: Output) -> Result<(), GraphError> {
        if output.graph_id() != self.id {
            return Err(GraphError::InvalidOperation(format!(
                "节点{:?}不属于图{}，不能跨图连接",
                output.node(),
                self.name
            )));
        }
        let node = self.get_node(output.node())?;
        if output.index() >= node.output_shapes().len() {
            return Err(GraphError::InvalidOperation(format!(
                "{node}只有{}个输出，但请求了第{}个",
                node.output_shapes().len(),
                output.index()
            )));
        }
        Ok(())
    }

    // ========== 追加节点 ==========

    /// 追加一个节点，返回其第0号输出。
    ///
    /// 节点名：显式给出`name`时为`name`（重名时追加`_n`），否则为`类型:id`；
    /// `scope`非空时再加上`scope/`前缀。
    /// 任何失败都会被记录为图的状态，此后所有追加都返回`GraphConstruction`。
    pub(in crate::nn) fn add_node(
        &mut self,
        raw_node: NodeType,
        inputs: &[Output],
        scope: &str,
        name: Option<&str>,
    ) -> Result<Output, GraphError> {
        if let Some(err) = &self.status {
            return Err(GraphError::GraphConstruction(err.to_string()));
        }
        let result = self.try_add_node(raw_node, inputs, scope, name);
        if let Err(e) = &result {
            tracing::warn!(graph = %self.name, error = %e, "构图失败");
            self.status = Some(e.clone());
        }
        result
    }

    fn try_add_node(
        &mut self,
        raw_node: NodeType,
        inputs: &[Output],
        scope: &str,
        name: Option<&str>,
    ) -> Result<Output, GraphError> {
        for &input in inputs {
            self.check_output(input)?;
        }
        let input_shapes: Vec<Vec<usize>> = inputs
            .iter()
            .map(|&o| self.shape_of(o))
            .collect::<Result<_, _>>()?;
        let shape_refs: Vec<&[usize]> = input_shapes.iter().map(Vec::as_slice).collect();
        let output_shapes = raw_node.infer_shapes(&shape_refs)?;

        let id = NodeId(self.nodes.len() as u64);
        let base = name.map_or_else(|| format!("{}:{}", raw_node.kind(), id.0), str::to_string);
        let full_name = self.unique_name(if scope.is_empty() {
            base
        } else {
            format!("{scope}/{base}")
        });
        tracing::trace!(graph = %self.name, node = %full_name, shapes = ?output_shapes, "追加节点");

        self.nodes.push(NodeHandle::new(
            id,
            full_name,
            raw_node,
            inputs.to_vec(),
            output_shapes,
        ));
        Ok(Output::new(self.id, id, 0))
    }

    fn unique_name(&mut self, name: String) -> String {
        let count = self.name_counts.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            name
        } else {
            format!("{name}_{}", *count - 1)
        }
    }

    // ========== 注册表 ==========

    pub(in crate::nn) fn register_trainable(&mut self, var: Output) -> Result<(), GraphError> {
        let shape = self.shape_of(var)?;
        self.trainables.push((var, shape));
        Ok(())
    }

    pub(in crate::nn) fn register_init_op(&mut self, op: Output) -> Result<(), GraphError> {
        self.check_output(op)?;
        self.init_ops.push(op);
        Ok(())
    }

    pub fn register_update_op(&mut self, op: Output) -> Result<(), GraphError> {
        self.check_output(op)?;
        self.update_ops.push(op);
        Ok(())
    }

    /// 可训练变量及其形状（按注册顺序）
    pub fn trainable_variables(&self) -> &[(Output, Vec<usize>)] {
        &self.trainables
    }

    pub fn update_ops(&self) -> &[Output] {
        &self.update_ops
    }

    pub fn init_ops(&self) -> &[Output] {
        &self.init_ops
    }
}
