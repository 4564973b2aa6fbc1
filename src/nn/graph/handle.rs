/*
 * @Description  : Graph 句柄（用户级 API）
 */

use super::error::GraphError;
use super::inner::GraphInner;
use crate::nn::nodes::raw_node::NodeType;
use crate::nn::{NodeId, Output};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// Graph - 计算图句柄
///
/// # 设计原则
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装，外加一个名字作用域
/// - Clone 语义：多个 Graph 引用同一个 GraphInner
/// - `with_name`得到的句柄与原句柄共享同一张图，只是新节点名带上作用域前缀
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
    scope: String,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    // ==================== 创建 ====================

    /// 创建新图（随机数种子取自系统熵）
    pub fn new() -> Self {
        Self::from_inner(GraphInner::new())
    }

    /// 创建带种子的图：图内所有随机抽样都可复现
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_inner(GraphInner::new_with_seed(seed))
    }

    /// 从现有 GraphInner 创建句柄
    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
            scope: String::new(),
        }
    }

    /// 获取内部 GraphInner 的不可变引用
    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    /// 获取内部 GraphInner 的可变引用
    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    /// 返回一个嵌套了名字作用域的句柄（作用域以`/`连接）
    pub fn with_name(&self, name: &str) -> Self {
        let scope = if self.scope.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.scope)
        };
        Self {
            inner: Rc::clone(&self.inner),
            scope,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    // ==================== 构图 ====================

    pub(crate) fn add_node(&self, raw_node: NodeType, inputs: &[Output]) -> Result<Output, GraphError> {
        self.inner
            .borrow_mut()
            .add_node(raw_node, inputs, &self.scope, None)
    }

    pub(crate) fn add_named_node(
        &self,
        raw_node: NodeType,
        inputs: &[Output],
        name: &str,
    ) -> Result<Output, GraphError> {
        self.inner
            .borrow_mut()
            .add_node(raw_node, inputs, &self.scope, Some(name))
    }

    /// 第一次构图失败时记录的错误
    pub fn status(&self) -> Option<GraphError> {
        self.inner.borrow().status().cloned()
    }

    // ==================== 注册表 ====================

    pub fn register_trainable(&self, var: Output) -> Result<(), GraphError> {
        self.inner.borrow_mut().register_trainable(var)
    }

    pub(crate) fn register_init_op(&self, op: Output) -> Result<(), GraphError> {
        self.inner.borrow_mut().register_init_op(op)
    }

    /// 登记一个需要在训练步中随前向一起执行的更新节点
    pub fn register_update_op(&self, op: Output) -> Result<(), GraphError> {
        self.inner.borrow_mut().register_update_op(op)
    }

    pub fn update_ops(&self) -> Vec<Output> {
        self.inner.borrow().update_ops().to_vec()
    }

    pub fn trainable_variables(&self) -> Vec<(Output, Vec<usize>)> {
        self.inner.borrow().trainable_variables().to_vec()
    }

    // ==================== 执行 ====================

    pub fn run(&self, fetches: &[Output]) -> Result<Vec<Tensor>, GraphError> {
        self.inner.borrow_mut().run(fetches)
    }

    pub fn run_with_targets(
        &self,
        fetches: &[Output],
        targets: &[Output],
    ) -> Result<Vec<Tensor>, GraphError> {
        self.inner.borrow_mut().run_with_targets(fetches, targets)
    }

    /// 执行所有变量的初始赋值
    pub fn initialize(&self) -> Result<(), GraphError> {
        self.inner.borrow_mut().initialize()
    }

    pub fn variable_value(&self, var: Output) -> Result<Tensor, GraphError> {
        self.inner.borrow().variable_value(var)
    }

    // ==================== 查询 ====================

    pub fn shape_of(&self, output: Output) -> Result<Vec<usize>, GraphError> {
        self.inner.borrow().shape_of(output)
    }

    pub fn node_name(&self, id: NodeId) -> Result<String, GraphError> {
        self.inner.borrow().node_name(id).map(str::to_string)
    }

    pub fn node_kind(&self, id: NodeId) -> Result<&'static str, GraphError> {
        self.inner.borrow().node_kind(id)
    }

    pub fn node_count(&self) -> usize {
        self.inner.borrow().node_count()
    }

    pub fn is_variable(&self, output: Output) -> Result<bool, GraphError> {
        self.inner.borrow().is_variable(output)
    }
}
