/*
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、追加节点（含构图期形状推断）、注册表
 * - run.rs: 前向执行、变量初始化
 */

mod core;
mod run;

use crate::nn::nodes::NodeHandle;
use crate::nn::{GraphError, GraphId, NodeId, Output};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构。节点按创建顺序存放，`NodeId`即其下标。
pub struct GraphInner {
    pub(in crate::nn::graph) id: GraphId,
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: Vec<NodeHandle>,
    /// 节点名 -> 已使用次数（显式命名重复时追加`_n`后缀）
    pub(in crate::nn::graph) name_counts: HashMap<String, usize>,
    /// 变量存储槽：变量节点 id -> 当前值
    pub(in crate::nn::graph) variables: HashMap<NodeId, Tensor>,
    /// 可训练变量及其形状（按注册顺序）
    pub(in crate::nn::graph) trainables: Vec<(Output, Vec<usize>)>,
    /// 变量的初始赋值节点，由`initialize`统一执行
    pub(in crate::nn::graph) init_ops: Vec<Output>,
    /// 训练模式构图时登记的更新节点（如滑动均值的更新）
    pub(in crate::nn::graph) update_ops: Vec<Output>,
    /// 图级别的随机数生成器（初始化器、随机节点、dropout 共用）
    pub(in crate::nn::graph) rng: StdRng,
    /// 第一次构图失败的错误；之后的构图调用一律失败
    pub(in crate::nn::graph) status: Option<GraphError>,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
