/*
 * @Description  : GraphInner 前向执行
 *
 * 每次执行维护一份备忘表：同一节点在一次执行中至多计算一次，
 * 因此一次执行内对同一变量的多次读取看到的都是首次读取时的值。
 * 随机节点每次执行都会重新抽样。
 */

use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::ComputeContext;
use crate::nn::{GraphError, NodeId, Output};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use std::collections::HashMap;

type Memo = HashMap<NodeId, Vec<Tensor>>;

impl GraphInner {
    /// 计算`fetches`各输出的值
    pub fn run(&mut self, fetches: &[Output]) -> Result<Vec<Tensor>, GraphError> {
        self.run_with_targets(fetches, &[])
    }

    /// 先计算`fetches`，再执行`targets`（通常是带副作用的赋值/更新节点）。
    /// 返回值只包含`fetches`的结果。
    pub fn run_with_targets(
        &mut self,
        fetches: &[Output],
        targets: &[Output],
    ) -> Result<Vec<Tensor>, GraphError> {
        for &output in fetches.iter().chain(targets) {
            self.shape_of(output)?;
        }
        tracing::debug!(
            graph = %self.name,
            fetches = fetches.len(),
            targets = targets.len(),
            "执行计算图"
        );

        let Self {
            nodes,
            variables,
            rng,
            ..
        } = self;
        let mut memo = Memo::new();
        let mut results = Vec::with_capacity(fetches.len());
        for &output in fetches {
            let values = evaluate(nodes, variables, rng, &mut memo, output.node())?;
            results.push(values[output.index()].clone());
        }
        for &output in targets {
            evaluate(nodes, variables, rng, &mut memo, output.node())?;
        }
        Ok(results)
    }

    /// 执行所有变量的初始赋值
    pub fn initialize(&mut self) -> Result<(), GraphError> {
        let init_ops = self.init_ops.clone();
        tracing::debug!(graph = %self.name, count = init_ops.len(), "初始化变量");
        self.run_with_targets(&[], &init_ops)?;
        Ok(())
    }

    /// 读取变量存储槽中的当前值（不经过执行）
    pub fn variable_value(&self, var: Output) -> Result<Tensor, GraphError> {
        if !self.is_variable(var)? {
            return Err(GraphError::InvalidOperation(format!(
                "{}不是变量节点",
                self.get_node(var.node())?
            )));
        }
        self.variables
            .get(&var.node())
            .cloned()
            .ok_or_else(|| GraphError::UninitializedVariable(self.name_or_id(var.node())))
    }

    fn name_or_id(&self, id: NodeId) -> String {
        self.node_name(id)
            .map_or_else(|_| format!("{id:?}"), str::to_string)
    }
}

fn evaluate<'m>(
    nodes: &[NodeHandle],
    variables: &mut HashMap<NodeId, Tensor>,
    rng: &mut StdRng,
    memo: &'m mut Memo,
    id: NodeId,
) -> Result<&'m Vec<Tensor>, GraphError> {
    if !memo.contains_key(&id) {
        let node = usize::try_from(id.0)
            .ok()
            .and_then(|i| nodes.get(i))
            .ok_or(GraphError::NodeNotFound(id))?;
        for input in node.inputs() {
            evaluate(nodes, variables, rng, memo, input.node())?;
        }
        let values = {
            let inputs: Vec<&Tensor> = node
                .inputs()
                .iter()
                .map(|o| &memo[&o.node()][o.index()])
                .collect();
            let mut ctx = ComputeContext {
                node: id,
                node_name: node.name(),
                rng: &mut *rng,
                variables: &mut *variables,
            };
            node.compute(&inputs, &mut ctx)?
        };
        memo.insert(id, values);
    }
    memo.get(&id).ok_or(GraphError::NodeNotFound(id))
}
