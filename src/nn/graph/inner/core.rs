/*
 * @Date         : 2026-10-16
 * @Description  : GraphInner 核心操作 + 前向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::{ForwardContext, NodeHandle};
use crate::nn::{DeviceDescriptor, NodeId};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::build("default_graph", None)
    }

    /// 创建一个带固定种子的计算图（确保参数初始化与 Dropout 可复现）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::build("default_graph", Some(seed))
    }

    pub fn with_name(name: &str) -> Self {
        Self::build(name, None)
    }

    fn build(name: &str, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            forward_edges: HashMap::new(),
            backward_edges: HashMap::new(),
            last_forward_pass_id: 0,
            next_id: 0,
            is_eval_mode: false,
            rng,
            seed,
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids = self.nodes.keys().copied().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_type_name(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.get_node(id)?.type_name())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)
    }

    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    pub fn get_node_device(&self, id: NodeId) -> Result<Option<DeviceDescriptor>, GraphError> {
        Ok(self.get_node(id)?.device())
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        // 先递增再返回，所以第一个节点 ID 是 1
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.nodes.values().any(|node| node.name() == name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    pub(in crate::nn::graph) fn generate_valid_new_node_name(
        &self,
        base_name: &str,
        node_type: &str,
    ) -> Result<String, GraphError> {
        if !base_name.is_empty() {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = self.nodes.len() + 1;
        loop {
            let name = format!("{node_type}_{counter}");
            if self.check_duplicate_node_name(&name).is_ok() {
                return Ok(name);
            }
            counter += 1;
        }
    }

    // ========== 前向传播 ==========

    pub fn forward(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let new_graph_forward_pass_id = self.last_forward_pass_id + 1;
        self.forward_node_internal(node_id, new_graph_forward_pass_id)?;
        self.last_forward_pass_id = new_graph_forward_pass_id;
        Ok(())
    }

    fn forward_node_internal(
        &mut self,
        node_id: NodeId,
        new_graph_forward_pass_id: u64,
    ) -> Result<(), GraphError> {
        let node = self.get_node(node_id)?;
        if node.is_leaf() {
            if node.has_value() {
                return Ok(());
            }
            return Err(GraphError::InvalidOperation(format!(
                "{node}没有值，请先通过 set_value 喂入数据"
            )));
        }
        if node.last_forward_pass_id() == new_graph_forward_pass_id {
            return Ok(());
        }

        let parents_ids = self.get_node_parents(node_id)?;
        for parent_id in &parents_ids {
            self.forward_node_internal(*parent_id, new_graph_forward_pass_id)?;
        }

        // 暂时把节点移出，以便同时借用其父节点
        let ctx = ForwardContext {
            is_train_mode: self.is_train_mode(),
        };
        let mut node = self
            .nodes
            .remove(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        let result = self
            .get_nodes(&parents_ids)
            .and_then(|parents| node.calc_value_by_parents(&parents, &ctx));
        let parent_updates = node.take_parent_updates();
        node.set_last_forward_pass_id(new_graph_forward_pass_id);
        log::trace!("前向计算{node}");
        self.nodes.insert(node_id, node);
        result?;

        for (index, value) in parent_updates {
            self.set_node_value(parents_ids[index], Some(&value))?;
        }
        Ok(())
    }
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
