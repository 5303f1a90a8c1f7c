/*
 * @Date         : 2026-10-16
 * @Description  : 计算图节点：节点 ID、节点句柄，以及各类原始节点
 */

pub(in crate::nn) mod raw_node;

pub use raw_node::{BatchNormConfig, ConvolutionConfig, PoolingConfig, PoolingType};
pub(in crate::nn) use raw_node::{ForwardContext, NodeType, TraitNode};

use super::{DeviceDescriptor, GraphError};
use crate::tensor::Tensor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// 图中保存的节点：原始节点 + 前向传播的簿记信息
pub(in crate::nn) struct NodeHandle {
    raw_node: NodeType,
    type_name: &'static str,
    last_forward_pass_id: u64,
}

impl NodeHandle {
    pub(in crate::nn) fn new<T: Into<NodeType>>(raw_node: T, type_name: &'static str) -> Self {
        Self {
            raw_node: raw_node.into(),
            type_name,
            last_forward_pass_id: 0,
        }
    }

    pub(in crate::nn) fn bind_id_and_name(&mut self, id: NodeId, name: &str) {
        self.raw_node.set_id(id);
        self.raw_node.set_name(name);
    }

    pub(in crate::nn) fn id(&self) -> NodeId {
        self.raw_node.id()
    }

    pub(in crate::nn) fn name(&self) -> &str {
        self.raw_node.name()
    }

    pub(in crate::nn) const fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(in crate::nn) fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    pub(in crate::nn) fn value(&self) -> Option<&Tensor> {
        self.raw_node.value()
    }

    pub(in crate::nn) fn has_value(&self) -> bool {
        self.raw_node.value().is_some()
    }

    pub(in crate::nn) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_value(value)
    }

    pub(in crate::nn) fn device(&self) -> Option<DeviceDescriptor> {
        self.raw_node.device()
    }

    pub(in crate::nn) fn is_leaf(&self) -> bool {
        self.raw_node.is_leaf()
    }

    pub(in crate::nn) fn calc_value_by_parents(
        &mut self,
        parents: &[&NodeHandle],
        ctx: &ForwardContext,
    ) -> Result<(), GraphError> {
        self.raw_node.calc_value_by_parents(parents, ctx)
    }

    pub(in crate::nn) fn take_parent_updates(&mut self) -> Vec<(usize, Tensor)> {
        self.raw_node.take_parent_updates()
    }

    pub(in crate::nn) const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub(in crate::nn) const fn set_last_forward_pass_id(&mut self, pass_id: u64) {
        self.last_forward_pass_id = pass_id;
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id().0,
            self.name(),
            self.type_name
        )
    }
}
