mod constant;
mod input;
mod ops;
mod parameter;

pub(in crate::nn) use constant::Constant;
pub(in crate::nn) use input::Input;
pub use ops::{BatchNormConfig, ConvolutionConfig, PoolingConfig, PoolingType};
pub(in crate::nn) use ops::{BatchNormalization, Convolution, Dropout, Plus, Pooling, ReLU};
pub(in crate::nn) use parameter::Parameter;

use super::{NodeHandle, NodeId};
use crate::nn::{DeviceDescriptor, GraphError};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

/// 一次前向传播的上下文
#[derive(Debug, Clone, Copy)]
pub(in crate::nn) struct ForwardContext {
    pub is_train_mode: bool,
}

#[enum_dispatch]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Constant(Constant),
    Convolution(Convolution),
    Pooling(Pooling),
    Plus(Plus),
    ReLU(ReLU),
    Dropout(Dropout),
    BatchNormalization(BatchNormalization),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    fn id(&self) -> NodeId;

    fn set_id(&mut self, id: NodeId);

    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    /// 节点创建时就已确定的输出形状
    fn value_expected_shape(&self) -> &[usize];

    // 根据父节点的值计算本节点的值（由 Graph 保证调用前所有父节点的值均已计算）
    fn calc_value_by_parents(
        &mut self,
        parents: &[&NodeHandle],
        ctx: &ForwardContext,
    ) -> Result<(), GraphError>;

    fn value(&self) -> Option<&Tensor>;

    fn set_value(&mut self, _value: Option<&Tensor>) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "节点{}的值不应该被手动设置",
            self.name()
        )))
    }

    /// 叶子节点（输入/参数/常量）的值不由父节点计算
    fn is_leaf(&self) -> bool {
        false
    }

    /// 参数/常量节点所在的设备
    fn device(&self) -> Option<DeviceDescriptor> {
        None
    }

    /// 取出本次前向传播中需要写回父节点的新值（如批归一化的滑动统计量）
    ///
    /// 每一项为 (父节点在 parents 中的下标, 新值)。
    fn take_parent_updates(&mut self) -> Vec<(usize, Tensor)> {
        Vec::new()
    }

    fn display_node(&self) -> String {
        format!("[id={}, name={}]", self.id().0, self.name())
    }
}

/// 取父节点的值，若未计算则报错（正常情况下不该触及）
pub(in crate::nn) fn parent_value<'a>(
    node: &impl TraitNode,
    parents: &[&'a NodeHandle],
    index: usize,
) -> Result<&'a Tensor, GraphError> {
    let parent: &'a NodeHandle = parents.get(index).copied().ok_or_else(|| {
        GraphError::ComputationError(format!("{}缺少第{index}个父节点", node.display_node()))
    })?;
    parent.value().ok_or_else(|| {
        GraphError::ComputationError(format!(
            "{}的父{}没有值。不该触及本错误，否则说明crate代码有问题",
            node.display_node(),
            parent
        ))
    })
}
