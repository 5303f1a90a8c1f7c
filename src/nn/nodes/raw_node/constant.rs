use super::{ForwardContext, NodeHandle, NodeId, TraitNode};
use crate::nn::{DeviceDescriptor, GraphError};
use crate::tensor::Tensor;

/// 常量节点：值在创建后不可更改
pub(in crate::nn) struct Constant {
    id: Option<NodeId>,
    name: Option<String>,
    value: Tensor,
    shape: Vec<usize>,
    device: DeviceDescriptor,
}

impl Constant {
    pub(in crate::nn) fn new(value: Tensor, device: DeviceDescriptor) -> Self {
        Self {
            id: None,
            name: None,
            shape: value.shape().to_vec(),
            value,
            device,
        }
    }
}

impl TraitNode for Constant {
    fn id(&self) -> NodeId {
        self.id.unwrap()
    }

    fn set_id(&mut self, id: NodeId) {
        self.id = Some(id);
    }

    fn name(&self) -> &str {
        self.name.as_ref().unwrap()
    }

    fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        _parents: &[&NodeHandle],
        _ctx: &ForwardContext,
    ) -> Result<(), GraphError> {
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        Some(&self.value)
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn device(&self) -> Option<DeviceDescriptor> {
        Some(self.device)
    }
}
