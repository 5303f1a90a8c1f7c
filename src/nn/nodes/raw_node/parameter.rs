use super::{ForwardContext, NodeHandle, NodeId, TraitNode};
use crate::nn::{DeviceDescriptor, GraphError};
use crate::tensor::Tensor;

/// 可训练参数节点：创建时即带值，放置在指定设备上
pub(in crate::nn) struct Parameter {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    shape: Vec<usize>,
    device: DeviceDescriptor,
}

impl Parameter {
    pub(in crate::nn) fn new(value: Tensor, device: DeviceDescriptor) -> Self {
        Self {
            id: None,
            name: None,
            shape: value.shape().to_vec(),
            value: Some(value),
            device,
        }
    }
}

impl TraitNode for Parameter {
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
        Err(GraphError::InvalidOperation(format!(
            "参数{}不能通过前向传播计算",
            self.display_node()
        )))
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        let Some(value) = value else {
            return Err(GraphError::InvalidOperation(format!(
                "参数{}的值不能被清空",
                self.display_node()
            )));
        };
        if value.shape() != self.shape.as_slice() {
            return Err(GraphError::ShapeMismatch {
                expected: self.shape.clone(),
                got: value.shape().to_vec(),
                message: format!("参数{}的新值形状不符", self.display_node()),
            });
        }
        self.value = Some(value.clone());
        Ok(())
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn device(&self) -> Option<DeviceDescriptor> {
        Some(self.device)
    }
}
