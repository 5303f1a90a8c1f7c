use super::{ForwardContext, NodeHandle, NodeId, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 输入节点：值由调用方通过 `set_value` 喂入
pub(in crate::nn) struct Input {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl Input {
    pub(in crate::nn) fn new(shape: &[usize]) -> Result<Self, GraphError> {
        if shape.is_empty() || shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "输入节点的形状须非空且各维大于0，得到{shape:?}"
            )));
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Input {
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
            "输入{}的值应通过 set_value 设置，而非通过前向传播计算",
            self.display_node()
        )))
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(value) = value {
            if value.shape() != self.shape.as_slice() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.shape.clone(),
                    got: value.shape().to_vec(),
                    message: format!("喂给输入{}的张量形状不符", self.display_node()),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    fn is_leaf(&self) -> bool {
        true
    }
}
