use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ForwardContext, TraitNode, parent_value};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::tensor::Tensor;
use ndarray::IxDyn;

/// 逐元素相加节点，长度为1的维度可被广播
pub(in crate::nn) struct Plus {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl Plus {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "Plus 节点需要 2 个父节点".to_string(),
            ));
        }
        let left = parents[0].value_expected_shape();
        let right = parents[1].value_expected_shape();
        let mismatch = || GraphError::ShapeMismatch {
            expected: left.to_vec(),
            got: right.to_vec(),
            message: "Plus 的两个父节点形状无法广播".to_string(),
        };
        if left.len() != right.len() {
            return Err(mismatch());
        }
        let shape = left
            .iter()
            .zip(right)
            .map(|(&l, &r)| match (l, r) {
                _ if l == r => Ok(l),
                (1, _) => Ok(r),
                (_, 1) => Ok(l),
                _ => Err(mismatch()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: None,
            name: None,
            value: None,
            shape,
        })
    }
}

impl TraitNode for Plus {
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
        parents: &[&NodeHandle],
        _ctx: &ForwardContext,
    ) -> Result<(), GraphError> {
        let left = parent_value(self, parents, 0)?.view();
        let right = parent_value(self, parents, 1)?.view();
        let broadcast_error = || {
            GraphError::ComputationError(format!("{}的父节点值无法广播", self.display_node()))
        };
        let shape = IxDyn(&self.shape);
        let left = left.broadcast(shape.clone()).ok_or_else(broadcast_error)?;
        let right = right.broadcast(shape).ok_or_else(broadcast_error)?;

        self.value = Some(Tensor::from_array(&left + &right));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }
}
