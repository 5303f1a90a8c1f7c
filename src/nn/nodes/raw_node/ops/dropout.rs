use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ForwardContext, TraitNode, parent_value};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::tensor::Tensor;
use rand::Rng;
use rand::rngs::StdRng;

/// Dropout 节点（inverted dropout）
///
/// 训练模式下以概率 p 置零，其余元素乘以 1/(1-p)；评估模式下原样输出。
pub(in crate::nn) struct Dropout {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    shape: Vec<usize>,
    p: f64,
    rng: StdRng,
}

impl Dropout {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        p: f64,
        rng: StdRng,
    ) -> Result<Self, GraphError> {
        if parents.len() != 1 {
            return Err(GraphError::InvalidOperation(
                "Dropout 节点需要 1 个父节点".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&p) {
            return Err(GraphError::InvalidOperation(format!(
                "Dropout 的丢弃概率须在[0, 1)内，得到{p}"
            )));
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            shape: parents[0].value_expected_shape().to_vec(),
            p,
            rng,
        })
    }
}

impl TraitNode for Dropout {
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
        ctx: &ForwardContext,
    ) -> Result<(), GraphError> {
        let input = parent_value(self, parents, 0)?;
        if !ctx.is_train_mode || self.p == 0.0 {
            self.value = Some(input.clone());
            return Ok(());
        }

        let keep_scale = (1.0 / (1.0 - self.p)) as f32;
        let p = self.p;
        let rng = &mut self.rng;
        self.value = Some(input.map(|x| {
            if rng.r#gen::<f64>() < p {
                0.0
            } else {
                x * keep_scale
            }
        }));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }
}
