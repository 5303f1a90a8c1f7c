/*
 * @Date         : 2026-10-16
 * @Description  : 2D 池化节点（最大/平均，通道在后）
 *
 * 输入 [H, W, C]，输出 [H', W', C]，各通道独立池化。
 * 落在填充区的位置不参与计算：最大池化忽略它们，平均池化只对有效元素求均值。
 */

use super::geometry::{AxisGeometry, axis_value, input_index, resolve_axis};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ForwardContext, TraitNode, parent_value};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolingType {
    Max,
    Average,
}

/// 池化的全部显式参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolingConfig {
    pub pooling_type: PoolingType,
    /// 窗口大小 (pH, pW)
    pub window: [usize; 2],
    /// 步长 (sH, sW)
    pub strides: [usize; 2],
    pub auto_padding: Vec<bool>,
    pub lower_pad: Vec<usize>,
    pub upper_pad: Vec<usize>,
}

pub(in crate::nn) struct Pooling {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    shape: Vec<usize>,
    pooling_type: PoolingType,
    axes: [AxisGeometry; 2],
}

impl Pooling {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        config: &PoolingConfig,
    ) -> Result<Self, GraphError> {
        if parents.len() != 1 {
            return Err(GraphError::InvalidOperation(
                "Pooling 节点需要 1 个父节点".to_string(),
            ));
        }
        let input_shape = parents[0].value_expected_shape();
        if input_shape.len() != 3 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![0, 0, 0],
                got: input_shape.to_vec(),
                message: format!("池化输入必须是 3 阶 [H, W, C]，得到 {input_shape:?}"),
            });
        }

        let resolve = |axis: usize| {
            resolve_axis(
                input_shape[axis],
                config.window[axis],
                config.strides[axis],
                axis_value(&config.auto_padding, axis, false),
                axis_value(&config.lower_pad, axis, 0),
                axis_value(&config.upper_pad, axis, 0),
                false,
            )
        };
        let axes = [resolve(0)?, resolve(1)?];

        Ok(Self {
            id: None,
            name: None,
            value: None,
            shape: vec![axes[0].output, axes[1].output, input_shape[2]],
            pooling_type: config.pooling_type,
            axes,
        })
    }

    fn pool(&self, input: &Tensor) -> Tensor {
        let (in_h, in_w, channels) = (input.shape()[0], input.shape()[1], input.shape()[2]);
        let [axis_h, axis_w] = self.axes;
        let mut output = Tensor::zeros(&self.shape);

        for oh in 0..axis_h.output {
            for ow in 0..axis_w.output {
                for c in 0..channels {
                    let mut max = f32::NEG_INFINITY;
                    let mut sum = 0.0f32;
                    let mut count = 0usize;
                    for kh in 0..axis_h.kernel {
                        let Some(ih) = input_index(&axis_h, oh, kh, in_h) else {
                            continue;
                        };
                        for kw in 0..axis_w.kernel {
                            let Some(iw) = input_index(&axis_w, ow, kw, in_w) else {
                                continue;
                            };
                            let x = input[[ih, iw, c]];
                            max = max.max(x);
                            sum += x;
                            count += 1;
                        }
                    }
                    // 窗口完全落在填充区时输出0
                    output[[oh, ow, c]] = match (self.pooling_type, count) {
                        (_, 0) => 0.0,
                        (PoolingType::Max, _) => max,
                        (PoolingType::Average, n) => sum / n as f32,
                    };
                }
            }
        }
        output
    }
}

impl TraitNode for Pooling {
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
        let input = parent_value(self, parents, 0)?;
        self.value = Some(self.pool(input));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }
}
