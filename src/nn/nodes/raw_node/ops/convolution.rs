/*
 * @Date         : 2026-10-16
 * @Description  : 2D 卷积节点（通道在后，支持自动填充、非对称填充与转置卷积）
 *
 * 父节点：
 * - parents[0]: 卷积核 [kH, kW, C_in, C_out]
 * - parents[1]: 输入 [H, W, C_in]
 *
 * 输出：[H', W', C_out]。通道轴总被整体规约，故其步长须等于 C_in。
 */

use super::geometry::{AxisGeometry, axis_value, input_index, resolve_axis};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ForwardContext, TraitNode, parent_value};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::tensor::Tensor;

/// 卷积的全部显式参数（各向量按“不足则重复最后一个值”广播到三个轴）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvolutionConfig {
    /// 各轴步长 (sH, sW, C_in)
    pub strides: Vec<usize>,
    /// 各轴是否共享权重（本引擎只支持全共享）
    pub sharing: Vec<bool>,
    /// 各轴是否由引擎自动决定填充
    pub auto_padding: Vec<bool>,
    pub lower_pad: Vec<usize>,
    pub upper_pad: Vec<usize>,
    /// 是否为转置卷积
    pub transpose: bool,
}

impl Default for ConvolutionConfig {
    fn default() -> Self {
        Self {
            strides: vec![1],
            sharing: vec![true],
            auto_padding: vec![true],
            lower_pad: vec![0],
            upper_pad: vec![0],
            transpose: false,
        }
    }
}

pub(in crate::nn) struct Convolution {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    shape: Vec<usize>,
    axes: [AxisGeometry; 2],
    transpose: bool,
}

impl Convolution {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        config: &ConvolutionConfig,
    ) -> Result<Self, GraphError> {
        // 1. 验证父节点数量
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "Convolution 节点需要 2 个父节点：[卷积核, 输入]".to_string(),
            ));
        }
        let kernel_shape = parents[0].value_expected_shape();
        let input_shape = parents[1].value_expected_shape();

        // 2. 验证形状
        if kernel_shape.len() != 4 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![0, 0, 0, 0],
                got: kernel_shape.to_vec(),
                message: format!("卷积核必须是 4 阶 [kH, kW, C_in, C_out]，得到 {kernel_shape:?}"),
            });
        }
        if input_shape.len() != 3 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![0, 0, 0],
                got: input_shape.to_vec(),
                message: format!("卷积输入必须是 3 阶 [H, W, C_in]，得到 {input_shape:?}"),
            });
        }
        let in_channels = input_shape[2];
        if kernel_shape[2] != in_channels {
            return Err(GraphError::ShapeMismatch {
                expected: vec![in_channels],
                got: vec![kernel_shape[2]],
                message: format!(
                    "输入通道数 {in_channels} 与卷积核输入通道数 {} 不匹配",
                    kernel_shape[2]
                ),
            });
        }
        if config.sharing.iter().any(|&shared| !shared) {
            return Err(GraphError::InvalidOperation(
                "Convolution 只支持全部轴共享权重".to_string(),
            ));
        }
        let channel_stride = axis_value(&config.strides, 2, in_channels);
        if channel_stride != in_channels {
            return Err(GraphError::InvalidOperation(format!(
                "通道轴步长须等于输入通道数 {in_channels}，得到 {channel_stride}"
            )));
        }

        // 3. 逐空间轴解析填充与输出尺寸
        let resolve = |axis: usize| {
            resolve_axis(
                input_shape[axis],
                kernel_shape[axis],
                axis_value(&config.strides, axis, 1),
                axis_value(&config.auto_padding, axis, false),
                axis_value(&config.lower_pad, axis, 0),
                axis_value(&config.upper_pad, axis, 0),
                config.transpose,
            )
        };
        let axes = [resolve(0)?, resolve(1)?];

        Ok(Self {
            id: None,
            name: None,
            value: None,
            shape: vec![axes[0].output, axes[1].output, kernel_shape[3]],
            axes,
            transpose: config.transpose,
        })
    }

    /// 普通卷积：out[oh, ow, f] = Σ in[ih, iw, c] · K[kh, kw, c, f]
    fn convolve(&self, input: &Tensor, kernel: &Tensor) -> Tensor {
        let (in_h, in_w, in_c) = (input.shape()[0], input.shape()[1], input.shape()[2]);
        let out_c = kernel.shape()[3];
        let [axis_h, axis_w] = self.axes;
        let mut output = Tensor::zeros(&self.shape);

        for oh in 0..axis_h.output {
            for ow in 0..axis_w.output {
                for kh in 0..axis_h.kernel {
                    let Some(ih) = input_index(&axis_h, oh, kh, in_h) else {
                        continue;
                    };
                    for kw in 0..axis_w.kernel {
                        let Some(iw) = input_index(&axis_w, ow, kw, in_w) else {
                            continue;
                        };
                        for c in 0..in_c {
                            let x = input[[ih, iw, c]];
                            for f in 0..out_c {
                                output[[oh, ow, f]] += x * kernel[[kh, kw, c, f]];
                            }
                        }
                    }
                }
            }
        }
        output
    }

    /// 转置卷积：把每个输入元素按核散布到输出上
    fn convolve_transposed(&self, input: &Tensor, kernel: &Tensor) -> Tensor {
        let (in_h, in_w, in_c) = (input.shape()[0], input.shape()[1], input.shape()[2]);
        let out_c = kernel.shape()[3];
        let [axis_h, axis_w] = self.axes;
        let mut output = Tensor::zeros(&self.shape);

        for ih in 0..in_h {
            for iw in 0..in_w {
                for kh in 0..axis_h.kernel {
                    let Some(oh) = (ih * axis_h.stride + kh)
                        .checked_sub(axis_h.lower)
                        .filter(|&o| o < axis_h.output)
                    else {
                        continue;
                    };
                    for kw in 0..axis_w.kernel {
                        let Some(ow) = (iw * axis_w.stride + kw)
                            .checked_sub(axis_w.lower)
                            .filter(|&o| o < axis_w.output)
                        else {
                            continue;
                        };
                        for c in 0..in_c {
                            let x = input[[ih, iw, c]];
                            for f in 0..out_c {
                                output[[oh, ow, f]] += x * kernel[[kh, kw, c, f]];
                            }
                        }
                    }
                }
            }
        }
        output
    }
}

impl TraitNode for Convolution {
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
        let kernel = parent_value(self, parents, 0)?;
        let input = parent_value(self, parents, 1)?;

        let output = if self.transpose {
            self.convolve_transposed(input, kernel)
        } else {
            self.convolve(input, kernel)
        };
        self.value = Some(output);
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }
}
