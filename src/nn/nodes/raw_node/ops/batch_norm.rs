/*
 * @Date         : 2026-10-16
 * @Description  : 批归一化节点
 *
 * 父节点：[输入, scale, bias, running_mean, running_inv_std]
 *
 * - spatial=true：参数形状为 [C]（最后一轴），其余位置共享同一组统计量
 * - spatial=false：参数与输入逐元素对应
 *
 * 评估模式：y = scale·(x − running_mean)·running_inv_std + bias
 * 训练模式：用本次输入的统计量归一化，并按 1 − exp(−n/T) 的比例更新滑动统计量，
 *           T 为 normalization_time_constant，n 为每个特征参与统计的元素数。
 */

use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{ForwardContext, TraitNode, parent_value};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::tensor::Tensor;

const RUNNING_MEAN: usize = 3;
const RUNNING_INV_STD: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchNormConfig {
    pub spatial: bool,
    pub normalization_time_constant: f64,
    /// 训练时把滑动统计量混入本次统计量的时间常数，0 表示不混入
    pub blend_time_constant: f64,
    pub epsilon: f64,
    /// 仅记录，CPU 引擎不区分实现
    pub use_cudnn: bool,
    /// 为 true 时总按评估模式计算，且不更新滑动统计量
    pub inference_only: bool,
}

impl Default for BatchNormConfig {
    fn default() -> Self {
        Self {
            spatial: false,
            normalization_time_constant: 5000.0,
            blend_time_constant: 0.0,
            epsilon: 1e-5,
            use_cudnn: false,
            inference_only: false,
        }
    }
}

pub(in crate::nn) struct BatchNormalization {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    shape: Vec<usize>,
    config: BatchNormConfig,
    num_features: usize,
    pending_updates: Vec<(usize, Tensor)>,
}

impl BatchNormalization {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        config: &BatchNormConfig,
    ) -> Result<Self, GraphError> {
        if parents.len() != 5 {
            return Err(GraphError::InvalidOperation(
                "BatchNormalization 节点需要 5 个父节点：[输入, scale, bias, running_mean, running_inv_std]"
                    .to_string(),
            ));
        }
        let shape = parents[0].value_expected_shape().to_vec();
        let num_features = if config.spatial {
            shape.last().copied().unwrap_or(1)
        } else {
            shape.iter().product()
        };
        for parent in &parents[1..] {
            let parameter_size = parent.value_expected_shape().iter().product::<usize>();
            if parameter_size != num_features {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![num_features],
                    got: parent.value_expected_shape().to_vec(),
                    message: format!("批归一化参数{parent}的元素数须为{num_features}"),
                });
            }
        }
        if config.epsilon < 0.0 {
            return Err(GraphError::InvalidOperation(format!(
                "epsilon 不能为负，得到{}",
                config.epsilon
            )));
        }

        Ok(Self {
            id: None,
            name: None,
            value: None,
            shape,
            config: config.clone(),
            num_features,
            pending_updates: Vec::new(),
        })
    }

    /// 滑动统计量的更新比例
    fn running_update_factor(&self, samples: usize) -> f64 {
        let time_constant = self.config.normalization_time_constant;
        if time_constant == 0.0 {
            1.0
        } else if time_constant.is_infinite() {
            0.0
        } else {
            1.0 - (-(samples as f64) / time_constant).exp()
        }
    }

    /// 本次输入中各特征的 (均值, 方差)
    fn batch_statistics(&self, input: &[f32]) -> (Vec<f64>, Vec<f64>, usize) {
        let features = self.num_features;
        let samples = input.len() / features;
        let mut mean = vec![0.0f64; features];
        let mut variance = vec![0.0f64; features];

        for (i, &x) in input.iter().enumerate() {
            mean[i % features] += f64::from(x);
        }
        mean.iter_mut().for_each(|m| *m /= samples as f64);
        for (i, &x) in input.iter().enumerate() {
            let d = f64::from(x) - mean[i % features];
            variance[i % features] += d * d;
        }
        variance.iter_mut().for_each(|v| *v /= samples as f64);
        (mean, variance, samples)
    }
}

impl TraitNode for BatchNormalization {
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
        let input = parent_value(self, parents, 0)?.to_vec();
        let scale = parent_value(self, parents, 1)?.to_vec();
        let bias = parent_value(self, parents, 2)?.to_vec();
        let running_mean = parent_value(self, parents, RUNNING_MEAN)?;
        let running_inv_std = parent_value(self, parents, RUNNING_INV_STD)?;
        let (mean_shape, inv_std_shape) = (
            running_mean.shape().to_vec(),
            running_inv_std.shape().to_vec(),
        );
        let running_mean = running_mean.to_vec();
        let running_inv_std = running_inv_std.to_vec();
        let features = self.num_features;
        let epsilon = self.config.epsilon;

        let (mean, inv_std): (Vec<f64>, Vec<f64>) =
            if self.config.inference_only || !ctx.is_train_mode {
                (
                    running_mean.iter().map(|&m| f64::from(m)).collect(),
                    running_inv_std.iter().map(|&s| f64::from(s)).collect(),
                )
            } else {
                let (batch_mean, batch_variance, samples) = self.batch_statistics(&input);

                // 更新滑动统计量，待图写回父节点
                let factor = self.running_update_factor(samples);
                let new_mean = (0..features)
                    .map(|f| {
                        ((1.0 - factor) * f64::from(running_mean[f]) + factor * batch_mean[f])
                            as f32
                    })
                    .collect::<Vec<_>>();
                let new_inv_std = (0..features)
                    .map(|f| {
                        let batch_inv_std = 1.0 / (batch_variance[f] + epsilon).sqrt();
                        ((1.0 - factor) * f64::from(running_inv_std[f]) + factor * batch_inv_std)
                            as f32
                    })
                    .collect::<Vec<_>>();
                self.pending_updates = vec![
                    (RUNNING_MEAN, Tensor::new(&new_mean, &mean_shape)),
                    (RUNNING_INV_STD, Tensor::new(&new_inv_std, &inv_std_shape)),
                ];

                // 按 blend_time_constant 把旧的滑动统计量混入本次统计量
                let blend = self.config.blend_time_constant;
                let weight = if blend.is_infinite() {
                    1.0
                } else if blend > 0.0 {
                    blend / (blend + samples as f64)
                } else {
                    0.0
                };
                (0..features)
                    .map(|f| {
                        let batch_inv_std = 1.0 / (batch_variance[f] + epsilon).sqrt();
                        (
                            weight * f64::from(running_mean[f]) + (1.0 - weight) * batch_mean[f],
                            weight * f64::from(running_inv_std[f])
                                + (1.0 - weight) * batch_inv_std,
                        )
                    })
                    .unzip()
            };

        let output = input
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let f = i % features;
                (f64::from(scale[f]) * (f64::from(x) - mean[f]) * inv_std[f] + f64::from(bias[f]))
                    as f32
            })
            .collect::<Vec<_>>();
        self.value = Some(Tensor::new(&output, &self.shape));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn take_parent_updates(&mut self) -> Vec<(usize, Tensor)> {
        std::mem::take(&mut self.pending_updates)
    }
}
