/*
 * @Date         : 2026-10-16
 * @Description  : BatchNorm 层
 *
 * 参数形状：输入阶数大于 1 时取最后一轴（通道）长度，否则取唯一一轴的长度。
 * 创建 scale=1、bias=0、running_mean=0、running_inv_std=1 四个参数；
 * 阶数大于 1 时按空间共享的方式归一化。
 */

use super::parameter::parameter_from_initializer;
use super::{Layer, SingleInput};
use crate::errors::{ChiantiError, Result};
use crate::nn::{BatchNormConfig, DeviceDescriptor, ParameterInitializer, Var};
use crate::values::{BoolValue, Float64Value};

#[derive(Debug, Clone)]
pub struct BatchNormLayer {
    base: SingleInput,
    deterministic: BoolValue,
    use_cudnn: BoolValue,
    normalization_time_constant: Float64Value,
    epsilon: Float64Value,
}

impl BatchNormLayer {
    pub fn new(input: &Var, device: DeviceDescriptor) -> Self {
        Self {
            base: SingleInput::new(input, device),
            deterministic: false.into(),
            use_cudnn: false.into(),
            normalization_time_constant: 5000.0.into(),
            epsilon: 1e-5.into(),
        }
    }

    layer_options! {
        deterministic: BoolValue,
        use_cudnn: BoolValue,
        normalization_time_constant: Float64Value,
        epsilon: Float64Value,
    }

    pub const fn get_input(&self) -> &Var {
        self.base.input()
    }

    pub const fn get_device(&self) -> DeviceDescriptor {
        self.base.device()
    }
}

impl Layer for BatchNormLayer {
    fn build(&self) -> Result<Var> {
        let input = self.base.input();
        let graph = self.base.graph();
        let device = self.base.device();
        let shape = input.shape();
        let parameter_shape = match shape.as_slice() {
            [] => {
                return Err(ChiantiError::IllegalArgument(
                    "BatchNorm 的输入不能是标量".to_string(),
                ));
            }
            [features] => [*features],
            [.., channels] => [*channels],
        };

        let parameter = |value: f32| {
            parameter_from_initializer(
                &graph,
                &ParameterInitializer::constant(value),
                &parameter_shape,
                device,
            )
        };
        let scale = parameter(1.0)?;
        let bias = parameter(0.0)?;
        let running_mean = parameter(0.0)?;
        let running_inv_std = parameter(1.0)?;

        let config = BatchNormConfig {
            spatial: shape.len() > 1,
            normalization_time_constant: self.normalization_time_constant.get(),
            blend_time_constant: 0.0,
            epsilon: self.epsilon.get(),
            use_cudnn: self.use_cudnn.get(),
            inference_only: self.deterministic.get(),
        };
        log::debug!(
            "BatchNorm：输入{shape:?}，参数形状{parameter_shape:?}，spatial={}",
            config.spatial
        );
        Ok(graph.batch_normalization(
            input,
            &scale,
            &bias,
            &running_mean,
            &running_inv_std,
            &config,
        )?)
    }
}
