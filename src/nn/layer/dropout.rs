/*
 * @Date         : 2026-10-16
 * @Description  : DropOut 层
 *
 * deterministic 为 true 或 p <= 0 时原样返回输入，不向图中添加节点。
 */

use super::{Layer, SingleInput};
use crate::errors::Result;
use crate::nn::{DeviceDescriptor, Var};
use crate::values::{BoolValue, Float64Value};

#[derive(Debug, Clone)]
pub struct DropOutLayer {
    base: SingleInput,
    deterministic: BoolValue,
    p: Float64Value,
}

impl DropOutLayer {
    pub fn new(input: &Var, device: DeviceDescriptor) -> Self {
        Self {
            base: SingleInput::new(input, device),
            deterministic: false.into(),
            p: 0.25.into(),
        }
    }

    layer_options! {
        deterministic: BoolValue,
        p: Float64Value,
    }

    pub const fn get_input(&self) -> &Var {
        self.base.input()
    }

    pub const fn get_device(&self) -> DeviceDescriptor {
        self.base.device()
    }
}

impl Layer for DropOutLayer {
    fn build(&self) -> Result<Var> {
        let input = self.base.input();
        if self.deterministic.get() || !self.p.is_positive() {
            return Ok(input.clone());
        }
        log::debug!("DropOut：输入{:?}，丢弃概率{}", input.shape(), self.p);
        Ok(self.base.graph().dropout(input, self.p.get())?)
    }
}
