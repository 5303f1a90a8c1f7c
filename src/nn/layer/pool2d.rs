/*
 * @Date         : 2026-10-16
 * @Description  : 二维池化层（最大池化 / 平均池化）
 *
 * pad 可取：
 * - 整数对 (pH, pW)：两侧各填充 pH / pW
 * - "auto" 或 true：由引擎自动填充
 * - "none" 或 false：不填充
 *
 * 填充区不参与取最大值，也不计入平均值的分母。
 */

use super::conv2d::Padding;
use super::{Layer, SingleInput};
use crate::errors::{ChiantiError, Result};
use crate::nn::{DeviceDescriptor, PoolingConfig, PoolingType, Var};
use crate::values::{ArrayValue, CompositeValue3};
use std::marker::PhantomData;

/// 池化方式，在类型上固定
pub trait PoolingKind {
    const POOLING_TYPE: PoolingType;
}

#[derive(Debug, Clone, Copy)]
pub struct Max;

#[derive(Debug, Clone, Copy)]
pub struct Average;

impl PoolingKind for Max {
    const POOLING_TYPE: PoolingType = PoolingType::Max;
}

impl PoolingKind for Average {
    const POOLING_TYPE: PoolingType = PoolingType::Average;
}

pub type MaxPool2DLayer = Pool2DLayer<Max>;
pub type AveragePool2DLayer = Pool2DLayer<Average>;

#[derive(Debug, Clone)]
pub struct Pool2DLayer<P: PoolingKind> {
    base: SingleInput,
    pool_size: ArrayValue<u64, 2>,
    pad: CompositeValue3<ArrayValue<u64, 2>, String, bool>,
    stride: ArrayValue<u64, 2>,
    kind: PhantomData<P>,
}

impl<P: PoolingKind> Pool2DLayer<P> {
    pub fn new(input: &Var, device: DeviceDescriptor) -> Self {
        Self {
            base: SingleInput::new(input, device),
            pool_size: ArrayValue::new([2, 2]),
            pad: "auto".into(),
            stride: ArrayValue::new([2, 2]),
            kind: PhantomData,
        }
    }

    layer_options! {
        pool_size: ArrayValue<u64, 2>,
        pad: CompositeValue3<ArrayValue<u64, 2>, String, bool>,
        stride: ArrayValue<u64, 2>,
    }

    pub const fn get_pooling_type(&self) -> PoolingType {
        P::POOLING_TYPE
    }

    pub const fn get_input(&self) -> &Var {
        self.base.input()
    }

    pub const fn get_device(&self) -> DeviceDescriptor {
        self.base.device()
    }

    fn resolve_padding(&self) -> Result<Padding> {
        if self.pad.is_active::<0>() {
            let pad = self.pad.get::<0>();
            return Ok(Padding::explicit(pad[0] as usize, pad[1] as usize));
        }
        if self.pad.is_active::<2>() {
            return Ok(if *self.pad.get::<2>() {
                Padding::auto()
            } else {
                Padding::none()
            });
        }
        match self.pad.get::<1>().as_str() {
            "auto" => Ok(Padding::auto()),
            "none" => Ok(Padding::none()),
            _ => Err(ChiantiError::IllegalArgument(
                "Invalid string value for pad.".to_string(),
            )),
        }
    }
}

impl<P: PoolingKind> Layer for Pool2DLayer<P> {
    fn build(&self) -> Result<Var> {
        let input = self.base.input();
        let padding = self.resolve_padding()?;
        let config = PoolingConfig {
            pooling_type: P::POOLING_TYPE,
            window: self.pool_size.into_inner().map(|v| v as usize),
            strides: self.stride.into_inner().map(|v| v as usize),
            auto_padding: padding.auto_padding,
            lower_pad: padding.lower_pad,
            upper_pad: padding.upper_pad,
        };
        let output = self.base.graph().pooling(input, &config)?;
        log::debug!(
            "{:?}Pool2D：输入{:?} -> 输出{:?}，窗口{}，步长{}",
            P::POOLING_TYPE,
            input.shape(),
            output.shape(),
            self.pool_size,
            self.stride
        );
        Ok(output)
    }
}
