/*
 * @Date         : 2026-10-16
 * @Description  : Upscale2D 层：最近邻上采样
 *
 * 用常量核的转置卷积实现：核形状 [s0, s1, C, C]，仅 (i, j, c, c) 处为 1，
 * 步长 (s0, s1)、无填充，于是每个输入元素被复制到输出中对应的 s0×s1 块，
 * 且各通道互不影响。
 */

use super::bridge::{shape_to_index_array, to_ndarray_view};
use super::{Layer, SingleInput};
use crate::errors::Result;
use crate::nn::{ConvolutionConfig, DeviceDescriptor, Var};
use crate::values::ArrayValue;
use ndarray::Array4;

#[derive(Debug, Clone)]
pub struct Upscale2DLayer {
    base: SingleInput,
    scale_factor: ArrayValue<u64, 2>,
}

impl Upscale2DLayer {
    pub fn new(input: &Var, device: DeviceDescriptor) -> Self {
        Self {
            base: SingleInput::new(input, device),
            scale_factor: ArrayValue::new([2, 2]),
        }
    }

    layer_options! {
        scale_factor: ArrayValue<u64, 2>,
    }

    pub const fn get_input(&self) -> &Var {
        self.base.input()
    }

    pub const fn get_device(&self) -> DeviceDescriptor {
        self.base.device()
    }
}

/// 通道对角的全 1 核
fn nearest_neighbour_kernel(scale_h: usize, scale_w: usize, channels: usize) -> Array4<f32> {
    Array4::from_shape_fn((scale_h, scale_w, channels, channels), |(_, _, c_in, c_out)| {
        if c_in == c_out { 1.0 } else { 0.0 }
    })
}

impl Layer for Upscale2DLayer {
    fn build(&self) -> Result<Var> {
        let input = self.base.input();
        let graph = self.base.graph();
        let [_, _, channels] = shape_to_index_array::<3>(&input.shape())?;
        let [scale_h, scale_w] = self.scale_factor.into_inner().map(|v| v as usize);

        let kernel = nearest_neighbour_kernel(scale_h, scale_w, channels);
        let kernel = graph.constant(&to_ndarray_view(&kernel, self.base.device())?, None)?;
        let config = ConvolutionConfig {
            strides: vec![scale_h, scale_w, channels],
            sharing: vec![true],
            auto_padding: vec![false, false, false],
            lower_pad: vec![0, 0, 0],
            upper_pad: vec![0, 0, 0],
            transpose: true,
        };
        let output = graph.convolution(&kernel, input, &config)?;
        log::debug!(
            "Upscale2D：输入{:?} -> 输出{:?}，放大倍数{}",
            input.shape(),
            output.shape(),
            self.scale_factor
        );
        Ok(output)
    }
}
