/*
 * @Date         : 2026-10-16
 * @Description  : Conv2D 层：二维卷积 + 可选偏置 + 非线性
 *
 * 输入/输出形状（通道在后）：
 * - 输入：[H, W, C_in]
 * - 卷积核：[fH, fW, C_in, num_filters]
 * - 输出：[H', W', num_filters]
 *
 * pad 可取：
 * - 整数对 (pH, pW)：两侧各填充 pH / pW
 * - "same"：由引擎自动填充，使步长为 1 时输出与输入同尺寸
 * - "full"：两侧各填充 fH / fW
 * - "valid"：不填充
 */

use super::bridge::shape_to_index_array;
use super::parameter::{parameter_from_initializer, resolve_parameter, resolve_parameter_or_flag};
use super::{Layer, SingleInput};
use crate::errors::{ChiantiError, Result, assert_argument};
use crate::nn::{
    ConvolutionConfig, DeviceDescriptor, Graph, NonLinearity, ParameterInitializer, Var, rectify,
};
use crate::values::{ArrayValue, CompositeValue2, CompositeValue3, UInt64Value};
use ndarray::{Array3, Array4};

/// 卷积所需的显式填充描述（各向量按“不足则重复最后一个值”广播到 [H, W, C] 三个轴）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Padding {
    pub auto_padding: Vec<bool>,
    pub lower_pad: Vec<usize>,
    pub upper_pad: Vec<usize>,
}

impl Padding {
    /// 交给引擎自动决定
    pub(super) fn auto() -> Self {
        Self {
            auto_padding: vec![true],
            lower_pad: vec![0],
            upper_pad: vec![0],
        }
    }

    /// 空间两轴两侧各填充给定值，通道轴不填充
    pub(super) fn explicit(pad_h: usize, pad_w: usize) -> Self {
        Self {
            auto_padding: vec![false, false, false],
            lower_pad: vec![pad_h, pad_w, 0],
            upper_pad: vec![pad_h, pad_w, 0],
        }
    }

    pub(super) fn none() -> Self {
        Self::explicit(0, 0)
    }
}

/// 二维卷积层
///
/// ```ignore
/// let y = Conv2DLayer::new(&x, DeviceDescriptor::cpu())
///     .num_filters(16u64)
///     .filter_size([5, 5])
///     .pad("valid")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct Conv2DLayer {
    base: SingleInput,
    num_filters: UInt64Value,
    filter_size: ArrayValue<u64, 2>,
    pad: CompositeValue2<ArrayValue<u64, 2>, String>,
    stride: ArrayValue<u64, 2>,
    w: CompositeValue2<Array4<f32>, ParameterInitializer>,
    b: CompositeValue3<Array3<f32>, ParameterInitializer, bool>,
    non_linearity: NonLinearity,
}

impl Conv2DLayer {
    pub fn new(input: &Var, device: DeviceDescriptor) -> Self {
        Self {
            base: SingleInput::new(input, device),
            num_filters: 1u64.into(),
            filter_size: ArrayValue::new([3, 3]),
            pad: "same".into(),
            stride: ArrayValue::new([1, 1]),
            w: ParameterInitializer::he_normal().into(),
            b: ParameterInitializer::constant(0.0).into(),
            non_linearity: rectify,
        }
    }

    layer_options! {
        num_filters: UInt64Value,
        filter_size: ArrayValue<u64, 2>,
        pad: CompositeValue2<ArrayValue<u64, 2>, String>,
        stride: ArrayValue<u64, 2>,
        w: CompositeValue2<Array4<f32>, ParameterInitializer>,
        b: CompositeValue3<Array3<f32>, ParameterInitializer, bool>,
    }

    pub fn non_linearity(mut self, non_linearity: NonLinearity) -> Self {
        self.non_linearity = non_linearity;
        self
    }

    pub const fn get_non_linearity(&self) -> NonLinearity {
        self.non_linearity
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
        match self.pad.get::<1>().as_str() {
            "same" => Ok(Padding::auto()),
            "full" => Ok(Padding::explicit(
                self.filter_size[0] as usize,
                self.filter_size[1] as usize,
            )),
            "valid" => Ok(Padding::none()),
            _ => Err(ChiantiError::IllegalArgument(
                "Illegal string value for parameter 'pad'.".to_string(),
            )),
        }
    }

    /// 显式偏置的前两维必须为 1；第三维由拷贝时的元素个数检查兜底
    fn check_bias_shape(&self) -> Result<()> {
        if !self.b.is_active::<0>() {
            return Ok(());
        }
        let bias = self.b.get::<0>();
        assert_argument(
            bias.shape()[0] == 1 && bias.shape()[1] == 1,
            "Bias must have shape (1, 1, numFilters).",
        )
    }

    /// 返回 None 表示不加偏置
    fn resolve_bias(&self, graph: &Graph, num_filters: usize) -> Result<Option<Var>> {
        let shape = [1, 1, num_filters];
        let device = self.base.device();
        if self.b.is_active::<2>() {
            if !*self.b.get::<2>() {
                return Ok(None);
            }
            // b = true：默认的零偏置
            return parameter_from_initializer(
                graph,
                &ParameterInitializer::constant(0.0),
                &shape,
                device,
            )
            .map(Some);
        }
        resolve_parameter_or_flag(graph, &self.b, &shape, device).map(Some)
    }
}

impl Layer for Conv2DLayer {
    fn build(&self) -> Result<Var> {
        let input = self.base.input();
        let graph = self.base.graph();
        let device = self.base.device();
        let [_, _, in_channels] = shape_to_index_array::<3>(&input.shape())?;
        let num_filters = self.num_filters.get() as usize;
        let [filter_h, filter_w] = self.filter_size.into_inner().map(|v| v as usize);
        let [stride_h, stride_w] = self.stride.into_inner().map(|v| v as usize);

        let padding = self.resolve_padding()?;
        self.check_bias_shape()?;
        let weight = resolve_parameter(
            &graph,
            &self.w,
            &[filter_h, filter_w, in_channels, num_filters],
            device,
        )?;
        let config = ConvolutionConfig {
            strides: vec![stride_h, stride_w, in_channels],
            sharing: vec![true],
            auto_padding: padding.auto_padding,
            lower_pad: padding.lower_pad,
            upper_pad: padding.upper_pad,
            transpose: false,
        };
        let mut output = graph.convolution(&weight, input, &config)?;

        if let Some(bias) = self.resolve_bias(&graph, num_filters)? {
            output = graph.plus(&output, &bias)?;
        }
        log::debug!(
            "Conv2D：输入{:?} -> 输出{:?}，卷积核{:?}，自动填充{:?}，填充{:?}/{:?}",
            input.shape(),
            output.shape(),
            weight.shape(),
            config.auto_padding,
            config.lower_pad,
            config.upper_pad
        );

        Ok((self.non_linearity)(&output)?)
    }
}
