/*
 * @Date         : 2026-10-16
 * @Description  : Layer 模块 - 把声明式的层选项编译为计算图节点
 *
 * 每个层都是值对象：setter 整体替换一个选项并返回自身（可链式调用），
 * `build()` 只读选项、不修改层本身，可重复调用，每次都创建新的参数节点。
 */

/// 为层的各选项生成 `xxx(value)` 链式 setter 与 `get_xxx()` getter
macro_rules! layer_options {
    ($($field:ident : $ty:ty),* $(,)?) => {
        paste::paste! {
            $(
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = value.into();
                    self
                }

                pub const fn [<get_ $field>](&self) -> &$ty {
                    &self.$field
                }
            )*
        }
    };
}

mod batch_norm;
mod bridge;
mod conv2d;
mod dropout;
mod parameter;
mod pool2d;
mod upscale2d;

pub use batch_norm::BatchNormLayer;
pub use bridge::{shape_to_index_array, to_ndarray_view, to_ndarray_view_with_shape};
pub use conv2d::Conv2DLayer;
pub use dropout::DropOutLayer;
pub use pool2d::{Average, AveragePool2DLayer, Max, MaxPool2DLayer, Pool2DLayer, PoolingKind};
pub use upscale2d::Upscale2DLayer;

use crate::errors::Result;
use crate::nn::{DeviceDescriptor, Graph, Var};

/// 所有层的公共契约：编译为以输入为根的图片段
pub trait Layer {
    fn build(&self) -> Result<Var>;
}

/// 单输入层共有的部分：输入变量 + 参数所在设备
#[derive(Debug, Clone)]
pub struct SingleInput {
    input: Var,
    device: DeviceDescriptor,
}

impl SingleInput {
    pub fn new(input: &Var, device: DeviceDescriptor) -> Self {
        Self {
            input: input.clone(),
            device,
        }
    }

    pub const fn input(&self) -> &Var {
        &self.input
    }

    pub const fn device(&self) -> DeviceDescriptor {
        self.device
    }

    pub fn graph(&self) -> Graph {
        self.input.get_graph()
    }
}

/// `Var::try_from(&layer)` 等价于 `layer.build()`
macro_rules! impl_var_from_layer {
    ($(impl[$($generics:tt)*] $layer:ty),* $(,)?) => {
        $(
            impl<$($generics)*> TryFrom<&$layer> for Var {
                type Error = crate::errors::ChiantiError;

                fn try_from(layer: &$layer) -> Result<Self> {
                    layer.build()
                }
            }
        )*
    };
}

impl_var_from_layer!(
    impl[] conv2d::Conv2DLayer,
    impl[P: PoolingKind] pool2d::Pool2DLayer<P>,
    impl[] upscale2d::Upscale2DLayer,
    impl[] dropout::DropOutLayer,
    impl[] batch_norm::BatchNormLayer,
);

