/*
 * @Date         : 2026-10-16
 * @Description  : 神经网络（neural network）：参考引擎 + 卷积类层构建器
 *
 * - 引擎：Graph / Var / 各类节点，按通道在后（[H, W, C]）的单样本约定计算
 * - layer：把层的选项编译为引擎节点
 */

mod device;
mod graph;
mod init;
pub mod layer;
mod nodes;
pub mod nonlinearities;
mod var;
mod view;

pub use device::{DataType, DeviceDescriptor};
pub use graph::{Graph, GraphError, GraphInner};
pub use init::ParameterInitializer;
pub use layer::{
    AveragePool2DLayer, BatchNormLayer, Conv2DLayer, DropOutLayer, Layer, MaxPool2DLayer,
    Upscale2DLayer,
};
pub use nodes::NodeId;
pub use nodes::{BatchNormConfig, ConvolutionConfig, PoolingConfig, PoolingType};
pub use nonlinearities::{NonLinearity, linear, rectify};
pub use var::Var;
pub use view::NdArrayView;

#[cfg(test)]
mod tests;
