/*
 * @Date         : 2026-10-16
 * @Description  : 参数解析：把“显式张量 | 初始化器 [| 布尔]”复合值变为引擎参数
 *
 * - 显式张量激活：按目标形状拷贝到设备上，再包装为参数
 * - 初始化器激活：由引擎按初始化器分配目标形状的参数
 * - 无激活项：只可能是默认值设置有误，属于不可恢复的非法状态
 */

use super::bridge::to_ndarray_view_with_shape;
use crate::errors::{EXIT_ILLEGAL_COMPOSITE_2, EXIT_ILLEGAL_COMPOSITE_3, Result, terminate};
use crate::nn::{DataType, DeviceDescriptor, Graph, ParameterInitializer, Var};
use crate::values::{CompositeValue2, CompositeValue3};
use ndarray::{Array, Dimension};

pub(super) fn parameter_from_tensor<D: Dimension>(
    graph: &Graph,
    tensor: &Array<f32, D>,
    shape: &[usize],
    device: DeviceDescriptor,
) -> Result<Var> {
    let view = to_ndarray_view_with_shape(tensor, shape, device)?;
    Ok(graph.parameter_from(&view, None)?)
}

pub(super) fn parameter_from_initializer(
    graph: &Graph,
    initializer: &ParameterInitializer,
    shape: &[usize],
    device: DeviceDescriptor,
) -> Result<Var> {
    Ok(graph.parameter(shape, DataType::Float, initializer, device, None)?)
}

pub(super) fn resolve_parameter<D: Dimension>(
    graph: &Graph,
    value: &CompositeValue2<Array<f32, D>, ParameterInitializer>,
    shape: &[usize],
    device: DeviceDescriptor,
) -> Result<Var> {
    if value.is_active::<0>() {
        parameter_from_tensor(graph, value.get::<0>(), shape, device)
    } else if value.is_active::<1>() {
        parameter_from_initializer(graph, value.get::<1>(), shape, device)
    } else {
        terminate(
            "Illegal state of CompositeValue<tensor, initializer>: no alternative is active.",
            EXIT_ILLEGAL_COMPOSITE_2,
        )
    }
}

/// 第 2 个槽位（布尔）的含义由调用方决定，走到这里同样视为非法状态
pub(super) fn resolve_parameter_or_flag<D: Dimension>(
    graph: &Graph,
    value: &CompositeValue3<Array<f32, D>, ParameterInitializer, bool>,
    shape: &[usize],
    device: DeviceDescriptor,
) -> Result<Var> {
    if value.is_active::<0>() {
        parameter_from_tensor(graph, value.get::<0>(), shape, device)
    } else if value.is_active::<1>() {
        parameter_from_initializer(graph, value.get::<1>(), shape, device)
    } else {
        terminate(
            "Illegal state of CompositeValue<tensor, initializer, bool>: no parameter alternative is active.",
            EXIT_ILLEGAL_COMPOSITE_3,
        )
    }
}
