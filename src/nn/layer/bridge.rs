/*
 * @Date         : 2026-10-16
 * @Description  : 主机端 ndarray 与引擎之间的桥接
 */

use crate::errors::{ChiantiError, Result};
use crate::nn::{DeviceDescriptor, NdArrayView};
use ndarray::{ArrayBase, Data, Dimension};

/// 按行优先顺序把主机张量拷贝到`device`上，形状保持不变
pub fn to_ndarray_view<S, D>(
    tensor: &ArrayBase<S, D>,
    device: DeviceDescriptor,
) -> Result<NdArrayView>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    to_ndarray_view_with_shape(tensor, tensor.shape(), device)
}

/// 按行优先顺序把主机张量拷贝为`shape`形状的设备数组
///
/// 元素总数必须与`shape`的各维乘积一致。
pub fn to_ndarray_view_with_shape<S, D>(
    tensor: &ArrayBase<S, D>,
    shape: &[usize],
    device: DeviceDescriptor,
) -> Result<NdArrayView>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let expected = shape.iter().product::<usize>();
    if tensor.len() != expected {
        return Err(ChiantiError::IllegalArgument(format!(
            "张量形状{:?}共{}个元素，无法作为形状{shape:?}（{expected}个元素）的参数",
            tensor.shape(),
            tensor.len()
        )));
    }
    let data = tensor.iter().copied().collect::<Vec<_>>();
    Ok(NdArrayView::from_host(shape, &data, device)?)
}

/// 把张量形状投影为定长的下标数组，阶数不符时报错
pub fn shape_to_index_array<const R: usize>(shape: &[usize]) -> Result<[usize; R]> {
    shape.try_into().map_err(|_| {
        ChiantiError::IllegalArgument(format!("需要{R}阶的形状，实际得到{shape:?}"))
    })
}
