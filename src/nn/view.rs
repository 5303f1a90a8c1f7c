/*
 * @Date         : 2026-10-16
 * @Description  : 设备上的预分配数组（用于构造显式参数或常量节点）
 */

use super::{DeviceDescriptor, GraphError};
use crate::tensor::Tensor;

/// 已放置到某设备上的数组
///
/// 引擎的 `parameter_from` / `constant` 以它为数据源。
#[derive(Debug, Clone, PartialEq)]
pub struct NdArrayView {
    tensor: Tensor,
    device: DeviceDescriptor,
}

impl NdArrayView {
    /// 从主机端的行优先扁平缓冲区拷贝出一个数组并放到`device`上
    pub fn from_host(
        shape: &[usize],
        data: &[f32],
        device: DeviceDescriptor,
    ) -> Result<Self, GraphError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(GraphError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
                message: format!("缓冲区有{}个元素，但形状需要{expected}个", data.len()),
            });
        }
        Ok(Self {
            tensor: Tensor::new(data, shape),
            device,
        })
    }

    pub fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }

    pub const fn device(&self) -> DeviceDescriptor {
        self.device
    }

    pub const fn tensor(&self) -> &Tensor {
        &self.tensor
    }
}
