/*
 * @Date         : 2026-10-16
 * @Description  : 设备描述符与数据类型
 *
 * 本 crate 的参考引擎只在 CPU 上计算；设备描述符仅被记录在参数/常量节点上，
 * 由层构建器原样转交给引擎。
 */

use std::fmt::{self, Display};

/// 参数存放的设备
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceDescriptor {
    #[default]
    Cpu,
    Gpu(u32),
}

impl DeviceDescriptor {
    pub const fn cpu() -> Self {
        Self::Cpu
    }

    pub const fn gpu(device_id: u32) -> Self {
        Self::Gpu(device_id)
    }
}

impl Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Gpu(id) => write!(f, "GPU:{id}"),
        }
    }
}

/// 张量元素的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    Float,
    Double,
}
