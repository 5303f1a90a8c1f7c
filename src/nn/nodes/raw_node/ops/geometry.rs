/*
 * @Date         : 2026-10-16
 * @Description  : 卷积/池化共用的单轴尺寸计算
 *
 * 对输入长度 n、核长 k、步长 s：
 * - 自动填充：输出 ceil(n/s)，总填充 max((out-1)*s + k - n, 0)，下侧取一半（向下取整）
 * - 显式填充：输出 (n + lower + upper - k) / s + 1
 * - 转置卷积：输出 (n-1)*s + k - lower - upper；自动填充时使输出恰为 n*s
 */

use crate::nn::GraphError;

/// 单个空间轴上解析后的几何信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::nn) struct AxisGeometry {
    pub kernel: usize,
    pub stride: usize,
    pub lower: usize,
    pub upper: usize,
    pub output: usize,
}

/// 按“不足则重复最后一个值”的规则取第`axis`轴的设置
pub(in crate::nn) fn axis_value<T: Copy>(values: &[T], axis: usize, default: T) -> T {
    values
        .get(axis)
        .or_else(|| values.last())
        .copied()
        .unwrap_or(default)
}

pub(in crate::nn) fn resolve_axis(
    input: usize,
    kernel: usize,
    stride: usize,
    auto_padding: bool,
    lower: usize,
    upper: usize,
    transpose: bool,
) -> Result<AxisGeometry, GraphError> {
    if stride == 0 || kernel == 0 {
        return Err(GraphError::InvalidOperation(format!(
            "核长与步长须大于0，得到核长{kernel}、步长{stride}"
        )));
    }

    let (lower, upper, output) = if transpose {
        let full = (input - 1) * stride + kernel;
        let (lower, upper) = if auto_padding {
            let total = full.saturating_sub(input * stride);
            (total / 2, total - total / 2)
        } else {
            (lower, upper)
        };
        if lower + upper >= full {
            return Err(GraphError::InvalidOperation(format!(
                "转置卷积的填充({lower}, {upper})过大：输入{input}，核{kernel}，步长{stride}"
            )));
        }
        (lower, upper, full - lower - upper)
    } else {
        let (lower, upper) = if auto_padding {
            let output = input.div_ceil(stride);
            let total = ((output - 1) * stride + kernel).saturating_sub(input);
            (total / 2, total - total / 2)
        } else {
            (lower, upper)
        };
        let padded = input + lower + upper;
        if padded < kernel {
            return Err(GraphError::InvalidOperation(format!(
                "输出尺寸无效：输入{input}，核{kernel}，步长{stride}，填充({lower}, {upper})"
            )));
        }
        (lower, upper, (padded - kernel) / stride + 1)
    };

    Ok(AxisGeometry {
        kernel,
        stride,
        lower,
        upper,
        output,
    })
}

/// 输出位置`out_index`处窗口第`offset`个元素对应的输入下标（落在填充区则返回 None）
pub(in crate::nn) fn input_index(
    geometry: &AxisGeometry,
    out_index: usize,
    offset: usize,
    input: usize,
) -> Option<usize> {
    (out_index * geometry.stride + offset)
        .checked_sub(geometry.lower)
        .filter(|&i| i < input)
}
