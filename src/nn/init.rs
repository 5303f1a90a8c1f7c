/*
 * @Date         : 2026-10-16
 * @Description  : 参数初始化器（描述引擎应如何填充新分配的参数）
 */

use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 参数初始化策略
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterInitializer {
    /// 常数初始化
    Constant(f32),
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// [low, high) 上的均匀分布
    Uniform { low: f32, high: f32 },
    /// He/Kaiming 正态初始化（适用于 `ReLU`）
    HeNormal,
    /// Glorot/Xavier 均匀初始化（适用于 Sigmoid/Tanh）
    GlorotUniform,
}

impl Default for ParameterInitializer {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl ParameterInitializer {
    pub const fn constant(value: f32) -> Self {
        Self::Constant(value)
    }

    pub const fn he_normal() -> Self {
        Self::HeNormal
    }

    pub const fn glorot_uniform() -> Self {
        Self::GlorotUniform
    }

    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::filled(*v, shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::Uniform { low, high } => Tensor::uniform_with_rng(*low, *high, shape, rng),
            Self::HeNormal => {
                let (fan_in, _) = fans(shape);
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
            Self::GlorotUniform => {
                let (fan_in, fan_out) = fans(shape);
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::uniform_with_rng(-limit, limit, shape, rng)
            }
        }
    }
}

/// 计算 (fan_in, fan_out)
///
/// 通道在后的约定下，倒数第二维是输入通道，最后一维是输出通道，
/// 其余维度（如卷积核的 kH、kW）构成感受野。
fn fans(shape: &[usize]) -> (usize, usize) {
    match shape.len() {
        0 => (1, 1),
        1 => (shape[0].max(1), shape[0].max(1)),
        rank => {
            let receptive = shape[..rank - 2].iter().product::<usize>();
            let fan_in = receptive * shape[rank - 2];
            let fan_out = receptive * shape[rank - 1];
            (fan_in.max(1), fan_out.max(1))
        }
    }
}
