/*
 * @Date         : 2026-10-16
 * @Description  : 计算图内部使用的稠密张量（基于 ndarray 的动态维度数组）
 *
 * 约定：通道在后（channels-last），单样本，行优先。
 * 如一张图像的形状为 [H, W, C]，卷积核为 [kH, kW, C_in, C_out]。
 */

use ndarray::{Array, ArrayD, ArrayViewD, IxDyn};
use rand::Rng;
use rand::rngs::StdRng;
use std::ops::{Index, IndexMut};

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let expected = shape.iter().product::<usize>();
        assert!(
            data.len() == expected,
            "数据长度{}与形状{:?}（共{}个元素）不一致",
            data.len(),
            shape,
            expected
        );
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec())
            .expect("长度已校验，构造数组不应失败");
        Self { data }
    }

    /// 用同一个值填满给定形状
    pub fn filled(value: f32, shape: &[usize]) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::filled(0.0, shape)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::filled(1.0, shape)
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller 变换，使用指定的 RNG）
    pub fn normal_with_rng(mean: f32, std_dev: f32, shape: &[usize], rng: &mut StdRng) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }

    /// 创建一个在[min, max)区间内均匀分布的随机张量
    pub fn uniform_with_rng(min: f32, max: f32, shape: &[usize], rng: &mut StdRng) -> Self {
        // 空区间时退化为常数
        if min >= max {
            return Self::filled(min, shape);
        }
        let data = (0..shape.iter().product::<usize>())
            .map(|_| rng.gen_range(min..max))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    pub const fn from_array(data: ArrayD<f32>) -> Self {
        Self { data }
    }

    pub fn into_array(self) -> ArrayD<f32> {
        self.data
    }

    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的阶数（rank），即`shape()`的元素个数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 按行优先顺序拷贝出所有元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 转化为纯数（number）。若仅含1个元素，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.size() == 1 {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 对每个元素应用`f`，返回新张量
    pub fn map(&self, f: impl FnMut(f32) -> f32) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }
}

impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &f32 {
        &self.data[&index[..]]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, index: [usize; N]) -> &mut f32 {
        &mut self.data[&index[..]]
    }
}

impl Index<&[usize]> for Tensor {
    type Output = f32;

    fn index(&self, index: &[usize]) -> &f32 {
        &self.data[index]
    }
}

impl IndexMut<&[usize]> for Tensor {
    fn index_mut(&mut self, index: &[usize]) -> &mut f32 {
        &mut self.data[index]
    }
}
