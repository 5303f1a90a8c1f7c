/*
 * @Date         : 2026-10-16
 * @Description  : 原子值：对数值/布尔标量的薄封装，默认为 0/false
 */

use num_traits::Zero;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Hash)]
pub struct AtomicValue<T>(T);

pub type Int64Value = AtomicValue<i64>;
pub type UInt64Value = AtomicValue<u64>;
pub type Int32Value = AtomicValue<i32>;
pub type UInt32Value = AtomicValue<u32>;
pub type Float32Value = AtomicValue<f32>;
pub type Float64Value = AtomicValue<f64>;
pub type BoolValue = AtomicValue<bool>;

impl<T: Copy> AtomicValue<T> {
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> T {
        self.0
    }
}

impl<T: Zero + PartialOrd + Copy> AtomicValue<T> {
    /// 严格大于 0（NaN 视为不大于 0）
    pub fn is_positive(&self) -> bool {
        self.0 > T::zero()
    }
}

impl<T> From<T> for AtomicValue<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

macro_rules! impl_atomic_into_inner {
    ($($t:ty),*) => {
        $(
            impl From<AtomicValue<$t>> for $t {
                fn from(value: AtomicValue<$t>) -> Self {
                    value.0
                }
            }
        )*
    };
}

impl_atomic_into_inner!(i64, u64, i32, u32, f32, f64, bool);

impl<T: Display> Display for AtomicValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
