/*
 * @Date         : 2026-10-16
 * @Description  : 定长数组值：长度 S 在编译期固定，构造后不可变
 *
 * 可从单个标量（广播到全部 S 个位置）、定长数组/二元组或运行时序列构造；
 * 运行时序列长度不等于 S 时返回非法参数错误。
 */

use crate::errors::{ChiantiError, Result};
use std::fmt::{self, Display};
use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayValue<T, const S: usize>([T; S]);

impl<T, const S: usize> ArrayValue<T, S> {
    pub const fn new(values: [T; S]) -> Self {
        Self(values)
    }

    /// 把同一个值广播到全部 S 个位置
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self(std::array::from_fn(|_| value.clone()))
    }

    pub const fn len(&self) -> usize {
        S
    }

    pub const fn is_empty(&self) -> bool {
        S == 0
    }

    pub fn get(&self, index: usize) -> Result<T>
    where
        T: Copy,
    {
        self.0
            .get(index)
            .copied()
            .ok_or_else(|| ChiantiError::IllegalArgument(out_of_range_message(index, S)))
    }

    pub const fn as_array(&self) -> &[T; S] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn into_inner(self) -> [T; S] {
        self.0
    }
}

fn out_of_range_message(index: usize, len: usize) -> String {
    format!("下标{index}超出 ArrayValue 的长度{len}")
}

impl<T: Default, const S: usize> Default for ArrayValue<T, S> {
    fn default() -> Self {
        Self(std::array::from_fn(|_| T::default()))
    }
}

impl<T, const S: usize> Index<usize> for ArrayValue<T, S> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.0.get(index) {
            Some(value) => value,
            None => panic!("{}", out_of_range_message(index, S)),
        }
    }
}

impl<T, const S: usize> From<[T; S]> for ArrayValue<T, S> {
    fn from(values: [T; S]) -> Self {
        Self(values)
    }
}

impl<T> From<(T, T)> for ArrayValue<T, 2> {
    fn from((first, second): (T, T)) -> Self {
        Self([first, second])
    }
}

// 标量广播；逐类型实现，避免与数组/元组的转换重叠
macro_rules! impl_array_from_scalar {
    ($($t:ty),*) => {
        $(
            impl<const S: usize> From<$t> for ArrayValue<$t, S> {
                fn from(value: $t) -> Self {
                    Self([value; S])
                }
            }
        )*
    };
}

impl_array_from_scalar!(u64, usize, u32, i64, i32, f32, f64, bool);

impl<T: Clone, const S: usize> TryFrom<&[T]> for ArrayValue<T, S> {
    type Error = ChiantiError;

    fn try_from(values: &[T]) -> Result<Self> {
        let values: [T; S] = values.to_vec().try_into().map_err(|values: Vec<T>| {
            ChiantiError::IllegalArgument(format!(
                "ArrayValue 需要{S}个元素，实际得到{}个",
                values.len()
            ))
        })?;
        Ok(Self(values))
    }
}

impl<T: Clone, const S: usize> TryFrom<Vec<T>> for ArrayValue<T, S> {
    type Error = ChiantiError;

    fn try_from(values: Vec<T>) -> Result<Self> {
        Self::try_from(values.as_slice())
    }
}

impl<T: Display, const S: usize> Display for ArrayValue<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}
