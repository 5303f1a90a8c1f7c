/*
 * @Date         : 2026-10-16
 * @Description  : 复合值：在若干候选类型中记录“调用方传入的是哪一种”
 *
 * 与普通 enum 不同，每个槽位始终持有一个值（未赋值时为默认值），
 * 额外记录最近一次赋值的槽位下标。这样 {bool, String} 之类的组合也能区分
 * 调用方究竟用了哪种写法。
 */

use super::ArrayValue;
use crate::nn::ParameterInitializer;
use ndarray::{Array, Dimension};

/// 复合值的公共部分：当前激活的槽位
pub trait Composite {
    fn active(&self) -> Option<usize>;
}

/// 复合值的第 K 个槽位
pub trait Alternative<const K: usize>: Composite {
    type Value;

    fn slot(&self) -> &Self::Value;

    /// 写入槽位 K 并使其成为唯一的激活项
    fn assign(&mut self, value: Self::Value);
}

/// 槽位 K 是否为最近一次赋值的槽位
pub fn is_active<const K: usize, V: Alternative<K>>(value: &V) -> bool {
    value.active() == Some(K)
}

/// 取槽位 K 的值，不论是否激活；语义上的使用应先检查 `is_active`
pub fn get<const K: usize, V: Alternative<K>>(value: &V) -> &V::Value {
    value.slot()
}

/// 泛型参数列表以单个 `[..]` 记号树传入，各槽位分别展开
macro_rules! impl_alternative {
    (@slot $name:ident [$($param:ident),+] $index:literal => $field:ident : $ty:ident) => {
        impl<$($param),+> Alternative<$index> for $name<$($param),+> {
            type Value = $ty;

            fn slot(&self) -> &$ty {
                &self.$field
            }

            fn assign(&mut self, value: $ty) {
                self.$field = value;
                self.active = Some($index);
            }
        }
    };
    ($name:ident $generics:tt { $($index:literal => $field:ident : $ty:ident),+ }) => {
        $(impl_alternative!(@slot $name $generics $index => $field : $ty);)+
    };
}

macro_rules! composite_value {
    (
        $(#[$meta:meta])*
        $name:ident < $($param:ident),+ > { $($index:literal => $field:ident : $ty:ident),+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<$($param),+> {
            $($field: $ty,)+
            active: Option<usize>,
        }

        impl<$($param: Default),+> Default for $name<$($param),+> {
            fn default() -> Self {
                Self {
                    $($field: $ty::default(),)+
                    active: None,
                }
            }
        }

        impl<$($param),+> Composite for $name<$($param),+> {
            fn active(&self) -> Option<usize> {
                self.active
            }
        }

        impl_alternative!($name [$($param),+] { $($index => $field : $ty),+ });

        impl<$($param),+> $name<$($param),+> {
            /// 由槽位 K 的值构造，其余槽位取默认值
            pub fn with<const K: usize>(value: <Self as Alternative<K>>::Value) -> Self
            where
                Self: Alternative<K> + Default,
            {
                let mut composite = Self::default();
                <Self as Alternative<K>>::assign(&mut composite, value);
                composite
            }

            pub fn set<const K: usize>(&mut self, value: <Self as Alternative<K>>::Value)
            where
                Self: Alternative<K>,
            {
                <Self as Alternative<K>>::assign(self, value);
            }

            pub fn is_active<const K: usize>(&self) -> bool
            where
                Self: Alternative<K>,
            {
                is_active::<K, Self>(self)
            }

            pub fn get<const K: usize>(&self) -> &<Self as Alternative<K>>::Value
            where
                Self: Alternative<K>,
            {
                get::<K, Self>(self)
            }

            pub const fn active(&self) -> Option<usize> {
                self.active
            }
        }
    };
}

composite_value! {
    /// 两个候选类型的复合值
    CompositeValue2<A, B> { 0 => first: A, 1 => second: B }
}

composite_value! {
    /// 三个候选类型的复合值
    CompositeValue3<A, B, C> { 0 => first: A, 1 => second: B, 2 => third: C }
}

// ========== 常用转换：按源类型选定槽位 ==========

// ArrayValue 槽位（第 0 个）
impl<T: Default, const S: usize, B: Default> From<ArrayValue<T, S>>
    for CompositeValue2<ArrayValue<T, S>, B>
{
    fn from(value: ArrayValue<T, S>) -> Self {
        Self::with::<0>(value)
    }
}

impl<T: Default, const S: usize, B: Default> From<[T; S]>
    for CompositeValue2<ArrayValue<T, S>, B>
{
    fn from(values: [T; S]) -> Self {
        Self::with::<0>(ArrayValue::from(values))
    }
}

impl<T: Default, B: Default> From<(T, T)> for CompositeValue2<ArrayValue<T, 2>, B> {
    fn from(values: (T, T)) -> Self {
        Self::with::<0>(ArrayValue::from(values))
    }
}

impl<T: Default, const S: usize, B: Default, C: Default> From<ArrayValue<T, S>>
    for CompositeValue3<ArrayValue<T, S>, B, C>
{
    fn from(value: ArrayValue<T, S>) -> Self {
        Self::with::<0>(value)
    }
}

impl<T: Default, const S: usize, B: Default, C: Default> From<[T; S]>
    for CompositeValue3<ArrayValue<T, S>, B, C>
{
    fn from(values: [T; S]) -> Self {
        Self::with::<0>(ArrayValue::from(values))
    }
}

impl<T: Default, B: Default, C: Default> From<(T, T)>
    for CompositeValue3<ArrayValue<T, 2>, B, C>
{
    fn from(values: (T, T)) -> Self {
        Self::with::<0>(ArrayValue::from(values))
    }
}

// 张量槽位（第 0 个）
impl<D: Dimension, B: Default> From<Array<f32, D>> for CompositeValue2<Array<f32, D>, B> {
    fn from(value: Array<f32, D>) -> Self {
        Self::with::<0>(value)
    }
}

impl<D: Dimension, B: Default, C: Default> From<Array<f32, D>>
    for CompositeValue3<Array<f32, D>, B, C>
{
    fn from(value: Array<f32, D>) -> Self {
        Self::with::<0>(value)
    }
}

// 字符串槽位（第 1 个）：字面量与 String 都可
impl<A: Default> From<&str> for CompositeValue2<A, String> {
    fn from(value: &str) -> Self {
        Self::with::<1>(value.to_string())
    }
}

impl<A: Default> From<String> for CompositeValue2<A, String> {
    fn from(value: String) -> Self {
        Self::with::<1>(value)
    }
}

impl<A: Default, C: Default> From<&str> for CompositeValue3<A, String, C> {
    fn from(value: &str) -> Self {
        Self::with::<1>(value.to_string())
    }
}

impl<A: Default, C: Default> From<String> for CompositeValue3<A, String, C> {
    fn from(value: String) -> Self {
        Self::with::<1>(value)
    }
}

// 初始化器槽位（第 1 个）
impl<A: Default> From<ParameterInitializer> for CompositeValue2<A, ParameterInitializer> {
    fn from(value: ParameterInitializer) -> Self {
        Self::with::<1>(value)
    }
}

impl<A: Default, C: Default> From<ParameterInitializer>
    for CompositeValue3<A, ParameterInitializer, C>
{
    fn from(value: ParameterInitializer) -> Self {
        Self::with::<1>(value)
    }
}

// 布尔槽位（第 2 个）
impl<A: Default, B: Default> From<bool> for CompositeValue3<A, B, bool> {
    fn from(value: bool) -> Self {
        Self::with::<2>(value)
    }
}
