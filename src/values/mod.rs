/*
 * @Date         : 2026-10-16
 * @Description  : 层选项的值模型：原子值、定长数组值、复合值
 */

mod array;
mod atomic;
mod composite;

pub use array::ArrayValue;
pub use atomic::{
    AtomicValue, BoolValue, Float32Value, Float64Value, Int32Value, Int64Value, UInt32Value,
    UInt64Value,
};
pub use composite::{Alternative, Composite, CompositeValue2, CompositeValue3, get, is_active};

#[cfg(test)]
mod tests;
