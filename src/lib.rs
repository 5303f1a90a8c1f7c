//! # Chianti
//!
//! 声明式的卷积类网络层构建器：把 Conv2D、MaxPool2D、AveragePool2D、Upscale2D、
//! DropOut、BatchNorm 等层的选项编译为计算图节点。
//!
//! 层的选项以“复合值”（见[`values`]）表达，如 `pad` 既可以是整数对也可以是 `"same"`；
//! 计算图（见[`nn`]）是一个只在 CPU 上计算的参考引擎，约定通道在后、单样本。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
pub mod values;
