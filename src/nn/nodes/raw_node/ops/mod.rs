mod batch_norm;
mod convolution;
mod dropout;
mod geometry;
mod plus;
mod pooling;
mod relu;

pub use batch_norm::BatchNormConfig;
pub(in crate::nn) use batch_norm::BatchNormalization;
pub use convolution::ConvolutionConfig;
pub(in crate::nn) use convolution::Convolution;
pub(in crate::nn) use dropout::Dropout;
pub(in crate::nn) use plus::Plus;
pub use pooling::{PoolingConfig, PoolingType};
pub(in crate::nn) use pooling::Pooling;
pub(in crate::nn) use relu::ReLU;
