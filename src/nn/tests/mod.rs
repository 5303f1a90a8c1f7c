mod layer_batch_norm;
mod layer_dropout;
mod node_convolution;
mod node_dropout;
