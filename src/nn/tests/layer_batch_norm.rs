use crate::errors::Result;
use crate::nn::{BatchNormLayer, DataType, DeviceDescriptor, Graph, Layer, Var};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

fn parameter_ids(graph: &Graph, bn: &Var) -> Result<Vec<crate::nn::NodeId>> {
    let parents = graph.inner().get_node_parents(bn.node_id())?;
    Ok(parents[1..].to_vec())
}

#[test]
fn test_batch_norm_layer_defaults() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[4, 4, 3], DataType::Float, None)?;
    let layer = BatchNormLayer::new(&x, DeviceDescriptor::cpu());
    assert!(!layer.get_deterministic().get());
    assert!(!layer.get_use_cudnn().get());
    assert_eq!(layer.get_normalization_time_constant().get(), 5000.0);
    assert_eq!(layer.get_epsilon().get(), 1e-5);
    Ok(())
}

#[test]
fn test_batch_norm_layer_parameters() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[4, 4, 3], DataType::Float, None)?;
    let y = BatchNormLayer::new(&x, DeviceDescriptor::gpu(2)).build()?;
    assert_eq!(y.shape(), [4, 4, 3]);

    // scale、bias、running_mean、running_inv_std
    let expected = [1.0, 0.0, 0.0, 1.0];
    let inner = graph.inner();
    for (id, value) in parameter_ids(&graph, &y)?.into_iter().zip(expected) {
        assert_eq!(inner.get_node_type_name(id)?, "parameter");
        assert_eq!(inner.get_node_device(id)?, Some(DeviceDescriptor::Gpu(2)));
        assert_eq!(inner.get_node_value(id)?, Some(&Tensor::filled(value, &[3])));
    }
    Ok(())
}

#[test]
fn test_batch_norm_layer_on_vector_input() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[5], DataType::Float, None)?;
    let y = BatchNormLayer::new(&x, DeviceDescriptor::cpu()).build()?;
    for id in parameter_ids(&graph, &y)? {
        assert_eq!(graph.inner().get_node_value_expected_shape(id)?, &[5]);
    }
    Ok(())
}

#[test]
fn test_batch_norm_layer_deterministic_uses_running_stats() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[2, 2, 2], DataType::Float, None)?;
    let y = BatchNormLayer::new(&x, DeviceDescriptor::cpu())
        .deterministic(true)
        .build()?;

    let input = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], &[2, 2, 2]);
    x.set_value(&input)?;
    assert!(graph.is_train_mode());
    assert_eq!(y.evaluate()?, input);
    Ok(())
}

#[test]
fn test_batch_norm_layer_normalizes_per_channel_in_training() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[2, 2, 2], DataType::Float, None)?;
    let y = BatchNormLayer::new(&x, DeviceDescriptor::cpu())
        .epsilon(0.0)
        .build()?;

    // 通道 0：0 2 4 6；通道 1：1 3 1 3
    let input = Tensor::new(&[0.0, 1.0, 2.0, 3.0, 4.0, 1.0, 6.0, 3.0], &[2, 2, 2]);
    x.set_value(&input)?;
    let output = y.evaluate()?.to_vec();

    let channel0 = output.iter().step_by(2).copied().collect::<Vec<_>>();
    assert_abs_diff_eq!(channel0.iter().sum::<f32>(), 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(
        channel0.iter().map(|v| v * v).sum::<f32>() / 4.0,
        1.0,
        epsilon = 1e-5
    );
    let channel1 = output.iter().skip(1).step_by(2).copied().collect::<Vec<_>>();
    for (actual, expected) in channel1.iter().zip([-1.0, 1.0, -1.0, 1.0]) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-5);
    }
    Ok(())
}
