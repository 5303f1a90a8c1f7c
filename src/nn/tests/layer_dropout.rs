use crate::assert_err;
use crate::errors::{ChiantiError, Result};
use crate::nn::{DataType, DeviceDescriptor, DropOutLayer, Graph, Layer};
use crate::tensor::Tensor;

#[test]
fn test_dropout_layer_defaults() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[4, 4, 1], DataType::Float, None)?;
    let layer = DropOutLayer::new(&x, DeviceDescriptor::cpu());
    assert!(!layer.get_deterministic().get());
    assert_eq!(layer.get_p().get(), 0.25);
    Ok(())
}

#[test]
fn test_dropout_layer_pass_through() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[4, 4, 1], DataType::Float, None)?;
    let layer = DropOutLayer::new(&x, DeviceDescriptor::cpu());

    // 以下情形都直接返回输入，不向图中添加节点
    for layer in [
        layer.clone().deterministic(true),
        layer.clone().p(0.0),
        layer.clone().p(-0.5),
        layer.clone().p(f64::NAN),
    ] {
        let y = layer.build()?;
        assert_eq!(y.node_id(), x.node_id());
    }
    assert_eq!(graph.nodes_count(), 1);
    Ok(())
}

#[test]
fn test_dropout_layer_in_train_and_eval_mode() -> Result<()> {
    let graph = Graph::new_with_seed(11);
    let x = graph.input_variable(&[16, 16, 1], DataType::Float, None)?;
    let y = DropOutLayer::new(&x, DeviceDescriptor::cpu()).p(0.5).build()?;
    assert_ne!(y.node_id(), x.node_id());
    assert_eq!(y.shape(), [16, 16, 1]);

    x.set_value(&Tensor::ones(&[16, 16, 1]))?;
    let trained = y.evaluate()?.to_vec();
    assert!(trained.iter().all(|&v| v == 0.0 || v == 2.0));
    assert!(trained.contains(&0.0) && trained.contains(&2.0));

    graph.eval();
    assert_eq!(y.evaluate()?, Tensor::ones(&[16, 16, 1]));
    Ok(())
}

#[test]
fn test_dropout_layer_rejects_certain_drop() -> Result<()> {
    let graph = Graph::new();
    let x = graph.input_variable(&[2, 2], DataType::Float, None)?;
    assert_err!(
        DropOutLayer::new(&x, DeviceDescriptor::cpu()).p(1.0).build(),
        ChiantiError::Engine(_)
    );
    Ok(())
}
