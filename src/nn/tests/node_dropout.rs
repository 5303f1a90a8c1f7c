use crate::assert_err;
use crate::nn::{DataType, GraphError, GraphInner, NodeId};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

fn ones_input(graph: &mut GraphInner) -> Result<NodeId, GraphError> {
    let input = graph.new_input_node(&[8, 8, 2], DataType::Float, None)?;
    graph.set_node_value(input, Some(&Tensor::ones(&[8, 8, 2])))?;
    Ok(input)
}

#[test]
fn test_dropout_scales_kept_elements() -> Result<(), GraphError> {
    let mut graph = GraphInner::new_with_seed(42);
    let input = ones_input(&mut graph)?;
    let dropout = graph.new_dropout_node(input, 0.5, None)?;

    graph.forward(dropout)?;
    let output = graph.get_node_value(dropout)?.unwrap().to_vec();
    let kept = output.iter().filter(|&&x| x != 0.0).count();
    for x in &output {
        assert!(*x == 0.0 || (*x - 2.0).abs() < 1e-6, "意外的输出{x}");
    }
    // 128 个元素里不应全部保留或全部丢弃
    assert!(kept > 0 && kept < output.len());
    Ok(())
}

#[test]
fn test_dropout_is_identity_in_eval_mode() -> Result<(), GraphError> {
    let mut graph = GraphInner::new_with_seed(7);
    let input = ones_input(&mut graph)?;
    let dropout = graph.new_dropout_node(input, 0.9, None)?;

    graph.set_eval_mode();
    graph.forward(dropout)?;
    assert_eq!(
        graph.get_node_value(dropout)?.unwrap(),
        &Tensor::ones(&[8, 8, 2])
    );
    Ok(())
}

#[test]
fn test_dropout_with_zero_probability() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = ones_input(&mut graph)?;
    let dropout = graph.new_dropout_node(input, 0.0, None)?;

    graph.forward(dropout)?;
    let output = graph.get_node_value(dropout)?.unwrap();
    assert_abs_diff_eq!(output.to_vec().iter().sum::<f32>(), 128.0, epsilon = 1e-4);
    Ok(())
}

#[test]
fn test_dropout_is_reproducible_with_seed() -> Result<(), GraphError> {
    let run = || -> Result<Vec<f32>, GraphError> {
        let mut graph = GraphInner::new_with_seed(123);
        let input = ones_input(&mut graph)?;
        let dropout = graph.new_dropout_node(input, 0.3, None)?;
        graph.forward(dropout)?;
        Ok(graph.get_node_value(dropout)?.unwrap().to_vec())
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn test_dropout_rejects_invalid_probability() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = graph.new_input_node(&[2, 2], DataType::Float, None)?;
    assert_err!(
        graph.new_dropout_node(input, 1.0, None),
        GraphError::InvalidOperation(_)
    );
    assert_err!(
        graph.new_dropout_node(input, -0.1, None),
        GraphError::InvalidOperation(_)
    );
    Ok(())
}
