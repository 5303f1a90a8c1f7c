/*
 * @Date         : 2026-10-16
 * @Description  : Convolution 节点单元测试（通道在后，单样本）
 */

use crate::assert_err;
use crate::nn::{
    ConvolutionConfig, DataType, DeviceDescriptor, GraphError, GraphInner, NodeId,
    ParameterInitializer,
};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

fn explicit(lower: &[usize], upper: &[usize], strides: &[usize]) -> ConvolutionConfig {
    ConvolutionConfig {
        strides: strides.to_vec(),
        auto_padding: vec![false],
        lower_pad: lower.to_vec(),
        upper_pad: upper.to_vec(),
        ..ConvolutionConfig::default()
    }
}

fn kernel_node(graph: &mut GraphInner, shape: &[usize], value: f32) -> NodeId {
    graph
        .new_parameter_node(
            shape,
            DataType::Float,
            &ParameterInitializer::constant(value),
            DeviceDescriptor::cpu(),
            None,
        )
        .unwrap()
}

#[test]
fn test_convolution_output_shapes() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = graph.new_input_node(&[5, 5, 1], DataType::Float, None)?;
    let kernel = kernel_node(&mut graph, &[3, 3, 1, 4], 1.0);

    // 自动填充，步长 1：与输入同尺寸
    let same = graph.new_convolution_node(kernel, input, &ConvolutionConfig::default(), None)?;
    assert_eq!(graph.get_node_value_expected_shape(same)?, &[5, 5, 4]);

    // 无填充
    let valid = graph.new_convolution_node(kernel, input, &explicit(&[0], &[0], &[1]), None)?;
    assert_eq!(graph.get_node_value_expected_shape(valid)?, &[3, 3, 4]);

    // 两侧各填充 2
    let padded =
        graph.new_convolution_node(kernel, input, &explicit(&[2, 2, 0], &[2, 2, 0], &[1]), None)?;
    assert_eq!(graph.get_node_value_expected_shape(padded)?, &[7, 7, 4]);

    // 自动填充，步长 2：ceil(5/2) = 3
    let strided = graph.new_convolution_node(
        kernel,
        input,
        &ConvolutionConfig {
            strides: vec![2, 2, 1],
            ..ConvolutionConfig::default()
        },
        None,
    )?;
    assert_eq!(graph.get_node_value_expected_shape(strided)?, &[3, 3, 4]);

    // 非对称填充：(5 + 1 + 0 - 3) / 1 + 1 = 4
    let asymmetric =
        graph.new_convolution_node(kernel, input, &explicit(&[1], &[0], &[1]), None)?;
    assert_eq!(graph.get_node_value_expected_shape(asymmetric)?, &[4, 4, 4]);
    Ok(())
}

#[test]
fn test_convolution_valid_value() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = graph.new_input_node(&[3, 3, 1], DataType::Float, None)?;
    let kernel = kernel_node(&mut graph, &[3, 3, 1, 1], 0.5);
    let conv = graph.new_convolution_node(kernel, input, &explicit(&[0], &[0], &[1]), None)?;

    graph.set_node_value(input, Some(&Tensor::ones(&[3, 3, 1])))?;
    graph.forward(conv)?;
    let output = graph.get_node_value(conv)?.unwrap();
    assert_eq!(output.shape(), &[1, 1, 1]);
    assert_abs_diff_eq!(output[[0, 0, 0]], 4.5, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_convolution_same_padding_counts_only_valid_cells() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = graph.new_input_node(&[5, 5, 1], DataType::Float, None)?;
    let kernel = kernel_node(&mut graph, &[3, 3, 1, 1], 1.0);
    let conv = graph.new_convolution_node(kernel, input, &ConvolutionConfig::default(), None)?;

    graph.set_node_value(input, Some(&Tensor::ones(&[5, 5, 1])))?;
    graph.forward(conv)?;
    let output = graph.get_node_value(conv)?.unwrap();
    assert_eq!(output[[0, 0, 0]], 4.0);
    assert_eq!(output[[0, 2, 0]], 6.0);
    assert_eq!(output[[2, 2, 0]], 9.0);
    assert_eq!(output[[4, 4, 0]], 4.0);
    Ok(())
}

#[test]
fn test_convolution_stride_and_multiple_channels() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = graph.new_input_node(&[4, 4, 2], DataType::Float, None)?;
    // 2 个输入通道、1 个滤波器
    let kernel = kernel_node(&mut graph, &[2, 2, 2, 1], 1.0);
    let conv = graph.new_convolution_node(kernel, input, &explicit(&[0], &[0], &[2, 2, 2]), None)?;
    assert_eq!(graph.get_node_value_expected_shape(conv)?, &[2, 2, 1]);

    // 通道 0 为 0..16，通道 1 全为 1
    let data = (0..16)
        .flat_map(|v| [v as f32, 1.0])
        .collect::<Vec<_>>();
    graph.set_node_value(input, Some(&Tensor::new(&data, &[4, 4, 2])))?;
    graph.forward(conv)?;
    let output = graph.get_node_value(conv)?.unwrap();
    // 每个 2x2 块：通道 0 之和 + 4
    assert_eq!(output.to_vec(), vec![14.0, 22.0, 46.0, 54.0]);
    Ok(())
}

#[test]
fn test_convolution_transpose_repeats_blocks() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = graph.new_input_node(&[2, 2, 1], DataType::Float, None)?;
    let kernel = kernel_node(&mut graph, &[2, 2, 1, 1], 1.0);
    let config = ConvolutionConfig {
        transpose: true,
        ..explicit(&[0], &[0], &[2, 2, 1])
    };
    let conv = graph.new_convolution_node(kernel, input, &config, None)?;
    assert_eq!(graph.get_node_value_expected_shape(conv)?, &[4, 4, 1]);
    assert_eq!(graph.get_node_type_name(conv)?, "convolution_transpose");

    graph.set_node_value(input, Some(&Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2, 1])))?;
    graph.forward(conv)?;
    let output = graph.get_node_value(conv)?.unwrap();
    for i in 0..4 {
        for j in 0..4 {
            let expected = [1.0, 2.0, 3.0, 4.0][(i / 2) * 2 + j / 2];
            assert_eq!(output[[i, j, 0]], expected);
        }
    }
    Ok(())
}

#[test]
fn test_convolution_invalid_configurations() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let input = graph.new_input_node(&[5, 5, 2], DataType::Float, None)?;
    let kernel = kernel_node(&mut graph, &[3, 3, 2, 1], 1.0);

    // 核的输入通道与输入不符
    let bad_kernel = kernel_node(&mut graph, &[3, 3, 1, 1], 1.0);
    assert_err!(
        graph.new_convolution_node(bad_kernel, input, &ConvolutionConfig::default(), None),
        GraphError::ShapeMismatch { .. }
    );

    // 通道轴步长须等于输入通道数
    assert_err!(
        graph.new_convolution_node(kernel, input, &explicit(&[0], &[0], &[1, 1, 1]), None),
        GraphError::InvalidOperation(msg) if msg.contains("通道轴步长")
    );

    // 只支持全共享
    let unshared = ConvolutionConfig {
        strides: vec![1, 1, 2],
        sharing: vec![true, false],
        ..ConvolutionConfig::default()
    };
    assert_err!(
        graph.new_convolution_node(kernel, input, &unshared, None),
        GraphError::InvalidOperation(_)
    );

    // 核比填充后的输入还大
    let huge_kernel = kernel_node(&mut graph, &[7, 7, 2, 1], 1.0);
    assert_err!(
        graph.new_convolution_node(huge_kernel, input, &explicit(&[0], &[0], &[1, 1, 2]), None),
        GraphError::InvalidOperation(_)
    );

    // 输入不是 3 阶
    let flat = graph.new_input_node(&[25], DataType::Float, None)?;
    assert_err!(
        graph.new_convolution_node(kernel, flat, &ConvolutionConfig::default(), None),
        GraphError::ShapeMismatch { .. }
    );
    Ok(())
}
