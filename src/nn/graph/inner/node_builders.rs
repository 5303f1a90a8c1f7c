/*
 * @Date         : 2026-10-16
 * @Description  : GraphInner 节点构建方法（new_*_node）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{
    BatchNormalization, Constant, Convolution, Dropout, Input, Parameter, Plus, Pooling, ReLU,
};
use crate::nn::{
    BatchNormConfig, ConvolutionConfig, DataType, DeviceDescriptor, NdArrayView, NodeId,
    ParameterInitializer, PoolingConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

impl GraphInner {
    /// 添加节点到列表
    pub(in crate::nn::graph) fn add_node_to_list(
        &mut self,
        mut node_handle: NodeHandle,
        name: Option<&str>,
        node_type: &str,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        let node_id = self.generate_valid_node_id();
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), node_type)?;

        for &parent_id in parents {
            self.forward_edges
                .entry(parent_id)
                .or_default()
                .push(node_id);
        }
        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        node_handle.bind_id_and_name(node_id, &node_name);
        log::trace!(
            "图{}新增节点{node_handle}，形状{:?}",
            self.name,
            node_handle.value_expected_shape()
        );
        self.nodes.insert(node_id, node_handle);
        Ok(node_id)
    }

    fn check_data_type(data_type: DataType) -> Result<(), GraphError> {
        match data_type {
            DataType::Float => Ok(()),
            DataType::Double => Err(GraphError::InvalidOperation(
                "参考引擎只支持 Float 类型的张量".to_string(),
            )),
        }
    }

    // ========== 叶子节点 ==========

    pub fn new_input_node(
        &mut self,
        shape: &[usize],
        data_type: DataType,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        Self::check_data_type(data_type)?;
        let node = NodeHandle::new(Input::new(shape)?, "input");
        self.add_node_to_list(node, name, "input", &[])
    }

    /// 按初始化器分配一个新参数（使用图的 RNG）
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        data_type: DataType,
        initializer: &ParameterInitializer,
        device: DeviceDescriptor,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        Self::check_data_type(data_type)?;
        if shape.is_empty() || shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "参数的形状须非空且各维大于0，得到{shape:?}"
            )));
        }
        let value = initializer.generate_with_rng(shape, &mut self.rng);
        let node = NodeHandle::new(Parameter::new(value, device), "parameter");
        self.add_node_to_list(node, name, "parameter", &[])
    }

    /// 以预分配数组作为参数的初值
    pub fn new_parameter_node_from_view(
        &mut self,
        view: &NdArrayView,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(
            Parameter::new(view.tensor().clone(), view.device()),
            "parameter",
        );
        self.add_node_to_list(node, name, "parameter", &[])
    }

    pub fn new_constant_node(
        &mut self,
        view: &NdArrayView,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(
            Constant::new(view.tensor().clone(), view.device()),
            "constant",
        );
        self.add_node_to_list(node, name, "constant", &[])
    }

    // ========== 运算节点 ==========

    pub fn new_convolution_node(
        &mut self,
        kernel_id: NodeId,
        input_id: NodeId,
        config: &ConvolutionConfig,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [kernel_id, input_id];
        let node = Convolution::new(&self.get_nodes(&parents)?, config)?;
        let type_name = if config.transpose {
            "convolution_transpose"
        } else {
            "convolution"
        };
        self.add_node_to_list(NodeHandle::new(node, type_name), name, type_name, &parents)
    }

    pub fn new_pooling_node(
        &mut self,
        input_id: NodeId,
        config: &PoolingConfig,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Pooling::new(&self.get_nodes(&[input_id])?, config)?;
        self.add_node_to_list(NodeHandle::new(node, "pooling"), name, "pooling", &[input_id])
    }

    pub fn new_plus_node(
        &mut self,
        left_id: NodeId,
        right_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [left_id, right_id];
        let node = Plus::new(&self.get_nodes(&parents)?)?;
        self.add_node_to_list(NodeHandle::new(node, "plus"), name, "plus", &parents)
    }

    pub fn new_relu_node(
        &mut self,
        input_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = ReLU::new(&self.get_nodes(&[input_id])?)?;
        self.add_node_to_list(NodeHandle::new(node, "relu"), name, "relu", &[input_id])
    }

    /// 每个 Dropout 节点持有自己的 RNG，其种子取自图的 RNG
    pub fn new_dropout_node(
        &mut self,
        input_id: NodeId,
        p: f64,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let rng = StdRng::seed_from_u64(self.rng.r#gen::<u64>());
        let node = Dropout::new(&self.get_nodes(&[input_id])?, p, rng)?;
        self.add_node_to_list(NodeHandle::new(node, "dropout"), name, "dropout", &[input_id])
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_batch_normalization_node(
        &mut self,
        input_id: NodeId,
        scale_id: NodeId,
        bias_id: NodeId,
        running_mean_id: NodeId,
        running_inv_std_id: NodeId,
        config: &BatchNormConfig,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [
            input_id,
            scale_id,
            bias_id,
            running_mean_id,
            running_inv_std_id,
        ];
        let node = BatchNormalization::new(&self.get_nodes(&parents)?, config)?;
        self.add_node_to_list(
            NodeHandle::new(node, "batch_normalization"),
            name,
            "batch_normalization",
            &parents,
        )
    }
}
