/*
 * @Date         : 2026-10-16
 * @Description  : Graph 句柄（层构建器使用的引擎 API）
 */

use super::error::GraphError;
use super::inner::GraphInner;
use crate::nn::var::Var;
use crate::nn::{
    BatchNormConfig, ConvolutionConfig, DataType, DeviceDescriptor, NdArrayView, NodeId,
    ParameterInitializer, PoolingConfig,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Graph - 计算图句柄
///
/// # 设计原则
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装
/// - Clone 语义：多个 Graph 引用同一个 GraphInner
/// - 创建的 Var 自动持有图引用
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl Graph {
    // ==================== 创建 ====================

    pub fn new() -> Self {
        Self::from_inner(GraphInner::new())
    }

    /// 创建带种子的图（参数初始化与 Dropout 可复现）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_inner(GraphInner::new_with_seed(seed))
    }

    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) const fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    /// 获取内部 GraphInner 的不可变引用
    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    fn wrap_node_id(&self, node_id: NodeId) -> Var {
        Var::new(node_id, Rc::clone(&self.inner))
    }

    fn check_same_graph(&self, vars: &[&Var], op: &str) -> Result<(), GraphError> {
        if vars.iter().all(|var| Rc::ptr_eq(var.graph(), &self.inner)) {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation(format!(
                "不能对来自不同 Graph 的 Var 进行{op}"
            )))
        }
    }

    // ==================== 叶子节点 ====================

    /// 创建输入变量，值稍后通过 `Var::set_value` 喂入
    pub fn input_variable(
        &self,
        shape: &[usize],
        data_type: DataType,
        name: Option<&str>,
    ) -> Result<Var, GraphError> {
        let node_id = self
            .inner
            .borrow_mut()
            .new_input_node(shape, data_type, name)?;
        Ok(self.wrap_node_id(node_id))
    }

    /// 按初始化器分配新参数
    pub fn parameter(
        &self,
        shape: &[usize],
        data_type: DataType,
        initializer: &ParameterInitializer,
        device: DeviceDescriptor,
        name: Option<&str>,
    ) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_parameter_node(
            shape,
            data_type,
            initializer,
            device,
            name,
        )?;
        Ok(self.wrap_node_id(node_id))
    }

    /// 以预分配数组为初值创建参数
    pub fn parameter_from(&self, view: &NdArrayView, name: Option<&str>) -> Result<Var, GraphError> {
        let node_id = self
            .inner
            .borrow_mut()
            .new_parameter_node_from_view(view, name)?;
        Ok(self.wrap_node_id(node_id))
    }

    pub fn constant(&self, view: &NdArrayView, name: Option<&str>) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_constant_node(view, name)?;
        Ok(self.wrap_node_id(node_id))
    }

    // ==================== 运算 ====================

    pub fn convolution(
        &self,
        kernel: &Var,
        input: &Var,
        config: &ConvolutionConfig,
    ) -> Result<Var, GraphError> {
        self.check_same_graph(&[kernel, input], "卷积")?;
        let node_id = self.inner.borrow_mut().new_convolution_node(
            kernel.node_id(),
            input.node_id(),
            config,
            None,
        )?;
        Ok(self.wrap_node_id(node_id))
    }

    pub fn pooling(&self, input: &Var, config: &PoolingConfig) -> Result<Var, GraphError> {
        self.check_same_graph(&[input], "池化")?;
        let node_id = self
            .inner
            .borrow_mut()
            .new_pooling_node(input.node_id(), config, None)?;
        Ok(self.wrap_node_id(node_id))
    }

    pub fn plus(&self, left: &Var, right: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(&[left, right], "加法")?;
        let node_id = self
            .inner
            .borrow_mut()
            .new_plus_node(left.node_id(), right.node_id(), None)?;
        Ok(self.wrap_node_id(node_id))
    }

    pub fn relu(&self, input: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(&[input], "ReLU")?;
        let node_id = self.inner.borrow_mut().new_relu_node(input.node_id(), None)?;
        Ok(self.wrap_node_id(node_id))
    }

    pub fn dropout(&self, input: &Var, p: f64) -> Result<Var, GraphError> {
        self.check_same_graph(&[input], "Dropout")?;
        let node_id = self
            .inner
            .borrow_mut()
            .new_dropout_node(input.node_id(), p, None)?;
        Ok(self.wrap_node_id(node_id))
    }

    pub fn batch_normalization(
        &self,
        input: &Var,
        scale: &Var,
        bias: &Var,
        running_mean: &Var,
        running_inv_std: &Var,
        config: &BatchNormConfig,
    ) -> Result<Var, GraphError> {
        self.check_same_graph(
            &[input, scale, bias, running_mean, running_inv_std],
            "批归一化",
        )?;
        let node_id = self.inner.borrow_mut().new_batch_normalization_node(
            input.node_id(),
            scale.node_id(),
            bias.node_id(),
            running_mean.node_id(),
            running_inv_std.node_id(),
            config,
            None,
        )?;
        Ok(self.wrap_node_id(node_id))
    }

    // ==================== 执行 ====================

    pub fn forward(&self, output: &Var) -> Result<(), GraphError> {
        self.check_same_graph(&[output], "前向传播")?;
        self.inner.borrow_mut().forward(output.node_id())
    }

    // ==================== 模式控制 ====================

    pub fn train(&self) {
        self.inner.borrow_mut().set_train_mode();
    }

    pub fn eval(&self) {
        self.inner.borrow_mut().set_eval_mode();
    }

    pub fn is_train_mode(&self) -> bool {
        self.inner.borrow().is_train_mode()
    }

    pub fn nodes_count(&self) -> usize {
        self.inner.borrow().nodes_count()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
