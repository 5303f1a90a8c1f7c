/*
 * @Date         : 2026-10-16
 * @Description  : Var - 计算图节点句柄，层构建器的输入与输出都是它
 */

use super::graph::{Graph, GraphInner};
use super::{DeviceDescriptor, GraphError, NodeId};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// 指向图中某个节点的句柄
///
/// Clone 只复制句柄；持有的是 `GraphInner` 的强引用，
/// 即使原始 Graph 已 drop，Var 依然可用。
///
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input_variable(&[5, 5, 1], DataType::Float, None)?;
/// let y = Conv2DLayer::new(&x, DeviceDescriptor::cpu()).num_filters(4).build()?;
/// x.set_value(&image)?;
/// let out = y.evaluate()?;
/// ```
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> Graph {
        Graph::from_rc(Rc::clone(&self.graph))
    }

    // ==================== 形状与元信息 ====================

    /// 节点的输出形状（节点创建时就已确定）
    pub fn shape(&self) -> Vec<usize> {
        self.graph
            .borrow()
            .get_node_value_expected_shape(self.id)
            .expect("获取形状失败")
            .to_vec()
    }

    pub fn rank(&self) -> usize {
        self.shape().len()
    }

    pub fn name(&self) -> Result<String, GraphError> {
        Ok(self.graph.borrow().get_node_name(self.id)?.to_string())
    }

    /// 参数/常量所在的设备；运算节点与输入节点为 None
    pub fn device(&self) -> Result<Option<DeviceDescriptor>, GraphError> {
        self.graph.borrow().get_node_device(self.id)
    }

    // ==================== 执行 ====================

    pub fn forward(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward(self.id)
    }

    /// 前向传播后取出值
    pub fn evaluate(&self) -> Result<Tensor, GraphError> {
        self.forward()?;
        self.value()?.ok_or_else(|| {
            GraphError::ComputationError(format!("节点{:?}前向传播后仍没有值", self.id))
        })
    }

    // ==================== 值访问和设置 ====================

    /// 获取节点的值（克隆的 Tensor）
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, Some(value))
    }

    // ==================== 运算 ====================

    pub fn relu(&self) -> Result<Self, GraphError> {
        self.get_graph().relu(self)
    }

    pub fn plus(&self, other: &Self) -> Result<Self, GraphError> {
        self.get_graph().plus(self, other)
    }
}
