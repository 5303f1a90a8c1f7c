/*
 * @Date         : 2026-10-16
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础操作 + forward
 * - mode.rs: train/eval
 * - node_builders.rs: new_*_node
 */

mod core;
mod mode;
mod node_builders;

use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 正向边：parent_id -> child_ids
    pub(in crate::nn::graph) forward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 反向边：child_id -> parent_ids（顺序即父节点顺序）
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 最后一次前向传播的 id
    pub(in crate::nn::graph) last_forward_pass_id: u64,
    pub(in crate::nn::graph) next_id: u64,
    pub(in crate::nn::graph) is_eval_mode: bool,
    /// 图级别的随机数生成器（用于参数初始化与 Dropout）
    pub(in crate::nn::graph) rng: StdRng,
    /// 创建图时指定的种子；None 表示由系统熵初始化
    pub(in crate::nn::graph) seed: Option<u64>,
}
