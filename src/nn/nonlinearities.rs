/*
 * @Date         : 2026-10-16
 * @Description  : 层输出处使用的非线性函数
 */

use super::{GraphError, Var};

/// 从一个节点映射到另一个节点的纯函数
pub type NonLinearity = fn(&Var) -> Result<Var, GraphError>;

/// `max(0, x)`
pub fn rectify(input: &Var) -> Result<Var, GraphError> {
    input.relu()
}

/// 恒等映射，不向图中添加节点
pub fn linear(input: &Var) -> Result<Var, GraphError> {
    Ok(input.clone())
}
