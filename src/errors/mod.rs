/*
 * @Date         : 2026-10-16
 * @Description  : 错误类型：可恢复的非法参数错误 + 不可恢复的非法状态终止
 */

use crate::nn::GraphError;
use thiserror::Error;

/// 2 选项复合值解析器遇到“无激活项”时的退出码
pub const EXIT_ILLEGAL_COMPOSITE_2: i32 = 0x1001;
/// 3 选项复合值解析器遇到“无激活项”时的退出码
pub const EXIT_ILLEGAL_COMPOSITE_3: i32 = 0x1002;

#[derive(Error, Debug, PartialEq)]
pub enum ChiantiError {
    /// 调用方传入了非法参数（如未知的 pad 字符串、形状不符的偏置）
    #[error("{0}")]
    IllegalArgument(String),
    /// 底层计算图（Engine）报错
    #[error("计算图错误：{0}")]
    Engine(#[from] GraphError),
}

pub type Result<T> = std::result::Result<T, ChiantiError>;

/// 断言参数条件，不满足时返回 `ChiantiError::IllegalArgument`
pub fn assert_argument(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ChiantiError::IllegalArgument(message.to_string()))
    }
}

/// 因不可恢复的错误终止进程
///
/// 只应在编程错误（而非用户输入错误）导致的非法状态下调用。
pub fn terminate(message: &str, exit_code: i32) -> ! {
    log::error!("非法系统状态（退出码 {exit_code:#x}）：{message}");
    eprintln!("Illegal system state reached: {message}");
    std::process::exit(exit_code)
}
