/// 错误断言宏 - 灵活粒度验证 Result 错误
///
/// # 用法
/// - `assert_err!(expr)`：只验证是 Err
/// - `assert_err!(expr, Variant(literal))`：验证错误类型 + 精确消息（String 变体）
/// - `assert_err!(expr, Pattern { .. })` / `assert_err!(expr, Pattern(..))`：只验证错误类型
/// - `assert_err!(expr, Pattern(x) if condition)`：验证类型 + 条件
///
/// # 示例
/// ```ignore
/// assert_err!(result);
/// assert_err!(result, ChiantiError::IllegalArgument("Invalid string value for pad."));
/// assert_err!(result, GraphError::ShapeMismatch { .. });
/// assert_err!(result, ChiantiError::IllegalArgument(msg) if msg.contains("pad"));
/// ```
#[macro_export]
macro_rules! assert_err {
    // 只验证是 Err
    ($expr:expr) => {
        assert!($expr.is_err(), "预期 Err，实际得到 {:?}", $expr);
    };
    // 简洁语法：Variant(字符串字面量) - 精确匹配 String 内容
    ($expr:expr, $err_type:ident :: $variant:ident ( $expected:literal )) => {
        match &$expr {
            Err($err_type::$variant(actual)) => assert_eq!(
                actual, $expected,
                "错误消息不匹配：预期 `{}`，实际得到 `{}`",
                $expected, actual
            ),
            Err(e) => panic!(
                "错误类型不匹配：预期 `{}::{}`，实际得到 `{:?}`",
                stringify!($err_type),
                stringify!($variant),
                e
            ),
            Ok(_) => panic!(
                "预期 Err({}::{})，实际得到 Ok",
                stringify!($err_type),
                stringify!($variant)
            ),
        }
    };
    // 模式匹配（可带条件）
    ($expr:expr, $pattern:pat $(if $cond:expr)?) => {
        match &$expr {
            Err($pattern) $(if $cond)? => {}
            Err(e) => panic!(
                "错误不匹配模式 `{}`，实际得到 `{:?}`",
                stringify!($pattern),
                e
            ),
            Ok(_) => panic!("预期 Err({})，实际得到 Ok", stringify!($pattern)),
        }
    };
}
