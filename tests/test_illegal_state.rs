/*
 * @Date         : 2026-10-16
 * @Description  : 复合值“无激活项”时的进程终止行为
 *                 终止会直接退出进程，因此以子进程方式重新运行本测试程序来观察
 */

use chianti::errors::{EXIT_ILLEGAL_COMPOSITE_2, EXIT_ILLEGAL_COMPOSITE_3};
use chianti::nn::{Conv2DLayer, DataType, DeviceDescriptor, Graph, Layer};
use chianti::values::{CompositeValue2, CompositeValue3};
use std::process::{Command, Output};

const CASE_ENV: &str = "CHIANTI_ILLEGAL_STATE_CASE";
const CHILD_TEST: &str = "run_illegal_state_case";

fn run_in_child(case: &str) -> Output {
    let exe = std::env::current_exe().unwrap();
    Command::new(exe)
        .args([CHILD_TEST, "--exact", "--nocapture", "--test-threads=1"])
        .env(CASE_ENV, case)
        .output()
        .unwrap()
}

/// 仅在子进程中（设置了环境变量时）真正执行
#[test]
fn run_illegal_state_case() {
    let Ok(case) = std::env::var(CASE_ENV) else {
        return;
    };
    let graph = Graph::new();
    let x = graph
        .input_variable(&[5, 5, 1], DataType::Float, Some("x"))
        .unwrap();
    let layer = Conv2DLayer::new(&x, DeviceDescriptor::cpu());
    let _ = match case.as_str() {
        "weight" => layer.w(CompositeValue2::default()).build(),
        "bias" => layer.b(CompositeValue3::default()).build(),
        other => panic!("未知用例：{other}"),
    };
    // 走到这里说明没有终止
    std::process::exit(0);
}

fn assert_terminated(output: &Output, exit_code: i32, message: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "子进程未终止，stderr：{stderr}");
    assert_ne!(output.status.code(), Some(0));
    #[cfg(unix)]
    assert_eq!(output.status.code(), Some(exit_code & 0xff));
    #[cfg(not(unix))]
    assert_eq!(output.status.code(), Some(exit_code));
    assert!(
        stderr.contains(&format!("Illegal system state reached: {message}")),
        "stderr：{stderr}"
    );
}

#[test]
fn test_weight_without_active_alternative_terminates() {
    let output = run_in_child("weight");
    assert_terminated(
        &output,
        EXIT_ILLEGAL_COMPOSITE_2,
        "Illegal state of CompositeValue<tensor, initializer>: no alternative is active.",
    );
}

#[test]
fn test_bias_without_active_alternative_terminates() {
    let output = run_in_child("bias");
    assert_terminated(
        &output,
        EXIT_ILLEGAL_COMPOSITE_3,
        "Illegal state of CompositeValue<tensor, initializer, bool>: no parameter alternative is active.",
    );
}
