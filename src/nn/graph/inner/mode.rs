/*
 * @Date         : 2026-10-16
 * @Description  : GraphInner train/eval 模式
 *
 * 模式只影响 Dropout 与 BatchNormalization 的前向计算。
 */

use super::GraphInner;

impl GraphInner {
    pub const fn set_train_mode(&mut self) {
        self.is_eval_mode = false;
    }

    pub const fn set_eval_mode(&mut self) {
        self.is_eval_mode = true;
    }

    pub const fn is_train_mode(&self) -> bool {
        !self.is_eval_mode
    }
}
