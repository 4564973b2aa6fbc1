//! # 常用工具模块
//!
//! 目前只有单元测试用的断言宏

pub mod macro_for_unit_test;
