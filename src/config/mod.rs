//! 配置管理
//!
//! 配置在启动时加载一次，之后以显式依赖的形式传递给各组件。

mod r#impl;
mod structs;

pub use structs::*;
