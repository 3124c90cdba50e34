//! 表格核心逻辑：表头绑定、行渲染、增删控制。不依赖任何界面代码。

pub mod binder;
pub mod controller;
pub mod renderer;
