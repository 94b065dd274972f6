//! 背包物品组件：数量/堆叠约束、使用回调、存档与读档（含精灵加载与兜底）。
//!
//! `item` 与 `data::schema` 不依赖 ECS 调度，其余模块是把它们挂进 Bevy 应用的插件。

pub mod character;
pub mod core;
pub mod data;
pub mod interface;
pub mod inventory;
pub mod item;
pub mod potion;
