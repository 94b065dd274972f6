use bevy::prelude::*;

/// 使用背包第 `index` 格的物品
#[derive(Event)]
pub struct UseItemEvent {
    pub index: usize,
}

#[derive(Event)]
pub struct ListInventoryEvent; // 让 CLI 请求打印背包

#[derive(Event)]
pub struct SaveInventoryEvent;

#[derive(Event)]
pub struct LoadInventoryEvent;

/// 背包刚从存档重建，使用回调需要重新挂上
#[derive(Event)]
pub struct InventoryLoaded;
