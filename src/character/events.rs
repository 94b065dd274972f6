use bevy::prelude::*;

/// 受到伤害事件
#[derive(Event)]
pub struct TakeDamage {
    pub damage: i32,
}

/// 显示属性事件（用于命令行）
#[derive(Event)]
pub struct ShowStats;
