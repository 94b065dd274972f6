use bevy::prelude::*;

use crate::character::components::PlayerStats;
use crate::item::InventoryItem;

/// 使用时治疗玩家；满血时返回 false，物品不会被消耗
pub fn attach_heal(item: &mut InventoryItem, player: PlayerStats, amount: i32) {
    item.set_on_use(move || {
        info!("Healing player");
        player.heal(amount) > 0
    });
}
