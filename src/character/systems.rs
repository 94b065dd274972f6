use super::{components::*, events::*};
use crate::core::events::LogEvent;
use bevy::prelude::*;

/// 处理受到伤害事件
pub fn handle_take_damage(
    mut ev_take_damage: EventReader<TakeDamage>,
    mut ev_log: EventWriter<LogEvent>,
    player: Res<PlayerStats>,
) {
    for ev in ev_take_damage.read() {
        let is_dead = player.take_damage(ev.damage);
        if let Some(stats) = player.snapshot() {
            ev_log.write(LogEvent(format!(
                "受到 {} 点伤害，当前生命值：{}/{}",
                ev.damage, stats.hp, stats.max_hp
            )));
        }
        if is_dead {
            ev_log.write(LogEvent("死亡！".to_string()));
        }
    }
}

/// 显示属性信息
pub fn show_stats(
    mut ev_show_stats: EventReader<ShowStats>,
    mut ev_log: EventWriter<LogEvent>,
    player: Res<PlayerStats>,
) {
    for _ in ev_show_stats.read() {
        let msg = match player.snapshot() {
            Some(stats) => format!("生命值: {}/{}", stats.hp, stats.max_hp),
            None => "未找到角色属性".to_string(),
        };
        ev_log.write(LogEvent(msg));
    }
}
