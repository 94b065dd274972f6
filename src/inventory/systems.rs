use super::{components::*, events::*};
use crate::core::{events::LogEvent, resources::GameConfig};
use crate::data::schema::InventoryData;
use crate::item::{FsHost, SurfaceRegistry};
use bevy::prelude::*;

/// 使用物品：回调成功才消耗
pub fn use_item(
    mut ev_use: EventReader<UseItemEvent>,
    mut backpack: ResMut<Backpack>,
    mut log_event: EventWriter<LogEvent>,
) {
    for ev in ev_use.read() {
        let name = backpack
            .get(ev.index)
            .map(|item| item.tag().to_string())
            .unwrap_or_default();

        let msg = match backpack.use_at(ev.index) {
            Ok(UseOutcome::Consumed { remaining }) => format!("使用 {name}，剩余 {remaining}"),
            Ok(UseOutcome::Depleted) => format!("使用 {name}，已用完"),
            Ok(UseOutcome::Failed) => format!("{name} 没有生效，物品保留"),
            Err(e) => {
                warn!("{e}");
                format!("无法使用：{e}")
            }
        };
        log_event.write(LogEvent(msg));
    }
}

/// 打印背包内容
pub fn print_inventory(mut ev_list: EventReader<ListInventoryEvent>, backpack: Res<Backpack>) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    if backpack.is_empty() {
        println!("  (empty)");
        return;
    }
    for (idx, item) in backpack.iter().enumerate() {
        let usable = if item.has_on_use() { " [可使用]" } else { "" };
        println!(
            "[{idx}] {} ×{}/{} @({}, {}){usable}",
            item.tag(),
            item.quantity(),
            item.max_per_stack(),
            item.row(),
            item.col()
        );
    }
}

pub fn save_inventory(
    mut ev_save: EventReader<SaveInventoryEvent>,
    backpack: Res<Backpack>,
    config: Res<GameConfig>,
    mut log_event: EventWriter<LogEvent>,
) {
    if ev_save.is_empty() {
        return;
    }
    ev_save.clear();

    let (data, errors) = backpack.to_save_data(&config.sprite_dir);
    for e in &errors {
        log_event.write(LogEvent(format!("存档警告：{e}")));
    }
    let path = config.save_path();
    match data.write_to(&path) {
        Ok(()) => {
            info!("saved {} items to {}", data.items.len(), path.display());
            log_event.write(LogEvent(format!("已存档 {} 件物品", data.items.len())));
        }
        Err(e) => {
            warn!("{e:#}");
            log_event.write(LogEvent(format!("存档失败：{e}")));
        }
    }
}

/// 直接从磁盘重读存档（不经过 AssetServer 的缓存）
pub fn load_inventory(
    mut ev_load: EventReader<LoadInventoryEvent>,
    mut backpack: ResMut<Backpack>,
    config: Res<GameConfig>,
    surfaces: Res<SurfaceRegistry>,
    mut loaded: EventWriter<InventoryLoaded>,
    mut log_event: EventWriter<LogEvent>,
) {
    if ev_load.is_empty() {
        return;
    }
    ev_load.clear();

    let data = match InventoryData::read_from(&config.save_path()) {
        Ok(data) => data,
        Err(e) => {
            warn!("{e:#}");
            log_event.write(LogEvent(format!("读档失败：{e}")));
            return;
        }
    };

    let host = FsHost::new(surfaces.clone());
    let report = backpack.restore(&data, &config, &host);
    for e in &report.errors {
        log_event.write(LogEvent(format!("读档警告：{e}")));
    }
    log_event.write(LogEvent(report.summary()));
    loaded.write(InventoryLoaded);
}
