use bevy::prelude::*;
use std::path::Path;

use bevy_inventory::character::CharacterPlugin;
use bevy_inventory::core::resources::{CONFIG_PATH, GameConfig};
use bevy_inventory::core::{self, CorePlugin, states};
use bevy_inventory::data::DataPlugin;
use bevy_inventory::interface::debug_cli::DebugCliPlugin;
use bevy_inventory::inventory::InventoryPlugin;
use bevy_inventory::potion::PotionPlugin;

fn main() {
    let config = GameConfig::load_or_default(Path::new(CONFIG_PATH));

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        visible: false,
                        ..default()
                    }), // visible窗口，实现“无 UI”
                    ..default()
                })
                .set(config.asset_plugin()),
        )
        // CorePlugin 先插入配置，后面的插件要读
        .add_plugins(CorePlugin { config })
        .add_plugins(CharacterPlugin)
        .add_plugins(InventoryPlugin)
        .add_plugins(PotionPlugin)
        .add_plugins(DataPlugin)
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event) // 简单打印
        .add_systems(Startup, |mut next: ResMut<NextState<states::AppState>>| {
            next.set(states::AppState::Loading);
        })
        .run();
}

fn forward_log_event(mut reader: EventReader<core::events::LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
