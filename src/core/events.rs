use bevy::prelude::*;

use super::resources::GameConfig;

/// 给 CLI 看的一行输出
#[derive(Event)]
pub struct LogEvent(pub String);

pub fn announce_config(config: Res<GameConfig>, mut writer: EventWriter<LogEvent>) {
    writer.write(LogEvent(format!(
        "存档: {}，精灵目录: {}",
        config.save_path().display(),
        config.sprite_dir
    )));
}
