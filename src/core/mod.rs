use bevy::prelude::*;

pub mod events;
pub mod resources;
pub mod states;

use crate::item::{DEFAULT_SURFACE_NAME, SurfaceRegistry};

/// 核心插件：注册全局资源 / 事件 / 状态
///
/// 配置在建 App 之前读好，AssetPlugin 的根目录也取自同一份
pub struct CorePlugin {
    pub config: resources::GameConfig,
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        // 物品读档时按名字在这里找显示面
        let mut surfaces = SurfaceRegistry::default();
        surfaces.register(DEFAULT_SURFACE_NAME);

        app.init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .insert_resource(self.config.clone())
            .insert_resource(surfaces)
            .add_systems(Startup, events::announce_config);
    }
}
