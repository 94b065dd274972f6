pub mod loader;
pub mod schema;

use bevy::asset::LoadState;
use bevy::prelude::*;
use schema::InventoryData;

use crate::core::{events::LogEvent, resources::GameConfig, states::AppState};
use crate::inventory::{components::Backpack, events::InventoryLoaded};
use crate::item::{FsHost, SurfaceRegistry};

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct SaveFileAssets {
    handle: Option<Handle<InventoryData>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<InventoryData>()
            .register_asset_loader(loader::SaveFileLoader)
            .init_resource::<SaveFileAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, check_loaded.run_if(in_state(AppState::Loading)));
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut save_assets: ResMut<SaveFileAssets>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    let handle: Handle<InventoryData> = asset_server.load(config.save_file.clone());
    save_assets.handle = Some(handle);
}

#[allow(clippy::too_many_arguments)]
fn check_loaded(
    mut next: ResMut<NextState<AppState>>,
    save_assets: Res<SaveFileAssets>,
    saves: Res<Assets<InventoryData>>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
    surfaces: Res<SurfaceRegistry>,
    mut backpack: ResMut<Backpack>,
    mut loaded: EventWriter<InventoryLoaded>,
    mut log: EventWriter<LogEvent>,
) {
    let Some(handle) = &save_assets.handle else {
        return;
    };

    if let Some(data) = saves.get(handle) {
        let host = FsHost::new(surfaces.clone());
        let report = backpack.restore(data, &config, &host);
        log.write(LogEvent(report.summary()));
        loaded.write(InventoryLoaded);
        next.set(AppState::InGame);
    } else if let LoadState::Failed(err) = asset_server.load_state(handle) {
        // 没有存档就从空背包开始
        warn!("{err}");
        log.write(LogEvent("未找到存档，使用空背包".into()));
        next.set(AppState::InGame);
    }
}
