pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::{resources::GameConfig, states::AppState};
use components::*;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        let backpack = app
            .world()
            .get_resource::<GameConfig>()
            .map(Backpack::from_config)
            .unwrap_or_default();

        app.insert_resource(backpack)
            .add_event::<UseItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<SaveInventoryEvent>()
            .add_event::<LoadInventoryEvent>()
            .add_event::<InventoryLoaded>()
            .add_systems(
                Update,
                (use_item, print_inventory, save_inventory, load_inventory)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
