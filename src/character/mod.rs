pub mod components;
pub mod events;
pub mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use components::*;
use events::*;
use systems::*;

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerStats>()
            .add_event::<TakeDamage>()
            .add_event::<ShowStats>()
            .add_systems(
                Update,
                (handle_take_damage, show_stats).run_if(in_state(AppState::InGame)),
            );
    }
}
