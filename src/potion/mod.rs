//! 药水：给配置里列出的物品挂上治疗回调

mod heal;

pub use heal::attach_heal;

use bevy::prelude::*;

use crate::character::components::PlayerStats;
use crate::core::resources::GameConfig;
use crate::inventory::{components::Backpack, events::InventoryLoaded};

pub struct PotionPlugin;
impl Plugin for PotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, attach_potions);
    }
}

/// 每次背包重建后重新挂回调（回调不会进存档）
fn attach_potions(
    mut ev_loaded: EventReader<InventoryLoaded>,
    mut backpack: ResMut<Backpack>,
    config: Res<GameConfig>,
    player: Res<PlayerStats>,
) {
    if ev_loaded.is_empty() {
        return;
    }
    ev_loaded.clear();

    let mut count = 0;
    for item in backpack
        .iter_mut()
        .filter(|item| config.potion.tags.iter().any(|t| t == item.tag()))
    {
        attach_heal(item, player.clone(), config.potion.heal);
        count += 1;
    }
    debug!("attached heal to {count} potions");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::components::Stats;
    use crate::data::schema::{InventoryData, ItemData};
    use crate::inventory::components::UseOutcome;
    use crate::item::testing::MemoryHost;

    fn record(tag: &str, quantity: u32) -> ItemData {
        ItemData {
            item_tag: tag.into(),
            number_of_items: quantity,
            max_items_per_stack: 5,
            ..Default::default()
        }
    }

    /// 读档后的背包经过一帧 Update，药水重新能用
    #[test]
    fn restored_potions_get_heal_back() {
        let config = GameConfig::default();
        let data = InventoryData {
            items: vec![record("Health Potion", 2), record("Rope", 1)],
            ..Default::default()
        };
        let mut backpack = Backpack::new(4, 4, false);
        let report = backpack.restore(&data, &config, &MemoryHost::with_canvas());
        assert_eq!(report.loaded, 2);
        assert!(backpack.iter().all(|item| !item.has_on_use()));

        let player = PlayerStats::new(Stats { hp: 10, max_hp: 20 });
        let mut app = App::new();
        app.add_event::<InventoryLoaded>()
            .insert_resource(backpack)
            .insert_resource(config)
            .insert_resource(player.clone())
            .add_systems(Update, attach_potions);

        app.world_mut().send_event(InventoryLoaded);
        app.update();

        let mut backpack = app.world_mut().resource_mut::<Backpack>();
        assert!(backpack.get(0).is_some_and(|item| item.has_on_use()));
        assert!(backpack.get(1).is_some_and(|item| !item.has_on_use()));
        assert_eq!(
            backpack.use_at(0),
            Ok(UseOutcome::Consumed { remaining: 1 })
        );
        assert_eq!(player.snapshot().map(|s| s.hp), Some(15));
    }

    #[test]
    fn nothing_attached_without_load_event() {
        let mut backpack = Backpack::new(4, 4, false);
        let mut potion = crate::item::InventoryItem::new("Health Potion");
        potion.set_quantity(1);
        backpack.add(potion).unwrap();

        let mut app = App::new();
        app.add_event::<InventoryLoaded>()
            .insert_resource(backpack)
            .insert_resource(GameConfig::default())
            .insert_resource(PlayerStats::default())
            .add_systems(Update, attach_potions);
        app.update();

        let backpack = app.world().resource::<Backpack>();
        assert!(backpack.get(0).is_some_and(|item| !item.has_on_use()));
    }
}
