use bevy::log::warn;

use super::InventoryItem;
use crate::data::schema::ItemData;

/// 存档结果：记录总会生成，缺失的部分写进 `errors`
#[derive(Debug)]
pub struct SaveOutcome {
    pub record: ItemData,
    pub errors: Vec<String>,
}

impl SaveOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl InventoryItem {
    pub fn create_save_data(&self, using_default_display: bool) -> SaveOutcome {
        let mut errors = Vec::new();
        let mut record = ItemData {
            item_tag: self.tag.clone(),
            description: self.description.clone(),
            display_number_of_items: self.display_quantity,
            number_of_items: self.quantity,
            max_items_per_stack: self.max_per_stack,
            is_stackable: self.stackable,
            using_default_display,
            equippable_item: self.equippable,
            ..Default::default()
        };

        if using_default_display {
            match &self.view.image {
                Some(node) => {
                    if node.sprite.name.is_empty() {
                        errors.push("Sprite Does Not Exist".to_string());
                    } else {
                        record.sprite = node.sprite.name.clone();
                    }
                    record.image = node.name.clone();
                }
                None => {
                    errors.push("Sprite Does Not Exist".to_string());
                    errors.push("Image Does Not Exist".to_string());
                }
            }
            match &self.view.parent {
                Some(surface) => record.canvas = surface.name().to_string(),
                None => errors.push("Canvas Does Not Exist.".to_string()),
            }
            record.position = self.position.into();
        }

        record.row = self.row;
        record.col = self.col;

        for e in &errors {
            warn!("saving {}: {e}", self.tag);
        }
        SaveOutcome { record, errors }
    }
}
