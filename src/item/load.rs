//! 读档：记录 → 物品
//!
//! 两级错误：软错误累积后继续，硬错误立即返回失败。硬错误返回时，
//! 之前已经写入的字段不会回滚。

use bevy::log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use super::{
    DEFAULT_SPRITE_EXTENSION, InventoryItem, ItemHost, ItemLoadError, Sprite, VISUAL_FRAME_SIZE,
};
use crate::data::schema::ItemData;

/// 物品挂载的显示面名字
pub const DEFAULT_SURFACE_NAME: &str = "Canvas";
/// 兜底精灵文件，与配置的扩展名无关
pub const ERROR_SPRITE_FILE: &str = "ErrorSprite.png";
pub const ERROR_SPRITE_NAME: &str = "Error-Sprite";
/// 读档后给外部系统识别用的分类标签
pub const ITEM_CLASSIFICATION: &str = "Item";

#[derive(Debug)]
pub struct LoadOutcome {
    pub success: bool,
    pub errors: Vec<ItemLoadError>,
}

impl LoadOutcome {
    fn finished(errors: Vec<ItemLoadError>) -> Self {
        Self {
            success: true,
            errors,
        }
    }

    fn aborted(errors: Vec<ItemLoadError>) -> Self {
        Self {
            success: false,
            errors,
        }
    }

    pub fn hard_error(&self) -> Option<&ItemLoadError> {
        self.errors.iter().find(|e| e.is_hard())
    }

    pub fn soft_errors(&self) -> impl Iterator<Item = &ItemLoadError> {
        self.errors.iter().filter(|e| !e.is_hard())
    }
}

impl InventoryItem {
    /// `sprite_locations` 与精灵名、扩展名直接拼接成路径
    pub fn load_from_data<H: ItemHost + ?Sized>(
        &mut self,
        data: &ItemData,
        sprite_locations: &str,
        host: &H,
    ) -> LoadOutcome {
        let mut errors = Vec::new();

        let surface = host.find_display_surface(DEFAULT_SURFACE_NAME);
        if surface.is_none() {
            let e = ItemLoadError::SurfaceNotFound(DEFAULT_SURFACE_NAME.to_string());
            warn!("{e}");
            errors.push(e);
        }

        self.equippable = data.equippable_item;
        self.tag = data.item_tag.clone();

        if data.using_default_display {
            self.description = data.description.clone();
            if self.description.is_empty() {
                warn!("{}: {}", data.item_tag, ItemLoadError::MissingDescription);
                errors.push(ItemLoadError::MissingDescription);
            }
        }

        if let Err(e) = self.copy_scalars(data) {
            warn!("{e}");
            errors.push(e);
            return LoadOutcome::aborted(errors);
        }

        if data.using_default_display {
            let sprite = match self.load_primary_sprite(data, sprite_locations, host) {
                Ok(sprite) => sprite,
                Err(e) => {
                    warn!("{e}");
                    errors.push(e);
                    errors.push(ItemLoadError::PrimaryAssetFailed);
                    match load_error_sprite(sprite_locations, host) {
                        Ok(sprite) => sprite,
                        Err(e) => {
                            warn!("{e}");
                            errors.push(e);
                            return LoadOutcome::aborted(errors);
                        }
                    }
                }
            };
            if let Some(surface) = &surface {
                self.set_parent_surface(surface.clone());
            }
            self.position_visual_frame(VISUAL_FRAME_SIZE, data.position.into());
            self.attach_visual(sprite);
        }

        self.set_active(false);
        self.row = data.row;
        self.col = data.col;
        self.position = data.position.into();
        self.set_classification_tag(ITEM_CLASSIFICATION);

        debug!(
            "loaded item {} ({} soft errors)",
            self.tag,
            errors.len()
        );
        LoadOutcome::finished(errors)
    }

    /// 被改过的存档可能违反堆叠约束，视为损坏
    fn copy_scalars(&mut self, data: &ItemData) -> Result<(), ItemLoadError> {
        if data.number_of_items > data.max_items_per_stack {
            return Err(ItemLoadError::CorruptRecord {
                tag: data.item_tag.clone(),
                reason: format!(
                    "numberOfItems {} exceeds maxItemsPerStack {}",
                    data.number_of_items, data.max_items_per_stack
                ),
            });
        }
        self.display_quantity = data.display_number_of_items;
        self.quantity = data.number_of_items;
        self.max_per_stack = data.max_items_per_stack;
        self.stackable = data.is_stackable;
        Ok(())
    }

    fn load_primary_sprite<H: ItemHost + ?Sized>(
        &self,
        data: &ItemData,
        sprite_locations: &str,
        host: &H,
    ) -> Result<Sprite, ItemLoadError> {
        if data.sprite.is_empty() {
            return Err(ItemLoadError::EmptySpriteName);
        }
        let extension = if self.sprite_file_extension.is_empty() {
            DEFAULT_SPRITE_EXTENSION
        } else {
            self.sprite_file_extension.as_str()
        };
        let path = PathBuf::from(format!("{sprite_locations}{}{extension}", data.sprite));
        read_sprite(host, path, &data.sprite)
    }
}

fn load_error_sprite<H: ItemHost + ?Sized>(
    sprite_locations: &str,
    host: &H,
) -> Result<Sprite, ItemLoadError> {
    let path = PathBuf::from(format!("{sprite_locations}{ERROR_SPRITE_FILE}"));
    read_sprite(host, path.clone(), ERROR_SPRITE_NAME).map_err(|cause| {
        ItemLoadError::FallbackExhausted {
            path,
            cause: Box::new(cause),
        }
    })
}

fn read_sprite<H: ItemHost + ?Sized>(
    host: &H,
    path: PathBuf,
    name: &str,
) -> Result<Sprite, ItemLoadError> {
    if !host.file_exists(&path) {
        return Err(ItemLoadError::AssetNotFound(path));
    }
    let bytes = match host.read_all_bytes(&path) {
        Ok(bytes) => bytes,
        Err(source) => return Err(ItemLoadError::AssetRead { path, source }),
    };
    let image = match host.decode_image(&bytes) {
        Ok(image) => image,
        Err(source) => return Err(ItemLoadError::Decode { path, source }),
    };
    Ok(Sprite {
        name: name.to_string(),
        image: Arc::new(image),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::testing::{MemoryHost, png_bytes};
    use bevy::math::Vec3;

    const SPRITES: &str = "sprites/";

    fn potion_record() -> ItemData {
        ItemData {
            item_tag: "Health Potion".into(),
            description: "Restores a little health".into(),
            display_number_of_items: true,
            number_of_items: 3,
            max_items_per_stack: 10,
            is_stackable: true,
            using_default_display: true,
            sprite: "potion".into(),
            row: 2,
            col: 4,
            position: Vec3::new(10.0, 20.0, 0.0).into(),
            ..Default::default()
        }
    }

    #[test]
    fn loads_scalar_fields_without_display() {
        let host = MemoryHost::with_canvas();
        let record = ItemData {
            using_default_display: false,
            description: "ignored".into(),
            ..potion_record()
        };
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&record, SPRITES, &host);

        assert!(out.success);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(item.tag(), "Health Potion");
        assert_eq!(item.description(), "");
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.max_per_stack(), 10);
        assert!(item.display_quantity());
        assert_eq!((item.row(), item.col()), (2, 4));
        assert_eq!(item.position(), Vec3::new(10.0, 20.0, 0.0));
        assert!(item.view().image.is_none());
        assert!(!item.view().active);
        assert_eq!(item.view().classification.as_deref(), Some(ITEM_CLASSIFICATION));
    }

    #[test]
    fn loads_sprite_from_search_path() {
        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/potion.png", png_bytes(4, 4));
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&potion_record(), SPRITES, &host);

        assert!(out.success);
        assert!(out.hard_error().is_none());
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        let node = item.view().image.as_ref().unwrap();
        assert_eq!(node.sprite.name, "potion");
        assert_eq!(node.name, "Health Potion");
        assert_eq!(node.sprite.image.width(), 4);
        assert_eq!(item.view().parent.as_ref().map(|s| s.name()), Some("Canvas"));
        let frame = item.view().frame.unwrap();
        assert_eq!(frame.size, VISUAL_FRAME_SIZE);
        assert_eq!(frame.anchor, Vec3::new(10.0, 20.0, 0.0));
    }

    #[test]
    fn honours_configured_extension() {
        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/potion.jpg", png_bytes(1, 1));
        let mut item = InventoryItem::default();
        item.set_sprite_file_extension(".jpg");
        assert!(item.load_from_data(&potion_record(), SPRITES, &host).success);

        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/potion.png", png_bytes(1, 1));
        let mut item = InventoryItem::default();
        item.set_sprite_file_extension("");
        let out = item.load_from_data(&potion_record(), SPRITES, &host);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
    }

    #[test]
    fn missing_sprite_falls_back_to_error_sprite() {
        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/ErrorSprite.png", png_bytes(2, 2));
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&potion_record(), SPRITES, &host);

        assert!(out.success);
        assert!(out.hard_error().is_none());
        assert!(out.soft_errors().any(|e| matches!(
            e,
            ItemLoadError::AssetNotFound(p) if p.ends_with("potion.png")
        )));
        assert!(
            out.errors
                .iter()
                .any(|e| matches!(e, ItemLoadError::PrimaryAssetFailed))
        );
        let node = item.view().image.as_ref().unwrap();
        assert_eq!(node.sprite.name, ERROR_SPRITE_NAME);
        assert_eq!(item.sprite().map(|s| s.name.as_str()), Some(ERROR_SPRITE_NAME));
    }

    #[test]
    fn fallback_ignores_configured_extension() {
        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/ErrorSprite.png", png_bytes(1, 1));
        let mut item = InventoryItem::default();
        item.set_sprite_file_extension(".jpg");
        let out = item.load_from_data(&potion_record(), SPRITES, &host);
        assert!(out.success);
    }

    #[test]
    fn undecodable_and_unreadable_sprites_fall_back() {
        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/potion.png", b"garbage".to_vec());
        host.add_file("sprites/ErrorSprite.png", png_bytes(1, 1));
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&potion_record(), SPRITES, &host);
        assert!(out.success);
        assert!(matches!(out.errors[0], ItemLoadError::Decode { .. }));

        host.add_file("sprites/potion.png", png_bytes(1, 1));
        host.unreadable.push(PathBuf::from("sprites/potion.png"));
        let out = item.load_from_data(&potion_record(), SPRITES, &host);
        assert!(out.success);
        assert!(matches!(out.errors[0], ItemLoadError::AssetRead { .. }));
    }

    #[test]
    fn empty_sprite_name_falls_back() {
        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/ErrorSprite.png", png_bytes(1, 1));
        let record = ItemData {
            sprite: String::new(),
            ..potion_record()
        };
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&record, SPRITES, &host);
        assert!(out.success);
        assert!(matches!(out.errors[0], ItemLoadError::EmptySpriteName));
    }

    #[test]
    fn missing_sprite_and_fallback_is_hard_failure() {
        let host = MemoryHost::with_canvas();
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&potion_record(), SPRITES, &host);

        assert!(!out.success);
        let text: Vec<String> = out.errors.iter().map(ToString::to_string).collect();
        assert!(text.iter().any(|t| t.contains("potion.png")), "{text:?}");
        assert!(text.iter().any(|t| t.contains(ERROR_SPRITE_FILE)), "{text:?}");
        assert!(matches!(
            out.hard_error(),
            Some(ItemLoadError::FallbackExhausted { .. })
        ));

        // 之前写入的字段保留，后续步骤没有执行
        assert_eq!(item.tag(), "Health Potion");
        assert_eq!(item.quantity(), 3);
        assert!(item.view().active);
        assert!(item.view().classification.is_none());
        assert_eq!((item.row(), item.col()), (0, 0));
    }

    #[test]
    fn empty_tag_and_description_are_soft() {
        let mut host = MemoryHost::with_canvas();
        host.add_file("sprites/potion.png", png_bytes(1, 1));
        let record = ItemData {
            item_tag: String::new(),
            description: String::new(),
            ..potion_record()
        };
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&record, SPRITES, &host);
        assert!(out.success);
        assert!(matches!(out.errors[..], [ItemLoadError::MissingDescription]));
    }

    #[test]
    fn missing_surface_is_soft() {
        let mut host = MemoryHost::default();
        host.add_file("sprites/potion.png", png_bytes(1, 1));
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&potion_record(), SPRITES, &host);
        assert!(out.success);
        assert!(matches!(out.errors[..], [ItemLoadError::SurfaceNotFound(_)]));
        assert!(item.view().parent.is_none());
        assert!(item.view().image.is_some());
    }

    #[test]
    fn tampered_counts_abort_load() {
        let host = MemoryHost::with_canvas();
        let record = ItemData {
            number_of_items: 50,
            max_items_per_stack: 5,
            ..potion_record()
        };
        let mut item = InventoryItem::default();
        let out = item.load_from_data(&record, SPRITES, &host);
        assert!(!out.success);
        assert!(matches!(
            out.hard_error(),
            Some(ItemLoadError::CorruptRecord { .. })
        ));
        assert_eq!(item.quantity(), 0);
    }

    #[test]
    fn save_then_load_round_trip() {
        let mut original = InventoryItem::new("Rope");
        original.set_max_per_stack(20);
        original.set_quantity(12);
        original.set_display_quantity(true);
        original.set_equippable(true);
        original.set_cell(3, 1);
        let record = original.create_save_data(false).record;

        let mut restored = InventoryItem::default();
        let out = restored.load_from_data(&record, SPRITES, &MemoryHost::with_canvas());
        assert!(out.success);
        assert_eq!(restored.tag(), original.tag());
        assert_eq!(restored.quantity(), original.quantity());
        assert_eq!(restored.max_per_stack(), original.max_per_stack());
        assert_eq!(restored.stackable(), original.stackable());
        assert_eq!(restored.display_quantity(), original.display_quantity());
        assert_eq!(restored.equippable(), original.equippable());
        assert_eq!(
            (restored.row(), restored.col()),
            (original.row(), original.col())
        );
    }
}
