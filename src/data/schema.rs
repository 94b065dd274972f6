use anyhow::Context;
use bevy::asset::Asset;
use bevy::math::Vec3;
use bevy::reflect::TypePath;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Vec3Data {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3Data> for Vec3 {
    fn from(v: Vec3Data) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// 单个物品的存档记录（扁平结构，字段名稳定）
///
/// 使用回调不会被存档。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemData {
    pub item_tag: String,
    pub description: String,
    pub display_number_of_items: bool,
    pub number_of_items: u32,
    pub max_items_per_stack: u32,
    pub is_stackable: bool,
    pub using_default_display: bool,
    pub sprite: String,
    pub image: String,
    pub row: i32,
    pub col: i32,
    pub canvas: String,
    pub position: Vec3Data,
    pub equippable_item: bool,
}

impl Default for ItemData {
    fn default() -> Self {
        Self {
            item_tag: String::new(),
            description: String::new(),
            display_number_of_items: false,
            number_of_items: 0,
            max_items_per_stack: 1,
            is_stackable: true,
            using_default_display: false,
            sprite: String::new(),
            image: String::new(),
            row: 0,
            col: 0,
            canvas: String::new(),
            position: Vec3Data::default(),
            equippable_item: false,
        }
    }
}

/// 整个背包的存档文件
#[derive(Asset, TypePath, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryData {
    pub using_default_display: bool,
    /// 精灵搜索路径，直接拼接文件名，通常以 `/` 结尾
    pub sprite_location: String,
    pub items: Vec<ItemData>,
}

impl InventoryData {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn read_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading save file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing save file {}", path.display()))
    }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("writing save file {}", path.display()))
    }
}
