use anyhow::Context;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH: &str = "assets/config.toml";

/// 游戏配置（assets/config.toml），所有键均可省略
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 资产根目录，AssetServer 也从这里读
    pub asset_root: String,
    /// 相对资产根目录的存档路径
    pub save_file: String,
    /// 存档里没有写精灵路径时使用，直接与文件名拼接
    pub sprite_dir: String,
    pub sprite_extension: String,
    pub use_default_display: bool,
    pub backpack_capacity: usize,
    pub grid_columns: i32,
    pub potion: PotionConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PotionConfig {
    /// 挂上治疗回调的物品 tag
    pub tags: Vec<String>,
    pub heal: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_root: "assets".into(),
            save_file: "data/inventory.json".into(),
            sprite_dir: "assets/sprites/".into(),
            sprite_extension: ".png".into(),
            use_default_display: true,
            backpack_capacity: 30,
            grid_columns: 6,
            potion: PotionConfig::default(),
        }
    }
}

impl Default for PotionConfig {
    fn default() -> Self {
        Self {
            tags: vec!["Health Potion".into()],
            heal: 5,
        }
    }
}

impl GameConfig {
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("parsing game config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// 读不到或解析失败时退回默认值
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e:#}, using default config");
                Self::default()
            }
        }
    }

    /// AssetServer 的根目录跟着配置走，存档读写两边才对得上
    pub fn asset_plugin(&self) -> AssetPlugin {
        AssetPlugin {
            file_path: self.asset_root.clone(),
            ..default()
        }
    }

    /// 存档在磁盘上的实际位置
    pub fn save_path(&self) -> PathBuf {
        Path::new(&self.asset_root).join(&self.save_file)
    }
}
