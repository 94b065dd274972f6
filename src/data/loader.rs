use bevy::asset::{AssetLoader, LoadContext, io::Reader};
use std::future::Future;
use thiserror::Error;

use super::schema::InventoryData;

/// 把 JSON 存档作为资产读进来
#[derive(Default)]
pub struct SaveFileLoader;

#[derive(Debug, Error)]
pub enum SaveFileLoaderError {
    #[error("Could not load save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse save file: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssetLoader for SaveFileLoader {
    type Asset = InventoryData;
    type Settings = ();
    type Error = SaveFileLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            Ok(serde_json::from_slice(&bytes)?)
        }
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
