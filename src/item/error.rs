use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("no {tag} left to use")]
    Exhausted { tag: String },
}

/// 读档错误
///
/// 软错误只记录、读档继续；硬错误（`CorruptRecord`、`FallbackExhausted`）直接中止。
#[derive(Debug, Error)]
pub enum ItemLoadError {
    #[error("No Canvas Found For Item (surface `{0}`)")]
    SurfaceNotFound(String),
    #[error("No description For Item")]
    MissingDescription,
    #[error("Corrupt record for item `{tag}`: {reason}")]
    CorruptRecord { tag: String, reason: String },
    #[error("Sprite Not Set To A Valid Image.")]
    EmptySpriteName,
    #[error("File not found: {}", .0.display())]
    AssetNotFound(PathBuf),
    #[error("Could not read {}: {source}", .path.display())]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(
        "This error was thrown when trying to load an image for the item. Please check that the \
         file extension is correct and that the file name is spelled correctly. If using your own \
         folder instead of the default location make sure that this folder exists."
    )]
    PrimaryAssetFailed,
    #[error("Unable to load error sprite {}: {cause}", .path.display())]
    FallbackExhausted {
        path: PathBuf,
        #[source]
        cause: Box<ItemLoadError>,
    },
}

impl ItemLoadError {
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            ItemLoadError::CorruptRecord { .. } | ItemLoadError::FallbackExhausted { .. }
        )
    }
}
