//! 宿主能力面：显示面查找、文件读取、图像解码

use bevy::prelude::Resource;
use image::RgbaImage;
use std::io;
use std::path::Path;

/// 读档时物品向宿主索取的能力
pub trait ItemHost {
    fn find_display_surface(&self, name: &str) -> Option<SurfaceHandle>;
    fn file_exists(&self, path: &Path) -> bool;
    fn read_all_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn decode_image(&self, bytes: &[u8]) -> Result<ItemImage, image::ImageError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    id: u32,
    name: String,
}

impl SurfaceHandle {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// 显式注册的显示面，代替按名字全局查找
#[derive(Resource, Debug, Clone, Default)]
pub struct SurfaceRegistry {
    surfaces: Vec<SurfaceHandle>,
}

impl SurfaceRegistry {
    /// 同名重复注册返回已有句柄
    pub fn register(&mut self, name: impl Into<String>) -> SurfaceHandle {
        let name = name.into();
        if let Some(existing) = self.find(&name) {
            return existing;
        }
        let handle = SurfaceHandle {
            id: self.surfaces.len() as u32,
            name,
        };
        self.surfaces.push(handle.clone());
        handle
    }

    pub fn find(&self, name: &str) -> Option<SurfaceHandle> {
        self.surfaces.iter().find(|s| s.name == name).cloned()
    }
}

/// 解码后的 RGBA 图像
#[derive(Debug, Clone)]
pub struct ItemImage {
    pixels: RgbaImage,
}

impl ItemImage {
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let pixels = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// 基于本地文件系统的宿主
#[derive(Debug, Clone, Default)]
pub struct FsHost {
    surfaces: SurfaceRegistry,
}

impl FsHost {
    pub fn new(surfaces: SurfaceRegistry) -> Self {
        Self { surfaces }
    }
}

impl ItemHost for FsHost {
    fn find_display_surface(&self, name: &str) -> Option<SurfaceHandle> {
        self.surfaces.find(name)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_all_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn decode_image(&self, bytes: &[u8]) -> Result<ItemImage, image::ImageError> {
        ItemImage::decode(bytes)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::png_bytes;
    use super::*;

    #[test]
    fn registry_reuses_handles() {
        let mut registry = SurfaceRegistry::default();
        let canvas = registry.register("Canvas");
        let hud = registry.register("Hud");
        assert_ne!(canvas, hud);
        assert_eq!(registry.register("Canvas"), canvas);
        assert_eq!(registry.find("Hud"), Some(hud));
        assert_eq!(registry.find("Missing"), None);
    }

    #[test]
    fn decode_png() {
        let img = ItemImage::decode(&png_bytes(3, 2)).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert!(ItemImage::decode(b"not an image").is_err());
    }
}
