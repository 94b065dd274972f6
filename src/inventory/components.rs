use bevy::prelude::*;
use thiserror::Error;

use crate::core::resources::GameConfig;
use crate::data::schema::InventoryData;
use crate::item::{InventoryItem, ItemError, ItemHost, ItemLoadError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("backpack is full, {leftover} × {tag} did not fit")]
    Full { tag: String, leftover: u32 },
    #[error("slot {index} out of range (backpack holds {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("{leftover} × {tag} did not fit on the existing stack")]
    StackFull { tag: String, leftover: u32 },
    #[error("{tag} is already in the backpack")]
    DuplicateTag { tag: String },
    #[error("{tag} cannot be used")]
    NotUsable { tag: String },
    #[error(transparent)]
    Item(#[from] ItemError),
}

/// 使用一次物品的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// 回调成功，扣掉一个后还剩 `remaining`
    Consumed { remaining: u32 },
    /// 用完了，格子被清掉（其余物品位置不动）
    Depleted,
    /// 回调返回失败，物品保留
    Failed,
}

/// 一次整包读档的汇总
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    /// 硬错误导致没能恢复的物品
    pub skipped: Vec<String>,
    /// 超出容量或 tag 重复被丢弃的物品
    pub dropped: Vec<String>,
    pub errors: Vec<ItemLoadError>,
}

impl LoadReport {
    pub fn summary(&self) -> String {
        format!(
            "读档完成：恢复 {} 件，跳过 {} 件，丢弃 {} 件，{} 条错误",
            self.loaded,
            self.skipped.len(),
            self.dropped.len(),
            self.errors.len()
        )
    }
}

/// 玩家背包（挂在 Resource），格子按 `columns` 排成网格
#[derive(Resource, Debug)]
pub struct Backpack {
    slots: Vec<InventoryItem>,
    capacity: usize,
    columns: i32,
    using_default_display: bool,
}

impl Default for Backpack {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl Backpack {
    pub fn new(capacity: usize, columns: i32, using_default_display: bool) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            columns: columns.max(1),
            using_default_display,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.backpack_capacity,
            config.grid_columns,
            config.use_default_display,
        )
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn using_default_display(&self) -> bool {
        self.using_default_display
    }

    pub fn get(&self, index: usize) -> Option<&InventoryItem> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut InventoryItem> {
        self.slots.iter_mut()
    }

    pub fn find(&self, tag: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.tag() == tag)
    }

    /// 每个 tag 只占一格：同 tag 的可堆叠物品并入已有堆，放不下的部分作为错误返回
    pub fn add(&mut self, mut item: InventoryItem) -> Result<usize, InventoryError> {
        if let Some(index) = self.find(item.tag()) {
            let existing = &mut self.slots[index];
            if !(item.stackable() && existing.stackable()) {
                return Err(InventoryError::DuplicateTag {
                    tag: item.tag().to_string(),
                });
            }
            let overflow = existing.add_to_stack(item.quantity());
            if overflow > 0 {
                return Err(InventoryError::StackFull {
                    tag: item.tag().to_string(),
                    leftover: overflow,
                });
            }
            return Ok(index);
        }

        let Some((row, col)) = self.next_free_cell() else {
            return Err(InventoryError::Full {
                tag: item.tag().to_string(),
                leftover: item.quantity(),
            });
        };
        item.set_cell(row, col);
        self.slots.push(item);
        Ok(self.slots.len() - 1)
    }

    /// 先确认还有剩余，再调用物品的使用回调，成功才扣一个
    pub fn use_at(&mut self, index: usize) -> Result<UseOutcome, InventoryError> {
        let len = self.slots.len();
        let item = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::OutOfRange { index, len })?;

        if item.quantity() == 0 {
            return Err(ItemError::Exhausted {
                tag: item.tag().to_string(),
            }
            .into());
        }

        match item.invoke_on_use() {
            None => Err(InventoryError::NotUsable {
                tag: item.tag().to_string(),
            }),
            Some(false) => Ok(UseOutcome::Failed),
            Some(true) => {
                let remaining = item.use_item()?;
                if remaining > 0 {
                    return Ok(UseOutcome::Consumed { remaining });
                }
                self.slots.remove(index);
                Ok(UseOutcome::Depleted)
            }
        }
    }

    /// 每件物品的存档错误前面带上 tag
    pub fn to_save_data(&self, sprite_location: &str) -> (InventoryData, Vec<String>) {
        let mut errors = Vec::new();
        let items = self
            .slots
            .iter()
            .map(|item| {
                let outcome = item.create_save_data(self.using_default_display);
                errors.extend(
                    outcome
                        .errors
                        .into_iter()
                        .map(|e| format!("{}: {e}", item.tag())),
                );
                outcome.record
            })
            .collect();
        let data = InventoryData {
            using_default_display: self.using_default_display,
            sprite_location: sprite_location.to_string(),
            items,
        };
        (data, errors)
    }

    /// 清空后按存档重建；存档没写精灵路径时用配置里的
    pub fn restore<H: ItemHost + ?Sized>(
        &mut self,
        data: &InventoryData,
        config: &GameConfig,
        host: &H,
    ) -> LoadReport {
        let search_path = if data.sprite_location.is_empty() {
            config.sprite_dir.as_str()
        } else {
            data.sprite_location.as_str()
        };

        self.slots.clear();
        self.using_default_display = data.using_default_display;

        let mut report = LoadReport::default();
        for record in &data.items {
            let mut item = InventoryItem::default();
            item.set_sprite_file_extension(config.sprite_extension.as_str());
            let outcome = item.load_from_data(record, search_path, host);
            report.errors.extend(outcome.errors);
            if !outcome.success {
                warn!("skipping item `{}`", record.item_tag);
                report.skipped.push(record.item_tag.clone());
                continue;
            }
            if self.find(item.tag()).is_some() {
                warn!("duplicate tag, dropping `{}`", record.item_tag);
                report.dropped.push(record.item_tag.clone());
                continue;
            }
            if self.slots.len() >= self.capacity {
                warn!("backpack full, dropping `{}`", record.item_tag);
                report.dropped.push(record.item_tag.clone());
                continue;
            }
            self.slots.push(item);
            report.loaded += 1;
        }
        report
    }

    fn cell_of(&self, index: usize) -> (i32, i32) {
        let index = index as i32;
        (index / self.columns, index % self.columns)
    }

    /// 读档保留了存档里的格子位置，所以按行优先找第一个没人占的格子
    fn next_free_cell(&self) -> Option<(i32, i32)> {
        if self.slots.len() >= self.capacity {
            return None;
        }
        (0..self.capacity)
            .map(|index| self.cell_of(index))
            .find(|&(row, col)| {
                !self
                    .slots
                    .iter()
                    .any(|s| s.row() == row && s.col() == col)
            })
    }
}
