//! 背包物品：数量/堆叠约束、使用回调槽、展示状态
//!
//! 存档（`create_save_data`）与读档（`load_from_data`）分别在 `save` / `load` 子模块。

mod error;
mod host;
mod load;
mod save;

pub use error::{ItemError, ItemLoadError};
pub use host::{FsHost, ItemHost, ItemImage, SurfaceHandle, SurfaceRegistry};
pub use load::{
    DEFAULT_SURFACE_NAME, ERROR_SPRITE_FILE, ERROR_SPRITE_NAME, ITEM_CLASSIFICATION, LoadOutcome,
};
pub use save::SaveOutcome;

#[cfg(test)]
pub(crate) use host::testing;

use bevy::math::{Vec2, Vec3};
use std::fmt;
use std::sync::Arc;

/// 没有单独配置扩展名时使用
pub const DEFAULT_SPRITE_EXTENSION: &str = ".png";

/// 背包格子里物品图像的尺寸
pub const VISUAL_FRAME_SIZE: Vec2 = Vec2::new(30.0, 30.0);

type UseFn = dyn FnMut() -> bool + Send + Sync;

/// 使用回调：返回 true 表示成功（应消耗一个），false 表示失败（保留物品）
pub struct UseAction(Box<UseFn>);

impl UseAction {
    pub fn new(f: impl FnMut() -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    fn call(&mut self) -> bool {
        (self.0)()
    }
}

impl fmt::Debug for UseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UseAction(..)")
    }
}

/// 已解码的精灵
#[derive(Debug, Clone)]
pub struct Sprite {
    pub name: String,
    pub image: Arc<ItemImage>,
}

/// 挂在物品上的图像节点，名字沿用物品 tag
#[derive(Debug, Clone)]
pub struct ImageNode {
    pub name: String,
    pub sprite: Sprite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualFrame {
    pub size: Vec2,
    pub anchor: Vec3,
    pub scale: Vec3,
}

/// 宿主侧的展示状态（本 crate 只记录，不渲染）
#[derive(Debug, Clone)]
pub struct ItemView {
    pub active: bool,
    pub parent: Option<SurfaceHandle>,
    pub frame: Option<VisualFrame>,
    pub image: Option<ImageNode>,
    pub classification: Option<String>,
}

impl Default for ItemView {
    fn default() -> Self {
        Self {
            active: true,
            parent: None,
            frame: None,
            image: None,
            classification: None,
        }
    }
}

/// 运行时物品
///
/// `quantity <= max_per_stack` 始终成立；不可堆叠的物品在设置数量时被强制为 1/1。
#[derive(Debug)]
pub struct InventoryItem {
    tag: String,
    description: String,
    display_quantity: bool,
    quantity: u32,
    max_per_stack: u32,
    stackable: bool,
    equippable: bool,
    position: Vec3,
    row: i32,
    col: i32,
    sprite: Option<Sprite>,
    sprite_file_extension: String,
    view: ItemView,
    on_use: Option<UseAction>,
}

impl Default for InventoryItem {
    fn default() -> Self {
        Self {
            tag: String::new(),
            description: String::new(),
            display_quantity: false,
            quantity: 0,
            max_per_stack: 1,
            stackable: true,
            equippable: false,
            position: Vec3::ZERO,
            row: 0,
            col: 0,
            sprite: None,
            sprite_file_extension: DEFAULT_SPRITE_EXTENSION.to_string(),
            view: ItemView::default(),
            on_use: None,
        }
    }
}

impl InventoryItem {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /* ---------------------------- 基本字段 ---------------------------- */

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn display_quantity(&self) -> bool {
        self.display_quantity
    }

    pub fn set_display_quantity(&mut self, display: bool) {
        self.display_quantity = display;
    }

    pub fn equippable(&self) -> bool {
        self.equippable
    }

    pub fn set_equippable(&mut self, equippable: bool) {
        self.equippable = equippable;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    pub fn col(&self) -> i32 {
        self.col
    }

    pub fn set_cell(&mut self, row: i32, col: i32) {
        self.row = row;
        self.col = col;
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    pub fn sprite_file_extension(&self) -> &str {
        &self.sprite_file_extension
    }

    /// 扩展名需带点，例如 `.png`
    pub fn set_sprite_file_extension(&mut self, extension: impl Into<String>) {
        self.sprite_file_extension = extension.into();
    }

    /* ---------------------------- 数量 / 堆叠 ---------------------------- */

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn max_per_stack(&self) -> u32 {
        self.max_per_stack
    }

    pub fn stackable(&self) -> bool {
        self.stackable
    }

    pub fn set_stackable(&mut self, stackable: bool) {
        self.stackable = stackable;
    }

    /// 超过上限时静默截断
    pub fn set_quantity(&mut self, value: u32) {
        self.quantity = value.min(self.max_per_stack);
        if !self.stackable {
            self.quantity = 1;
            self.max_per_stack = 1;
        }
    }

    /// 上限变小时当前数量会一起被截断
    pub fn set_max_per_stack(&mut self, value: u32) {
        self.max_per_stack = if self.stackable { value } else { 1 };
        self.quantity = self.quantity.min(self.max_per_stack);
    }

    pub fn set_to_max_stack_amount(&mut self) {
        self.quantity = self.max_per_stack;
    }

    /// 尽量并入 `amount` 个，返回放不下的数量
    pub fn add_to_stack(&mut self, amount: u32) -> u32 {
        if !self.stackable {
            return amount;
        }
        let taken = amount.min(self.max_per_stack.saturating_sub(self.quantity));
        self.quantity += taken;
        amount - taken
    }

    /// 消耗一个，返回剩余数量；已经为 0 时返回错误且数量保持 0
    pub fn consume_one(&mut self) -> Result<u32, ItemError> {
        if self.quantity == 0 {
            return Err(ItemError::Exhausted {
                tag: self.tag.clone(),
            });
        }
        self.quantity -= 1;
        Ok(self.quantity)
    }

    /// 物品的“使用”动作只负责扣数量，回调由背包层调用
    pub fn use_item(&mut self) -> Result<u32, ItemError> {
        self.consume_one()
    }

    /* ---------------------------- 使用回调槽 ---------------------------- */

    /// 替换掉已有的订阅者
    pub fn set_on_use(&mut self, f: impl FnMut() -> bool + Send + Sync + 'static) {
        self.on_use = Some(UseAction::new(f));
    }

    pub fn clear_on_use(&mut self) {
        self.on_use = None;
    }

    pub fn has_on_use(&self) -> bool {
        self.on_use.is_some()
    }

    /// 没有订阅者时返回 None
    pub fn invoke_on_use(&mut self) -> Option<bool> {
        self.on_use.as_mut().map(UseAction::call)
    }

    /* ---------------------------- 展示 ---------------------------- */

    pub fn view(&self) -> &ItemView {
        &self.view
    }

    pub fn set_active(&mut self, active: bool) {
        self.view.active = active;
    }

    pub fn set_parent_surface(&mut self, surface: SurfaceHandle) {
        self.view.parent = Some(surface);
    }

    pub fn position_visual_frame(&mut self, size: Vec2, anchor: Vec3) {
        self.view.frame = Some(VisualFrame {
            size,
            anchor,
            scale: Vec3::ONE,
        });
    }

    pub fn attach_visual(&mut self, sprite: Sprite) {
        self.view.image = Some(ImageNode {
            name: self.tag.clone(),
            sprite: sprite.clone(),
        });
        self.sprite = Some(sprite);
    }

    pub fn set_classification_tag(&mut self, tag: impl Into<String>) {
        self.view.classification = Some(tag.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn stack(max: u32) -> InventoryItem {
        let mut item = InventoryItem::new("Arrow");
        item.set_max_per_stack(max);
        item
    }

    #[test]
    fn set_quantity_clamps_to_cap() {
        let mut item = stack(5);
        item.set_quantity(10);
        assert_eq!(item.quantity(), 5);
        item.set_quantity(3);
        assert_eq!(item.quantity(), 3);
        for v in [0, 1, 4, 5, 6, u32::MAX] {
            item.set_quantity(v);
            assert_eq!(item.quantity(), v.min(5));
        }
    }

    #[test]
    fn non_stackable_is_forced_to_one() {
        let mut item = stack(5);
        item.set_stackable(false);
        item.set_quantity(3);
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.max_per_stack(), 1);

        item.set_max_per_stack(20);
        assert_eq!(item.max_per_stack(), 1);
    }

    #[test]
    fn lowering_cap_reclamps_quantity() {
        let mut item = stack(10);
        item.set_quantity(8);
        item.set_max_per_stack(4);
        assert_eq!(item.quantity(), 4);
    }

    #[test]
    fn max_stack_amount() {
        let mut item = stack(7);
        item.set_quantity(2);
        item.set_to_max_stack_amount();
        assert_eq!(item.quantity(), item.max_per_stack());
    }

    #[test]
    fn consume_one_stops_at_zero() {
        let mut item = stack(2);
        item.set_quantity(1);
        assert_eq!(item.use_item(), Ok(0));
        assert_eq!(
            item.consume_one(),
            Err(ItemError::Exhausted {
                tag: "Arrow".into()
            })
        );
        assert_eq!(item.quantity(), 0);
    }

    #[test]
    fn add_to_stack_reports_overflow() {
        let mut item = stack(10);
        item.set_quantity(7);
        assert_eq!(item.add_to_stack(5), 2);
        assert_eq!(item.quantity(), 10);

        item.set_stackable(false);
        assert_eq!(item.add_to_stack(3), 3);
    }

    #[test]
    fn use_slot_holds_a_single_subscriber() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut item = InventoryItem::new("Potion");
        assert_eq!(item.invoke_on_use(), None);

        item.set_on_use(|| false);
        let counter = calls.clone();
        item.set_on_use(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        assert_eq!(item.invoke_on_use(), Some(true));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        item.clear_on_use();
        assert!(!item.has_on_use());
    }
}
