use bevy::prelude::*;
use std::sync::{Arc, Mutex};

/// 角色生命值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub hp: i32,
    pub max_hp: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self { hp: 20, max_hp: 20 }
    }
}

impl Stats {
    /// 受到伤害，返回是否死亡
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.hp = (self.hp - damage.max(0)).max(0);
        self.is_dead()
    }

    /// 恢复生命值，返回实际恢复量
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// 玩家属性，物品回调里也要改，所以共享持有
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerStats(Arc<Mutex<Stats>>);

impl PlayerStats {
    pub fn new(stats: Stats) -> Self {
        Self(Arc::new(Mutex::new(stats)))
    }

    /// 锁中毒时当作没有恢复
    pub fn heal(&self, amount: i32) -> i32 {
        self.0.lock().map(|mut s| s.heal(amount)).unwrap_or(0)
    }

    pub fn take_damage(&self, damage: i32) -> bool {
        self.0
            .lock()
            .map(|mut s| s.take_damage(damage))
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> Option<Stats> {
        self.0.lock().ok().map(|s| *s)
    }
}
