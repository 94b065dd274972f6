//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::character::events::{ShowStats, TakeDamage};
use crate::core::{events::LogEvent, states::AppState};
use crate::inventory::components::Backpack;
use crate::item::InventoryItem;
use crate::inventory::events::{
    ListInventoryEvent, LoadInventoryEvent, SaveInventoryEvent, UseItemEvent,
};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 tag/uuid 查询
    Inventory,
    Use(usize),
    Save,
    Load,
    Stats,
    Hurt(i32),
    Unsupported(String),
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

#[allow(clippy::too_many_arguments)]
fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    backpack: Res<Backpack>,
    mut ev_use: EventWriter<UseItemEvent>,
    mut ev_list: EventWriter<ListInventoryEvent>,
    mut ev_save: EventWriter<SaveInventoryEvent>,
    mut ev_load: EventWriter<LoadInventoryEvent>,
    mut ev_stats: EventWriter<ShowStats>,
    mut ev_hurt: EventWriter<TakeDamage>,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(
                    "命令列表:
  help                   查看帮助
  status                 查看当前状态
  exit / quit            退出程序
  items                  列出背包物品及其 uuid
  items <token>          用 tag / uuid 查询单个物品
  inventory              查看物品栏
  use <index>            使用物品
  save                   存档
  load                   读档
  stats                  查看角色属性
  hurt <n>               受到 n 点伤害
  "
                    .into(),
                ));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Items: {}/{}",
                    state.get(),
                    backpack.len(),
                    backpack.capacity()
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Success);
            }

            Command::Items(token) => match token {
                None => {
                    for item in backpack.iter() {
                        log.write(LogEvent(format!(
                            "{} | {} | ×{}",
                            uuid_from_tag(item.tag()),
                            item.tag(),
                            item.quantity()
                        )));
                    }
                }
                Some(t) => {
                    let t_low = t.to_lowercase();
                    if let Some(item) = backpack.iter().find(|item| {
                        item.tag().eq_ignore_ascii_case(&t_low)
                            || uuid_from_tag(item.tag()).to_string() == t_low
                    }) {
                        log.write(LogEvent(describe_item(item)));
                    } else {
                        log.write(LogEvent("未找到匹配物品".into()));
                    }
                }
            },

            Command::Inventory => {
                ev_list.write(ListInventoryEvent);
            }

            Command::Use(index) => {
                ev_use.write(UseItemEvent { index });
            }

            Command::Save => {
                ev_save.write(SaveInventoryEvent);
            }

            Command::Load => {
                ev_load.write(LoadInventoryEvent);
            }

            Command::Stats => {
                ev_stats.write(ShowStats);
            }

            Command::Hurt(damage) => {
                ev_hurt.write(TakeDamage { damage });
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => {
            // tag 里可能有空格
            let rest = parts.collect::<Vec<_>>().join(" ");
            Command::Items((!rest.is_empty()).then_some(rest))
        }
        "inventory" | "inv" => Command::Inventory,
        "use" | "u" => {
            let idx = parts.next().unwrap_or("0").parse().unwrap_or(0);
            Command::Use(idx)
        }
        "save" => Command::Save,
        "load" => Command::Load,
        "stats" => Command::Stats,
        "hurt" => {
            let dmg = parts.next().unwrap_or("1").parse().unwrap_or(1);
            Command::Hurt(dmg)
        }
        other => Command::Unsupported(other.into()),
    }
}

fn describe_item(item: &InventoryItem) -> String {
    let view = item.view();
    let canvas = view
        .parent
        .as_ref()
        .map_or("-".to_string(), |s| format!("{}#{}", s.name(), s.id()));
    let sprite = view.image.as_ref().map_or("-".to_string(), |node| {
        format!(
            "{} ({}x{})",
            node.sprite.name,
            node.sprite.image.width(),
            node.sprite.image.height()
        )
    });
    format!(
        "==================================================
UUID  : {}
Tag   : {}
Desc  : {}
Count : {}/{}
Cell  : ({}, {})
Canvas: {canvas}
Sprite: {sprite}
Equip : {}
==================================================",
        uuid_from_tag(item.tag()),
        item.tag(),
        item.description(),
        item.quantity(),
        item.max_per_stack(),
        item.row(),
        item.col(),
        item.equippable()
    )
}

fn uuid_from_tag(tag: &str) -> Uuid {
    // 用固定 namespace + tag 字节生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, tag.as_bytes())
}
