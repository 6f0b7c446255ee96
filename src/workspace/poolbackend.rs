use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{
    Mutex,
    PoisonError
};

use uuid::Uuid;

use crate::objectwithuuid::ObjectWithUUID;

use super::workspace::{
    PooledWorkspace,
    Workspace,
    WorkspaceKind
};

/// 每個 workspace 的狀態：閒置時 pool 持有本體；使用中時本體在 handle 裡，pool 只記得種類。
pub enum PoolSlot {
    Idle(Workspace),
    InUse(WorkspaceKind),
}

impl PoolSlot {
    pub fn kind(&self) -> WorkspaceKind {
        match self {
            PoolSlot::Idle(workspace) => workspace.kind(),
            PoolSlot::InUse(kind) => *kind,
        }
    }

    pub fn is_in_use(&self) -> bool {
        matches!(self, PoolSlot::InUse(_))
    }
}

/// workspace 身份 → 狀態 的對照表。
#[derive(Default)]
pub struct WorkspaceSlots {
    slots: HashMap<Uuid, PoolSlot>,
}

impl WorkspaceSlots {
    /// 取出第一個閒置且 `accept` 回傳 true 的 `W`，並標記為使用中。
    pub fn checkout<W, P>(&mut self, accept: P) -> Option<W>
    where
        W: PooledWorkspace,
        P: Fn(&W) -> bool,
    {
        let id = self.slots.iter().find_map(|(id, slot)| match slot {
            PoolSlot::Idle(workspace) => W::peek(workspace).filter(|w| accept(*w)).map(|_| *id),
            PoolSlot::InUse(_) => None,
        })?;

        let slot = self.slots.get_mut(&id)?;
        match std::mem::replace(slot, PoolSlot::InUse(W::KIND)) {
            PoolSlot::Idle(workspace) => match W::take(workspace) {
                Ok(w) => Some(w),
                Err(workspace) => {
                    *slot = PoolSlot::Idle(workspace);
                    None
                }
            },
            PoolSlot::InUse(kind) => {
                *slot = PoolSlot::InUse(kind);
                None
            }
        }
    }

    /// 登記一個新配置、已在使用中的 workspace。
    pub fn register_in_use<W: PooledWorkspace>(&mut self, workspace: &W) {
        self.slots.insert(*workspace.uuid(), PoolSlot::InUse(W::KIND));
    }

    /// 歸還 workspace，標記為閒置。回傳該 workspace 先前是否標記為使用中。
    pub fn checkin(&mut self, workspace: Workspace) -> bool {
        let id = *workspace.uuid();
        let previous = self.slots.insert(id, PoolSlot::Idle(workspace));
        previous.is_some_and(|slot| slot.is_in_use())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn in_use(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_in_use()).count()
    }

    pub fn count_kind(&self, kind: WorkspaceKind) -> usize {
        self.slots.values().filter(|slot| slot.kind() == kind).count()
    }

    pub fn is_in_use(&self, id: &Uuid) -> bool {
        self.slots.get(id).is_some_and(|slot| slot.is_in_use())
    }
}

/// 抽象 slot 表的存取方式；backend 決定 pool 是否可跨執行緒共享。
///
/// 閉包只在查表 / 改表時持有 borrow 或 lock，積分本身在外面執行，
/// 所以積分函數內部可以再向同一個 pool 取 workspace（巢狀積分）。
pub trait PoolBackend {
    fn with_slots<R>(&self, f: impl FnOnce(&mut WorkspaceSlots) -> R) -> R;
}

// ── 單執行緒版：RefCell ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct RefCellBackend {
    slots: RefCell<WorkspaceSlots>,
}

impl RefCellBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoolBackend for RefCellBackend {
    fn with_slots<R>(&self, f: impl FnOnce(&mut WorkspaceSlots) -> R) -> R {
        f(&mut self.slots.borrow_mut())
    }
}

// ── 多執行緒版：Mutex ────────────────────────────────────────────────────────
//
// 臨界區只有 HashMap 的查找與替換，不會在中途留下不一致的狀態，
// 所以 lock 被 poison 時直接取回內部資料繼續使用。

#[derive(Default)]
pub struct MutexBackend {
    slots: Mutex<WorkspaceSlots>,
}

impl MutexBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoolBackend for MutexBackend {
    fn with_slots<R>(&self, f: impl FnOnce(&mut WorkspaceSlots) -> R) -> R {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut slots)
    }
}
