use uuid::Uuid;

use crate::objectwithuuid::ObjectWithUUID;

use super::gkworkspace::GkWorkspace;
use super::gmworkspace::GmWorkspace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkspaceKind {
    OneDimensional,
    MultiDimensional,
}

/// pool 中存放的 workspace，以 tag 區分一維 / n 維。
pub enum Workspace {
    OneDimensional(GkWorkspace),
    MultiDimensional(GmWorkspace),
}

impl Workspace {
    pub fn kind(&self) -> WorkspaceKind {
        match self {
            Workspace::OneDimensional(_) => WorkspaceKind::OneDimensional,
            Workspace::MultiDimensional(_) => WorkspaceKind::MultiDimensional,
        }
    }
}

impl ObjectWithUUID for Workspace {
    fn uuid(&self) -> &Uuid {
        match self {
            Workspace::OneDimensional(w) => w.uuid(),
            Workspace::MultiDimensional(w) => w.uuid(),
        }
    }
}

impl From<GkWorkspace> for Workspace {
    fn from(workspace: GkWorkspace) -> Self {
        Workspace::OneDimensional(workspace)
    }
}

impl From<GmWorkspace> for Workspace {
    fn from(workspace: GmWorkspace) -> Self {
        Workspace::MultiDimensional(workspace)
    }
}

/// 可放進 pool 的 workspace 型別。
pub trait PooledWorkspace: ObjectWithUUID + Into<Workspace> + Sized {
    const KIND: WorkspaceKind;

    fn peek(workspace: &Workspace) -> Option<&Self>;

    /// 取出本體；種類不符時原封不動退回。
    fn take(workspace: Workspace) -> Result<Self, Workspace>;
}

impl PooledWorkspace for GkWorkspace {
    const KIND: WorkspaceKind = WorkspaceKind::OneDimensional;

    fn peek(workspace: &Workspace) -> Option<&Self> {
        match workspace {
            Workspace::OneDimensional(w) => Some(w),
            _ => None,
        }
    }

    fn take(workspace: Workspace) -> Result<Self, Workspace> {
        match workspace {
            Workspace::OneDimensional(w) => Ok(w),
            other => Err(other),
        }
    }
}

impl PooledWorkspace for GmWorkspace {
    const KIND: WorkspaceKind = WorkspaceKind::MultiDimensional;

    fn peek(workspace: &Workspace) -> Option<&Self> {
        match workspace {
            Workspace::MultiDimensional(w) => Some(w),
            _ => None,
        }
    }

    fn take(workspace: Workspace) -> Result<Self, Workspace> {
        match workspace {
            Workspace::MultiDimensional(w) => Ok(w),
            other => Err(other),
        }
    }
}
