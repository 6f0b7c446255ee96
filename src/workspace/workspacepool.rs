use std::ops::{
    Deref,
    DerefMut
};

use crate::configuration::QuadratureLimits;
use crate::objectwithuuid::ObjectWithUUID;
use crate::quadrature::integrationresult::IntegrationResult;
use crate::quadrature::substitution::{
    compose,
    Substitution
};
use crate::quadrature::tolerance::Tolerance;

use super::gkworkspace::GkWorkspace;
use super::gmworkspace::GmWorkspace;
use super::poolbackend::{
    MutexBackend,
    PoolBackend,
    RefCellBackend
};
use super::poolerror::PoolError;
use super::workspace::{
    PooledWorkspace,
    WorkspaceKind
};

// ─────────────────────────────────────────────────────────────────────────────
// WorkspaceHandle
// ─────────────────────────────────────────────────────────────────────────────

/// 從 pool 借出的 workspace。
///
/// 存活期間由呼叫端獨占；drop（或 `release_1d` / `release_nd`）時歸還 pool 並標記為閒置，
/// 記憶體不會被釋放。
pub struct WorkspaceHandle<'p, W, B>
where
    W: PooledWorkspace,
    B: PoolBackend,
{
    pool: &'p WorkspacePool<B>,
    workspace: Option<W>,
}

impl<'p, W, B> WorkspaceHandle<'p, W, B>
where
    W: PooledWorkspace,
    B: PoolBackend,
{
    fn new(pool: &'p WorkspacePool<B>, workspace: W) -> Self {
        WorkspaceHandle { pool, workspace: Some(workspace) }
    }

    pub fn kind(&self) -> WorkspaceKind {
        W::KIND
    }
}

impl<W, B> Deref for WorkspaceHandle<'_, W, B>
where
    W: PooledWorkspace,
    B: PoolBackend,
{
    type Target = W;

    fn deref(&self) -> &W {
        self.workspace.as_ref().expect("workspace is present until the handle is dropped")
    }
}

impl<W, B> DerefMut for WorkspaceHandle<'_, W, B>
where
    W: PooledWorkspace,
    B: PoolBackend,
{
    fn deref_mut(&mut self) -> &mut W {
        self.workspace.as_mut().expect("workspace is present until the handle is dropped")
    }
}

impl<W, B> Drop for WorkspaceHandle<'_, W, B>
where
    W: PooledWorkspace,
    B: PoolBackend,
{
    fn drop(&mut self) {
        if let Some(workspace) = self.workspace.take() {
            let id = *workspace.uuid();
            let was_in_use = self.pool.backend.with_slots(|slots| slots.checkin(workspace.into()));
            if !was_in_use {
                tracing::warn!(%id, "released a workspace that was not marked in use");
            }
            tracing::trace!(%id, kind = ?W::KIND, "workspace released");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WorkspacePool
// ─────────────────────────────────────────────────────────────────────────────
//
// 反覆呼叫積分時（例如對大量參數值逐一積分），每次配置 / 釋放區間陣列的成本不可忽略。
// pool 保留所有已配置的 workspace 與其「是否使用中」的旗標：
//   acquire：先找閒置且容量足夠的；找不到才新配置、登記並標記為使用中
//   release：只標記為閒置，不釋放記憶體
//
// pool 本身是一般物件，由呼叫端建立並以參考傳遞；B 決定是否可跨執行緒共享。

pub struct WorkspacePool<B: PoolBackend> {
    backend: B,
    limits: QuadratureLimits,
}

impl<B: PoolBackend> WorkspacePool<B> {
    fn new_with_backend(backend: B, limits: QuadratureLimits) -> Result<Self, PoolError> {
        if limits.gk_limit() == 0 {
            return Err(PoolError::InvalidLimit);
        }
        Ok(WorkspacePool { backend, limits })
    }

    pub fn limits(&self) -> &QuadratureLimits {
        &self.limits
    }

    /// 已配置的 workspace 總數。
    pub fn len(&self) -> usize {
        self.backend.with_slots(|slots| slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_use(&self) -> usize {
        self.backend.with_slots(|slots| slots.in_use())
    }

    pub fn idle(&self) -> usize {
        self.backend.with_slots(|slots| slots.len() - slots.in_use())
    }

    pub fn count_kind(&self, kind: WorkspaceKind) -> usize {
        self.backend.with_slots(|slots| slots.count_kind(kind))
    }

    // ── 一維 ────────────────────────────────────────────────────────────────

    pub fn acquire_1d(&self) -> WorkspaceHandle<'_, GkWorkspace, B> {
        let limit = self.limits.gk_limit();
        self.checkout_or_allocate(|w: &GkWorkspace| w.capacity() >= limit, || GkWorkspace::new(limit))
    }

    /// 取得容量至少為 `limit` 的 workspace。重複使用的 workspace 容量可能更大，
    /// 需要精確上限時請用 `GkWorkspace::integrate_with_limit`。
    pub fn acquire_1d_with_limit(&self, limit: usize) -> Result<WorkspaceHandle<'_, GkWorkspace, B>, PoolError> {
        if limit == 0 {
            return Err(PoolError::InvalidLimit);
        }
        Ok(self.checkout_or_allocate(|w: &GkWorkspace| w.capacity() >= limit, || GkWorkspace::new(limit)))
    }

    pub fn release_1d(&self, handle: WorkspaceHandle<'_, GkWorkspace, B>) {
        drop(handle);
    }

    // ── n 維 ────────────────────────────────────────────────────────────────

    pub fn acquire_nd(&self, dimension: usize) -> Result<WorkspaceHandle<'_, GmWorkspace, B>, PoolError> {
        let minpts = self.limits.gm_minpts();
        let maxpts = self.limits.gm_maxpts();
        let reused = self.backend.with_slots(|slots| {
            slots.checkout::<GmWorkspace, _>(|w| {
                w.dimension() == dimension && w.maxpts() >= maxpts
            })
        });
        if let Some(mut workspace) = reused {
            tracing::trace!(id = %workspace.uuid(), dimension, "reusing n-dimensional workspace");
            workspace.reset();
            return Ok(WorkspaceHandle::new(self, workspace));
        }

        let workspace = GmWorkspace::new(dimension, minpts, maxpts)?;
        tracing::debug!(id = %workspace.uuid(), dimension, "allocated n-dimensional workspace");
        self.backend.with_slots(|slots| slots.register_in_use(&workspace));
        Ok(WorkspaceHandle::new(self, workspace))
    }

    pub fn release_nd(&self, handle: WorkspaceHandle<'_, GmWorkspace, B>) {
        drop(handle);
    }

    fn checkout_or_allocate<P, A>(&self, accept: P, allocate: A) -> WorkspaceHandle<'_, GkWorkspace, B>
    where
        P: Fn(&GkWorkspace) -> bool,
        A: FnOnce() -> GkWorkspace,
    {
        if let Some(workspace) = self.backend.with_slots(|slots| slots.checkout(accept)) {
            tracing::trace!(id = %workspace.uuid(), "reusing workspace");
            return WorkspaceHandle::new(self, workspace);
        }

        // 配置在 lock 外進行
        let workspace = allocate();
        tracing::debug!(id = %workspace.uuid(), capacity = workspace.capacity(), "allocated workspace");
        self.backend.with_slots(|slots| slots.register_in_use(&workspace));
        WorkspaceHandle::new(self, workspace)
    }

    // ── 積分入口 ────────────────────────────────────────────────────────────

    pub fn integrate<F>(&self, f: F, a: f64, b: f64, epsabs: f64, epsrel: f64) -> IntegrationResult
    where
        F: Fn(f64) -> f64,
    {
        self.integrate_with(f, a, b, &Tolerance::new(epsabs, epsrel))
    }

    pub fn integrate_with<F>(&self, f: F, a: f64, b: f64, tolerance: &Tolerance) -> IntegrationResult
    where
        F: Fn(f64) -> f64,
    {
        let mut workspace = self.acquire_1d();
        workspace.integrate_with_limit(&f, a, b, tolerance, self.limits.gk_limit())
    }

    pub fn integrate_substituted<F, S>(
        &self,
        f: F,
        a: f64,
        b: f64,
        epsabs: f64,
        epsrel: f64,
        substitution: &S,
    ) -> IntegrationResult
    where
        F: Fn(f64) -> f64,
        S: Substitution + ?Sized,
    {
        let g = compose(&f, substitution);
        let tolerance = Tolerance::new(epsabs, epsrel);
        let mut workspace = self.acquire_1d();
        workspace.integrate_with_limit(
            &g,
            substitution.to_u(a),
            substitution.to_u(b),
            &tolerance,
            self.limits.gk_limit(),
        )
    }
}

impl<B: PoolBackend + Default> WorkspacePool<B> {
    pub fn from_configuration(limits: &QuadratureLimits) -> Result<Self, PoolError> {
        Self::new_with_backend(B::default(), *limits)
    }
}

/// 兩個 convenience constructor，分別對應兩種用途
impl WorkspacePool<RefCellBackend> {
    pub fn new() -> Self {
        WorkspacePool { backend: RefCellBackend::new(), limits: QuadratureLimits::default() }
    }

    pub fn with_limits(limits: QuadratureLimits) -> Result<Self, PoolError> {
        Self::new_with_backend(RefCellBackend::new(), limits)
    }
}

impl WorkspacePool<MutexBackend> {
    pub fn new_threadsafe() -> Self {
        WorkspacePool { backend: MutexBackend::new(), limits: QuadratureLimits::default() }
    }

    pub fn threadsafe_with_limits(limits: QuadratureLimits) -> Result<Self, PoolError> {
        Self::new_with_backend(MutexBackend::new(), limits)
    }
}

impl Default for WorkspacePool<RefCellBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WorkspacePool<MutexBackend> {
    fn default() -> Self {
        Self::new_threadsafe()
    }
}

// ── Type alias：對外只暴露這兩個名字 ─────────────────────────────────────────

pub type SingleThreadedWorkspacePool = WorkspacePool<RefCellBackend>;
pub type MultiThreadedWorkspacePool = WorkspacePool<MutexBackend>;
