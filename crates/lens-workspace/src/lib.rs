//! Workspace manager
//!
//! Owns the process-wide cache of loaded solutions: at most one
//! `SolutionHandle` per normalized entry-point path. One asynchronous mutex
//! serializes every cache mutation (acquire-miss, apply, invalidate) and
//! the staleness check; the workload is one in-flight request at a time
//! over the stream transport, so serialized cache hits are acceptable.
//!
//! Staleness is time-gated: within the freshness window a cached handle is
//! trusted without touching the filesystem. Once the window elapses the
//! solution directory is scanned and any source file newer than the
//! handle's load timestamp forces a reload. Scan errors force a reload.

use lens_foundation::paths::normalize_path;
use lens_foundation::{LensError, LensResult};
use lens_semantic::{Compilation, Project, SemanticProvider, Solution};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A loaded, compiled solution. Immutable once installed; readers clone
/// the `Arc` and keep using it even across a concurrent invalidation.
#[derive(Debug)]
pub struct SolutionHandle {
    /// Normalized entry-point path
    pub path: PathBuf,
    /// Directory all displayed paths are made relative to
    pub directory: PathBuf,
    pub solution: Solution,
    pub loaded_at: SystemTime,
    /// Monotonically increasing load generation
    pub generation: u64,
}

struct CacheEntry {
    handle: Arc<SolutionHandle>,
    /// Only routinely-written field; mutated inside the cache mutex
    last_checked: Instant,
}

/// A borrowed view of one project inside a handle.
#[derive(Debug)]
pub struct ProjectHandle {
    pub handle: Arc<SolutionHandle>,
    index: usize,
}

impl ProjectHandle {
    pub fn project(&self) -> &Project {
        &self.handle.solution.projects[self.index]
    }

    pub fn compilation(&self) -> &Compilation {
        &self.project().compilation
    }
}

/// Post-apply action run under the same exclusive window as the publish.
#[derive(Debug, Clone)]
pub enum PostApply {
    RenameFile { from: PathBuf, to: PathBuf },
}

/// Process-wide solution cache.
pub struct SolutionCache {
    provider: Arc<dyn SemanticProvider>,
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
    staleness_window: Duration,
    generation: AtomicU64,
}

impl SolutionCache {
    pub fn new(provider: Arc<dyn SemanticProvider>, staleness_window: Duration) -> Self {
        Self {
            provider,
            entries: Mutex::new(HashMap::new()),
            staleness_window,
            generation: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &Arc<dyn SemanticProvider> {
        &self.provider
    }

    /// Return a fresh handle for the given solution / project path,
    /// loading or reloading as needed.
    pub async fn acquire(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> LensResult<Arc<SolutionHandle>> {
        let normalized = normalize_path(path);
        let mut entries = self.entries.lock().await;
        if cancel.is_cancelled() {
            return Err(LensError::cancelled());
        }

        if let Some(entry) = entries.get_mut(&normalized) {
            if entry.last_checked.elapsed() <= self.staleness_window {
                return Ok(entry.handle.clone());
            }
            match Self::scan_is_stale(&entry.handle).await {
                Ok(false) => {
                    entry.last_checked = Instant::now();
                    return Ok(entry.handle.clone());
                }
                Ok(true) => {
                    info!(solution = %normalized.display(), "Solution stale on disk, reloading");
                }
                Err(e) => {
                    warn!(
                        solution = %normalized.display(),
                        error = %e,
                        "Staleness scan failed, reloading conservatively"
                    );
                }
            }
        }

        let solution = self.provider.load_solution(&normalized).await?;
        if cancel.is_cancelled() {
            return Err(LensError::cancelled());
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = Arc::new(SolutionHandle {
            path: normalized.clone(),
            directory: solution.directory.clone(),
            solution,
            loaded_at: SystemTime::now(),
            generation,
        });
        debug!(
            solution = %normalized.display(),
            generation,
            "Installed solution handle"
        );
        // Replacement drops the prior entry before the new one goes in
        entries.remove(&normalized);
        entries.insert(
            normalized,
            CacheEntry {
                handle: handle.clone(),
                last_checked: Instant::now(),
            },
        );
        Ok(handle)
    }

    /// Pick the named project, or the first when no name is given.
    pub async fn project(
        &self,
        path: &Path,
        project_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> LensResult<ProjectHandle> {
        let handle = self.acquire(path, cancel).await?;
        let index = match project_name {
            Some(name) => handle
                .solution
                .projects
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| {
                    LensError::not_found(format!("no project named '{name}' in the solution"))
                })?,
            None => {
                if handle.solution.projects.is_empty() {
                    return Err(LensError::not_found("the solution contains no projects"));
                }
                0
            }
        };
        Ok(ProjectHandle { handle, index })
    }

    /// The named project's compilation (or the first project's).
    pub async fn compilation(
        &self,
        path: &Path,
        project_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> LensResult<ProjectHandle> {
        self.project(path, project_name, cancel).await
    }

    /// Publish a new solution value: write changed documents to disk, run
    /// the post action, and evict the handle so the next read reloads.
    /// The whole sequence runs under one exclusive window. If writing
    /// partially proceeded, the handle is still evicted so the next reload
    /// reflects whatever landed.
    pub async fn apply(
        &self,
        path: &Path,
        new_solution: &Solution,
        post: Option<PostApply>,
        cancel: &CancellationToken,
    ) -> LensResult<()> {
        let normalized = normalize_path(path);
        let mut entries = self.entries.lock().await;

        let current = entries.get(&normalized).ok_or_else(|| {
            LensError::conflict(format!(
                "solution {} is not loaded; nothing to apply against",
                normalized.display()
            ))
        })?;
        let current_handle = current.handle.clone();

        let result = Self::publish(&current_handle, new_solution, post, cancel).await;

        // Evict regardless of the publish outcome
        entries.remove(&normalized);
        info!(
            solution = %normalized.display(),
            ok = result.is_ok(),
            "Applied changes and evicted solution handle"
        );
        result
    }

    async fn publish(
        current: &SolutionHandle,
        new_solution: &Solution,
        post: Option<PostApply>,
        cancel: &CancellationToken,
    ) -> LensResult<()> {
        for document in new_solution.documents() {
            if cancel.is_cancelled() {
                return Err(LensError::cancelled());
            }
            let unchanged = current
                .solution
                .find_document(&document.path)
                .map(|d| d.text == document.text)
                .unwrap_or(false);
            if unchanged {
                continue;
            }
            tokio::fs::write(&document.path, &document.text)
                .await
                .map_err(|e| {
                    LensError::conflict(format!(
                        "workspace rejected update of {}: {}",
                        document.path.display(),
                        e
                    ))
                })?;
        }

        if let Some(PostApply::RenameFile { from, to }) = post {
            if from.exists() {
                tokio::fs::rename(&from, &to).await.map_err(|e| {
                    LensError::conflict(format!(
                        "cannot rename {} to {}: {}",
                        from.display(),
                        to.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Dispose and evict the handle for a path, if present.
    pub async fn invalidate(&self, path: &Path) {
        let normalized = normalize_path(path);
        if self.entries.lock().await.remove(&normalized).is_some() {
            debug!(solution = %normalized.display(), "Invalidated solution handle");
        }
    }

    /// Compare the newest source-file modification time under the solution
    /// directory against the handle's load timestamp.
    async fn scan_is_stale(handle: &Arc<SolutionHandle>) -> LensResult<bool> {
        let directory = handle.directory.clone();
        let loaded_at = handle.loaded_at;
        let extensions: HashSet<String> = handle
            .solution
            .documents()
            .filter_map(|d| d.path.extension())
            .map(|e| e.to_string_lossy().to_lowercase())
            .collect();

        tokio::task::spawn_blocking(move || {
            let mut newest: Option<SystemTime> = None;
            for entry in walkdir::WalkDir::new(&directory) {
                let entry = entry.map_err(|e| {
                    LensError::load_failed(format!(
                        "cannot scan {}: {}",
                        directory.display(),
                        e
                    ))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let matches = entry
                    .path()
                    .extension()
                    .map(|e| extensions.contains(&e.to_string_lossy().to_lowercase()))
                    .unwrap_or(false);
                if !matches {
                    continue;
                }
                let metadata = entry.metadata().map_err(|e| {
                    LensError::load_failed(format!(
                        "cannot stat {}: {}",
                        entry.path().display(),
                        e
                    ))
                })?;
                let modified = metadata.modified().map_err(|e| {
                    LensError::load_failed(format!(
                        "cannot stat {}: {}",
                        entry.path().display(),
                        e
                    ))
                })?;
                if newest.map(|n| modified > n).unwrap_or(true) {
                    newest = Some(modified);
                }
            }
            Ok(newest.map(|n| n > loaded_at).unwrap_or(false))
        })
        .await
        .map_err(|e| LensError::load_failed(format!("staleness scan aborted: {e}")))?
    }
}
