//! Prediction session: the caller-owned home of catalog, model and results.
//!
//! A run moves `Idle → Training → Inferring → Idle`, and a catalog load holds
//! the session in `Loading` while the provider is fetching. Only one of these
//! may be active per session; a second request is rejected rather than queued.
//! The phase is reset to `Idle` by a guard, so failures, cancellation and
//! panics all leave the session ready for the next request.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockwise_catalog::CatalogProvider;
use stockwise_core::{ProductRecord, RunId};

use crate::aggregate::aggregate;
use crate::buffer::BufferTracker;
use crate::cancel::CancellationToken;
use crate::config::PipelineConfig;
use crate::dataset::build_dataset;
use crate::error::AiError;
use crate::network::ReorderModel;
use crate::result::{PredictionResult, RunReport};
use crate::trainer::{TrainingHistory, train};

/// Where a session's current run is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Loading,
    Training,
    Inferring,
}

impl core::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            RunPhase::Idle => "idle",
            RunPhase::Loading => "loading",
            RunPhase::Training => "training",
            RunPhase::Inferring => "inferring",
        })
    }
}

#[derive(Debug, Default)]
struct SessionState {
    catalog: Vec<ProductRecord>,
    model: Option<ReorderModel>,
    results: Vec<PredictionResult>,
}

/// One user's prediction session.
///
/// `Send + Sync`: share it behind an `Arc` if several callers may trigger runs.
#[derive(Debug)]
pub struct PredictionSession {
    config: PipelineConfig,
    buffers: BufferTracker,
    phase: Mutex<RunPhase>,
    state: Mutex<SessionState>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the session out of `Idle` for the lifetime of a run or catalog load.
struct PhaseGuard<'a> {
    phase: &'a Mutex<RunPhase>,
}

impl<'a> PhaseGuard<'a> {
    /// Move from `Idle` to `next`, or report the phase that is in the way.
    ///
    /// The phase lock is released before this returns; long-running work
    /// never happens under it.
    fn enter(phase: &'a Mutex<RunPhase>, next: RunPhase) -> Result<Self, AiError> {
        let mut current = lock(phase);
        if *current != RunPhase::Idle {
            return Err(AiError::RunInProgress(*current));
        }
        *current = next;
        Ok(Self { phase })
    }

    fn advance(&self, next: RunPhase) {
        *lock(self.phase) = next;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *lock(self.phase) = RunPhase::Idle;
    }
}

impl PredictionSession {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            buffers: BufferTracker::new(),
            phase: Mutex::new(RunPhase::Idle),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        *lock(&self.phase)
    }

    /// Records currently loaded, in catalog order.
    pub fn catalog(&self) -> Vec<ProductRecord> {
        lock(&self.state).catalog.clone()
    }

    /// Results of the last successful run.
    pub fn results(&self) -> Vec<PredictionResult> {
        lock(&self.state).results.clone()
    }

    pub fn has_model(&self) -> bool {
        lock(&self.state).model.is_some()
    }

    /// Transient buffers still allocated (zero whenever no run is active).
    pub fn live_buffers(&self) -> usize {
        self.buffers.live()
    }

    /// Replace the catalog with whatever `provider` returns.
    ///
    /// On failure the session is left with no catalog, no model and no
    /// results: a failed fetch is terminal and nothing stale is kept around.
    ///
    /// The session reports `Loading` while `provider` is fetching; runs and
    /// other loads requested meanwhile are rejected with `RunInProgress`.
    pub fn load_catalog<P>(&self, provider: &P) -> Result<usize, AiError>
    where
        P: CatalogProvider + ?Sized,
    {
        let _guard = PhaseGuard::enter(&self.phase, RunPhase::Loading)?;

        let fetched = provider.fetch();
        let mut state = lock(&self.state);
        state.model = None;
        state.results.clear();

        match fetched {
            Ok(records) => {
                let count = records.len();
                state.catalog = records;
                info!(products = count, "catalog loaded");
                Ok(count)
            }
            Err(e) => {
                state.catalog.clear();
                warn!(error = %e, "catalog fetch failed");
                Err(e.into())
            }
        }
    }

    /// Train on the loaded catalog and predict every product.
    ///
    /// An empty catalog is a no-op: the report is empty, the trainer is not
    /// invoked and the session is `Idle` again when this returns.
    pub fn run(&self, cancel: &CancellationToken) -> Result<RunReport, AiError> {
        let run_id = RunId::new();
        let rule = self.config.rule;
        let started_at = Utc::now();

        let Some((guard, catalog)) = self.begin()? else {
            info!(%run_id, "catalog empty; prediction run skipped");
            return Ok(RunReport {
                run_id,
                rule,
                started_at,
                finished_at: Utc::now(),
                history: None,
                results: Vec::new(),
            });
        };

        info!(%run_id, %rule, products = catalog.len(), "prediction run started");

        match self.execute(&guard, &catalog, cancel) {
            Ok((model, history, results)) => {
                let mut state = lock(&self.state);
                state.model = Some(model);
                state.results = results.clone();
                drop(state);

                let report = RunReport {
                    run_id,
                    rule,
                    started_at,
                    finished_at: Utc::now(),
                    history: Some(history),
                    results,
                };
                info!(
                    %run_id,
                    reorders = report.reorder_count(),
                    products = report.results.len(),
                    "prediction run finished"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(%run_id, error = %e, "prediction run failed");
                Err(e)
            }
        }
    }

    /// Enter `Training` if the session is idle and has something to train on.
    ///
    /// Releases the previous model before the new run starts.
    fn begin(&self) -> Result<Option<(PhaseGuard<'_>, Vec<ProductRecord>)>, AiError> {
        let guard = PhaseGuard::enter(&self.phase, RunPhase::Training)?;

        let mut state = lock(&self.state);
        if state.catalog.is_empty() {
            // Dropping the guard puts the session straight back to `Idle`.
            return Ok(None);
        }

        state.model = None;
        state.results.clear();
        let catalog = state.catalog.clone();
        drop(state);

        Ok(Some((guard, catalog)))
    }

    fn execute(
        &self,
        guard: &PhaseGuard<'_>,
        catalog: &[ProductRecord],
        cancel: &CancellationToken,
    ) -> Result<(ReorderModel, TrainingHistory, Vec<PredictionResult>), AiError> {
        let rule = self.config.rule;

        let dataset = build_dataset(rule, catalog);
        let (model, history) = train(&dataset, &self.config.training, &self.buffers, cancel)?;

        cancel.check()?;
        guard.advance(RunPhase::Inferring);

        let results = aggregate(rule, catalog, &model, &self.buffers, cancel)?;
        Ok((model, history, results))
    }
}
