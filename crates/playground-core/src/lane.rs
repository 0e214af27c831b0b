//! Ticketed analysis lanes shared by the single and compare arbiters.
//!
//! A lane holds one selection at a time. Every selection mints a fresh
//! ticket for its lane and spawns the analysis; when the analysis finishes,
//! its result is applied only if the ticket is still the lane's newest.
//! Ticket checks and renderer calls happen under the one state lock, so a
//! stale result can never be painted after a newer pending message.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use playground_config::CancelMode;
use serde::Serialize;
use tokio::sync::Notify;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::analysis::{Analysis, Analyzer};
use crate::effect::{Effect, Panel, Renderer};
use crate::error::CoreError;

/// Issuance order of a selection within its lane. `Ticket::NONE` means nothing issued yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    pub const NONE: Ticket = Ticket(0);

    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Ticket {
        Ticket(self.0 + 1)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What to do with analysis work that a newer selection has superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Let it finish; its result is dropped at commit time.
    #[default]
    Suppress,
    /// Abort the task as soon as it is superseded.
    Abort,
}

impl From<CancelMode> for CancelPolicy {
    fn from(mode: CancelMode) -> Self {
        match mode {
            CancelMode::Suppress => CancelPolicy::Suppress,
            CancelMode::Abort => CancelPolicy::Abort,
        }
    }
}

/// Counters over the lifetime of an arbiter.
///
/// Once settled: `issued == committed + discarded + cancelled + failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArbiterStats {
    pub issued: u64,
    pub committed: u64,
    /// Superseded results dropped at completion time.
    pub discarded: u64,
    /// Superseded tasks aborted before completing.
    pub cancelled: u64,
    pub failed: u64,
}

struct Lane {
    panel: Panel,
    ticket: Ticket,
    requested: Option<Agent>,
    committed: Option<Agent>,
    last_commit: Option<Ticket>,
    /// Current ticket, while its analysis is unresolved.
    pending: Option<Ticket>,
    inflight: Option<AbortHandle>,
}

impl Lane {
    fn new(panel: Panel) -> Self {
        Self {
            panel,
            ticket: Ticket::NONE,
            requested: None,
            committed: None,
            last_commit: None,
            pending: None,
            inflight: None,
        }
    }
}

pub(crate) struct LaneState {
    lanes: Vec<Lane>,
    stats: ArbiterStats,
}

impl LaneState {
    pub(crate) fn len(&self) -> usize {
        self.lanes.len()
    }

    pub(crate) fn requested(&self, lane: usize) -> Option<&Agent> {
        self.lanes[lane].requested.as_ref()
    }

    pub(crate) fn committed(&self, lane: usize) -> Option<&Agent> {
        self.lanes[lane].committed.as_ref()
    }

    pub(crate) fn ticket(&self, lane: usize) -> Ticket {
        self.lanes[lane].ticket
    }

    pub(crate) fn is_pending(&self, lane: usize) -> bool {
        self.lanes[lane].pending.is_some()
    }

    pub(crate) fn stats(&self) -> ArbiterStats {
        self.stats
    }

    /// Lane currently holding the agent with this id.
    pub(crate) fn find_requested(&self, agent_id: &str) -> Option<usize> {
        self.lanes
            .iter()
            .position(|l| l.requested.as_ref().is_some_and(|a| a.id == agent_id))
    }

    pub(crate) fn first_free(&self) -> Option<usize> {
        self.lanes.iter().position(|l| l.requested.is_none())
    }
}

struct Inner {
    state: Mutex<LaneState>,
    analyzer: Arc<dyn Analyzer>,
    renderer: Arc<dyn Renderer>,
    policy: CancelPolicy,
    /// Spawned analyses whose futures have not been dropped yet.
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Counts one spawned analysis until its future is dropped, whether it
/// ran to completion, was aborted, or panicked.
struct Outstanding(Arc<Inner>);

impl Outstanding {
    fn enter(inner: Arc<Inner>) -> Self {
        inner.outstanding.fetch_add(1, Ordering::AcqRel);
        Self(inner)
    }
}

impl Drop for Outstanding {
    fn drop(&mut self) {
        if self.0.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// A fixed set of lanes sharing one analyzer, one renderer and one lock.
pub(crate) struct LaneSet {
    inner: Arc<Inner>,
}

impl LaneSet {
    pub(crate) fn new(
        panels: Vec<Panel>,
        analyzer: Arc<dyn Analyzer>,
        renderer: Arc<dyn Renderer>,
        policy: CancelPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(LaneState {
                    lanes: panels.into_iter().map(Lane::new).collect(),
                    stats: ArbiterStats::default(),
                }),
                analyzer,
                renderer,
                policy,
                outstanding: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, LaneState> {
        self.inner.state.lock()
    }

    pub(crate) fn policy(&self) -> CancelPolicy {
        self.inner.policy
    }

    pub(crate) fn render(&self, panel: Panel, effect: Effect) {
        self.inner.renderer.render(panel, effect);
    }

    pub(crate) fn panel(&self, state: &LaneState, lane: usize) -> Panel {
        state.lanes[lane].panel
    }

    /// Make `agent` the lane's selection under a fresh ticket and start analyzing it.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn issue(&self, state: &mut LaneState, lane: usize, agent: Agent) -> Ticket {
        self.supersede(state, lane);

        let slot = &mut state.lanes[lane];
        let ticket = slot.ticket.next();
        slot.ticket = ticket;
        slot.pending = Some(ticket);
        slot.requested = Some(agent.clone());
        state.stats.issued += 1;

        self.inner
            .renderer
            .render(slot.panel, Effect::pending(agent.name.clone()));
        debug!(panel = %slot.panel, %ticket, agent = %agent.id, "analysis issued");

        let inner = Arc::clone(&self.inner);
        let guard = Outstanding::enter(Arc::clone(&self.inner));
        let task = tokio::spawn(async move {
            let _guard = guard;
            let outcome = inner.analyzer.analyze(&agent).await;
            inner.complete(lane, ticket, agent, outcome);
        });
        slot.inflight = Some(task.abort_handle());
        ticket
    }

    /// Empty the lane. Its pending analysis, if any, can no longer commit.
    pub(crate) fn vacate(&self, state: &mut LaneState, lane: usize) {
        self.supersede(state, lane);
        let slot = &mut state.lanes[lane];
        slot.ticket = slot.ticket.next();
        slot.requested = None;
        slot.committed = None;
        self.inner.renderer.render(slot.panel, Effect::ShowPlaceholder);
        debug!(panel = %slot.panel, ticket = %slot.ticket, "lane vacated");
    }

    fn supersede(&self, state: &mut LaneState, lane: usize) {
        let slot = &mut state.lanes[lane];
        let previous = slot.pending.take();
        let Some(handle) = slot.inflight.take() else {
            return;
        };
        match self.inner.policy {
            CancelPolicy::Abort => {
                handle.abort();
                if let Some(ticket) = previous {
                    state.stats.cancelled += 1;
                    debug!(panel = %slot.panel, %ticket, "superseded analysis aborted");
                }
            }
            CancelPolicy::Suppress => {}
        }
    }

    /// Wait until every analysis spawned so far, superseded or not, has finished.
    ///
    /// Also waits for analyses issued while it is waiting. Cancel safe: it
    /// holds no task handles, so dropping it changes nothing.
    pub(crate) async fn settle(&self) {
        loop {
            let idle = self.inner.idle.notified();
            tokio::pin!(idle);
            // Register before checking the count so a wakeup in between is not lost.
            idle.as_mut().enable();
            if self.inner.outstanding.load(Ordering::Acquire) == 0 {
                return;
            }
            idle.await;
        }
    }
}

impl Inner {
    fn complete(
        &self,
        lane: usize,
        ticket: Ticket,
        agent: Agent,
        outcome: Result<Analysis, CoreError>,
    ) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let slot = &mut state.lanes[lane];

        if slot.ticket != ticket || slot.last_commit == Some(ticket) {
            // Aborted work was already counted when it was superseded.
            if self.policy == CancelPolicy::Suppress {
                state.stats.discarded += 1;
            }
            debug!(
                panel = %slot.panel,
                %ticket,
                current = %slot.ticket,
                agent = %agent.id,
                "stale analysis discarded"
            );
            return;
        }

        slot.pending = None;
        match outcome {
            Ok(analysis) => {
                slot.last_commit = Some(ticket);
                self.renderer.render(
                    slot.panel,
                    Effect::ShowResult {
                        name: agent.name.clone(),
                        role: agent.role.clone(),
                        suggestion: analysis.suggestion,
                        color: agent.color.clone(),
                    },
                );
                debug!(panel = %slot.panel, %ticket, agent = %agent.id, "analysis committed");
                slot.committed = Some(agent);
                state.stats.committed += 1;
            }
            Err(e) => {
                warn!(panel = %slot.panel, %ticket, agent = %agent.id, error = %e, "analysis failed");
                self.renderer.render(
                    slot.panel,
                    Effect::ShowError {
                        message: e.to_string(),
                    },
                );
                state.stats.failed += 1;
            }
        }
    }
}
