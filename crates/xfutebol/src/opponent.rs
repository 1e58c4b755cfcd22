//! Automated opponent loop.
//!
//! The orchestrator plays one side of a session as a small state machine:
//!
//! ```text
//! Idle -> Proposing -> Executing -> WaitingBetweenActions -> Idle
//!   \          \            \
//!    Halted     Halted       Halted
//! ```
//!
//! It stops when the turn passes to the other side, the match ends, a goal
//! is scored (so the caller can present it before calling
//! [`OpponentOrchestrator::resume`]), the proposal source has nothing to
//! offer, or three consecutive proposals fail.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use derive_getters::Getters;
use derive_new::new;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::logger::LogSource;
use crate::service::GameService;
use crate::types::{Difficulty, OpponentProposal, Team};

/// Consecutive failed executions before the loop gives up.
pub const MAX_CONSECUTIVE_FAILURES: u8 = 3;

/// Default pause between automated actions.
pub const DEFAULT_PACING: Duration = Duration::from_millis(600);

/// Something that proposes actions for the automated side.
#[async_trait::async_trait]
pub trait ProposalSource: Send {
    /// Proposes the next action for `team`, or `None` when it has nothing.
    async fn propose(&mut self, service: &GameService, session_id: &str, team: Team) -> Option<OpponentProposal>;

    /// Display name.
    fn name(&self) -> &str;
}

/// Proposals from the engine's built-in decision policy.
#[derive(Debug, Clone)]
pub struct EngineBot {
    difficulty: Difficulty,
    name: String,
}

impl EngineBot {
    /// Creates a bot of the given strength.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            name: format!("Engine bot ({})", difficulty),
        }
    }
}

#[async_trait::async_trait]
impl ProposalSource for EngineBot {
    async fn propose(&mut self, service: &GameService, session_id: &str, _team: Team) -> Option<OpponentProposal> {
        service.get_opponent_action(session_id, self.difficulty)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HaltReason {
    /// The other side is on the move.
    TurnYielded,
    /// The match was already over.
    GameOver,
    /// The proposal source had nothing to offer.
    NoProposal,
    /// An executed action scored or ended the match.
    GoalOrGameOver,
    /// Too many consecutive failed executions.
    TooManyErrors,
    /// The session no longer exists.
    SessionNotFound,
    /// Stopped through a [`CancelHandle`].
    Cancelled,
}

/// Loop states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorState {
    /// Checking whether to act.
    Idle,
    /// Waiting for a proposal.
    Proposing,
    /// Executing a proposal.
    Executing(OpponentProposal),
    /// Pacing pause after an attempt.
    WaitingBetweenActions,
    /// Stopped.
    Halted(HaltReason),
}

/// Summary of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct OpponentReport {
    /// Why the run ended.
    halt: HaltReason,
    /// Successful executions.
    executed: u32,
    /// Executions attempted, successful or not.
    attempts: u32,
}

/// Cooperative stop signal, checked each time the loop is idle.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Requests a stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Plays one side of a session.
pub struct OpponentOrchestrator {
    service: GameService,
    session_id: String,
    team: Team,
    source: Box<dyn ProposalSource>,
    pacing: Duration,
    state: OrchestratorState,
    consecutive_failures: u8,
    cancel: CancelHandle,
}

impl std::fmt::Debug for OpponentOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpponentOrchestrator")
            .field("session_id", &self.session_id)
            .field("team", &self.team)
            .field("source", &self.source.name())
            .field("state", &self.state)
            .finish()
    }
}

impl OpponentOrchestrator {
    /// Creates an idle orchestrator playing `team`.
    pub fn new(
        service: GameService,
        session_id: impl Into<String>,
        team: Team,
        source: Box<dyn ProposalSource>,
    ) -> Self {
        Self {
            service,
            session_id: session_id.into(),
            team,
            source,
            pacing: DEFAULT_PACING,
            state: OrchestratorState::Idle,
            consecutive_failures: 0,
            cancel: CancelHandle::default(),
        }
    }

    /// Sets the pause between automated actions.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Current state.
    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    /// Side this orchestrator plays.
    pub fn team(&self) -> Team {
        self.team
    }

    /// A handle that stops the loop the next time it is idle.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Leaves a halt and runs again, with a fresh failure count.
    pub async fn resume(&mut self) -> OpponentReport {
        if let OrchestratorState::Halted(reason) = self.state {
            debug!(session_id = %self.session_id, %reason, "Resuming");
        }
        self.state = OrchestratorState::Idle;
        self.consecutive_failures = 0;
        self.run().await
    }

    /// Runs until the loop halts.
    ///
    /// A halted orchestrator returns its halt reason straight away; use
    /// [`resume`](Self::resume) to continue.
    #[instrument(skip(self), fields(session_id = %self.session_id, team = %self.team, source = %self.source.name()))]
    pub async fn run(&mut self) -> OpponentReport {
        let mut executed = 0;
        let mut attempts = 0;

        loop {
            let next = match std::mem::replace(&mut self.state, OrchestratorState::Idle) {
                OrchestratorState::Idle => self.check_idle(),
                OrchestratorState::Proposing => {
                    match self.source.propose(&self.service, &self.session_id, self.team).await {
                        Some(proposal) => {
                            self.service.log_from(
                                &self.session_id,
                                LogSource::Bot,
                                "PROPOSAL",
                                &format!("{} proposes {}", self.source.name(), proposal.kind),
                                Some(json!({
                                    "piece_id": proposal.piece_id,
                                    "action": proposal.kind.to_string(),
                                    "path": proposal.path,
                                })),
                            );
                            OrchestratorState::Executing(proposal)
                        }
                        None => OrchestratorState::Halted(HaltReason::NoProposal),
                    }
                }
                OrchestratorState::Executing(proposal) => {
                    if let Some(halt) = self.not_our_move() {
                        OrchestratorState::Halted(halt)
                    } else {
                        attempts += 1;
                        let outcome = self.service.execute(
                            &self.session_id,
                            &proposal.piece_id,
                            proposal.kind,
                            &proposal.path,
                        );
                        if outcome.success {
                            executed += 1;
                            self.consecutive_failures = 0;
                            if outcome.interrupts() {
                                OrchestratorState::Halted(HaltReason::GoalOrGameOver)
                            } else {
                                OrchestratorState::WaitingBetweenActions
                            }
                        } else {
                            self.consecutive_failures += 1;
                            warn!(
                                piece_id = %proposal.piece_id,
                                kind = %proposal.kind,
                                failures = self.consecutive_failures,
                                reason = %outcome.message,
                                "Proposal failed"
                            );
                            if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                                self.service.log_error_from(
                                    &self.session_id,
                                    LogSource::Bot,
                                    &format!(
                                        "Opponent stuck after {} consecutive failed actions",
                                        self.consecutive_failures
                                    ),
                                    Some(outcome.message),
                                );
                                OrchestratorState::Halted(HaltReason::TooManyErrors)
                            } else {
                                OrchestratorState::WaitingBetweenActions
                            }
                        }
                    }
                }
                OrchestratorState::WaitingBetweenActions => {
                    if !self.pacing.is_zero() {
                        tokio::time::sleep(self.pacing).await;
                    }
                    OrchestratorState::Idle
                }
                OrchestratorState::Halted(reason) => {
                    self.state = OrchestratorState::Halted(reason);
                    info!(%reason, executed, attempts, "Opponent halted");
                    self.service.log_from(
                        &self.session_id,
                        LogSource::Bot,
                        "HALTED",
                        &format!("{} stopped", self.source.name()),
                        Some(json!({
                            "reason": reason.to_string(),
                            "executed": executed,
                            "attempts": attempts,
                        })),
                    );
                    return OpponentReport::new(reason, executed, attempts);
                }
            };
            debug!(state = ?next, "Transition");
            self.state = next;
        }
    }

    fn check_idle(&self) -> OrchestratorState {
        if self.cancel.is_cancelled() {
            return OrchestratorState::Halted(HaltReason::Cancelled);
        }
        match self.not_our_move() {
            Some(halt) => OrchestratorState::Halted(halt),
            None => OrchestratorState::Proposing,
        }
    }

    /// The halt reason when this side may not act now.
    fn not_our_move(&self) -> Option<HaltReason> {
        if !self.service.session_exists(&self.session_id) {
            return Some(HaltReason::SessionNotFound);
        }
        if self.service.is_over(&self.session_id) {
            return Some(HaltReason::GameOver);
        }
        match self.service.current_turn(&self.session_id) {
            Some(team) if team == self.team => None,
            Some(_) => Some(HaltReason::TurnYielded),
            None => Some(HaltReason::SessionNotFound),
        }
    }
}
