use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{OptionIndex, PracticeMode, PracticeRange, QuestionId, SessionResult};
use storage::repository::Storage;

use super::plan::SessionBuilder;
use super::service::{AnswerFeedback, PracticeSession, TimerOutcome};
use super::timers::{SessionTimers, TimerEvent, TimerScheduler};
use crate::Clock;
use crate::error::SessionError;
use crate::ledger::ProgressService;
use crate::settings::SessionSettings;

/// Orchestrates session start and persisted answering.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    storage: Storage,
    ledger: ProgressService,
    settings: SessionSettings,
    scheduler: Option<TimerScheduler>,
    seed: Option<u64>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self {
            clock,
            ledger: ProgressService::new(clock, storage.clone()),
            storage,
            settings: SessionSettings::default(),
            scheduler: None,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Deliver timer events through `scheduler`. Without one, sessions only
    /// issue timer tokens and the caller feeds events back itself.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: TimerScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Seed the shuffles so that every session built by this service is
    /// reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    fn timers(&self) -> SessionTimers {
        match &self.scheduler {
            Some(scheduler) => SessionTimers::with_scheduler(scheduler.clone(), self.settings),
            None => SessionTimers::manual(),
        }
    }

    /// Start a new session over the stored questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when nothing is stored or the selection is
    /// empty, or `SessionError::Storage` if the blobs cannot be read.
    pub async fn start_session(
        &self,
        mode: PracticeMode,
        range: Option<&PracticeRange>,
    ) -> Result<PracticeSession, SessionError> {
        let questions = self.storage.questions().await?;
        if questions.is_empty() {
            log::info!("no stored questions; session not started");
            return Err(SessionError::Empty);
        }
        let progress = self.storage.progress().await?;

        let mut builder = SessionBuilder::new(mode);
        if let Some(range) = range {
            builder = builder.with_range(range);
        }
        let plan = builder.build(questions, &progress, &mut self.rng());
        if plan.is_empty() {
            log::info!("{mode:?} selection is empty; session not started");
            return Err(SessionError::Empty);
        }

        log::info!(
            "starting {mode:?} session with {} questions{}",
            plan.total(),
            plan.time_limit
                .map(|limit| format!(", {}s countdown", limit.as_secs()))
                .unwrap_or_default()
        );
        PracticeSession::new(plan, self.clock.now(), self.timers())
    }

    /// Select an option on the current question and persist the graded outcome.
    ///
    /// The outcome is written before the session records the selection, so a
    /// storage failure leaves the question unanswered and the call can be
    /// retried. Unkeyed answers are not written to the ledger.
    ///
    /// # Errors
    ///
    /// Returns the selection errors of `PracticeSession::select_position`, or
    /// `SessionError::Storage` if the outcome cannot be persisted.
    pub async fn answer_current(
        &self,
        session: &mut PracticeSession,
        position: usize,
    ) -> Result<AnswerFeedback, SessionError> {
        let selected = OptionIndex::new(position)?;
        let (question_id, outcome) = session.grade(selected)?;
        if outcome.is_graded() {
            self.ledger.record(&question_id, outcome).await?;
        }
        session.select(selected)
    }

    /// Flip the star flag for `id` and return the new state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if progress cannot be read or written.
    pub async fn toggle_star(&self, id: &QuestionId) -> Result<bool, SessionError> {
        let progress = self.ledger.toggle_star(id).await?;
        Ok(progress.get(id).is_some_and(|p| p.starred))
    }

    /// Move `session` to its next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is over.
    pub fn advance(
        &self,
        session: &mut PracticeSession,
    ) -> Result<Option<SessionResult>, SessionError> {
        session.next(self.clock.now())
    }

    /// Feed a received timer event into `session`.
    ///
    /// # Errors
    ///
    /// Propagates errors from `PracticeSession::handle_timer`.
    pub fn handle_timer(
        &self,
        session: &mut PracticeSession,
        event: TimerEvent,
    ) -> Result<TimerOutcome, SessionError> {
        session.handle_timer(event, self.clock.now())
    }

    /// End `session` early and return its tally.
    ///
    /// # Errors
    ///
    /// Propagates errors from `PracticeSession::finish`.
    pub fn finish(&self, session: &mut PracticeSession) -> Result<SessionResult, SessionError> {
        session.finish(self.clock.now(), false)
    }
}
