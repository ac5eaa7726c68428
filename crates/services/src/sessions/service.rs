use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

use quiz_core::model::{OptionIndex, Outcome, QuestionId, SessionResult};

use super::plan::{SessionPlan, SessionQuestion};
use super::progress::SessionProgress;
use super::timers::{SessionTimers, TimerEvent, TimerKind};
use crate::error::SessionError;

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// What the UI shows right after an option is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub outcome: Outcome,
    /// Display position the user picked.
    pub selected: OptionIndex,
    /// Display position of the correct option, `None` when unkeyed.
    pub correct: Option<OptionIndex>,
    /// The auto-advance timer armed by this answer.
    pub auto_advance: TimerEvent,
}

/// Effect of delivering a timer event to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Stale, cancelled or irrelevant event.
    Ignored,
    Ticked { remaining: Duration },
    Advanced,
    Finished(SessionResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A running practice session.
///
/// Steps through a built plan one question at a time. Each question accepts a
/// single selection; the session finishes after the last question, when the
/// countdown runs out, or when `finish` is called.
pub struct PracticeSession {
    questions: Vec<SessionQuestion>,
    current: usize,
    selected: Option<OptionIndex>,
    correct: u32,
    wrong: u32,
    unkeyed: u32,
    started_at: DateTime<Utc>,
    remaining_time: Option<Duration>,
    result: Option<SessionResult>,
    exited: bool,
    timers: SessionTimers,
}

impl PracticeSession {
    /// Start stepping through `plan`, arming the countdown when it is timed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the plan has no questions.
    pub fn new(
        plan: SessionPlan,
        started_at: DateTime<Utc>,
        mut timers: SessionTimers,
    ) -> Result<Self, SessionError> {
        if plan.is_empty() {
            return Err(SessionError::Empty);
        }
        if plan.time_limit.is_some() {
            timers.arm(TimerKind::Tick);
        }

        Ok(Self {
            questions: plan.questions,
            current: 0,
            selected: None,
            correct: 0,
            wrong: 0,
            unkeyed: 0,
            started_at,
            remaining_time: plan.time_limit,
            result: None,
            exited: false,
            timers,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The question on screen, `None` once the session is over.
    #[must_use]
    pub fn current(&self) -> Option<&SessionQuestion> {
        if self.is_closed() {
            return None;
        }
        self.questions.get(self.current)
    }

    /// 1-based position of the current question and the session length.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        let total = self.questions.len();
        ((self.current + 1).min(total), total)
    }

    /// The option chosen for the current question, if any.
    #[must_use]
    pub fn selected(&self) -> Option<OptionIndex> {
        self.selected
    }

    #[must_use]
    pub fn remaining_time(&self) -> Option<Duration> {
        self.remaining_time
    }

    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Finished or exited.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.is_complete() || self.exited
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = usize::try_from(self.answered()).unwrap_or(usize::MAX);
        let remaining = if self.is_closed() {
            0
        } else {
            total.saturating_sub(self.current)
        };
        SessionProgress {
            total,
            answered,
            remaining,
            is_complete: self.is_complete(),
        }
    }

    /// The event the armed `kind` timer would deliver.
    #[must_use]
    pub fn pending_timer(&self, kind: TimerKind) -> Option<TimerEvent> {
        self.timers.pending(kind)
    }

    fn answered(&self) -> u32 {
        self.correct + self.wrong + self.unkeyed
    }

    /// Select the option shown at display position `selected`.
    ///
    /// Keyed questions grade to `Correct` or `Wrong`; unkeyed ones count as
    /// unkeyed and yield `Outcome::None`. Arms the auto-advance timer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is over and
    /// `SessionError::AlreadyAnswered` on a second selection.
    pub fn select(&mut self, selected: OptionIndex) -> Result<AnswerFeedback, SessionError> {
        let (question_id, outcome) = self.grade(selected)?;
        let correct = self
            .questions
            .get(self.current)
            .and_then(|question| question.display_correct);

        match outcome {
            Outcome::Correct => self.correct += 1,
            Outcome::Wrong => self.wrong += 1,
            Outcome::None | Outcome::ToggleStar => self.unkeyed += 1,
        }
        self.selected = Some(selected);
        let auto_advance = self.timers.arm(TimerKind::AutoAdvance);

        Ok(AnswerFeedback {
            question_id,
            outcome,
            selected,
            correct,
            auto_advance,
        })
    }

    /// Grade `selected` against the current question without recording it.
    ///
    /// # Errors
    ///
    /// Same as `select`.
    pub fn grade(&self, selected: OptionIndex) -> Result<(QuestionId, Outcome), SessionError> {
        if self.is_closed() {
            return Err(SessionError::Completed);
        }
        if self.selected.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::Completed)?;

        let outcome = match question.is_correct(selected) {
            Some(is_correct) => Outcome::graded(is_correct),
            None => Outcome::None,
        };
        Ok((question.id().clone(), outcome))
    }

    /// Same as `select`, from a raw display position.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` for positions outside `0..=3`,
    /// otherwise as `select`.
    pub fn select_position(&mut self, position: usize) -> Result<AnswerFeedback, SessionError> {
        let selected = OptionIndex::new(position)?;
        self.select(selected)
    }

    /// Move to the next question, finishing after the last one.
    ///
    /// Unanswered questions are skipped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is over.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<Option<SessionResult>, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Completed);
        }
        self.timers.cancel(TimerKind::AutoAdvance);
        self.selected = None;
        self.current += 1;

        if self.current >= self.questions.len() {
            return self.finish(now, false).map(Some);
        }
        Ok(None)
    }

    /// One countdown step. Reaching zero finishes the session as timed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is over.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TimerOutcome, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Completed);
        }
        let Some(remaining) = self.remaining_time else {
            return Ok(TimerOutcome::Ignored);
        };

        let remaining = remaining.saturating_sub(self.timers.settings().tick_period);
        self.remaining_time = Some(remaining);
        if remaining.is_zero() {
            log::info!("session countdown expired");
            return self.finish(now, true).map(TimerOutcome::Finished);
        }
        Ok(TimerOutcome::Ticked { remaining })
    }

    /// Apply a delivered timer event.
    ///
    /// # Errors
    ///
    /// Propagates errors from `tick` and `next`.
    pub fn handle_timer(
        &mut self,
        event: TimerEvent,
        now: DateTime<Utc>,
    ) -> Result<TimerOutcome, SessionError> {
        if self.is_closed() || !self.timers.is_current(event) {
            log::debug!("ignoring stale {:?} timer event", event.kind);
            return Ok(TimerOutcome::Ignored);
        }

        match event.kind {
            TimerKind::Tick => self.tick(now),
            TimerKind::AutoAdvance => Ok(match self.next(now)? {
                Some(result) => TimerOutcome::Finished(result),
                None => TimerOutcome::Advanced,
            }),
        }
    }

    /// End the session and produce its tally. Repeated calls return the
    /// first result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after `exit`, or
    /// `SessionError::Summary` if the counters are inconsistent.
    pub fn finish(
        &mut self,
        now: DateTime<Utc>,
        timed_out: bool,
    ) -> Result<SessionResult, SessionError> {
        if let Some(result) = self.result {
            return Ok(result);
        }
        if self.exited {
            return Err(SessionError::Completed);
        }
        self.timers.cancel_all();

        let elapsed = (now - self.started_at).num_seconds().max(0);
        let time_spent = u32::try_from(elapsed).unwrap_or(u32::MAX);
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let result = SessionResult::new(self.correct, self.wrong, self.unkeyed, total, time_spent)?
            .with_timed_out(timed_out);

        log::info!(
            "session finished: {}/{} correct, {} wrong, {} unkeyed, {}s",
            result.correct(),
            result.total(),
            result.wrong(),
            result.unkeyed(),
            result.time_spent()
        );
        self.result = Some(result);
        Ok(result)
    }

    /// Abandon the session without a result.
    pub fn exit(&mut self) {
        self.timers.cancel_all();
        if self.result.is_none() {
            self.exited = true;
        }
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("correct", &self.correct)
            .field("wrong", &self.wrong)
            .field("unkeyed", &self.unkeyed)
            .field("started_at", &self.started_at)
            .field("remaining_time", &self.remaining_time)
            .field("result", &self.result)
            .field("exited", &self.exited)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
