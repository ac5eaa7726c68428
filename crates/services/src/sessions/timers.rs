//! Cancellable session timers.
//!
//! A `TimerScheduler` spawns tokio tasks that push `TimerEvent`s into an
//! unbounded channel. The owner of the receiver feeds events back into the
//! session, which drops any event whose token no longer matches an armed timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant};

use crate::settings::SessionSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Repeating countdown tick.
    Tick,
    /// One-shot move to the next question.
    AutoAdvance,
}

/// Generation stamp identifying one arming of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub kind: TimerKind,
    pub token: TimerToken,
}

/// Cancels the task behind one scheduled timer.
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Spawns timer tasks on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct TimerScheduler {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerScheduler {
    /// Create a scheduler and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver `event` once after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn once(&self, event: TimerEvent, delay: Duration) -> TimerHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(event);
        });
        TimerHandle {
            abort: task.abort_handle(),
        }
    }

    /// Deliver `event` every `period`, starting one period from now.
    ///
    /// The task stops on its own once the receiver is dropped.
    #[must_use]
    pub fn repeating(&self, event: TimerEvent, period: Duration) -> TimerHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        TimerHandle {
            abort: task.abort_handle(),
        }
    }
}

#[derive(Debug)]
struct ArmedTimer {
    token: TimerToken,
    handle: Option<TimerHandle>,
}

impl ArmedTimer {
    fn cancel(self) {
        if let Some(handle) = self.handle {
            handle.cancel();
        }
    }
}

/// The tick and auto-advance timers owned by one session.
///
/// Without a scheduler, arming only issues tokens and the caller delivers
/// events itself.
#[derive(Debug)]
pub struct SessionTimers {
    scheduler: Option<TimerScheduler>,
    settings: SessionSettings,
    generation: u64,
    tick: Option<ArmedTimer>,
    auto_advance: Option<ArmedTimer>,
}

impl SessionTimers {
    #[must_use]
    pub fn manual() -> Self {
        Self {
            scheduler: None,
            settings: SessionSettings::default(),
            generation: 0,
            tick: None,
            auto_advance: None,
        }
    }

    #[must_use]
    pub fn with_scheduler(scheduler: TimerScheduler, settings: SessionSettings) -> Self {
        Self {
            scheduler: Some(scheduler),
            settings,
            generation: 0,
            tick: None,
            auto_advance: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<ArmedTimer> {
        match kind {
            TimerKind::Tick => &mut self.tick,
            TimerKind::AutoAdvance => &mut self.auto_advance,
        }
    }

    /// Arm `kind`, replacing and cancelling any previous arming.
    pub fn arm(&mut self, kind: TimerKind) -> TimerEvent {
        self.cancel(kind);
        self.generation += 1;
        let event = TimerEvent {
            kind,
            token: TimerToken(self.generation),
        };
        let handle = self.scheduler.as_ref().map(|scheduler| match kind {
            TimerKind::Tick => scheduler.repeating(event, self.settings.tick_period),
            TimerKind::AutoAdvance => scheduler.once(event, self.settings.auto_advance_delay),
        });
        *self.slot(kind) = Some(ArmedTimer {
            token: event.token,
            handle,
        });
        event
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(armed) = self.slot(kind).take() {
            armed.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel(TimerKind::Tick);
        self.cancel(TimerKind::AutoAdvance);
    }

    /// The event the currently armed `kind` timer would deliver.
    #[must_use]
    pub fn pending(&self, kind: TimerKind) -> Option<TimerEvent> {
        let armed = match kind {
            TimerKind::Tick => self.tick.as_ref(),
            TimerKind::AutoAdvance => self.auto_advance.as_ref(),
        }?;
        Some(TimerEvent {
            kind,
            token: armed.token,
        })
    }

    /// True when `event` belongs to a timer that is still armed.
    #[must_use]
    pub fn is_current(&self, event: TimerEvent) -> bool {
        self.pending(event.kind) == Some(event)
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
