//! Drives a [`Session`] with a one-second tokio interval and publishes snapshots.
//!
//! The ticker only exists while the session is running. Pause, submit and reset
//! abort it; it also exits on its own when the session times out.

use crate::error::{HostError, HostResult};
use crate::session::{Session, SessionAction, SessionSnapshot, SessionState};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct SessionClock {
    session: Arc<Mutex<Session>>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
    ticker: Option<JoinHandle<()>>,
}

impl SessionClock {
    pub fn new(limit_seconds: u32) -> HostResult<Self> {
        let session = Session::new(limit_seconds)?;
        let (tx, _rx) = watch::channel(session.snapshot());
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            snapshots: Arc::new(tx),
            ticker: None,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    pub fn state(&self) -> SessionState {
        lock(&self.session).state()
    }

    /// Receives a snapshot after every transition and every tick.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// Fails with [`HostError::NoRuntime`] outside a tokio runtime.
    pub fn start(&mut self) -> HostResult<SessionSnapshot> {
        self.transition(SessionAction::Start)
    }

    pub fn pause(&mut self) -> HostResult<SessionSnapshot> {
        self.transition(SessionAction::Pause)
    }

    /// Fails with [`HostError::NoRuntime`] outside a tokio runtime.
    pub fn resume(&mut self) -> HostResult<SessionSnapshot> {
        self.transition(SessionAction::Resume)
    }

    pub fn submit(&mut self) -> HostResult<SessionSnapshot> {
        self.transition(SessionAction::Submit)
    }

    /// Stops the ticker and returns the session to ready with a full clock.
    /// An invalid limit leaves the session and its ticker untouched.
    pub fn reset(&mut self, limit_seconds: u32) -> HostResult<SessionSnapshot> {
        let fresh = Session::new(limit_seconds)?;
        self.stop_ticker();
        let snapshot = fresh.snapshot();
        *lock(&self.session) = fresh;
        self.snapshots.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn transition(&mut self, action: SessionAction) -> HostResult<SessionSnapshot> {
        // Resolved before the state changes so a missing runtime leaves it as it was.
        let runtime = match action {
            SessionAction::Start | SessionAction::Resume => {
                Some(Handle::try_current().map_err(|_| HostError::NoRuntime)?)
            }
            SessionAction::Pause | SessionAction::Submit => None,
        };
        let snapshot = {
            let mut session = lock(&self.session);
            session.apply(action)?;
            session.snapshot()
        };
        match runtime {
            Some(handle) if snapshot.state == SessionState::Running => self.spawn_ticker(&handle),
            _ => self.stop_ticker(),
        }
        self.snapshots.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    fn spawn_ticker(&mut self, runtime: &Handle) {
        self.stop_ticker();
        let session = Arc::clone(&self.session);
        let snapshots = Arc::clone(&self.snapshots);

        self.ticker = Some(runtime.spawn(async move {
            // First tick one full period after (re)start.
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            loop {
                interval.tick().await;
                let snapshot = {
                    let mut guard = lock(&session);
                    if guard.state() != SessionState::Running {
                        break;
                    }
                    guard.tick();
                    guard.snapshot()
                };
                let still_running = snapshot.state == SessionState::Running;
                snapshots.send_replace(snapshot);
                if !still_running {
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// A poisoned lock still holds a consistent session (every mutation is a single
/// field update), so recover the guard.
fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second() {
        let mut clock = SessionClock::new(10).unwrap();
        clock.start().unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(clock.snapshot().remaining_seconds, 7);
        assert!(clock.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticker() {
        let mut clock = SessionClock::new(10).unwrap();
        clock.start().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let paused = clock.pause().unwrap();
        assert_eq!(paused.remaining_seconds, 8);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(clock.snapshot().remaining_seconds, 8);
        assert!(!clock.is_ticking());
    }

    #[test]
    fn test_start_without_runtime_leaves_session_ready() {
        let mut clock = SessionClock::new(10).unwrap();
        assert!(matches!(clock.start(), Err(HostError::NoRuntime)));
        assert_eq!(clock.state(), SessionState::Ready);
        assert!(!clock.is_ticking());
    }

    #[test]
    fn test_resume_without_runtime_stays_paused() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let mut clock = SessionClock::new(10).unwrap();
        runtime.block_on(async {
            clock.start().unwrap();
            clock.pause().unwrap();
        });
        drop(runtime);

        assert!(matches!(clock.resume(), Err(HostError::NoRuntime)));
        assert_eq!(clock.state(), SessionState::Paused);
        assert!(clock.submit().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_reset_keeps_running_session() {
        let mut clock = SessionClock::new(10).unwrap();
        clock.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(matches!(clock.reset(0), Err(HostError::InvalidTimeLimit)));
        assert_eq!(clock.state(), SessionState::Running);
        assert!(clock.is_ticking());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(clock.snapshot().remaining_seconds, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_ticks() {
        let mut clock = SessionClock::new(5).unwrap();
        let mut rx = clock.subscribe();
        clock.start().unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().state, SessionState::Running);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().remaining_seconds, 4);
    }
}
