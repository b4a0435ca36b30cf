//! Mount point for the one session an embedding owns
//!
//! Starting again while a session is mounted restarts it instead of
//! building a second game, so the highscore carries over. Restarts asked
//! for while the launcher is busy (from a host callback fired mid-step)
//! go through a [`RestartRequest`] and run once the step returns.

use std::cell::Cell;
use std::rc::Rc;

use crate::Session;

/// What a launch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    Created,
    Restarted,
}

/// Shared flag for a restart the launcher picks up after its current step
#[derive(Debug, Clone, Default)]
pub struct RestartRequest(Rc<Cell<bool>>);

impl RestartRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.set(true);
    }

    pub fn is_requested(&self) -> bool {
        self.0.get()
    }

    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

#[derive(Debug, Default)]
pub struct Launcher {
    session: Option<Session>,
    restart: RestartRequest,
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher that watches an existing request handle
    pub fn with_restart_request(restart: RestartRequest) -> Self {
        Self {
            session: None,
            restart,
        }
    }

    /// Handle for asking for a restart without borrowing the launcher
    pub fn restart_request(&self) -> RestartRequest {
        self.restart.clone()
    }

    /// Create the session on first use, restart it afterwards
    ///
    /// `build` only runs when nothing is mounted yet. A failed build leaves
    /// the launcher empty and ready to try again.
    pub fn launch<F, E>(&mut self, build: F) -> Result<Launch, E>
    where
        F: FnOnce() -> Result<Session, E>,
    {
        if self.restart() {
            return Ok(Launch::Restarted);
        }

        let session = build()?;
        self.session = Some(session);
        Ok(Launch::Created)
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Restart the mounted session now; false when nothing is mounted
    pub fn restart(&mut self) -> bool {
        self.restart.take();
        match self.session.as_mut() {
            Some(session) => {
                session.restart();
                true
            }
            None => false,
        }
    }

    /// Advance the mounted session, then run any restart asked for meanwhile
    pub fn step(&mut self, dt: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.step(dt);

        if self.restart.is_requested() {
            log::info!("Running deferred restart");
            self.restart();
        }
    }

    /// Tear down and drop the session
    pub fn unmount(&mut self) -> Option<Session> {
        let mut session = self.session.take()?;
        session.teardown();
        Some(session)
    }
}
