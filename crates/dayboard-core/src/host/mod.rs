//! Rerun host.
//!
//! An [`App`] is a script that renders its whole view from a
//! [`SessionStore`] on every pass. User actions go to the app's callback
//! first, then exactly one render pass follows. A pass may ask for another
//! pass, either right away or after a delay; the delayed form is how the
//! countdown timer ticks without a timer primitive of its own.
//!
//! ```text
//! action -> handle() mutates store -> render() reads store -> Frame
//!                                        |
//!                                        +-- Rerun::After(d) -> sleep(d) -> render() ...
//! ```

mod context;

pub use context::{PassContext, Rendered, Rerun};

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::HostError;
use crate::events::Event;
use crate::session::{SessionId, SessionStore, Sessions};

/// Consecutive `Rerun::Immediate` requests tolerated before a pass is
/// considered stuck.
pub const MAX_IMMEDIATE_RERUNS: usize = 8;

/// A single-page application driven by full re-execution.
#[allow(async_fn_in_trait)]
pub trait App {
    /// Widget interactions that reach a callback.
    type Action: fmt::Debug;
    /// Everything one pass shows.
    type View: Serialize;

    fn name(&self) -> &'static str;

    /// Callback run before the next render pass. Its only effect is on
    /// `store`; errors are recorded there for the pass to show.
    async fn handle(&self, store: &mut SessionStore, action: Self::Action, ctx: &mut PassContext);

    /// One top-to-bottom pass.
    fn render(&self, store: &mut SessionStore, ctx: &mut PassContext) -> Rendered<Self::View>;
}

/// Result of one completed render pass.
#[derive(Debug, Clone, Serialize)]
pub struct Frame<V> {
    pub session: SessionId,
    pub pass: u64,
    pub view: V,
    pub rerun: Rerun,
    /// Events from the callback (if any) and the pass, in order.
    pub events: Vec<Event>,
}

pub struct Host<A, C = SystemClock> {
    app: A,
    clock: C,
    sessions: Sessions,
    passes: HashMap<SessionId, u64>,
}

impl<A: App> Host<A, SystemClock> {
    pub fn new(app: A) -> Self {
        Self::with_clock(app, SystemClock)
    }
}

impl<A: App, C: Clock> Host<A, C> {
    pub fn with_clock(app: A, clock: C) -> Self {
        Self {
            app,
            clock,
            sessions: Sessions::new(),
            passes: HashMap::new(),
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn open_session(&mut self) -> SessionId {
        let id = self.sessions.open();
        self.passes.insert(id, 0);
        info!(app = self.app.name(), session = %id, "app session started");
        id
    }

    pub fn end_session(&mut self, id: SessionId) -> bool {
        self.passes.remove(&id);
        self.sessions.end(id)
    }

    pub fn store(&self, id: SessionId) -> Option<&SessionStore> {
        self.sessions.get(id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Runs a render pass with no preceding callback, as on first visit.
    pub fn render(&mut self, id: SessionId) -> Result<Frame<A::View>, HostError> {
        self.run_pass(id, Vec::new())
    }

    /// Runs the callback for `action`, then one render pass.
    pub async fn dispatch(
        &mut self,
        id: SessionId,
        action: A::Action,
    ) -> Result<Frame<A::View>, HostError> {
        let upcoming = self
            .passes
            .get(&id)
            .map(|p| p + 1)
            .ok_or(HostError::UnknownSession(id))?;
        let store = self
            .sessions
            .get_mut(id)
            .ok_or(HostError::UnknownSession(id))?;

        debug!(app = self.app.name(), session = %id, ?action, "callback");
        let mut ctx = PassContext::new(&self.clock, upcoming);
        self.app.handle(store, action, &mut ctx).await;

        self.run_pass(id, ctx.into_events())
    }

    /// Keeps rendering while the latest frame asks for a delayed rerun,
    /// sleeping for the requested interval in between. `on_frame` sees every
    /// frame after `frame`; the last one is returned.
    pub async fn drive<F>(
        &mut self,
        mut frame: Frame<A::View>,
        mut on_frame: F,
    ) -> Result<Frame<A::View>, HostError>
    where
        F: FnMut(&Frame<A::View>),
    {
        while let Rerun::After(delay) = frame.rerun {
            tokio::time::sleep(delay).await;
            frame = self.render(frame.session)?;
            on_frame(&frame);
        }
        Ok(frame)
    }

    fn run_pass(
        &mut self,
        id: SessionId,
        mut events: Vec<Event>,
    ) -> Result<Frame<A::View>, HostError> {
        let mut immediate = 0;
        loop {
            let pass = {
                let counter = self
                    .passes
                    .get_mut(&id)
                    .ok_or(HostError::UnknownSession(id))?;
                *counter += 1;
                *counter
            };
            let store = self
                .sessions
                .get_mut(id)
                .ok_or(HostError::UnknownSession(id))?;

            let mut ctx = PassContext::new(&self.clock, pass);
            let rendered = self.app.render(store, &mut ctx);
            events.extend(ctx.into_events());
            debug!(app = self.app.name(), session = %id, pass, rerun = ?rendered.rerun, "render pass");

            if rendered.rerun == Rerun::Immediate {
                immediate += 1;
                if immediate > MAX_IMMEDIATE_RERUNS {
                    return Err(HostError::RerunLoop(immediate));
                }
                continue;
            }

            return Ok(Frame {
                session: id,
                pass,
                view: rendered.view,
                rerun: rendered.rerun,
                events,
            });
        }
    }
}
