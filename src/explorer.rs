// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The coordinating thread's main loop: drain input, render if the
//! view changed, present, repeat.

use crate::config::Config;
use crate::context::RenderContext;
use crate::error::Result;
use crate::events::{command_for, Command, EventSource, InputEvent, PAN_STEP};
use crate::pool::{FrameOutcome, RenderPool};
use crate::present::{FrameSnapshot, Presenter};
use crate::view::{View, ViewState};

/// Owns the render context, the worker pool and the view.
pub struct Explorer {
    context: RenderContext,
    pool: RenderPool,
    state: ViewState,
}

impl Explorer {
    /// Builds the context and starts the pool at the default view.
    pub fn new(config: &Config) -> Result<Self> {
        let context = RenderContext::new(config)?;
        let pool = RenderPool::spawn(&context, context.shader())?;
        Ok(Explorer {
            context,
            pool,
            state: ViewState::default(),
        })
    }

    /// Applies one event to the view.  Returns false when the event
    /// asks to quit.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match command_for(event) {
            Some(Command::Quit) => return false,
            Some(Command::Zoom(factor)) => self.state.zoom(factor),
            Some(Command::Pan { dx, dy }) => {
                let step = PAN_STEP / self.state.view().scale;
                self.state.pan(dx * step, dy * step);
            }
            None => trace!("Ignoring {:?}", event),
        }
        true
    }

    /// Renders if the view is dirty, then presents the frame either way.
    pub fn step<P: Presenter>(&mut self, presenter: &mut P) -> Result<FrameOutcome> {
        let outcome = self.pool.render(&mut self.state)?;
        presenter.present(&self.pool.snapshot())?;
        Ok(outcome)
    }

    /// Runs until the event source asks to quit.  Every pending event is
    /// handled before each frame; the frame after the quit event is
    /// still rendered and presented.  Returns the final view.
    pub fn run<E: EventSource, P: Presenter>(
        &mut self,
        events: &mut E,
        presenter: &mut P,
    ) -> Result<View> {
        let mut done = false;
        while !done {
            while let Some(event) = events.poll() {
                if !self.handle(&event) {
                    done = true;
                }
            }
            self.step(presenter)?;
        }
        Ok(self.state.view())
    }

    /// The current view.
    pub fn view(&self) -> View {
        self.state.view()
    }

    /// Whether the next step will render.
    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// The last completed frame.
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        self.pool.snapshot()
    }

    /// The setup shared with the pool.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// The worker pool.
    pub fn pool(&self) -> &RenderPool {
        &self.pool
    }

    /// Stops and joins every worker.
    pub fn shutdown(self) {
        self.pool.shutdown();
    }
}
