//! The session-scoped time-loop controller.
//!
//! [`TimeLoopController`] owns the ordered registry of rewindable actors
//! and decides, once per fixed tick, whether the session records or
//! rewinds. It never owns actors or physics; both are passed to
//! [`tick()`](TimeLoopController::tick) by the caller (normally
//! [`TimeLoopWorld`](crate::TimeLoopWorld)).
//!
//! # Tick sequence
//!
//! ```text
//! replace a non-finite or non-positive dt
//! derive max_frames and loop length (first tick only)
//! rewind_held?
//!   yes: registry order -> rewind_state
//!   no:  spawn order -> update, physics.integrate(dt),
//!        registry order -> record_state(max_frames),
//!        loop expired? registry order -> clear_history, tick = 0
//! time_scale = rewind_time_scale | 1.0
//! ```
//!
//! Every registered, live actor receives exactly one of record or
//! rewind per tick.
//!
//! # Loops
//!
//! With [`loop_seconds`](TimeLoopConfig::loop_seconds) set, the session
//! is split into loops of that length, counted in ticks. Rewinding steps
//! the loop clock back, so time spent rewinding is regained. A play tick
//! that reaches the end of the loop restarts it: every registered
//! history is cleared and the tick position returns to zero.

use std::time::Instant;

use indexmap::IndexSet;
use timeloop_actors::{StepContext, TickInput};
use timeloop_core::{ActorId, PhysicsWorld, TickId};

use crate::config::{max_frames_for, TimeLoopConfig};
use crate::metrics::{TickMode, TickReport};
use crate::table::ActorTable;

/// Drives record and rewind passes over registered actors.
pub struct TimeLoopController {
    config: TimeLoopConfig,
    registry: IndexSet<ActorId>,
    max_frames: Option<usize>,
    /// Ticks per loop, derived alongside `max_frames`.
    loop_frames: Option<usize>,
    /// Timestep `max_frames` was derived from.
    frames_dt: f64,
    /// Bits of the last unexpected timestep already warned about.
    warned_dt: Option<u64>,
    loops_completed: u64,
    rewinding: bool,
    time_scale: f64,
    current_tick: TickId,
    last_report: Option<TickReport>,
}

impl TimeLoopController {
    /// Create a controller. `max_frames` stays unknown until the first tick.
    pub fn new(config: TimeLoopConfig) -> Self {
        Self {
            config,
            registry: IndexSet::new(),
            max_frames: None,
            loop_frames: None,
            frames_dt: 0.0,
            warned_dt: None,
            loops_completed: 0,
            rewinding: false,
            time_scale: 1.0,
            current_tick: TickId(0),
            last_report: None,
        }
    }

    // ── Registration ───────────────────────────────────────────

    /// Add `id` to the end of the registry.
    ///
    /// Returns `false` (and keeps the original position) if it was
    /// already registered.
    pub fn register(&mut self, id: ActorId) -> bool {
        self.registry.insert(id)
    }

    /// Remove `id`, preserving the order of the remaining entries.
    ///
    /// Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ActorId) -> bool {
        self.registry.shift_remove(&id)
    }

    // ── Tick ───────────────────────────────────────────────────

    /// Run one fixed tick.
    ///
    /// A non-finite or non-positive `dt` is replaced by the timestep the
    /// history depth was derived from (`fixed_dt` before the first tick).
    pub fn tick(
        &mut self,
        dt: f64,
        input: TickInput,
        actors: &mut ActorTable,
        physics: &mut dyn PhysicsWorld,
    ) -> TickReport {
        let tick_start = Instant::now();
        let dt = self.effective_dt(dt);
        let max_frames = self.resolve_max_frames(dt);

        if input.rewind_held != self.rewinding {
            if input.rewind_held {
                tracing::debug!(tick = %self.current_tick, "rewind started");
            } else {
                tracing::debug!(tick = %self.current_tick, "rewind released");
            }
            self.rewinding = input.rewind_held;
        }

        let mut report = if self.rewinding {
            self.rewind_pass(actors, physics)
        } else {
            let mut report = self.record_pass(dt, input, max_frames, actors, physics);
            if self.loop_expired() {
                self.restart_loop(actors);
                report.loop_reset = true;
                report.tick = self.current_tick;
                report.deepest_history = 0;
            }
            report
        };

        self.time_scale = if self.rewinding {
            self.config.rewind_time_scale
        } else {
            1.0
        };

        report.elapsed_us = tick_start.elapsed().as_micros() as u64;
        self.last_report = Some(report.clone());
        report
    }

    /// The timestep this tick actually runs with.
    fn effective_dt(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            return dt;
        }
        let fallback = if self.max_frames.is_some() {
            self.frames_dt
        } else {
            self.config.fixed_dt
        };
        if self.warned_dt != Some(dt.to_bits()) {
            tracing::warn!(dt, fallback, "invalid tick dt; using fallback");
            self.warned_dt = Some(dt.to_bits());
        }
        fallback
    }

    /// Derive `max_frames` on the first tick; warn on later `dt` drift.
    ///
    /// `dt` is already finite and positive.
    fn resolve_max_frames(&mut self, dt: f64) -> usize {
        if let Some(frames) = self.max_frames {
            if dt != self.frames_dt && self.warned_dt != Some(dt.to_bits()) {
                tracing::warn!(
                    dt,
                    initial_dt = self.frames_dt,
                    max_frames = frames,
                    "tick dt differs from the one max_frames was derived from"
                );
                self.warned_dt = Some(dt.to_bits());
            }
            return frames;
        }

        let frames = max_frames_for(self.config.max_rewind_seconds, dt).max(1);
        self.loop_frames = self
            .config
            .loop_seconds
            .map(|seconds| max_frames_for(seconds, dt).max(1));
        tracing::debug!(
            max_rewind_seconds = self.config.max_rewind_seconds,
            dt,
            max_frames = frames,
            loop_frames = ?self.loop_frames,
            "history depth derived"
        );
        self.max_frames = Some(frames);
        self.frames_dt = dt;
        frames
    }

    fn loop_expired(&self) -> bool {
        self.loop_frames
            .is_some_and(|frames| self.current_tick.0 >= frames as u64)
    }

    /// Clear every registered history and return to tick 0.
    fn restart_loop(&mut self, actors: &mut ActorTable) {
        for &id in &self.registry {
            if let Some(actor) = actors.get_mut(id) {
                actor.clear_history();
            }
        }
        self.loops_completed += 1;
        tracing::debug!(
            tick = %self.current_tick,
            loops_completed = self.loops_completed,
            "loop restarted"
        );
        self.current_tick = TickId(0);
    }

    fn record_pass(
        &mut self,
        dt: f64,
        input: TickInput,
        max_frames: usize,
        actors: &mut ActorTable,
        physics: &mut dyn PhysicsWorld,
    ) -> TickReport {
        self.current_tick = TickId(self.current_tick.0 + 1);

        // 1. Behaviors, spawn order.
        for (_, actor) in actors.iter_mut() {
            let mut ctx = StepContext::new(&mut *physics, input, self.current_tick, dt);
            actor.update(&mut ctx);
        }

        // 2. External integration.
        physics.integrate(dt);

        // 3. Record, registry order.
        let mut report = TickReport {
            tick: self.current_tick,
            mode: TickMode::Record,
            ..Default::default()
        };
        for &id in &self.registry {
            let Some(actor) = actors.get_mut(id) else {
                continue;
            };
            actor.record_state(&*physics, max_frames);
            report.visited += 1;
            report.deepest_history = report.deepest_history.max(actor.history_len());
        }
        report
    }

    fn rewind_pass(
        &mut self,
        actors: &mut ActorTable,
        physics: &mut dyn PhysicsWorld,
    ) -> TickReport {
        let mut report = TickReport {
            mode: TickMode::Rewind,
            ..Default::default()
        };
        for &id in &self.registry {
            let Some(actor) = actors.get_mut(id) else {
                continue;
            };
            report.visited += 1;
            if actor.rewind_state(&mut *physics) {
                report.restored += 1;
            } else {
                tracing::trace!(actor = %id, name = actor.name(), "history exhausted");
                report.exhausted.push(id);
            }
            report.deepest_history = report.deepest_history.max(actor.history_len());
        }
        if report.restored > 0 {
            self.current_tick = TickId(self.current_tick.0.saturating_sub(1));
        }
        report.tick = self.current_tick;
        report
    }

    // ── Queries ────────────────────────────────────────────────

    /// Whether the most recent tick rewound.
    pub fn is_rewinding(&self) -> bool {
        self.rewinding
    }

    /// History depth, once derived by the first tick.
    pub fn max_frames(&self) -> Option<usize> {
        self.max_frames
    }

    /// Presentation time scale: `rewind_time_scale` while rewinding, else 1.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Registered ids in registration order.
    pub fn registered(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.registry.iter().copied()
    }

    /// Whether `id` is registered.
    pub fn is_registered(&self, id: ActorId) -> bool {
        self.registry.contains(&id)
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Current position in the loop: advances on record ticks, steps back
    /// on rewind ticks that restored anything.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Seconds left in the current loop, or `None` without a loop length.
    ///
    /// Before the first tick this is the configured loop length.
    pub fn remaining(&self) -> Option<f64> {
        let seconds = self.config.loop_seconds?;
        Some(match self.loop_frames {
            Some(frames) => {
                let left = frames.saturating_sub(self.current_tick.0 as usize);
                left as f64 * self.frames_dt
            }
            None => seconds,
        })
    }

    /// Number of loops that ran to completion and restarted.
    pub fn loops_completed(&self) -> u64 {
        self.loops_completed
    }

    /// Report from the most recent tick.
    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// The controller's configuration.
    pub fn config(&self) -> &TimeLoopConfig {
        &self.config
    }
}
