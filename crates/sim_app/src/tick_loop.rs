//! Fixed-timestep tick loop.
//!
//! Drives the [`Scheduler`] at a target rate with sleep pacing. Stopping
//! the loop just means not requesting another tick; an in-flight tick
//! always runs to completion.

// scheduler_mut is not yet called from main() but is exercised by tests.
#![allow(dead_code)]

use std::time::{Duration, Instant};

use tracing::{info, warn};

use sim_ecs::{EntityStore, Scheduler};

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

/// Blocking fixed-timestep loop around a [`Scheduler`].
pub struct TickLoop {
    config: TickConfig,
    scheduler: Scheduler,
}

impl TickLoop {
    #[must_use]
    pub fn new(config: TickConfig, scheduler: Scheduler) -> Self {
        Self { config, scheduler }
    }

    /// The wrapped scheduler.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Run until `max_ticks` ticks have executed (or forever if 0).
    pub fn run(&mut self, store: &mut EntityStore) {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let dt_ms = tick_duration.as_secs_f64() * 1000.0;
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.scheduler.tick(store, dt_ms);

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.scheduler.tick_id(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
