//! Cooperative tick scheduler.
//!
//! All combat logic runs as [`Task`]s driven by a single-threaded pulse. A
//! task never blocks; it does a small slice of work against the shared world
//! and yields. Within one tick, due tasks execute in submission order, and a
//! task spawned during a pulse can never run before the following tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::CombatContext;

/// Whether a task wants to keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Continue,
    Stop,
}

/// Re-scheduling policy after a task executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    EveryTick,
    /// Every `n` ticks. `Every(1)` is equivalent to `EveryTick`.
    Every(u64),
}

impl Repeat {
    fn interval(self) -> Option<u64> {
        match self {
            Repeat::Once => None,
            Repeat::EveryTick => Some(1),
            Repeat::Every(n) => Some(n.max(1)),
        }
    }
}

/// A unit of scheduled combat work.
pub trait Task: Send {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState;
}

/// Cancellation handle for a scheduled task.
///
/// Cancellation is observed at the task's next due tick; an already-executing
/// task finishes its current slice. Handles are cheap to clone and safe to
/// hold after the task finished.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

pub(crate) struct Scheduled {
    pub(crate) countdown: u64,
    pub(crate) repeat: Repeat,
    pub(crate) handle: TaskHandle,
    pub(crate) task: Box<dyn Task>,
}

impl Scheduled {
    pub(crate) fn new(delay: u64, repeat: Repeat, task: Box<dyn Task>) -> Self {
        Self {
            // Zero-delay submissions still wait for the next pulse.
            countdown: delay.max(1),
            repeat,
            handle: TaskHandle::new(),
            task,
        }
    }
}

/// Holds pending tasks between pulses. The engine drives the actual pulse so
/// tasks can borrow the world mutably while the queue is detached.
#[derive(Default)]
pub struct TickScheduler {
    tasks: Vec<Scheduled>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a task to run after `delay` ticks.
    pub fn schedule(&mut self, delay: u64, repeat: Repeat, task: impl Task + 'static) -> TaskHandle {
        let entry = Scheduled::new(delay, repeat, Box::new(task));
        let handle = entry.handle.clone();
        self.tasks.push(entry);
        handle
    }

    pub(crate) fn push(&mut self, entry: Scheduled) {
        self.tasks.push(entry);
    }

    /// Detach the queue for one pulse.
    pub(crate) fn take_tasks(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.tasks)
    }

    /// Reattach survivors after a pulse, keeping tasks spawned mid-pulse
    /// behind them.
    pub(crate) fn restore_tasks(&mut self, mut survivors: Vec<Scheduled>) {
        survivors.append(&mut self.tasks);
        self.tasks = survivors;
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub(crate) fn advance(entry: &mut Scheduled) -> bool {
    entry.countdown = entry.countdown.saturating_sub(1);
    entry.countdown == 0
}

pub(crate) fn requeue(entry: &mut Scheduled) -> bool {
    match entry.repeat.interval() {
        Some(interval) => {
            entry.countdown = interval;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use combat_core::config::CombatConfig;

    use combat_content::zones::OpenWorldRules;

    use crate::engine::CombatEngine;

    struct RecordTask {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Task for RecordTask {
        fn execute(&mut self, _ctx: &mut CombatContext<'_>) -> TaskState {
            self.log.lock().unwrap().push(self.name);
            TaskState::Continue
        }
    }

    struct SpawnOnce {
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Task for SpawnOnce {
        fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
            self.log.lock().unwrap().push("spawner");
            ctx.spawn_task(
                1,
                Repeat::Once,
                RecordTask {
                    name: "child",
                    log: self.log.clone(),
                },
            );
            TaskState::Stop
        }
    }

    fn engine() -> CombatEngine {
        CombatEngine::new(CombatConfig::new(), Arc::new(OpenWorldRules::new()), 5)
    }

    #[test]
    fn same_tick_tasks_run_in_submission_order() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        engine.run(|ctx| {
            ctx.spawn_task(
                1,
                Repeat::EveryTick,
                RecordTask {
                    name: "first",
                    log: log.clone(),
                },
            );
            ctx.spawn_task(
                1,
                Repeat::EveryTick,
                RecordTask {
                    name: "second",
                    log: log.clone(),
                },
            );
        });
        engine.tick();
        engine.tick();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );
    }

    #[test]
    fn cancelled_task_never_executes_again() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        let handle = engine.run(|ctx| {
            ctx.spawn_task(
                1,
                Repeat::EveryTick,
                RecordTask {
                    name: "ticker",
                    log: log.clone(),
                },
            )
        });
        engine.tick();
        handle.cancel();
        engine.tick();
        engine.tick();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn a_task_spawned_mid_pulse_waits_for_the_next_tick() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        engine.run(|ctx| {
            ctx.spawn_task(1, Repeat::Once, SpawnOnce { log: log.clone() });
        });
        engine.tick();
        assert_eq!(*log.lock().unwrap(), vec!["spawner"]);
        engine.tick();
        assert_eq!(*log.lock().unwrap(), vec!["spawner", "child"]);
    }
}
