#![forbid(unsafe_code)]

//! Timers and frame-loop tokens.
//!
//! The runtime is single-threaded and cooperative. The two suspension
//! points of the application, fixed transition delays and per-frame
//! animation callbacks, are both owned here and driven explicitly by the
//! main loop calling [`Scheduler::advance`].
//!
//! One-shot timers fire in due order. Jobs scheduled while a batch is being
//! drained wait for the next `advance`, which mirrors host timer semantics
//! and keeps a zero-delay reschedule from starving the loop.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Identifier for a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

struct Timer {
    id: u64,
    due: Duration,
    job: Box<dyn FnOnce()>,
}

/// A cancellable token for a continuous redraw loop.
///
/// Held by the exact component that created it; `cleanup` must call
/// [`FrameHandle::cancel`] synchronously before returning. Once cancelled
/// the handle stays dead; re-entering a component requests a fresh one.
#[derive(Debug)]
pub struct FrameHandle {
    active: Rc<Cell<bool>>,
}

impl FrameHandle {
    /// Whether the loop may keep running.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Stop the loop. Idempotent.
    #[inline]
    pub fn cancel(&self) {
        self.active.set(false);
    }
}

/// Single-threaded timer and frame-token registry.
pub struct Scheduler {
    now: Duration,
    timers: Vec<Timer>,
    next_id: u64,
    frames: Vec<Rc<Cell<bool>>>,
}

/// Shared handle used across the router, components, and the main loop.
pub type SharedScheduler = Rc<std::cell::RefCell<Scheduler>>;

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            timers: Vec::new(),
            next_id: 0,
            frames: Vec::new(),
        }
    }

    /// Create a shared scheduler.
    pub fn shared() -> SharedScheduler {
        Rc::new(std::cell::RefCell::new(Self::new()))
    }

    /// Monotonic time accumulated through [`Scheduler::advance`].
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `job` to run once, `delay` from now.
    pub fn schedule_once(&mut self, delay: Duration, job: impl FnOnce() + 'static) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            job: Box::new(job),
        });
        TimerId(id)
    }

    /// Cancel a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id.0);
        before != self.timers.len()
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Register a new frame loop and hand out its token.
    pub fn request_frames(&mut self) -> FrameHandle {
        self.frames
            .retain(|f| Rc::strong_count(f) > 1 && f.get());
        let active = Rc::new(Cell::new(true));
        self.frames.push(Rc::clone(&active));
        FrameHandle { active }
    }

    /// Count of frame loops that are still live and uncancelled. Tests use
    /// this to assert that `cleanup` leaks nothing.
    pub fn active_frame_count(&mut self) -> usize {
        self.frames
            .retain(|f| Rc::strong_count(f) > 1 && f.get());
        self.frames.len()
    }

    /// Advance the clock by `dt` and detach every timer that has come due,
    /// sorted in due order. The caller runs the jobs.
    fn take_due(&mut self, dt: Duration) -> Vec<Timer> {
        self.now += dt;
        let now = self.now;
        let mut due: Vec<Timer> = Vec::new();
        let mut remaining: Vec<Timer> = Vec::new();
        for timer in self.timers.drain(..) {
            if timer.due <= now {
                due.push(timer);
            } else {
                remaining.push(timer);
            }
        }
        self.timers = remaining;
        due.sort_by_key(|t| (t.due, t.id));
        due
    }

    /// Advance time by `dt` and run every timer that has come due, in due
    /// order. Returns the number of jobs run.
    ///
    /// Use [`advance_shared`] when jobs hold a [`SharedScheduler`] handle of
    /// their own.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let due = self.take_due(dt);
        let count = due.len();
        for timer in due {
            (timer.job)();
        }
        count
    }
}

/// Drive a shared scheduler forward, releasing the borrow before jobs run so
/// jobs can reach back into the scheduler.
pub fn advance_shared(scheduler: &SharedScheduler, dt: Duration) -> usize {
    let due = scheduler.borrow_mut().take_due(dt);
    let count = due.len();
    for timer in due {
        (timer.job)();
    }
    count
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
