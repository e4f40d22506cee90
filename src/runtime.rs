//! Host animation-frame scheduling
//!
//! The engine never owns a frame loop. Hosts hand it a [`FrameScheduler`]
//! (`requestAnimationFrame` in a browser, a per-frame `tick` in a native UI
//! loop, or the deterministic [`ManualScheduler`] in tests and headless tools)
//! and animation runs yield back to it between frames.

use fxhash::FxHashMap;
use std::cell::{Cell, RefCell};

/// Callback run on the next frame with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Identifies a pending frame request so it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Animation-frame scheduler provided by the host.
///
/// Methods take `&self`: callbacks run from inside a frame routinely request
/// the next one, so implementations use interior mutability.
pub trait FrameScheduler {
    /// Queue `callback` for the next frame
    fn request(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a pending request; unknown or already-run handles are ignored
    fn cancel(&self, handle: FrameHandle);

    /// Current time in milliseconds on the same clock as frame timestamps
    fn now(&self) -> f64;
}

/// Pending callbacks in request order.
///
/// Shared by the bundled schedulers. A frame runs only the callbacks queued
/// before it started; anything requested while it runs waits for the next
/// frame, matching `requestAnimationFrame`.
#[derive(Default)]
struct FrameQueue {
    next_id: Cell<u64>,
    callbacks: RefCell<FxHashMap<u64, FrameCallback>>,
    order: RefCell<Vec<u64>>,
}

impl FrameQueue {
    fn request(&self, callback: FrameCallback) -> FrameHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.callbacks.borrow_mut().insert(id, callback);
        self.order.borrow_mut().push(id);
        FrameHandle(id)
    }

    fn cancel(&self, handle: FrameHandle) {
        if self.callbacks.borrow_mut().remove(&handle.0).is_some() {
            self.order.borrow_mut().retain(|id| *id != handle.0);
        }
    }

    fn run(&self, timestamp: f64) -> usize {
        let batch = std::mem::take(&mut *self.order.borrow_mut());
        let mut ran = 0;
        for id in batch {
            // Looked up one at a time: an earlier callback may cancel a later one.
            let callback = self.callbacks.borrow_mut().remove(&id);
            if let Some(callback) = callback {
                callback(timestamp);
                ran += 1;
            }
        }
        ran
    }

    fn pending(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

/// Deterministic scheduler driven by explicit timestamps
#[derive(Default)]
pub struct ManualScheduler {
    queue: FrameQueue,
    now: Cell<f64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame at the current time; returns how many callbacks ran
    pub fn run_frame(&self) -> usize {
        self.queue.run(self.now.get())
    }

    /// Moves the clock to `timestamp` (never backwards) and runs one frame
    pub fn advance_to(&self, timestamp: f64) -> usize {
        self.now.set(self.now.get().max(timestamp));
        self.run_frame()
    }

    /// Moves the clock forward by `delta_ms` and runs one frame
    pub fn advance_by(&self, delta_ms: f64) -> usize {
        self.advance_to(self.now.get() + delta_ms.max(0.0))
    }

    /// Runs frames `frame_ms` apart until nothing is pending or `max_frames` ran
    pub fn run_until_idle(&self, frame_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.pending() > 0 && frames < max_frames {
            self.advance_by(frame_ms);
            frames += 1;
        }
        frames
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&self, callback: FrameCallback) -> FrameHandle {
        self.queue.request(callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.cancel(handle)
    }

    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Wall-clock scheduler for native frame loops.
///
/// The host calls [`ClockScheduler::tick`] once per rendered frame; the
/// timestamp is the time since the scheduler was created.
pub struct ClockScheduler {
    queue: FrameQueue,
    started: instant::Instant,
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self {
            queue: FrameQueue::default(),
            started: instant::Instant::now(),
        }
    }

    /// Runs the pending frame callbacks; returns how many ran
    pub fn tick(&self) -> usize {
        self.queue.run(self.now())
    }

    /// Whether the host should keep rendering frames
    pub fn has_pending_frames(&self) -> bool {
        self.queue.pending() > 0
    }
}

impl Default for ClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ClockScheduler {
    fn request(&self, callback: FrameCallback) -> FrameHandle {
        self.queue.request(callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.cancel(handle)
    }

    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}
