use crate::animation::easing::Easing;
use crate::animation::interpolation::interpolate_transform;
use crate::core::config::AnimationConfig;
use crate::core::constants::DEFAULT_ANIMATION_DURATION_MS;
use crate::core::viewport::CanvasTransform;
use crate::runtime::{FrameHandle, FrameScheduler, ManualScheduler};
use crate::{Result, ViewError};
use futures::channel::oneshot;
use fxhash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

pub type UpdateCallback = Box<dyn FnMut(&CanvasTransform)>;
pub type CompleteCallback = Box<dyn FnOnce(&CanvasTransform)>;

/// One scheduled run from `from` to `to`
pub struct TransformAnimation {
    pub duration: Duration,
    pub easing: Easing,
    pub from: CanvasTransform,
    pub to: CanvasTransform,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
}

impl TransformAnimation {
    pub fn new(from: CanvasTransform, to: CanvasTransform) -> Self {
        Self {
            duration: duration_from_ms(DEFAULT_ANIMATION_DURATION_MS),
            easing: Easing::default(),
            from,
            to,
            on_update: None,
            on_complete: None,
        }
    }

    /// Run using the configured default duration and easing
    pub fn from_config(from: CanvasTransform, to: CanvasTransform, config: &AnimationConfig) -> Self {
        Self::new(from, to)
            .with_duration(duration_from_ms(config.default_duration_ms))
            .with_easing(config.default_easing)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Called with every interpolated frame, the last one included
    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&CanvasTransform) + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Called once with the final frame; never called for cancelled runs
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&CanvasTransform) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration.as_nanos() as f64 / 1e6
    }

    /// Snapshot at linear `progress` in `[0, 1]`
    pub fn sample(&self, progress: f64) -> CanvasTransform {
        interpolate_transform(&self.from, &self.to, progress, self.easing)
    }
}

/// Millisecond count to a `Duration`, rounded to the microsecond; negative
/// and NaN inputs become zero
pub fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_micros((ms * 1000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

impl fmt::Debug for TransformAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAnimation")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

struct ActiveAnimation {
    /// Distinguishes this run from a later one under the same key
    generation: u64,
    animation: TransformAnimation,
    start_time: f64,
    frame: Option<FrameHandle>,
    completion: oneshot::Sender<CanvasTransform>,
}

impl ActiveAnimation {
    fn progress(&self, timestamp: f64) -> f64 {
        let duration = self.animation.duration_ms();
        if duration <= 0.0 {
            1.0
        } else {
            ((timestamp - self.start_time) / duration).clamp(0.0, 1.0)
        }
    }
}

#[derive(Default)]
struct Registry {
    next_generation: u64,
    active: FxHashMap<String, ActiveAnimation>,
}

/// Frame-driven animator for [`CanvasTransform`] runs, keyed by caller ids.
///
/// At most one run is active per key; starting another under the same key
/// cancels the first. The animator never touches a viewport itself, it only
/// hands snapshots to `on_update`. Clones share the same registry.
#[derive(Clone)]
pub struct TransformAnimator {
    registry: Rc<RefCell<Registry>>,
    scheduler: Rc<dyn FrameScheduler>,
}

impl TransformAnimator {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            scheduler,
        }
    }

    /// Animator on a fresh [`ManualScheduler`] the caller drives
    pub fn with_manual_scheduler() -> (Self, Rc<ManualScheduler>) {
        let scheduler = Rc::new(ManualScheduler::new());
        (Self::new(scheduler.clone()), scheduler)
    }

    pub fn scheduler(&self) -> &Rc<dyn FrameScheduler> {
        &self.scheduler
    }

    /// Starts `animation` under `id`, replacing any run already using it.
    ///
    /// The first frame runs on the scheduler's next frame. The returned handle
    /// resolves with the final snapshot, or with [`ViewError::Cancelled`] if
    /// the run is cancelled or superseded.
    pub fn animate(&self, id: impl Into<String>, animation: TransformAnimation) -> AnimationHandle {
        let id = id.into();
        if self.cancel(&id) {
            log::debug!("animation '{}' superseded", id);
        }

        let (sender, receiver) = oneshot::channel();
        let generation = {
            let mut registry = self.registry.borrow_mut();
            registry.next_generation += 1;
            let generation = registry.next_generation;
            log::debug!(
                "starting animation '{}' over {:?} with {}",
                id,
                animation.duration,
                animation.easing
            );
            registry.active.insert(
                id.clone(),
                ActiveAnimation {
                    generation,
                    animation,
                    start_time: self.scheduler.now(),
                    frame: None,
                    completion: sender,
                },
            );
            generation
        };

        let frame = schedule_frame(&self.registry, &self.scheduler, id.clone(), generation);
        if let Some(entry) = self.registry.borrow_mut().active.get_mut(&id) {
            entry.frame = Some(frame);
        }

        AnimationHandle { id, receiver }
    }

    /// Stops the run under `id` immediately. No further callbacks fire and its
    /// handle resolves to [`ViewError::Cancelled`]. Returns whether a run was
    /// active.
    pub fn cancel(&self, id: &str) -> bool {
        let entry = self.registry.borrow_mut().active.remove(id);
        match entry {
            Some(entry) => {
                if let Some(frame) = entry.frame {
                    self.scheduler.cancel(frame);
                }
                log::debug!("animation '{}' cancelled", id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let entries: Vec<(String, ActiveAnimation)> = self.registry.borrow_mut().active.drain().collect();
        for (id, entry) in entries {
            if let Some(frame) = entry.frame {
                self.scheduler.cancel(frame);
            }
            log::debug!("animation '{}' cancelled", id);
        }
    }

    pub fn is_animating(&self, id: &str) -> bool {
        self.registry.borrow().active.contains_key(id)
    }

    /// Keys of the active runs, sorted
    pub fn get_active_animations(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.borrow().active.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn active_count(&self) -> usize {
        self.registry.borrow().active.len()
    }
}

impl fmt::Debug for TransformAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAnimator")
            .field("active", &self.get_active_animations())
            .finish()
    }
}

fn schedule_frame(
    registry: &Rc<RefCell<Registry>>,
    scheduler: &Rc<dyn FrameScheduler>,
    id: String,
    generation: u64,
) -> FrameHandle {
    // Weak references: a queued frame must not keep a dropped animator alive.
    let weak_registry = Rc::downgrade(registry);
    let weak_scheduler = Rc::downgrade(scheduler);
    scheduler.request(Box::new(move |timestamp| {
        if let (Some(registry), Some(scheduler)) = (weak_registry.upgrade(), weak_scheduler.upgrade()) {
            step(&registry, &scheduler, &id, generation, timestamp);
        }
    }))
}

/// Runs one frame of the animation `id`.
///
/// The registry is never borrowed while user callbacks run, so callbacks may
/// start or cancel animations, this one included.
fn step(
    registry: &Rc<RefCell<Registry>>,
    scheduler: &Rc<dyn FrameScheduler>,
    id: &str,
    generation: u64,
    timestamp: f64,
) {
    let (snapshot, finished, mut on_update) = {
        let mut registry = registry.borrow_mut();
        let Some(entry) = registry.active.get_mut(id) else {
            return;
        };
        if entry.generation != generation {
            return;
        }
        entry.frame = None;
        let progress = entry.progress(timestamp);
        log::trace!("animation '{}' at {:.3}", id, progress);
        (
            entry.animation.sample(progress),
            progress >= 1.0,
            entry.animation.on_update.take(),
        )
    };

    if let Some(callback) = on_update.as_mut() {
        callback(&snapshot);
    }

    let finished_entry = {
        let mut registry = registry.borrow_mut();
        match registry.active.get_mut(id) {
            Some(entry) if entry.generation == generation => entry.animation.on_update = on_update,
            _ => {
                log::trace!("animation '{}' stopped from its own update", id);
                return;
            }
        }
        if finished {
            registry.active.remove(id)
        } else {
            None
        }
    };

    match finished_entry {
        Some(entry) => {
            log::debug!("animation '{}' complete", id);
            let ActiveAnimation {
                animation, completion, ..
            } = entry;
            if let Some(on_complete) = animation.on_complete {
                on_complete(&snapshot);
            }
            // The caller may have dropped the handle.
            let _ = completion.send(snapshot);
        }
        None => {
            let frame = schedule_frame(registry, scheduler, id.to_string(), generation);
            let mut registry = registry.borrow_mut();
            match registry.active.get_mut(id) {
                Some(entry) if entry.generation == generation => entry.frame = Some(frame),
                _ => scheduler.cancel(frame),
            }
        }
    }
}

/// Completion future of one animation run
#[derive(Debug)]
pub struct AnimationHandle {
    id: String,
    receiver: oneshot::Receiver<CanvasTransform>,
}

impl AnimationHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Future for AnimationHandle {
    type Output = Result<CanvasTransform>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(transform)) => Poll::Ready(Ok(transform)),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(ViewError::Cancelled {
                id: self.id.clone(),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}
