//! Scalar value owner that animates on a frame clock.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use smallvec::SmallVec;
use zoomable_core::{FrameCallbackRegistration, FrameClock};

use crate::animation::{AnimationType, SpringSpec, TweenSpec};
use crate::decay_spec::FloatDecayAnimationSpec;

/// Springs that have not settled after this long are snapped to the target.
const MAX_SPRING_NANOS: u64 = 10_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// Reached its target, or came to rest for a decay.
    Finished,
    /// Stopped early because the value hit a bound.
    BoundReached,
    /// Replaced by a newer mutation or stopped explicitly.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationResult {
    pub end_reason: AnimationEndReason,
    pub end_value: f32,
}

type EndCallback = Box<dyn FnOnce(AnimationResult)>;

#[derive(Default)]
struct JobState {
    result: Option<AnimationResult>,
    waker: Option<Waker>,
    on_end: SmallVec<[EndCallback; 1]>,
}

/// Completion handle for one animation.
///
/// Awaiting it suspends the caller until the animation ends for any reason.
#[derive(Clone, Default)]
pub struct AnimationJob {
    state: Rc<RefCell<JobState>>,
}

impl AnimationJob {
    /// A job that has already ended.
    pub fn completed(result: AnimationResult) -> Self {
        let job = Self::default();
        job.state.borrow_mut().result = Some(result);
        job
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().result.is_some()
    }

    pub fn result(&self) -> Option<AnimationResult> {
        self.state.borrow().result
    }

    /// Runs `callback` once the animation ends, or right away if it already has.
    pub fn on_end(&self, callback: impl FnOnce(AnimationResult) + 'static) {
        let finished = self.state.borrow().result;
        match finished {
            Some(result) => callback(result),
            None => self.state.borrow_mut().on_end.push(Box::new(callback)),
        }
    }

    fn complete(&self, result: AnimationResult) {
        let (callbacks, waker) = {
            let mut state = self.state.borrow_mut();
            if state.result.is_some() {
                return;
            }
            state.result = Some(result);
            (std::mem::take(&mut state.on_end), state.waker.take())
        };
        for callback in callbacks {
            callback(result);
        }
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Future for AnimationJob {
    type Output = AnimationResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.result {
            Some(result) => Poll::Ready(result),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

/// Several animations started together; resolves when all of them have ended.
#[derive(Clone, Default)]
pub struct AnimationGroup {
    jobs: SmallVec<[AnimationJob; 3]>,
}

impl AnimationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: AnimationJob) {
        self.jobs.push(job);
    }

    pub fn is_finished(&self) -> bool {
        self.jobs.iter().all(AnimationJob::is_finished)
    }

    pub fn jobs(&self) -> &[AnimationJob] {
        &self.jobs
    }
}

impl FromIterator<AnimationJob> for AnimationGroup {
    fn from_iter<I: IntoIterator<Item = AnimationJob>>(iter: I) -> Self {
        Self {
            jobs: iter.into_iter().collect(),
        }
    }
}

impl Future for AnimationGroup {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut pending = false;
        for job in self.jobs.iter_mut() {
            if Pin::new(job).poll(cx).is_pending() {
                pending = true;
            }
        }
        if pending {
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

impl Motion {
    fn name(&self) -> &'static str {
        match self {
            Motion::Tween { .. } => "tween",
            Motion::Spring { .. } => "spring",
            Motion::Decay { .. } => "decay",
        }
    }
}

enum Motion {
    Tween {
        start: f32,
        target: f32,
        spec: TweenSpec,
    },
    Spring {
        target: f32,
        spec: SpringSpec,
    },
    Decay {
        initial_value: f32,
        initial_velocity: f32,
        spec: Rc<dyn FloatDecayAnimationSpec>,
    },
}

struct Running {
    generation: u64,
    motion: Motion,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    job: AnimationJob,
}

struct AnimatableInner {
    clock: FrameClock,
    value: f32,
    velocity: f32,
    lower_bound: Option<f32>,
    upper_bound: Option<f32>,
    generation: u64,
    running: Option<Running>,
}

impl AnimatableInner {
    fn clamp(&self, value: f32) -> f32 {
        let mut clamped = value;
        if let Some(lower) = self.lower_bound {
            clamped = clamped.max(lower);
        }
        if let Some(upper) = self.upper_bound {
            clamped = clamped.min(upper);
        }
        clamped
    }

    /// Detaches the running animation, if any, so the caller can report it
    /// as interrupted once the borrow is released.
    fn interrupt(&mut self) -> Option<AnimationJob> {
        self.generation += 1;
        self.running.take().map(|running| running.job)
    }
}

/// A float that is either snapped or animated, optionally kept within bounds.
///
/// Every mutation (`snapTo`, `animateTo`, `animateDecay`, `stop`) cancels the
/// animation in flight; the last writer wins. Clones share the same value.
#[derive(Clone)]
pub struct Animatable {
    inner: Rc<RefCell<AnimatableInner>>,
}

impl Animatable {
    pub fn new(initial: f32, clock: FrameClock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AnimatableInner {
                clock,
                value: initial,
                velocity: 0.0,
                lower_bound: None,
                upper_bound: None,
                generation: 0,
                running: None,
            })),
        }
    }

    pub fn value(&self) -> f32 {
        self.inner.borrow().value
    }

    /// Velocity in units per second; zero when idle.
    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running.is_some()
    }

    pub fn lower_bound(&self) -> Option<f32> {
        self.inner.borrow().lower_bound
    }

    pub fn upper_bound(&self) -> Option<f32> {
        self.inner.borrow().upper_bound
    }

    /// Sets the bounds. An idle value outside them is clamped right away; a
    /// running animation is clamped on its next frame.
    pub fn update_bounds(&self, lower: Option<f32>, upper: Option<f32>) {
        let mut inner = self.inner.borrow_mut();
        inner.lower_bound = lower;
        inner.upper_bound = upper;
        if inner.running.is_none() {
            inner.value = inner.clamp(inner.value);
        }
    }

    pub fn snapTo(&self, target: f32) {
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            let interrupted = inner.interrupt();
            inner.value = inner.clamp(target);
            inner.velocity = 0.0;
            interrupted
        };
        self.finish_interrupted(interrupted);
    }

    pub fn animateTo(&self, target: f32, animation: AnimationType) -> AnimationJob {
        let motion = {
            let inner = self.inner.borrow();
            match animation {
                AnimationType::Tween(spec) => Motion::Tween {
                    start: inner.value,
                    target,
                    spec,
                },
                AnimationType::Spring(spec) => Motion::Spring { target, spec },
            }
        };
        self.start(motion)
    }

    pub fn animateDecay(
        &self,
        initial_velocity: f32,
        spec: Rc<dyn FloatDecayAnimationSpec>,
    ) -> AnimationJob {
        let initial_value = self.value();
        self.start(Motion::Decay {
            initial_value,
            initial_velocity,
            spec,
        })
    }

    /// Cancels the running animation and leaves the value where it is.
    pub fn stop(&self) {
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            inner.velocity = 0.0;
            inner.interrupt()
        };
        self.finish_interrupted(interrupted);
    }

    fn finish_interrupted(&self, job: Option<AnimationJob>) {
        if let Some(job) = job {
            let end_value = self.value();
            log::trace!("animation interrupted at {end_value}");
            job.complete(AnimationResult {
                end_reason: AnimationEndReason::Interrupted,
                end_value,
            });
        }
    }

    fn start(&self, motion: Motion) -> AnimationJob {
        let job = AnimationJob::default();
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            let interrupted = inner.interrupt();
            if let Motion::Tween { .. } | Motion::Decay { .. } = motion {
                inner.velocity = 0.0;
            }
            log::trace!("{} animation started from {}", motion.name(), inner.value);
            inner.running = Some(Running {
                generation: inner.generation,
                motion,
                start_time_nanos: None,
                last_frame_nanos: None,
                registration: None,
                job: job.clone(),
            });
            interrupted
        };
        self.finish_interrupted(interrupted);
        Self::schedule_frame(&self.inner);
        job
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner>>) {
        let (clock, generation) = {
            let inner = this.borrow();
            match inner.running.as_ref() {
                Some(running) if running.registration.is_none() => {
                    (inner.clock.clone(), running.generation)
                }
                _ => return,
            }
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, generation, time);
            }
        });
        if let Some(running) = this.borrow_mut().running.as_mut() {
            running.registration = Some(registration);
        }
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner>>, generation: u64, frame_time_nanos: u64) {
        let finished = {
            let mut guard = this.borrow_mut();
            let inner = &mut *guard;
            let Some(running) = inner.running.as_mut() else {
                return;
            };
            if running.generation != generation {
                return;
            }
            running.registration = None;

            let start = *running.start_time_nanos.get_or_insert(frame_time_nanos);
            let play_time = frame_time_nanos.saturating_sub(start);
            let dt_seconds = running
                .last_frame_nanos
                .map(|last| frame_time_nanos.saturating_sub(last) as f32 / 1e9)
                .unwrap_or(0.0);
            running.last_frame_nanos = Some(frame_time_nanos);

            let (raw_value, velocity, done) = match &running.motion {
                Motion::Tween {
                    start,
                    target,
                    spec,
                } => {
                    let duration = (spec.duration_millis * 1_000_000).max(1);
                    let fraction = (play_time as f32 / duration as f32).clamp(0.0, 1.0);
                    if fraction >= 1.0 {
                        (*target, 0.0, true)
                    } else {
                        let value = start + (target - start) * spec.easing.transform(fraction);
                        let velocity = if dt_seconds > 0.0 {
                            (value - inner.value) / dt_seconds
                        } else {
                            0.0
                        };
                        (value, velocity, false)
                    }
                }
                Motion::Spring { target, spec } => {
                    let (value, velocity) =
                        spec.step(inner.value, inner.velocity, *target, dt_seconds);
                    if spec.is_at_rest(value, velocity, *target) || play_time >= MAX_SPRING_NANOS
                    {
                        (*target, 0.0, true)
                    } else {
                        (value, velocity, false)
                    }
                }
                Motion::Decay {
                    initial_value,
                    initial_velocity,
                    spec,
                } => {
                    let play = play_time as i64;
                    let duration = spec.get_duration_nanos(*initial_value, *initial_velocity);
                    if play >= duration {
                        let target = spec.get_target_value(*initial_value, *initial_velocity);
                        (target, 0.0, true)
                    } else {
                        (
                            spec.get_value_from_nanos(play, *initial_value, *initial_velocity),
                            spec.get_velocity_from_nanos(play, *initial_value, *initial_velocity),
                            false,
                        )
                    }
                }
            };

            let value = inner.clamp(raw_value);
            if value != raw_value {
                inner.value = value;
                inner.velocity = 0.0;
                Some(AnimationEndReason::BoundReached)
            } else if done {
                inner.value = value;
                inner.velocity = 0.0;
                Some(AnimationEndReason::Finished)
            } else {
                inner.value = value;
                inner.velocity = velocity;
                None
            }
        };

        match finished {
            Some(end_reason) => {
                let (job, end_value) = {
                    let mut inner = this.borrow_mut();
                    let job = inner.running.take().map(|running| running.job);
                    (job, inner.value)
                };
                log::trace!("animation ended at {end_value}: {end_reason:?}");
                if let Some(job) = job {
                    job.complete(AnimationResult {
                        end_reason,
                        end_value,
                    });
                }
            }
            None => Self::schedule_frame(this),
        }
    }
}

#[cfg(test)]
#[path = "tests/animatable_tests.rs"]
mod tests;
