//! Scale and offset of one zoomable surface.
//!
//! [`ZoomState`] owns three animatable values (scale, horizontal and vertical
//! offset) and the geometry they are clamped against. Gestures snap the
//! values; double tap, snap back and fling animate them on the frame clock
//! handed to [`ZoomState::new`]. Any new mutation interrupts the animation
//! currently driving a value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use zoomable_animation::{
    Animatable, AnimationEndReason, AnimationGroup, AnimationJob, AnimationType,
    ExponentialDecaySpec, FloatDecayAnimationSpec,
};
use zoomable_core::FrameClock;
use zoomable_foundation::gesture_constants::MAX_FLING_VELOCITY;
use zoomable_foundation::VelocityTracker;
use zoomable_ui_graphics::{GraphicsLayer, Point, Size};

/// Lowest scale a pinch can reach; released below 1.0 the content springs
/// back.
pub const MIN_SCALE: f32 = 0.9;

pub const DEFAULT_MAX_SCALE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomStateError {
    InvalidMaxScale { max_scale: f32 },
}

impl fmt::Display for ZoomStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoomStateError::InvalidMaxScale { max_scale } => {
                write!(f, "max_scale must be at least 1.0, got {max_scale}")
            }
        }
    }
}

impl std::error::Error for ZoomStateError {}

/// Construction parameters of a [`ZoomState`].
#[derive(Clone)]
pub struct ZoomStateConfig {
    pub max_scale: f32,
    pub initial_scale: f32,
    /// Natural size of the content, for example an image in pixels. Zero
    /// means the layout size is used.
    pub content_size: Size,
    /// Friction applied to the offsets after a fling.
    pub velocity_decay: Rc<dyn FloatDecayAnimationSpec>,
    pub max_fling_velocity: f32,
}

impl Default for ZoomStateConfig {
    fn default() -> Self {
        Self {
            max_scale: DEFAULT_MAX_SCALE,
            initial_scale: 1.0,
            content_size: Size::ZERO,
            velocity_decay: Rc::new(ExponentialDecaySpec::default()),
            max_fling_velocity: MAX_FLING_VELOCITY,
        }
    }
}

impl fmt::Debug for ZoomStateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomStateConfig")
            .field("max_scale", &self.max_scale)
            .field("initial_scale", &self.initial_scale)
            .field("content_size", &self.content_size)
            .field("max_fling_velocity", &self.max_fling_velocity)
            .finish_non_exhaustive()
    }
}

impl ZoomStateConfig {
    pub fn with_max_scale(mut self, max_scale: f32) -> Self {
        self.max_scale = max_scale;
        self
    }

    pub fn with_initial_scale(mut self, initial_scale: f32) -> Self {
        self.initial_scale = initial_scale;
        self
    }

    pub fn with_content_size(mut self, content_size: Size) -> Self {
        self.content_size = content_size;
        self
    }

    pub fn with_velocity_decay(mut self, spec: impl FloatDecayAnimationSpec + 'static) -> Self {
        self.velocity_decay = Rc::new(spec);
        self
    }

    pub fn with_max_fling_velocity(mut self, velocity: f32) -> Self {
        self.max_fling_velocity = velocity;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Geometry {
    content_size: Size,
    layout_size: Size,
    fit_content_size: Size,
}

impl Geometry {
    fn new(content_size: Size) -> Self {
        let mut geometry = Self {
            content_size,
            ..Self::default()
        };
        geometry.update_fit_content_size();
        geometry
    }

    /// Content scaled, keeping its aspect ratio, to fit the layout.
    fn update_fit_content_size(&mut self) {
        let layout = self.layout_size;
        let content = self.content_size;
        self.fit_content_size = if layout.is_empty() {
            Size::ZERO
        } else if content.is_empty() {
            layout
        } else if content.aspect_ratio() > layout.aspect_ratio() {
            content * (layout.width / content.width)
        } else {
            content * (layout.height / content.height)
        };
    }

    /// Largest offset magnitude on each axis at `scale`.
    fn bounds(&self, scale: f32) -> Point {
        let fit = self.fit_content_size;
        let layout = self.layout_size;
        Point::new(
            (fit.width * scale - layout.width).max(0.0) / 2.0,
            (fit.height * scale - layout.height).max(0.0) / 2.0,
        )
    }

    /// Offset change that keeps the content under `position` in place while
    /// the scale goes from `from` to `to`.
    fn anchored_offset_delta(&self, offset: Point, position: Point, from: f32, to: f32) -> Point {
        let fit = self.fit_content_size;
        let layout = self.layout_size;
        Point::new(
            anchor_axis(fit.width, layout.width, offset.x, position.x, from, to),
            anchor_axis(fit.height, layout.height, offset.y, position.y, from, to),
        )
    }

    /// Converts content coordinates to fitted coordinates.
    fn content_to_fit_factor(&self) -> f32 {
        let source = if self.content_size.is_empty() {
            self.layout_size
        } else {
            self.content_size
        };
        if source.width <= 0.0 {
            0.0
        } else {
            self.fit_content_size.width / source.width
        }
    }
}

fn anchor_axis(fit: f32, layout: f32, offset: f32, position: f32, from: f32, to: f32) -> f32 {
    let extent = fit * from;
    if extent == 0.0 {
        return 0.0;
    }
    let change = fit * (to - from);
    let in_content = position - offset + (extent - layout) / 2.0;
    change / 2.0 - change * in_content / extent
}

fn clamp_offset(offset: Point, bounds: Point) -> Point {
    Point::new(
        offset.x.max(-bounds.x).min(bounds.x),
        offset.y.max(-bounds.y).min(bounds.y),
    )
}

struct ZoomStateInner {
    max_scale: f32,
    velocity_decay: Rc<dyn FloatDecayAnimationSpec>,
    max_fling_velocity: f32,
    scale: Animatable,
    offset_x: Animatable,
    offset_y: Animatable,
    geometry: Cell<Geometry>,
    velocity_tracker: RefCell<VelocityTracker>,
    should_fling: Cell<bool>,
}

/// Scale and offset of a zoomable surface, clamped to the fitted content.
///
/// Cheap to clone; clones share the same state. Two surfaces never share a
/// `ZoomState` unless the host hands the same handle to both.
#[derive(Clone)]
pub struct ZoomState {
    inner: Rc<ZoomStateInner>,
}

impl fmt::Debug for ZoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomState")
            .field("scale", &self.scale())
            .field("offset_x", &self.offset_x())
            .field("offset_y", &self.offset_y())
            .field("max_scale", &self.inner.max_scale)
            .finish()
    }
}

impl ZoomState {
    pub fn new(clock: FrameClock, config: ZoomStateConfig) -> Result<Self, ZoomStateError> {
        let max_scale = config.max_scale;
        if !max_scale.is_finite() || max_scale < 1.0 {
            return Err(ZoomStateError::InvalidMaxScale { max_scale });
        }
        let scale = Animatable::new(config.initial_scale, clock.clone());
        scale.update_bounds(Some(MIN_SCALE), Some(max_scale));
        Ok(Self {
            inner: Rc::new(ZoomStateInner {
                max_scale,
                velocity_decay: config.velocity_decay,
                max_fling_velocity: config.max_fling_velocity,
                scale,
                offset_x: Animatable::new(0.0, clock.clone()),
                offset_y: Animatable::new(0.0, clock),
                geometry: Cell::new(Geometry::new(config.content_size)),
                velocity_tracker: RefCell::new(VelocityTracker::new()),
                should_fling: Cell::new(true),
            }),
        })
    }

    /// Whether both handles refer to the same state.
    pub fn ptr_eq(&self, other: &ZoomState) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn scale(&self) -> f32 {
        self.inner.scale.value()
    }

    pub fn offset_x(&self) -> f32 {
        self.inner.offset_x.value()
    }

    pub fn offset_y(&self) -> f32 {
        self.inner.offset_y.value()
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x(), self.offset_y())
    }

    pub fn max_scale(&self) -> f32 {
        self.inner.max_scale
    }

    pub fn content_size(&self) -> Size {
        self.inner.geometry.get().content_size
    }

    pub fn layout_size(&self) -> Size {
        self.inner.geometry.get().layout_size
    }

    pub fn fit_content_size(&self) -> Size {
        self.inner.geometry.get().fit_content_size
    }

    /// Largest offset magnitude on each axis at the current scale.
    pub fn offset_bounds(&self) -> Point {
        self.inner.geometry.get().bounds(self.scale())
    }

    pub fn is_animating(&self) -> bool {
        let inner = &self.inner;
        inner.scale.is_running() || inner.offset_x.is_running() || inner.offset_y.is_running()
    }

    /// The transform the host applies to the content.
    pub fn graphics_layer(&self) -> GraphicsLayer {
        let scale = self.scale();
        GraphicsLayer {
            scale_x: scale,
            scale_y: scale,
            translation_x: self.offset_x(),
            translation_y: self.offset_y(),
        }
    }

    pub fn set_layout_size(&self, size: Size) {
        self.update_geometry(|geometry| geometry.layout_size = size);
    }

    pub fn set_content_size(&self, size: Size) {
        self.update_geometry(|geometry| geometry.content_size = size);
    }

    /// Recomputes the fitted size and, unless an animation is running, clamps
    /// the offsets to the bounds of the new geometry.
    fn update_geometry(&self, update: impl FnOnce(&mut Geometry)) {
        let mut geometry = self.inner.geometry.get();
        update(&mut geometry);
        geometry.update_fit_content_size();
        self.inner.geometry.set(geometry);
        if self.is_animating() {
            return;
        }
        let inner = &self.inner;
        let bounds = geometry.bounds(self.scale());
        inner.offset_x.update_bounds(Some(-bounds.x), Some(bounds.x));
        inner.offset_y.update_bounds(Some(-bounds.y), Some(bounds.y));
    }

    /// Starts a gesture session: flinging is allowed again and the velocity
    /// samples of the previous session are dropped.
    pub fn start_gesture(&self) {
        self.inner.should_fling.set(true);
        self.inner.velocity_tracker.borrow_mut().reset();
    }

    /// Applies one movement of a gesture. `position` is the centroid of the
    /// pointers and stays over the same content while zooming.
    pub fn apply_gesture(&self, pan: Point, zoom: f32, position: Point, uptime_millis: u64) {
        self.apply(pan, zoom, position, MIN_SCALE);
        self.inner
            .velocity_tracker
            .borrow_mut()
            .add_position(uptime_millis, position);
        if zoom != 1.0 {
            self.inner.should_fling.set(false);
        }
    }

    /// Like [`ZoomState::apply_gesture`] but never below scale 1.0 and
    /// without velocity tracking, for input that has no release.
    pub fn apply_gesture_without_bounce(&self, pan: Point, zoom: f32, position: Point) {
        self.apply(pan, zoom, position, 1.0);
    }

    fn apply(&self, pan: Point, zoom: f32, position: Point, min_scale: f32) {
        let inner = &self.inner;
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        let geometry = inner.geometry.get();
        let from = self.scale();
        let to = (from * zoom).clamp(min_scale, inner.max_scale);
        let offset = self.offset();
        let delta = geometry.anchored_offset_delta(offset, position, from, to);
        let bounds = geometry.bounds(to);
        log::trace!("apply gesture pan={pan:?} zoom={zoom} scale {from} -> {to}");

        inner.scale.snapTo(to);
        inner.offset_x.update_bounds(Some(-bounds.x), Some(bounds.x));
        inner.offset_x.snapTo(offset.x + delta.x + pan.x);
        inner.offset_y.update_bounds(Some(-bounds.y), Some(bounds.y));
        inner.offset_y.snapTo(offset.y + delta.y + pan.y);
    }

    /// False when `pan` pushes a mostly horizontal or mostly vertical drag
    /// against the bound the offset already rests on.
    pub fn will_change_offset(&self, pan: Point) -> bool {
        let ratio = pan.x.abs() / pan.y.abs();
        if ratio > 3.0 {
            !pushes_against_bound(&self.inner.offset_x, pan.x)
        } else if ratio < 0.33 {
            !pushes_against_bound(&self.inner.offset_y, pan.y)
        } else {
            true
        }
    }

    /// Flings the offsets with the release velocity unless the session
    /// zoomed. Ends the velocity tracking of the session.
    pub fn start_fling(&self) -> AnimationGroup {
        let inner = &self.inner;
        let mut group = AnimationGroup::new();
        if inner.should_fling.get() {
            let velocity = inner
                .velocity_tracker
                .borrow()
                .calculate_velocity_with_max(inner.max_fling_velocity);
            if velocity != Point::ZERO {
                log::debug!("fling with velocity {velocity:?}");
            }
            if velocity.x != 0.0 {
                group.push(
                    inner
                        .offset_x
                        .animateDecay(velocity.x, inner.velocity_decay.clone()),
                );
            }
            if velocity.y != 0.0 {
                group.push(
                    inner
                        .offset_y
                        .animateDecay(velocity.y, inner.velocity_decay.clone()),
                );
            }
        }
        self.finish_session();
        group
    }

    /// Ends a gesture session: back to identity in snap back mode or when
    /// the content was pinched below 1.0, otherwise fling.
    pub fn end_gesture(&self, snap_back: bool) -> AnimationGroup {
        if snap_back || self.scale() < 1.0 {
            self.finish_session();
            self.change_scale(1.0, Point::ZERO, AnimationType::default())
        } else {
            self.start_fling()
        }
    }

    fn finish_session(&self) {
        self.inner.velocity_tracker.borrow_mut().reset();
        self.inner.should_fling.set(true);
    }

    /// Animates to `target` (clamped to `[1, max_scale]`) keeping the content
    /// under `position` in place as far as the bounds allow.
    pub fn change_scale(
        &self,
        target: f32,
        position: Point,
        animation: AnimationType,
    ) -> AnimationGroup {
        let target = target.clamp(1.0, self.inner.max_scale);
        let geometry = self.inner.geometry.get();
        let from = self.scale();
        let offset = self.offset();
        let delta = geometry.anchored_offset_delta(offset, position, from, target);
        let bounds = geometry.bounds(target);
        log::debug!("change scale {from} -> {target} around {position:?}");
        self.animate_to(target, clamp_offset(offset + delta, bounds), bounds, animation)
    }

    /// `target` when unzoomed, back to 1.0 otherwise.
    pub fn toggle_scale(
        &self,
        target: f32,
        position: Point,
        animation: AnimationType,
    ) -> AnimationGroup {
        let target = if self.scale() == 1.0 { target } else { 1.0 };
        self.change_scale(target, position, animation)
    }

    /// Animates to `scale` with `point` of the natural content centered in
    /// the layout, as far as the bounds allow.
    pub fn center_by_content_coordinate(
        &self,
        point: Point,
        scale: f32,
        animation: AnimationType,
    ) -> AnimationGroup {
        let scale = scale.clamp(1.0, self.inner.max_scale);
        let geometry = self.inner.geometry.get();
        let factor = geometry.content_to_fit_factor();
        let fit_center = geometry.fit_content_size.center();
        let offset = (fit_center - point * factor) * scale;
        let bounds = geometry.bounds(scale);
        self.animate_to(scale, clamp_offset(offset, bounds), bounds, animation)
    }

    /// Animates to `scale` with `point`, given in unzoomed layout
    /// coordinates, centered in the layout.
    pub fn center_by_layout_coordinate(
        &self,
        point: Point,
        scale: f32,
        animation: AnimationType,
    ) -> AnimationGroup {
        let scale = scale.clamp(1.0, self.inner.max_scale);
        let geometry = self.inner.geometry.get();
        let offset = (geometry.layout_size.center() - point) * scale;
        let bounds = geometry.bounds(scale);
        self.animate_to(scale, clamp_offset(offset, bounds), bounds, animation)
    }

    fn animate_to(
        &self,
        scale: f32,
        offset: Point,
        bounds: Point,
        animation: AnimationType,
    ) -> AnimationGroup {
        let inner = &self.inner;
        // The straight path to the target may leave the final bounds.
        inner.offset_x.update_bounds(None, None);
        inner.offset_y.update_bounds(None, None);
        let scale_job = inner.scale.animateTo(scale, animation);
        let x_job = inner.offset_x.animateTo(offset.x, animation);
        let y_job = inner.offset_y.animateTo(offset.y, animation);
        restore_bounds_when_finished(&x_job, &inner.offset_x, bounds.x);
        restore_bounds_when_finished(&y_job, &inner.offset_y, bounds.y);
        [scale_job, x_job, y_job].into_iter().collect()
    }

    /// Moves the offset by `pan` within the bounds and returns the part of
    /// `pan` that was used.
    pub fn apply_pan(&self, pan: Point) -> Point {
        let inner = &self.inner;
        let bounds = self.offset_bounds();
        let before = self.offset();
        let after = clamp_offset(before + pan, bounds);
        inner.offset_x.update_bounds(Some(-bounds.x), Some(bounds.x));
        inner.offset_x.snapTo(after.x);
        inner.offset_y.update_bounds(Some(-bounds.y), Some(bounds.y));
        inner.offset_y.snapTo(after.y);
        after - before
    }

    /// Back to scale 1.0 and no offset at once. The offset bounds are zeroed
    /// until the next gesture recomputes them.
    pub fn reset(&self) {
        let inner = &self.inner;
        log::debug!("reset zoom");
        inner.scale.snapTo(1.0);
        inner.offset_x.update_bounds(Some(0.0), Some(0.0));
        inner.offset_x.snapTo(0.0);
        inner.offset_y.update_bounds(Some(0.0), Some(0.0));
        inner.offset_y.snapTo(0.0);
        self.finish_session();
    }

    /// Cancels every animation in flight, leaving the values where they are.
    pub fn stop_animations(&self) {
        let inner = &self.inner;
        inner.scale.stop();
        inner.offset_x.stop();
        inner.offset_y.stop();
    }
}

fn pushes_against_bound(value: &Animatable, delta: f32) -> bool {
    let current = Some(value.value());
    (delta < 0.0 && current == value.lower_bound())
        || (delta > 0.0 && current == value.upper_bound())
}

fn restore_bounds_when_finished(job: &AnimationJob, value: &Animatable, bound: f32) {
    let value = value.clone();
    job.on_end(move |result| {
        if result.end_reason == AnimationEndReason::Finished {
            value.update_bounds(Some(-bound), Some(bound));
        }
    });
}

#[cfg(test)]
#[path = "tests/zoom_state_tests.rs"]
mod tests;
