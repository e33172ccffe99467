//! Keyframe timeline for a single animated property.
//!
//! This module provides:
//! - `AnimationKey`: a timed value with the tween used to reach it
//! - `IterationCount`: finite or unbounded repetition
//! - `ElementAnimation`: the timeline, owning its keys and playback state
//!
//! A timeline starts with one key at time 0 holding the property's current
//! value. Keys are appended in time order; every call to
//! [`ElementAnimation::update_and_get_property`] advances the clock, picks the
//! two keys bracketing the playback position and blends their values.
//!
//! # Example
//!
//! ```
//! use rune_animation::{ElementAnimation, ElementAnimationOrigin, ElementBox};
//! use rune_animation::{EasingFunction, IterationCount, Property};
//!
//! let element = ElementBox::new(100.0, 100.0);
//! let mut fade = ElementAnimation::new(
//!     "opacity",
//!     ElementAnimationOrigin::Animation,
//!     &Property::number(0.0),
//!     0.0,
//!     1.0,
//!     IterationCount::Count(1),
//!     false,
//! );
//! fade.add_key(1.0, &Property::number(1.0), &element, EasingFunction::Linear, false)
//!     .unwrap();
//!
//! let value = fade.update_and_get_property(0.25).unwrap();
//! assert_eq!(value.value.as_number(), Some(0.25));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::AnimationConfig;
use crate::easing::EasingFunction;
use crate::element::ElementGeometry;
use crate::error::{AnimationError, Result};
use crate::interpolate::interpolate_values;
use crate::transform::prepare_transforms;
use crate::types::{Property, PropertyValue, Unit};

/// A value at a point of one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationKey {
    /// Seconds since the start of the iteration.
    pub time: f32,
    pub value: PropertyValue,
    /// Easing used when blending from the previous key into this one.
    pub tween: EasingFunction,
}

impl AnimationKey {
    pub fn new(time: f32, value: PropertyValue, tween: EasingFunction) -> Self {
        Self { time, value, tween }
    }
}

/// How many times an animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "count", rename_all = "snake_case")]
pub enum IterationCount {
    Count(u32),
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        Self::Count(1)
    }
}

impl IterationCount {
    /// Whether iteration `iteration` (0-based) should still play.
    pub fn should_continue(&self, iteration: u32) -> bool {
        match self {
            Self::Infinite => true,
            Self::Count(count) => iteration < *count,
        }
    }
}

/// What created an animation; decides how it is replaced or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementAnimationOrigin {
    /// Requested through the scripting API.
    User,
    /// Declared through an `animation` property.
    Animation,
    /// Implicit, from a `transition` property.
    Transition,
}

/// Keyframe timeline of one property on one element.
#[derive(Debug, Clone)]
pub struct ElementAnimation {
    property: String,
    unit: Unit,
    specificity: i32,

    duration: f32,
    iterations: IterationCount,
    alternate_direction: bool,
    origin: ElementAnimationOrigin,

    keys: Vec<AnimationKey>,

    last_update_world_time: f64,
    time_since_iteration_start: f32,
    current_iteration: u32,
    reverse_direction: bool,
    complete: bool,
    valid: bool,

    config: AnimationConfig,
}

impl ElementAnimation {
    /// Start a timeline from the property's current value.
    ///
    /// If `current_value` cannot be interpolated the timeline is created
    /// invalid: it rejects every key and never produces a value.
    pub fn new(
        property: impl Into<String>,
        origin: ElementAnimationOrigin,
        current_value: &Property,
        start_world_time: f64,
        duration: f32,
        iterations: IterationCount,
        alternate_direction: bool,
    ) -> Self {
        let property = property.into();
        let (value, valid) = match current_value.value.clone().into_interpolatable() {
            Ok(value) => (value, true),
            Err(err) => {
                debug!(%property, %err, "animation created from a non-interpolatable value");
                (current_value.value.clone(), false)
            }
        };

        Self {
            property,
            unit: current_value.unit,
            specificity: current_value.specificity,
            duration,
            iterations,
            alternate_direction,
            origin,
            keys: vec![AnimationKey::new(0.0, value, EasingFunction::default())],
            last_update_world_time: start_world_time,
            time_since_iteration_start: 0.0,
            current_iteration: 0,
            reverse_direction: false,
            complete: false,
            valid,
            config: AnimationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnimationConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a key at `time` seconds into the iteration.
    ///
    /// Transform keys are resolved against `element` and reconciled with the
    /// keys before them. On error the timeline is left exactly as it was. With
    /// `extend_duration` the iteration duration becomes `time`.
    pub fn add_key(
        &mut self,
        time: f32,
        property: &Property,
        element: &dyn ElementGeometry,
        tween: EasingFunction,
        extend_duration: bool,
    ) -> Result<()> {
        let result = self.try_add_key(time, property, element, tween);
        match &result {
            Ok(()) => {
                if extend_duration {
                    self.duration = time;
                }
            }
            Err(err) => debug!(property = %self.property, time, %err, "animation key rejected"),
        }
        result
    }

    fn try_add_key(
        &mut self,
        time: f32,
        property: &Property,
        element: &dyn ElementGeometry,
        tween: EasingFunction,
    ) -> Result<()> {
        if !self.valid {
            return Err(AnimationError::InvalidAnimation);
        }
        if property.unit != self.unit {
            return Err(AnimationError::UnitMismatch {
                expected: self.unit,
                found: property.unit,
            });
        }

        let previous = self.keys.last().map_or(0.0, |k| k.time);
        // Negated so that NaN is rejected too.
        if !(time >= previous && time >= 0.0) {
            return Err(AnimationError::KeyOutOfOrder { time, previous });
        }

        let value = property.value.clone().into_interpolatable()?;
        let expected = self.keys[0].value.kind_name();
        if value.kind_name() != expected {
            return Err(AnimationError::KindMismatch {
                expected,
                found: value.kind_name(),
            });
        }

        if !matches!(value, PropertyValue::Transform(_)) {
            self.keys.push(AnimationKey::new(time, value, tween));
            return Ok(());
        }

        // Reconciliation may rewrite earlier keys; keep them for rollback.
        let snapshot = self.keys.clone();
        self.keys.push(AnimationKey::new(time, value, tween));
        if let Err(err) = self.prepare_transform_keys(element) {
            self.keys = snapshot;
            return Err(err);
        }
        Ok(())
    }

    fn prepare_transform_keys(&mut self, element: &dyn ElementGeometry) -> Result<()> {
        for key in &mut self.keys {
            if let PropertyValue::Transform(t) = &mut key.value {
                t.resolve_units(element)?;
            }
        }
        let start = self.keys.len() - 1;
        prepare_transforms(&mut self.keys, start, element, &self.config)
    }

    /// Advance the clock to `world_time` and return the blended value.
    ///
    /// Returns `None` when the timeline is invalid or complete, or when
    /// `world_time` is not later than the previous update.
    pub fn update_and_get_property(&mut self, world_time: f64) -> Option<Property> {
        if self.complete || !self.valid || world_time <= self.last_update_world_time {
            return None;
        }

        let dt = (world_time - self.last_update_world_time) as f32;
        self.last_update_world_time = world_time;
        self.time_since_iteration_start += dt;

        if self.time_since_iteration_start >= self.duration {
            self.advance_iteration();
        }

        let (key0, key1, alpha) = self.bracket(self.playback_time());
        let alpha = self.keys[key1].tween.evaluate(alpha);

        Some(Property {
            value: interpolate_values(
                &self.keys[key0].value,
                &self.keys[key1].value,
                alpha,
                &self.config,
            ),
            unit: self.unit,
            specificity: self.specificity,
        })
    }

    /// Move to the iteration containing the elapsed time, or complete.
    fn advance_iteration(&mut self) {
        let wraps = if self.duration > 0.0 {
            ((self.time_since_iteration_start / self.duration) as u32).max(1)
        } else {
            u32::MAX
        };
        let iteration = self.current_iteration.saturating_add(wraps);

        if self.duration > 0.0 && self.iterations.should_continue(iteration) {
            self.current_iteration = iteration;
            self.time_since_iteration_start = self.time_since_iteration_start.rem_euclid(self.duration);
            self.reverse_direction = self.alternate_direction && iteration % 2 == 1;
            trace!(property = %self.property, iteration, reversed = self.reverse_direction, "next iteration");
            return;
        }

        // Freeze on the end of the final iteration.
        let last = match self.iterations {
            IterationCount::Count(count) => count.saturating_sub(1),
            IterationCount::Infinite => self.current_iteration,
        };
        self.current_iteration = last.saturating_add(1);
        self.reverse_direction = self.alternate_direction && last % 2 == 1;
        self.time_since_iteration_start = self.duration.max(0.0);
        self.complete = true;
        trace!(property = %self.property, "animation complete");
    }

    fn playback_time(&self) -> f32 {
        if self.reverse_direction {
            self.duration - self.time_since_iteration_start
        } else {
            self.time_since_iteration_start
        }
    }

    /// Indices of the keys bracketing `t` and the raw blend factor between them.
    fn bracket(&self, t: f32) -> (usize, usize, f32) {
        let key1 = self
            .keys
            .iter()
            .position(|k| k.time >= t)
            .unwrap_or(self.keys.len() - 1);
        let key0 = key1.saturating_sub(1);

        let (t0, t1) = (self.keys[key0].time, self.keys[key1].time);
        let alpha = if t1 - t0 > self.config.bracket_epsilon {
            (t - t0) / (t1 - t0)
        } else {
            0.0
        };
        (key0, key1, alpha.clamp(0.0, 1.0))
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Duration of one iteration in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_transition(&self) -> bool {
        self.origin == ElementAnimationOrigin::Transition
    }

    pub fn origin(&self) -> ElementAnimationOrigin {
        self.origin
    }

    /// Raw blend factor at the current playback position, before the tween.
    pub fn interpolation_factor(&self) -> f32 {
        self.bracket(self.playback_time()).2
    }

    pub fn keys(&self) -> &[AnimationKey] {
        &self.keys
    }

    pub fn current_iteration(&self) -> u32 {
        self.current_iteration
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse_direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::{TweenCurve, TweenDirection};
    use crate::element::ElementBox;
    use crate::transform::{PrimitiveKind, Transform, TransformPrimitive};
    use crate::types::NumericValue;
    use palette::Srgba;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.0001
    }

    fn number_animation(duration: f32, iterations: IterationCount, alternate: bool) -> ElementAnimation {
        let mut animation = ElementAnimation::new(
            "opacity",
            ElementAnimationOrigin::Animation,
            &Property::number(0.0),
            0.0,
            duration,
            iterations,
            alternate,
        );
        animation
            .add_key(duration, &Property::number(10.0), &ElementBox::default(), EasingFunction::Linear, false)
            .unwrap();
        animation
    }

    fn value_at(animation: &mut ElementAnimation, time: f64) -> f32 {
        animation.update_and_get_property(time).unwrap().value.as_number().unwrap()
    }

    #[test]
    fn test_alternating_timeline() {
        let mut animation = number_animation(1.0, IterationCount::Count(2), true);

        assert!(approx_eq(value_at(&mut animation, 0.5), 5.0));
        assert!(!animation.is_reversed());

        assert!(approx_eq(value_at(&mut animation, 1.5), 5.0));
        assert!(animation.is_reversed());
        assert_eq!(animation.current_iteration(), 1);

        assert!(approx_eq(value_at(&mut animation, 1.75), 2.5));

        assert!(approx_eq(value_at(&mut animation, 2.0), 0.0));
        assert!(animation.is_complete());
    }

    #[test]
    fn test_complete_returns_none() {
        let mut animation = number_animation(1.0, IterationCount::Count(1), false);
        assert!(approx_eq(value_at(&mut animation, 1.2), 10.0));
        assert!(animation.is_complete());
        assert!(animation.update_and_get_property(1.5).is_none());
        assert!(animation.update_and_get_property(100.0).is_none());
    }

    #[test]
    fn test_stale_time_is_noop() {
        let mut animation = number_animation(1.0, IterationCount::Count(1), false);
        assert!(animation.update_and_get_property(0.0).is_none());
        value_at(&mut animation, 0.4);
        assert!(animation.update_and_get_property(0.4).is_none());
        assert!(animation.update_and_get_property(0.3).is_none());
        assert!(approx_eq(animation.interpolation_factor(), 0.4));
    }

    #[test]
    fn test_update_skipping_several_iterations() {
        let mut animation = number_animation(1.0, IterationCount::Count(5), false);
        assert!(approx_eq(value_at(&mut animation, 3.25), 2.5));
        assert_eq!(animation.current_iteration(), 3);
        assert!(!animation.is_complete());
    }

    #[test]
    fn test_infinite_iterations() {
        let mut animation = number_animation(2.0, IterationCount::Infinite, true);
        assert!(approx_eq(value_at(&mut animation, 1003.0), 5.0));
        assert!(animation.is_reversed());
        assert!(!animation.is_complete());
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut animation = ElementAnimation::new(
            "opacity",
            ElementAnimationOrigin::Transition,
            &Property::number(3.0),
            0.0,
            0.0,
            IterationCount::Infinite,
            false,
        );
        let value = animation.update_and_get_property(0.1).unwrap();
        assert_eq!(value.value.as_number(), Some(3.0));
        assert!(animation.is_complete());
    }

    #[test]
    fn test_unit_mismatch_is_rejected() {
        let mut animation = number_animation(1.0, IterationCount::Count(1), false);
        let err = animation
            .add_key(
                2.0,
                &Property::new(4.0_f32, Unit::Px),
                &ElementBox::default(),
                EasingFunction::Linear,
                false,
            )
            .unwrap_err();
        assert_eq!(
            err,
            AnimationError::UnitMismatch {
                expected: Unit::Number,
                found: Unit::Px
            }
        );
        assert_eq!(animation.keys().len(), 2);
    }

    #[test]
    fn test_key_out_of_order_is_rejected() {
        let mut animation = number_animation(1.0, IterationCount::Count(1), false);
        let err = animation
            .add_key(0.5, &Property::number(1.0), &ElementBox::default(), EasingFunction::Linear, false)
            .unwrap_err();
        assert_eq!(err, AnimationError::KeyOutOfOrder { time: 0.5, previous: 1.0 });
        assert_eq!(animation.keys().len(), 2);
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mut animation = number_animation(1.0, IterationCount::Count(1), false);
        let colour = Property::new(Srgba::new(1u8, 2, 3, 255), Unit::Number);
        let err = animation
            .add_key(2.0, &colour, &ElementBox::default(), EasingFunction::Linear, false)
            .unwrap_err();
        assert!(matches!(err, AnimationError::KindMismatch { .. }));
    }

    #[test]
    fn test_invalid_animation() {
        let mut animation = ElementAnimation::new(
            "width",
            ElementAnimationOrigin::User,
            &Property::new(PropertyValue::Keyword("auto".into()), Unit::Keyword),
            0.0,
            1.0,
            IterationCount::Count(1),
            false,
        );
        assert!(!animation.is_valid());

        let key = Property::new(PropertyValue::Keyword("1".into()), Unit::Keyword);
        assert_eq!(
            animation.add_key(1.0, &key, &ElementBox::default(), EasingFunction::Linear, false),
            Err(AnimationError::InvalidAnimation)
        );
        assert!(animation.update_and_get_property(0.5).is_none());
    }

    #[test]
    fn test_integer_values_are_coerced() {
        let mut animation = ElementAnimation::new(
            "z-index",
            ElementAnimationOrigin::User,
            &Property::new(0, Unit::Number),
            0.0,
            1.0,
            IterationCount::Count(1),
            false,
        );
        animation
            .add_key(1.0, &Property::new(4, Unit::Number), &ElementBox::default(), EasingFunction::Linear, false)
            .unwrap();
        assert!(approx_eq(value_at(&mut animation, 0.5), 2.0));
    }

    #[test]
    fn test_extend_duration() {
        let mut animation = number_animation(1.0, IterationCount::Count(1), false);
        animation
            .add_key(3.0, &Property::number(30.0), &ElementBox::default(), EasingFunction::Linear, true)
            .unwrap();
        assert_eq!(animation.duration(), 3.0);
        assert!(approx_eq(value_at(&mut animation, 2.0), 20.0));
    }

    #[test]
    fn test_tween_of_upper_key_is_applied() {
        let mut animation = ElementAnimation::new(
            "opacity",
            ElementAnimationOrigin::Animation,
            &Property::number(0.0),
            0.0,
            1.0,
            IterationCount::Count(1),
            false,
        );
        let ease_in = EasingFunction::tween(TweenCurve::Quadratic, TweenDirection::In);
        animation
            .add_key(1.0, &Property::number(10.0), &ElementBox::default(), ease_in, false)
            .unwrap();

        assert!(approx_eq(value_at(&mut animation, 0.5), 2.5));
        assert!(approx_eq(animation.interpolation_factor(), 0.5));
    }

    #[test]
    fn test_keys_closer_than_epsilon() {
        let mut animation = number_animation(1.0, IterationCount::Count(1), false);
        animation
            .add_key(1.0005, &Property::number(20.0), &ElementBox::default(), EasingFunction::Linear, true)
            .unwrap();
        // Past the key at 1.0 the bracket (1.0, 1.0005) is too narrow to blend.
        assert!(approx_eq(value_at(&mut animation, 1.0002), 10.0));
    }

    #[test]
    fn test_transform_keys_are_reconciled() {
        let element = ElementBox::new(200.0, 100.0);
        let start = Transform::new().with(TransformPrimitive::scale(1.0, 1.0));
        let end = Transform::new()
            .with(TransformPrimitive::translate(NumericValue::percent(50.0), NumericValue::px(0.0)))
            .with(TransformPrimitive::scale(3.0, 3.0));

        let mut animation = ElementAnimation::new(
            "transform",
            ElementAnimationOrigin::Animation,
            &Property::transform(start),
            0.0,
            1.0,
            IterationCount::Count(1),
            false,
        );
        animation
            .add_key(1.0, &Property::transform(end), &element, EasingFunction::Linear, false)
            .unwrap();

        let first = animation.keys()[0].value.as_transform().unwrap();
        assert_eq!(first.kinds(), vec![PrimitiveKind::Translate2D, PrimitiveKind::Scale2D]);

        let value = animation.update_and_get_property(0.5).unwrap();
        let expected = Transform::new()
            .with(TransformPrimitive::translate(NumericValue::px(50.0), NumericValue::px(0.0)))
            .with(TransformPrimitive::scale(2.0, 2.0));
        assert_eq!(value.value.as_transform(), Some(&expected));
    }

    #[test]
    fn test_failed_transform_key_rolls_back() {
        let element = ElementBox::default();
        let start = Transform::new()
            .with(TransformPrimitive::rotate(NumericValue::deg(10.0)))
            .with(TransformPrimitive::scale(1.0, 1.0));
        let degenerate = Transform::new()
            .with(TransformPrimitive::scale(0.0, 0.0))
            .with(TransformPrimitive::rotate(NumericValue::deg(10.0)));

        let mut animation = ElementAnimation::new(
            "transform",
            ElementAnimationOrigin::Animation,
            &Property::transform(start.clone()),
            0.0,
            1.0,
            IterationCount::Count(1),
            false,
        );
        let err = animation
            .add_key(1.0, &Property::transform(degenerate), &element, EasingFunction::Linear, false)
            .unwrap_err();

        assert_eq!(err, AnimationError::Degenerate);
        assert_eq!(animation.keys().len(), 1);
        assert_eq!(animation.keys()[0].value, PropertyValue::Transform(start));
    }

    #[test]
    fn test_accessors() {
        let animation = ElementAnimation::new(
            "colour",
            ElementAnimationOrigin::Transition,
            &Property::colour(Srgba::new(0, 0, 0, 255)).with_specificity(7),
            0.0,
            2.0,
            IterationCount::Count(1),
            false,
        );
        assert_eq!(animation.property(), "colour");
        assert_eq!(animation.unit(), Unit::Colour);
        assert_eq!(animation.duration(), 2.0);
        assert!(animation.is_transition());
        assert_eq!(animation.origin(), ElementAnimationOrigin::Transition);
        assert!(!animation.is_complete());
        assert_eq!(animation.interpolation_factor(), 0.0);
    }
}
