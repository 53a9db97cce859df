#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Polynomial easing curves that drive every timed animation in the runtime.
//!
//! Both families map an elapsed time and a duration onto `[0, 1]`. The
//! elapsed time is clamped into `[0, duration]` first, so callers may pass
//! timers that have already run past the end of their animation. Curves are
//! parameterised by a compile-time polynomial order.
//!
//! Invalid arguments (a `NaN` anywhere, or a negative duration) are
//! programming errors and panic. A zero duration is treated as an animation
//! that has already completed and yields `1.0`.

use std::time::Duration;

/// Accelerating curve `(t / d) ^ ORDER`.
///
/// # Panics
///
/// Panics when `ORDER` is zero, when `duration` is negative or not finite,
/// or when `elapsed` is `NaN`.
#[must_use]
pub fn ease_in<const ORDER: u32>(elapsed: f32, duration: f32) -> f32 {
    let progress = progress::<ORDER>(elapsed, duration);
    power::<ORDER>(progress)
}

/// Decelerating curve `1 - (1 - t / d) ^ ORDER`.
///
/// # Panics
///
/// Panics under the same conditions as [`ease_in`].
#[must_use]
pub fn ease_out<const ORDER: u32>(elapsed: f32, duration: f32) -> f32 {
    let progress = progress::<ORDER>(elapsed, duration);
    1.0 - power::<ORDER>(1.0 - progress)
}

/// [`ease_in`] over timer durations, evaluated in milliseconds.
#[must_use]
pub fn ease_in_over<const ORDER: u32>(elapsed: Duration, duration: Duration) -> f32 {
    ease_in::<ORDER>(millis(elapsed), millis(duration))
}

/// [`ease_out`] over timer durations, evaluated in milliseconds.
#[must_use]
pub fn ease_out_over<const ORDER: u32>(elapsed: Duration, duration: Duration) -> f32 {
    ease_out::<ORDER>(millis(elapsed), millis(duration))
}

/// Hermite smoothstep between two edges, clamped to `[0, 1]`.
///
/// # Panics
///
/// Panics when any argument is `NaN`.
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    assert!(
        !edge0.is_nan() && !edge1.is_nan() && !x.is_nan(),
        "smoothstep received NaN"
    );
    if edge1 == edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Scales a unit curve value onto an 8-bit channel.
#[must_use]
pub fn to_channel(value: f32, max: u8) -> u8 {
    (value.clamp(0.0, 1.0) * f32::from(max)).round() as u8
}

/// Converts a timer to fractional milliseconds.
#[must_use]
pub fn millis(duration: Duration) -> f32 {
    duration.as_secs_f32() * 1000.0
}

fn progress<const ORDER: u32>(elapsed: f32, duration: f32) -> f32 {
    assert!(ORDER >= 1, "easing order must be at least one");
    assert!(
        duration.is_finite() && duration >= 0.0,
        "easing duration must be finite and non-negative, got {duration}"
    );
    assert!(!elapsed.is_nan(), "easing elapsed time is NaN");

    if duration == 0.0 {
        return 1.0;
    }
    elapsed.clamp(0.0, duration) / duration
}

fn power<const ORDER: u32>(base: f32) -> f32 {
    (0..ORDER).fold(1.0, |acc, _| acc * base)
}
