use bevy::math::{
    Vec2,
    curve::{Curve, EaseFunction, EasingCurve},
};
use rand::Rng;

use crate::{
    asset::{TearBounce, TearEffectAsset, TearFall},
    spawner::{DOWN, ScheduledTear},
};

/// Where a droplet is drawn and how, in surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropletPose {
    /// Droplet center.
    pub position: Vec2,
    /// Non-uniform scale applied to the droplet body.
    pub scale: Vec2,
    /// Tilt in degrees, clockwise on screen.
    pub rotation: f32,
    /// Opacity from `0.0` to `1.0`.
    pub opacity: f32,
}

/// Lifecycle phase of a tear. Phases only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TearPhase {
    /// Falling toward the impact point.
    Falling,
    /// Squashing and sliding off the impact surface.
    Bouncing {
        /// Clock time the bounce started at. `None` until the frame after impact.
        started_at: Option<f32>,
        /// Pose at the moment of impact.
        entry: DropletPose,
        /// Unit direction of the slide.
        direction: Vec2,
    },
    /// Finished; the visual must be released.
    Disposed,
}

/// Outcome of one [`TearParticle::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TearStep {
    /// Still animating; draw the pose.
    Moved(DropletPose),
    /// Reached the impact point this frame and switched to bouncing.
    Impacted(DropletPose),
    /// Disposed. Returned on the transition and on every later call.
    Finished,
}

/// A single live tear.
///
/// [`advance`](Self::advance) recomputes the pose from the clock on every
/// call and never reads the frame delta.
#[derive(Debug, Clone, PartialEq)]
pub struct TearParticle {
    /// Birth position.
    pub start: Vec2,
    /// Impact position.
    pub impact: Vec2,
    /// Outward unit normal at the impact point.
    pub impact_normal: Vec2,
    /// Droplet width.
    pub size: f32,
    /// Droplet height.
    pub height: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Nominal fall time in seconds.
    pub fall_duration: f32,
    /// Horizontal speed that carries the tear from its start x to its impact x.
    pub drift_velocity: f32,
    /// Wobble amplitude in units.
    pub wobble_amplitude: f32,
    /// Wobble frequency in hertz.
    pub wobble_frequency: f32,
    /// Fixed tilt in degrees.
    pub base_rotation: f32,
    /// Distance slid after impact.
    pub slide_distance: f32,
    /// Clock time of birth, in seconds.
    pub born_at: f32,
    phase: TearPhase,
}

impl TearParticle {
    /// Brings a scheduled tear to life, drawing its physical parameters from `settings`.
    pub fn spawn(
        scheduled: &ScheduledTear,
        born_at: f32,
        settings: &TearEffectAsset,
        rng: &mut impl Rng,
    ) -> Self {
        let fall = &settings.fall;
        let size = fall.size.sample(rng);
        let gravity = fall.gravity.sample(rng);
        let fall_duration = fall.duration.sample(rng);
        let wobble_frequency = fall.wobble_frequency.sample(rng);
        let wobble_amplitude = fall.wobble_amplitude.sample(rng);
        let base_rotation = fall.base_rotation.sample(rng);
        let slide_distance = settings.bounce.slide_distance.sample(rng);

        Self {
            start: scheduled.start,
            impact: scheduled.impact.point,
            impact_normal: scheduled.impact.normal.try_normalize().unwrap_or(DOWN),
            size,
            height: size * fall.aspect_ratio,
            gravity,
            fall_duration,
            drift_velocity: drift_velocity(scheduled.start.x, scheduled.impact.point.x, fall_duration),
            wobble_amplitude,
            wobble_frequency,
            base_rotation,
            slide_distance,
            born_at,
            phase: TearPhase::Falling,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &TearPhase {
        &self.phase
    }

    /// Returns `true` once the tear has been disposed.
    pub fn is_disposed(&self) -> bool {
        matches!(self.phase, TearPhase::Disposed)
    }

    /// Position after `t` seconds of fall, wobble included.
    pub fn fall_position(&self, t: f32) -> Vec2 {
        Vec2::new(
            self.start.x
                + self.drift_velocity * t
                + wobble_offset(self.wobble_amplitude, self.wobble_frequency, t),
            self.start.y + fall_offset(self.gravity, t),
        )
    }

    /// Latest time at which the tear can still be alive, relative to its birth.
    pub fn max_lifetime(&self, settings: &TearEffectAsset) -> f32 {
        settings.fall.fade_in + self.fall_duration + settings.bounce.total_duration()
    }

    /// Advances the tear to clock time `now`.
    pub fn advance(&mut self, now: f32, settings: &TearEffectAsset) -> TearStep {
        match self.phase {
            TearPhase::Falling => self.advance_fall(now, &settings.fall, &settings.bounce),
            TearPhase::Bouncing {
                started_at,
                entry,
                direction,
            } => {
                let started_at = started_at.unwrap_or(now);
                self.phase = TearPhase::Bouncing {
                    started_at: Some(started_at),
                    entry,
                    direction,
                };
                self.advance_bounce(now - started_at, entry, direction, &settings.bounce)
            }
            TearPhase::Disposed => TearStep::Finished,
        }
    }

    fn advance_fall(&mut self, now: f32, fall: &TearFall, bounce: &TearBounce) -> TearStep {
        let age = (now - self.born_at).max(0.0);

        if age < fall.fade_in {
            return TearStep::Moved(DropletPose {
                position: self.start,
                scale: Vec2::ONE,
                rotation: self.base_rotation,
                opacity: ease(EaseFunction::QuadraticOut, age / fall.fade_in),
            });
        }

        let progress = (age - fall.fade_in) / self.fall_duration;
        let opacity = 1.0 - ease(EaseFunction::QuadraticIn, progress);
        let stretch = Vec2::new(1.0, 1.0 + fall.stretch_rate * age);
        let position = self.fall_position(age);

        if position.y >= self.impact.y {
            let entry = DropletPose {
                position: self.impact,
                scale: stretch,
                rotation: self.base_rotation,
                opacity,
            };
            self.phase = TearPhase::Bouncing {
                started_at: None,
                entry,
                direction: runoff_direction(self.impact_normal, bounce.downhill_bias),
            };
            return TearStep::Impacted(entry);
        }

        if progress >= 1.0 {
            self.phase = TearPhase::Disposed;
            return TearStep::Finished;
        }

        TearStep::Moved(DropletPose {
            position,
            scale: stretch,
            rotation: self.base_rotation,
            opacity,
        })
    }

    fn advance_bounce(
        &mut self,
        elapsed: f32,
        entry: DropletPose,
        direction: Vec2,
        bounce: &TearBounce,
    ) -> TearStep {
        if elapsed >= bounce.total_duration() {
            self.phase = TearPhase::Disposed;
            return TearStep::Finished;
        }

        let squash = ease(EaseFunction::CubicIn, elapsed / bounce.squash_duration);
        let slide = ease(EaseFunction::CubicOut, elapsed / bounce.slide_duration);
        let fade = ease(
            EaseFunction::QuadraticOut,
            (elapsed - bounce.fade_delay) / bounce.fade_duration,
        );
        let tilt = ease(EaseFunction::QuadraticOut, elapsed / bounce.tilt_duration);

        TearStep::Moved(DropletPose {
            position: entry.position + direction * self.slide_distance * slide,
            scale: entry.scale.lerp(bounce.squash, squash),
            rotation: entry.rotation + direction.x * bounce.tilt * tilt,
            opacity: entry.opacity * (1.0 - fade),
        })
    }
}

/// Vertical distance covered after `t` seconds of free fall: `½·g·t²`.
pub fn fall_offset(gravity: f32, t: f32) -> f32 {
    0.5 * gravity * t * t
}

/// Horizontal sway after `t` seconds: `sin(t·f·2π)·A`.
pub fn wobble_offset(amplitude: f32, frequency: f32, t: f32) -> f32 {
    (t * frequency * std::f32::consts::TAU).sin() * amplitude
}

/// Constant horizontal speed that covers `start_x → impact_x` in `fall_duration`.
pub fn drift_velocity(start_x: f32, impact_x: f32, fall_duration: f32) -> f32 {
    if fall_duration <= 0.0 {
        return 0.0;
    }
    (impact_x - start_x) / fall_duration
}

/// Slide direction off a surface with outward normal `normal`.
///
/// The vertical component is forced downward and biased so that tears always
/// run off downhill, even when they strike the very top of a rim.
pub fn runoff_direction(normal: Vec2, downhill_bias: f32) -> Vec2 {
    Vec2::new(normal.x, normal.y.abs() + downhill_bias).normalize_or(DOWN)
}

fn ease(function: EaseFunction, t: f32) -> f32 {
    EasingCurve::new(0.0, 1.0, function).sample_clamped(t.clamp(0.0, 1.0))
}
