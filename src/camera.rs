use std::f32::consts::TAU;

use bevy::{
    prelude::*,
    math::curve::{
        Curve,
        EaseFunction,
        EasingCurve,
    },
};
use bevy_panorbit_camera::PanOrbitCamera;


/// Camera position before the intro takes over.
pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(34.0, 16.0, -20.0);
pub const CAMERA_FOV_DEGREES: f32 = 35.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 100.0;


#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Reflect,
)]
pub enum IntroPhase {
    /// Orbit interaction off, camera parked at the start position.
    #[default]
    Disabled,
    Animating,
    /// Terminal. Orbit interaction on with limits applied.
    Enabled,
}


#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct IntroSettings {
    pub start: Vec3,
    pub target: Vec3,
    /// Point the camera keeps looking at, and the orbit focus afterwards.
    pub focus: Vec3,
    /// Seconds.
    pub duration: f32,
    /// Seconds spent at `start` before moving.
    pub delay: f32,
    pub easing: EaseFunction,
}

impl Default for IntroSettings {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, -1.0, 0.0),
            target: Vec3::new(2.0, -0.4, 6.1),
            focus: Vec3::ZERO,
            duration: 6.5,
            delay: 1.0,
            easing: EaseFunction::QuarticInOut,
        }
    }
}

impl IntroSettings {
    pub fn without_delay(mut self) -> Self {
        self.delay = 0.0;
        self
    }
}


#[derive(Clone, Debug)]
struct IntroTween {
    curve: EasingCurve<Vec3>,
    delay: f32,
    duration: f32,
    elapsed: f32,
}

impl IntroTween {
    fn new(settings: &IntroSettings) -> Self {
        Self {
            curve: EasingCurve::new(settings.start, settings.target, settings.easing),
            delay: settings.delay.max(0.0),
            duration: settings.duration.max(0.0),
            elapsed: 0.0,
        }
    }

    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }

        ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    fn position(&self) -> Vec3 {
        self.curve.sample_clamped(self.progress())
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntroEvent {
    Idle,
    Moved(Vec3),
    /// Reported exactly once, with the final camera position.
    Completed(Vec3),
}


/// One-shot eased camera flight, `Disabled -> Animating -> Enabled`.
///
/// The tween is owned by the animator and dropped on completion; the phase never goes
/// back.
#[derive(Component, Clone, Debug)]
pub struct CameraIntro {
    settings: IntroSettings,
    phase: IntroPhase,
    tween: Option<IntroTween>,
    position: Vec3,
}

impl CameraIntro {
    pub fn new(settings: IntroSettings) -> Self {
        Self {
            settings,
            phase: IntroPhase::Disabled,
            tween: None,
            position: settings.start,
        }
    }

    pub fn settings(&self) -> &IntroSettings {
        &self.settings
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn interaction_enabled(&self) -> bool {
        self.phase == IntroPhase::Enabled
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Snaps to the start position and begins animating. No-op unless `Disabled`.
    pub fn start(&mut self) -> Option<Vec3> {
        if self.phase != IntroPhase::Disabled {
            return None;
        }

        self.phase = IntroPhase::Animating;
        self.tween = Some(IntroTween::new(&self.settings));
        self.position = self.settings.start;

        Some(self.position)
    }

    pub fn advance(&mut self, delta_secs: f32) -> IntroEvent {
        let Some(tween) = self.tween.as_mut() else {
            return IntroEvent::Idle;
        };

        tween.elapsed += delta_secs.max(0.0);

        if tween.finished() {
            self.tween = None;
            self.phase = IntroPhase::Enabled;
            self.position = self.settings.target;
            return IntroEvent::Completed(self.position);
        }

        self.position = tween.position();
        IntroEvent::Moved(self.position)
    }
}


/// Orbit behaviour applied once the intro ends.
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct OrbitLimits {
    /// Fraction of orbit velocity lost per 60 Hz frame.
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub auto_rotate: bool,
    /// 2.0 is one turn every 30 seconds.
    pub auto_rotate_speed: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            damping_factor: 0.04,
            min_distance: 2.0,
            max_distance: 25.0,
            enable_rotate: true,
            enable_zoom: true,
            auto_rotate: true,
            auto_rotate_speed: 2.0,
        }
    }
}

impl OrbitLimits {
    pub fn apply(&self, orbit: &mut PanOrbitCamera) {
        let smoothness = damping_to_smoothness(self.damping_factor);

        orbit.orbit_smoothness = smoothness;
        orbit.zoom_smoothness = smoothness;
        orbit.pan_smoothness = smoothness;

        orbit.zoom_lower_limit = self.min_distance;
        orbit.zoom_upper_limit = Some(self.max_distance);

        if !self.enable_rotate {
            orbit.orbit_sensitivity = 0.0;
        }
        if !self.enable_zoom {
            orbit.zoom_sensitivity = 0.0;
        }

        orbit.enabled = true;
    }

    /// Radians per second.
    pub fn auto_rotate_rate(&self) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed
    }
}

/// Maps per-frame damping onto panorbit smoothness, which decays as `smoothness^7` per second.
pub fn damping_to_smoothness(damping_factor: f32) -> f32 {
    let per_second = (1.0 - damping_factor.clamp(0.0, 1.0)).powf(60.0);
    per_second.powf(1.0 / 7.0)
}

pub fn orbit_camera(focus: Vec3, limits: &OrbitLimits) -> PanOrbitCamera {
    let mut orbit = PanOrbitCamera {
        focus,
        target_focus: focus,
        ..default()
    };
    limits.apply(&mut orbit);
    orbit
}


pub fn start_camera_intro(
    mut cameras: Query<
        (&mut CameraIntro, &mut Transform),
        Added<CameraIntro>,
    >,
) {
    for (mut intro, mut transform) in &mut cameras {
        if let Some(start) = intro.start() {
            let focus = intro.settings().focus;
            *transform = Transform::from_translation(start).looking_at(focus, Vec3::Y);
            debug!("camera intro started at {start}");
        }
    }
}

pub fn animate_camera_intro(
    mut commands: Commands,
    time: Res<Time>,
    mut cameras: Query<(
        Entity,
        &mut CameraIntro,
        &mut Transform,
        Option<&OrbitLimits>,
    )>,
) {
    for (entity, mut intro, mut transform, limits) in &mut cameras {
        let focus = intro.settings().focus;

        match intro.advance(time.delta_secs()) {
            IntroEvent::Idle => {}
            IntroEvent::Moved(position) => {
                *transform = Transform::from_translation(position).looking_at(focus, Vec3::Y);
            }
            IntroEvent::Completed(position) => {
                *transform = Transform::from_translation(position).looking_at(focus, Vec3::Y);

                let limits = limits.copied().unwrap_or_default();
                commands.entity(entity).insert(orbit_camera(focus, &limits));

                info!("camera intro complete, orbit controls enabled");
            }
        }
    }
}

pub fn auto_rotate(
    time: Res<Time>,
    mut cameras: Query<(&mut PanOrbitCamera, &OrbitLimits)>,
) {
    for (mut orbit, limits) in &mut cameras {
        if !orbit.enabled || !limits.auto_rotate {
            continue;
        }

        orbit.target_yaw -= limits.auto_rotate_rate() * time.delta_secs();
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_damping_means_no_smoothing() {
        assert_eq!(damping_to_smoothness(0.0), 1.0);
        assert_eq!(damping_to_smoothness(1.0), 0.0);

        let smoothness = damping_to_smoothness(0.04);
        assert!(smoothness > 0.6 && smoothness < 0.8);
    }

    #[test]
    fn limits_configure_the_orbit_camera() {
        let orbit = orbit_camera(Vec3::ZERO, &OrbitLimits::default());

        assert!(orbit.enabled);
        assert_eq!(orbit.zoom_lower_limit, 2.0);
        assert_eq!(orbit.zoom_upper_limit, Some(25.0));
    }

    #[test]
    fn zero_duration_completes_after_delay() {
        let mut intro = CameraIntro::new(IntroSettings {
            duration: 0.0,
            delay: 0.5,
            ..default()
        });
        let start = intro.start().unwrap();

        assert_eq!(intro.advance(0.25), IntroEvent::Moved(start));
        assert!(matches!(intro.advance(0.25), IntroEvent::Completed(_)));
    }
}
