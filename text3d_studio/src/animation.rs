//! Per-frame motion presets for the text mesh.
//!
//! The offset is a pure function of the elapsed time and the mode, so a frame
//! never depends on what the previous frame did. Switching modes restarts the
//! clock, which puts the mesh back at the identity transform.

use bevy::prelude::*;

use crate::config::TextConfig;
use crate::text_mesh::StudioText;

pub const BOUNCE_SPEED: f32 = 3.0;
pub const BOUNCE_AMPLITUDE: f32 = 2.0;
pub const SPIN_SPEED: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationMode {
    #[default]
    None,
    Bounce,
    Spin,
}

impl AnimationMode {
    pub const ALL: [AnimationMode; 3] =
        [AnimationMode::None, AnimationMode::Bounce, AnimationMode::Spin];

    pub fn label(self) -> &'static str {
        match self {
            AnimationMode::None => "None",
            AnimationMode::Bounce => "Bounce",
            AnimationMode::Spin => "Spin",
        }
    }

    pub fn next(self) -> AnimationMode {
        match self {
            AnimationMode::None => AnimationMode::Bounce,
            AnimationMode::Bounce => AnimationMode::Spin,
            AnimationMode::Spin => AnimationMode::None,
        }
    }

    pub fn prev(self) -> AnimationMode {
        match self {
            AnimationMode::None => AnimationMode::Spin,
            AnimationMode::Bounce => AnimationMode::None,
            AnimationMode::Spin => AnimationMode::Bounce,
        }
    }
}

/// Seconds spent in the current animation mode.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    mode: AnimationMode,
    elapsed: f32,
}

impl AnimationClock {
    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reset(&mut self, mode: AnimationMode) {
        self.mode = mode;
        self.elapsed = 0.0;
    }

    /// Restarts on a mode change, otherwise advances by `delta` seconds.
    pub fn tick(&mut self, mode: AnimationMode, delta: f32) {
        if mode != self.mode {
            bevy::log::debug!("Animation {:?} -> {:?}", self.mode, mode);
            self.reset(mode);
        } else {
            self.elapsed += delta;
        }
    }

    pub fn offset(&self) -> Transform {
        animation_offset(self.mode, self.elapsed)
    }
}

/// Translation and rotation applied on top of the resting text transform.
pub fn animation_offset(mode: AnimationMode, elapsed: f32) -> Transform {
    match mode {
        AnimationMode::None => Transform::IDENTITY,
        AnimationMode::Bounce => Transform::from_xyz(
            0.0,
            (elapsed * BOUNCE_SPEED).sin().abs() * BOUNCE_AMPLITUDE,
            0.0,
        ),
        // angles past 2π wrap on their own
        AnimationMode::Spin => {
            Transform::from_rotation(Quat::from_rotation_y(spin_angle(elapsed)))
        }
    }
}

pub fn spin_angle(elapsed: f32) -> f32 {
    elapsed * SPIN_SPEED
}

pub fn tick_animation_clock(
    time: Res<Time>,
    config: Res<TextConfig>,
    mut clock: ResMut<AnimationClock>,
) {
    clock.tick(config.animation, time.delta_seconds());
}

pub fn apply_animation_offset(
    clock: Res<AnimationClock>,
    mut query: Query<&mut Transform, With<StudioText>>,
) {
    let offset = clock.offset();
    for mut transform in query.iter_mut() {
        transform.translation = offset.translation;
        transform.rotation = offset.rotation;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn animation_app(mode: AnimationMode) -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<AnimationClock>()
            .insert_resource(TextConfig {
                animation: mode,
                ..Default::default()
            })
            .add_systems(
                Update,
                (tick_animation_clock, apply_animation_offset).chain(),
            );
        app.world_mut()
            .spawn((StudioText, Transform::from_scale(Vec3::splat(0.5))));
        app
    }

    fn text_transform(app: &mut App) -> Transform {
        let mut query = app.world_mut().query_filtered::<&Transform, With<StudioText>>();
        *query.single(app.world())
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    #[test]
    fn none_is_identity() {
        for t in [0.0, 0.3, 10.0, 1e4] {
            assert_eq!(animation_offset(AnimationMode::None, t), Transform::IDENTITY);
        }
    }

    #[test]
    fn bounce_stays_within_amplitude() {
        let mut t = 0.0;
        while t < 50.0 {
            let offset = animation_offset(AnimationMode::Bounce, t);
            assert!((0.0..=BOUNCE_AMPLITUDE).contains(&offset.translation.y));
            assert_eq!(offset.translation.x, 0.0);
            assert_eq!(offset.translation.z, 0.0);
            assert_eq!(offset.rotation, Quat::IDENTITY);
            t += 0.013;
        }
        let peak = std::f32::consts::FRAC_PI_2 / BOUNCE_SPEED;
        let offset = animation_offset(AnimationMode::Bounce, peak);
        assert!((offset.translation.y - BOUNCE_AMPLITUDE).abs() < 1e-5);
    }

    #[test]
    fn spin_grows_with_time() {
        let mut last = spin_angle(0.0);
        for step in 1..200 {
            let angle = spin_angle(step as f32 * 0.05);
            assert!(angle > last);
            last = angle;
        }
        assert_eq!(spin_angle(1.0), 3.0);
        let offset = animation_offset(AnimationMode::Spin, 1.0);
        assert!(offset.rotation.abs_diff_eq(Quat::from_rotation_y(3.0), 1e-6));
        assert_eq!(offset.translation, Vec3::ZERO);
    }

    #[test]
    fn offset_is_a_pure_function() {
        for mode in AnimationMode::ALL {
            assert_eq!(animation_offset(mode, 2.5), animation_offset(mode, 2.5));
        }
    }

    #[test]
    fn mode_change_resets_clock() {
        let mut clock = AnimationClock::default();
        clock.tick(AnimationMode::Bounce, 0.0);
        clock.tick(AnimationMode::Bounce, 0.7);
        assert_eq!(clock.elapsed(), 0.7);

        clock.tick(AnimationMode::Spin, 0.4);
        assert_eq!(clock.mode(), AnimationMode::Spin);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.offset(), Transform::IDENTITY);
    }

    #[test]
    fn spin_after_one_second_rotates_three_radians() {
        let mut app = animation_app(AnimationMode::None);
        app.update();

        app.world_mut().resource_mut::<TextConfig>().animation = AnimationMode::Spin;
        advance(&mut app, 0.25);
        // switching frame starts from zero regardless of the frame delta
        assert_eq!(app.world().resource::<AnimationClock>().elapsed(), 0.0);
        assert_eq!(text_transform(&mut app).rotation, Quat::IDENTITY);

        advance(&mut app, 1.0);
        let transform = text_transform(&mut app);
        assert!(transform
            .rotation
            .abs_diff_eq(Quat::from_rotation_y(3.0), 1e-5));
        // scale belongs to the renderer
        assert_eq!(transform.scale, Vec3::splat(0.5));
    }

    #[test]
    fn leaving_bounce_returns_to_rest() {
        let mut app = animation_app(AnimationMode::Bounce);
        app.update();
        advance(&mut app, 0.4);
        assert!(text_transform(&mut app).translation.y > 0.0);

        app.world_mut().resource_mut::<TextConfig>().animation = AnimationMode::None;
        advance(&mut app, 0.4);
        let transform = text_transform(&mut app);
        assert_eq!(transform.translation, Vec3::ZERO);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }
}
