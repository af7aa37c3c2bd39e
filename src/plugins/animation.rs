use crate::components::{
    AnimationState, FacingDirection, Motion, Player, Position, RunAnimation, Velocity, PLAYER_SIZE,
};
use crate::enums::{AnimationType, MotionState, RunPhase};
use crate::plugins::physics::PhysicsConfig;
use bevy::prelude::*;
use bevy::sprite::Anchor;

/// Charge bar height in pixels
const CHARGE_BAR_HEIGHT: f32 = 5.0;

/// Vertical offset of the charge bar above the player
const CHARGE_BAR_OFFSET: f32 = 10.0;

/// Player sprite textures, one per logical animation state
#[derive(Resource, Clone, Debug)]
pub struct PlayerSprites {
    pub idle: Handle<Image>,
    pub prepare: Handle<Image>,
    pub jump: Handle<Image>,
    pub fall: Handle<Image>,
    pub knockback: Handle<Image>,
    pub run: [Handle<Image>; 3],
}

/// Marker component for the jump charge bar
#[derive(Component)]
struct ChargeBar;

/// Plugin for the sprite state machine and transform sync
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (load_player_sprites_system, spawn_charge_bar_system));
        app.add_systems(
            Update,
            (
                update_animation_state_system,
                apply_sprite_system,
                sync_transform_system,
                update_charge_bar_system,
            )
                .chain(),
        );
    }
}

/// Pick the logical animation for the current motion state. Knockback
/// overrides everything while airborne; the rising/falling split follows
/// the sign of vertical velocity.
pub fn select_animation(state: &MotionState, velocity: &Velocity) -> AnimationType {
    if state.knockback() {
        AnimationType::Knockback
    } else if state.is_charging() {
        AnimationType::Charging
    } else {
        match state {
            MotionState::Jumping { .. } if velocity.y < 0.0 => AnimationType::Jumping,
            MotionState::Jumping { .. } | MotionState::Falling { .. } => AnimationType::Falling,
            MotionState::Grounded if velocity.x != 0.0 => AnimationType::Running,
            _ => AnimationType::Idle,
        }
    }
}

/// Queue all player sprite textures. Bevy falls back to a plain quad for
/// images that fail to load, so missing art never breaks the simulation.
fn load_player_sprites_system(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(PlayerSprites {
        idle: asset_server.load("images/player/idle.png"),
        prepare: asset_server.load("images/player/prepare.png"),
        jump: asset_server.load("images/player/jump.png"),
        fall: asset_server.load("images/player/fall.png"),
        knockback: asset_server.load("images/player/knockback.png"),
        run: [
            asset_server.load("images/player/run1.png"),
            asset_server.load("images/player/run2.png"),
            asset_server.load("images/player/run3.png"),
        ],
    });
}

fn spawn_charge_bar_system(mut commands: Commands) {
    commands.spawn((
        ChargeBar,
        SpriteBundle {
            sprite: Sprite {
                color: Color::WHITE,
                custom_size: Some(Vec2::new(0.0, CHARGE_BAR_HEIGHT)),
                anchor: Anchor::CenterLeft,
                ..default()
            },
            visibility: Visibility::Hidden,
            transform: Transform::from_xyz(0.0, 0.0, 1.0),
            ..default()
        },
    ));
}

/// Update the logical animation state from motion
fn update_animation_state_system(
    mut query: Query<(&mut AnimationState, &Motion, &Velocity), With<Player>>,
) {
    for (mut animation, motion, velocity) in query.iter_mut() {
        let current = select_animation(&motion.state, velocity);
        if animation.current != current {
            animation.current = current;
        }
    }
}

/// Swap the sprite texture to match the animation state and flip it to the
/// facing direction
#[allow(clippy::type_complexity)]
fn apply_sprite_system(
    sprites: Option<Res<PlayerSprites>>,
    mut query: Query<
        (
            &AnimationState,
            &RunAnimation,
            &FacingDirection,
            &mut Handle<Image>,
            &mut Sprite,
        ),
        With<Player>,
    >,
) {
    let Some(sprites) = sprites else {
        return;
    };

    for (animation, run, facing, mut texture, mut sprite) in query.iter_mut() {
        let handle = match animation.current {
            AnimationType::Idle => &sprites.idle,
            AnimationType::Charging => &sprites.prepare,
            AnimationType::Jumping => &sprites.jump,
            AnimationType::Falling => &sprites.fall,
            AnimationType::Knockback => &sprites.knockback,
            AnimationType::Running => match run.phase {
                RunPhase::Run1 => &sprites.run[0],
                RunPhase::Run2 => &sprites.run[1],
                RunPhase::Run3 => &sprites.run[2],
            },
        };
        if *texture != *handle {
            *texture = handle.clone();
        }
        sprite.flip_x = *facing == FacingDirection::Left;
    }
}

/// Copy the physics position into the render transform, converting from
/// the top-left y-down playfield to bevy's centered y-up coordinates
fn sync_transform_system(
    config: Res<PhysicsConfig>,
    mut query: Query<(&Position, &mut Transform), With<Player>>,
) {
    for (position, mut transform) in query.iter_mut() {
        let center_x = position.x + PLAYER_SIZE / 2.0;
        let center_y = position.y + PLAYER_SIZE / 2.0;
        transform.translation.x = center_x - config.window_width / 2.0;
        transform.translation.y = config.window_height / 2.0 - center_y;
    }
}

/// Show a bar above the player scaled by the accumulated jump power
#[allow(clippy::type_complexity)]
fn update_charge_bar_system(
    config: Res<PhysicsConfig>,
    player_query: Query<(&Position, &Motion), With<Player>>,
    mut bar_query: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<ChargeBar>>,
) {
    let Ok((position, motion)) = player_query.get_single() else {
        return;
    };

    for (mut sprite, mut transform, mut visibility) in bar_query.iter_mut() {
        if let MotionState::Charging { power, .. } = motion.state {
            *visibility = Visibility::Visible;
            let width = power / config.max_jump_power * PLAYER_SIZE;
            sprite.custom_size = Some(Vec2::new(width, CHARGE_BAR_HEIGHT));
            transform.translation.x = position.x - config.window_width / 2.0;
            transform.translation.y = config.window_height / 2.0 - (position.y - CHARGE_BAR_OFFSET);
        } else {
            *visibility = Visibility::Hidden;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockback_overrides_airborne_sprites() {
        let state = MotionState::Falling {
            drift: -1.0,
            knockback: true,
        };
        let velocity = Velocity::new(0.0, 12.0);
        assert_eq!(select_animation(&state, &velocity), AnimationType::Knockback);
    }

    #[test]
    fn test_charging_sprite() {
        let state = MotionState::Charging {
            power: 10.0,
            direction: 0.0,
        };
        let velocity = Velocity::default();
        assert_eq!(select_animation(&state, &velocity), AnimationType::Charging);
    }

    #[test]
    fn test_jump_sprite_while_rising_fall_sprite_past_apex() {
        let state = MotionState::Jumping {
            drift: 1.0,
            knockback: false,
        };
        assert_eq!(
            select_animation(&state, &Velocity::new(0.0, -15.0)),
            AnimationType::Jumping
        );
        assert_eq!(
            select_animation(&state, &Velocity::new(0.0, 3.0)),
            AnimationType::Falling
        );
    }

    #[test]
    fn test_falling_sprite() {
        let state = MotionState::Falling {
            drift: 0.0,
            knockback: false,
        };
        assert_eq!(
            select_animation(&state, &Velocity::new(0.0, 8.0)),
            AnimationType::Falling
        );
    }

    #[test]
    fn test_grounded_running_and_idle() {
        let state = MotionState::Grounded;
        assert_eq!(
            select_animation(&state, &Velocity::new(5.0, 0.6)),
            AnimationType::Running
        );
        assert_eq!(
            select_animation(&state, &Velocity::new(0.0, 0.6)),
            AnimationType::Idle
        );
    }
}
