use crate::components::{
    AnimationState, Collider, FacingDirection, Motion, Player, PlayerIntent, Position,
    PreviousPosition, RunAnimation, Velocity, PLAYER_SIZE,
};
use crate::enums::{ContactEvent, MotionState};
use crate::plugins::level::LevelSet;
use crate::plugins::physics::{player_physics_system, PhysicsConfig};
use bevy::prelude::*;

/// Resource holding the fixed spawn position, restored on reset
#[derive(Resource, Clone, Copy, Debug)]
pub struct PlayerSpawn {
    pub x: f32,
    pub y: f32,
}

impl Default for PlayerSpawn {
    fn default() -> Self {
        Self { x: 600.0, y: 700.0 }
    }
}

/// Plugin for player input, the jump charge state machine, and reset
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSpawn>();
        app.add_systems(Startup, spawn_player_system);
        app.add_systems(Update, process_input_system);
        app.add_systems(
            FixedUpdate,
            (reset_system, player_control_system)
                .chain()
                .before(player_physics_system),
        );
    }
}

/// Spawn the player entity with its physics and rendering components
fn spawn_player_system(mut commands: Commands, spawn: Res<PlayerSpawn>) {
    let position = Position::new(spawn.x, spawn.y);
    commands.spawn((
        Player,
        position,
        PreviousPosition(position),
        Velocity::default(),
        Motion::default(),
        FacingDirection::default(),
        RunAnimation::default(),
        Collider::player(),
        PlayerIntent::default(),
        AnimationState::default(),
        SpriteBundle {
            sprite: Sprite {
                custom_size: Some(Vec2::splat(PLAYER_SIZE)),
                ..default()
            },
            ..default()
        },
    ));
}

/// Process keyboard input and translate to PlayerIntent. Runs every frame;
/// the release and reset edges are latched until a fixed tick consumes them.
fn process_input_system(
    keyboard: Res<Input<KeyCode>>,
    mut query: Query<&mut PlayerIntent, With<Player>>,
) {
    for mut intent in query.iter_mut() {
        intent.move_left = keyboard.pressed(KeyCode::Left) || keyboard.pressed(KeyCode::A);
        intent.move_right = keyboard.pressed(KeyCode::Right) || keyboard.pressed(KeyCode::D);
        intent.jump_held = keyboard.pressed(KeyCode::Space);
        if keyboard.just_released(KeyCode::Space) {
            intent.jump_released = true;
        }
        if keyboard.just_pressed(KeyCode::R) {
            intent.reset = true;
        }
    }
}

/// One charge tick: build jump power and lock the jump direction from the
/// currently held horizontal input. Only reachable from the ground.
pub fn charge_jump(
    state: &mut MotionState,
    facing: &mut FacingDirection,
    move_left: bool,
    move_right: bool,
    config: &PhysicsConfig,
) {
    let power = match *state {
        MotionState::Charging { power, .. } => power,
        _ => 0.0,
    };
    let power = (power + config.charge_rate).min(config.max_jump_power);
    let direction = if move_left {
        *facing = FacingDirection::Left;
        -1.0
    } else if move_right {
        *facing = FacingDirection::Right;
        1.0
    } else {
        0.0
    };
    *state = MotionState::Charging { power, direction };
}

/// Release the charged jump: convert power into upward velocity and carry
/// the locked direction as airborne drift
pub fn release_jump(state: &mut MotionState, velocity: &mut Velocity) -> Option<ContactEvent> {
    if let MotionState::Charging { power, direction } = *state {
        *state = MotionState::Jumping {
            drift: direction,
            knockback: false,
        };
        velocity.y = -power;
        Some(ContactEvent::Jumped)
    } else {
        None
    }
}

/// Apply jump charge, release, and grounded horizontal intent ahead of the
/// physics tick
fn player_control_system(
    mut query: Query<
        (
            &mut PlayerIntent,
            &mut Motion,
            &mut Velocity,
            &mut FacingDirection,
        ),
        With<Player>,
    >,
    config: Res<PhysicsConfig>,
    mut contact_events: EventWriter<ContactEvent>,
) {
    for (mut intent, mut motion, mut velocity, mut facing) in query.iter_mut() {
        if intent.jump_held && !motion.state.is_airborne() {
            charge_jump(
                &mut motion.state,
                &mut facing,
                intent.move_left,
                intent.move_right,
                &config,
            );
        }

        if intent.jump_released {
            intent.jump_released = false;
            if let Some(event) = release_jump(&mut motion.state, &mut velocity) {
                contact_events.send(event);
            }
        }

        // Horizontal intent only applies on the ground; airborne motion is
        // driven by drift, and charging freezes the character in place
        velocity.x = match motion.state {
            MotionState::Grounded => {
                if intent.move_left && !intent.move_right {
                    -config.move_speed
                } else if intent.move_right && !intent.move_left {
                    config.move_speed
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };
    }
}

/// Restore the physical snapshot and rewind the level set on a reset edge
#[allow(clippy::type_complexity)]
fn reset_system(
    mut query: Query<
        (
            &mut PlayerIntent,
            &mut Position,
            &mut PreviousPosition,
            &mut Velocity,
            &mut Motion,
            &mut RunAnimation,
        ),
        With<Player>,
    >,
    mut levels: ResMut<LevelSet>,
    spawn: Res<PlayerSpawn>,
) {
    for (mut intent, mut position, mut previous, mut velocity, mut motion, mut run) in
        query.iter_mut()
    {
        if !intent.reset {
            continue;
        }
        intent.reset = false;

        *position = Position::new(spawn.x, spawn.y);
        previous.0 = *position;
        *velocity = Velocity::default();
        *motion = Motion::default();
        *run = RunAnimation::default();
        // Facing deliberately survives a reset
        levels.rewind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_accumulates_and_clamps() {
        let config = PhysicsConfig::default();
        let mut state = MotionState::Grounded;
        let mut facing = FacingDirection::Right;

        charge_jump(&mut state, &mut facing, false, false, &config);
        assert_eq!(
            state,
            MotionState::Charging {
                power: config.charge_rate,
                direction: 0.0,
            }
        );

        // Repeated charging never exceeds the cap
        for _ in 0..200 {
            charge_jump(&mut state, &mut facing, false, false, &config);
        }
        assert_eq!(
            state,
            MotionState::Charging {
                power: config.max_jump_power,
                direction: 0.0,
            }
        );
    }

    #[test]
    fn test_release_at_cap_yields_max_velocity() {
        let config = PhysicsConfig::default();
        let mut state = MotionState::Charging {
            power: config.max_jump_power,
            direction: 1.0,
        };
        let mut velocity = Velocity::default();

        let event = release_jump(&mut state, &mut velocity);

        assert_eq!(event, Some(ContactEvent::Jumped));
        assert_eq!(velocity.y, -config.max_jump_power);
        assert_eq!(
            state,
            MotionState::Jumping {
                drift: 1.0,
                knockback: false,
            }
        );
    }

    #[test]
    fn test_charge_direction_follows_held_keys() {
        let config = PhysicsConfig::default();
        let mut state = MotionState::Grounded;
        let mut facing = FacingDirection::Right;

        charge_jump(&mut state, &mut facing, true, false, &config);
        assert_eq!(facing, FacingDirection::Left);
        assert!(matches!(
            state,
            MotionState::Charging { direction, .. } if direction == -1.0
        ));

        // Direction is re-read each tick; the last held input wins
        charge_jump(&mut state, &mut facing, false, true, &config);
        assert_eq!(facing, FacingDirection::Right);
        assert!(matches!(
            state,
            MotionState::Charging { direction, .. } if direction == 1.0
        ));
    }

    #[test]
    fn test_charge_with_no_direction_keeps_facing() {
        let config = PhysicsConfig::default();
        let mut state = MotionState::Grounded;
        let mut facing = FacingDirection::Left;

        charge_jump(&mut state, &mut facing, false, false, &config);

        assert_eq!(facing, FacingDirection::Left);
        assert!(matches!(
            state,
            MotionState::Charging { direction, .. } if direction == 0.0
        ));
    }

    #[test]
    fn test_release_without_charge_is_a_no_op() {
        let mut state = MotionState::Grounded;
        let mut velocity = Velocity::new(2.0, 3.0);

        let event = release_jump(&mut state, &mut velocity);

        assert_eq!(event, None);
        assert_eq!(state, MotionState::Grounded);
        assert_eq!(velocity, Velocity::new(2.0, 3.0));
    }

    #[test]
    fn test_no_charging_while_airborne() {
        // The control path guards on is_airborne; verify the guard condition
        let jumping = MotionState::Jumping {
            drift: 0.0,
            knockback: false,
        };
        let falling = MotionState::Falling {
            drift: 0.0,
            knockback: false,
        };
        assert!(jumping.is_airborne());
        assert!(falling.is_airborne());
        assert!(!MotionState::Grounded.is_airborne());
        assert!(
            !MotionState::Charging {
                power: 1.0,
                direction: 0.0,
            }
            .is_airborne()
        );
    }

    #[test]
    fn test_player_plugin_builds() {
        let mut app = App::new();
        app.add_plugins(crate::plugins::PhysicsPlugin);
        app.add_plugins(PlayerPlugin);
    }

    #[test]
    fn test_reset_restores_spawn_and_rewinds_levels() {
        use crate::plugins::PhysicsPlugin;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(PhysicsPlugin);
        app.init_resource::<PlayerSpawn>();
        app.insert_resource(LevelSet::new(vec![vec![], vec![]]));
        app.add_systems(FixedUpdate, reset_system);

        let spawn = *app.world.resource::<PlayerSpawn>();
        let entity = app
            .world
            .spawn((
                Player,
                Position::new(50.0, 50.0),
                PreviousPosition(Position::new(50.0, 50.0)),
                Velocity::new(4.0, -12.0),
                Motion {
                    state: MotionState::Falling {
                        drift: 0.8,
                        knockback: true,
                    },
                },
                RunAnimation::default(),
                PlayerIntent {
                    reset: true,
                    ..default()
                },
            ))
            .id();
        app.world.resource_mut::<LevelSet>().advance();

        // Run enough wall-clock updates for at least one fixed tick
        for _ in 0..10 {
            std::thread::sleep(std::time::Duration::from_millis(4));
            app.update();
        }

        let position = app.world.get::<Position>(entity).unwrap();
        assert_eq!((position.x, position.y), (spawn.x, spawn.y));
        assert_eq!(
            *app.world.get::<Velocity>(entity).unwrap(),
            Velocity::default()
        );
        assert_eq!(
            app.world.get::<Motion>(entity).unwrap().state,
            MotionState::Grounded
        );
        assert_eq!(app.world.resource::<LevelSet>().current_index(), 0);
        assert!(!app.world.get::<PlayerIntent>(entity).unwrap().reset);
    }
}
