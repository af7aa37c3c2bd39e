use crate::components::{
    Collider, FacingDirection, Motion, Player, Position, PreviousPosition, RunAnimation, Segment,
    Velocity,
};
use crate::enums::{ContactEvent, MotionState};
use crate::plugins::level::LevelSet;
use bevy::prelude::*;

const FIXED_TIMESTEP: f32 = 1.0 / 60.0; // 60 FPS fixed timestep

/// Downward probe distance used for ground detection
const GROUND_PROBE_OFFSET: f32 = 2.0;

/// Distance from the screen edge where the character reappears after a
/// level transition
const LEVEL_ENTRY_MARGIN: f32 = 5.0;

/// Physics tuning constants, fixed at construction time
#[derive(Resource, Clone, Copy, Debug)]
pub struct PhysicsConfig {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Magnitude cap on downward velocity
    pub max_fall_speed: f32,
    /// Jump charge cap
    pub max_jump_power: f32,
    /// Charge gained per tick while winding up
    pub charge_rate: f32,
    /// Grounded horizontal speed per tick
    pub move_speed: f32,
    /// Airborne horizontal speed per tick, scaled by drift
    pub horizontal_jump_speed: f32,
    /// Drift factor applied when walking off a ledge
    pub air_drift: f32,
    /// Contact-test slack; governs tunneling behavior at high fall speeds
    pub collision_tolerance: f32,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            max_fall_speed: 30.0,
            max_jump_power: 25.0,
            charge_rate: 0.5,
            move_speed: 5.0,
            horizontal_jump_speed: 8.0,
            air_drift: 0.8,
            collision_tolerance: 5.0,
            window_width: 1200.0,
            window_height: 900.0,
        }
    }
}

/// Plugin for the fixed-timestep physics tick
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_seconds(FIXED_TIMESTEP as f64));
        app.init_resource::<PhysicsConfig>();
        app.add_event::<ContactEvent>();
        app.add_systems(FixedUpdate, player_physics_system);
    }
}

/// One physics tick for the player. Integrates velocity and position,
/// resolves collisions against the current level, and hands the character
/// to the adjacent level when it leaves the screen vertically. Appends any
/// contact notifications to `events`.
#[allow(clippy::too_many_arguments)]
pub fn step_player(
    position: &mut Position,
    previous: &mut PreviousPosition,
    velocity: &mut Velocity,
    motion: &mut Motion,
    facing: &mut FacingDirection,
    run: &mut RunAnimation,
    collider: &Collider,
    levels: &mut LevelSet,
    config: &PhysicsConfig,
    events: &mut Vec<ContactEvent>,
) {
    // Run cycle only advances while moving on the ground
    let running = motion.state == MotionState::Grounded && velocity.x != 0.0;
    run.tick(running);

    previous.0 = *position;

    // Facing follows horizontal velocity, but never turns mid-air
    if !motion.state.is_airborne() {
        if velocity.x < 0.0 {
            *facing = FacingDirection::Left;
        } else if velocity.x > 0.0 {
            *facing = FacingDirection::Right;
        }
    }

    // Ground detection: probe below the feet and start falling when the
    // floor is gone
    if motion.state == MotionState::Grounded {
        let probe = collider.aabb(Position::new(position.x, position.y + GROUND_PROBE_OFFSET));
        let supported = levels
            .current_level()
            .iter()
            .any(|segment| probe.intersects(&segment.bounds()));
        if !supported {
            let drift = if velocity.x > 0.0 {
                config.air_drift
            } else if velocity.x < 0.0 {
                -config.air_drift
            } else {
                0.0
            };
            motion.state = MotionState::Falling {
                drift,
                knockback: false,
            };
        }
    }

    // Horizontal integration; frozen while charging
    match motion.state {
        MotionState::Jumping { drift, .. } | MotionState::Falling { drift, .. } => {
            position.x += drift * config.horizontal_jump_speed;
        }
        MotionState::Grounded => position.x += velocity.x,
        MotionState::Charging { .. } => {}
    }

    // Vertical integration; frozen while charging
    if !motion.state.is_charging() {
        velocity.y = (velocity.y + config.gravity).min(config.max_fall_speed);
        position.y += velocity.y;
    }

    resolve_collisions(
        position,
        &previous.0,
        velocity,
        motion,
        collider,
        levels.current_level(),
        config,
        events,
    );

    // Vertical screen bounds: crossing an edge hands the character to the
    // adjacent level, keeping x, velocity, and airborne state intact
    if position.y < -collider.height {
        if levels.advance() {
            position.y = config.window_height - LEVEL_ENTRY_MARGIN;
        } else {
            position.y = -collider.height;
        }
    } else if position.y > config.window_height {
        if levels.retreat() {
            position.y = LEVEL_ENTRY_MARGIN;
        } else {
            position.y = config.window_height - collider.height;
        }
    }

    // Horizontal screen bounds: airborne characters bounce off the edges
    if position.x < 0.0 {
        position.x = 0.0;
        bounce_off_edge(motion, 1.0, events);
    } else if position.x > config.window_width - collider.width {
        position.x = config.window_width - collider.width;
        bounce_off_edge(motion, -1.0, events);
    }
}

fn bounce_off_edge(motion: &mut Motion, new_drift: f32, events: &mut Vec<ContactEvent>) {
    if let MotionState::Jumping { drift, knockback } | MotionState::Falling { drift, knockback } =
        &mut motion.state
    {
        *drift = new_drift;
        *knockback = true;
        events.push(ContactEvent::Bumped);
    }
}

/// Resolve at most one governing contact for this tick, in strict priority
/// order: floor, then wall, then ceiling. Within a category the first
/// intersecting segment in iteration order wins. Returns whether any
/// contact was applied.
#[allow(clippy::too_many_arguments)]
pub fn resolve_collisions(
    position: &mut Position,
    previous: &Position,
    velocity: &mut Velocity,
    motion: &mut Motion,
    collider: &Collider,
    segments: &[Segment],
    config: &PhysicsConfig,
    events: &mut Vec<ContactEvent>,
) -> bool {
    let prev_box = collider.aabb(*previous);
    let current_box = collider.aabb(*position);
    let tolerance = config.collision_tolerance;

    // Floor contacts
    for segment in segments {
        let bounds = segment.bounds();
        if current_box.intersects(&bounds) && prev_box.bottom() <= bounds.top + tolerance {
            position.y = bounds.top - collider.height;
            velocity.y = 0.0;
            let was_airborne = motion.state.is_airborne();
            motion.state = MotionState::Grounded;
            if was_airborne {
                events.push(ContactEvent::Landed);
            }
            return true;
        }
    }

    // Wall contacts
    for segment in segments {
        let bounds = segment.bounds();
        if !current_box.intersects(&bounds) {
            continue;
        }
        if prev_box.right() <= bounds.left + tolerance {
            position.x = bounds.left - collider.width;
            velocity.x = 0.0;
            bounce_off_edge(motion, -1.0, events);
            return true;
        } else if prev_box.left >= bounds.right() - tolerance {
            position.x = bounds.right();
            velocity.x = 0.0;
            bounce_off_edge(motion, 1.0, events);
            return true;
        }
    }

    // Ceiling contacts; no event and no knockback, the ceiling is silent
    for segment in segments {
        let bounds = segment.bounds();
        if current_box.intersects(&bounds) && prev_box.top >= bounds.bottom() - tolerance {
            position.y = bounds.bottom();
            velocity.y = 0.0;
            return true;
        }
    }

    false
}

/// Drive the physics tick for the player entity and forward contact events
#[allow(clippy::type_complexity)]
pub fn player_physics_system(
    mut query: Query<
        (
            &mut Position,
            &mut PreviousPosition,
            &mut Velocity,
            &mut Motion,
            &mut FacingDirection,
            &mut RunAnimation,
            &Collider,
        ),
        With<Player>,
    >,
    mut levels: ResMut<LevelSet>,
    config: Res<PhysicsConfig>,
    mut contact_events: EventWriter<ContactEvent>,
) {
    for (mut position, mut previous, mut velocity, mut motion, mut facing, mut run, collider) in
        query.iter_mut()
    {
        let mut events = Vec::new();
        step_player(
            &mut position,
            &mut previous,
            &mut velocity,
            &mut motion,
            &mut facing,
            &mut run,
            collider,
            &mut levels,
            &config,
            &mut events,
        );
        for event in events {
            contact_events.send(event);
        }
    }
}
