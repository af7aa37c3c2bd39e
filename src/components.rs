use crate::enums::{AnimationType, MotionState, RunPhase};
use bevy::prelude::*;

/// Player sprite footprint in pixels (square)
pub const PLAYER_SIZE: f32 = 86.0;

/// Collision thickness given to axis-aligned segments
const SEGMENT_THICKNESS: f32 = 1.0;

/// Position component - world coordinates, top-left corner, y grows downward
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Position at the start of the current tick, used to classify the sweep
/// direction during collision resolution
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PreviousPosition(pub Position);

/// Velocity component - pixels per tick
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Collider component - axis-aligned bounding box dimensions
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
}

impl Collider {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn player() -> Self {
        Self::new(PLAYER_SIZE, PLAYER_SIZE)
    }

    /// Collision box at the given top-left position
    pub fn aabb(&self, position: Position) -> Aabb {
        Aabb::new(position.x, position.y, self.width, self.height)
    }
}

/// Axis-aligned rectangle, y-down coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Strict overlap test; boxes that merely share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }
}

/// An immutable collision boundary defined by two endpoints. Only the derived
/// bounding box participates in collision tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    start: Vec2,
    end: Vec2,
    bounds: Aabb,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        let bounds = if start.x == end.x {
            // Vertical line
            Aabb::new(
                start.x - SEGMENT_THICKNESS / 2.0,
                start.y.min(end.y),
                SEGMENT_THICKNESS,
                (end.y - start.y).abs(),
            )
        } else if start.y == end.y {
            // Horizontal line
            Aabb::new(
                start.x.min(end.x),
                start.y - SEGMENT_THICKNESS / 2.0,
                (end.x - start.x).abs(),
                SEGMENT_THICKNESS,
            )
        } else {
            // Diagonal line - tight rectangle over both endpoints
            Aabb::new(
                start.x.min(end.x),
                start.y.min(end.y),
                (end.x - start.x).abs(),
                (end.y - start.y).abs(),
            )
        };
        Self { start, end, bounds }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Motion state component wrapping the state machine
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub state: MotionState,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            state: MotionState::Grounded,
        }
    }
}

/// Facing direction - cosmetic, drives sprite flipping
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FacingDirection {
    Left,
    #[default]
    Right,
}

/// Run animation cycle state, advanced once per physics tick
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct RunAnimation {
    pub phase: RunPhase,
    pub timer: u32,
}

impl Default for RunAnimation {
    fn default() -> Self {
        Self {
            phase: RunPhase::Run1,
            timer: 0,
        }
    }
}

impl RunAnimation {
    /// Advance the cycle while running on the ground; otherwise reset to the
    /// first phase
    pub fn tick(&mut self, running: bool) {
        if running {
            self.timer += 1;
            if self.timer >= self.phase.duration_ticks() {
                self.timer = 0;
                self.phase = self.phase.next();
            }
        } else {
            self.phase = RunPhase::Run1;
            self.timer = 0;
        }
    }
}

/// Current logical animation state, derived from motion each frame
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationState {
    pub current: AnimationType,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            current: AnimationType::Idle,
        }
    }
}

/// Player marker component
#[derive(Component)]
pub struct Player;

/// Player intent component - captures player input. `jump_released` and
/// `reset` are latched edges: set by the input system, cleared by the system
/// that consumes them, so a release between fixed ticks is not lost.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct PlayerIntent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_held: bool,
    pub jump_released: bool,
    pub reset: bool,
}
