use bevy::prelude::*;

/// Motion state machine - exactly one state is active at a time, replacing
/// the overlapping jump/fall/charge boolean flags
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionState {
    /// Standing or running on a floor segment
    Grounded,
    /// Winding up a jump; horizontal and vertical integration are frozen
    Charging { power: f32, direction: f32 },
    /// Airborne after a jump release; `drift` drives horizontal motion
    Jumping { drift: f32, knockback: bool },
    /// Airborne after walking off a ledge (or past the jump apex)
    Falling { drift: f32, knockback: bool },
}

impl MotionState {
    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Jumping { .. } | Self::Falling { .. })
    }

    pub fn is_charging(&self) -> bool {
        matches!(self, Self::Charging { .. })
    }

    /// Horizontal drift factor while airborne; zero otherwise
    pub fn drift(&self) -> f32 {
        match self {
            Self::Jumping { drift, .. } | Self::Falling { drift, .. } => *drift,
            _ => 0.0,
        }
    }

    /// Whether a wall or screen-edge bump is still in effect
    pub fn knockback(&self) -> bool {
        matches!(
            self,
            Self::Jumping { knockback: true, .. } | Self::Falling { knockback: true, .. }
        )
    }
}

/// Run cycle phase with fixed per-phase tick durations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Run1,
    Run2,
    Run3,
}

impl RunPhase {
    pub fn duration_ticks(&self) -> u32 {
        match self {
            RunPhase::Run1 => 10,
            RunPhase::Run2 => 5,
            RunPhase::Run3 => 10,
        }
    }

    pub fn next(&self) -> RunPhase {
        match self {
            RunPhase::Run1 => RunPhase::Run2,
            RunPhase::Run2 => RunPhase::Run3,
            RunPhase::Run3 => RunPhase::Run1,
        }
    }
}

/// Logical animation state exposed to the rendering layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationType {
    Idle,
    Charging,
    Jumping,
    Falling,
    Knockback,
    Running,
}

/// Contact notifications emitted by the physics tick; the audio layer may
/// react to these, but physics is unaffected when nobody consumes them
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEvent {
    Landed,
    Jumped,
    Bumped,
}
