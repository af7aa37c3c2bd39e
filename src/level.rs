use serde::{Deserialize, Serialize};

/// Top-level level file structure matching JSON format
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelsData {
    pub levels: Vec<LevelData>,
}

/// A single level - an ordered list of invisible collision lines
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub lines: Vec<LineData>,
}

/// A collision line given by its two endpoints
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineData {
    pub start: [f32; 2],
    pub end: [f32; 2],
}
