use crate::components::Segment;
use crate::level::LevelsData;
use crate::plugins::physics::PhysicsConfig;
use bevy::prelude::*;
use std::fs;
use std::path::Path;

/// A level's collision geometry. Segment order is irrelevant for collision,
/// but the level's index within the set is the level number.
pub type Level = Vec<Segment>;

/// Resource holding the ordered level stack and the active level index
#[derive(Resource, Clone, Debug)]
pub struct LevelSet {
    levels: Vec<Level>,
    current: usize,
}

impl LevelSet {
    /// Build a level set. Callers are expected to pass a non-empty list;
    /// the file loader enforces this.
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels, current: 0 }
    }

    pub fn from_data(data: &LevelsData) -> Self {
        let levels = data
            .levels
            .iter()
            .map(|level| {
                level
                    .lines
                    .iter()
                    .map(|line| {
                        Segment::new(
                            Vec2::new(line.start[0], line.start[1]),
                            Vec2::new(line.end[0], line.end[1]),
                        )
                    })
                    .collect()
            })
            .collect();
        Self::new(levels)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_level(&self) -> &[Segment] {
        &self.levels[self.current]
    }

    /// Move to the next level up. Fails softly at the top of the stack.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.levels.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous level down. Fails softly at the bottom.
    pub fn retreat(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump back to the first level (manual restart)
    pub fn rewind(&mut self) {
        self.current = 0;
    }
}

/// Level loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum LevelLoadError {
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    ValidationError(String),
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelLoadError::FileNotFound(path) => write!(f, "Level file not found: {}", path),
            LevelLoadError::IoError(path, err) => {
                write!(f, "IO error reading level file {}: {}", path, err)
            }
            LevelLoadError::ParseError(path, err) => {
                write!(f, "Failed to parse level file {}: {}", path, err)
            }
            LevelLoadError::ValidationError(msg) => write!(f, "Level validation error: {}", msg),
        }
    }
}

impl std::error::Error for LevelLoadError {}

/// Load the level stack from a JSON file
pub fn load_levels_from_file(path: &str) -> Result<LevelSet, LevelLoadError> {
    if !Path::new(path).exists() {
        return Err(LevelLoadError::FileNotFound(path.to_string()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| LevelLoadError::IoError(path.to_string(), e.to_string()))?;

    let data: LevelsData = serde_json::from_str(&contents)
        .map_err(|e| LevelLoadError::ParseError(path.to_string(), e.to_string()))?;

    validate_levels_data(&data)?;

    Ok(LevelSet::from_data(&data))
}

/// Validate level data for required content
fn validate_levels_data(data: &LevelsData) -> Result<(), LevelLoadError> {
    if data.levels.is_empty() {
        return Err(LevelLoadError::ValidationError(
            "Level file contains no levels".to_string(),
        ));
    }
    Ok(())
}

/// Marker component for the background sprite
#[derive(Component)]
struct Background;

/// Plugin for level navigation and per-level backgrounds
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_background_system);
        app.add_systems(Update, update_background_system);
    }
}

/// Spawn the background sprite behind everything else. A missing image
/// degrades to the clear color.
fn spawn_background_system(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    levels: Res<LevelSet>,
    config: Res<PhysicsConfig>,
) {
    commands.spawn((
        Background,
        SpriteBundle {
            texture: asset_server.load(background_path(levels.current_index())),
            sprite: Sprite {
                custom_size: Some(Vec2::new(config.window_width, config.window_height)),
                ..default()
            },
            transform: Transform::from_xyz(0.0, 0.0, -1.0),
            ..default()
        },
    ));
}

/// Swap the background image when the active level changes
fn update_background_system(
    levels: Res<LevelSet>,
    asset_server: Res<AssetServer>,
    mut query: Query<&mut Handle<Image>, With<Background>>,
    mut last_index: Local<usize>,
) {
    if levels.current_index() == *last_index {
        return;
    }
    *last_index = levels.current_index();
    info!("Entered level {}", levels.current_index() + 1);

    for mut texture in query.iter_mut() {
        *texture = asset_server.load(background_path(levels.current_index()));
    }
}

/// Background images are numbered from 1
fn background_path(level_index: usize) -> String {
    format!("images/levels/{}.png", level_index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelData, LineData};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn two_level_data() -> LevelsData {
        LevelsData {
            levels: vec![
                LevelData {
                    lines: vec![LineData {
                        start: [0.0, 800.0],
                        end: [1200.0, 800.0],
                    }],
                },
                LevelData {
                    lines: vec![LineData {
                        start: [200.0, 600.0],
                        end: [600.0, 600.0],
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_level_set_navigation_clamps_at_bounds() {
        let mut set = LevelSet::from_data(&two_level_data());
        assert_eq!(set.current_index(), 0);

        // Cannot retreat below the first level
        assert!(!set.retreat());
        assert_eq!(set.current_index(), 0);

        assert!(set.advance());
        assert_eq!(set.current_index(), 1);

        // Cannot advance past the last level
        assert!(!set.advance());
        assert_eq!(set.current_index(), 1);

        assert!(set.retreat());
        assert_eq!(set.current_index(), 0);
    }

    #[test]
    fn test_level_set_rewind() {
        let mut set = LevelSet::from_data(&two_level_data());
        set.advance();
        assert_eq!(set.current_index(), 1);

        set.rewind();
        assert_eq!(set.current_index(), 0);
    }

    #[test]
    fn test_current_level_tracks_index() {
        let mut set = LevelSet::from_data(&two_level_data());
        assert_eq!(set.current_level().len(), 1);
        assert_eq!(set.current_level()[0].start().y, 800.0);

        set.advance();
        assert_eq!(set.current_level()[0].start().y, 600.0);
    }

    #[test]
    fn test_load_levels_from_file_success() {
        let json = serde_json::to_string_pretty(&two_level_data()).unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let set = load_levels_from_file(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.current_index(), 0);
    }

    #[test]
    fn test_load_levels_file_not_found() {
        let result = load_levels_from_file("nonexistent.json");
        assert!(matches!(result, Err(LevelLoadError::FileNotFound(_))));
    }

    #[test]
    fn test_load_levels_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not json at all").unwrap();
        temp_file.flush().unwrap();

        let result = load_levels_from_file(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(LevelLoadError::ParseError(_, _))));
    }

    #[test]
    fn test_load_levels_rejects_empty_set() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{"levels": []}"#).unwrap();
        temp_file.flush().unwrap();

        let result = load_levels_from_file(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(LevelLoadError::ValidationError(_))));
    }

    #[test]
    fn test_level_load_error_display() {
        let err = LevelLoadError::FileNotFound("levels.json".to_string());
        assert!(err.to_string().contains("levels.json"));

        let err = LevelLoadError::ValidationError("no levels".to_string());
        assert!(err.to_string().contains("no levels"));
    }
}
