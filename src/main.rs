use bevy::prelude::*;
use tower_climb_game::plugins::level::load_levels_from_file;
use tower_climb_game::plugins::{
    AnimationPlugin, CameraPlugin, GameAudioPlugin, LevelPlugin, PhysicsPlugin, PlayerPlugin,
};

fn main() {
    // Missing or unparsable level data is fatal at startup
    let levels = match load_levels_from_file("levels.json") {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Failed to load levels: {}", e);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tower Climb".to_string(),
                resolution: (1200.0, 900.0).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(levels)
        .add_plugins(PhysicsPlugin)
        .add_plugins(PlayerPlugin)
        .add_plugins(LevelPlugin)
        .add_plugins(AnimationPlugin)
        .add_plugins(GameAudioPlugin)
        .add_plugins(CameraPlugin)
        .run();
}
