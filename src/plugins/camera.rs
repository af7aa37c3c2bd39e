use bevy::prelude::*;

/// Camera plugin - a fixed 2D camera covering the whole playfield
pub struct CameraPlugin;

/// Marker component for the camera entity
#[derive(Component)]
pub struct GameCamera;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2dBundle::default(), GameCamera));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_plugin_builds() {
        let mut app = App::new();
        app.add_plugins(CameraPlugin);
    }
}
