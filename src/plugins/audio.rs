use crate::enums::ContactEvent;
use bevy::prelude::*;

/// Sound effects keyed by contact notification. Handles that fail to load
/// simply never produce playback, so missing audio degrades to silence.
#[derive(Resource, Clone, Debug)]
pub struct ContactSounds {
    pub jump: Handle<AudioSource>,
    pub land: Handle<AudioSource>,
    pub bump: Handle<AudioSource>,
}

/// Plugin that reacts to physics contact events with sound effects
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_sounds_system);
        app.add_systems(Update, play_contact_sounds_system);
    }
}

fn load_sounds_system(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ContactSounds {
        jump: asset_server.load("sounds/jump.ogg"),
        land: asset_server.load("sounds/land.ogg"),
        bump: asset_server.load("sounds/bump.ogg"),
    });
}

fn play_contact_sounds_system(
    mut commands: Commands,
    mut events: EventReader<ContactEvent>,
    sounds: Option<Res<ContactSounds>>,
) {
    let Some(sounds) = sounds else {
        return;
    };

    for event in events.read() {
        let source = match event {
            ContactEvent::Jumped => &sounds.jump,
            ContactEvent::Landed => &sounds.land,
            ContactEvent::Bumped => &sounds.bump,
        };
        commands.spawn(AudioBundle {
            source: source.clone(),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}
