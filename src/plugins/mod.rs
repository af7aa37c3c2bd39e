pub mod animation;
pub mod audio;
pub mod camera;
pub mod level;
pub mod physics;
pub mod player;

pub use animation::AnimationPlugin;
pub use audio::GameAudioPlugin;
pub use camera::CameraPlugin;
pub use level::LevelPlugin;
pub use physics::PhysicsPlugin;
pub use player::PlayerPlugin;
