// Remu Player Control Library

pub mod controls;
pub mod error;
pub mod events;
pub mod loader;
pub mod logger;
pub mod media;
pub mod navigation;
pub mod player;
pub mod utils;

pub use controls::{ControlsOptions, ControlsView, PlayerControls};
pub use error::PlayerError;
pub use events::{EventData, PlayerEvent, Topic};
pub use logger::{DisplayLog, LogFacade, PlayerLogger};
pub use media::{MediaSurface, SimulatedSurface};
pub use navigation::PlayerNavigation;
pub use player::{PlaybackState, Player, PlayerOptions, StepDirection, WeakPlayer};
