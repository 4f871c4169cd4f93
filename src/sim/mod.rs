//! World simulation
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM,
//! the audio device or the clock directly:
//! - Side effects are queued on [`WorldState::events`]
//! - Frame timing arrives through a [`crate::platform::FrameScheduler`]
//! - Every deletion consequence is a one-way latch

pub mod collision;
pub mod consequence;
pub mod runner;
pub mod scene;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Contact, box_contact};
pub use consequence::{Consequence, TileTexture, apply as apply_consequence};
pub use runner::{LoopState, SimulationLoop};
pub use scene::{Direction, SCENES, Scene, attempt_transition};
pub use state::{PhysicsProfile, SimEvent, SoundCue, Viewport, WorldState};
pub use tick::{TickInput, ease_fade, step};
