pub mod events;
pub mod handler;
pub mod script;

// Re-export the essential types
pub use events::{InputEvent, InputState, KeyCode, MouseButton};
pub use handler::{EventSource, FrameClock, InputController, QueuedEvents, TickOutcome};
pub use script::DotScript;
