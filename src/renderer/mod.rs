//! Abstract rendering
//!
//! Each tick the state machine is described as a `Frame`: an ordered list of
//! draw commands plus the events and audio cues raised since the last frame.
//! Fonts, shapes and pixels are the collaborator's business.

pub mod compose;
pub mod frame;

pub use compose::compose;
pub use frame::{DrawCommand, Frame, ScreenKind, TextRole};
