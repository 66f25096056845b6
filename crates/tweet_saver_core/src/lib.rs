//! Tweet saver core: pure state machine for the "save tweet" action.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notice};
pub use msg::Msg;
pub use state::{AppState, JobId, SaveResultKind, Stage};
pub use update::update;
pub use view_model::{AppViewModel, JobView};
