//! Session state: the state machine, map resolution and the shared store.

mod resolver;
mod state;
mod store;

pub use resolver::*;
pub use state::*;
pub use store::*;
