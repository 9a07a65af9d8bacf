//! The navigation core: views over filesystem paths, the three panels that
//! show them and the event bus that keeps the panels in step.

pub mod bus;
pub mod cache;
pub mod directory;
pub mod filter;
pub mod history;
pub mod options;
pub mod panel;
pub mod session;
pub mod view;

pub use filter::FilterMode;
pub use options::Options;
pub use session::{EnterTarget, Entered, HostEvent, Session, Status};
