//! sensa-core - Terms, evidence stamps, truth calculus, events, config

pub mod config;
pub mod error;
pub mod event;
pub mod stamp;
pub mod term;
pub mod truth;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{Event, EventKind};
pub use stamp::{Stamp, STAMP_CAPACITY};
pub use term::Term;
pub use truth::Truth;
