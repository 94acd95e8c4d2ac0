pub mod calculations;
pub mod config;
pub mod form;
pub mod models;
pub mod rows;
pub mod schedule;

pub use config::{FareConfig, FareConfigError};
pub use form::{FareField, FareForm};
pub use models::*;
pub use rows::{RowCollection, RowCollectionError};
pub use schedule::DebounceSlot;
