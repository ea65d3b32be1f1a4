//! Student record state

pub mod in_flight;
pub mod records;

pub use in_flight::{InFlight, InFlightGuard, Mutation};
pub use records::{RecordState, RecordStore};
