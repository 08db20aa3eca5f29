//! Service layer module.
//!
//! Token minting and service record construction.

pub mod clock;
pub mod factory;
pub mod generator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use factory::ServiceFactory;
pub use generator::{SequenceGenerator, TokenGenerator, XidGenerator};
