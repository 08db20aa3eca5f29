//! Domain models.
//!
//! Tokens, service instance records, labels and profile ownership.

pub mod labels;
pub mod profile;
pub mod service;
pub mod token;

pub use labels::Labels;
pub use profile::{Profile, ProfileType};
pub use service::Service;
pub use token::{ENCODED_LEN, RAW_LEN, Token};
