//! Domain types and models

pub mod envelope;
pub mod user;

pub use envelope::{ApiEnvelope, Page, PageQuery};
pub use user::{UserIdentity, UserType};
