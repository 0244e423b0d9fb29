pub mod acl;
pub mod api;
pub mod config;
pub mod custody;
pub mod error;
pub mod fingerprint;
pub mod status;

pub use error::{LedgerError, Result};
