//! Chain of Custody
//!
//! Records evidence transfers between custodians, keyed by the evidence
//! fingerprint.

pub mod event;
pub mod log;

pub use event::CustodyEvent;
pub use log::CustodyLog;
