//! Session lifecycle: registration, sign-in, refresh, and logout.
//!
//! [`SessionService`] ties credential verification, token issuance and the
//! session store together. It is the only place that writes to the store,
//! and it only does so after a token operation fully succeeded.

pub mod service;

pub use service::SessionService;
