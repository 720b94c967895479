//! The four domain checks.
//!
//! Condition order inside each check is part of its contract:
//! recoverable conditions come first, terminal ones last.

pub mod authentication;
pub mod firewall;
pub mod malware;
pub mod software;

pub use authentication::AuthenticationCheck;
pub use firewall::FirewallCheck;
pub use malware::MalwareCheck;
pub use software::SoftwareCheck;
