//! Request authentication.
//!
//! Sign-in is handled upstream by an identity proxy that forwards the
//! verified user id in a trusted header; this module only reads it.

mod extractor;

pub use extractor::{AuthIdentity, AuthUser};
