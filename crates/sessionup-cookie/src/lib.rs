//! Session cookie handling for sessionup.
//!
//! The session ID travels in a single cookie. This crate turns a
//! `(session ID, expiry)` pair into a `Set-Cookie` header and reads it back
//! from `Cookie` headers, applying the attributes in [`CookieConfig`].
//!
//! ```text
//! sessionup (manager)            ← decides WHEN a cookie is set or cleared
//!     ↕
//! sessionup-cookie (this crate)  ← decides WHAT the header looks like
//!     ↕
//! http::HeaderMap                ← the transport
//! ```

mod codec;
mod config;
mod error;

pub use codec::{CookieCodec, DELETION_OFFSET_DAYS};
pub use config::{CookieConfig, DEFAULT_COOKIE_NAME, SameSite};
pub use error::CookieError;
