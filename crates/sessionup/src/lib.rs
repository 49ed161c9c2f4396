//! # sessionup
//!
//! Cookie-based, store-backed session management for axum applications.
//!
//! A session is an opaque random ID, handed to the client in a cookie and
//! remembered by a [`Store`] you provide. This crate covers the lifecycle:
//!
//! 1. **Issuing** — [`Manager::init`] builds a session for a user key,
//!    persists it, and sets the cookie
//! 2. **Authenticating** — the [`auth`] middleware resolves the cookie to a
//!    session and binds it to the request ([`context`], [`AuthSession`])
//! 3. **Revoking** — [`Manager::revoke`], [`Manager::revoke_other`],
//!    [`Manager::revoke_all`], plus [`Manager::fetch_all`] for listing
//!
//! # How it fits in the stack
//!
//! ```text
//! Your handlers (above)  ← read the bound session, call revoke/fetch_all
//!     ↕
//! sessionup (this crate)  ← manager, middleware, context binding
//!     ↕
//! sessionup-cookie / sessionup-store (below)  ← cookie wire format, storage contract
//! ```
//!
//! Authentication (checking passwords and the like) is not part of this
//! crate: call [`Manager::init`] once you've decided who the user is.

mod config;
pub mod context;
mod error;
mod id;
mod manager;
mod middleware;
mod reject;

pub use config::{MAX_EXPIRES_IN_DAYS, ManagerBuilder};
pub use context::AuthSession;
pub use error::SessionError;
pub use id::{DEFAULT_ID_LEN, GenerateId, RandomId};
pub use manager::Manager;
pub use middleware::{auth, public};
pub use reject::{JsonReject, Reject};

pub use sessionup_cookie::{CookieConfig, CookieError, SameSite};
pub use sessionup_store::{MemoryStore, Session, Store, StoreError};

/// Everything a typical application needs in one import.
pub mod prelude {
    pub use crate::{
        AuthSession, CookieConfig, GenerateId, JsonReject, Manager,
        ManagerBuilder, MemoryStore, Reject, SameSite, Session, SessionError,
        Store, StoreError, auth, context, public,
    };
}
