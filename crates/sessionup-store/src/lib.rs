//! Session record and storage contract for sessionup.
//!
//! This crate is the bottom of the stack:
//!
//! - **[`Session`]** — the record for one authenticated login
//! - **[`Store`]** — the async trait a durable backend implements
//! - **[`MemoryStore`]** — an in-process reference implementation
//! - **[`StoreError`]** — what a backend can report
//!
//! ```text
//! sessionup (manager, middleware)  ← decides WHEN to read/write sessions
//!     ↕
//! sessionup-store (this crate)     ← defines WHAT is stored and HOW to reach it
//! ```

mod error;
mod memory;
mod session;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use session::Session;
pub use store::Store;
