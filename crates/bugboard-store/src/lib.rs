//! # bugboard-store
//!
//! Memory layer for bug tracking state.
//!
//! This crate provides:
//! - `Bug`, `Comment` and `User` types
//! - `BugStore` (canonical in-memory state with lenient and strict mutations)
//! - role checks (`access`) and the identity provider seam (`identity`)
//! - JSONL read/write (portable persistence between CLI runs)
//!
//! Derived statistics and board/dashboard views live in `bugboard-query`.
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one line per bug)
//!     <->  load / save
//! BugStore (insertion-ordered in-memory state)
//!     ->   snapshot
//! bugboard-query (pure read-only projections)
//! ```

pub mod access;
pub mod bug;
pub mod clock;
pub mod filter;
pub mod identity;
pub mod jsonl;
pub mod memory;
pub mod seed;
pub mod user;

pub use access::{Action, authorize, can_transition};
pub use bug::{
    Bug, BugDraft, BugPatch, Comment, CommentDraft, ParseLevelError, Priority, Severity, Status,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use filter::BugFilter;
pub use identity::{IdentityError, IdentityProvider, MockIdentityProvider, USER_ID_PREFIX};
pub use jsonl::{
    JsonlError, read_bugs_from_path, read_records, read_users_from_path, write_bugs_to_path,
    write_records, write_users_to_path,
};
pub use memory::{BUG_ID_PREFIX, BugStore, StoreError};
pub use seed::{demo_bugs, demo_users};
pub use user::{Role, User};
