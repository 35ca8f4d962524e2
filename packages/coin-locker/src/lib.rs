//! Coin Locker
//!
//! Terminal front-end for the `token_lock` Move package: connect a wallet,
//! list the objects it owns, and lock or unlock SUI.
//!
//! ## Modules
//!
//! - `session` - Account/session gate
//! - `objects` - Owned-objects viewer and explorer links
//! - `composer` - Lock/Unlock transaction building, submission and form state
//! - `status` - The status line
//! - `view` - Text rendering of the screen
//! - `app` - Interactive front-end driving the above
//! - `config` - Environment and CLI configuration
//! - `error` - User-facing error taxonomy

pub mod app;
pub mod composer;
pub mod config;
pub mod error;
pub mod objects;
pub mod session;
pub mod status;
pub mod view;

pub use app::{App, Flow, SessionCommand};
pub use composer::{
    build_lock_transaction, build_unlock_transaction, submit_lock, submit_unlock, CoinLocker,
    LockForm, LockRequest, UnlockRequest,
};
pub use config::{Config, ConfigOverrides};
pub use error::LockerError;
pub use objects::{object_url, ObjectLink, ObjectSource, OwnedObjects};
pub use session::{ConnectedAccount, Gate, Session};
pub use status::StatusMessage;
