//! Testing Utilities Module
//!
//! Helpers for exercising code that submits transactions without a wallet
//! or a network.
//!
//! ## Submodules
//!
//! - `mock_wallet` - Recording wallet with scripted outcomes
//! - `assertions` - Structural assertions over programmable transactions

pub mod assertions;
pub mod mock_wallet;

// Re-export commonly used items
pub use assertions::*;
pub use mock_wallet::*;
