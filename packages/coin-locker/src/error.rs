//! User-facing error taxonomy
//!
//! Everything that can stop a Lock or Unlock ends up as one of these, and
//! the `Display` text is exactly what the status line shows for it.

use suichain_rs::Network;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockerError {
    /// No wallet account is connected; no external call was made
    #[error("Please connect your wallet")]
    NotConnected,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Another submission from the same composer is still in flight
    #[error("A transaction is already pending")]
    SubmissionPending,

    #[error("No token_lock package id configured for {network}")]
    MissingPackageId { network: Network },

    /// Rejection from sign-and-execute, reason copied verbatim
    #[error("{0}")]
    Submission(String),
}

impl LockerError {
    /// Wrap a sign-and-execute failure, keeping the full cause chain
    pub fn submission(err: eyre::Report) -> Self {
        LockerError::Submission(format!("{err:#}"))
    }

    /// Whether the wallet was never reached
    pub fn is_local(&self) -> bool {
        !matches!(self, LockerError::Submission(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::{eyre, WrapErr};

    #[test]
    fn test_submission_reason_verbatim() {
        let err = LockerError::submission(eyre!("User rejected the request"));
        assert_eq!(err.to_string(), "User rejected the request");
        assert!(!err.is_local());
    }

    #[test]
    fn test_submission_keeps_context_chain() {
        let report = Err::<(), _>(eyre!("connection refused"))
            .wrap_err("Failed to send suix_getCoins request")
            .unwrap_err();
        assert_eq!(
            LockerError::submission(report).to_string(),
            "Failed to send suix_getCoins request: connection refused"
        );
    }

    #[test]
    fn test_local_errors() {
        assert!(LockerError::NotConnected.is_local());
        assert_eq!(
            LockerError::MissingPackageId {
                network: Network::Mainnet
            }
            .to_string(),
            "No token_lock package id configured for mainnet"
        );
    }
}
