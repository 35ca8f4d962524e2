//! The single status line

use std::fmt;

use suichain_rs::TransactionDigest;

use crate::error::LockerError;

/// Outcome of the most recent Lock or Unlock attempt.
///
/// Overwritten on every attempt; never accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusMessage {
    /// Nothing attempted yet
    #[default]
    Empty,
    /// Action attempted without a connected account
    ConnectPrompt,
    /// Action attempted while another submission was in flight
    Busy,
    /// Rejected locally before reaching the wallet
    Invalid(LockerError),
    Locked { digest: TransactionDigest },
    LockFailed { reason: String },
    Unlocked { digest: TransactionDigest },
    UnlockFailed { reason: String },
}

impl StatusMessage {
    /// Status for an error that stopped an action before submission
    pub fn rejected(err: LockerError) -> Self {
        match err {
            LockerError::NotConnected => StatusMessage::ConnectPrompt,
            LockerError::SubmissionPending => StatusMessage::Busy,
            other => StatusMessage::Invalid(other),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            StatusMessage::Locked { .. } | StatusMessage::Unlocked { .. }
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusMessage::Invalid(_)
                | StatusMessage::LockFailed { .. }
                | StatusMessage::UnlockFailed { .. }
        )
    }

    /// Digest of the executed transaction, on success
    pub fn digest(&self) -> Option<&TransactionDigest> {
        match self {
            StatusMessage::Locked { digest } | StatusMessage::Unlocked { digest } => Some(digest),
            _ => None,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Empty => Ok(()),
            StatusMessage::ConnectPrompt => write!(f, "{}", LockerError::NotConnected),
            StatusMessage::Busy => write!(f, "{}", LockerError::SubmissionPending),
            StatusMessage::Invalid(err) => write!(f, "{}", err),
            StatusMessage::Locked { .. } => f.write_str("Coins locked successfully"),
            StatusMessage::LockFailed { reason } => write!(f, "Error: {}", reason),
            StatusMessage::Unlocked { .. } => f.write_str("Coins unlocked successfully"),
            StatusMessage::UnlockFailed { reason } => {
                write!(f, "Failed to unlock coins: {}", reason)
            }
        }
    }
}
