//! Transaction composer
//!
//! Two layers:
//!
//! - Pure builders turning a [`LockRequest`] / [`UnlockRequest`] into a
//!   programmable transaction against the `token_lock` module
//! - [`CoinLocker`], the form state behind the Lock and Unlock actions: input
//!   fields, the status line, and the in-flight guard
//!
//! ## Lock transaction
//!
//! ```text
//! inputs:   [Pure(u64 amount), Clock(0x6, shared v1, read-only), Pure(u64 duration)]
//! command 0: SplitCoins(GasCoin, [Input(0)])                      -> coin
//! command 1: MoveCall {package}::token_lock::lock_coin_entry(Input(1), coin, Input(2))
//! ```
//!
//! ## Unlock transaction
//!
//! ```text
//! inputs:   [Pure(address)]
//! command 0: MoveCall {package}::token_lock::unlock_coin_entry(Input(0))
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use eyre::Result;
use suichain_rs::{
    MoveTarget, Network, ObjectArg, ObjectId, ProgrammableTransaction,
    ProgrammableTransactionBuilder, SuiAddress, TransactionBlockResponse,
};
use tracing::{info, warn};

use crate::error::LockerError;
use crate::session::{ConnectedAccount, Gate, Session};
use crate::status::StatusMessage;

pub const TOKEN_LOCK_MODULE: &str = "token_lock";
pub const LOCK_COIN_ENTRY: &str = "lock_coin_entry";
pub const UNLOCK_COIN_ENTRY: &str = "unlock_coin_entry";

pub const AMOUNT_PLACEHOLDER: &str = "Amount of SUI to lock";
pub const DURATION_PLACEHOLDER: &str = "Duration in seconds";

// ============================================================================
// Requests
// ============================================================================

/// Amount (MIST) and duration (seconds) for one lock attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRequest {
    pub amount: u64,
    pub duration_secs: u64,
}

impl LockRequest {
    /// Parse the two form fields
    pub fn parse(amount: &str, duration: &str) -> Result<Self, LockerError> {
        let amount = parse_u64(amount).map_err(LockerError::InvalidAmount)?;
        let duration_secs = parse_u64(duration).map_err(LockerError::InvalidDuration)?;
        Ok(Self {
            amount,
            duration_secs,
        })
    }
}

/// The account whose locked coins are released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockRequest {
    pub owner: SuiAddress,
}

impl UnlockRequest {
    pub fn for_account(account: &ConnectedAccount) -> Self {
        Self {
            owner: account.address(),
        }
    }
}

fn parse_u64(input: &str) -> std::result::Result<u64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("value is required".to_string());
    }
    trimmed
        .parse::<u64>()
        .map_err(|e| format!("'{}' ({})", trimmed, e))
}

// ============================================================================
// Builders
// ============================================================================

/// Split `amount` off the gas coin and lock it for `duration_secs`
pub fn build_lock_transaction(
    package: ObjectId,
    request: &LockRequest,
) -> Result<ProgrammableTransaction> {
    let target = MoveTarget::new(package, TOKEN_LOCK_MODULE, LOCK_COIN_ENTRY)?;

    let mut ptb = ProgrammableTransactionBuilder::new();
    let amount = ptb.pure_u64(request.amount)?;
    let coin = ptb.split_coin(ptb.gas(), amount);
    let clock = ptb.object(ObjectArg::clock())?;
    let duration = ptb.pure_u64(request.duration_secs)?;
    ptb.move_call(target, vec![], vec![clock, coin, duration]);

    Ok(ptb.finish())
}

/// Release the coins locked by `request.owner`
pub fn build_unlock_transaction(
    package: ObjectId,
    request: &UnlockRequest,
) -> Result<ProgrammableTransaction> {
    let target = MoveTarget::new(package, TOKEN_LOCK_MODULE, UNLOCK_COIN_ENTRY)?;

    let mut ptb = ProgrammableTransactionBuilder::new();
    let owner = ptb.pure_address(request.owner)?;
    ptb.move_call(target, vec![], vec![owner]);

    Ok(ptb.finish())
}

// ============================================================================
// Submission
// ============================================================================

/// Build and sign-and-execute a lock for the connected account
pub async fn submit_lock(
    account: &ConnectedAccount,
    package: ObjectId,
    request: &LockRequest,
) -> Result<TransactionBlockResponse, LockerError> {
    let transaction =
        build_lock_transaction(package, request).map_err(LockerError::submission)?;

    info!(
        address = %account.address(),
        amount = request.amount,
        duration_secs = request.duration_secs,
        "Submitting lock"
    );

    account
        .wallet()
        .sign_and_execute(transaction)
        .await
        .map_err(LockerError::submission)
}

/// Build and sign-and-execute an unlock for the connected account
pub async fn submit_unlock(
    account: &ConnectedAccount,
    package: ObjectId,
    request: &UnlockRequest,
) -> Result<TransactionBlockResponse, LockerError> {
    let transaction =
        build_unlock_transaction(package, request).map_err(LockerError::submission)?;

    info!(address = %account.address(), owner = %request.owner, "Submitting unlock");

    account
        .wallet()
        .sign_and_execute(transaction)
        .await
        .map_err(LockerError::submission)
}

// ============================================================================
// Form state
// ============================================================================

/// Raw text of the two input fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockForm {
    pub amount: String,
    pub duration: String,
}

/// State behind the Lock and Unlock actions.
///
/// Actions take `&self` so a second click can arrive while the first
/// submission is suspended; it is ignored with [`StatusMessage::Busy`].
pub struct CoinLocker {
    network: Network,
    package_id: Option<ObjectId>,
    form: Mutex<LockForm>,
    status: Mutex<StatusMessage>,
    in_flight: AtomicBool,
}

impl CoinLocker {
    pub fn new(network: Network, package_id: Option<ObjectId>) -> Self {
        Self {
            network,
            package_id,
            form: Mutex::new(LockForm::default()),
            status: Mutex::new(StatusMessage::Empty),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn package_id(&self) -> Option<ObjectId> {
        self.package_id
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        lock(&self.form).amount = amount.into();
    }

    pub fn set_duration(&self, duration: impl Into<String>) {
        lock(&self.form).duration = duration.into();
    }

    pub fn form(&self) -> LockForm {
        lock(&self.form).clone()
    }

    pub fn status(&self) -> StatusMessage {
        lock(&self.status).clone()
    }

    /// Whether a submission is in flight
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The Lock action
    pub async fn lock(&self, session: &Session) -> StatusMessage {
        let status = match self.try_lock(session).await {
            Ok(response) => StatusMessage::Locked {
                digest: response.digest,
            },
            Err(err) if err.is_local() => StatusMessage::rejected(err),
            Err(err) => {
                warn!(error = %err, "Lock failed");
                StatusMessage::LockFailed {
                    reason: err.to_string(),
                }
            }
        };
        self.set_status(status)
    }

    /// The Unlock action
    pub async fn unlock(&self, session: &Session) -> StatusMessage {
        let status = match self.try_unlock(session).await {
            Ok(response) => StatusMessage::Unlocked {
                digest: response.digest,
            },
            Err(err) if err.is_local() => StatusMessage::rejected(err),
            Err(err) => {
                warn!(error = %err, "Unlock failed");
                StatusMessage::UnlockFailed {
                    reason: err.to_string(),
                }
            }
        };
        self.set_status(status)
    }

    async fn try_lock(&self, session: &Session) -> Result<TransactionBlockResponse, LockerError> {
        let account = connected(session)?;
        let _guard = InFlight::acquire(&self.in_flight)?;
        let package = self.require_package()?;

        let form = self.form();
        let request = LockRequest::parse(&form.amount, &form.duration)?;

        let response = submit_lock(account, package, &request).await?;
        info!(digest = %response.digest, "Coins locked");
        Ok(response)
    }

    async fn try_unlock(
        &self,
        session: &Session,
    ) -> Result<TransactionBlockResponse, LockerError> {
        let account = connected(session)?;
        let _guard = InFlight::acquire(&self.in_flight)?;
        let package = self.require_package()?;

        let request = UnlockRequest::for_account(account);
        let response = submit_unlock(account, package, &request).await?;
        info!(digest = %response.digest, "Coins unlocked");
        Ok(response)
    }

    fn require_package(&self) -> Result<ObjectId, LockerError> {
        self.package_id.ok_or(LockerError::MissingPackageId {
            network: self.network,
        })
    }

    fn set_status(&self, status: StatusMessage) -> StatusMessage {
        *lock(&self.status) = status.clone();
        status
    }
}

fn connected(session: &Session) -> Result<&ConnectedAccount, LockerError> {
    match session.gate() {
        Gate::Connected(account) => Ok(account),
        Gate::ConnectPrompt => Err(LockerError::NotConnected),
    }
}

/// Held for the duration of one submission
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, LockerError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| LockerError::SubmissionPending)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
