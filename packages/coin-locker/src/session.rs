//! Account/Session gate
//!
//! The connected account is held here and handed explicitly to whatever
//! needs it. Nothing downstream of the gate runs without one.

use std::fmt;
use std::sync::Arc;

use suichain_rs::{SuiAddress, Wallet};
use tracing::info;

/// A connected wallet account
#[derive(Clone)]
pub struct ConnectedAccount {
    address: SuiAddress,
    wallet: Arc<dyn Wallet>,
}

impl ConnectedAccount {
    pub fn new(wallet: Arc<dyn Wallet>) -> Self {
        Self {
            address: wallet.address(),
            wallet,
        }
    }

    pub fn address(&self) -> SuiAddress {
        self.address
    }

    /// The signing handle for this account
    pub fn wallet(&self) -> &dyn Wallet {
        self.wallet.as_ref()
    }
}

impl fmt::Debug for ConnectedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectedAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// What the gate lets through
#[derive(Debug, Clone, Copy)]
pub enum Gate<'a> {
    /// Only the connect affordance is shown
    ConnectPrompt,
    Connected(&'a ConnectedAccount),
}

/// Current connection state
#[derive(Debug, Clone, Default)]
pub struct Session {
    account: Option<ConnectedAccount>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(wallet: Arc<dyn Wallet>) -> Self {
        let mut session = Self::default();
        session.connect(wallet);
        session
    }

    /// Connect a wallet, replacing any previous account
    pub fn connect(&mut self, wallet: Arc<dyn Wallet>) -> &ConnectedAccount {
        let account = ConnectedAccount::new(wallet);
        info!(address = %account.address(), "Wallet connected");
        self.account.insert(account)
    }

    pub fn disconnect(&mut self) -> Option<ConnectedAccount> {
        let previous = self.account.take();
        if let Some(account) = &previous {
            info!(address = %account.address(), "Wallet disconnected");
        }
        previous
    }

    pub fn account(&self) -> Option<&ConnectedAccount> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn gate(&self) -> Gate<'_> {
        match &self.account {
            Some(account) => Gate::Connected(account),
            None => Gate::ConnectPrompt,
        }
    }
}
