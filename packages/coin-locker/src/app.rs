//! Interactive front-end
//!
//! [`App`] wires the session gate, the owned-objects viewer and the composer
//! together and drives them from line commands (see [`SessionCommand`]).

use std::str::FromStr;
use std::sync::Arc;

use eyre::{eyre, Result};
use suichain_rs::{KeypairWallet, SuiRpcClient, Wallet};
use tracing::debug;

use crate::composer::CoinLocker;
use crate::config::Config;
use crate::objects::{ObjectSource, OwnedObjects};
use crate::session::Session;
use crate::status::StatusMessage;
use crate::view::Screen;

pub const HELP: &str = "\
Commands:
  connect            connect the configured wallet
  disconnect         disconnect the wallet
  amount <value>     set the amount to lock (MIST)
  duration <value>   set the lock duration (seconds)
  lock               lock coins
  unlock             unlock coins
  objects            reload owned objects
  show               redraw the screen
  help               show this help
  quit               exit";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Connect,
    Disconnect,
    Amount(String),
    Duration(String),
    Lock,
    Unlock,
    Objects,
    Show,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = eyre::Report;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "connect" => SessionCommand::Connect,
            "disconnect" => SessionCommand::Disconnect,
            "amount" => SessionCommand::Amount(rest.to_string()),
            "duration" => SessionCommand::Duration(rest.to_string()),
            "lock" => SessionCommand::Lock,
            "unlock" => SessionCommand::Unlock,
            "objects" => SessionCommand::Objects,
            "show" | "" => SessionCommand::Show,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(eyre!("Unknown command '{}' (try 'help')", other)),
        };
        Ok(command)
    }
}

/// What the loop does after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Output(String),
    Quit,
}

pub struct App {
    config: Config,
    source: Arc<dyn ObjectSource>,
    session: Session,
    objects: OwnedObjects,
    locker: CoinLocker,
}

impl App {
    /// App reading owned objects from the configured fullnode
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(SuiRpcClient::new(&config.rpc_url())?);
        Ok(Self::with_source(config, client))
    }

    pub fn with_source(config: Config, source: Arc<dyn ObjectSource>) -> Self {
        let locker = CoinLocker::new(config.network, config.package_id());
        Self {
            config,
            source,
            session: Session::disconnected(),
            objects: OwnedObjects::Pending,
            locker,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn objects(&self) -> &OwnedObjects {
        &self.objects
    }

    pub fn locker(&self) -> &CoinLocker {
        &self.locker
    }

    /// Connect the wallet described by the configuration
    pub async fn connect(&mut self) -> Result<()> {
        let wallet_config = self
            .config
            .wallet_config()
            .ok_or_else(|| eyre!("SUI_PRIVATE_KEY is not set; no wallet to connect"))?;
        let wallet = KeypairWallet::new(wallet_config)?;
        self.connect_wallet(Arc::new(wallet)).await;
        Ok(())
    }

    /// Connect only when a key is configured. Returns whether a wallet is now
    /// connected; without a key the session stays behind the connect prompt.
    pub async fn connect_configured(&mut self) -> Result<bool> {
        if self.config.wallet_config().is_none() {
            debug!("No account key configured, staying disconnected");
            return Ok(false);
        }
        self.connect().await?;
        Ok(true)
    }

    pub async fn connect_wallet(&mut self, wallet: Arc<dyn Wallet>) {
        self.session.connect(wallet);
        self.refresh_objects().await;
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect();
        self.objects = OwnedObjects::Pending;
    }

    /// Re-run the owned-objects query for the connected account
    pub async fn refresh_objects(&mut self) {
        self.objects = OwnedObjects::Pending;
        let Some(owner) = self.session.account().map(|a| a.address()) else {
            return;
        };
        self.objects = OwnedObjects::fetch(self.source.as_ref(), owner).await;
    }

    pub async fn lock(&mut self) -> StatusMessage {
        let status = self.locker.lock(&self.session).await;
        if status.is_success() {
            self.refresh_objects().await;
        }
        status
    }

    pub async fn unlock(&mut self) -> StatusMessage {
        let status = self.locker.unlock(&self.session).await;
        if status.is_success() {
            self.refresh_objects().await;
        }
        status
    }

    pub async fn handle(&mut self, command: SessionCommand) -> Result<Flow> {
        debug!(command = ?command, "Handling command");

        match command {
            SessionCommand::Connect => self.connect().await?,
            SessionCommand::Disconnect => self.disconnect(),
            SessionCommand::Amount(value) => self.locker.set_amount(value),
            SessionCommand::Duration(value) => self.locker.set_duration(value),
            SessionCommand::Lock => {
                self.lock().await;
            }
            SessionCommand::Unlock => {
                self.unlock().await;
            }
            SessionCommand::Objects => self.refresh_objects().await,
            SessionCommand::Show => {}
            SessionCommand::Help => return Ok(Flow::Output(HELP.to_string())),
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Output(self.render()))
    }

    pub fn render(&self) -> String {
        let explorer_url = self.config.explorer_url();
        Screen {
            network: self.config.network,
            session: &self.session,
            objects: &self.objects,
            locker: &self.locker,
            explorer_url: &explorer_url,
        }
        .render()
    }
}
