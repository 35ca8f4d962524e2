//! Coin locker configuration
//!
//! Loaded from the environment (and `.env`), then overridden by CLI flags.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `SUI_NETWORK` | devnet / testnet / mainnet / localnet (default testnet) |
//! | `SUI_RPC_URL` | fullnode URL (default: the network's public fullnode) |
//! | `TOKEN_LOCK_PACKAGE_ID` | package id used when no per-network id is set |
//! | `TOKEN_LOCK_PACKAGE_ID_<NETWORK>` | package id for one network |
//! | `SUI_PRIVATE_KEY` | account key; absent means no wallet to connect |
//! | `SUI_GAS_BUDGET` | gas budget in MIST (default 10000000) |
//! | `EXPLORER_URL` | explorer base URL (default `https://suiscan.xyz/<network>`) |

use std::collections::BTreeMap;
use std::env;
use std::fmt;

use eyre::{eyre, Result, WrapErr};
use suichain_rs::redact::Redacted;
use suichain_rs::wallet::DEFAULT_GAS_BUDGET;
use suichain_rs::{KeypairWalletConfig, Network, ObjectId, SuiAddress};

/// Coin locker configuration
#[derive(Clone)]
pub struct Config {
    /// Selected network
    pub network: Network,
    /// Fullnode URL override
    pub rpc_url: Option<String>,
    /// Package id per network
    pub package_ids: BTreeMap<Network, ObjectId>,
    /// Package id for any network without its own
    pub default_package_id: Option<ObjectId>,
    /// Encoded account key
    pub private_key: Option<Redacted<String>>,
    /// Gas budget in MIST
    pub gas_budget: u64,
    /// Explorer base URL override
    pub explorer_url: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub network: Option<Network>,
    pub rpc_url: Option<String>,
    pub package_id: Option<ObjectId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: None,
            package_ids: BTreeMap::new(),
            default_package_id: None,
            private_key: None,
            gas_budget: DEFAULT_GAS_BUDGET,
            explorer_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }
        Self::from_env()
    }

    /// Read the process environment without touching `.env`
    pub fn from_env() -> Result<Self> {
        let network = match non_empty_var("SUI_NETWORK") {
            Some(s) => s.parse::<Network>().wrap_err("Invalid SUI_NETWORK")?,
            None => Network::default(),
        };

        let mut package_ids = BTreeMap::new();
        for candidate in Network::ALL {
            let key = package_id_var(candidate);
            if let Some(value) = non_empty_var(&key) {
                let id = SuiAddress::from_hex(&value).wrap_err_with(|| format!("Invalid {}", key))?;
                package_ids.insert(candidate, id);
            }
        }

        let default_package_id = non_empty_var("TOKEN_LOCK_PACKAGE_ID")
            .map(|s| SuiAddress::from_hex(&s).wrap_err("Invalid TOKEN_LOCK_PACKAGE_ID"))
            .transpose()?;

        let gas_budget = match non_empty_var("SUI_GAS_BUDGET") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| eyre!("Invalid SUI_GAS_BUDGET: {}", s))?,
            None => DEFAULT_GAS_BUDGET,
        };

        Ok(Self {
            network,
            rpc_url: non_empty_var("SUI_RPC_URL"),
            package_ids,
            default_package_id,
            private_key: env::var("SUI_PRIVATE_KEY")
                .ok()
                .and_then(|key| Redacted::from_non_empty(&key)),
            gas_budget,
            explorer_url: non_empty_var("EXPLORER_URL"),
        })
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(network) = overrides.network {
            self.network = network;
        }
        if let Some(url) = overrides.rpc_url {
            self.rpc_url = Some(url);
        }
        if let Some(id) = overrides.package_id {
            self.package_ids.insert(self.network, id);
        }
        self
    }

    /// Fullnode URL for the selected network
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.fullnode_url().to_string())
    }

    /// `token_lock` package id for the selected network
    pub fn package_id(&self) -> Option<ObjectId> {
        self.package_ids
            .get(&self.network)
            .copied()
            .or(self.default_package_id)
    }

    /// Explorer base URL for the selected network
    pub fn explorer_url(&self) -> String {
        self.explorer_url
            .clone()
            .unwrap_or_else(|| format!("https://suiscan.xyz/{}", self.network))
    }

    /// Keypair wallet settings, when a key is configured
    pub fn wallet_config(&self) -> Option<KeypairWalletConfig> {
        self.private_key.as_ref().map(|key| KeypairWalletConfig {
            rpc_url: self.rpc_url(),
            private_key: key.clone(),
            gas_budget: Some(self.gas_budget),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url())
            .field("package_id", &self.package_id())
            .field("private_key", &self.private_key)
            .field("gas_budget", &self.gas_budget)
            .field("explorer_url", &self.explorer_url())
            .finish()
    }
}

/// `TOKEN_LOCK_PACKAGE_ID_TESTNET` etc.
pub fn package_id_var(network: Network) -> String {
    format!("TOKEN_LOCK_PACKAGE_ID_{}", network.as_str().to_ascii_uppercase())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_package(network: Network, id: u8) -> Config {
        let mut config = Config::default();
        config
            .package_ids
            .insert(network, SuiAddress::from_low_byte(id));
        config
    }

    #[test]
    fn test_package_id_var() {
        assert_eq!(package_id_var(Network::Testnet), "TOKEN_LOCK_PACKAGE_ID_TESTNET");
        assert_eq!(package_id_var(Network::Localnet), "TOKEN_LOCK_PACKAGE_ID_LOCALNET");
    }

    #[test]
    fn test_defaults_follow_network() {
        let config = Config::default().with_overrides(ConfigOverrides {
            network: Some(Network::Mainnet),
            ..Default::default()
        });
        assert_eq!(config.rpc_url(), "https://fullnode.mainnet.sui.io:443");
        assert_eq!(config.explorer_url(), "https://suiscan.xyz/mainnet");
        assert!(config.package_id().is_none());
    }

    #[test]
    fn test_per_network_package_wins_over_default() {
        let mut config = with_package(Network::Testnet, 0x10);
        config.default_package_id = Some(SuiAddress::from_low_byte(0x20));

        assert_eq!(config.package_id(), Some(SuiAddress::from_low_byte(0x10)));

        let config = config.with_overrides(ConfigOverrides {
            network: Some(Network::Devnet),
            ..Default::default()
        });
        assert_eq!(config.package_id(), Some(SuiAddress::from_low_byte(0x20)));
    }

    #[test]
    fn test_cli_package_override_applies_to_selected_network() {
        let config = with_package(Network::Testnet, 0x10).with_overrides(ConfigOverrides {
            network: Some(Network::Devnet),
            rpc_url: Some("http://localhost:9000".into()),
            package_id: Some(SuiAddress::from_low_byte(0x30)),
        });
        assert_eq!(config.package_id(), Some(SuiAddress::from_low_byte(0x30)));
        assert_eq!(
            config.package_ids.get(&Network::Testnet),
            Some(&SuiAddress::from_low_byte(0x10))
        );
        assert_eq!(config.rpc_url(), "http://localhost:9000");
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut config = with_package(Network::Testnet, 1);
        config.private_key = Some(Redacted::new("suiprivkey1secret".to_string()));
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("suiprivkey1secret"));
    }

    #[test]
    fn test_wallet_config_only_with_key() {
        let mut config = with_package(Network::Testnet, 1);
        assert!(config.wallet_config().is_none());

        config.private_key = Some(Redacted::new("suiprivkey1abc".to_string()));
        let wallet = config.wallet_config().unwrap();
        assert_eq!(wallet.private_key.expose(), "suiprivkey1abc");
        assert_eq!(wallet.gas_budget, Some(DEFAULT_GAS_BUDGET));
        assert_eq!(wallet.rpc_url, "https://fullnode.testnet.sui.io:443");
    }
}
