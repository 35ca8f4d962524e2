//! Text rendering of the coin locker screen

use std::fmt::Write as _;

use suichain_rs::{Network, SuiAddress};

use crate::composer::{CoinLocker, AMOUNT_PLACEHOLDER, DURATION_PLACEHOLDER};
use crate::objects::OwnedObjects;
use crate::session::{Gate, Session};

pub const CONNECT_BUTTON: &str = "[ Connect Wallet ]";
pub const LOCK_BUTTON: &str = "[ Lock Coin ]";
pub const UNLOCK_BUTTON: &str = "[ Unlock Coin ]";

/// Everything the screen shows
pub struct Screen<'a> {
    pub network: Network,
    pub session: &'a Session,
    pub objects: &'a OwnedObjects,
    pub locker: &'a CoinLocker,
    pub explorer_url: &'a str,
}

impl Screen<'_> {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Coin Locker ({})", self.network);

        let account = match self.session.gate() {
            Gate::ConnectPrompt => {
                let _ = writeln!(out, "{}", CONNECT_BUTTON);
                return out;
            }
            Gate::Connected(account) => account,
        };

        let _ = writeln!(out, "[ {} ]", abbreviate(&account.address()));
        let _ = writeln!(out, "Connected to {}", account.address());

        let object_lines = self.objects.render(self.explorer_url);
        if !object_lines.is_empty() {
            let _ = writeln!(out, "Owned objects:");
            for line in object_lines {
                let _ = writeln!(out, "{}", line);
            }
        }

        let form = self.locker.form();
        let _ = writeln!(out, "Amount:   {}", field(&form.amount, AMOUNT_PLACEHOLDER));
        let _ = writeln!(out, "Duration: {}", field(&form.duration, DURATION_PLACEHOLDER));

        let pending = if self.locker.is_pending() { "  (pending)" } else { "" };
        let _ = writeln!(out, "{} {}{}", LOCK_BUTTON, UNLOCK_BUTTON, pending);

        let status = self.locker.status().to_string();
        if !status.is_empty() {
            let _ = writeln!(out, "{}", status);
        }

        out
    }
}

fn field(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        format!("<{}>", placeholder)
    } else {
        value.to_string()
    }
}

/// `0x1234…cdef`
fn abbreviate(address: &SuiAddress) -> String {
    let hex = address.to_hex();
    format!("{}…{}", &hex[..6], &hex[hex.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use suichain_rs::testing::MockWallet;

    const EXPLORER: &str = "https://suiscan.xyz/testnet";

    #[test]
    fn test_disconnected_shows_only_connect() {
        let session = Session::disconnected();
        let locker = CoinLocker::new(Network::Testnet, None);
        let objects = OwnedObjects::Ready(vec![SuiAddress::from_low_byte(1)]);

        let text = Screen {
            network: Network::Testnet,
            session: &session,
            objects: &objects,
            locker: &locker,
            explorer_url: EXPLORER,
        }
        .render();

        assert_eq!(text, format!("Coin Locker (testnet)\n{}\n", CONNECT_BUTTON));
    }

    #[test]
    fn test_connected_screen() {
        let address = SuiAddress::from_low_byte(0x42);
        let session = Session::connected(Arc::new(MockWallet::new(address)));
        let locker = CoinLocker::new(Network::Testnet, None);
        locker.set_amount("100");
        let objects = OwnedObjects::Ready(vec![SuiAddress::from_low_byte(7)]);

        let text = Screen {
            network: Network::Testnet,
            session: &session,
            objects: &objects,
            locker: &locker,
            explorer_url: EXPLORER,
        }
        .render();

        assert!(text.contains(&format!("Connected to {}", address)));
        assert!(text.contains(&format!(
            "{}/object/{}",
            EXPLORER,
            SuiAddress::from_low_byte(7)
        )));
        assert!(text.contains("Amount:   100"));
        assert!(text.contains("<Duration in seconds>"));
        assert!(text.contains(LOCK_BUTTON) && text.contains(UNLOCK_BUTTON));
        assert!(!text.contains(CONNECT_BUTTON));
    }

    #[test]
    fn test_abbreviate() {
        let address = SuiAddress::from_low_byte(0xef);
        assert_eq!(abbreviate(&address), "0x0000…00ef");
    }
}
