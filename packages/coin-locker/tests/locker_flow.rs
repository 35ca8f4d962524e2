//! Lock/Unlock flows end to end over a recording mock wallet
//!
//! Run with: cargo test -p coin-locker --test locker_flow

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{eyre, Result};
use tokio::sync::Semaphore;

use coin_locker::composer::{LOCK_COIN_ENTRY, TOKEN_LOCK_MODULE, UNLOCK_COIN_ENTRY};
use coin_locker::{
    App, CoinLocker, Config, ConfigOverrides, Flow, LockerError, ObjectSource, OwnedObjects,
    SessionCommand, Session, StatusMessage,
};
use suichain_rs::testing::{
    assert_clock_argument, assert_single_move_call, assert_single_split_from_gas, pure_address,
    pure_u64, MockOutcome, MockWallet,
};
use suichain_rs::{Network, ObjectId, SuiAddress};

fn package() -> ObjectId {
    SuiAddress::from_hex("0x5ea1").unwrap()
}

fn account() -> SuiAddress {
    SuiAddress::from_low_byte(0xa5)
}

fn locker() -> CoinLocker {
    CoinLocker::new(Network::Testnet, Some(package()))
}

/// Owned objects served from memory
struct StaticSource(Vec<ObjectId>);

#[async_trait]
impl ObjectSource for StaticSource {
    async fn owned_object_ids(&self, _owner: SuiAddress) -> Result<Vec<ObjectId>> {
        Ok(self.0.clone())
    }
}

struct BrokenSource;

#[async_trait]
impl ObjectSource for BrokenSource {
    async fn owned_object_ids(&self, _owner: SuiAddress) -> Result<Vec<ObjectId>> {
        Err(eyre!("fullnode unreachable"))
    }
}

// ============================================================================
// Session gate
// ============================================================================

mod disconnected {
    use super::*;

    #[tokio::test]
    async fn test_lock_prompts_and_never_submits() {
        let wallet = Arc::new(MockWallet::new(account()));
        let mut session = Session::connected(wallet.clone());
        session.disconnect();

        let locker = locker();
        locker.set_amount("100");
        locker.set_duration("3600");

        let status = locker.lock(&session).await;
        assert_eq!(status, StatusMessage::ConnectPrompt);
        assert_eq!(status.to_string(), "Please connect your wallet");
        assert_eq!(wallet.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_unlock_prompts_and_never_submits() {
        let locker = locker();
        let status = locker.unlock(&Session::disconnected()).await;
        assert_eq!(status, StatusMessage::ConnectPrompt);
        assert_eq!(locker.status(), StatusMessage::ConnectPrompt);
    }

    #[tokio::test]
    async fn test_prompt_wins_over_bad_input() {
        let locker = locker();
        locker.set_amount("not a number");
        let status = locker.lock(&Session::disconnected()).await;
        assert_eq!(status, StatusMessage::ConnectPrompt);
    }
}

// ============================================================================
// Lock
// ============================================================================

mod lock {
    use super::*;

    #[tokio::test]
    async fn test_builds_split_then_lock_call() {
        let wallet = Arc::new(MockWallet::new(account()));
        let session = Session::connected(wallet.clone());
        let locker = locker();
        locker.set_amount("100");
        locker.set_duration("3600");

        let status = locker.lock(&session).await;
        assert!(status.is_success());
        assert_eq!(status.to_string(), "Coins locked successfully");

        let submitted = wallet.submitted();
        assert_eq!(submitted.len(), 1);
        let pt = &submitted[0];

        let coin = assert_single_split_from_gas(pt, 100).unwrap();
        let call = assert_single_move_call(pt, TOKEN_LOCK_MODULE, LOCK_COIN_ENTRY).unwrap();
        assert_eq!(call.package, package());
        assert_eq!(call.arguments.len(), 3);
        assert_clock_argument(pt, call.arguments[0]).unwrap();
        assert_eq!(call.arguments[1], coin);
        assert_eq!(pure_u64(pt, call.arguments[2]).unwrap(), 3600);
    }

    #[tokio::test]
    async fn test_failure_reason_in_status() {
        let wallet = Arc::new(MockWallet::failing(account(), "Rejected from user"));
        let session = Session::connected(wallet.clone());
        let locker = locker();
        locker.set_amount("1");
        locker.set_duration("1");

        let status = locker.lock(&session).await;
        assert!(status.is_error());
        assert_eq!(status.to_string(), "Error: Rejected from user");
        assert_eq!(locker.status(), status);
        assert_eq!(wallet.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_success_and_failure_strings_differ() {
        let wallet = Arc::new(MockWallet::new(account()));
        wallet.push_outcome(MockOutcome::Success);
        wallet.push_outcome(MockOutcome::Failure("MoveAbort(token_lock, 0)".into()));
        let session = Session::connected(wallet.clone());
        let locker = locker();
        locker.set_amount("5");
        locker.set_duration("60");

        let ok = locker.lock(&session).await.to_string();
        let failed = locker.lock(&session).await.to_string();

        assert_ne!(ok, failed);
        assert!(failed.contains("MoveAbort(token_lock, 0)"));
        assert!(!ok.contains("Error"));
    }

    #[tokio::test]
    async fn test_invalid_amount_is_local() {
        let wallet = Arc::new(MockWallet::new(account()));
        let session = Session::connected(wallet.clone());
        let locker = locker();
        locker.set_amount("1.5");
        locker.set_duration("60");

        let status = locker.lock(&session).await;
        assert!(matches!(
            status,
            StatusMessage::Invalid(LockerError::InvalidAmount(_))
        ));
        assert!(status.to_string().starts_with("Invalid amount: "));
        assert_eq!(wallet.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_duration_is_local() {
        let wallet = Arc::new(MockWallet::new(account()));
        let session = Session::connected(wallet.clone());
        let locker = locker();
        locker.set_amount("10");

        let status = locker.lock(&session).await;
        assert!(status.to_string().starts_with("Invalid duration: "));
        assert_eq!(wallet.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_package_is_local() {
        let wallet = Arc::new(MockWallet::new(account()));
        let session = Session::connected(wallet.clone());
        let locker = CoinLocker::new(Network::Mainnet, None);
        locker.set_amount("10");
        locker.set_duration("10");

        let status = locker.lock(&session).await;
        assert_eq!(
            status,
            StatusMessage::Invalid(LockerError::MissingPackageId {
                network: Network::Mainnet
            })
        );
        assert_eq!(wallet.submission_count(), 0);
    }
}

// ============================================================================
// Unlock
// ============================================================================

mod unlock {
    use super::*;

    #[tokio::test]
    async fn test_builds_single_unlock_call_for_account() {
        let wallet = Arc::new(MockWallet::new(account()));
        let session = Session::connected(wallet.clone());
        let locker = locker();

        let status = locker.unlock(&session).await;
        assert_eq!(status.to_string(), "Coins unlocked successfully");

        let submitted = wallet.submitted();
        assert_eq!(submitted.len(), 1);
        let pt = &submitted[0];
        assert_eq!(pt.commands.len(), 1);

        let call = assert_single_move_call(pt, TOKEN_LOCK_MODULE, UNLOCK_COIN_ENTRY).unwrap();
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(pure_address(pt, call.arguments[0]).unwrap(), account());
    }

    #[tokio::test]
    async fn test_failure_reason_in_status() {
        let wallet = Arc::new(MockWallet::failing(
            account(),
            "MoveAbort(token_lock::unlock_coin_entry, 1)",
        ));
        let session = Session::connected(wallet);
        let locker = locker();

        let status = locker.unlock(&session).await;
        assert_eq!(
            status.to_string(),
            "Failed to unlock coins: MoveAbort(token_lock::unlock_coin_entry, 1)"
        );
    }

    #[tokio::test]
    async fn test_status_is_overwritten() {
        let wallet = Arc::new(MockWallet::failing(account(), "first"));
        let session = Session::connected(wallet);
        let locker = locker();

        locker.unlock(&session).await;
        assert!(locker.status().is_error());
        locker.unlock(&session).await;
        assert_eq!(locker.status().to_string(), "Coins unlocked successfully");
    }
}

// ============================================================================
// Overlapping submissions
// ============================================================================

mod in_flight {
    use super::*;

    #[tokio::test]
    async fn test_second_action_while_pending_is_ignored() {
        let gate = Arc::new(Semaphore::new(0));
        let wallet = Arc::new(MockWallet::gated(account(), gate.clone()));
        let session = Session::connected(wallet.clone());
        let locker = locker();
        locker.set_amount("100");
        locker.set_duration("3600");

        let first = locker.lock(&session);
        let second = async {
            while wallet.submission_count() == 0 {
                tokio::task::yield_now().await;
            }
            assert!(locker.is_pending());
            let lock_again = locker.lock(&session).await;
            let unlock = locker.unlock(&session).await;
            gate.add_permits(1);
            (lock_again, unlock)
        };

        let (first, (lock_again, unlock)) = tokio::join!(first, second);

        assert_eq!(lock_again, StatusMessage::Busy);
        assert_eq!(unlock, StatusMessage::Busy);
        assert_eq!(lock_again.to_string(), "A transaction is already pending");
        assert!(first.is_success());
        assert_eq!(wallet.submission_count(), 1);
        assert_eq!(locker.status(), first);
        assert!(!locker.is_pending());
    }

    #[tokio::test]
    async fn test_guard_released_after_failure() {
        let wallet = Arc::new(MockWallet::failing(account(), "network error"));
        let session = Session::connected(wallet.clone());
        let locker = locker();

        assert!(locker.unlock(&session).await.is_error());
        assert!(!locker.is_pending());
        assert!(locker.unlock(&session).await.is_success());
        assert_eq!(wallet.submission_count(), 2);
    }
}

// ============================================================================
// Owned objects and the interactive app
// ============================================================================

mod app {
    use super::*;

    fn config() -> Config {
        Config::default().with_overrides(ConfigOverrides {
            network: Some(Network::Testnet),
            rpc_url: None,
            package_id: Some(package()),
        })
    }

    #[tokio::test]
    async fn test_objects_empty_until_resolved_then_in_order() {
        let ids = vec![
            SuiAddress::from_low_byte(9),
            SuiAddress::from_low_byte(4),
            SuiAddress::from_low_byte(7),
        ];
        let mut app = App::with_source(config(), Arc::new(StaticSource(ids.clone())));

        assert!(app.objects().links("https://suiscan.xyz/testnet").is_empty());

        app.connect_wallet(Arc::new(MockWallet::new(account()))).await;

        let links = app.objects().links("https://suiscan.xyz/testnet");
        assert_eq!(links.len(), 3);
        assert_eq!(
            links.iter().map(|l| l.object_id).collect::<Vec<_>>(),
            ids
        );
        assert_eq!(
            links[0].href,
            format!("https://suiscan.xyz/testnet/object/{}", ids[0])
        );
    }

    #[tokio::test]
    async fn test_query_failure_shown() {
        let mut app = App::with_source(config(), Arc::new(BrokenSource));
        app.connect_wallet(Arc::new(MockWallet::new(account()))).await;

        assert_eq!(
            app.objects(),
            &OwnedObjects::Failed("fullnode unreachable".to_string())
        );
        assert!(app
            .render()
            .contains("Failed to load objects: fullnode unreachable"));
    }

    #[tokio::test]
    async fn test_command_session() {
        let wallet = Arc::new(MockWallet::new(account()));
        let mut app = App::with_source(config(), Arc::new(StaticSource(vec![])));

        let Flow::Output(screen) = app.handle(SessionCommand::Lock).await.unwrap() else {
            panic!("expected output");
        };
        assert!(screen.contains("[ Connect Wallet ]"));
        assert_eq!(app.locker().status(), StatusMessage::ConnectPrompt);

        app.connect_wallet(wallet.clone()).await;
        for line in ["amount 250", "duration 86400", "lock"] {
            app.handle(line.parse().unwrap()).await.unwrap();
        }
        let Flow::Output(screen) = app.handle(SessionCommand::Unlock).await.unwrap() else {
            panic!("expected output");
        };

        assert!(screen.contains(&format!("Connected to {}", account())));
        assert!(screen.contains("Coins unlocked successfully"));
        assert_eq!(wallet.submission_count(), 2);
        assert_single_split_from_gas(&wallet.submitted()[0], 250).unwrap();

        app.handle(SessionCommand::Disconnect).await.unwrap();
        assert!(!app.session().is_connected());
        assert!(app.objects().is_pending());
    }
}
