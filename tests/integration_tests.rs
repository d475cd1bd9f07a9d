use httpmock::prelude::*;
use kldo_miner::config::{MinerSettings, RetryPolicy};
use kldo_miner::core::SessionData;
use kldo_miner::domain::model::Earnings;
use kldo_miner::domain::ports::SessionStore;
use kldo_miner::{FileSessionStore, KaleidoClient, MinerError, MinerWorker, MiningCoordinator};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};

const WALLET_A: &str = "0x1234567890abcdef1234567890abcdef12345678";
const WALLET_B: &str = "0xabcdef1234567890abcdef1234567890abcdef12";

fn test_settings(base_url: String, temp_dir: &std::path::Path) -> MinerSettings {
    MinerSettings {
        api_base: base_url,
        referer: "https://kaleidofinance.xyz/testnet".to_string(),
        user_agent: "test-agent".to_string(),
        wallets_file: temp_dir.join("wallets.txt").to_string_lossy().into_owned(),
        session_dir: temp_dir.to_string_lossy().into_owned(),
        update_interval: Duration::from_millis(50),
        retry: RetryPolicy {
            attempts: 1,
            base_delay: Duration::from_millis(10),
        },
    }
}

fn write_wallets(temp_dir: &std::path::Path, wallets: &[&str]) {
    let mut file = std::fs::File::create(temp_dir.join("wallets.txt")).unwrap();
    for wallet in wallets {
        writeln!(file, "{}", wallet).unwrap();
    }
}

fn mock_registered(server: &MockServer, bonus: f64) {
    server.mock(|when, then| {
        when.method(GET).path("/check-registration");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "isRegistered": true,
                "userData": {"referralBonus": bonus}
            }));
    });
}

#[tokio::test]
async fn test_end_to_end_mining_run() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    write_wallets(temp_dir.path(), &[WALLET_A, WALLET_B]);

    let server = MockServer::start();
    mock_registered(&server, 0.05);

    let update_mock = server.mock(|when, then| {
        when.method(POST).path("/update-balance");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "balance": 5.0}));
    });

    let settings = test_settings(server.base_url(), temp_dir.path());
    let coordinator = MiningCoordinator::new(settings);

    let summary = coordinator
        .run(tokio::time::sleep(Duration::from_millis(250)))
        .await
        .unwrap();

    assert_eq!(summary.wallets, 2);
    // each worker folds its pending earnings into paid at shutdown
    assert!(summary.total_paid > 0.0);

    // at least one periodic update plus the final flush, per wallet
    assert!(update_mock.hits() >= 4);

    // both sessions were persisted
    let store = FileSessionStore::new(temp_dir.path());
    assert!(store.load(WALLET_A).await.unwrap().is_some());
    assert!(store.load(WALLET_B).await.unwrap().is_some());
}

#[tokio::test]
async fn test_session_resume_across_runs() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let server = MockServer::start();
    mock_registered(&server, 0.0);

    server.mock(|when, then| {
        when.method(POST).path("/update-balance");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "balance": 50.0}));
    });

    // A previous run left a session an hour old with 7 KLDO paid out.
    let store = FileSessionStore::new(temp_dir.path());
    let previous = SessionData {
        start_time: chrono::Utc::now().timestamp_millis() - 3_600_000,
        earnings: Earnings {
            total: 20.0,
            pending: 0.0,
            paid: 7.0,
        },
        referral_bonus: 0.0,
    };
    store.save(WALLET_A, &previous).await.unwrap();

    let settings = test_settings(server.base_url(), temp_dir.path());
    let api = KaleidoClient::new(&settings).unwrap();
    let sessions = FileSessionStore::new(temp_dir.path());
    let worker = MinerWorker::new(
        WALLET_A.to_string(),
        1,
        api,
        sessions,
        settings.update_interval,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(worker.run(shutdown_rx));
    tokio::time::sleep(Duration::from_millis(150)).await;
    shutdown_tx.send(true).unwrap();

    let paid = handle.await.unwrap();

    // An hour of elapsed time at 75.5 MH/s is worth ~27 KLDO, all of it
    // folded into paid on top of the resumed 7.
    assert!(paid > 7.0);

    // The persisted total is whatever the server said.
    let session = store.load(WALLET_A).await.unwrap().unwrap();
    assert_eq!(session.earnings.total, 50.0);
    assert_eq!(session.start_time, previous.start_time);
}

#[tokio::test]
async fn test_unregistered_wallet_pays_nothing() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    write_wallets(temp_dir.path(), &[WALLET_A]);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/check-registration");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"isRegistered": false}));
    });

    let update_mock = server.mock(|when, then| {
        when.method(POST).path("/update-balance");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "balance": 0.0}));
    });

    let settings = test_settings(server.base_url(), temp_dir.path());
    let coordinator = MiningCoordinator::new(settings);

    let summary = coordinator
        .run(tokio::time::sleep(Duration::from_millis(150)))
        .await
        .unwrap();

    assert_eq!(summary.wallets, 1);
    assert_eq!(summary.total_paid, 0.0);
    update_mock.assert_hits(0);
}

#[tokio::test]
async fn test_dead_server_still_shuts_down_cleanly() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    write_wallets(temp_dir.path(), &[WALLET_A]);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/check-registration");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(POST).path("/update-balance");
        then.status(500);
    });

    let settings = test_settings(server.base_url(), temp_dir.path());
    let coordinator = MiningCoordinator::new(settings);

    let summary = coordinator
        .run(tokio::time::sleep(Duration::from_millis(150)))
        .await
        .unwrap();

    assert_eq!(summary.total_paid, 0.0);
}

#[tokio::test]
async fn test_empty_wallet_file_is_an_error() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("wallets.txt"), "# no wallets\n").unwrap();

    let server = MockServer::start();
    let settings = test_settings(server.base_url(), temp_dir.path());
    let coordinator = MiningCoordinator::new(settings);

    let result = coordinator.run(async {}).await;
    assert!(matches!(
        result,
        Err(MinerError::ConfigValidationError { .. })
    ));
}

#[tokio::test]
async fn test_coordinator_rejects_double_start() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    write_wallets(temp_dir.path(), &[WALLET_A]);

    let server = MockServer::start();
    mock_registered(&server, 0.0);
    server.mock(|when, then| {
        when.method(POST).path("/update-balance");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "balance": 1.0}));
    });

    let settings = test_settings(server.base_url(), temp_dir.path());
    let coordinator = Arc::new(MiningCoordinator::new(settings));
    let stop = Arc::new(Notify::new());

    let background = {
        let coordinator = Arc::clone(&coordinator);
        let stop = Arc::clone(&stop);
        tokio::spawn(async move { coordinator.run(stop.notified()).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = coordinator.run(async {}).await;
    assert!(matches!(second, Err(MinerError::AlreadyRunning)));

    stop.notify_one();
    let summary = background.await.unwrap().unwrap();
    assert_eq!(summary.wallets, 1);
}
