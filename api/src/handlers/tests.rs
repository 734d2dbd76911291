// Router-level tests against an in-memory database and fake chain/IPFS services

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::entity::{profiles, support_logs};
use crate::eth::U256;
use crate::handlers::router;
use crate::test_support::{address, memory_db, sender, test_state, tx_hash, FakeContract, FakeIpfs};

struct TestApp {
    app: Router,
    db: DatabaseConnection,
    contract: Arc<FakeContract>,
    ipfs: Arc<FakeIpfs>,
}

impl TestApp {
    async fn new() -> Self {
        let db = memory_db().await;
        let contract = Arc::new(FakeContract::default());
        let ipfs = Arc::new(FakeIpfs::default());
        let app = router(test_state(db.clone(), contract.clone(), ipfs.clone()));
        TestApp {
            app,
            db,
            contract,
            ipfs,
        }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create_profile(&self, wallet: &str, name: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/api/profile",
            Some(json!({
                "walletAddress": wallet,
                "name": name,
                "bio": "Solidity and Rust",
                "githubHandle": "octocat",
                "projects": [
                    {"title": "Indexer", "url": "https://example.com/indexer"},
                    {"title": "Wallet", "description": "A wallet"}
                ]
            })),
        )
        .await
    }

    async fn log_support(&self, supporter: u8, recipient: &str, tx: u8) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/api/support/log",
            Some(json!({
                "supporterAddress": address(supporter).to_checksum(None),
                "recipientAddress": recipient,
                "amount": "0.01",
                "transactionHash": tx_hash(tx).to_string(),
            })),
        )
        .await
    }

    async fn profile_rows(&self) -> u64 {
        profiles::Entity::find().count(&self.db).await.unwrap()
    }

    async fn log_rows(&self) -> u64 {
        support_logs::Entity::find().count(&self.db).await.unwrap()
    }
}

#[tokio::test]
async fn test_create_profile_returns_201_and_is_retrievable_by_checksum_address() {
    let t = TestApp::new().await;
    let wallet = address(1);
    t.contract
        .support_counts
        .lock()
        .unwrap()
        .insert(wallet, U256::from(5));

    let lower = wallet.to_checksum(None).to_lowercase();
    let (status, body) = t.create_profile(&lower, "Ada").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["walletAddress"], wallet.to_checksum(None));
    assert_eq!(body["projects"].as_array().unwrap().len(), 2);
    assert_eq!(body["projects"][0]["title"], "Indexer");

    for form in [
        wallet.to_checksum(None),
        lower.clone(),
        format!("0x{}", lower[2..].to_uppercase()),
    ] {
        let (status, body) = t.call(Method::GET, &format!("/api/profile/{}", form), None).await;
        assert_eq!(status, StatusCode::OK, "lookup by {form}");
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["supportCount"], "5");
        assert_eq!(body["cachedSupportCount"], 0);
    }
}

#[tokio::test]
async fn test_update_overwrites_fields_without_duplicating() {
    let t = TestApp::new().await;
    let wallet = address(2).to_checksum(None);

    let (_, first) = t.create_profile(&wallet, "Grace").await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let (status, second) = t
        .call(
            Method::POST,
            "/api/profile",
            Some(json!({
                "walletAddress": wallet.to_lowercase(),
                "name": "Grace Hopper",
                "bio": "COBOL",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["name"], "Grace Hopper");
    assert_eq!(second["bio"], "COBOL");
    assert_eq!(second["githubHandle"], Value::Null);
    assert_eq!(second["projects"], json!([]));
    assert_ne!(second["lastUpdated"], first["lastUpdated"]);
    assert_eq!(second["createdAt"], first["createdAt"]);
    assert_eq!(t.profile_rows().await, 1);
}

#[tokio::test]
async fn test_support_log_increments_cached_count_by_one_per_call() {
    let t = TestApp::new().await;
    let recipient = address(3).to_checksum(None);
    t.create_profile(&recipient, "Linus").await;

    for i in 1..=3u8 {
        let (status, entry) = t.log_support(10 + i, &recipient, i).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["recipientAddress"], recipient);
        assert_eq!(entry["amount"], "0.01");
        assert_eq!(t.log_rows().await, u64::from(i));

        let cached = profiles::Entity::find()
            .filter(profiles::Column::WalletAddress.eq(recipient.as_str()))
            .one(&t.db)
            .await
            .unwrap()
            .unwrap()
            .support_count;
        assert_eq!(cached, i64::from(i));
    }

    let (status, list) = t
        .call(Method::GET, &format!("/api/support/{}?limit=2", recipient), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 3);
    assert_eq!(list["entries"].as_array().unwrap().len(), 2);
    assert_eq!(list["entries"][0]["transactionHash"], tx_hash(3).to_string());
}

#[tokio::test]
async fn test_support_log_rejects_duplicates_and_bad_input() {
    let t = TestApp::new().await;
    let recipient = address(4).to_checksum(None);
    t.create_profile(&recipient, "Dup").await;

    assert_eq!(t.log_support(9, &recipient, 1).await.0, StatusCode::CREATED);
    assert_eq!(t.log_support(9, &recipient, 1).await.0, StatusCode::CONFLICT);

    let (status, _) = t
        .call(
            Method::POST,
            "/api/support/log",
            Some(json!({
                "supporterAddress": address(9).to_checksum(None),
                "recipientAddress": recipient,
                "amount": "-1",
                "transactionHash": tx_hash(2).to_string(),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t.log_support(4, &recipient, 3).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "self-support is rejected");

    assert_eq!(t.log_rows().await, 1);
}

#[tokio::test]
async fn test_trending_is_limited_sorted_and_tolerates_failed_reads() {
    let t = TestApp::new().await;
    for i in 0..12u8 {
        let wallet = address(20 + i);
        t.create_profile(&wallet.to_checksum(None), &format!("dev{}", i)).await;
        profiles::Entity::update_many()
            .col_expr(
                profiles::Column::SupportCount,
                Expr::value(i64::from(i * 7 % 12)),
            )
            .filter(profiles::Column::WalletAddress.eq(wallet.to_checksum(None)))
            .exec(&t.db)
            .await
            .unwrap();
    }

    // the top entry has supporters, one read fails and one times out
    let top = address(20 + 5); // 5 * 7 % 12 == 11
    t.contract
        .supporters
        .lock()
        .unwrap()
        .insert(top, vec![address(1), address(2)]);
    t.contract.failing.lock().unwrap().insert(address(20 + 10)); // count 10
    t.contract.slow.lock().unwrap().insert(address(20 + 3)); // count 9

    let (status, body) = t.call(Method::GET, "/api/profiles/trending", None).await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 10);
    let counts: Vec<i64> = entries
        .iter()
        .map(|e| e["cachedSupportCount"].as_i64().unwrap())
        .collect();
    let mut sorted = counts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
    assert_eq!(counts[0], 11);

    assert_eq!(entries[0]["walletAddress"], top.to_checksum(None));
    assert_eq!(entries[0]["supporters"].as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["supportersAvailable"], true);
    assert_eq!(entries[1]["supportersAvailable"], false);
    assert_eq!(entries[2]["supportersAvailable"], false);
    assert_eq!(entries[3]["supportersAvailable"], true);
}

#[tokio::test]
async fn test_malformed_addresses_rejected_before_any_lookup() {
    let t = TestApp::new().await;
    let bad = "0x12345";
    let bad_checksum = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    let requests = [
        (Method::GET, format!("/api/profile/{}", bad), None),
        (Method::GET, format!("/api/profile/{}", bad_checksum), None),
        (Method::POST, format!("/api/profile/{}/mint", bad), None),
        (Method::GET, format!("/api/support/{}", bad), None),
        (
            Method::POST,
            "/api/profile".to_string(),
            Some(json!({"walletAddress": bad, "name": "x"})),
        ),
        (
            Method::POST,
            "/api/farcaster/verify".to_string(),
            Some(json!({"walletAddress": bad, "farcasterHandle": "x"})),
        ),
        (
            Method::POST,
            "/api/support/log".to_string(),
            Some(json!({
                "supporterAddress": bad,
                "recipientAddress": address(1).to_checksum(None),
                "amount": "1",
                "transactionHash": tx_hash(1).to_string(),
            })),
        ),
        (
            Method::POST,
            "/api/support/send".to_string(),
            Some(json!({"recipientAddress": bad, "amount": "1"})),
        ),
    ];

    for (method, uri, body) in requests {
        let (status, response) = t.call(method.clone(), &uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert!(response["error"].as_str().unwrap().contains("Invalid address"));
    }

    assert_eq!(t.contract.call_count(), 0);
    assert_eq!(t.profile_rows().await, 0);
    assert_eq!(t.log_rows().await, 0);
}

#[tokio::test]
async fn test_get_profile_not_found_and_chain_failure() {
    let t = TestApp::new().await;
    let wallet = address(5);

    let (status, _) = t
        .call(Method::GET, &format!("/api/profile/{}", wallet), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(t.contract.call_count(), 0);

    t.create_profile(&wallet.to_checksum(None), "Offline").await;
    t.contract.failing.lock().unwrap().insert(wallet);
    let (status, body) = t
        .call(Method::GET, &format!("/api/profile/{}", wallet), None)
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_farcaster_verify() {
    let t = TestApp::new().await;
    let wallet = address(6).to_checksum(None);

    let (status, _) = t
        .call(
            Method::POST,
            "/api/farcaster/verify",
            Some(json!({"walletAddress": wallet, "farcasterHandle": "@dwr"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    t.create_profile(&wallet, "Dan").await;
    let (status, body) = t
        .call(
            Method::POST,
            "/api/farcaster/verify",
            Some(json!({"walletAddress": wallet, "farcasterHandle": "@dwr"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("@dwr"));

    let (_, profile) = t
        .call(Method::GET, &format!("/api/profile/{}", wallet), None)
        .await;
    assert_eq!(profile["farcasterHandle"], "dwr");
    assert_eq!(profile["farcasterVerified"], true);
}

#[tokio::test]
async fn test_send_support_stores_message_and_logs_tip() {
    let t = TestApp::new().await;
    let recipient = address(7);
    t.create_profile(&recipient.to_checksum(None), "Vitalik").await;

    let (status, entry) = t
        .call(
            Method::POST,
            "/api/support/send",
            Some(json!({
                "recipientAddress": recipient.to_checksum(None),
                "amount": "0.05",
                "message": "Thanks for the indexer!",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["supporterAddress"], sender().to_checksum(None));
    assert_eq!(entry["amount"], "0.05");

    let sent = t.contract.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, recipient);
    assert_eq!(sent[0].1, U256::from(50_000_000_000_000_000u64));
    let cid = sent[0].2.clone().unwrap();
    assert_eq!(entry["ipfsHash"], cid);

    let (status, message) = t
        .call(Method::GET, &format!("/api/support/message/{}", cid), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message["message"], "Thanks for the indexer!");
    assert_eq!(message["to"], recipient.to_checksum(None));
    assert_eq!(t.ipfs.documents.lock().unwrap().len(), 1);

    let (_, list) = t
        .call(Method::GET, &format!("/api/support/{}", recipient), None)
        .await;
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_send_support_without_message_skips_ipfs() {
    let t = TestApp::new().await;
    let (status, entry) = t
        .call(
            Method::POST,
            "/api/support/send",
            Some(json!({"recipientAddress": address(8).to_checksum(None), "amount": "1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["ipfsHash"], Value::Null);
    assert!(t.ipfs.documents.lock().unwrap().is_empty());

    let (status, _) = t
        .call(
            Method::POST,
            "/api/support/send",
            Some(json!({
                "recipientAddress": address(8).to_checksum(None),
                "amount": "1",
                "message": "x".repeat(2000),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_support_message_rejects_invalid_cid_and_missing() {
    let t = TestApp::new().await;
    let (status, _) = t
        .call(Method::GET, "/api/support/message/bad..cid", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = format!("QmMissing{}", "0".repeat(37));
    let (status, _) = t
        .call(Method::GET, &format!("/api/support/message/{}", missing), None)
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_mint_profile_nft_once() {
    let t = TestApp::new().await;
    let wallet = address(9);

    let (status, _) = t
        .call(Method::POST, &format!("/api/profile/{}/mint", wallet), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    t.create_profile(&wallet.to_checksum(None), "Minter").await;
    let (status, minted) = t
        .call(Method::POST, &format!("/api/profile/{}/mint", wallet), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(minted["tokenId"], "1");

    let (status, _) = t
        .call(Method::POST, &format!("/api/profile/{}/mint", wallet), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, profile) = t
        .call(Method::GET, &format!("/api/profile/{}", wallet), None)
        .await;
    assert_eq!(profile["nftTokenId"], "1");
}

#[tokio::test]
async fn test_concurrent_mints_produce_one_token() {
    let t = TestApp::new().await;
    let wallet = address(10);
    t.create_profile(&wallet.to_checksum(None), "Racer").await;

    let uri = format!("/api/profile/{}/mint", wallet);
    let (first, second) = tokio::join!(
        t.call(Method::POST, &uri, None),
        t.call(Method::POST, &uri, None),
    );
    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(t.contract.minted.load(std::sync::atomic::Ordering::SeqCst), 1);

    let (_, profile) = t.call(Method::GET, &format!("/api/profile/{}", wallet), None).await;
    assert_eq!(profile["nftTokenId"], "1");
}

#[tokio::test]
async fn test_failed_mint_can_be_retried() {
    let t = TestApp::new().await;
    let wallet = address(11);
    t.create_profile(&wallet.to_checksum(None), "Retry").await;
    let uri = format!("/api/profile/{}/mint", wallet);

    t.contract.failing.lock().unwrap().insert(wallet);
    let (status, _) = t.call(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    t.contract.failing.lock().unwrap().clear();
    let (_, profile) = t.call(Method::GET, &format!("/api/profile/{}", wallet), None).await;
    assert_eq!(profile["nftTokenId"], Value::Null);
    let (status, minted) = t.call(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(minted["tokenId"], "1");
}

#[tokio::test]
async fn test_unreadable_json_bodies_are_bad_requests() {
    let t = TestApp::new().await;

    // missing name
    let (status, body) = t
        .call(
            Method::POST,
            "/api/profile",
            Some(json!({"walletAddress": "0x123"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/api/support/log")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"supporterAddress\":"))
        .unwrap();
    let (status, body) = t.send(malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let untyped = Request::builder()
        .method(Method::POST)
        .uri("/api/farcaster/verify")
        .body(Body::from(
            json!({"walletAddress": address(1).to_checksum(None), "farcasterHandle": "x"})
                .to_string(),
        ))
        .unwrap();
    let (status, body) = t.send(untyped).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(t.profile_rows().await, 0);
    assert_eq!(t.log_rows().await, 0);
}

#[tokio::test]
async fn test_health_endpoints() {
    let t = TestApp::new().await;

    let response = t
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, report) = t.call(Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["database"], true);
    assert_eq!(report["chainBlock"], 1234);
}
