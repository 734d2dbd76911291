// Shared fixtures for unit and handler tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::transports::TransportErrorKind;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema};
use serde_json::{json, Value};

use crate::config::ApiConfig;
use crate::db::repositories::{ProfileFields, Repositories};
use crate::entity::prelude::{Profiles, SupportLogs};
use crate::eth::{parse_tx_hash, Address, ChainError, B256, U256};
use crate::handlers::{AppContext, AppState};
use crate::services::contract_service::{MintedNft, SentSupport, SupportContract};
use crate::services::ipfs_service::{ContentStore, IpfsError};

/// Single-connection in-memory SQLite database with the API tables created
pub async fn memory_db() -> DatabaseConnection {
    let opts = ConnectOptions::new("sqlite::memory:".to_string())
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false)
        .to_owned();
    let db = Database::connect(opts)
        .await
        .expect("connect to in-memory sqlite");

    let schema = Schema::new(DbBackend::Sqlite);
    let statements = [
        schema.create_table_from_entity(Profiles),
        schema.create_table_from_entity(SupportLogs),
    ];
    for stmt in statements {
        db.execute(db.get_database_backend().build(&stmt))
            .await
            .expect("create table");
    }
    db
}

/// Deterministic address whose last byte is `n`
pub fn address(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xab;
    bytes[19] = n;
    Address::from(bytes)
}

/// Deterministic transaction hash whose last byte is `n`
pub fn tx_hash(n: u8) -> B256 {
    parse_tx_hash(&format!("0x{}{:02x}", "00".repeat(31), n)).expect("valid hash")
}

pub fn sample_fields(name: &str) -> ProfileFields {
    ProfileFields {
        name: name.to_string(),
        bio: "Builds things".to_string(),
        avatar_url: None,
        farcaster_handle: None,
        github_handle: Some("octocat".to_string()),
        twitter_handle: None,
        blog_url: None,
        projects: json!([]),
    }
}

/// Account the fake contract sends from
pub fn sender() -> Address {
    address(200)
}

/// In-process stand-in for the support and NFT contracts
#[derive(Default)]
pub struct FakeContract {
    pub calls: AtomicUsize,
    pub support_counts: Mutex<HashMap<Address, U256>>,
    pub supporters: Mutex<HashMap<Address, Vec<Address>>>,
    pub failing: Mutex<HashSet<Address>>,
    pub slow: Mutex<HashSet<Address>>,
    pub sent: Mutex<Vec<(Address, U256, Option<String>)>>,
    pub minted: AtomicUsize,
}

impl FakeContract {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn read_guard(&self, address: Address) -> Result<(), ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let slow = self.slow.lock().unwrap().contains(&address);
        if slow {
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        if self.failing.lock().unwrap().contains(&address) {
            return Err(TransportErrorKind::custom_str("connection refused").into());
        }
        Ok(())
    }
}

#[async_trait]
impl SupportContract for FakeContract {
    async fn get_support_count(&self, address: Address) -> Result<U256, ChainError> {
        self.read_guard(address).await?;
        Ok(self
            .support_counts
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn get_supporters(&self, address: Address) -> Result<Vec<Address>, ChainError> {
        self.read_guard(address).await?;
        Ok(self
            .supporters
            .lock()
            .unwrap()
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_support(
        &self,
        recipient: Address,
        amount_wei: U256,
        message_cid: Option<&str>,
    ) -> Result<SentSupport, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut sent = self.sent.lock().unwrap();
        sent.push((recipient, amount_wei, message_cid.map(str::to_string)));
        Ok(SentSupport {
            supporter: sender(),
            transaction_hash: tx_hash(100 + sent.len() as u8),
        })
    }

    async fn mint_profile_nft(&self, owner: Address) -> Result<MintedNft, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // a mint spans at least one block
        tokio::time::sleep(Duration::from_millis(50)).await;
        if self.failing.lock().unwrap().contains(&owner) {
            return Err(TransportErrorKind::custom_str("insufficient funds").into());
        }
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MintedNft {
            token_id: U256::from(n),
            transaction_hash: tx_hash(150 + n as u8),
        })
    }

    async fn latest_block(&self) -> Result<u64, ChainError> {
        Ok(1234)
    }
}

/// In-memory content store
#[derive(Default)]
pub struct FakeIpfs {
    pub documents: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl ContentStore for FakeIpfs {
    async fn store_json(&self, value: &Value) -> Result<String, IpfsError> {
        let mut documents = self.documents.lock().unwrap();
        let cid = format!("QmFake{:040}", documents.len());
        documents.insert(cid.clone(), value.clone());
        Ok(cid)
    }

    async fn fetch_json(&self, cid: &str) -> Result<Value, IpfsError> {
        self.documents
            .lock()
            .unwrap()
            .get(cid)
            .cloned()
            .ok_or_else(|| IpfsError::Status {
                status: 404,
                body: "not found".to_string(),
            })
    }
}

/// Application state over the given database and fakes
pub fn test_state(
    db: DatabaseConnection,
    contract: Arc<FakeContract>,
    ipfs: Arc<FakeIpfs>,
) -> AppState {
    let mut config = ApiConfig::for_tests();
    config.sender_address = Some(sender());

    Arc::new(AppContext {
        config: Arc::new(config),
        repositories: Repositories::new(db),
        contract,
        ipfs,
    })
}
