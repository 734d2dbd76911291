// Support and profile NFT contract bindings

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Log, TransactionReceipt, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::eth::ChainError;

sol! {
    /// Tip jar that counts and remembers supporters per developer
    interface ISupportRegistry {
        function getSupportCount(address developer) external view returns (uint256);
        function getSupporters(address developer) external view returns (address[] memory);
        function support(address developer, string calldata messageCid) external payable;
    }

    /// ERC-721 profile badge
    interface IProfileNft {
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
        function mintProfile(address to) external returns (uint256);
    }
}

/// A confirmed tip transaction
#[derive(Debug, Clone)]
pub struct SentSupport {
    pub supporter: Address,
    pub transaction_hash: B256,
}

/// A confirmed profile NFT mint
#[derive(Debug, Clone)]
pub struct MintedNft {
    pub token_id: U256,
    pub transaction_hash: B256,
}

/// Reads and writes against the support and profile NFT contracts.
///
/// Calls are made once; failures propagate to the caller untouched.
#[async_trait]
pub trait SupportContract: Send + Sync {
    /// On-chain number of tips received by `developer`
    async fn get_support_count(&self, developer: Address) -> Result<U256, ChainError>;

    /// Accounts that have tipped `developer`
    async fn get_supporters(&self, developer: Address) -> Result<Vec<Address>, ChainError>;

    /// Sends `amount_wei` to `recipient` through the support contract and waits for a confirmation
    async fn send_support(
        &self,
        recipient: Address,
        amount_wei: U256,
        message_cid: Option<&str>,
    ) -> Result<SentSupport, ChainError>;

    /// Mints a profile NFT to `owner` and returns the token id from the Transfer event
    async fn mint_profile_nft(&self, owner: Address) -> Result<MintedNft, ChainError>;

    /// Latest block seen by the node
    async fn latest_block(&self) -> Result<u64, ChainError>;
}

/// Provider-backed implementation. Transactions are sent with
/// `eth_sendTransaction`, so the node signs for the sender account.
pub struct EthContractService {
    provider: DynProvider,
    support_contract: Option<Address>,
    nft_contract: Option<Address>,
    sender: Option<Address>,
    confirmation_timeout: Duration,
}

impl EthContractService {
    pub fn new(config: &ApiConfig) -> Result<Self, ChainError> {
        let url: reqwest::Url = config.eth_rpc_url.parse().map_err(|e| {
            ChainError::NotConfigured(format!("ETH_RPC_URL '{}': {}", config.eth_rpc_url, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            support_contract: config.support_contract,
            nft_contract: config.nft_contract,
            sender: config.sender_address,
            confirmation_timeout: config.tx_confirmation_timeout,
        })
    }

    fn support_contract(&self) -> Result<Address, ChainError> {
        self.support_contract
            .ok_or_else(|| ChainError::NotConfigured("SUPPORT_CONTRACT_ADDRESS is not set".into()))
    }

    fn nft_contract(&self) -> Result<Address, ChainError> {
        self.nft_contract
            .ok_or_else(|| ChainError::NotConfigured("NFT_CONTRACT_ADDRESS is not set".into()))
    }

    fn sender(&self) -> Result<Address, ChainError> {
        self.sender
            .ok_or_else(|| ChainError::NotConfigured("SENDER_ADDRESS is not set".into()))
    }

    async fn read<C: SolCall>(&self, contract: Address, call: C) -> Result<C::Return, ChainError> {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(call.abi_encode());
        let output: Bytes = self.provider.call(tx).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    async fn transact<C: SolCall>(
        &self,
        contract: Address,
        value: U256,
        call: C,
    ) -> Result<(Address, TransactionReceipt), ChainError> {
        let from = self.sender()?;
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(contract)
            .with_value(value)
            .with_input(call.abi_encode());

        let pending = self.provider.send_transaction(tx).await?;
        let hash = *pending.tx_hash();
        tracing::info!("Submitted {} to {} in {}", C::SIGNATURE, contract, hash);

        let receipt = pending
            .with_required_confirmations(1)
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await?;
        if !receipt.status() {
            return Err(ChainError::Reverted(hash));
        }
        tracing::info!(
            "Transaction {} confirmed in block {}",
            hash,
            receipt.block_number.unwrap_or_default()
        );
        Ok((from, receipt))
    }
}

#[async_trait]
impl SupportContract for EthContractService {
    async fn get_support_count(&self, developer: Address) -> Result<U256, ChainError> {
        self.read(
            self.support_contract()?,
            ISupportRegistry::getSupportCountCall { developer },
        )
        .await
    }

    async fn get_supporters(&self, developer: Address) -> Result<Vec<Address>, ChainError> {
        self.read(
            self.support_contract()?,
            ISupportRegistry::getSupportersCall { developer },
        )
        .await
    }

    async fn send_support(
        &self,
        recipient: Address,
        amount_wei: U256,
        message_cid: Option<&str>,
    ) -> Result<SentSupport, ChainError> {
        let call = ISupportRegistry::supportCall {
            developer: recipient,
            messageCid: message_cid.unwrap_or_default().to_string(),
        };
        let (supporter, receipt) = self
            .transact(self.support_contract()?, amount_wei, call)
            .await?;

        Ok(SentSupport {
            supporter,
            transaction_hash: receipt.transaction_hash,
        })
    }

    async fn mint_profile_nft(&self, owner: Address) -> Result<MintedNft, ChainError> {
        let nft_contract = self.nft_contract()?;
        let call = IProfileNft::mintProfileCall { to: owner };
        let (_, receipt) = self.transact(nft_contract, U256::ZERO, call).await?;

        let token_id = minted_token_id(receipt.inner.logs(), nft_contract)
            .ok_or(ChainError::MissingEvent(receipt.transaction_hash))?;
        Ok(MintedNft {
            token_id,
            transaction_hash: receipt.transaction_hash,
        })
    }

    async fn latest_block(&self) -> Result<u64, ChainError> {
        Ok(self.provider.get_block_number().await?)
    }
}

/// Token id from the first ERC-721 Transfer log emitted by `contract`
fn minted_token_id(logs: &[Log], contract: Address) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .find_map(|log| log.log_decode::<IProfileNft::Transfer>().ok())
        .map(|transfer| transfer.inner.data.tokenId)
}
