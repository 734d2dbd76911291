// Support (tip) business logic

use chrono::Utc;
use serde_json::Value;

use crate::db::repositories::NewSupportLog;
use crate::error::{ApiError, ApiResult};
use crate::eth::{parse_address, parse_tx_hash, EthAmount};
use crate::handlers::AppState;
use crate::models::{
    SendSupportRequest, SupportListResponse, SupportLogRequest, SupportLogResponse,
    SupportMessage,
};
use crate::services::ipfs_service::is_valid_cid;
use crate::services::validation::MAX_SUPPORT_MESSAGE_BYTES;

const DEFAULT_LIST_LIMIT: u64 = 50;
const MAX_LIST_LIMIT: u64 = 200;

/// Records a tip sent from the client and bumps the recipient's cached count
pub async fn log_support(
    state: &AppState,
    request: SupportLogRequest,
) -> ApiResult<SupportLogResponse> {
    let supporter = parse_address(&request.supporter_address)?;
    let recipient = parse_address(&request.recipient_address)?;
    if supporter == recipient {
        return Err(ApiError::InvalidRequest(
            "supporter and recipient must differ".to_string(),
        ));
    }
    let amount = EthAmount::parse(&request.amount)?;
    let transaction_hash = parse_tx_hash(&request.transaction_hash)?;
    let ipfs_hash = match request.ipfs_hash.map(|h| h.trim().to_string()) {
        Some(h) if h.is_empty() => None,
        Some(h) if !is_valid_cid(&h) => {
            return Err(ApiError::InvalidRequest(format!("invalid ipfsHash '{}'", h)))
        }
        other => other,
    };

    if state
        .repositories
        .support_log
        .exists_tx_hash(transaction_hash)
        .await?
    {
        return Err(ApiError::Conflict(format!(
            "Transaction {} already logged",
            transaction_hash
        )));
    }

    record(
        state,
        NewSupportLog {
            supporter,
            recipient,
            amount: amount.to_string(),
            transaction_hash,
            ipfs_hash,
        },
    )
    .await
}

/// Sends a tip from the server's account, with an optional IPFS-stored message, then logs it
pub async fn send_support(
    state: &AppState,
    request: SendSupportRequest,
) -> ApiResult<SupportLogResponse> {
    let recipient = parse_address(&request.recipient_address)?;
    let amount = EthAmount::parse(&request.amount)?;
    let message = request
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    if let Some(m) = &message {
        if m.len() > MAX_SUPPORT_MESSAGE_BYTES {
            return Err(ApiError::InvalidRequest(format!(
                "message must be at most {} bytes",
                MAX_SUPPORT_MESSAGE_BYTES
            )));
        }
    }
    let sender = state.config.sender_address.ok_or_else(|| {
        ApiError::Unavailable("SENDER_ADDRESS is not set".to_string())
    })?;
    if sender == recipient {
        return Err(ApiError::InvalidRequest(
            "supporter and recipient must differ".to_string(),
        ));
    }

    let ipfs_hash = match message {
        Some(message) => {
            let document = SupportMessage {
                message,
                from: sender.to_checksum(None),
                to: recipient.to_checksum(None),
                amount: amount.to_string(),
                timestamp: Utc::now().to_rfc3339(),
            };
            let value = serde_json::to_value(&document)
                .map_err(|e| ApiError::InternalError(e.to_string()))?;
            Some(state.ipfs.store_json(&value).await?)
        }
        None => None,
    };

    let sent = state
        .contract
        .send_support(recipient, amount.wei(), ipfs_hash.as_deref())
        .await?;
    tracing::info!(
        "Sent {} ETH from {} to {} in {}",
        amount,
        sent.supporter,
        recipient,
        sent.transaction_hash
    );

    let transaction_hash = sent.transaction_hash;
    record(
        state,
        NewSupportLog {
            supporter: sent.supporter,
            recipient,
            amount: amount.to_string(),
            transaction_hash: sent.transaction_hash,
            ipfs_hash,
        },
    )
    .await
    .inspect_err(|e| {
        tracing::error!("Tip {} confirmed on-chain but not logged: {}", transaction_hash, e)
    })
}

/// Support entries received by an address, newest first
pub async fn list_support(
    state: &AppState,
    raw_address: &str,
    limit: Option<u64>,
) -> ApiResult<SupportListResponse> {
    let address = parse_address(raw_address)?;
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

    let logs = &state.repositories.support_log;
    let total = logs.count_for_recipient(address).await?;
    let entries = logs.find_by_recipient(address, limit).await?;

    Ok(SupportListResponse {
        address: address.to_checksum(None),
        total,
        entries: entries.into_iter().map(Into::into).collect(),
    })
}

/// Fetches a support message document from IPFS
pub async fn get_support_message(state: &AppState, cid: &str) -> ApiResult<Value> {
    if !is_valid_cid(cid) {
        return Err(ApiError::InvalidRequest(format!("invalid CID '{}'", cid)));
    }
    Ok(state.ipfs.fetch_json(cid).await?)
}

async fn record(state: &AppState, entry: NewSupportLog) -> ApiResult<SupportLogResponse> {
    let supporter = entry.supporter;
    let recipient = entry.recipient;
    let model = state.repositories.support_log.record(entry).await?;
    tracing::info!(
        "Logged support from {} to {} ({})",
        supporter,
        recipient,
        model.transaction_hash
    );
    Ok(model.into())
}
