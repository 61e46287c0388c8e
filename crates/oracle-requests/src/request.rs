use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// An oracle request as recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRequest {
    /// On-chain request id.
    pub request_id: B256,
    /// Coordinator contract that emitted the request.
    pub contract_address: Address,
    /// Billing subscription.
    pub subscription_id: u64,
    /// Owner of the subscription.
    pub subscription_owner: Address,
    /// Job the request is routed to.
    pub job_id: B256,
    /// Payment in juels.
    pub payment: U256,
    /// Contract receiving the fulfilment.
    pub callback_address: Address,
    /// Gas allowance for the callback.
    pub callback_gas_limit: u32,
    /// Transaction that emitted the request.
    pub tx_hash: B256,
    /// Unix seconds at which the request was recorded.
    pub created_at: u64,
    /// Unix seconds at which the request was fulfilled.
    pub fulfilled_at: Option<u64>,
}

impl OracleRequest {
    /// Whether a fulfilment has been recorded.
    pub const fn is_fulfilled(&self) -> bool {
        self.fulfilled_at.is_some()
    }
}
