//! LXP token balance lookup
//!
//! Calls `balanceOf(address) -> uint256` on the token contract and scales
//! the result by the token's 18 decimals.

use {
    super::{rpc::EthRpcClient, BalanceSource, Fetched, Metric},
    crate::error::FetchError,
    alloy_primitives::{keccak256, utils::format_units, Address, U256},
    async_trait::async_trait,
    std::{str::FromStr, sync::Arc},
};

pub const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";
pub const TOKEN_DECIMALS: u8 = 18;

/// Token balance in both display and base-unit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    /// Decimal string with [`TOKEN_DECIMALS`] fractional digits, `"0"` when unknown
    pub amount: String,
    /// Balance in base units
    pub raw: U256,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            amount: "0".to_string(),
            raw: U256::ZERO,
        }
    }
}

impl Balance {
    pub fn from_raw(raw: U256) -> Result<Self, FetchError> {
        Ok(Self {
            amount: format_units(raw, TOKEN_DECIMALS)?,
            raw,
        })
    }
}

/// ABI-encode `balanceOf(owner)`
pub fn balance_of_calldata(owner: &Address) -> Vec<u8> {
    let selector = keccak256(BALANCE_OF_SIGNATURE.as_bytes());
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&selector[..4]);
    data.extend_from_slice(owner.into_word().as_slice());
    data
}

/// Decode a single `uint256` return value
pub fn decode_uint256(data: &[u8]) -> Result<U256, FetchError> {
    if data.len() < 32 {
        return Err(FetchError::InvalidResponse(format!(
            "expected 32 bytes of return data, got {}",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(&data[..32]))
}

/// `balanceOf` reader bound to one token contract
#[derive(Clone)]
pub struct BalanceClient {
    rpc: Arc<EthRpcClient>,
    token: Address,
}

impl BalanceClient {
    pub fn new(rpc: Arc<EthRpcClient>, token: Address) -> Self {
        Self { rpc, token }
    }

    pub async fn query(&self, address: &str) -> Result<Balance, FetchError> {
        let owner = Address::from_str(address.trim())
            .map_err(|_| FetchError::InvalidAddress(address.to_string()))?;

        let data = self
            .rpc
            .eth_call(&self.token, &balance_of_calldata(&owner))
            .await?;
        let raw = decode_uint256(&data)?;
        Balance::from_raw(raw)
    }
}

#[async_trait]
impl BalanceSource for BalanceClient {
    async fn fetch_balance(&self, address: &str) -> Fetched<Balance> {
        match self.query(address).await {
            Ok(balance) => Fetched::success(balance),
            Err(e) => {
                log::warn!("{} for {}: {}", Metric::Balance.failure_message(), address, e);
                Fetched::failed(Balance::default(), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::fetch::Outcome,
        std::time::Duration,
        wiremock::{
            matchers::{body_partial_json, method},
            Mock, MockServer, ResponseTemplate,
        },
    };

    const OWNER: &str = "0x00000000000000000000000000000000000000ff";

    fn client_for(server: &MockServer) -> BalanceClient {
        let http = super::super::http_client(Duration::from_secs(2)).unwrap();
        let rpc = Arc::new(EthRpcClient::new(http, server.uri()));
        BalanceClient::new(rpc, Address::with_last_byte(0x01))
    }

    #[test]
    fn test_amount_has_token_precision() {
        let amount = |raw: U256| Balance::from_raw(raw).unwrap().amount;

        assert_eq!(
            amount(U256::from(1_500_000_000_000_000_000u128)),
            "1.500000000000000000"
        );
        assert_eq!(amount(U256::ZERO), "0.000000000000000000");
        assert_eq!(amount(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(
            amount(U256::MAX),
            "115792089237316195423570985008687907853269984665640564039457.584007913129639935"
        );
    }

    #[test]
    fn test_balance_of_calldata() {
        let owner = Address::from_str("0x00000000000000000000000000000000000000ff").unwrap();
        let data = balance_of_calldata(&owner);

        assert_eq!(data.len(), 36);
        assert_eq!(hex::encode(&data), format!("70a08231{}ff", "0".repeat(62)));
    }

    #[test]
    fn test_decode_uint256() {
        let mut word = [0u8; 32];
        word[31] = 0x2a;
        assert_eq!(decode_uint256(&word).unwrap(), U256::from(42u64));

        // Non-contract addresses return empty data
        assert!(decode_uint256(&[]).is_err());
    }

    #[tokio::test]
    async fn test_balance_from_node() {
        let server = MockServer::start().await;
        let calldata = format!("0x70a08231{}ff", "0".repeat(62));
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "method": "eth_call",
                "params": [{"to": "0x0000000000000000000000000000000000000001", "data": calldata}, "latest"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": format!("0x{:064x}", 1_500_000_000_000_000_000u128)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_balance(OWNER).await;
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.value.amount, "1.500000000000000000");
        assert_eq!(result.value.raw, U256::from(1_500_000_000_000_000_000u128));
    }

    #[tokio::test]
    async fn test_rpc_error_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "execution reverted"}
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_balance(OWNER).await;
        assert_eq!(result.value, Balance::default());
        match result.outcome {
            Outcome::Failed { detail } => assert!(detail.contains("execution reverted"), "{}", detail),
            Outcome::Success => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_empty_return_data_is_failed() {
        // Calls to an address without code return "0x"
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_balance(OWNER).await;
        assert_eq!(result.value, Balance::default());
        assert!(!result.outcome.is_success());
    }

    #[tokio::test]
    async fn test_invalid_address_never_reaches_the_node() {
        let http = super::super::http_client(Duration::from_secs(2)).unwrap();
        let rpc = Arc::new(EthRpcClient::new(http, "http://127.0.0.1:1"));
        let client = BalanceClient::new(rpc, Address::ZERO);

        let result = client.fetch_balance("not-an-address").await;
        assert_eq!(result.value, Balance::default());
        match result.outcome {
            Outcome::Failed { detail } => assert!(detail.contains("invalid address")),
            Outcome::Success => panic!("expected failure"),
        }
    }
}
