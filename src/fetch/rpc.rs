//! Minimal Ethereum JSON-RPC client for read-only contract calls.
//!
//! One client is shared by every balance lookup of a batch. It holds no
//! mutable state beyond the request id counter, so concurrent calls are safe.
//! There is no retry: a failed call is reported once and left to the caller.

use {
    alloy_primitives::Address,
    serde::{de::DeserializeOwned, Deserialize, Serialize},
    std::sync::atomic::{AtomicU64, Ordering},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON-RPC error: code={code}, message={message}")]
    JsonRpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// `eth_call` transaction object
#[derive(Debug, Serialize)]
struct CallRequest {
    to: String,
    data: String,
}

pub struct EthRpcClient {
    http: reqwest::Client,
    url: String,
    request_id: AtomicU64,
}

impl EthRpcClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            request_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Make a single RPC call
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };

        let response = self.http.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(RpcError::InvalidResponse(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body: JsonRpcResponse<R> = response.json().await?;
        unwrap_response(body)
    }

    /// `eth_call` against the latest block, returning the raw return data
    pub async fn eth_call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, RpcError> {
        let call = CallRequest {
            to: format!("0x{}", hex::encode(to.as_slice())),
            data: format!("0x{}", hex::encode(data)),
        };

        let result: String = self.call("eth_call", (call, "latest")).await?;
        decode_hex(&result)
    }
}

fn unwrap_response<R>(body: JsonRpcResponse<R>) -> Result<R, RpcError> {
    if let Some(err) = body.error {
        return Err(RpcError::JsonRpc {
            code: err.code,
            message: err.message,
        });
    }
    body.result
        .ok_or_else(|| RpcError::InvalidResponse("missing result".to_string()))
}

fn decode_hex(value: &str) -> Result<Vec<u8>, RpcError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::InvalidResponse(format!("result not 0x-prefixed: {}", value)))?;
    hex::decode(digits).map_err(|e| RpcError::InvalidResponse(format!("bad hex result: {}", e)))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        wiremock::{
            matchers::{body_partial_json, method},
            Mock, MockServer, ResponseTemplate,
        },
    };

    fn client_for(server: &MockServer) -> EthRpcClient {
        EthRpcClient::new(reqwest::Client::new(), server.uri())
    }

    #[test]
    fn test_request_shape() {
        let call = CallRequest {
            to: "0x01".to_string(),
            data: "0x70a08231".to_string(),
        };
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_call",
            params: (call, "latest"),
            id: 9,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "eth_call",
                "params": [{"to": "0x01", "data": "0x70a08231"}, "latest"],
                "id": 9
            })
        );
    }

    #[test]
    fn test_error_object_wins() {
        let body: JsonRpcResponse<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap();

        match unwrap_response(body) {
            Err(RpcError::JsonRpc { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "execution reverted");
            }
            other => panic!("expected JSON-RPC error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_result() {
        let body: JsonRpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            unwrap_response(body),
            Err(RpcError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_eth_call_returns_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "method": "eth_call",
                "params": [{"to": "0x00000000000000000000000000000000000000aa", "data": "0x0102"}, "latest"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x0a0b"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let to = Address::with_last_byte(0xaa);
        let data = client_for(&server).eth_call(&to, &[0x01, 0x02]).await.unwrap();
        assert_eq!(data, vec![0x0a, 0x0b]);
    }

    #[tokio::test]
    async fn test_eth_call_error_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "execution reverted"}
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).eth_call(&Address::ZERO, &[]).await;
        assert!(matches!(
            result,
            Err(RpcError::JsonRpc { code: -32000, .. })
        ));
    }

    #[tokio::test]
    async fn test_eth_call_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = client_for(&server).eth_call(&Address::ZERO, &[]).await;
        assert!(matches!(result, Err(RpcError::InvalidResponse(_))));
    }

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("0x0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert!(decode_hex("0x").unwrap().is_empty());
        assert!(decode_hex("0a0b").is_err());
        assert!(decode_hex("0xzz").is_err());
    }
}
