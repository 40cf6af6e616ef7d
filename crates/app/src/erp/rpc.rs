//! JSON-RPC 2.0 envelopes as spoken by Odoo's web controllers.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::erp::ErpError;

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: &'a Value,
    id: u64,
}

impl<'a> RpcRequest<'a> {
    pub(crate) fn call(id: u64, params: &'a Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params,
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    #[serde(default)]
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<RpcFaultData>,
}

#[derive(Debug, Deserialize)]
struct RpcFaultData {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a response body into its `result`, or an error.
///
/// Exactly one of `result` and `error` must be present; anything else is
/// rejected instead of being coalesced.
pub(crate) fn normalize(body: Value) -> Result<Value, ErpError> {
    let Value::Object(mut envelope) = body else {
        return Err(ErpError::UnexpectedResponse(
            "response body is not a JSON object".to_string(),
        ));
    };

    match (envelope.remove("result"), envelope.remove("error")) {
        (Some(result), None) => Ok(result),
        (None, Some(error)) => Err(fault(error)),
        (Some(_), Some(_)) => Err(ErpError::UnexpectedResponse(
            "response carries both result and error".to_string(),
        )),
        (None, None) => Err(ErpError::UnexpectedResponse(
            "response carries neither result nor error".to_string(),
        )),
    }
}

fn fault(error: Value) -> ErpError {
    match serde_json::from_value::<RpcFault>(error) {
        Ok(fault) => ErpError::Rpc {
            code: fault.code,
            message: fault.message,
            detail: fault.data.and_then(|data| data.message),
        },
        Err(source) => ErpError::UnexpectedResponse(format!("malformed error object: {source}")),
    }
}

/// Decode a normalized `result` into the expected type.
pub(crate) fn decode<T: DeserializeOwned>(result: Value) -> Result<T, ErpError> {
    serde_json::from_value(result).map_err(ErpError::Decode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn result_is_unwrapped() -> TestResult {
        let result = normalize(json!({"jsonrpc": "2.0", "id": 1, "result": 42}))?;

        assert_eq!(decode::<i64>(result)?, 42);

        Ok(())
    }

    #[test]
    fn null_result_is_still_a_result() -> TestResult {
        assert_eq!(normalize(json!({"id": 1, "result": null}))?, Value::Null);

        Ok(())
    }

    #[test]
    fn error_is_mapped_with_detail() {
        let result = normalize(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 200,
                "message": "Odoo Server Error",
                "data": {"name": "odoo.exceptions.ValidationError", "message": "Missing warehouse"}
            }
        }));

        match result {
            Err(ErpError::Rpc {
                code,
                message,
                detail,
            }) => {
                assert_eq!(code, 200);
                assert_eq!(message, "Odoo Server Error");
                assert_eq!(detail.as_deref(), Some("Missing warehouse"));
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }

    #[test]
    fn ambiguous_envelopes_are_rejected() {
        for body in [
            json!({"id": 1}),
            json!({"result": 1, "error": {"message": "x"}}),
            json!([1, 2]),
            json!({"error": "boom"}),
        ] {
            let result = normalize(body);

            assert!(
                matches!(result, Err(ErpError::UnexpectedResponse(_))),
                "expected UnexpectedResponse, got {result:?}"
            );
        }
    }

    #[test]
    fn request_uses_call_envelope() -> TestResult {
        let params = json!({"model": "sale.order"});

        assert_eq!(
            serde_json::to_value(RpcRequest::call(3, &params))?,
            json!({"jsonrpc": "2.0", "method": "call", "params": {"model": "sale.order"}, "id": 3})
        );

        Ok(())
    }
}
