use crate::credentials::{AuthenticatingClient, RawResponse};
use crate::error::{NodeError, Result};
use crate::order::{CheckoutSettings, OrderInput, OrderRequest};
use crate::parameters::{NodeParameters, ParameterResolver};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const ORDERS_PATH: &str = "/orders";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPolicy {
    /// Record a failed item in the output and move on instead of aborting the run.
    #[serde(default)]
    pub continue_on_fail: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairedItem {
    pub item: usize,
}

/// Output envelope; `paired_item.item` is the index of the input it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionItem {
    pub json: Value,
    pub paired_item: PairedItem,
    /// Set when the item failed under `continue_on_fail`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ExecutionItem {
    pub fn new(index: usize, json: Value) -> Self {
        Self {
            json,
            paired_item: PairedItem { item: index },
            error: false,
        }
    }

    /// Envelope for a failed item: the error message plus, when the API
    /// answered, its status and response body.
    pub fn failed(index: usize, err: &NodeError) -> Self {
        let mut json = json!({ "error": err.to_string() });
        if let Some((status, body)) = err.remote_response() {
            json["status"] = json!(status);
            json["body"] = body.clone();
        }
        Self {
            json,
            paired_item: PairedItem { item: index },
            error: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}

/// Creates one Pagar.me order per input item, strictly in input order.
pub struct OrderExecutor {
    client: Box<dyn AuthenticatingClient>,
    resolver: ParameterResolver,
    checkout: CheckoutSettings,
    policy: ExecutionPolicy,
}

impl OrderExecutor {
    pub fn new(client: Box<dyn AuthenticatingClient>, params: NodeParameters) -> Result<Self> {
        Ok(Self {
            client,
            resolver: ParameterResolver::new(params)?,
            checkout: CheckoutSettings::default(),
            policy: ExecutionPolicy::default(),
        })
    }

    pub fn with_checkout(mut self, checkout: CheckoutSettings) -> Self {
        self.checkout = checkout;
        self
    }

    pub fn with_policy(mut self, policy: ExecutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    pub fn build_request(&self, index: usize, item: &Value) -> Result<OrderRequest> {
        let params = self.resolver.resolve(index, item)?;
        let input = OrderInput::from_params(index, &params)?;
        Ok(OrderRequest::new(input, &self.checkout))
    }

    /// Validates, submits and returns the raw API response for one item.
    pub async fn submit(&self, index: usize, item: &Value) -> Result<Value> {
        let order = self.build_request(index, item)?;
        let body = serde_json::to_value(&order).map_err(|e| NodeError::OrderSubmission {
            index,
            status: None,
            message: format!("Failed to serialize order: {}", e),
            body: None,
        })?;
        debug!(index, payload = %body, "Submitting order");

        let resp = self
            .client
            .post_json(ORDERS_PATH, &body)
            .await
            .map_err(|e| NodeError::OrderSubmission {
                index,
                status: None,
                message: format!("Request failed: {}", e),
                body: None,
            })?;

        info!(index, status = resp.status, "Order request completed");
        classify(index, resp)
    }

    /// Runs one item under the configured policy. With `continue_on_fail` an
    /// item failure becomes an error envelope instead of an `Err`.
    pub async fn process(&self, index: usize, item: &Value) -> Result<ExecutionItem> {
        match self.submit(index, item).await {
            Ok(response) => Ok(ExecutionItem::new(index, response)),
            Err(e) if self.policy.continue_on_fail => {
                warn!(index, error = %e, "Order failed, continuing");
                Ok(ExecutionItem::failed(index, &e))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn execute(&self, items: &[Value]) -> Result<Vec<ExecutionItem>> {
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            output.push(self.process(index, item).await?);
        }
        Ok(output)
    }
}

fn classify(index: usize, resp: RawResponse) -> Result<Value> {
    if resp.is_success() {
        return serde_json::from_slice(&resp.body).map_err(|e| NodeError::OrderSubmission {
            index,
            status: Some(resp.status),
            message: format!("Malformed JSON response: {}", e),
            body: Some(resp.body_value()),
        });
    }

    match resp.status {
        401 | 403 => Err(NodeError::Authentication {
            index,
            status: resp.status,
            body: resp.body_value(),
        }),
        status => Err(NodeError::OrderSubmission {
            index,
            status: Some(status),
            message: format!("HTTP Error: {}", status),
            body: Some(resp.body_value()),
        }),
    }
}
