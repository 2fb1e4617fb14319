use crate::error::Result;
use crate::parameters::ResolvedParams;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUCCESS_URL: &str = "https://dias.agency/";
pub const CHECKOUT_EXPIRES_IN: u32 = 120;

/// Values read for one item of the create-order operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInput {
    pub name: String,
    pub email: String,
    pub amount: i64,
    pub code: String,
    pub description: String,
}

impl OrderInput {
    pub fn from_params(index: usize, params: &ResolvedParams) -> Result<Self> {
        Ok(Self {
            name: params.text(index, "name")?,
            email: params.text(index, "email")?,
            amount: params.integer(index, "amount")?,
            code: params.text(index, "code")?,
            description: params.text(index, "description")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSettings {
    pub success_url: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            success_url: DEFAULT_SUCCESS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub amount: i64,
    pub description: String,
    pub quantity: u32,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Checkout {
    pub expires_in: u32,
    pub billing_address_editable: bool,
    pub customer_editable: bool,
    pub accepted_payment_methods: Vec<String>,
    pub success_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub amount: i64,
    pub payment_method: String,
    pub checkout: Checkout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
}

impl OrderRequest {
    /// Builds a single-item checkout order. The item price and the charged
    /// amount are always the same value.
    pub fn new(input: OrderInput, settings: &CheckoutSettings) -> Self {
        let amount = input.amount;
        Self {
            customer: Customer {
                name: input.name,
                email: input.email,
            },
            items: vec![OrderItem {
                amount,
                description: input.description,
                quantity: 1,
                code: input.code,
            }],
            payments: vec![Payment {
                amount,
                payment_method: "checkout".to_string(),
                checkout: Checkout {
                    expires_in: CHECKOUT_EXPIRES_IN,
                    billing_address_editable: false,
                    customer_editable: true,
                    accepted_payment_methods: vec!["credit_card".to_string()],
                    success_url: settings.success_url.clone(),
                },
            }],
        }
    }
}
