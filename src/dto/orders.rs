use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderStatus},
    services::product_service::UploadedFile,
};

/// Checkout form as received from the multipart body, before validation.
#[derive(Debug, Default)]
pub struct CheckoutForm {
    pub product_id: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<String>,
    pub buyer_name: Option<String>,
    pub buyer_address: Option<String>,
    pub buyer_phone: Option<String>,
    pub payment_proof: Option<UploadedFile>,
}

/// A checkout that passed validation; nothing has been written yet.
#[derive(Debug)]
pub struct CheckoutRequest {
    pub product_id: Uuid,
    pub size: String,
    pub quantity: i32,
    pub buyer_name: String,
    pub buyer_address: String,
    pub buyer_phone: String,
    pub payment_proof: UploadedFile,
}

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

impl CheckoutForm {
    pub fn set_text(&mut self, name: &str, value: String) {
        match name {
            "product_id" => self.product_id = Some(value),
            "size" => self.size = Some(value),
            "quantity" => self.quantity = Some(value),
            "buyer_name" => self.buyer_name = Some(value),
            "buyer_address" => self.buyer_address = Some(value),
            "buyer_phone" => self.buyer_phone = Some(value),
            other => tracing::debug!(field = other, "ignoring unknown checkout field"),
        }
    }

    pub fn validate(self) -> AppResult<CheckoutRequest> {
        let product_id = required("product_id", self.product_id)?;
        let product_id = Uuid::parse_str(&product_id)
            .map_err(|_| AppError::BadRequest("product_id must be a UUID".into()))?;

        let quantity = match self.quantity.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| AppError::BadRequest("quantity must be at least 1".into()))?,
        };

        let buyer_name = required("buyer_name", self.buyer_name)?;
        let buyer_address = required("buyer_address", self.buyer_address)?;
        let buyer_phone = required("buyer_phone", self.buyer_phone)?;
        if !buyer_phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
        {
            return Err(AppError::BadRequest("buyer_phone is not a phone number".into()));
        }
        let size = required("size", self.size)?;

        let payment_proof = self
            .payment_proof
            .ok_or_else(|| AppError::BadRequest("Payment proof is required".into()))?;
        payment_proof.ensure_image()?;

        Ok(CheckoutRequest {
            product_id,
            size,
            quantity,
            buyer_name,
            buyer_address,
            buyer_phone,
            payment_proof,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// One of `pending`, `confirmed`, `shipped`, `delivered`, `cancelled`.
    pub status: String,
}

impl UpdateOrderStatusRequest {
    pub fn parsed(&self) -> AppResult<OrderStatus> {
        self.status.trim().parse()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentProof {
    pub order_id: Uuid,
    pub path: String,
}
