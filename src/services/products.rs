//! Products service: `{ id, name, price, createdAt }`.

use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::services::store::{created_at, new_record_id};
use crate::services::{crud_router, Resource, ServiceError};

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_BASE_PATH: &str = "/products";
pub const BANNER: &str = "Products Service is running";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Number,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
}

/// Accept a JSON number or a numeric string.
pub fn parse_price(value: &Value) -> Result<Number, ServiceError> {
    let invalid = || ServiceError::BadRequest("Price must be a number".into());
    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(s) => {
            let parsed: f64 = s.trim().parse().map_err(|_| invalid())?;
            if !parsed.is_finite() {
                return Err(invalid());
            }
            // Integral strings stay integers in the JSON output.
            if parsed.fract() == 0.0 && parsed.abs() < 9.0e15 {
                Ok(Number::from(parsed as i64))
            } else {
                Number::from_f64(parsed).ok_or_else(invalid)
            }
        }
        _ => Err(invalid()),
    }
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

impl Resource for Product {
    type Create = ProductPayload;
    type Update = ProductPayload;

    const NOT_FOUND: &'static str = "Product not found";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(payload: ProductPayload, _existing: &[Self]) -> Result<Self, ServiceError> {
        let name = payload.name.filter(|n| !n.is_empty());
        let (Some(name), Some(price)) = (name, present(payload.price)) else {
            return Err(ServiceError::BadRequest("Name and price are required".into()));
        };

        Ok(Product {
            id: new_record_id(),
            name,
            price: parse_price(&price)?,
            created_at: created_at(),
        })
    }

    fn apply_update(&mut self, payload: ProductPayload) -> Result<(), ServiceError> {
        let price = present(payload.price).map(|p| parse_price(&p)).transpose()?;

        if let Some(name) = payload.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if let Some(price) = price {
            self.price = price;
        }
        Ok(())
    }
}

/// Products router mounted at `base_path`.
pub fn router(base_path: &str) -> Router {
    crud_router::<Product>(base_path, BANNER)
}
