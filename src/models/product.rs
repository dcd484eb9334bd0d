use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Scale of every stored price.
pub const PRICE_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Overwrite only the fields present in `changes`.
    pub fn merge(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }
        if let Some(active) = changes.active {
            self.active = active;
        }
    }

    pub fn price_cents(&self) -> Option<i64> {
        price_to_cents(self.price)
    }
}

/// Raw `products` row; prices are stored as integer cents.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: cents_to_price(row.price_cents),
            stock: row.stock,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

/// `None` if the price has more than two decimals or does not fit in `i64` cents.
pub fn price_to_cents(price: Decimal) -> Option<i64> {
    if price.scale() > PRICE_SCALE {
        return None;
    }
    let mut scaled = price;
    scaled.rescale(PRICE_SCALE);
    i64::try_from(scaled.mantissa()).ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub active: bool,
}

// Validated request payloads

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: Option<i64>,
    pub active: Option<bool>,
}

impl From<CreateProductPayload> for NewProduct {
    fn from(payload: CreateProductPayload) -> Self {
        NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock.unwrap_or(0),
            active: payload.active.unwrap_or(true),
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_product() -> Product {
        Product {
            id: 7,
            name: "Pen".to_string(),
            description: Some("Blue ink".to_string()),
            price: Decimal::from_str("1.50").unwrap(),
            stock: 10,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn cents_conversion_preserves_two_decimals() {
        assert_eq!(price_to_cents(Decimal::from_str("1.5").unwrap()), Some(150));
        assert_eq!(price_to_cents(Decimal::from_str("19.99").unwrap()), Some(1999));
        assert_eq!(price_to_cents(Decimal::from(3)), Some(300));
        assert_eq!(price_to_cents(Decimal::from_str("0.001").unwrap()), None);
        assert_eq!(cents_to_price(150), Decimal::from_str("1.50").unwrap());
    }

    #[test]
    fn price_serializes_as_number() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert_eq!(json["price"].as_f64(), Some(1.5));
        assert_eq!(json["active"], true);
        assert_eq!(json["stock"], 10);
    }

    #[test]
    fn merge_keeps_omitted_fields() {
        let mut product = sample_product();
        product.merge(ProductChanges {
            stock: Some(3),
            ..Default::default()
        });

        assert_eq!(product.stock, 3);
        assert_eq!(product.name, "Pen");
        assert_eq!(product.description.as_deref(), Some("Blue ink"));
        assert_eq!(product.price, Decimal::from_str("1.50").unwrap());
        assert!(product.active);
    }

    #[test]
    fn create_payload_defaults() {
        let new_product = NewProduct::from(CreateProductPayload {
            name: "Pen".to_string(),
            description: None,
            price: Decimal::from_str("1.50").unwrap(),
            stock: None,
            active: None,
        });

        assert_eq!(new_product.stock, 0);
        assert!(new_product.active);
    }
}
