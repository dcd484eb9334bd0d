use super::{trimmed, Fields, ValidationErrors};
use crate::models::product::{price_to_cents, PRICE_SCALE};
use crate::models::{CreateProductPayload, ProductChanges};
use rust_decimal::Decimal;
use serde_json::Value;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 255;

pub fn validate_create_product(body: &Value) -> Result<CreateProductPayload, ValidationErrors> {
    let mut fields = Fields::new(body);

    let name = read_name(&mut fields, true);
    let description = read_description(&mut fields);
    let price = read_price(&mut fields, true);
    let stock = read_stock(&mut fields);
    let active = fields.boolean("active");

    fields.finish(|| {
        Some(CreateProductPayload {
            name: name?,
            description,
            price: price?,
            stock,
            active,
        })
    })
}

pub fn validate_update_product(body: &Value) -> Result<ProductChanges, ValidationErrors> {
    let mut fields = Fields::new(body);

    let name = read_name(&mut fields, false);
    let description = read_description(&mut fields);
    let price = read_price(&mut fields, false);
    let stock = read_stock(&mut fields);
    let active = fields.boolean("active");

    fields.finish(|| {
        Some(ProductChanges {
            name,
            description,
            price,
            stock,
            active,
        })
    })
}

fn read_name(fields: &mut Fields<'_>, required: bool) -> Option<String> {
    let name = fields.string("name", required).map(trimmed)?;
    fields.length("name", name, NAME_MIN, NAME_MAX)
}

fn read_description(fields: &mut Fields<'_>) -> Option<String> {
    fields.string("description", false).map(trimmed)
}

fn read_price(fields: &mut Fields<'_>, required: bool) -> Option<Decimal> {
    let price = fields.number("price", required)?;
    let price = fields.positive("price", price)?;
    let price = fields.max_decimals("price", price, PRICE_SCALE)?;
    if price_to_cents(price).is_none() {
        fields.error("price", "The price field is too large");
        return None;
    }
    Some(price)
}

fn read_stock(fields: &mut Fields<'_>) -> Option<i64> {
    let stock = fields.number("stock", false)?;
    fields.non_negative_integer("stock", stock)
}
