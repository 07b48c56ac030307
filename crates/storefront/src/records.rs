//! Row <-> domain mapping for the hosted tables.
//!
//! Reads are lenient the way the storefront always was: numbers may arrive as
//! JSON numbers or numeric strings, invalid numerics become 0, and legacy
//! single-price columns (`precio_base` + `moneda`, `cuotas`, `interes`) are
//! honored when the per-currency columns are empty.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Value as JsonValue, json};
use thiserror::Error;

use tiendita_catalog::pricing::{sanitize_amount, sanitize_installments, sanitize_interest};
use tiendita_catalog::{
    Banner, BannerDraft, Category, Currency, CurrencyPricing, Product, ProductStatus, Subcategory,
    Tone, ValidatedProduct,
};
use tiendita_core::{BannerId, CategoryId, ProductId, SubcategoryId, UserId};

use crate::backend::Row;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("row is missing '{0}'")]
    MissingField(&'static str),

    #[error("row has an invalid '{field}': {message}")]
    InvalidField { field: &'static str, message: String },
}

fn text<'a>(row: &'a Row, key: &str) -> Option<&'a str> {
    row.get(key).and_then(JsonValue::as_str)
}

fn text_or_empty(row: &Row, key: &str) -> String {
    text(row, key).unwrap_or_default().to_string()
}

/// `Number(value)`: JSON numbers and numeric strings; anything else is absent.
fn number(row: &Row, key: &str) -> Option<f64> {
    let value = match row.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|n| n.is_finite())
}

/// Positive number or nothing (zero counts as "not set", as `||` did).
fn positive(row: &Row, key: &str) -> Option<f64> {
    number(row, key).filter(|n| *n > 0.0)
}

fn id<T: FromStr>(row: &Row, field: &'static str) -> Result<T, RecordError>
where
    T::Err: core::fmt::Display,
{
    let raw = text(row, field).ok_or(RecordError::MissingField(field))?;
    raw.parse().map_err(|e: T::Err| RecordError::InvalidField {
        field,
        message: e.to_string(),
    })
}

/// Optional reference: null, empty and unparsable values become `None`.
fn reference<T: FromStr>(row: &Row, field: &str) -> Option<T> {
    text(row, field)
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse().ok())
}

fn timestamp(row: &Row, field: &str) -> Option<DateTime<Utc>> {
    text(row, field)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

pub fn product_from_row(row: &Row) -> Result<Product, RecordError> {
    let legacy_currency = text(row, "moneda")
        .and_then(|s| s.parse::<Currency>().ok())
        .unwrap_or(Currency::Ars);
    let legacy_price = number(row, "precio_base");
    let price_in = |column: &str, currency: Currency| {
        number(row, column)
            .or_else(|| legacy_price.filter(|_| legacy_currency == currency))
            .map(sanitize_amount)
            .filter(|p| *p > 0)
    };

    let ars = CurrencyPricing {
        base_price: price_in("precio_ars", Currency::Ars),
        installments: positive(row, "cuotas_ars")
            .or_else(|| positive(row, "cuotas"))
            .map_or(1, |n| sanitize_installments(n as i64)),
        interest_percent: positive(row, "interes_ars")
            .or_else(|| positive(row, "interes"))
            .map_or(0.0, sanitize_interest),
    };
    let usd = CurrencyPricing {
        base_price: price_in("precio_usd", Currency::Usd),
        installments: positive(row, "cuotas_usd").map_or(1, |n| sanitize_installments(n as i64)),
        interest_percent: positive(row, "interes_usd").map_or(0.0, sanitize_interest),
    };

    let status = match text(row, "estado") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(estado = raw, "unknown product status; treating as available");
            ProductStatus::Available
        }),
        None => ProductStatus::Available,
    };

    let images = row
        .get("imagenes")
        .and_then(JsonValue::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Product {
        id: id::<ProductId>(row, "id")?,
        title: text_or_empty(row, "title"),
        description: text_or_empty(row, "description"),
        first_use: text_or_empty(row, "tiempo_uso"),
        category_id: reference(row, "categoria_id"),
        subcategory_id: reference(row, "subcategoria_id"),
        ars,
        usd,
        images,
        status,
        buyer_id: reference::<UserId>(row, "comprador_id"),
        created_at: timestamp(row, "fecha_creacion"),
    })
}

pub fn category_from_row(row: &Row) -> Result<Category, RecordError> {
    Ok(Category {
        id: id::<CategoryId>(row, "id")?,
        name: text_or_empty(row, "name"),
        created_at: timestamp(row, "created_at"),
    })
}

pub fn subcategory_from_row(row: &Row) -> Result<Subcategory, RecordError> {
    Ok(Subcategory {
        id: id::<SubcategoryId>(row, "id")?,
        category_id: reference(row, "category_id"),
        name: text_or_empty(row, "name"),
        created_at: timestamp(row, "created_at"),
    })
}

pub fn banner_from_row(row: &Row) -> Result<Banner, RecordError> {
    Ok(Banner {
        id: id::<BannerId>(row, "id")?,
        message: text_or_empty(row, "message"),
        tone: Tone::parse_lossy(text(row, "tone")),
        active: row.get("active").and_then(JsonValue::as_bool).unwrap_or(false),
        created_at: timestamp(row, "created_at"),
    })
}

/// Map every row, skipping (and logging) the ones that cannot be read.
pub fn map_rows<T>(
    table: &str,
    rows: &[Row],
    map: impl Fn(&Row) -> Result<T, RecordError>,
) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match map(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(table, error = %e, "skipping unreadable row");
                None
            }
        })
        .collect()
}

fn object(value: JsonValue) -> Row {
    match value {
        JsonValue::Object(map) => map,
        _ => Row::new(),
    }
}

/// Column payload shared by product insert and update.
pub fn product_payload(product: &ValidatedProduct, images: &[String]) -> Row {
    let (precio_base, moneda) = product.legacy_base_price();
    object(json!({
        "title": product.title,
        "description": product.description,
        "tiempo_uso": product.first_use,
        "categoria_id": product.category_id.map(|id| id.to_string()),
        "subcategoria_id": product.subcategory_id.map(|id| id.to_string()),
        "precio_base": precio_base,
        "moneda": moneda.code(),
        "precio_ars": product.ars.price(),
        "precio_usd": product.usd.price(),
        "cuotas_ars": product.ars.installments,
        "interes_ars": product.ars.interest_percent,
        "cuotas_usd": product.usd.installments,
        "interes_usd": product.usd.interest_percent,
        "estado": product.status.as_str(),
        "imagenes": images,
    }))
}

/// Insert row: payload plus identity and author.
pub fn new_product_row(id: ProductId, product: &ValidatedProduct, images: &[String], author: UserId) -> Row {
    let mut row = product_payload(product, images);
    row.insert("id".into(), json!(id.to_string()));
    row.insert("creado_por".into(), json!(author.to_string()));
    row
}

pub fn sold_patch() -> Row {
    object(json!({
        "estado": ProductStatus::Sold.as_str(),
        "comprador_id": JsonValue::Null,
    }))
}

pub fn new_category_row(category: &Category, author: UserId) -> Row {
    object(json!({
        "id": category.id.to_string(),
        "name": category.name,
        "created_by": author.to_string(),
    }))
}

pub fn category_patch(category: &Category) -> Row {
    object(json!({ "name": category.name }))
}

pub fn new_subcategory_row(subcategory: &Subcategory, author: UserId) -> Row {
    let mut row = subcategory_patch(subcategory);
    row.insert("id".into(), json!(subcategory.id.to_string()));
    row.insert("created_by".into(), json!(author.to_string()));
    row
}

pub fn subcategory_patch(subcategory: &Subcategory) -> Row {
    object(json!({
        "category_id": subcategory.category_id.map(|id| id.to_string()),
        "name": subcategory.name,
    }))
}

pub fn new_banner_row(id: BannerId, banner: &BannerDraft, author: UserId) -> Row {
    object(json!({
        "id": id.to_string(),
        "message": banner.message,
        "tone": banner.tone.as_str(),
        "active": true,
        "created_by": author.to_string(),
    }))
}

pub fn banner_active_patch(active: bool) -> Row {
    object(json!({ "active": active }))
}
