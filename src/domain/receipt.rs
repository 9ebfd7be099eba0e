//! Receipt for a basket of products.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::product::{round_price, Product};

/// Receipt generation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    /// Ids of the purchased products, repeated once per unit bought
    #[schema(example = json!([1, 2, 2]))]
    pub product_ids: Vec<i32>,
}

/// One receipt row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub value: f64,
}

/// Data rendered into the receipt template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub date: String,
    pub total: f64,
    pub products: Vec<ReceiptLine>,
}

impl Receipt {
    /// Build a receipt from the requested ids and the products they resolved to.
    ///
    /// Each distinct id yields one line (ascending id order) whose quantity is
    /// the number of times the id was requested. Ids without a product are
    /// left off the receipt.
    pub fn build<Tz>(product_ids: &[i32], products: &[Product], issued_at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut counts: BTreeMap<i32, u32> = BTreeMap::new();
        for id in product_ids {
            *counts.entry(*id).or_default() += 1;
        }

        let lines: Vec<ReceiptLine> = counts
            .into_iter()
            .filter_map(|(id, quantity)| {
                products
                    .iter()
                    .find(|product| product.id == id)
                    .map(|product| ReceiptLine {
                        name: product.name.clone(),
                        quantity,
                        value: round_price(f64::from(quantity) * product.price),
                    })
            })
            .collect();

        let total = round_price(lines.iter().map(|line| line.value).sum());

        Self {
            date: format_receipt_date(issued_at),
            total,
            products: lines,
        }
    }
}

/// Distinct ids in `product_ids`, ascending.
pub fn unique_ids(product_ids: &[i32]) -> Vec<i32> {
    let mut ids = product_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// `01/31/2024, 3:07 PM`
pub fn format_receipt_date<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%m/%d/%Y, %-I:%M %p").to_string()
}

/// `2024-01-31T15h07.pdf`
pub fn receipt_filename<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}.pdf", at.format("%Y-%m-%dT%Hh%M"))
}

/// Format an amount in Central African CFA francs, e.g. `FCFA 1,500`.
///
/// The currency has no minor unit, so amounts are rounded to whole francs.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!(
        "{}{} {}",
        sign,
        crate::config::RECEIPT_CURRENCY_SYMBOL,
        grouped
    )
}
