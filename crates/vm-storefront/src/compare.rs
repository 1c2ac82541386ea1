//! Item comparisons: adding an item to the user's comparison and laying out
//! a comparison for display.

use tracing::warn;
use vm_api_types::{ComparisonDetail, ItemId, SpecValue};
use vm_client::{ApiClient, ClientError, Result, Transport};

use crate::cards::product_href;
use crate::format::format_price;
use crate::notify::Notification;

pub const DEFAULT_COMPARISON_NAME: &str = "My comparison";

/// Add an item to the user's first comparison, creating one when the user
/// has none yet.
pub async fn add_to_comparison<T: Transport>(client: &ApiClient<T>, item_id: ItemId) -> Notification {
    if !client.is_authenticated() {
        return Notification::warning("Please sign in to compare items");
    }
    let added = async {
        let comparison_id = target_comparison(client).await?;
        client.add_to_comparison(comparison_id, item_id).await
    }
    .await;
    match added {
        Ok(_) => Notification::success("Added to comparison"),
        Err(err) => {
            warn!(%item_id, error = %err, "could not add item to comparison");
            Notification::error("Could not add the item to comparison")
        }
    }
}

async fn target_comparison<T: Transport>(client: &ApiClient<T>) -> Result<u64> {
    if let Some(existing) = client.comparisons().await?.first() {
        return Ok(existing.id);
    }
    let created = client.create_comparison(DEFAULT_COMPARISON_NAME).await?;
    created
        .as_json()
        .and_then(|body| body.get("comparison_id"))
        .and_then(|id| id.as_u64())
        .ok_or_else(|| ClientError::UnexpectedBody("comparison_id missing from response".into()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonColumn {
    pub id: ItemId,
    pub name: String,
    pub href: String,
    pub price_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTableRow {
    pub characteristic: String,
    /// One cell per column, in column order.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    pub title: String,
    pub columns: Vec<ComparisonColumn>,
    pub rows: Vec<ComparisonTableRow>,
}

impl From<&ComparisonDetail> for ComparisonTable {
    fn from(detail: &ComparisonDetail) -> Self {
        let columns: Vec<ComparisonColumn> = detail
            .items
            .iter()
            .map(|item| ComparisonColumn {
                id: item.id,
                name: item.name.clone(),
                href: product_href(item.id),
                price_label: format_price(item.price),
            })
            .collect();
        let rows = detail
            .comparison_table
            .iter()
            .map(|row| ComparisonTableRow {
                characteristic: row.characteristic.clone(),
                cells: columns
                    .iter()
                    .map(|column| spec_text(row.cell(column.id)))
                    .collect(),
            })
            .collect();
        Self {
            title: detail.comparison.name.clone(),
            columns,
            rows,
        }
    }
}

/// `value unit`, or a dash when the item lacks the characteristic.
pub fn spec_text(value: Option<&SpecValue>) -> String {
    match value {
        Some(SpecValue { value, unit: Some(unit) }) if !unit.is_empty() => format!("{value} {unit}"),
        Some(spec) => spec.value.clone(),
        None => "—".to_owned(),
    }
}
