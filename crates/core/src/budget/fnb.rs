//! Food and beverage budget totals.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::costing::round_money;
use super::error::BudgetError;
use super::types::{FnbCategoryInput, FnbEntryInput, FnbItemInput};

/// Kind of FNB entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FnbEntryType {
    /// Stock bought.
    Purchase,
    /// Stock used.
    Consumption,
}

impl FnbEntryType {
    /// Stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Consumption => "consumption",
        }
    }
}

impl FromStr for FnbEntryType {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase" => Ok(Self::Purchase),
            "consumption" => Ok(Self::Consumption),
            other => Err(BudgetError::InvalidEntryType(other.to_string())),
        }
    }
}

/// Totals of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FnbCategoryTotals {
    /// Category ID.
    pub id: i32,
    /// Category name.
    pub name: String,
    /// Display color.
    pub color: Option<String>,
    /// Sum of purchased quantity times unit price.
    pub purchase_total: Decimal,
    /// Sum of consumed quantity times unit price.
    pub consumption_total: Decimal,
}

/// FNB budget of a production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FnbBudget {
    /// Per-category totals, in category order.
    pub categories: Vec<FnbCategoryTotals>,
    /// Purchases, rounded to cents.
    pub grand_purchase: Decimal,
    /// Consumption, rounded to cents.
    pub grand_consumption: Decimal,
    /// Purchases minus consumption, rounded to cents.
    pub balance: Decimal,
}

/// Computes FNB totals per category.
///
/// Items whose category is missing still count toward the grand totals.
#[must_use]
pub fn compute_fnb_budget(
    categories: &[FnbCategoryInput],
    items: &[FnbItemInput],
    entries: &[FnbEntryInput],
) -> FnbBudget {
    let mut quantities: HashMap<(i32, FnbEntryType), Decimal> = HashMap::new();
    for entry in entries {
        *quantities
            .entry((entry.item_id, entry.entry_type))
            .or_default() += entry.quantity.unwrap_or_default();
    }

    let mut totals: Vec<FnbCategoryTotals> = categories
        .iter()
        .map(|c| FnbCategoryTotals {
            id: c.id,
            name: c.name.clone(),
            color: c.color.clone(),
            purchase_total: Decimal::ZERO,
            consumption_total: Decimal::ZERO,
        })
        .collect();

    let mut grand_purchase = Decimal::ZERO;
    let mut grand_consumption = Decimal::ZERO;
    for item in items {
        let price = item.unit_price.unwrap_or_default();
        let qty = |kind| quantities.get(&(item.id, kind)).copied().unwrap_or_default();
        let purchase = qty(FnbEntryType::Purchase) * price;
        let consumption = qty(FnbEntryType::Consumption) * price;

        if let Some(cat) = totals.iter_mut().find(|c| c.id == item.category_id) {
            cat.purchase_total += purchase;
            cat.consumption_total += consumption;
        }
        grand_purchase += purchase;
        grand_consumption += consumption;
    }

    FnbBudget {
        categories: totals,
        grand_purchase: round_money(grand_purchase),
        grand_consumption: round_money(grand_consumption),
        balance: round_money(grand_purchase - grand_consumption),
    }
}
