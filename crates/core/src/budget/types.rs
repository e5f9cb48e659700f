//! Budget data types.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer, ser::SerializeMap};

use super::costing::{AssignmentCost, actual_rate, cost_assignment, effective_estimate_rate};
use super::fnb::FnbEntryType;
use crate::resource::ResourceKind;
use crate::schedule::{DayOverrides, active_working_days};

/// An assignment joined with its function and resource.
#[derive(Debug, Clone)]
pub struct AssignmentInput {
    /// Assignment ID.
    pub id: i32,
    /// Kind of the assigned resource.
    pub kind: ResourceKind,
    /// Function name.
    pub function_name: String,
    /// Function group.
    pub function_group: Option<String>,
    /// Function context (`boats`, `labour`, ...).
    pub function_context: String,
    /// Assigned resource name, if a resource is linked.
    pub resource_name: Option<String>,
    /// Free-text name used instead of a linked resource.
    pub name_override: Option<String>,
    /// Resource vendor.
    pub vendor: Option<String>,
    /// First day, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Per-assignment rate replacing the resource estimate.
    pub price_override: Option<Decimal>,
    /// Resource estimate rate.
    pub daily_rate_estimate: Option<Decimal>,
    /// Resource actual rate.
    pub daily_rate_actual: Option<Decimal>,
    /// Per-day status corrections.
    pub day_overrides: DayOverrides,
}

impl AssignmentInput {
    /// Name shown for the assigned resource.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name_override
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.resource_name.as_deref())
            .unwrap_or_default()
    }

    /// Billable days after overrides.
    #[must_use]
    pub fn working_days(&self) -> i64 {
        active_working_days(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            &self.day_overrides,
        )
    }

    /// Computes working days and amounts.
    #[must_use]
    pub fn cost(&self) -> AssignmentCost {
        cost_assignment(
            self.working_days(),
            effective_estimate_rate(self.price_override, self.daily_rate_estimate),
            actual_rate(self.daily_rate_actual),
        )
    }
}

/// FNB category.
#[derive(Debug, Clone)]
pub struct FnbCategoryInput {
    /// Category ID.
    pub id: i32,
    /// Category name.
    pub name: String,
    /// Display color.
    pub color: Option<String>,
}

/// FNB item with its price.
#[derive(Debug, Clone)]
pub struct FnbItemInput {
    /// Item ID.
    pub id: i32,
    /// Owning category.
    pub category_id: i32,
    /// Price per unit.
    pub unit_price: Option<Decimal>,
}

/// Quantity purchased or consumed on one day.
#[derive(Debug, Clone)]
pub struct FnbEntryInput {
    /// Item the entry is for.
    pub item_id: i32,
    /// Purchase or consumption.
    pub entry_type: FnbEntryType,
    /// Quantity.
    pub quantity: Option<Decimal>,
}

/// Pricing of a location site.
#[derive(Debug, Clone, Default)]
pub struct LocationSiteInput {
    /// Site name, matched against schedule rows.
    pub name: String,
    /// Price per prep day.
    pub price_p: Option<Decimal>,
    /// Price per filming day.
    pub price_f: Option<Decimal>,
    /// Price per wrap day.
    pub price_w: Option<Decimal>,
    /// Flat rate replacing per-day pricing when positive.
    pub global_deal: Option<Decimal>,
}

/// One location schedule cell.
#[derive(Debug, Clone)]
pub struct LocationDayInput {
    /// Location name.
    pub location_name: String,
    /// `P`, `F` or `W`.
    pub status: String,
}

/// One guard location schedule cell.
#[derive(Debug, Clone)]
pub struct GuardDayInput {
    /// Location name.
    pub location_name: String,
    /// Guards on duty that day.
    pub nb_guards: i64,
}

/// A stored manual budget line.
#[derive(Debug, Clone, Default)]
pub struct ManualLineInput {
    /// Line ID.
    pub id: i32,
    /// Department name, when the line has one.
    pub department_name: Option<String>,
    /// Line name.
    pub name: String,
    /// Estimated unit price.
    pub unit_price_estimate: Option<Decimal>,
    /// Estimated amount.
    pub amount_estimate: Option<Decimal>,
    /// Actual amount.
    pub amount_actual: Option<Decimal>,
    /// Line origin (`manual`, `ai_generated`).
    pub source: String,
}

/// Everything the rollup reads for one production.
#[derive(Debug, Clone, Default)]
pub struct BudgetInputs {
    /// Assignments of every kind.
    pub assignments: Vec<AssignmentInput>,
    /// FNB categories, in display order.
    pub fnb_categories: Vec<FnbCategoryInput>,
    /// FNB items.
    pub fnb_items: Vec<FnbItemInput>,
    /// FNB entries.
    pub fnb_entries: Vec<FnbEntryInput>,
    /// Location sites.
    pub location_sites: Vec<LocationSiteInput>,
    /// Location schedule cells, in date order.
    pub location_days: Vec<LocationDayInput>,
    /// Guard schedule cells, in date order.
    pub guard_days: Vec<GuardDayInput>,
    /// Manual lines, ordered by department then id.
    pub manual_lines: Vec<ManualLineInput>,
}

/// Fields of a new manual line.
#[derive(Debug, Clone, Default)]
pub struct ManualLineDraft {
    /// Line name.
    pub name: String,
    /// Estimated quantity.
    pub qty_estimate: Decimal,
    /// Estimated unit price.
    pub unit_price_estimate: Decimal,
    /// Actual quantity.
    pub qty_actual: Option<Decimal>,
    /// Actual unit price.
    pub unit_price_actual: Option<Decimal>,
}

/// Amounts computed for a manual line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualLineAmounts {
    /// `qty_estimate * unit_price_estimate`, rounded.
    pub amount_estimate: Decimal,
    /// `qty_actual * unit_price_actual`, rounded, when both are set.
    pub amount_actual: Option<Decimal>,
}

/// One line of the budget view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetRow {
    /// Department label.
    pub department: String,
    /// Function, category, location or line name.
    pub name: String,
    /// Resource display name.
    pub boat: String,
    /// Vendor or pricing note.
    pub vendor: String,
    /// First day.
    pub start_date: Option<String>,
    /// Last day.
    pub end_date: Option<String>,
    /// Billable days, absent for manual lines.
    pub working_days: Option<i64>,
    /// Estimated unit price.
    pub unit_price_estimate: Decimal,
    /// Estimated amount.
    pub amount_estimate: Decimal,
    /// Actual amount.
    pub amount_actual: Option<Decimal>,
    /// `auto` for computed rows, otherwise the manual line source.
    pub source: String,
    /// Manual line ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<i32>,
}

/// Subtotals of one department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentTotals {
    /// Sum of row estimates.
    pub total_estimate: Decimal,
    /// Sum of row actuals.
    pub total_actual: Decimal,
    /// Rows of the department.
    pub lines: Vec<BudgetRow>,
}

/// Department subtotals in first-appearance order. Serializes as a JSON
/// object keyed by department name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentBreakdown(Vec<(String, DepartmentTotals)>);

impl DepartmentBreakdown {
    /// Groups rows by department, keeping the order departments first appear in.
    #[must_use]
    pub fn from_rows(rows: &[BudgetRow]) -> Self {
        let mut groups: Vec<(String, DepartmentTotals)> = Vec::new();
        for row in rows {
            let idx = match groups.iter().position(|(name, _)| *name == row.department) {
                Some(idx) => idx,
                None => {
                    groups.push((row.department.clone(), DepartmentTotals::default()));
                    groups.len() - 1
                }
            };
            let totals = &mut groups[idx].1;
            totals.total_estimate += row.amount_estimate;
            if let Some(actual) = row.amount_actual {
                totals.total_actual += actual;
            }
            totals.lines.push(row.clone());
        }
        Self(groups)
    }

    /// Looks up a department.
    #[must_use]
    pub fn get(&self, department: &str) -> Option<&DepartmentTotals> {
        self.0
            .iter()
            .find(|(name, _)| name == department)
            .map(|(_, totals)| totals)
    }

    /// Iterates over departments in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DepartmentTotals)> {
        self.0.iter().map(|(name, totals)| (name.as_str(), totals))
    }

    /// Department names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Number of departments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DepartmentBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, totals) in &self.0 {
            map.serialize_entry(name, totals)?;
        }
        map.end()
    }
}

/// The production budget view.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetReport {
    /// Every row, in department order.
    pub rows: Vec<BudgetRow>,
    /// Subtotals per department.
    pub by_department: DepartmentBreakdown,
    /// Sum of every estimate, rounded to cents.
    pub grand_total_estimate: Decimal,
    /// Sum of every actual, rounded to cents.
    pub grand_total_actual: Decimal,
    /// FNB purchases, rounded to cents.
    pub fnb_purchase_total: Decimal,
    /// FNB consumption, rounded to cents.
    pub fnb_consumption_total: Decimal,
}
