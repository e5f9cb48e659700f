//! Budget rollup across departments.

use rust_decimal::Decimal;

use super::costing::{check_amount, round_money};
use super::error::BudgetError;
use super::fnb::{FnbBudget, compute_fnb_budget};
use super::types::{
    AssignmentInput, BudgetInputs, BudgetReport, BudgetRow, DepartmentBreakdown,
    GuardDayInput, LocationDayInput, LocationSiteInput, ManualLineAmounts, ManualLineDraft,
    ManualLineInput,
};
use crate::resource::ResourceKind;

/// Fixed fuel budget lines.
pub const FUEL_LINES: [(&str, i64); 4] = [
    ("BOAT FUEL & OIL", 145_000),
    ("VEHICLE FUEL & OIL", 10_300),
    ("GENERATOR FUEL", 21_000),
    ("HEAVY MACHINERY FUEL", 3_000),
];

/// Daily rate of a location guard.
pub const GUARD_DAILY_RATE: i64 = 45;

/// Function context whose boat assignments belong to the BOATS department.
pub const BOATS_CONTEXT: &str = "boats";

const AUTO_SOURCE: &str = "auto";
const FALLBACK_DEPARTMENT: &str = "OTHER";

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Builds the full budget view of a production.
    #[must_use]
    pub fn build_report(inputs: &BudgetInputs) -> BudgetReport {
        let fnb = compute_fnb_budget(&inputs.fnb_categories, &inputs.fnb_items, &inputs.fnb_entries);

        let mut rows = Vec::new();
        for kind in [
            ResourceKind::Boat,
            ResourceKind::PictureBoat,
            ResourceKind::SecurityBoat,
            ResourceKind::Transport,
            ResourceKind::Helper,
        ] {
            rows.extend(Self::assignment_rows(&inputs.assignments, kind));
        }
        rows.extend(Self::fnb_rows(&fnb));
        rows.extend(Self::fuel_rows());
        rows.extend(Self::location_rows(&inputs.location_sites, &inputs.location_days));
        rows.extend(Self::guard_location_rows(&inputs.guard_days));
        rows.extend(Self::assignment_rows(&inputs.assignments, ResourceKind::GuardCamp));
        rows.extend(inputs.manual_lines.iter().map(Self::manual_row));

        let grand_total_estimate = round_money(rows.iter().map(|r| r.amount_estimate).sum());
        let grand_total_actual =
            round_money(rows.iter().filter_map(|r| r.amount_actual).sum());
        let by_department = DepartmentBreakdown::from_rows(&rows);

        BudgetReport {
            rows,
            by_department,
            grand_total_estimate,
            grand_total_actual,
            fnb_purchase_total: fnb.grand_purchase,
            fnb_consumption_total: fnb.grand_consumption,
        }
    }

    /// Costed rows for one resource kind. Assignments without billable
    /// days are left out.
    #[must_use]
    pub fn assignment_rows(assignments: &[AssignmentInput], kind: ResourceKind) -> Vec<BudgetRow> {
        assignments
            .iter()
            .filter(|a| a.kind == kind)
            .filter(|a| kind != ResourceKind::Boat || a.function_context == BOATS_CONTEXT)
            .filter_map(|a| {
                let cost = a.cost();
                (cost.working_days > 0).then(|| BudgetRow {
                    department: kind.department().to_string(),
                    name: a.function_name.clone(),
                    boat: a.display_name().to_string(),
                    vendor: a.vendor.clone().unwrap_or_default(),
                    start_date: a.start_date.clone(),
                    end_date: a.end_date.clone(),
                    working_days: Some(cost.working_days),
                    unit_price_estimate: cost.rate_estimate,
                    amount_estimate: cost.amount_estimate,
                    amount_actual: cost.amount_actual,
                    source: AUTO_SOURCE.to_string(),
                    line_id: None,
                })
            })
            .collect()
    }

    fn fixed_row(department: &str, name: &str, vendor: &str, amount: Decimal) -> BudgetRow {
        BudgetRow {
            department: department.to_string(),
            name: name.to_string(),
            boat: String::new(),
            vendor: vendor.to_string(),
            start_date: None,
            end_date: None,
            working_days: Some(1),
            unit_price_estimate: amount,
            amount_estimate: amount,
            amount_actual: None,
            source: AUTO_SOURCE.to_string(),
            line_id: None,
        }
    }

    fn fnb_rows(fnb: &FnbBudget) -> Vec<BudgetRow> {
        fnb.categories
            .iter()
            .filter(|c| !c.purchase_total.is_zero() || !c.consumption_total.is_zero())
            .map(|c| BudgetRow {
                amount_actual: (c.consumption_total > Decimal::ZERO).then_some(c.consumption_total),
                ..Self::fixed_row("FNB", &c.name, "", c.purchase_total)
            })
            .collect()
    }

    fn fuel_rows() -> Vec<BudgetRow> {
        FUEL_LINES
            .iter()
            .map(|&(name, amount)| Self::fixed_row("FUEL", name, "", Decimal::from(amount)))
            .collect()
    }

    fn location_rows(sites: &[LocationSiteInput], days: &[LocationDayInput]) -> Vec<BudgetRow> {
        // (name, P, F, W) in first-appearance order
        let mut counts: Vec<(&str, i64, i64, i64)> = Vec::new();
        for day in days {
            let idx = match counts.iter().position(|c| c.0 == day.location_name) {
                Some(idx) => idx,
                None => {
                    counts.push((day.location_name.as_str(), 0, 0, 0));
                    counts.len() - 1
                }
            };
            match day.status.as_str() {
                "P" => counts[idx].1 += 1,
                "F" => counts[idx].2 += 1,
                "W" => counts[idx].3 += 1,
                _ => {}
            }
        }

        let mut rows = Vec::new();
        for (name, p, f, w) in counts {
            let site = sites.iter().find(|s| s.name == name);
            let price = |pick: fn(&LocationSiteInput) -> Option<Decimal>| {
                site.and_then(pick).unwrap_or_default()
            };
            let global_deal = site
                .and_then(|s| s.global_deal)
                .filter(|deal| *deal > Decimal::ZERO);
            let day_count = p + f + w;

            let (total, vendor, unit_price) = if let Some(deal) = global_deal {
                (deal, "GLOBAL DEAL".to_string(), deal)
            } else {
                let total = Decimal::from(p) * price(|s| s.price_p)
                    + Decimal::from(f) * price(|s| s.price_f)
                    + Decimal::from(w) * price(|s| s.price_w);
                let vendor = [(p, "P"), (f, "F"), (w, "W")]
                    .iter()
                    .filter(|(n, _)| *n > 0)
                    .map(|(n, tag)| format!("{n}{tag}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let unit_price = total / Decimal::from(day_count.max(1));
                (total, vendor, unit_price)
            };

            if total > Decimal::ZERO {
                rows.push(BudgetRow {
                    working_days: Some(day_count),
                    unit_price_estimate: unit_price,
                    ..Self::fixed_row("LOCATIONS", name, &vendor, total)
                });
            }
        }
        rows
    }

    fn guard_location_rows(days: &[GuardDayInput]) -> Vec<BudgetRow> {
        let mut per_location: Vec<(&str, i64)> = Vec::new();
        for day in days {
            match per_location.iter_mut().find(|(loc, _)| *loc == day.location_name) {
                Some(entry) => entry.1 += day.nb_guards,
                None => per_location.push((day.location_name.as_str(), day.nb_guards)),
            }
        }

        let rate = Decimal::from(GUARD_DAILY_RATE);
        per_location
            .into_iter()
            .map(|(loc, guard_days)| BudgetRow {
                working_days: Some(guard_days),
                unit_price_estimate: rate,
                ..Self::fixed_row(
                    "GUARDS",
                    &format!("LOCATION - {loc}"),
                    "LOCALS",
                    Decimal::from(guard_days) * rate,
                )
            })
            .collect()
    }

    fn manual_row(line: &ManualLineInput) -> BudgetRow {
        BudgetRow {
            department: line
                .department_name
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| FALLBACK_DEPARTMENT.to_string()),
            name: line.name.clone(),
            boat: String::new(),
            vendor: String::new(),
            start_date: None,
            end_date: None,
            working_days: None,
            unit_price_estimate: line.unit_price_estimate.unwrap_or_default(),
            amount_estimate: line.amount_estimate.unwrap_or_default(),
            amount_actual: line.amount_actual.filter(|a| !a.is_zero()),
            source: line.source.clone(),
            line_id: Some(line.id),
        }
    }

    /// Validates a manual line and computes its amounts.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError` for a blank name, negative quantities and prices,
    /// or values beyond `MAX_AMOUNT`.
    pub fn price_manual_line(draft: &ManualLineDraft) -> Result<ManualLineAmounts, BudgetError> {
        if draft.name.trim().is_empty() {
            return Err(BudgetError::NameRequired);
        }
        let quantities = [Some(draft.qty_estimate), draft.qty_actual];
        if quantities.iter().flatten().any(|v| *v < Decimal::ZERO) {
            return Err(BudgetError::NegativeQuantity);
        }
        let prices = [Some(draft.unit_price_estimate), draft.unit_price_actual];
        if prices.iter().flatten().any(|v| *v < Decimal::ZERO) {
            return Err(BudgetError::NegativePrice);
        }
        check_amount("qty_estimate", Some(draft.qty_estimate))?;
        check_amount("unit_price_estimate", Some(draft.unit_price_estimate))?;
        check_amount("qty_actual", draft.qty_actual)?;
        check_amount("unit_price_actual", draft.unit_price_actual)?;

        Ok(ManualLineAmounts {
            amount_estimate: round_money(draft.qty_estimate * draft.unit_price_estimate),
            amount_actual: draft
                .qty_actual
                .zip(draft.unit_price_actual)
                .map(|(qty, price)| round_money(qty * price)),
        })
    }
}
