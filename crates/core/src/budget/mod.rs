//! Assignment costing, FNB totals and the production budget rollup.

pub mod costing;
pub mod error;
pub mod fnb;
pub mod service;
pub mod types;


pub use costing::{
    AssignmentCost, MAX_AMOUNT, actual_rate, check_amount, cost_assignment,
    effective_estimate_rate, round_money,
};
pub use error::BudgetError;
pub use fnb::{FnbBudget, FnbCategoryTotals, FnbEntryType, compute_fnb_budget};
pub use service::{BOATS_CONTEXT, BudgetService, FUEL_LINES, GUARD_DAILY_RATE};
pub use types::{
    AssignmentInput, BudgetInputs, BudgetReport, BudgetRow, DepartmentBreakdown, DepartmentTotals,
    FnbCategoryInput, FnbEntryInput, FnbItemInput, GuardDayInput, LocationDayInput,
    LocationSiteInput, ManualLineAmounts, ManualLineDraft, ManualLineInput,
};
