//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod assignment;
pub mod budget;
pub mod fnb;
pub mod function;
pub mod guard;
pub mod history;
pub mod location;
pub mod membership;
mod patch;
pub mod production;
pub mod refresh_token;
pub mod resource;
pub mod shooting_day;
pub mod user;

pub use assignment::{
    AssignmentDetail, AssignmentError, AssignmentRepository, CreateAssignmentInput,
    UpdateAssignmentInput,
};
pub use budget::{BudgetLineError, BudgetRepository, CreateBudgetLineInput};
pub use fnb::{
    CreateFnbCategoryInput, CreateFnbItemInput, FnbError, FnbRepository, UpdateFnbCategoryInput,
    UpdateFnbItemInput, UpsertFnbEntryInput,
};
pub use function::{CreateFunctionInput, FunctionError, FunctionRepository, UpdateFunctionInput};
pub use guard::{
    CreateGuardPostInput, GuardError, GuardRepository, UpdateGuardPostInput,
    UpsertGuardScheduleInput,
};
pub use history::{DEFAULT_HISTORY_LIMIT, HistoryError, HistoryRepository, UndoOutcome};
pub use location::{
    CreateLocationInput, LocationRepository, ScheduleError, UpdateLocationInput,
    UpsertLocationScheduleInput,
};
pub use membership::{MemberView, MembershipError, MembershipRepository, UserWithMemberships};
pub use production::{
    CreateProductionInput, DEFAULT_DEPARTMENTS, ProductionError, ProductionRepository,
    UpdateProductionInput,
};
pub use refresh_token::RefreshTokenRepository;
pub use resource::{CreateResourceInput, ResourceError, ResourceRepository, UpdateResourceInput};
pub use shooting_day::{
    CreateShootingDayInput, ShootingDayError, ShootingDayRepository, UpdateShootingDayInput,
};
pub use user::UserRepository;
