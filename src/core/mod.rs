//! Core business logic - framework-agnostic amortization math, storage, and
//! the scenario service built on top of them.

/// Monthly payment formula and schedule generation
pub mod amortization;
/// Scenario storage and identity
pub mod repository;
/// Scenario create/list/detail operations
pub mod scenario;
/// Money and scenario types
pub mod types;
/// Field-level request validation
pub mod validation;

pub use repository::LoanRepository;
pub use scenario::{DEFAULT_PREVIEW_MONTHS, ScenarioService, ServiceSettings};
pub use types::{LoanScenario, LoanTerms, ScenarioDetail, ScenarioSummary, ScheduleEntry};
pub use validation::{FieldError, LoanRequest, ValidationError, ValidationLimits};
