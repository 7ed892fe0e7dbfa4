//! Scenario business logic - validate, compute, store, and shape views.
//!
//! The service is framework-agnostic: it speaks in domain types and
//! [`Error`](crate::errors::Error) values, and the API layer turns those into
//! HTTP responses.

use crate::{
    core::{
        amortization,
        repository::LoanRepository,
        types::{LoanScenario, ScenarioDetail, ScenarioSummary},
        validation::{self, LoanRequest, ValidationLimits},
    },
    errors::Result,
};
use tracing::{error, info, instrument, warn};

/// Number of schedule months included in a detail view's preview.
pub const DEFAULT_PREVIEW_MONTHS: usize = 12;

/// Tunables for [`ScenarioService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Months of schedule included in detail views. Terms at or below this
    /// length are shown in full.
    pub preview_months: usize,
    /// Input bounds enforced on create
    pub limits: ValidationLimits,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            preview_months: DEFAULT_PREVIEW_MONTHS,
            limits: ValidationLimits::default(),
        }
    }
}

/// Create, list, and detail operations over loan scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioService {
    repository: LoanRepository,
    settings: ServiceSettings,
}

impl ScenarioService {
    /// Builds the service around an owned repository.
    #[must_use]
    pub const fn new(repository: LoanRepository, settings: ServiceSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Validates `request`, computes its schedule and stores the scenario.
    ///
    /// The repository is only touched once the scenario is fully computed, so a
    /// rejected or failed request leaves nothing behind.
    #[instrument(skip(self, request))]
    pub async fn create_scenario(&self, request: &LoanRequest) -> Result<LoanScenario> {
        let terms = validation::validate_loan_request(request, &self.settings.limits)
            .inspect_err(|e| {
                warn!(violations = e.violation_count(), "Rejected loan request: {e}");
            })?;

        let computed = amortization::amortize(&terms)
            .inspect_err(|e| error!("Amortization failed for validated terms {terms:?}: {e}"))?;

        let scenario = self.repository.create(computed).await?;
        info!(
            id = scenario.id,
            amount = %scenario.amount,
            apr = %scenario.apr,
            term_months = scenario.term_months,
            monthly_payment = %scenario.monthly_payment,
            "Loan scenario created"
        );
        Ok(scenario)
    }

    /// Summaries of every scenario, oldest first.
    pub async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>> {
        self.repository.list().await
    }

    /// Scenario detail with the first [`ServiceSettings::preview_months`] months
    /// of its schedule.
    #[instrument(skip(self))]
    pub async fn get_scenario_detail(&self, id: i64) -> Result<ScenarioDetail> {
        let scenario = self.repository.get(id).await?;
        Ok(ScenarioDetail::from_scenario(
            scenario,
            self.settings.preview_months,
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::validation::ValidationError;
    use crate::errors::Error;
    use crate::test_utils::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_zero_apr_scenario() -> Result<()> {
        init_test_tracing();
        let service = setup_test_service().await?;

        let scenario = service
            .create_scenario(&loan_request(json!({"amount": 1200, "apr": 0, "term_months": 12})))
            .await?;

        assert_eq!(scenario.monthly_payment, dec!(100.00));
        let first = &scenario.schedule[0];
        assert_eq!(first.interest_paid, Decimal::ZERO);
        assert_eq!(first.principal_paid, dec!(100.00));
        assert_eq!(first.remaining_balance, dec!(1100.00));
        assert_eq!(scenario.schedule[11].remaining_balance, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_interest_bearing_scenario() -> Result<()> {
        let service = setup_test_service().await?;

        let scenario = service
            .create_scenario(&loan_request(json!({"amount": 10000, "apr": 5, "term_months": 36})))
            .await?;

        assert_eq!(scenario.monthly_payment, dec!(299.71));
        let principal: Decimal = scenario.schedule.iter().map(|e| e.principal_paid).sum();
        assert_eq!(principal, dec!(10000.00));
        assert_eq!(scenario.schedule[35].remaining_balance, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_request_stores_nothing() -> Result<()> {
        let service = setup_test_service().await?;

        let result = service
            .create_scenario(&loan_request(json!({"amount": -5, "apr": 5, "term_months": 0})))
            .await;

        match result {
            Err(Error::Validation(ValidationError::Batch(errors))) => {
                assert!(errors.len() >= 2);
                assert_eq!(errors[0].field(), "amount");
                assert_eq!(errors[1].field(), "term_months");
            }
            other => panic!("expected batched validation error, got {other:?}"),
        }
        assert!(service.list_scenarios().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_amount_cites_amount() -> Result<()> {
        let service = setup_test_service().await?;

        let result = service
            .create_scenario(&loan_request(json!({"amount": 0, "apr": 5, "term_months": 12})))
            .await;

        let Err(Error::Validation(ValidationError::Batch(errors))) = result else {
            panic!("expected batched validation error");
        };
        assert!(errors.iter().any(|e| e.field() == "amount"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unstorable_amount_is_an_error_not_a_panic() -> Result<()> {
        let mut settings = ServiceSettings::default();
        settings.limits.max_amount = dec!(10000000000000000000000000000);
        let service = setup_test_service_with(settings).await?;

        for amount in ["100000000000000000", "900000000000000000000000000"] {
            let result = service
                .create_scenario(&loan_request(
                    json!({"amount": amount, "apr": 0, "term_months": 1}),
                ))
                .await;
            assert!(
                matches!(result, Err(Error::InvalidInput { .. })),
                "amount {amount}: {result:?}"
            );
        }
        assert!(service.list_scenarios().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_detail_preview_is_bounded() -> Result<()> {
        let service = setup_test_service().await?;

        let long = service
            .create_scenario(&loan_request(
                json!({"amount": 250000, "apr": 5.5, "term_months": 360}),
            ))
            .await?;
        let short = service
            .create_scenario(&loan_request(json!({"amount": 1000, "apr": 0, "term_months": 6})))
            .await?;

        let long_detail = service.get_scenario_detail(long.id).await?;
        assert_eq!(long_detail.monthly_payment, dec!(1419.47));
        assert_eq!(long_detail.schedule_preview.len(), DEFAULT_PREVIEW_MONTHS);
        assert_eq!(long_detail.schedule_preview[..], long.schedule[..DEFAULT_PREVIEW_MONTHS]);

        let short_detail = service.get_scenario_detail(short.id).await?;
        assert_eq!(short_detail.monthly_payment, dec!(166.67));
        assert_eq!(short_detail.schedule_preview.len(), 6);
        Ok(())
    }

    #[tokio::test]
    async fn test_custom_preview_length() -> Result<()> {
        let settings = ServiceSettings {
            preview_months: 24,
            ..ServiceSettings::default()
        };
        let service = setup_test_service_with(settings).await?;

        let scenario = service
            .create_scenario(&loan_request(json!({"amount": 5000, "apr": 7, "term_months": 60})))
            .await?;
        let detail = service.get_scenario_detail(scenario.id).await?;
        assert_eq!(detail.schedule_preview.len(), 24);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_unknown_detail() -> Result<()> {
        let service = setup_test_service().await?;

        let created = service
            .create_scenario(&loan_request(json!({"amount": 1200, "apr": 0, "term_months": 12})))
            .await?;
        let listed = service.list_scenarios().await?;
        assert_eq!(listed, vec![ScenarioSummary::from(&created)]);

        let missing = service.get_scenario_detail(999).await;
        assert!(matches!(missing, Err(Error::NotFound { id: 999 })));
        Ok(())
    }
}
