//! Accounting period management.

use finrep_core::pagination::{Page, PaginationFilters};
use finrep_core::query::ModelFilters;
use finrep_shared::types::{AccountingPeriodId, CompanyId};
use finrep_shared::{AppError, AppResult};
use serde_json::json;
use tracing::info;

use crate::dao::{DaoSettings, DocumentDao};
use crate::models::AccountingPeriod;
use crate::store::{DocumentStore, Filter};

/// Accounting period use cases.
#[derive(Debug)]
pub struct AccountingPeriodManager {
    periods: DocumentDao<AccountingPeriod>,
    filters: ModelFilters,
}

impl AccountingPeriodManager {
    /// Creates a manager over `store`.
    pub fn new<S>(store: &S, settings: &DaoSettings) -> AppResult<Self>
    where
        S: DocumentStore + ?Sized,
    {
        Ok(Self {
            periods: DocumentDao::for_model(store, settings)?,
            filters: ModelFilters::build::<AccountingPeriod>(&["_id", "company_id"]),
        })
    }

    /// Filter and order surface for period listings within a company.
    pub const fn filters(&self) -> &ModelFilters {
        &self.filters
    }

    /// Returns the period or `NotFound`.
    pub async fn get_period(&self, id: AccountingPeriodId) -> AppResult<AccountingPeriod> {
        self.periods
            .get_by_id(id, false)
            .await?
            .map(|period| (*period).clone())
            .ok_or_else(|| AppError::NotFound(format!("No accounting period with id {id}")))
    }

    /// Lists the periods of one company.
    pub async fn list_periods(
        &self,
        company_id: CompanyId,
        filter: &Filter,
        pagination: &PaginationFilters,
    ) -> AppResult<Page<AccountingPeriod>> {
        let mut filter = filter.clone();
        filter.insert("company_id".to_string(), json!(company_id));

        Ok(self.periods.get_page(&filter, pagination, true).await?)
    }

    /// Stores a new period.
    ///
    /// A company cannot hold two periods with the same date range.
    pub async fn create_period(&self, period: AccountingPeriod) -> AppResult<AccountingPeriod> {
        if period.start_date > period.end_date {
            return Err(AppError::Validation(format!(
                "Period starts after it ends: {} > {}",
                period.start_date, period.end_date
            )));
        }

        let mut same_range = Filter::new();
        same_range.insert("company_id".to_string(), json!(period.company_id));
        same_range.insert("start_date".to_string(), json!(period.start_date));
        same_range.insert("end_date".to_string(), json!(period.end_date));

        if let Some(existing) = self.periods.get(&same_range, false).await? {
            return Err(AppError::Conflict(format!(
                "Accounting period {} already covers {} to {}",
                existing.name, period.start_date, period.end_date
            )));
        }

        let period = self.periods.create(period).await?;
        info!(period_id = ?period.id, company_id = %period.company_id, "accounting period created");
        Ok(period)
    }

    /// Overwrites an existing period.
    pub async fn update_period(
        &self,
        id: AccountingPeriodId,
        period: AccountingPeriod,
    ) -> AppResult<AccountingPeriod> {
        self.get_period(id).await?;

        self.periods
            .update_by_id(id, period)
            .await?
            .ok_or_else(|| AppError::WriteFailed(format!("Could not update accounting period {id}")))
    }

    /// Removes a period.
    pub async fn delete_period(&self, id: AccountingPeriodId) -> AppResult<()> {
        self.get_period(id).await?;

        if !self.periods.delete_by_id(id).await? {
            return Err(AppError::WriteFailed(format!(
                "Could not delete accounting period {id}"
            )));
        }

        Ok(())
    }
}
