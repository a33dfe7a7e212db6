//! Company management.

use finrep_core::pagination::{Page, PaginationFilters};
use finrep_core::query::ModelFilters;
use finrep_shared::types::CompanyId;
use finrep_shared::{AppError, AppResult};
use tracing::info;

use crate::dao::{DaoSettings, DocumentDao};
use crate::models::{Company, CompanyStatus};
use crate::store::{DocumentStore, Filter};

/// Company use cases.
#[derive(Debug)]
pub struct CompanyManager {
    companies: DocumentDao<Company>,
    filters: ModelFilters,
}

impl CompanyManager {
    /// Creates a manager over `store`.
    pub fn new<S>(store: &S, settings: &DaoSettings) -> AppResult<Self>
    where
        S: DocumentStore + ?Sized,
    {
        Ok(Self {
            companies: DocumentDao::for_model(store, settings)?,
            filters: ModelFilters::build::<Company>(&["_id"]),
        })
    }

    /// Filter and order surface for company listings.
    pub const fn filters(&self) -> &ModelFilters {
        &self.filters
    }

    /// Returns the company or `NotFound`.
    pub async fn get_company(&self, id: CompanyId) -> AppResult<Company> {
        self.companies
            .get_by_id(id, false)
            .await?
            .map(|company| (*company).clone())
            .ok_or_else(|| AppError::NotFound(format!("No company with id {id}")))
    }

    /// Lists companies matching `filter`, ordered and sliced by `pagination`.
    pub async fn list_companies(
        &self,
        filter: &Filter,
        pagination: &PaginationFilters,
    ) -> AppResult<Page<Company>> {
        Ok(self.companies.get_page(filter, pagination, true).await?)
    }

    /// Stores a new company.
    pub async fn create_company(&self, company: Company) -> AppResult<Company> {
        let company = self.companies.create(company).await?;
        info!(company_id = ?company.id, name = %company.name, "company created");
        Ok(company)
    }

    /// Overwrites an existing company.
    pub async fn update_company(&self, id: CompanyId, company: Company) -> AppResult<Company> {
        self.get_company(id).await?;

        self.companies
            .update_by_id(id, company)
            .await?
            .ok_or_else(|| AppError::WriteFailed(format!("Could not update company {id}")))
    }

    /// Marks a company inactive. Its documents are kept.
    pub async fn delete_company(&self, id: CompanyId) -> AppResult<()> {
        let mut company = self.get_company(id).await?;
        company.status = CompanyStatus::Inactive;

        self.companies
            .update_by_id(id, company)
            .await?
            .ok_or_else(|| AppError::WriteFailed(format!("Could not delete company {id}")))?;

        info!(company_id = %id, "company deactivated");
        Ok(())
    }
}
