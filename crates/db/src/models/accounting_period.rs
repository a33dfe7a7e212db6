//! Accounting periods.

use chrono::NaiveDate;
use finrep_core::pagination::{SortValue, Sortable};
use finrep_core::query::{FieldDescriptor, FieldKind, Schema};
use finrep_shared::types::{AccountingPeriodId, CompanyId};
use serde::{Deserialize, Serialize};

use crate::model::{CollectionBinding, Model};

/// A reporting period of one company, bounded by inclusive dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Storage identity.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AccountingPeriodId>,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name, e.g. `FY2025`.
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
}

impl AccountingPeriod {
    /// Creates a period without identity.
    pub fn new(
        company_id: CompanyId,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            company_id,
            name: name.into(),
            start_date,
            end_date,
        }
    }

    /// Returns true if `date` falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl Schema for AccountingPeriod {
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("id", FieldKind::Id).renamed("_id"),
        FieldDescriptor::new("company_id", FieldKind::Id),
        FieldDescriptor::new("name", FieldKind::Text),
        FieldDescriptor::new("start_date", FieldKind::Date),
        FieldDescriptor::new("end_date", FieldKind::Date),
    ];
}

impl Sortable for AccountingPeriod {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "_id" => self.id.map(|id| id.into_inner().into()),
            "company_id" => Some(self.company_id.into_inner().into()),
            "name" => Some(self.name.as_str().into()),
            "start_date" => Some(self.start_date.into()),
            "end_date" => Some(self.end_date.into()),
            _ => None,
        }
    }
}

impl Model for AccountingPeriod {
    type Id = AccountingPeriodId;

    fn bindings() -> Vec<CollectionBinding> {
        vec![CollectionBinding::new("accounting_period", 1)]
    }

    fn id(&self) -> Option<AccountingPeriodId> {
        self.id
    }

    fn set_id(&mut self, id: Option<AccountingPeriodId>) {
        self.id = id;
    }
}
