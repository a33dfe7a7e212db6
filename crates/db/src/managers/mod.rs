//! Business managers built on the document DAOs.
//!
//! Managers turn absent results into domain errors and enforce the
//! uniqueness rules the store does not know about.

mod accounting_period;
mod company;
mod user;

pub use accounting_period::AccountingPeriodManager;
pub use company::CompanyManager;
pub use user::UserManager;

use finrep_shared::AppError;

use crate::dao::DaoError;
use crate::store::StoreError;

impl From<DaoError> for AppError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NoCollection | DaoError::AmbiguousCollection(_) => {
                Self::Configuration(err.to_string())
            }
            DaoError::Query(e) => Self::Validation(e.to_string()),
            DaoError::Store(StoreError::DuplicateId { .. }) => Self::Conflict(err.to_string()),
            DaoError::Store(StoreError::InvalidId(id)) => {
                Self::Validation(format!("Invalid id: {id}"))
            }
            DaoError::Store(e) => Self::Database(e.to_string()),
            DaoError::Encode(_) | DaoError::Decode { .. } => Self::Internal(err.to_string()),
        }
    }
}
