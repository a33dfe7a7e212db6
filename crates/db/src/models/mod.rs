//! Financial domain models.
//!
//! Each model carries its storage identity under `_id`, declares its field
//! table for the filter and order builders, and exposes its orderable
//! fields to the paginator.

mod accounting_period;
mod company;
mod statements;
mod user;

#[cfg(test)]
mod tests;

pub use accounting_period::AccountingPeriod;
pub use company::{Company, CompanyStatus};
pub use statements::{BalanceSheet, IncomeStatement, Statement};
pub use user::User;
