//! Model wire format and derived figures.

use chrono::NaiveDate;
use finrep_core::pagination::{SortValue, Sortable};
use finrep_core::query::{ModelFilters, OrderFields, Schema};
use finrep_shared::types::{AccountingPeriodId, BalanceSheetId, CompanyId, IncomeStatementId, UserId};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use super::*;
use crate::codec::{decode, encode};
use crate::dao::DaoError;
use crate::model::{CollectionBinding, Model};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_company_status_uses_primitive_value() {
    let mut company = Company::new("Acme", "ACM010101AAA");
    company.status = CompanyStatus::Inactive;

    let document = encode("company", &company).unwrap();

    assert_eq!(document["status"], json!("inactive"));
    assert!(!document.contains_key("_id"));
    let back: Company = decode("company", document).unwrap();
    assert_eq!(back.status, CompanyStatus::Inactive);
}

#[test]
fn test_company_status_defaults_to_active() {
    let document = json!({ "name": "Acme", "rfc": "X" })
        .as_object()
        .cloned()
        .unwrap();

    let company: Company = decode("company", document).unwrap();

    assert!(company.is_active());
    assert!(company.id.is_none());
}

#[test]
fn test_identity_travels_as_underscore_id() {
    let id = CompanyId::new();
    let mut company = Company::new("Acme", "X");
    company.set_id(Some(id));

    let document = encode("company", &company).unwrap();

    assert_eq!(document["_id"], json!(id.to_string()));
    assert_eq!(company.take_id(), Some(id));
    assert!(company.id().is_none());
}

#[test]
fn test_period_dates_are_iso() {
    let period = AccountingPeriod::new(CompanyId::new(), "FY2025", date(2025, 1, 1), date(2025, 12, 31));

    let document = encode("accounting_period", &period).unwrap();

    assert_eq!(document["start_date"], json!("2025-01-01"));
    assert_eq!(document["end_date"], json!("2025-12-31"));
    assert!(period.contains(date(2025, 6, 30)));
    assert!(!period.contains(date(2026, 1, 1)));
}

#[test]
fn test_decimals_are_strings() {
    let mut statement = IncomeStatement::empty(AccountingPeriodId::new());
    statement.net_sales = dec!(1250.50);

    let document = encode("income_statement", &statement).unwrap();

    assert_eq!(document["net_sales"], json!("1250.50"));
}

#[test]
fn test_company_filters_reduce_enum() {
    let filters = ModelFilters::build::<Company>(&["_id"]);

    let extracted = filters
        .extract([("status", "Inactive"), ("name", "Acme")])
        .unwrap();

    assert_eq!(
        serde_json::Value::Object(extracted),
        json!({ "name": "Acme", "status": "inactive" })
    );
}

fn assert_order_fields_sort<M: Schema + Sortable>(item: &M) {
    let fields = OrderFields::of::<M>();
    assert!(!fields.is_empty());
    for name in fields.iter() {
        assert!(item.sort_value(name).is_some(), "order field {name} has no sort value");
    }
}

#[test]
fn test_every_order_field_has_a_sort_value() {
    let mut company = Company::new("Acme", "ACM010101AAA");
    company.set_id(Some(CompanyId::new()));
    assert_order_fields_sort(&company);

    let mut period = AccountingPeriod::new(CompanyId::new(), "FY2025", date(2025, 1, 1), date(2025, 12, 31));
    period.set_id(Some(AccountingPeriodId::new()));
    assert_order_fields_sort(&period);

    let mut user = User::new("demo", "$argon2id$hash");
    user.set_id(Some(UserId::new()));
    assert_order_fields_sort(&user);

    let mut sheet = BalanceSheet::empty(AccountingPeriodId::new());
    sheet.set_id(Some(BalanceSheetId::new()));
    assert_order_fields_sort(&sheet);

    let mut income = IncomeStatement::empty(AccountingPeriodId::new());
    income.set_id(Some(IncomeStatementId::new()));
    assert_order_fields_sort(&income);
}

#[test]
fn test_company_orders_by_status_value() {
    let fields = OrderFields::of::<Company>();
    assert_eq!(fields.iter().collect::<Vec<_>>(), vec!["_id", "name", "rfc", "status"]);

    let mut company = Company::new("Acme", "X");
    company.status = CompanyStatus::Inactive;
    assert_eq!(company.sort_value("status"), Some(SortValue::Text("inactive".into())));
}

#[test]
fn test_password_hash_is_not_orderable() {
    let fields = OrderFields::of::<User>();
    assert_eq!(fields.iter().collect::<Vec<_>>(), vec!["_id", "username"]);
    assert!(fields.parse("password_hash").is_err());
}

#[test]
fn test_period_sort_values() {
    let period = AccountingPeriod::new(CompanyId::new(), "FY2025", date(2025, 1, 1), date(2025, 12, 31));

    assert_eq!(period.sort_value("start_date"), Some(SortValue::Date(date(2025, 1, 1))));
    assert_eq!(period.sort_value("_id"), None);
    assert_eq!(period.sort_value("unknown"), None);
}

#[rstest]
#[case(dec!(1000), dec!(400), dec!(40))]
#[case(dec!(0), dec!(400), dec!(0))]
#[case(dec!(200), dec!(-50), dec!(-25))]
fn test_gross_margin(#[case] net_sales: Decimal, #[case] gross_profit: Decimal, #[case] expected: Decimal) {
    let mut statement = IncomeStatement::empty(AccountingPeriodId::new());
    statement.net_sales = net_sales;
    statement.gross_profit = gross_profit;

    assert_eq!(statement.gross_margin(), expected);
}

#[test]
fn test_income_margins() {
    let mut statement = IncomeStatement::empty(AccountingPeriodId::new());
    statement.net_sales = dec!(500);
    statement.operating_income = dec!(50);
    statement.net_income = dec!(25);

    assert_eq!(statement.operating_margin(), dec!(10));
    assert_eq!(statement.net_margin(), dec!(5));
}

#[test]
fn test_balance_sheet_ratios() {
    let mut sheet = BalanceSheet::empty(AccountingPeriodId::new());
    sheet.total_current_assets = dec!(300);
    sheet.inventories = dec!(100);
    sheet.total_current_liabilities = dec!(150);
    sheet.total_assets = dec!(1000);
    sheet.total_liabilities = dec!(400);
    sheet.equity = dec!(600);
    sheet.total_liabilities_and_equity = dec!(1000);

    assert_eq!(sheet.current_ratio(), dec!(2));
    assert_eq!(sheet.working_capital(), dec!(150));
    assert_eq!(sheet.debt_ratio(), dec!(40));
    assert!(sheet.is_balanced());
    assert_eq!(BalanceSheet::empty(AccountingPeriodId::new()).financial_leverage(), Decimal::ZERO);
}

#[test]
fn test_statement_union_is_ambiguous() {
    let result = CollectionBinding::resolve(&Statement::bindings());
    assert!(matches!(result, Err(DaoError::AmbiguousCollection(_))));
}

#[test]
fn test_statement_union_decodes_either_variant() {
    let period_id = AccountingPeriodId::new();
    let document = encode("income_statement", &IncomeStatement::empty(period_id)).unwrap();

    let statement: Statement = decode("income_statement", document).unwrap();

    assert!(matches!(statement, Statement::IncomeStatement(_)));
    assert_eq!(statement.period_id(), period_id);
}
