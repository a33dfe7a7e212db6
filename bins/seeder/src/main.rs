//! Development data seeder for Finrep.
//!
//! Seeds a demo company with three fiscal years, each with a balance sheet
//! and an income statement, plus a demo user. Runs through the DAO layer, so
//! it works against whatever store the configuration points at.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use finrep_db::managers::{AccountingPeriodManager, CompanyManager, UserManager};
use finrep_db::models::{AccountingPeriod, BalanceSheet, Company, IncomeStatement, User};
use finrep_db::{DaoSettings, DocumentDao, Filter, PgDocumentStore};
use finrep_shared::types::{AccountingPeriodId, CompanyId};
use finrep_shared::{AppConfig, AppError};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_RFC: &str = "DEM010101AAA";
const DEMO_USER: &str = "demo";
const FISCAL_YEARS: [i32; 3] = [2023, 2024, 2025];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finrep=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = finrep_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let store = PgDocumentStore::new(db);
    let settings = DaoSettings::from(&config.cache);

    seed_user(&store, &settings).await?;
    let company_id = seed_company(&store, &settings).await?;

    let periods = AccountingPeriodManager::new(&store, &settings)?;
    let sheets = DocumentDao::<BalanceSheet>::for_model(&store, &settings)?;
    let statements = DocumentDao::<IncomeStatement>::for_model(&store, &settings)?;

    for year in FISCAL_YEARS {
        let Some(period_id) = seed_period(&periods, company_id, year).await? else {
            continue;
        };
        sheets.create(balance_sheet(period_id, year)).await?;
        statements.create(income_statement(period_id, year)).await?;
        info!(year, %period_id, "seeded statements");
    }

    info!("Seeding complete");
    Ok(())
}

async fn seed_user(store: &PgDocumentStore, settings: &DaoSettings) -> anyhow::Result<()> {
    let users = UserManager::new(store, settings)?;

    let demo = User::new(DEMO_USER, "$argon2id$v=19$m=65536,t=3,p=4$demo_hash");
    match users.create_user(demo).await {
        Ok(_) => info!(username = DEMO_USER, "seeded user"),
        Err(AppError::Conflict(_)) => warn!(username = DEMO_USER, "user already exists, skipping"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn seed_company(store: &PgDocumentStore, settings: &DaoSettings) -> anyhow::Result<CompanyId> {
    let companies = DocumentDao::<Company>::for_model(store, settings)?;

    let mut by_rfc = Filter::new();
    by_rfc.insert("rfc".to_string(), json!(DEMO_RFC));
    if let Some(id) = companies.get(&by_rfc, false).await?.and_then(|company| company.id) {
        warn!(%id, "demo company already exists, skipping");
        return Ok(id);
    }

    let manager = CompanyManager::new(store, settings)?;
    let company = manager
        .create_company(Company::new("Demo Manufacturing", DEMO_RFC))
        .await?;

    company.id.context("store returned a company without id")
}

async fn seed_period(
    periods: &AccountingPeriodManager,
    company_id: CompanyId,
    year: i32,
) -> anyhow::Result<Option<AccountingPeriodId>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).context("invalid end date")?;

    match periods
        .create_period(AccountingPeriod::new(company_id, format!("FY{year}"), start, end))
        .await
    {
        Ok(period) => Ok(period.id),
        Err(AppError::Conflict(_)) => {
            warn!(year, "period already exists, skipping");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Scales a base amount by 10% per year after 2023.
fn amount(base: i64, year: i32) -> Decimal {
    let growth = Decimal::new(110, 2);
    (FISCAL_YEARS[0]..year)
        .fold(Decimal::from(base), |value, _| value * growth)
        .round_dp(2)
}

fn balance_sheet(period_id: AccountingPeriodId, year: i32) -> BalanceSheet {
    let mut sheet = BalanceSheet::empty(period_id);

    sheet.cash_and_equivalents = amount(150_000, year);
    sheet.accounts_receivable = amount(220_000, year);
    sheet.inventories = amount(180_000, year);
    sheet.other_current_assets = amount(50_000, year);
    sheet.total_current_assets = sheet.cash_and_equivalents
        + sheet.accounts_receivable
        + sheet.inventories
        + sheet.other_current_assets;

    sheet.property_plant_equipment = amount(600_000, year);
    sheet.intangible_assets = amount(80_000, year);
    sheet.other_non_current_assets = amount(20_000, year);
    sheet.total_non_current_assets = sheet.property_plant_equipment
        + sheet.intangible_assets
        + sheet.other_non_current_assets;
    sheet.total_assets = sheet.total_current_assets + sheet.total_non_current_assets;

    sheet.accounts_payable = amount(140_000, year);
    sheet.accrued_liabilities = amount(60_000, year);
    sheet.short_term_debt = amount(100_000, year);
    sheet.total_current_liabilities =
        sheet.accounts_payable + sheet.accrued_liabilities + sheet.short_term_debt;

    sheet.long_term_debt = amount(300_000, year);
    sheet.other_long_term_liabilities = amount(40_000, year);
    sheet.total_long_term_liabilities = sheet.long_term_debt + sheet.other_long_term_liabilities;
    sheet.total_liabilities = sheet.total_current_liabilities + sheet.total_long_term_liabilities;

    sheet.equity = sheet.total_assets - sheet.total_liabilities;
    sheet.total_liabilities_and_equity = sheet.total_liabilities + sheet.equity;

    sheet
}

fn income_statement(period_id: AccountingPeriodId, year: i32) -> IncomeStatement {
    let mut statement = IncomeStatement::empty(period_id);

    statement.net_sales = amount(1_200_000, year);
    statement.cost_of_sales = amount(720_000, year);
    statement.gross_profit = statement.net_sales - statement.cost_of_sales;
    statement.operating_expenses = amount(260_000, year);
    statement.operating_income = statement.gross_profit - statement.operating_expenses;
    statement.financial_result = amount(-25_000, year);
    statement.income_before_taxes = statement.operating_income + statement.financial_result;
    statement.income_tax = (statement.income_before_taxes * Decimal::new(30, 2)).round_dp(2);
    statement.net_income = statement.income_before_taxes - statement.income_tax;

    statement
}
