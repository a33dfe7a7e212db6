//! Financial statements attached to an accounting period.

use finrep_core::pagination::{SortValue, Sortable};
use finrep_core::query::{FieldDescriptor, FieldKind, Schema};
use finrep_shared::types::{AccountingPeriodId, BalanceSheetId, IncomeStatementId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{CollectionBinding, Model};

/// Declares a statement: identity, owning period and decimal line items.
macro_rules! statement {
    (
        $(#[$meta:meta])*
        $name:ident($id:ty) in $collection:literal {
            $( $(#[$field_meta:meta])* $field:ident, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            /// Storage identity.
            #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
            pub id: Option<$id>,
            /// Period the statement reports on.
            pub period_id: AccountingPeriodId,
            $( $(#[$field_meta])* pub $field: Decimal, )+
        }

        impl Schema for $name {
            const FIELDS: &'static [FieldDescriptor] = &[
                FieldDescriptor::new("id", FieldKind::Id).renamed("_id"),
                FieldDescriptor::new("period_id", FieldKind::Id),
                $( FieldDescriptor::new(stringify!($field), FieldKind::Decimal), )+
            ];
        }

        impl Sortable for $name {
            fn sort_value(&self, field: &str) -> Option<SortValue> {
                match field {
                    "_id" => self.id.map(|id| id.into_inner().into()),
                    "period_id" => Some(self.period_id.into_inner().into()),
                    $( stringify!($field) => Some(self.$field.into()), )+
                    _ => None,
                }
            }
        }

        impl Model for $name {
            type Id = $id;

            fn bindings() -> Vec<CollectionBinding> {
                vec![CollectionBinding::new($collection, 1)]
            }

            fn id(&self) -> Option<$id> {
                self.id
            }

            fn set_id(&mut self, id: Option<$id>) {
                self.id = id;
            }
        }
    };
}

statement! {
    /// Balance sheet of one period.
    BalanceSheet(BalanceSheetId) in "balance_sheet" {
        /// Cash and cash equivalents.
        cash_and_equivalents,
        /// Accounts receivable.
        accounts_receivable,
        /// Inventories.
        inventories,
        /// Other current assets.
        other_current_assets,
        /// Property, plant and equipment.
        property_plant_equipment,
        /// Total current assets.
        total_current_assets,
        /// Intangible assets.
        intangible_assets,
        /// Other non-current assets.
        other_non_current_assets,
        /// Total non-current assets.
        total_non_current_assets,
        /// Total assets.
        total_assets,
        /// Accounts payable.
        accounts_payable,
        /// Accrued liabilities.
        accrued_liabilities,
        /// Short-term debt.
        short_term_debt,
        /// Total current liabilities.
        total_current_liabilities,
        /// Long-term debt.
        long_term_debt,
        /// Other long-term liabilities.
        other_long_term_liabilities,
        /// Total long-term liabilities.
        total_long_term_liabilities,
        /// Total liabilities.
        total_liabilities,
        /// Share capital and retained earnings.
        equity,
        /// Total liabilities and equity.
        total_liabilities_and_equity,
    }
}

statement! {
    /// Income statement of one period.
    IncomeStatement(IncomeStatementId) in "income_statement" {
        /// Net sales.
        net_sales,
        /// Cost of sales.
        cost_of_sales,
        /// Gross profit.
        gross_profit,
        /// Operating expenses.
        operating_expenses,
        /// Operating income.
        operating_income,
        /// Net financial result.
        financial_result,
        /// Income before taxes.
        income_before_taxes,
        /// Income tax.
        income_tax,
        /// Net income.
        net_income,
    }
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `numerator / denominator`, or zero when the denominator is zero.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

fn percent(numerator: Decimal, denominator: Decimal) -> Decimal {
    ratio(numerator, denominator)
        .checked_mul(HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

impl BalanceSheet {
    /// Creates a balance sheet with every line item at zero.
    pub fn empty(period_id: AccountingPeriodId) -> Self {
        Self {
            id: None,
            period_id,
            cash_and_equivalents: Decimal::ZERO,
            accounts_receivable: Decimal::ZERO,
            inventories: Decimal::ZERO,
            other_current_assets: Decimal::ZERO,
            property_plant_equipment: Decimal::ZERO,
            total_current_assets: Decimal::ZERO,
            intangible_assets: Decimal::ZERO,
            other_non_current_assets: Decimal::ZERO,
            total_non_current_assets: Decimal::ZERO,
            total_assets: Decimal::ZERO,
            accounts_payable: Decimal::ZERO,
            accrued_liabilities: Decimal::ZERO,
            short_term_debt: Decimal::ZERO,
            total_current_liabilities: Decimal::ZERO,
            long_term_debt: Decimal::ZERO,
            other_long_term_liabilities: Decimal::ZERO,
            total_long_term_liabilities: Decimal::ZERO,
            total_liabilities: Decimal::ZERO,
            equity: Decimal::ZERO,
            total_liabilities_and_equity: Decimal::ZERO,
        }
    }

    /// Current assets over current liabilities.
    pub fn current_ratio(&self) -> Decimal {
        ratio(self.total_current_assets, self.total_current_liabilities)
    }

    /// Current assets less inventories, over current liabilities.
    pub fn quick_ratio(&self) -> Decimal {
        ratio(
            self.total_current_assets - self.inventories,
            self.total_current_liabilities,
        )
    }

    /// Current assets less current liabilities.
    pub fn working_capital(&self) -> Decimal {
        self.total_current_assets - self.total_current_liabilities
    }

    /// Total liabilities as a percentage of total assets.
    pub fn debt_ratio(&self) -> Decimal {
        percent(self.total_liabilities, self.total_assets)
    }

    /// Total liabilities as a percentage of equity.
    pub fn debt_to_equity(&self) -> Decimal {
        percent(self.total_liabilities, self.equity)
    }

    /// Total assets over equity.
    pub fn financial_leverage(&self) -> Decimal {
        ratio(self.total_assets, self.equity)
    }

    /// Returns true when assets equal liabilities plus equity.
    pub fn is_balanced(&self) -> bool {
        self.total_assets == self.total_liabilities_and_equity
    }
}

impl IncomeStatement {
    /// Creates an income statement with every line item at zero.
    pub fn empty(period_id: AccountingPeriodId) -> Self {
        Self {
            id: None,
            period_id,
            net_sales: Decimal::ZERO,
            cost_of_sales: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            operating_expenses: Decimal::ZERO,
            operating_income: Decimal::ZERO,
            financial_result: Decimal::ZERO,
            income_before_taxes: Decimal::ZERO,
            income_tax: Decimal::ZERO,
            net_income: Decimal::ZERO,
        }
    }

    /// Gross profit as a percentage of net sales.
    pub fn gross_margin(&self) -> Decimal {
        percent(self.gross_profit, self.net_sales)
    }

    /// Operating income as a percentage of net sales.
    pub fn operating_margin(&self) -> Decimal {
        percent(self.operating_income, self.net_sales)
    }

    /// Net income as a percentage of net sales.
    pub fn net_margin(&self) -> Decimal {
        percent(self.net_income, self.net_sales)
    }
}

/// Either statement of a period.
///
/// The two variants live in different collections, so no single DAO can be
/// built for this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Statement {
    /// A balance sheet.
    BalanceSheet(BalanceSheet),
    /// An income statement.
    IncomeStatement(IncomeStatement),
}

impl Statement {
    /// Period the statement reports on.
    pub const fn period_id(&self) -> AccountingPeriodId {
        match self {
            Self::BalanceSheet(sheet) => sheet.period_id,
            Self::IncomeStatement(statement) => statement.period_id,
        }
    }
}

impl Schema for Statement {
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("id", FieldKind::Id).renamed("_id"),
        FieldDescriptor::new("period_id", FieldKind::Id),
    ];
}

impl Model for Statement {
    type Id = Uuid;

    fn bindings() -> Vec<CollectionBinding> {
        [BalanceSheet::bindings(), IncomeStatement::bindings()].concat()
    }

    fn id(&self) -> Option<Uuid> {
        match self {
            Self::BalanceSheet(sheet) => sheet.id.map(Into::into),
            Self::IncomeStatement(statement) => statement.id.map(Into::into),
        }
    }

    fn set_id(&mut self, id: Option<Uuid>) {
        match self {
            Self::BalanceSheet(sheet) => sheet.id = id.map(Into::into),
            Self::IncomeStatement(statement) => statement.id = id.map(Into::into),
        }
    }
}
