//! Calendar-month grouping of the ledger.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Transaction, TransactionKind};

/// One calendar month of activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyReport {
    /// Sortable `YYYY-MM` key.
    pub key: String,
    /// English month name and year, e.g. `January 2025`.
    pub label: String,
    pub sales_total: Decimal,
    pub purchases_total: Decimal,
    /// Every record dated in the month, payments included, oldest first.
    pub transactions: Vec<Transaction>,
}

impl MonthlyReport {
    fn open(date: NaiveDate) -> Self {
        Self {
            key: ReportService::month_key(date),
            label: ReportService::month_label(date),
            sales_total: Decimal::ZERO,
            purchases_total: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }

    fn absorb(&mut self, txn: &Transaction) {
        match txn.kind() {
            TransactionKind::Sale => self.sales_total += txn.amount,
            TransactionKind::Purchase => self.purchases_total += txn.amount,
            TransactionKind::PaymentIn | TransactionKind::PaymentOut => {}
        }
        self.transactions.push(txn.clone());
    }

    /// Sales minus purchases for the month.
    pub fn balance(&self) -> Decimal {
        self.sales_total - self.purchases_total
    }
}

pub struct ReportService;

impl ReportService {
    /// Buckets by calendar month, newest month first. Months without records are not
    /// emitted. Payments appear in a bucket's records but never in its totals.
    pub fn monthly<'a, I>(transactions: I) -> Vec<MonthlyReport>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut ordered: Vec<&Transaction> = transactions.into_iter().collect();
        ordered.sort_by(|a, b| a.chronological_cmp(b));

        let mut buckets: BTreeMap<(i32, u32), MonthlyReport> = BTreeMap::new();
        for txn in ordered {
            buckets
                .entry((txn.date.year(), txn.date.month()))
                .or_insert_with(|| MonthlyReport::open(txn.date))
                .absorb(txn);
        }
        buckets.into_values().rev().collect()
    }

    /// The bucket for a single `YYYY-MM` key, or `None` when that month has no records or
    /// the key is malformed.
    pub fn month<'a, I>(transactions: I, key: &str) -> Option<MonthlyReport>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (year, month) = Self::parse_key(key)?;
        Self::monthly(
            transactions
                .into_iter()
                .filter(|txn| txn.date.year() == year && txn.date.month() == month),
        )
        .into_iter()
        .next()
    }

    pub fn month_key(date: NaiveDate) -> String {
        format!("{:04}-{:02}", date.year(), date.month())
    }

    pub fn month_label(date: NaiveDate) -> String {
        date.format("%B %Y").to_string()
    }

    fn parse_key(key: &str) -> Option<(i32, u32)> {
        let (year, month) = key.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }
}
