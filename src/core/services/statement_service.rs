//! Per-party statements with a running balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{PartyRole, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatementRow {
    pub transaction: Transaction,
    /// Amount the row adds to the balance; zero for payments.
    pub charge: Decimal,
    /// Amount the row settles; zero for sales and purchases.
    pub settlement: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statement {
    pub party: String,
    pub role: PartyRole,
    pub rows: Vec<StatementRow>,
    pub total_charged: Decimal,
    pub total_settled: Decimal,
    pub closing_balance: Decimal,
}

impl Statement {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct StatementService;

impl StatementService {
    /// Rows run oldest to newest; the last row's running balance always equals
    /// `closing_balance`.
    pub fn build<'a, I>(transactions: I, party: &str, role: PartyRole) -> Statement
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut matching: Vec<&Transaction> = transactions
            .into_iter()
            .filter(|txn| txn.concerns(party, role))
            .collect();
        matching.sort_by(|a, b| a.chronological_cmp(b));

        let mut total_charged = Decimal::ZERO;
        let mut total_settled = Decimal::ZERO;
        let mut running = Decimal::ZERO;
        let mut rows = Vec::with_capacity(matching.len());
        for txn in matching {
            let (charge, settlement) = if txn.kind().is_payment() {
                (Decimal::ZERO, txn.amount)
            } else {
                (txn.amount, Decimal::ZERO)
            };
            total_charged += charge;
            total_settled += settlement;
            running += txn.signed_amount();
            rows.push(StatementRow {
                transaction: txn.clone(),
                charge,
                settlement,
                running_balance: running,
            });
        }

        Statement {
            party: party.to_string(),
            role,
            rows,
            total_charged,
            total_settled,
            closing_balance: running,
        }
    }

    pub fn client<'a, I>(transactions: I, client: &str) -> Statement
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::build(transactions, client, PartyRole::Client)
    }

    pub fn supplier<'a, I>(transactions: I, supplier: &str) -> Statement
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::build(transactions, supplier, PartyRole::Supplier)
    }
}
