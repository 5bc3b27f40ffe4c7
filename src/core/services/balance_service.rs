//! Pure balance folds over a transaction snapshot. Nothing is cached: every call walks the
//! records it is given, so two calls over the same snapshot always agree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{PartyRole, Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DashboardTotals {
    pub total_sales: Decimal,
    pub total_purchases: Decimal,
    pub net_balance: Decimal,
}

/// Charged and settled sums for one party.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartySummary {
    pub name: String,
    pub role: PartyRole,
    pub charged: Decimal,
    pub settled: Decimal,
    pub balance: Decimal,
}

impl PartySummary {
    fn empty(name: &str, role: PartyRole) -> Self {
        Self {
            name: name.to_string(),
            role,
            charged: Decimal::ZERO,
            settled: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    fn absorb(&mut self, txn: &Transaction) {
        if txn.kind().is_payment() {
            self.settled += txn.amount;
        } else {
            self.charged += txn.amount;
        }
        self.balance = self.charged - self.settled;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard<'a> {
    pub totals: DashboardTotals,
    pub recent: Vec<&'a Transaction>,
}

pub struct BalanceService;

impl BalanceService {
    /// Sales minus payments received. Positive means the client owes money.
    pub fn client_balance<'a, I>(transactions: I, client: &str) -> Decimal
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::party_balance(transactions, client, PartyRole::Client)
    }

    /// Purchases minus payments made. Positive means money is owed to the supplier.
    pub fn supplier_due<'a, I>(transactions: I, supplier: &str) -> Decimal
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::party_balance(transactions, supplier, PartyRole::Supplier)
    }

    pub fn party_balance<'a, I>(transactions: I, party: &str, role: PartyRole) -> Decimal
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .filter(|txn| txn.concerns(party, role))
            .map(Transaction::signed_amount)
            .sum()
    }

    pub fn party_summary<'a, I>(transactions: I, party: &str, role: PartyRole) -> PartySummary
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .filter(|txn| txn.concerns(party, role))
            .fold(PartySummary::empty(party, role), |mut summary, txn| {
                summary.absorb(txn);
                summary
            })
    }

    /// One summary per name, in the order given; names without history report zeros.
    pub fn party_summaries<'a, I, S>(
        transactions: I,
        role: PartyRole,
        names: &[S],
    ) -> Vec<PartySummary>
    where
        I: IntoIterator<Item = &'a Transaction>,
        S: AsRef<str>,
    {
        let mut by_party: HashMap<&str, PartySummary> = HashMap::new();
        for txn in transactions.into_iter().filter(|txn| txn.role() == role) {
            by_party
                .entry(txn.party.as_str())
                .or_insert_with(|| PartySummary::empty(&txn.party, role))
                .absorb(txn);
        }
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                by_party
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| PartySummary::empty(name, role))
            })
            .collect()
    }

    /// Sales and purchase volume. Payments move cash against existing balances and are
    /// left out.
    pub fn dashboard_totals<'a, I>(transactions: I) -> DashboardTotals
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (total_sales, total_purchases) = transactions.into_iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(sales, purchases), txn| match txn.kind() {
                TransactionKind::Sale => (sales + txn.amount, purchases),
                TransactionKind::Purchase => (sales, purchases + txn.amount),
                TransactionKind::PaymentIn | TransactionKind::PaymentOut => (sales, purchases),
            },
        );
        DashboardTotals {
            total_sales,
            total_purchases,
            net_balance: total_sales - total_purchases,
        }
    }

    /// Newest first by date, then by creation stamp.
    pub fn recent<'a, I>(transactions: I, limit: usize) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut ordered: Vec<&Transaction> = transactions.into_iter().collect();
        ordered.sort_by(|a, b| b.chronological_cmp(a));
        ordered.truncate(limit);
        ordered
    }

    pub fn dashboard<'a, I>(transactions: I, recent_limit: usize) -> Dashboard<'a>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let snapshot: Vec<&Transaction> = transactions.into_iter().collect();
        Dashboard {
            totals: Self::dashboard_totals(snapshot.iter().copied()),
            recent: Self::recent(snapshot, recent_limit),
        }
    }
}
