//! Turns caller input into validated transaction records.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::core::errors::LedgerError;
use crate::domain::{Entry, LineItem, Transaction, TransactionInput};

/// Decimal places kept when an amount is derived from quantity and unit price.
pub const AMOUNT_SCALE: u32 = 2;

pub struct TransactionService;

impl TransactionService {
    /// Fresh identifier for a record the caller did not name.
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Validates `input` and assembles the record stored under `id`.
    pub fn build(
        input: &TransactionInput,
        id: String,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let party = input.party.trim();
        if party.is_empty() {
            return Err(LedgerError::validation("party name is required"));
        }
        let entry = Entry::from_parts(input.kind, Self::line_from(input)?)?;
        let amount = Self::resolve_amount(input, &entry)?;
        let txn = Transaction {
            id,
            date: input.date,
            party: party.to_string(),
            entry,
            amount,
            created_at,
        };
        txn.validate()?;
        Ok(txn)
    }

    /// `quantity × unit_price` rounded half away from zero to two decimals.
    pub fn derive_amount(line: &LineItem) -> Decimal {
        line.extended_amount()
            .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    fn line_from(input: &TransactionInput) -> Result<Option<LineItem>, LedgerError> {
        let item = input
            .item
            .as_deref()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string);

        if input.kind.is_payment() {
            let has_line_fields = item.is_some()
                || input.quantity.is_some()
                || input.unit.is_some()
                || input.unit_price.is_some();
            if has_line_fields {
                return Err(LedgerError::validation(format!(
                    "{} cannot carry item, quantity, unit or unit price",
                    input.kind.label()
                )));
            }
            return Ok(None);
        }

        let kind = input.kind.label();
        let quantity = input
            .quantity
            .ok_or_else(|| LedgerError::validation(format!("{kind} requires a quantity")))?;
        let unit = input
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .ok_or_else(|| LedgerError::validation(format!("{kind} requires a unit")))?;
        let unit_price = input
            .unit_price
            .ok_or_else(|| LedgerError::validation(format!("{kind} requires a unit price")))?;
        Ok(Some(LineItem::new(item, quantity, unit, unit_price)))
    }

    fn resolve_amount(input: &TransactionInput, entry: &Entry) -> Result<Decimal, LedgerError> {
        match (input.amount, entry.line()) {
            (Some(amount), _) if amount < Decimal::ZERO => {
                Err(LedgerError::validation("amount cannot be negative"))
            }
            (Some(amount), _) => Ok(amount),
            (None, Some(line)) => Ok(Self::derive_amount(line)),
            (None, None) => Err(LedgerError::validation(format!(
                "{} requires an amount",
                input.kind.label()
            ))),
        }
    }
}
