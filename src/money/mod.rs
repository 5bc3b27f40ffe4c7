//! Display helpers for monetary amounts. Accumulation always happens at full precision;
//! rounding to two decimals is applied only when rendering.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const DISPLAY_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

/// Rounds half away from zero to the display scale.
pub fn round_for_display(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded
}

/// `1234.5` → `1,234.50`; negative values keep a leading minus sign.
pub fn format_amount(amount: Decimal) -> String {
    MoneyFormatter::plain().format(amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormatter {
    pub label: Option<String>,
    pub negative_style: NegativeStyle,
}

impl MoneyFormatter {
    pub fn plain() -> Self {
        Self {
            label: None,
            negative_style: NegativeStyle::Sign,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let label = config.currency_label.trim();
        Self {
            label: (!label.is_empty()).then(|| label.to_string()),
            negative_style: NegativeStyle::Sign,
        }
    }

    pub fn with_negative_style(mut self, style: NegativeStyle) -> Self {
        self.negative_style = style;
        self
    }

    pub fn format(&self, amount: Decimal) -> String {
        let rounded = round_for_display(amount);
        let negative = rounded < Decimal::ZERO;
        let digits = group_thousands(&rounded.abs().to_string());
        let body = match &self.label {
            Some(label) => format!("{label} {digits}"),
            None => digits,
        };
        match (negative, self.negative_style) {
            (false, _) => body,
            (true, NegativeStyle::Sign) => format!("-{body}"),
            (true, NegativeStyle::Parentheses) => format!("({body})"),
        }
    }
}

fn group_thousands(plain: &str) -> String {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain, None),
    };
    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
