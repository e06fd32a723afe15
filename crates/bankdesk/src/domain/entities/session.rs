//! SessionInput - what the user has typed so far
//!
//! Lives only for one interaction; cleared after every submit.

use crate::domain::value_objects::Action;

/// Form fields collected from the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionInput {
    pub account_number: String,
    pub action: Option<Action>,
    pub amount: Option<f64>,
}

impl SessionInput {
    pub fn new(account_number: impl Into<String>, action: Action, amount: Option<f64>) -> Self {
        Self {
            account_number: account_number.into(),
            action: Some(action),
            amount,
        }
    }

    /// Amount usable for a deposit or withdrawal.
    ///
    /// Zero, negative and non-finite values count as "not entered".
    pub fn entered_amount(&self) -> Option<f64> {
        self.amount.filter(|a| a.is_finite() && *a > 0.0)
    }

    /// Opening balance for an account created from this input
    pub fn initial_balance(&self) -> f64 {
        match self.action {
            Some(Action::Deposit) => self.amount.filter(|a| a.is_finite()).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
