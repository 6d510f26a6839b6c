//! Balance accumulator threaded through one scenario run

use crate::household::TaxInputs;

/// Mutable IRA/Roth balances for one scenario.
///
/// Owned by a single scenario run and dropped when it completes; the
/// baseline and optimized runs each start their own from the inputs.
/// Balances are floored at zero after every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioState {
    /// Tax-deferred (traditional IRA / 401k) balance
    pub ira_balance: f64,

    /// Roth balance
    pub roth_balance: f64,
}

impl ScenarioState {
    /// Initialize from the household's starting balances
    pub fn from_inputs(inputs: &TaxInputs) -> Self {
        Self {
            ira_balance: inputs.ira_balance.max(0.0),
            roth_balance: inputs.roth_balance.max(0.0),
        }
    }

    /// Add pre-retirement contributions
    pub fn contribute(&mut self, to_ira: f64, to_roth: f64) {
        self.ira_balance = (self.ira_balance + to_ira.max(0.0)).max(0.0);
        self.roth_balance = (self.roth_balance + to_roth.max(0.0)).max(0.0);
    }

    pub fn grow_ira(&mut self, rate: f64) {
        self.ira_balance = (self.ira_balance * (1.0 + rate)).max(0.0);
    }

    pub fn grow_roth(&mut self, rate: f64) {
        self.roth_balance = (self.roth_balance * (1.0 + rate)).max(0.0);
    }

    /// Remove up to `amount` from the IRA; returns what was actually removed
    pub fn withdraw_ira(&mut self, amount: f64) -> f64 {
        let taken = amount.max(0.0).min(self.ira_balance);
        self.ira_balance = (self.ira_balance - taken).max(0.0);
        taken
    }

    pub fn deposit_roth(&mut self, amount: f64) {
        self.roth_balance = (self.roth_balance + amount.max(0.0)).max(0.0);
    }
}
