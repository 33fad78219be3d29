use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Economic assumptions shared by estimators and pricing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Annual return used to extrapolate share prices beyond known history
    #[serde(default = "default_long_term_return")]
    pub long_term_investment_return: Decimal,
}

fn default_long_term_return() -> Decimal {
    dec!(0.07)
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            long_term_investment_return: default_long_term_return(),
        }
    }
}
