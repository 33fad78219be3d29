//! Identifiers for scenario objects
//!
//! Scenarios are authored by hand, so every id is a string chosen by the
//! author. Each object kind has its own id type so a frequency id can never be
//! passed where an account id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier for a Frequency (payment schedule)
    FrequencyId
);
string_id!(
    /// Identifier for a cash-flow source (estimator) or a historical feed
    SourceId
);
string_id!(
    /// Identifier for a person, company or government body
    EntityId
);
string_id!(
    /// Identifier for a Job
    JobId
);
string_id!(
    /// Identifier for an account that receives cash flows (a sink)
    AccountId
);
string_id!(
    /// Identifier for a traded security
    SecurityId
);
string_id!(
    /// Identifier for a progressive tax table
    TaxTableId
);
