mod assumptions;
mod balance;
mod entities;
mod frequency;
mod ids;
mod instance;
mod pass;
mod sources;
mod tax;

pub use assumptions::Assumptions;
pub use balance::{Balance, CashBalance, ShareBalance};
pub use entities::{Account, Entity, EntityKind, Holding, Job, Security};
pub use frequency::{ApportionmentPolicy, Frequency, Schedule, Vesting};
pub use ids::{AccountId, EntityId, FrequencyId, JobId, SecurityId, SourceId, TaxTableId};
pub use instance::{CashFlowInstance, InstanceDetail, ItemType};
pub use pass::Pass;
pub use sources::{AlimonyCapPolicy, SourceDefinition};
pub use tax::{TaxBracket, TaxTable, TaxYearTable};
