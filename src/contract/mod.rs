//! Forward contract terms and analysis inputs

mod data;

pub use data::{ContractInputs, ContractTerms, RatePolicy, Tenor, TransactionType};
