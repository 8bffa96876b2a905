//! Risk Engine Service
//!
//! Maintains, per session, a risk-checked ledger of resting orders,
//! trades, and derived exposure for a set of financial instruments.
//!
//! **Key invariants:**
//! - Exposure scalars are always a pure function of current map
//!   contents, recomputed from scratch after every mutation
//! - Every mutating call either fully applies or fully rolls back;
//!   a rejected call leaves state identical to before the call
//! - Limits are exclusive upper bounds: exposure equal to the limit
//!   is already a breach

pub mod config;
pub mod errors;
pub mod instrument;
pub mod store;

pub use config::{RiskLimits, TradeSignConvention};
pub use errors::{DispatchError, RiskError};
pub use instrument::Instrument;
pub use store::{OrderStore, Response};
