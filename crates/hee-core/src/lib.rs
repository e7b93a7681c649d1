//! Core of the Human Execution Engine: evidence log, node signature, cards,
//! and configuration resolution. The `hee` binary is a thin layer over this.

pub mod error;
pub mod config;

pub mod cards;
pub mod evidence;
pub mod signature;

pub use crate::cards::{Card, CardSource, CardStore};
pub use crate::config::{Config, Overrides};
pub use crate::error::{HeeError, Result};
pub use crate::evidence::{EvidenceLog, EvidenceMark};
pub use crate::signature::NodeSignature;
