//! SpreadScope Common Types
//!
//! This crate contains the types shared by the conversion engine and the
//! spread presenter: asset symbols and rate tables, spread records, display
//! formatting, transport errors and the fixed client constants.

pub mod rates;
pub mod spread;
pub mod format;
pub mod error;
pub mod time;

pub use rates::*;
pub use spread::*;
pub use format::*;
pub use error::*;
pub use time::*;
