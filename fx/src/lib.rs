//! SpreadScope Conversion Engine
//!
//! Converts amounts between assets quoted against one implicit base currency.
//!
//! # Features
//!
//! - Sorted, duplicate-free asset lists with deterministic default selection
//! - Pair rates and conversions routed through the base currency
//! - Input validation with a fixed, stable error order
//! - A converter state container that drives the selector/amount views
//!
//! # Example
//!
//! ```rust
//! use spreadscope_common::{AssetSymbol, RateTable};
//! use spreadscope_fx::engine::{convert, pair_rate};
//!
//! let table = RateTable::new("USD")
//!     .with_rate("USD", 1.0)
//!     .with_rate("RUB", 95.0)
//!     .with_rate("EUR", 0.92);
//!
//! assert_eq!(pair_rate(&table, &"USD".into(), &"RUB".into()), Some(95.0));
//!
//! let eur = convert(&table, &AssetSymbol::rub(), &AssetSymbol::eur(), "9500").unwrap();
//! assert!((eur.value - 92.0).abs() < 1e-9);
//! ```

pub mod engine;
pub mod provider;
pub mod cache;
pub mod conversion;
pub mod converter;
pub mod error;

pub use engine::{convert, derive_asset_list, pair_rate, select_defaults};
pub use provider::{RateProvider, StaticRateProvider};
pub use cache::RateCache;
pub use conversion::{Conversion, ConversionResult, ConversionSelection};
pub use converter::{Converter, ConverterView, SelectorOptions};
pub use error::{ErrorKind, FxError};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
