//! Type coercion table.
//!
//! Pure functions mapping a raw token to a scalar [`Value`] of a requested
//! [`ScalarKind`]. Absence of a token is not an error here; deciding what a
//! missing value means is left to the binder.
//!
//! | Kind | Accepted text |
//! |---|---|
//! | `bool` | configured literals, default `true/yes/y/1`, `false/no/n/0` |
//! | `int8`..`int64`, `float32`, `float64` | Rust's invariant `FromStr` |
//! | `decimal` | `[-+]digits[.digits]` |
//! | `string` | anything, verbatim |
//! | `char` | exactly one character |
//! | `duration` | `[-][d.]hh:mm:ss[.fraction]` |
//! | `timestamp` | `YYYY-MM-DDTHH:MM:SS[.fraction]` |

mod convert;
mod decimal;
pub mod duration_text;
mod kind;
mod value;

pub use convert::{format_duration, parse_duration, ConversionError, TypeCoercion};
pub use decimal::{Decimal, ParseDecimalError, MAX_SCALE};
pub use kind::ScalarKind;
pub use value::{FromValue, ObjectValue, Value, TIMESTAMP_FORMAT};
