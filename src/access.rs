//! Row access layer.
//!
//! - **DataType**: the closed set of value kinds and their coercion ranks
//! - **Value**: raw typed column values
//! - **RowAccessor**: the capability leaf expressions pull column values from
//! - **Row**: an in-memory row, also parseable from delimited text

pub mod row;
pub mod value;

pub use row::{Row, RowAccessor};
pub use value::{parse_timestamp, DataType, Value};
