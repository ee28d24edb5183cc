//! Binary encoding of filter plans, so a tree built by the planner can be
//! shipped to scan workers or cached on disk.

use crate::expression::{Expression, FilterResult};
use std::fs;
use std::path::Path;

impl Expression {
    /// Encode this tree with bincode
    pub fn to_bytes(&self) -> FilterResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a tree produced by [`Expression::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> FilterResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Write an encoded plan to `path`, replacing any existing file
pub fn write_plan(path: impl AsRef<Path>, expr: &Expression) -> FilterResult<()> {
    let path = path.as_ref();
    let bytes = expr.to_bytes()?;
    fs::write(path, &bytes)?;
    log::debug!("Wrote {} byte plan to {}", bytes.len(), path.display());
    Ok(())
}

/// Read a plan written by [`write_plan`]
pub fn read_plan(path: impl AsRef<Path>) -> FilterResult<Expression> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let expr = Expression::from_bytes(&bytes)?;
    log::debug!("Loaded plan {} from {}", expr, path.display());
    Ok(expr)
}
