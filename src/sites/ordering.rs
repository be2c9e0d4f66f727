//! Position assignment for the reorder mutation.
//!
//! The submitted id list is in display order, so the first id gets the highest
//! position: `position = len - 1 - index`.

use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionUpdate {
    pub id: i64,
    pub position: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// The same id appears more than once in the submitted list.
    #[error("website {0} appears more than once")]
    Duplicate(i64),
    /// One or more ids are not owned by the caller.
    #[error("websites not owned by caller: {0:?}")]
    NotOwned(Vec<i64>),
    /// More ids than positions can represent.
    #[error("too many websites to order: {0}")]
    TooMany(usize),
}

/// Map an id list (first = highest priority) to positions.
///
/// # Errors
/// Returns `OrderError::Duplicate` if an id repeats, or `OrderError::TooMany`
/// if the list is longer than `i32::MAX`.
pub fn assign_positions(ids: &[i64]) -> Result<Vec<PositionUpdate>, OrderError> {
    let len = i32::try_from(ids.len()).map_err(|_| OrderError::TooMany(ids.len()))?;
    let mut seen = HashSet::with_capacity(ids.len());
    let mut updates = Vec::with_capacity(ids.len());
    for (index, &id) in (0..len).zip(ids) {
        if !seen.insert(id) {
            return Err(OrderError::Duplicate(id));
        }
        updates.push(PositionUpdate {
            id,
            position: len - 1 - index,
        });
    }
    Ok(updates)
}

/// All-or-nothing ownership check.
///
/// # Errors
/// Returns `OrderError::NotOwned` listing every requested id missing from `owned`.
pub fn ensure_owned(requested: &[i64], owned: &HashSet<i64>) -> Result<(), OrderError> {
    let foreign: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|id| !owned.contains(id))
        .collect();
    if foreign.is_empty() {
        Ok(())
    } else {
        Err(OrderError::NotOwned(foreign))
    }
}
