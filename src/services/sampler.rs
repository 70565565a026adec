use chrono::NaiveDate;
use rand::Rng;
use thiserror::Error;

use crate::models::WardrobeItem;

/// Days assumed for an item that has never been worn
pub const NEVER_WORN_DAYS: i64 = 30;

/// Each recorded wear shrinks an item's weight by this fraction of its base
const WEAR_PENALTY: f64 = 0.1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplerError {
    #[error("Sampler called with an empty candidate pool")]
    EmptyPool,
}

/// Wear statistics the sampler weights candidates by
pub trait WearStats {
    fn wear_count(&self) -> u32;
    fn last_worn_date(&self) -> Option<NaiveDate>;
}

impl WearStats for WardrobeItem {
    fn wear_count(&self) -> u32 {
        self.wear_count
    }

    fn last_worn_date(&self) -> Option<NaiveDate> {
        self.last_worn_date
    }
}

impl<T: WearStats> WearStats for &T {
    fn wear_count(&self) -> u32 {
        (*self).wear_count()
    }

    fn last_worn_date(&self) -> Option<NaiveDate> {
        (*self).last_worn_date()
    }
}

/// Whole days since the item was last worn, never less than 1
pub fn days_since_worn(last_worn: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match last_worn {
        None => NEVER_WORN_DAYS,
        Some(date) => (today - date).num_days().max(1),
    }
}

/// Selection weight: long idle time raises it, a high lifetime wear count lowers it
pub fn weight<T: WearStats>(item: &T, today: NaiveDate) -> f64 {
    let days = days_since_worn(item.last_worn_date(), today).max(1) as f64;
    days / (1.0 + item.wear_count() as f64 * WEAR_PENALTY)
}

/// Walks the cumulative weights with a draw in `[0, total)`.
///
/// Falls back to the last index if float drift lets the draw outlive the walk.
fn walk(weights: &[f64], mut draw: f64) -> usize {
    for (idx, w) in weights.iter().enumerate() {
        draw -= w;
        if draw <= 0.0 {
            return idx;
        }
    }
    weights.len() - 1
}

/// Picks one candidate, favoring items that have rested longer and been worn less.
pub fn pick<'a, T, R>(candidates: &'a [T], today: NaiveDate, rng: &mut R) -> Result<&'a T, SamplerError>
where
    T: WearStats,
    R: Rng,
{
    if candidates.is_empty() {
        return Err(SamplerError::EmptyPool);
    }

    let weights: Vec<f64> = candidates.iter().map(|c| weight(c, today)).collect();
    let total: f64 = weights.iter().sum();
    let draw = rng.random::<f64>() * total;

    Ok(&candidates[walk(&weights, draw)])
}
