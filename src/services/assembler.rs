use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    db::ItemStore,
    error::{AppError, AppResult},
    models::{MissingSlots, Occasion, Outfit, Slot, WardrobeItem},
    services::sampler,
};

/// Builds one outfit from an owner's items.
///
/// With an occasion, only items tagged with exactly that occasion are
/// considered. Accessories are never part of an outfit. Every slot must have
/// at least one candidate, otherwise the missing slots are reported.
pub fn assemble<R: Rng>(
    items: &[WardrobeItem],
    occasion: Option<Occasion>,
    today: NaiveDate,
    rng: &mut R,
) -> AppResult<Outfit> {
    let pool: Vec<&WardrobeItem> = items
        .iter()
        .filter(|item| occasion.is_none() || item.occasion == occasion)
        .collect();

    let partitions: Vec<(Slot, Vec<&WardrobeItem>)> = Slot::ALL
        .iter()
        .map(|&slot| {
            let candidates = pool
                .iter()
                .copied()
                .filter(|item| item.category.slot() == Some(slot))
                .collect();
            (slot, candidates)
        })
        .collect();

    let mut missing = MissingSlots::default();
    for (slot, candidates) in &partitions {
        if candidates.is_empty() {
            missing.mark(*slot);
        }
    }
    if missing.any() {
        return Err(AppError::InsufficientWardrobe(missing));
    }

    let mut chosen = Vec::with_capacity(partitions.len());
    for (_, candidates) in &partitions {
        let item: &&WardrobeItem = sampler::pick(candidates, today, rng)?;
        chosen.push((*item).clone());
    }

    Ok(Outfit::new(chosen, occasion))
}

/// Generates recommendations from the item store
#[derive(Clone)]
pub struct Recommender {
    store: Arc<dyn ItemStore>,
}

impl Recommender {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Loads the owner's eligible pool and samples one outfit from it
    pub async fn generate(&self, owner_id: Uuid, occasion: Option<Occasion>) -> AppResult<Outfit> {
        let items = self.store.list_items(owner_id, occasion).await?;
        let today = Utc::now().date_naive();

        let outfit = assemble(&items, occasion, today, &mut rand::rng()).inspect_err(|e| {
            if let AppError::InsufficientWardrobe(missing) = e {
                tracing::info!(
                    owner_id = %owner_id,
                    occasion = ?occasion,
                    missing = %missing,
                    "Wardrobe cannot fill every outfit slot"
                );
            }
        })?;

        tracing::debug!(
            owner_id = %owner_id,
            outfit_id = %outfit.id,
            pool_size = items.len(),
            "Outfit generated"
        );

        Ok(outfit)
    }
}
