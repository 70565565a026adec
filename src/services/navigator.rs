use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{AcceptOutcome, Direction, GenerationFailure, HistoryView, Occasion, Outfit, WearFailure},
    services::assembler::Recommender,
};

/// Outcome of trying to move forward through history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
    /// The cursor moved onto an outfit already in history
    Replayed,
    /// The cursor is on the newest outfit (or history is empty); a new one is needed
    Frontier,
}

/// Append-only list of generated outfits with a cursor.
///
/// While non-empty the cursor is always a valid index, and appending moves it
/// to the newest entry.
#[derive(Debug, Clone, Default)]
pub struct OutfitHistory {
    outfits: Vec<Outfit>,
    cursor: usize,
}

impl OutfitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Outfit> {
        self.outfits.get(self.cursor)
    }

    pub fn view(&self) -> Option<HistoryView> {
        self.current().map(|outfit| HistoryView {
            outfit: outfit.clone(),
            index: self.cursor,
            total: self.outfits.len(),
        })
    }

    pub fn push(&mut self, outfit: Outfit) {
        self.outfits.push(outfit);
        self.cursor = self.outfits.len() - 1;
    }

    pub fn clear(&mut self) {
        self.outfits.clear();
        self.cursor = 0;
    }

    /// Steps back one outfit. Returns false at the start, where nothing changes.
    pub fn step_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn step_forward(&mut self) -> Forward {
        if self.cursor + 1 < self.outfits.len() {
            self.cursor += 1;
            Forward::Replayed
        } else {
            Forward::Frontier
        }
    }

    /// Drops every outfit after the cursor
    pub fn truncate_after_cursor(&mut self) {
        if !self.outfits.is_empty() {
            self.outfits.truncate(self.cursor + 1);
        }
    }
}

/// One browsing session's walk through recommendations.
///
/// Going back only replays history. Going forward replays until the newest
/// outfit, after which it asks the recommender for a fresh one.
#[derive(Debug, Clone)]
pub struct OutfitNavigator {
    owner_id: Uuid,
    occasion: Option<Occasion>,
    history: OutfitHistory,
    /// Accepted outfit whose wears are logged but which has no follow-up yet
    awaiting_next: Option<Uuid>,
}

impl OutfitNavigator {
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            occasion: None,
            history: OutfitHistory::new(),
            awaiting_next: None,
        }
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn occasion(&self) -> Option<Occasion> {
        self.occasion
    }

    pub fn history(&self) -> &OutfitHistory {
        &self.history
    }

    pub fn view(&self) -> AppResult<HistoryView> {
        self.history.view().ok_or(AppError::NoCurrentOutfit)
    }

    /// Back to the neutral state: no occasion, no history
    pub fn reset(&mut self) {
        self.occasion = None;
        self.history.clear();
        self.awaiting_next = None;
    }

    /// Switches occasion, discarding history, and generates the first outfit.
    ///
    /// If generation fails the history stays empty.
    pub async fn select_occasion(
        &mut self,
        recommender: &Recommender,
        occasion: Option<Occasion>,
    ) -> AppResult<HistoryView> {
        self.history.clear();
        self.awaiting_next = None;
        self.occasion = occasion;
        self.request_new(recommender).await
    }

    /// Generates an outfit and appends it. On failure nothing changes.
    pub async fn request_new(&mut self, recommender: &Recommender) -> AppResult<HistoryView> {
        let outfit = recommender.generate(self.owner_id, self.occasion).await?;
        self.history.push(outfit);
        self.awaiting_next = None;
        self.view()
    }

    pub async fn navigate(
        &mut self,
        recommender: &Recommender,
        direction: Direction,
    ) -> AppResult<HistoryView> {
        match direction {
            Direction::Prev => {
                self.history.step_back();
                self.view()
            }
            Direction::Next => match self.history.step_forward() {
                Forward::Replayed => self.view(),
                Forward::Frontier => self.request_new(recommender).await,
            },
        }
    }

    /// Logs a wear for every item in the current outfit, then moves on to a
    /// brand-new outfit.
    ///
    /// Wears are best-effort: each item is attempted and failures are reported
    /// in the outcome. Only when every wear fails does the call fail, leaving
    /// history untouched. Outfits after the accepted one were sampled with the
    /// old wear counts, so they are dropped before generating.
    ///
    /// Once a wear is logged the call succeeds even if generation fails. The
    /// outfit is then remembered, so accepting it again only retries the
    /// generation and never logs the same wears twice.
    pub async fn accept_current(&mut self, recommender: &Recommender) -> AppResult<AcceptOutcome> {
        let outfit = self
            .history
            .current()
            .cloned()
            .ok_or(AppError::NoCurrentOutfit)?;

        let mut worn = Vec::with_capacity(outfit.items.len());
        let mut failed = Vec::new();

        if self.awaiting_next == Some(outfit.id) {
            tracing::debug!(
                owner_id = %self.owner_id,
                outfit_id = %outfit.id,
                "Outfit already accepted, retrying generation only"
            );
        } else {
            let mut last_error = None;

            for item in &outfit.items {
                match recommender.store().record_wear(self.owner_id, item.id).await {
                    Ok(updated) => worn.push(updated),
                    Err(e) => {
                        tracing::warn!(
                            owner_id = %self.owner_id,
                            item_id = %item.id,
                            error = %e,
                            "Failed to log wear"
                        );
                        failed.push(WearFailure {
                            item_id: item.id,
                            error: e.to_string(),
                        });
                        last_error = Some(e);
                    }
                }
            }

            if worn.is_empty() {
                if let Some(e) = last_error {
                    return Err(e);
                }
            }

            tracing::info!(
                owner_id = %self.owner_id,
                outfit_id = %outfit.id,
                worn = worn.len(),
                failed = failed.len(),
                "Outfit accepted"
            );

            self.history.truncate_after_cursor();
            self.awaiting_next = Some(outfit.id);
        }

        match self.request_new(recommender).await {
            Ok(next) => Ok(AcceptOutcome {
                worn,
                failed,
                next: Some(next),
                next_error: None,
            }),
            Err(e) => {
                tracing::warn!(
                    owner_id = %self.owner_id,
                    outfit_id = %outfit.id,
                    error = %e,
                    "Accepted outfit but could not generate the next one"
                );
                Ok(AcceptOutcome {
                    worn,
                    failed,
                    next: None,
                    next_error: Some(GenerationFailure::from(&e)),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ItemStore, MemoryItemStore, MockItemStore};
    use crate::models::{Category, WardrobeItem};
    use crate::services::assembler::tests::item;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn stocked_store(owner: Uuid, occasion: Option<Occasion>) -> Arc<MemoryItemStore> {
        let store = Arc::new(MemoryItemStore::new());
        for (name, category) in [
            ("Tee", Category::Top),
            ("Polo", Category::Top),
            ("Jeans", Category::Bottom),
            ("Shorts", Category::Bottom),
            ("Sneakers", Category::Shoes),
        ] {
            let mut item = item(name, category, occasion);
            item.owner_id = owner;
            store.insert(item).await;
        }
        store
    }

    async fn navigator_with_store() -> (OutfitNavigator, Recommender, Arc<MemoryItemStore>) {
        let owner = Uuid::new_v4();
        let store = stocked_store(owner, Some(Occasion::Casual)).await;
        let recommender = Recommender::new(store.clone());
        (OutfitNavigator::new(owner), recommender, store)
    }

    #[tokio::test]
    async fn test_select_occasion_starts_fresh_history() {
        let (mut nav, recommender, _) = navigator_with_store().await;

        let view = nav
            .select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();
        assert_eq!((view.index, view.total), (0, 1));

        nav.request_new(&recommender).await.unwrap();
        assert_eq!(nav.history().len(), 2);

        nav.select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.history().cursor(), 0);
    }

    #[tokio::test]
    async fn test_select_occasion_without_items_leaves_history_empty() {
        let (mut nav, recommender, _) = navigator_with_store().await;
        nav.select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();

        let err = nav
            .select_occasion(&recommender, Some(Occasion::Formal))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientWardrobe(_)));
        assert!(nav.history().is_empty());
        assert_eq!(nav.occasion(), Some(Occasion::Formal));
    }

    #[tokio::test]
    async fn test_prev_at_start_is_noop() {
        let (mut nav, recommender, _) = navigator_with_store().await;
        let first = nav
            .select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();

        let view = nav.navigate(&recommender, Direction::Prev).await.unwrap();
        assert_eq!(view, first);
        assert_eq!(nav.history().len(), 1);
    }

    #[tokio::test]
    async fn test_prev_on_empty_history_reports_no_outfit() {
        let (mut nav, recommender, _) = navigator_with_store().await;
        let err = nav.navigate(&recommender, Direction::Prev).await.unwrap_err();
        assert!(matches!(err, AppError::NoCurrentOutfit));
    }

    #[tokio::test]
    async fn test_next_replays_history_without_resampling() {
        let (mut nav, recommender, _) = navigator_with_store().await;
        nav.select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();
        let second = nav.request_new(&recommender).await.unwrap();
        let third = nav.request_new(&recommender).await.unwrap();

        nav.navigate(&recommender, Direction::Prev).await.unwrap();
        nav.navigate(&recommender, Direction::Prev).await.unwrap();
        assert_eq!(nav.history().cursor(), 0);

        let replayed = nav.navigate(&recommender, Direction::Next).await.unwrap();
        assert_eq!(replayed.outfit, second.outfit);
        assert_eq!(replayed.index, 1);

        let replayed = nav.navigate(&recommender, Direction::Next).await.unwrap();
        assert_eq!(replayed.outfit, third.outfit);
        assert_eq!(nav.history().len(), 3);
    }

    #[tokio::test]
    async fn test_next_at_frontier_generates_exactly_one() {
        let (mut nav, recommender, _) = navigator_with_store().await;
        let first = nav
            .select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();

        let view = nav.navigate(&recommender, Direction::Next).await.unwrap();
        assert_eq!((view.index, view.total), (1, 2));
        assert_ne!(view.outfit.id, first.outfit.id);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_cursor() {
        let owner = Uuid::new_v4();
        let store = stocked_store(owner, Some(Occasion::Casual)).await;
        let recommender = Recommender::new(store.clone());
        let mut nav = OutfitNavigator::new(owner);
        nav.select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();

        // Empty the shoe rack so the next generation cannot succeed
        for item in store.list_items(owner, None).await.unwrap() {
            if item.category == Category::Shoes {
                store.delete_item(owner, item.id).await.unwrap();
            }
        }

        let err = nav.navigate(&recommender, Direction::Next).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientWardrobe(m) if m.shoes && !m.tops));
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.history().cursor(), 0);
    }

    #[tokio::test]
    async fn test_accept_logs_wear_and_moves_to_new_outfit() {
        let (mut nav, recommender, store) = navigator_with_store().await;
        nav.select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();
        nav.request_new(&recommender).await.unwrap();
        nav.request_new(&recommender).await.unwrap();
        nav.navigate(&recommender, Direction::Prev).await.unwrap();
        nav.navigate(&recommender, Direction::Prev).await.unwrap();

        let accepted = nav.view().unwrap().outfit;
        let before: Vec<WardrobeItem> = store.list_items(nav.owner_id(), None).await.unwrap();

        let outcome = nav.accept_current(&recommender).await.unwrap();
        assert!(outcome.failed.is_empty());
        assert_eq!(outcome.worn.len(), 3);

        let today = Utc::now().date_naive();
        for item in &accepted.items {
            let previous = before.iter().find(|b| b.id == item.id).unwrap();
            let now = store.get_item(nav.owner_id(), item.id).await.unwrap();
            assert_eq!(now.wear_count, previous.wear_count + 1);
            assert_eq!(now.last_worn_date, Some(today));
        }

        // Stale outfits after the accepted one are gone; the cursor sits on a new one
        let next = outcome.next.unwrap();
        assert_eq!(next.index, 1);
        assert_eq!(next.total, 2);
        assert_eq!(nav.history().len(), 2);
        assert!(nav.history().current().unwrap().created_at >= accepted.created_at);
        assert_ne!(next.outfit.id, accepted.id);
    }

    #[tokio::test]
    async fn test_accept_with_empty_history() {
        let (mut nav, recommender, _) = navigator_with_store().await;
        let err = nav.accept_current(&recommender).await.unwrap_err();
        assert!(matches!(err, AppError::NoCurrentOutfit));
    }

    fn outfit_items(owner: Uuid) -> Vec<WardrobeItem> {
        [Category::Top, Category::Bottom, Category::Shoes]
            .into_iter()
            .map(|category| {
                let mut item = item("piece", category, None);
                item.owner_id = owner;
                item
            })
            .collect()
    }

    #[tokio::test]
    async fn test_accept_is_best_effort_on_partial_failure() {
        let owner = Uuid::new_v4();
        let items = outfit_items(owner);
        let failing_id = items[1].id;

        let mut store = MockItemStore::new();
        let pool = items.clone();
        store
            .expect_list_items()
            .returning(move |_, _| Ok(pool.clone()));
        let worn_source = items.clone();
        store.expect_record_wear().times(3).returning(move |_, item_id| {
            if item_id == failing_id {
                return Err(AppError::NotFound(format!("Wardrobe item {}", item_id)));
            }
            let mut item = worn_source.iter().find(|i| i.id == item_id).unwrap().clone();
            item.record_wear(Utc::now().date_naive());
            Ok(item)
        });

        let recommender = Recommender::new(Arc::new(store));
        let mut nav = OutfitNavigator::new(owner);
        nav.select_occasion(&recommender, None).await.unwrap();

        let outcome = nav.accept_current(&recommender).await.unwrap();
        assert_eq!(outcome.worn.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].item_id, failing_id);
        assert_eq!(outcome.next.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_accept_fails_without_state_change_when_every_wear_fails() {
        let owner = Uuid::new_v4();
        let items = outfit_items(owner);

        let mut store = MockItemStore::new();
        store
            .expect_list_items()
            .times(1)
            .returning(move |_, _| Ok(items.clone()));
        store
            .expect_record_wear()
            .times(3)
            .returning(|_, _| Err(AppError::Storage("connection refused".to_string())));

        let recommender = Recommender::new(Arc::new(store));
        let mut nav = OutfitNavigator::new(owner);
        let before = nav.select_occasion(&recommender, None).await.unwrap();

        let err = nav.accept_current(&recommender).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(nav.view().unwrap(), before);
    }

    #[tokio::test]
    async fn test_accept_survives_generation_failure_without_double_logging() {
        let owner = Uuid::new_v4();
        let items = outfit_items(owner);

        let mut store = MockItemStore::new();
        // The first load succeeds, the next two hit a storage outage
        let loads = Arc::new(AtomicUsize::new(0));
        let pool = items.clone();
        store.expect_list_items().returning(move |_, _| {
            match loads.fetch_add(1, Ordering::SeqCst) {
                1 | 2 => Err(AppError::Storage("connection reset".to_string())),
                _ => Ok(pool.clone()),
            }
        });
        let worn_source = items.clone();
        store.expect_record_wear().times(3).returning(move |_, item_id| {
            let mut item = worn_source.iter().find(|i| i.id == item_id).unwrap().clone();
            item.record_wear(Utc::now().date_naive());
            Ok(item)
        });

        let recommender = Recommender::new(Arc::new(store));
        let mut nav = OutfitNavigator::new(owner);
        let accepted = nav.select_occasion(&recommender, None).await.unwrap();

        let outcome = nav.accept_current(&recommender).await.unwrap();
        assert_eq!(outcome.worn.len(), 3);
        assert!(outcome.next.is_none());
        assert_eq!(outcome.next_error.unwrap().code, "storage_unavailable");
        assert_eq!(nav.view().unwrap(), accepted);

        // Retrying does not log the wears a second time
        let retry = nav.accept_current(&recommender).await.unwrap();
        assert!(retry.worn.is_empty());
        assert!(retry.next.is_none());

        let recovered = nav.accept_current(&recommender).await.unwrap();
        assert!(recovered.worn.is_empty());
        let next = recovered.next.unwrap();
        assert_eq!((next.index, next.total), (1, 2));
    }

    #[tokio::test]
    async fn test_accepting_a_new_outfit_logs_wears_again() {
        let (mut nav, recommender, store) = navigator_with_store().await;
        nav.select_occasion(&recommender, Some(Occasion::Casual))
            .await
            .unwrap();

        nav.accept_current(&recommender).await.unwrap();
        let second = nav.accept_current(&recommender).await.unwrap();
        assert_eq!(second.worn.len(), 3);

        let total: u32 = store
            .list_items(nav.owner_id(), None)
            .await
            .unwrap()
            .iter()
            .map(|item| item.wear_count)
            .sum();
        assert_eq!(total, 6);
    }
}
