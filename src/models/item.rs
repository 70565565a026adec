use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Occasion};
use crate::error::{AppError, AppResult};

const MAX_NAME_LEN: usize = 120;
const MAX_IMAGE_URL_LEN: usize = 2048;

/// A single garment owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub category: Category,
    pub sub_category: Option<String>,
    pub color: Option<String>,
    pub occasion: Option<Occasion>,
    /// Where the item's photo lives; the service only stores the reference
    pub image_url: Option<String>,
    pub wear_count: u32,
    pub last_worn_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl WardrobeItem {
    /// Builds a fresh, never-worn item from a validated draft
    pub fn from_draft(owner_id: Uuid, draft: ItemDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: draft.name,
            category: draft.category,
            sub_category: draft.sub_category,
            color: draft.color,
            occasion: draft.occasion,
            image_url: draft.image_url,
            wear_count: 0,
            last_worn_date: None,
            created_at: Utc::now(),
        }
    }

    /// Replaces the editable attributes, leaving wear statistics alone
    pub fn apply(&mut self, draft: ItemDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.sub_category = draft.sub_category;
        self.color = draft.color;
        self.occasion = draft.occasion;
        self.image_url = draft.image_url;
    }

    pub fn record_wear(&mut self, worn_on: NaiveDate) {
        self.wear_count = self.wear_count.saturating_add(1);
        self.last_worn_date = Some(worn_on);
    }

    pub fn undo_wear(&mut self) {
        self.wear_count = self.wear_count.saturating_sub(1);
    }

    pub fn color_matches(&self, color: &str) -> bool {
        self.color
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(color.trim()))
    }
}

/// Editable attributes of an item, used for both intake and edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub occasion: Option<Occasion>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ItemDraft {
    /// Trims free-text fields and rejects empty or oversized names
    pub fn validate(mut self) -> AppResult<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::InvalidInput("Item name is required".to_string()));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "Item name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }

        self.sub_category = normalize(self.sub_category);
        self.color = normalize(self.color);
        self.image_url = normalize(self.image_url);
        if self
            .image_url
            .as_ref()
            .is_some_and(|url| url.len() > MAX_IMAGE_URL_LEN)
        {
            return Err(AppError::InvalidInput(format!(
                "Image URL must be at most {} bytes",
                MAX_IMAGE_URL_LEN
            )));
        }
        Ok(self)
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query filters for listing a wardrobe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    pub occasion: Option<Occasion>,
    pub category: Option<Category>,
    pub color: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, item: &WardrobeItem) -> bool {
        if let Some(occasion) = self.occasion {
            if item.occasion != Some(occasion) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        match &self.color {
            Some(color) => item.color_matches(color),
            None => true,
        }
    }
}
