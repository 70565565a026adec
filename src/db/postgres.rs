use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use super::{item_not_found, ItemStore};
use crate::{
    error::{AppError, AppResult},
    models::{Category, ItemDraft, Occasion, WardrobeItem},
};

const ITEM_COLUMNS: &str = "id, owner_id, name, category, sub_category, color, occasion, \
                            image_url, wear_count, last_worn_date, created_at";

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Raw `wardrobe_items` row; enums are stored as text
#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    category: String,
    sub_category: Option<String>,
    color: Option<String>,
    occasion: Option<String>,
    image_url: Option<String>,
    wear_count: i32,
    last_worn_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for WardrobeItem {
    type Error = AppError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(AppError::Internal)?;
        let occasion = row
            .occasion
            .as_deref()
            .map(str::parse::<Occasion>)
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(WardrobeItem {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            category,
            sub_category: row.sub_category,
            color: row.color,
            occasion,
            image_url: row.image_url,
            wear_count: row.wear_count.max(0) as u32,
            last_worn_date: row.last_worn_date,
            created_at: row.created_at,
        })
    }
}

/// Postgres-backed item store
#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ItemStore for PgItemStore {
    async fn list_items(&self, owner_id: Uuid, occasion: Option<Occasion>) -> AppResult<Vec<WardrobeItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM wardrobe_items
            WHERE owner_id = $1 AND ($2::text IS NULL OR occasion = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .bind(occasion.map(|o| o.as_str()))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(owner_id = %owner_id, count = rows.len(), "Loaded wardrobe items");

        rows.into_iter().map(WardrobeItem::try_from).collect()
    }

    async fn get_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem> {
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM wardrobe_items WHERE id = $1 AND owner_id = $2"
        ))
        .bind(item_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| item_not_found(item_id))?.try_into()
    }

    async fn create_item(&self, owner_id: Uuid, draft: ItemDraft) -> AppResult<WardrobeItem> {
        let item = WardrobeItem::from_draft(owner_id, draft);

        sqlx::query(
            r#"
            INSERT INTO wardrobe_items
                (id, owner_id, name, category, sub_category, color, occasion, image_url,
                 wear_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9)
            "#,
        )
        .bind(item.id)
        .bind(item.owner_id)
        .bind(&item.name)
        .bind(item.category.as_str())
        .bind(item.sub_category.as_deref())
        .bind(item.color.as_deref())
        .bind(item.occasion.map(|o| o.as_str()))
        .bind(item.image_url.as_deref())
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(item_id = %item.id, category = %item.category, "Wardrobe item created");

        Ok(item)
    }

    async fn update_item(&self, owner_id: Uuid, item_id: Uuid, draft: ItemDraft) -> AppResult<WardrobeItem> {
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE wardrobe_items
            SET name = $3, category = $4, sub_category = $5, color = $6, occasion = $7,
                image_url = $8
            WHERE id = $1 AND owner_id = $2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(owner_id)
        .bind(&draft.name)
        .bind(draft.category.as_str())
        .bind(draft.sub_category.as_deref())
        .bind(draft.color.as_deref())
        .bind(draft.occasion.map(|o| o.as_str()))
        .bind(draft.image_url.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| item_not_found(item_id))?.try_into()
    }

    async fn delete_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM wardrobe_items WHERE id = $1 AND owner_id = $2")
            .bind(item_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(item_not_found(item_id));
        }
        Ok(())
    }

    async fn record_wear(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem> {
        // Single-statement increment so concurrent sessions never lose a wear
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE wardrobe_items
            SET wear_count = wear_count + 1, last_worn_date = $3
            WHERE id = $1 AND owner_id = $2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(owner_id)
        .bind(Utc::now().date_naive())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| item_not_found(item_id))?.try_into()
    }

    async fn undo_wear(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem> {
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE wardrobe_items
            SET wear_count = GREATEST(0, wear_count - 1)
            WHERE id = $1 AND owner_id = $2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| item_not_found(item_id))?.try_into()
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
