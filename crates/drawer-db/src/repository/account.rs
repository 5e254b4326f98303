//! # Account Repository
//!
//! Tier and payment-customer link per signed-in user. Only signup and
//! billing events write here; document saves never touch the tier.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use drawer_core::Tier;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AccountRecord {
    pub user_id: String,
    /// Raw tier name as stored.
    pub tier: String,
    pub customer_id: Option<String>,
    pub upgraded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    /// Parsed tier. A name we do not recognize is treated as guest, which
    /// has the smallest capacity.
    pub fn tier(&self) -> Tier {
        self.tier.parse().unwrap_or(Tier::Guest)
    }
}

#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    pub async fn get(&self, user_id: &str) -> DbResult<Option<AccountRecord>> {
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT user_id, tier, customer_id, upgraded_at, created_at, updated_at
            FROM accounts
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn require(&self, user_id: &str) -> DbResult<AccountRecord> {
        self.get(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Account", user_id))
    }

    /// Creates the account on the `user` tier if it does not exist yet.
    ///
    /// Returns the account and whether it was just created.
    pub async fn ensure_account(&self, user_id: &str) -> DbResult<(AccountRecord, bool)> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO accounts (user_id, tier, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(user_id)
        .bind(Tier::User.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() > 0;
        if created {
            info!(user_id = %user_id, "Account created");
        }
        Ok((self.require(user_id).await?, created))
    }

    /// Writes a new tier, creating the account if needed.
    ///
    /// `upgraded_at` is stamped whenever the tier becomes supporter.
    pub async fn set_tier(&self, user_id: &str, tier: Tier) -> DbResult<AccountRecord> {
        let now = Utc::now();
        let upgraded_at = (tier == Tier::Supporter).then_some(now);

        sqlx::query(
            r#"
            INSERT INTO accounts (user_id, tier, upgraded_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                tier = excluded.tier,
                upgraded_at = COALESCE(excluded.upgraded_at, accounts.upgraded_at),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(tier.as_str())
        .bind(upgraded_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user_id, tier = %tier, "Tier written");
        self.require(user_id).await
    }

    /// Associates a payment-provider customer with `user_id`.
    ///
    /// Fails with `UniqueViolation` if the customer belongs to someone else.
    pub async fn link_customer(&self, user_id: &str, customer_id: &str) -> DbResult<()> {
        if let Some(owner) = self.find_by_customer(customer_id).await? {
            if owner.user_id != user_id {
                return Err(DbError::duplicate("customer_id", customer_id));
            }
        }

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO accounts (user_id, tier, customer_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                customer_id = excluded.customer_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(Tier::User.as_str())
        .bind(customer_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(user_id = %user_id, customer_id = %customer_id, "Linked payment customer");
        Ok(())
    }

    pub async fn find_by_customer(&self, customer_id: &str) -> DbResult<Option<AccountRecord>> {
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT user_id, tier, customer_id, upgraded_at, created_at, updated_at
            FROM accounts
            WHERE customer_id = ?1
            LIMIT 1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Deletes the account row. Returns whether one existed.
    pub async fn delete(&self, user_id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
