use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select,
};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::entities::{one_off_transaction, recurring_transaction};
use crate::transaction::{OneOffTransaction, OwnerId, RecurringRule};

/// Errors raised while reading the owner-scoped snapshot.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Owner-scoped read access to the transactions a projection needs.
///
/// Implementations return a snapshot; the caller never filters by owner itself.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// All one-off transactions owned by `owner` dated on or after `from`.
    async fn one_offs_from(
        &self,
        owner: OwnerId,
        from: NaiveDate,
    ) -> Result<Vec<OneOffTransaction>, RepositoryError>;

    /// All recurring rules owned by `owner` that have not ended before `as_of`.
    async fn active_rules(
        &self,
        owner: OwnerId,
        as_of: NaiveDate,
    ) -> Result<Vec<RecurringRule>, RepositoryError>;
}

/// One-offs owned by `owner` dated on or after `from`, ordered by date then id.
pub fn select_upcoming_one_offs(owner: OwnerId, from: NaiveDate) -> Select<one_off_transaction::Entity> {
    one_off_transaction::Entity::find()
        .filter(one_off_transaction::Column::OwnerId.eq(owner))
        .filter(one_off_transaction::Column::Date.gte(from))
        .order_by_asc(one_off_transaction::Column::Date)
        .order_by_asc(one_off_transaction::Column::Id)
}

/// Rules owned by `owner` with no end date or ending on or after `as_of`, ordered by id.
pub fn select_active_rules(owner: OwnerId, as_of: NaiveDate) -> Select<recurring_transaction::Entity> {
    recurring_transaction::Entity::find()
        .filter(recurring_transaction::Column::OwnerId.eq(owner))
        .filter(
            Condition::any()
                .add(recurring_transaction::Column::EndDate.is_null())
                .add(recurring_transaction::Column::EndDate.gte(as_of)),
        )
        .order_by_asc(recurring_transaction::Column::Id)
}

/// Repository backed by the sea-orm entities.
#[derive(Debug, Clone)]
pub struct DbRepository {
    db: DatabaseConnection,
}

impl DbRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for DbRepository {
    #[instrument(skip(self))]
    async fn one_offs_from(
        &self,
        owner: OwnerId,
        from: NaiveDate,
    ) -> Result<Vec<OneOffTransaction>, RepositoryError> {
        let models = select_upcoming_one_offs(owner, from).all(&self.db).await?;

        debug!("Loaded {} one-off transactions for owner {}", models.len(), owner);
        Ok(models.into_iter().map(OneOffTransaction::from).collect())
    }

    #[instrument(skip(self))]
    async fn active_rules(
        &self,
        owner: OwnerId,
        as_of: NaiveDate,
    ) -> Result<Vec<RecurringRule>, RepositoryError> {
        let models = select_active_rules(owner, as_of).all(&self.db).await?;

        debug!("Loaded {} active recurring rules for owner {}", models.len(), owner);
        Ok(models.into_iter().map(RecurringRule::from).collect())
    }
}

/// Repository over plain vectors, used for scenario files and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    one_offs: Vec<OneOffTransaction>,
    rules: Vec<RecurringRule>,
}

impl InMemoryRepository {
    pub fn new(one_offs: Vec<OneOffTransaction>, rules: Vec<RecurringRule>) -> Self {
        Self { one_offs, rules }
    }
}

#[async_trait]
impl TransactionRepository for InMemoryRepository {
    async fn one_offs_from(
        &self,
        owner: OwnerId,
        from: NaiveDate,
    ) -> Result<Vec<OneOffTransaction>, RepositoryError> {
        Ok(self
            .one_offs
            .iter()
            .filter(|t| t.owner() == owner && t.date() >= from)
            .cloned()
            .collect())
    }

    async fn active_rules(
        &self,
        owner: OwnerId,
        as_of: NaiveDate,
    ) -> Result<Vec<RecurringRule>, RepositoryError> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.owner() == owner && r.is_active_on(as_of))
            .cloned()
            .collect())
    }
}
