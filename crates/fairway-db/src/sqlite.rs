//! `SQLite` storage backend.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time
//! checked) so builds never need a live database. All queries are
//! parameterized. The two tables are created idempotently on connect;
//! schema evolution is left to the host application.

use std::time::Duration;

use chrono::{DateTime, Utc};
use fairway_types::{CourseId, EventId, PlayerId, RoundId, ScoreCard};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::backend::{EventBackend, ScoreCardBackend};
use crate::changes::ChangeFeed;
use crate::error::DbError;
use crate::record::{EventRecord, RecordFilter};

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// URL of a private in-memory database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

const CREATE_EVENTS_TABLE: &str = r"CREATE TABLE IF NOT EXISTS round_events (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    round_id INTEGER NOT NULL,
    player_id INTEGER NOT NULL,
    event_type TEXT NOT NULL,
    timestamp_millis INTEGER NOT NULL,
    hole_number INTEGER,
    payload TEXT NOT NULL
)";

const CREATE_EVENTS_INDEX: &str = r"CREATE INDEX IF NOT EXISTS idx_round_events_round_time
    ON round_events (round_id, timestamp_millis, seq)";

const CREATE_SCORECARDS_TABLE: &str = r"CREATE TABLE IF NOT EXISTS score_cards (
    round_id INTEGER PRIMARY KEY,
    player_id INTEGER NOT NULL,
    course_id INTEGER NOT NULL,
    hole_scores TEXT NOT NULL,
    in_progress INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Connection URL, e.g. `sqlite://fairway.db` or [`IN_MEMORY_URL`].
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connection acquire timeout.
    pub connect_timeout: Duration,
}

impl SqliteConfig {
    /// Create a configuration from a database URL.
    ///
    /// An in-memory URL is pinned to a single connection, since every
    /// `SQLite` connection to `:memory:` opens its own empty database.
    pub fn new(url: &str) -> Self {
        let max_connections = if is_in_memory(url) {
            1
        } else {
            DEFAULT_MAX_CONNECTIONS
        };
        Self {
            url: url.to_owned(),
            max_connections,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// A private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_URL)
    }

    /// Set the maximum number of connections (ignored for in-memory URLs).
    #[must_use]
    pub fn with_max_connections(mut self, max: u32) -> Self {
        if !is_in_memory(&self.url) {
            self.max_connections = max;
        }
        self
    }

    /// Set the acquire timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Event and score card storage on a [`SqlitePool`].
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
    changes: ChangeFeed,
}

impl SqliteBackend {
    /// Open (creating if needed) the database and its tables.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed and
    /// [`DbError::Storage`] if the connection or table creation fails.
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DbError> {
        let connect_options: SqliteConnectOptions = config
            .url
            .parse()
            .map_err(|e: sqlx::Error| DbError::Config(format!("Invalid database URL: {e}")))?;

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout);
        if is_in_memory(&config.url) {
            // Closing the only connection would drop the whole database.
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options.create_if_missing(true))
            .await?;

        let backend = Self {
            pool,
            changes: ChangeFeed::new(),
        };
        backend.create_tables().await?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connected to SQLite"
        );
        Ok(backend)
    }

    /// Connect with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection fails.
    pub async fn connect_url(url: &str) -> Result<Self, DbError> {
        Self::connect(&SqliteConfig::new(url)).await
    }

    /// Borrow the underlying pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }

    async fn create_tables(&self) -> Result<(), DbError> {
        for statement in [CREATE_EVENTS_TABLE, CREATE_EVENTS_INDEX, CREATE_SCORECARDS_TABLE] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

impl EventBackend for SqliteBackend {
    async fn insert(&self, records: Vec<EventRecord>) -> Result<(), DbError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for record in &records {
            sqlx::query(
                r"INSERT INTO round_events (id, round_id, player_id, event_type, timestamp_millis, hole_number, payload)
                  VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(record.id.to_string())
            .bind(record.round_id.into_inner())
            .bind(record.player_id.into_inner())
            .bind(&record.event_type)
            .bind(record.timestamp_millis)
            .bind(record.hole_number.map(i64::from))
            .bind(&record.payload)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(count = records.len(), "Inserted event records");
        Ok(())
    }

    async fn query(&self, filter: &RecordFilter) -> Result<Vec<EventRecord>, DbError> {
        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, round_id, player_id, event_type, timestamp_millis, hole_number, payload \
             FROM round_events WHERE round_id = ",
        );
        builder.push_bind(filter.round_id.into_inner());
        if let Some(hole) = filter.hole_number {
            builder.push(" AND hole_number = ").push_bind(i64::from(hole));
        }
        if let Some(tag) = filter.event_type {
            builder.push(" AND event_type = ").push_bind(tag.as_str());
        }
        if let Some((start, end)) = filter.time_range {
            builder.push(" AND timestamp_millis >= ").push_bind(start);
            builder.push(" AND timestamp_millis <= ").push_bind(end);
        }
        builder.push(" ORDER BY timestamp_millis, seq");

        let rows = builder
            .build_query_as::<EventRow>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(EventRecord::try_from).collect()
    }

    async fn delete_round(&self, round_id: RoundId) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM round_events WHERE round_id = ?")
            .bind(round_id.into_inner())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_round(&self, round_id: RoundId) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM round_events WHERE round_id = ?")
            .bind(round_id.into_inner())
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn round_ids(&self) -> Result<Vec<RoundId>, DbError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT DISTINCT round_id FROM round_events ORDER BY round_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().map(RoundId).collect())
    }

    fn changes(&self) -> &ChangeFeed {
        &self.changes
    }
}

impl ScoreCardBackend for SqliteBackend {
    async fn save_scorecard(&self, card: &ScoreCard) -> Result<(), DbError> {
        let hole_scores = serde_json::to_string(&card.hole_scores)?;
        sqlx::query(
            r"INSERT INTO score_cards (round_id, player_id, course_id, hole_scores, in_progress, created_at, updated_at)
              VALUES (?, ?, ?, ?, ?, ?, ?)
              ON CONFLICT (round_id) DO UPDATE SET
                  player_id = excluded.player_id,
                  course_id = excluded.course_id,
                  hole_scores = excluded.hole_scores,
                  in_progress = excluded.in_progress,
                  updated_at = excluded.updated_at",
        )
        .bind(card.round_id.into_inner())
        .bind(card.player_id.into_inner())
        .bind(card.course_id.into_inner())
        .bind(hole_scores)
        .bind(card.in_progress)
        .bind(card.created_at)
        .bind(card.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(round_id = %card.round_id, "Saved score card");
        Ok(())
    }

    async fn load_scorecard(&self, round_id: RoundId) -> Result<Option<ScoreCard>, DbError> {
        let row = sqlx::query_as::<_, ScoreCardRow>(
            r"SELECT round_id, player_id, course_id, hole_scores, in_progress, created_at, updated_at
              FROM score_cards WHERE round_id = ?",
        )
        .bind(round_id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ScoreCard::try_from).transpose()
    }

    async fn delete_scorecard(&self, round_id: RoundId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM score_cards WHERE round_id = ?")
            .bind(round_id.into_inner())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// A row from the `round_events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct EventRow {
    id: String,
    round_id: i64,
    player_id: i64,
    event_type: String,
    timestamp_millis: i64,
    hole_number: Option<i64>,
    payload: String,
}

impl TryFrom<EventRow> for EventRecord {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| DbError::Backend(format!("corrupt event id {:?}: {e}", row.id)))?;
        let hole_number = row
            .hole_number
            .map(u32::try_from)
            .transpose()
            .map_err(|e| DbError::Backend(format!("corrupt hole number: {e}")))?;

        Ok(Self {
            id: EventId(id),
            round_id: RoundId(row.round_id),
            player_id: PlayerId(row.player_id),
            event_type: row.event_type,
            timestamp_millis: row.timestamp_millis,
            hole_number,
            payload: row.payload,
        })
    }
}

/// A row from the `score_cards` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ScoreCardRow {
    round_id: i64,
    player_id: i64,
    course_id: i64,
    hole_scores: String,
    in_progress: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ScoreCardRow> for ScoreCard {
    type Error = DbError;

    fn try_from(row: ScoreCardRow) -> Result<Self, Self::Error> {
        Ok(Self {
            round_id: RoundId(row.round_id),
            player_id: PlayerId(row.player_id),
            course_id: CourseId(row.course_id),
            hole_scores: serde_json::from_str(&row.hole_scores)?,
            in_progress: row.in_progress,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_url_is_pinned_to_one_connection() {
        let config = SqliteConfig::in_memory().with_max_connections(8);
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn file_url_uses_default_pool_size() {
        let config = SqliteConfig::new("sqlite://fairway.db");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.with_max_connections(2).max_connections, 2);
    }
}
