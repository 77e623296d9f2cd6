//! PostgreSQL store implementation with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row, Transaction};

use crate::domain::player::{NewPlayer, Player, PlayerId, PlayerRepository, Position};
use crate::domain::session::{NewSession, Session, SessionId, SessionRepository};
use crate::domain::storage::{StoreTransaction, TransactionalStore};
use crate::domain::team::{NewTeam, Team, TeamId, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::{DomainError, ErrorCode};

/// SQLSTATE codes that signal a transient condition
const RETRYABLE_SQLSTATES: &[&str] = &[
    "57014", // query_canceled (statement_timeout)
    "55P03", // lock_not_available
    "40001", // serialization_failure
    "40P01", // deadlock_detected
];

const PLAYER_COLUMNS: &str = "id, team_id, first_name, last_name, country, age, position, \
                              value, market_value, on_transfer_list";

const TEAM_COLUMNS: &str = "id, user_id, name, country, budget";

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// How long to wait for a pooled connection, in seconds
    pub acquire_timeout_secs: u64,
    /// Server-side limit per statement, in milliseconds
    pub statement_timeout_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/squad_market".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 5,
            statement_timeout_ms: 5_000,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_acquire_timeout(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }

    pub fn with_statement_timeout(mut self, ms: u64) -> Self {
        self.statement_timeout_ms = ms;
        self
    }
}

/// Open a connection pool with acquire and statement timeouts applied
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    let options = config
        .url
        .parse::<PgConnectOptions>()
        .map_err(|e| DomainError::internal(format!("Invalid database URL: {}", e)))?
        .options([(
            "statement_timeout",
            format!("{}ms", config.statement_timeout_ms),
        )]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| map_sqlx_error("Failed to connect to PostgreSQL", e))
}

/// Translate a sqlx error, separating transient faults from hard ones
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> DomainError {
    let retryable = match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db) => db
            .code()
            .is_some_and(|code| RETRYABLE_SQLSTATES.iter().any(|state| *state == &*code)),
        _ => false,
    };

    if retryable {
        DomainError::unavailable(format!("{}: {}", context, err))
    } else {
        DomainError::storage(format!("{}: {}", context, err))
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    Ok(User::new(
        UserId::new(read_column(row, "id")?),
        read_column::<String>(row, "email")?,
        read_column::<String>(row, "password_hash")?,
        read_column(row, "created_at")?,
    ))
}

fn row_to_team(row: &PgRow) -> Result<Team, DomainError> {
    Ok(Team::new(
        TeamId::new(read_column(row, "id")?),
        UserId::new(read_column(row, "user_id")?),
        read_column::<String>(row, "name")?,
        read_column::<String>(row, "country")?,
        read_column(row, "budget")?,
    ))
}

fn row_to_player(row: &PgRow) -> Result<Player, DomainError> {
    let position_code: String = read_column(row, "position")?;
    let position = Position::from_code(&position_code).ok_or_else(|| {
        DomainError::storage(format!("Unknown player position '{}'", position_code))
    })?;

    let age: i16 = read_column(row, "age")?;
    let age = u8::try_from(age)
        .map_err(|_| DomainError::storage(format!("Player age out of range: {}", age)))?;

    let player = Player::new(
        PlayerId::new(read_column(row, "id")?),
        TeamId::new(read_column(row, "team_id")?),
        NewPlayer {
            first_name: read_column(row, "first_name")?,
            last_name: read_column(row, "last_name")?,
            country: read_column(row, "country")?,
            age,
            position,
            base_value: read_column(row, "value")?,
        },
    );

    Ok(player.with_listing(read_column(row, "on_transfer_list")?, read_column(row, "market_value")?))
}

fn row_to_session(row: &PgRow) -> Result<Session, DomainError> {
    Ok(Session {
        id: SessionId::new(read_column(row, "id")?),
        user_id: UserId::new(read_column(row, "user_id")?),
        refresh_token_hash: read_column(row, "refresh_token_hash")?,
        refresh_expires_at: read_column(row, "refresh_expires_at")?,
        created_at: read_column(row, "created_at")?,
    })
}

fn read_column<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", column, e)))
}

/// PostgreSQL-backed identity, team, player and session store
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row =
            sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("Failed to get user by email", e))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl TeamRepository for PostgresStore {
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = $1", TEAM_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get team", e))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn get_by_owner(&self, owner_id: UserId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE user_id = $1", TEAM_COLUMNS))
            .bind(owner_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get team by owner", e))?;

        row.as_ref().map(row_to_team).transpose()
    }
}

#[async_trait]
impl PlayerRepository for PostgresStore {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get player", e))?;

        row.as_ref().map(row_to_player).transpose()
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM players WHERE team_id = $1 ORDER BY id",
            PLAYER_COLUMNS
        ))
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list squad", e))?;

        rows.iter().map(row_to_player).collect()
    }

    async fn list_on_market(&self) -> Result<Vec<Player>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM players WHERE on_transfer_list = TRUE ORDER BY id",
            PLAYER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list transfer market", e))?;

        rows.iter().map(row_to_player).collect()
    }
}

#[async_trait]
impl SessionRepository for PostgresStore {
    async fn create(&self, session: NewSession) -> Result<Session, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO sessions (user_id, refresh_token_hash, refresh_expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, refresh_token_hash, refresh_expires_at, created_at
            "#,
        )
        .bind(session.user_id.value())
        .bind(&session.refresh_token_hash)
        .bind(session.refresh_expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create session", e))?;

        row_to_session(&row)
    }

    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, refresh_token_hash, refresh_expires_at, created_at
            FROM sessions
            WHERE refresh_token_hash = $1
            "#,
        )
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find session", e))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn rotate(
        &self,
        id: SessionId,
        current_hash: &str,
        new_hash: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE sessions SET refresh_token_hash = $3 WHERE id = $1 AND refresh_token_hash = $2",
        )
        .bind(id.value())
        .bind(current_hash)
        .bind(new_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to rotate session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: SessionId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete session", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TransactionalStore for PostgresStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        Ok(Box::new(PostgresTransaction { tx }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Database ping failed", e))?;

        Ok(())
    }
}

/// Open PostgreSQL transaction; sqlx rolls it back on drop
struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn create_user(&mut self, email: &str, password_hash: &str) -> Result<UserId, DomainError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id")
                .bind(email)
                .bind(password_hash)
                .fetch_one(&mut *self.tx)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        DomainError::duplicate_identity()
                    }
                    _ => map_sqlx_error("Failed to create user", e),
                })?;

        Ok(UserId::new(id))
    }

    async fn create_team(&mut self, team: NewTeam) -> Result<TeamId, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO teams (user_id, name, country, budget) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(team.owner_id.value())
        .bind(&team.name)
        .bind(&team.country)
        .bind(team.budget)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to create team", e))?;

        Ok(TeamId::new(id))
    }

    async fn insert_players(
        &mut self,
        team_id: TeamId,
        players: &[NewPlayer],
    ) -> Result<(), DomainError> {
        if players.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO players (team_id, first_name, last_name, country, age, position, value) ",
        );

        builder.push_values(players, |mut row, player| {
            row.push_bind(team_id.value())
                .push_bind(player.first_name.clone())
                .push_bind(player.last_name.clone())
                .push_bind(player.country.clone())
                .push_bind(i16::from(player.age))
                .push_bind(player.position.code())
                .push_bind(player.base_value);
        });

        builder
            .build()
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to insert squad", e))?;

        Ok(())
    }

    async fn lock_player(&mut self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM players WHERE id = $1 FOR UPDATE",
            PLAYER_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to lock player", e))?;

        row.as_ref().map(row_to_player).transpose()
    }

    async fn lock_team(&mut self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE id = $1 FOR UPDATE",
            TEAM_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to lock team", e))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn adjust_budget(&mut self, id: TeamId, delta: Decimal) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE teams SET budget = budget + $2 WHERE id = $1")
            .bind(id.value())
            .bind(delta)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to adjust budget", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::team_not_found());
        }

        Ok(())
    }

    async fn transfer_player(
        &mut self,
        id: PlayerId,
        to: TeamId,
        new_base_value: Decimal,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE players
            SET team_id = $2, value = $3, market_value = 0, on_transfer_list = FALSE
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(to.value())
        .bind(new_base_value)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to transfer player", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::player_not_found());
        }

        Ok(())
    }

    async fn set_listing(&mut self, id: PlayerId, price: Option<Decimal>) -> Result<(), DomainError> {
        let market_value = match price {
            Some(price) if price > Decimal::ZERO => price,
            Some(_) => return Err(DomainError::validation(ErrorCode::InvalidPrice)),
            None => Decimal::ZERO,
        };

        let result = sqlx::query(
            "UPDATE players SET market_value = $2, on_transfer_list = $3 WHERE id = $1",
        )
        .bind(id.value())
        .bind(market_value)
        .bind(price.is_some())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update listing", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::player_not_found());
        }

        Ok(())
    }

    async fn update_team_profile(
        &mut self,
        id: TeamId,
        name: &str,
        country: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE teams SET name = $2, country = $3 WHERE id = $1")
            .bind(id.value())
            .bind(name)
            .bind(country)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to update team", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::team_not_found());
        }

        Ok(())
    }

    async fn update_player_profile(
        &mut self,
        id: PlayerId,
        first_name: &str,
        last_name: &str,
        country: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE players SET first_name = $2, last_name = $3, country = $4 WHERE id = $1",
        )
        .bind(id.value())
        .bind(first_name)
        .bind(last_name)
        .bind(country)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update player", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::player_not_found());
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit transaction", e))
    }
}
