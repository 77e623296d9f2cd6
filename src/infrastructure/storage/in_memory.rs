//! In-memory store implementation
//!
//! Backs tests and the `memory` storage backend. All data sits behind one
//! async mutex; a transaction holds that mutex for its whole lifetime and
//! works on a staged copy that replaces the live state on commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

use crate::domain::player::{NewPlayer, Player, PlayerId, PlayerRepository};
use crate::domain::session::{NewSession, Session, SessionId, SessionRepository};
use crate::domain::storage::{StoreTransaction, TransactionalStore};
use crate::domain::team::{NewTeam, Team, TeamId, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::{DomainError, ErrorCode};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Step at which a transaction can be made to fail
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    CreateUser,
    CreateTeam,
    InsertPlayers,
    TransferPlayer,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    emails: HashMap<String, UserId>,
    teams: BTreeMap<TeamId, Team>,
    team_owners: HashMap<UserId, TeamId>,
    players: BTreeMap<PlayerId, Player>,
    sessions: BTreeMap<SessionId, Session>,
    refresh_hashes: HashMap<String, SessionId>,
    last_user_id: i64,
    last_team_id: i64,
    last_player_id: i64,
    last_session_id: i64,
    #[cfg(test)]
    injected_failure: Option<FailurePoint>,
}

#[cfg(test)]
impl StoreState {
    fn check_failure(&self, point: FailurePoint) -> Result<(), DomainError> {
        if self.injected_failure == Some(point) {
            return Err(DomainError::storage(format!(
                "Injected failure at {:?}",
                point
            )));
        }
        Ok(())
    }
}

/// Thread-safe in-memory store
///
/// Data is lost when the process terminates.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    lock_timeout: Duration,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Bound how long any operation waits for the store lock
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Make every later transaction fail at `point` until cleared
    #[cfg(test)]
    pub async fn fail_on(&self, point: FailurePoint) -> Result<(), DomainError> {
        self.lock().await?.injected_failure = Some(point);
        Ok(())
    }

    #[cfg(test)]
    pub async fn clear_failure(&self) -> Result<(), DomainError> {
        self.lock().await?.injected_failure = None;
        Ok(())
    }

    /// Number of stored users, teams and players
    #[cfg(test)]
    pub async fn counts(&self) -> Result<(usize, usize, usize), DomainError> {
        let state = self.lock().await?;
        Ok((state.users.len(), state.teams.len(), state.players.len()))
    }

    async fn lock(&self) -> Result<MutexGuard<'_, StoreState>, DomainError> {
        tokio::time::timeout(self.lock_timeout, self.state.lock())
            .await
            .map_err(|_| DomainError::unavailable("Timed out waiting for in-memory store"))
    }

    async fn lock_owned(&self) -> Result<OwnedMutexGuard<StoreState>, DomainError> {
        tokio::time::timeout(self.lock_timeout, Arc::clone(&self.state).lock_owned())
            .await
            .map_err(|_| DomainError::unavailable("Timed out waiting for in-memory store"))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.lock().await?.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.lock().await?;

        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self.lock().await?.teams.get(&id).cloned())
    }

    async fn get_by_owner(&self, owner_id: UserId) -> Result<Option<Team>, DomainError> {
        let state = self.lock().await?;

        Ok(state
            .team_owners
            .get(&owner_id)
            .and_then(|id| state.teams.get(id))
            .cloned())
    }
}

#[async_trait]
impl PlayerRepository for InMemoryStore {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        Ok(self.lock().await?.players.get(&id).cloned())
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, DomainError> {
        let state = self.lock().await?;

        Ok(state
            .players
            .values()
            .filter(|p| p.is_owned_by(team_id))
            .cloned()
            .collect())
    }

    async fn list_on_market(&self) -> Result<Vec<Player>, DomainError> {
        let state = self.lock().await?;

        Ok(state
            .players
            .values()
            .filter(|p| p.on_transfer_list())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create(&self, session: NewSession) -> Result<Session, DomainError> {
        let mut state = self.lock().await?;

        if state.refresh_hashes.contains_key(&session.refresh_token_hash) {
            return Err(DomainError::storage("Duplicate refresh token hash"));
        }
        if !state.users.contains_key(&session.user_id) {
            return Err(DomainError::storage(format!(
                "Session references missing user {}",
                session.user_id
            )));
        }

        state.last_session_id += 1;
        let session = Session {
            id: SessionId::new(state.last_session_id),
            user_id: session.user_id,
            refresh_token_hash: session.refresh_token_hash,
            refresh_expires_at: session.refresh_expires_at,
            created_at: Utc::now(),
        };

        state
            .refresh_hashes
            .insert(session.refresh_token_hash.clone(), session.id);
        state.sessions.insert(session.id, session.clone());

        Ok(session)
    }

    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<Session>, DomainError> {
        let state = self.lock().await?;

        Ok(state
            .refresh_hashes
            .get(hash)
            .and_then(|id| state.sessions.get(id))
            .cloned())
    }

    async fn rotate(
        &self,
        id: SessionId,
        current_hash: &str,
        new_hash: &str,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock().await?;
        let state = &mut *state;

        let Some(session) = state.sessions.get_mut(&id) else {
            return Ok(false);
        };
        if session.refresh_token_hash != current_hash {
            return Ok(false);
        }

        state.refresh_hashes.remove(current_hash);
        state.refresh_hashes.insert(new_hash.to_string(), id);
        session.refresh_token_hash = new_hash.to_string();

        Ok(true)
    }

    async fn delete(&self, id: SessionId) -> Result<bool, DomainError> {
        let mut state = self.lock().await?;

        match state.sessions.remove(&id) {
            Some(session) => {
                state.refresh_hashes.remove(&session.refresh_token_hash);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TransactionalStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DomainError> {
        let guard = self.lock_owned().await?;
        let staged = guard.clone();

        Ok(Box::new(InMemoryTransaction { guard, staged }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.lock().await.map(|_| ())
    }
}

/// Open in-memory transaction
///
/// Holds the store lock; dropping it without commit discards `staged`.
struct InMemoryTransaction {
    guard: OwnedMutexGuard<StoreState>,
    staged: StoreState,
}

impl InMemoryTransaction {
    fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, DomainError> {
        self.staged
            .teams
            .get_mut(&id)
            .ok_or_else(DomainError::team_not_found)
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, DomainError> {
        self.staged
            .players
            .get_mut(&id)
            .ok_or_else(DomainError::player_not_found)
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn create_user(&mut self, email: &str, password_hash: &str) -> Result<UserId, DomainError> {
        #[cfg(test)]
        self.staged.check_failure(FailurePoint::CreateUser)?;

        if self.staged.emails.contains_key(email) {
            return Err(DomainError::duplicate_identity());
        }

        self.staged.last_user_id += 1;
        let id = UserId::new(self.staged.last_user_id);

        self.staged.emails.insert(email.to_string(), id);
        self.staged
            .users
            .insert(id, User::new(id, email, password_hash, Utc::now()));

        Ok(id)
    }

    async fn create_team(&mut self, team: NewTeam) -> Result<TeamId, DomainError> {
        #[cfg(test)]
        self.staged.check_failure(FailurePoint::CreateTeam)?;

        if !self.staged.users.contains_key(&team.owner_id) {
            return Err(DomainError::storage(format!(
                "Team references missing user {}",
                team.owner_id
            )));
        }
        if self.staged.team_owners.contains_key(&team.owner_id) {
            return Err(DomainError::storage(format!(
                "User {} already owns a team",
                team.owner_id
            )));
        }

        self.staged.last_team_id += 1;
        let id = TeamId::new(self.staged.last_team_id);

        self.staged.team_owners.insert(team.owner_id, id);
        self.staged.teams.insert(
            id,
            Team::new(id, team.owner_id, team.name, team.country, team.budget),
        );

        Ok(id)
    }

    async fn insert_players(
        &mut self,
        team_id: TeamId,
        players: &[NewPlayer],
    ) -> Result<(), DomainError> {
        #[cfg(test)]
        self.staged.check_failure(FailurePoint::InsertPlayers)?;

        if !self.staged.teams.contains_key(&team_id) {
            return Err(DomainError::storage(format!(
                "Players reference missing team {}",
                team_id
            )));
        }

        for data in players {
            self.staged.last_player_id += 1;
            let id = PlayerId::new(self.staged.last_player_id);
            self.staged
                .players
                .insert(id, Player::new(id, team_id, data.clone()));
        }

        Ok(())
    }

    async fn lock_player(&mut self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        Ok(self.staged.players.get(&id).cloned())
    }

    async fn lock_team(&mut self, id: TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self.staged.teams.get(&id).cloned())
    }

    async fn adjust_budget(&mut self, id: TeamId, delta: Decimal) -> Result<(), DomainError> {
        self.team_mut(id)?.adjust_budget(delta);
        Ok(())
    }

    async fn transfer_player(
        &mut self,
        id: PlayerId,
        to: TeamId,
        new_base_value: Decimal,
    ) -> Result<(), DomainError> {
        #[cfg(test)]
        self.staged.check_failure(FailurePoint::TransferPlayer)?;

        if !self.staged.teams.contains_key(&to) {
            return Err(DomainError::storage(format!(
                "Player transfer references missing team {}",
                to
            )));
        }

        self.player_mut(id)?.transfer_to(to, new_base_value);
        Ok(())
    }

    async fn set_listing(&mut self, id: PlayerId, price: Option<Decimal>) -> Result<(), DomainError> {
        let player = self.player_mut(id)?;

        match price {
            Some(price) if price > Decimal::ZERO => player.list(price),
            Some(_) => return Err(DomainError::validation(ErrorCode::InvalidPrice)),
            None => player.delist(),
        }

        Ok(())
    }

    async fn update_team_profile(
        &mut self,
        id: TeamId,
        name: &str,
        country: &str,
    ) -> Result<(), DomainError> {
        let team = self.team_mut(id)?;
        team.set_name(name);
        team.set_country(country);
        Ok(())
    }

    async fn update_player_profile(
        &mut self,
        id: PlayerId,
        first_name: &str,
        last_name: &str,
        country: &str,
    ) -> Result<(), DomainError> {
        let player = self.player_mut(id)?;
        player.set_first_name(first_name);
        player.set_last_name(last_name);
        player.set_country(country);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryTransaction { mut guard, staged } = *self;

        #[cfg(test)]
        staged.check_failure(FailurePoint::Commit)?;
        *guard = staged;

        Ok(())
    }
}
