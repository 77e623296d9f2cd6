//! Domain layer - Core business logic and entities

pub mod error;
pub mod player;
pub mod session;
pub mod squad;
pub mod storage;
pub mod team;
pub mod transfer;
pub mod user;

pub use error::{DomainError, ErrorCode};
pub use player::{NewPlayer, Player, PlayerId, PlayerRepository, Position};
pub use session::{NewSession, Session, SessionId, SessionRepository};
pub use squad::{RandomSquadGenerator, SquadGenerator};
pub use storage::{StoreTransaction, TransactionalStore};
pub use team::{NewTeam, Team, TeamId, TeamRepository, TeamWithSquad};
pub use transfer::{
    AppreciationSource, FixedAppreciation, RandomAppreciation, TransferReceipt,
};
pub use user::{User, UserId, UserRepository};
