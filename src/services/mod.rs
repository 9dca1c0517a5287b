//! Entity-specific operations on top of [`CachedStore`](store_object::CachedStore)
//!
//! Reads go through the owning entity's cache policy and writes go through
//! `CachedStore`'s invalidating `create`/`update`/`delete`.

pub mod auth;
pub mod exhibits;
pub mod settings;
pub mod tickets;
pub mod users;

pub use auth::{bearer_token, AuthenticatedUser, Authenticator};
pub use exhibits::{ItineraryQueries, LevelQueries, PieceQueries};
pub use settings::{LlmQueries, SettingsService};
pub use tickets::{ActivatedTicketQueries, TicketQueries};
pub use users::{UserQueries, UserStats};
