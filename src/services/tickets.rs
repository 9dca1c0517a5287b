//! Ticket catalogue reads and the tickets users hold

use async_trait::async_trait;
use store_object::{CachedStore, Repository, StoreError};

use crate::entities::{ActivatedTicket, ActivatedTicketFilter, Ticket, TicketFilter, TicketType};

/// Fixed-filter ticket listings
///
/// Each one is an ordinary filtered list, so it shares its cache entry
/// with the generic list for the same filter.
#[async_trait]
pub trait TicketQueries {
    async fn recommended(&self, city: Option<&str>) -> Result<Vec<Ticket>, StoreError>;

    async fn on_offer(&self, city: Option<&str>) -> Result<Vec<Ticket>, StoreError>;

    async fn by_type(&self, ticket_type: TicketType, city: Option<&str>) -> Result<Vec<Ticket>, StoreError>;
}

#[async_trait]
impl<R: Repository<Ticket>> TicketQueries for CachedStore<Ticket, R> {
    async fn recommended(&self, city: Option<&str>) -> Result<Vec<Ticket>, StoreError> {
        let filter = TicketFilter {
            city: city.map(str::to_string),
            is_recommended: Some(true),
            ..Default::default()
        };
        self.list(&filter).await
    }

    async fn on_offer(&self, city: Option<&str>) -> Result<Vec<Ticket>, StoreError> {
        let filter = TicketFilter {
            city: city.map(str::to_string),
            on_offer: Some(true),
            ..Default::default()
        };
        self.list(&filter).await
    }

    async fn by_type(&self, ticket_type: TicketType, city: Option<&str>) -> Result<Vec<Ticket>, StoreError> {
        let filter = TicketFilter {
            city: city.map(str::to_string),
            ticket_type: Some(ticket_type),
            ..Default::default()
        };
        self.list(&filter).await
    }
}

#[async_trait]
pub trait ActivatedTicketQueries {
    /// Tickets the user has activated that have not expired, newest first
    async fn active_for_user(&self, user_id: &str) -> Result<Vec<ActivatedTicket>, StoreError>;
}

#[async_trait]
impl<R: Repository<ActivatedTicket>> ActivatedTicketQueries for CachedStore<ActivatedTicket, R> {
    async fn active_for_user(&self, user_id: &str) -> Result<Vec<ActivatedTicket>, StoreError> {
        let filter = ActivatedTicketFilter {
            user_id: Some(user_id.to_string()),
            is_activated: Some(true),
            is_expired: Some(false),
            ..Default::default()
        };
        self.list(&filter).await
    }
}
