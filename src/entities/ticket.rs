//! Ticket catalogue and the tickets users have bought

use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{Entity, QueryBuilder, QueryFilter, SortKind, SortOrder};

use super::fields::{CREATED_AT, CULTURAL_EXHIBIT_ID};
use super::LocalizedText;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    Popular,
    #[default]
    Museum,
    Monument,
    City,
}

impl TicketType {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketType::Popular => "POPULAR",
            TicketType::Museum => "MUSEUM",
            TicketType::Monument => "MONUMENT",
            TicketType::City => "CITY",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticket {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub city: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub coming_soon: bool,
    pub is_recommended: bool,
    pub images: Vec<String>,
    /// Minutes a tour started with this ticket may last
    pub max_time: Option<i64>,
    pub price: f64,
    pub on_offer: bool,
    pub offer_price: Option<f64>,
    pub priority: i32,
    pub recommended_visit_time: Option<String>,
    pub cultural_exhibit_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_exhibit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<TicketType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coming_soon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recommended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_offer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for Ticket {
    const TABLE: &'static str = "tickets";
    const POLICY: EntityPolicy = EntityPolicy::new("ticket", "ticket:", "tickets:", TtlTier::Moderate);
    type Filter = TicketFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &TicketFilter) -> QueryBuilder {
        let mut query = QueryBuilder::new().eq_opt(CULTURAL_EXHIBIT_ID, filter.cultural_exhibit_id.clone());
        if let Some(city) = &filter.city {
            query = query.filter(QueryFilter::contains_insensitive("city", city));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(QueryFilter::gte("price", min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(QueryFilter::lte("price", max));
        }
        query
            .eq_opt("type", filter.ticket_type.map(TicketType::as_str))
            .eq_opt("comingSoon", filter.coming_soon)
            .eq_opt("isRecommended", filter.is_recommended)
            .eq_opt("onOffer", filter.on_offer)
            .order_by("priority", SortKind::Number, SortOrder::Asc)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}

/// A ticket bought by a user, optionally redeemed for a tour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivatedTicket {
    pub id: String,
    pub name: LocalizedText,
    pub is_activated: bool,
    pub is_expired: bool,
    pub is_free: bool,
    pub is_physical: bool,
    pub images: Vec<String>,
    pub max_time: Option<i64>,
    pub price: f64,
    pub expiration_time: Option<DateTime<Utc>>,
    pub cultural_exhibit_id: Option<String>,
    pub ticket_id: String,
    pub user_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatedTicketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_exhibit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_activated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for ActivatedTicket {
    const TABLE: &'static str = "activated_tickets";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "activated-ticket",
        "activated-ticket:",
        "activated-tickets:",
        TtlTier::Short,
    );
    type Filter = ActivatedTicketFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &ActivatedTicketFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt("userId", filter.user_id.clone())
            .eq_opt("ticketId", filter.ticket_id.clone())
            .eq_opt(CULTURAL_EXHIBIT_ID, filter.cultural_exhibit_id.clone())
            .eq_opt("isActivated", filter.is_activated)
            .eq_opt("isExpired", filter.is_expired)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}
