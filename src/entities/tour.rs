//! Tours in progress and the chat messages exchanged during them

use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{Entity, QueryBuilder, QueryFilter, SortKind, SortOrder};

use super::fields::{CREATED_AT, CULTURAL_EXHIBIT_ID};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tour {
    pub id: String,
    pub is_started: bool,
    pub user_interacted: bool,
    pub admin_user_id: String,
    pub member_ids: Vec<String>,
    pub activated_ticket_id: Option<String>,
    pub exhibit_itinerary_id: Option<String>,
    pub cultural_exhibit_id: Option<String>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_exhibit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_user_id: Option<String>,
    /// Tours listing this user among their members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_started: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for Tour {
    const TABLE: &'static str = "tours";
    const POLICY: EntityPolicy = EntityPolicy::new("tour", "tour:", "tours:", TtlTier::Short);
    type Filter = TourFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &TourFilter) -> QueryBuilder {
        let mut query = QueryBuilder::new()
            .eq_opt(CULTURAL_EXHIBIT_ID, filter.cultural_exhibit_id.clone())
            .eq_opt("adminUserId", filter.admin_user_id.clone())
            .eq_opt("isStarted", filter.is_started);
        if let Some(member) = &filter.member_id {
            query = query.filter(QueryFilter::has_element("memberIds", member.as_str()));
        }
        query
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub from_bot: bool,
    pub is_initial: bool,
    pub cultural_piece_id: Option<String>,
    pub user_id: Option<String>,
    pub tour_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_piece_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for Message {
    const TABLE: &'static str = "messages";
    const POLICY: EntityPolicy = EntityPolicy::new("message", "message:", "messages:", TtlTier::Volatile);
    type Filter = MessageFilter;

    fn id(&self) -> &str {
        &self.id
    }

    /// Conversation order: oldest first
    fn query(filter: &MessageFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt("tourId", filter.tour_id.clone())
            .eq_opt("userId", filter.user_id.clone())
            .eq_opt("culturalPieceId", filter.cultural_piece_id.clone())
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Asc)
            .paginate(filter.limit, filter.offset)
    }
}
