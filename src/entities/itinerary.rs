use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{Entity, QueryBuilder, SortKind, SortOrder};

use super::fields::{CREATED_AT, CULTURAL_EXHIBIT_ID};
use super::LocalizedText;

/// A suggested or visitor-built route through an exhibit's pieces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExhibitItinerary {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
    pub is_active: bool,
    pub is_custom: bool,
    pub is_preferred: bool,
    pub likes: i64,
    pub images: Vec<String>,
    pub rank: Option<i32>,
    /// Piece ids in visiting order
    pub cultural_pieces_ranking: Vec<String>,
    pub cultural_exhibit_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitItineraryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_exhibit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preferred: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl ExhibitItinerary {
    /// Conditions of `filter` without its ordering
    pub(crate) fn conditions(filter: &ExhibitItineraryFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt(CULTURAL_EXHIBIT_ID, filter.cultural_exhibit_id.clone())
            .eq_opt("isActive", filter.is_active)
            .eq_opt("isCustom", filter.is_custom)
            .eq_opt("isPreferred", filter.is_preferred)
            .paginate(filter.limit, filter.offset)
    }
}

impl Entity for ExhibitItinerary {
    const TABLE: &'static str = "exhibit_itineraries";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "exhibit-itinerary",
        "exhibit-itinerary:",
        "exhibit-itinerary:list:",
        TtlTier::Standard,
    );
    type Filter = ExhibitItineraryFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &ExhibitItineraryFilter) -> QueryBuilder {
        Self::conditions(filter)
            .order_by("rank", SortKind::Number, SortOrder::Asc)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
    }
}
