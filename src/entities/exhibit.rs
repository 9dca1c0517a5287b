//! Exhibits and their physical layout: spaces and levels

use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{Entity, QueryBuilder, QueryFilter, SortKind, SortOrder};

use super::fields::{CREATED_AT, CULTURAL_EXHIBIT_ID};
use super::LocalizedText;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A museum, monument or site that can be toured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CulturalExhibit {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub important_notice: LocalizedText,
    pub city: String,
    pub coming_soon: bool,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub disable_group: bool,
    pub geo_coordinates: Option<GeoCoordinates>,
    pub gps_available: bool,
    pub text_only: bool,
    pub images: Vec<String>,
    pub priority: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalExhibitFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coming_soon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for CulturalExhibit {
    const TABLE: &'static str = "cultural_exhibits";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "cultural-exhibit",
        "cultural-exhibit:",
        "cultural-exhibit:list:",
        TtlTier::Long,
    );
    type Filter = CulturalExhibitFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &CulturalExhibitFilter) -> QueryBuilder {
        let mut query = QueryBuilder::new();
        if let Some(city) = &filter.city {
            query = query.filter(QueryFilter::contains_insensitive("city", city));
        }
        query
            .eq_opt("comingSoon", filter.coming_soon)
            .eq_opt("gpsAvailable", filter.gps_available)
            .eq_opt("textOnly", filter.text_only)
            .order_by("priority", SortKind::Number, SortOrder::Asc)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}

/// A room or area inside an exhibit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExhibitSpace {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub image: Option<String>,
    pub cultural_exhibit_id: String,
    pub level_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitSpaceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_exhibit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for ExhibitSpace {
    const TABLE: &'static str = "exhibit_spaces";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "exhibit-space",
        "exhibit-space:",
        "exhibit-space:list:",
        TtlTier::Long,
    );
    type Filter = ExhibitSpaceFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &ExhibitSpaceFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt(CULTURAL_EXHIBIT_ID, filter.cultural_exhibit_id.clone())
            .eq_opt("levelId", filter.level_id.clone())
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}

/// A floor of an exhibit, shown in visitor order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Level {
    pub id: String,
    pub cultural_exhibit_id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub main_image: Option<String>,
    pub map_image: Option<String>,
    pub order: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_exhibit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for Level {
    const TABLE: &'static str = "levels";
    const POLICY: EntityPolicy = EntityPolicy::new("level", "level:", "level:list:", TtlTier::Long);
    type Filter = LevelFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &LevelFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt(CULTURAL_EXHIBIT_ID, filter.cultural_exhibit_id.clone())
            .order_by("order", SortKind::Number, SortOrder::Asc)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}
