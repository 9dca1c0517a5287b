use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{Entity, QueryBuilder, SortKind, SortOrder};

use super::fields::{CREATED_AT, CULTURAL_EXHIBIT_ID};
use super::LocalizedText;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    Monument,
    #[default]
    Painting,
    Sculpture,
}

impl PieceType {
    pub fn as_str(self) -> &'static str {
        match self {
            PieceType::Monument => "MONUMENT",
            PieceType::Painting => "PAINTING",
            PieceType::Sculpture => "SCULPTURE",
        }
    }
}

/// A single work on display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CulturalPiece {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub author: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    pub images: Vec<String>,
    pub audio: LocalizedText,
    pub greeting_audio_available: bool,
    pub is_active: bool,
    pub cultural_exhibit_id: String,
    pub level_id: Option<String>,
    pub exhibit_space_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalPieceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_exhibit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhibit_space_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub piece_type: Option<PieceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for CulturalPiece {
    const TABLE: &'static str = "cultural_pieces";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "cultural-piece",
        "cultural-piece:",
        "cultural-piece:list:",
        TtlTier::Long,
    );
    type Filter = CulturalPieceFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &CulturalPieceFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt(CULTURAL_EXHIBIT_ID, filter.cultural_exhibit_id.clone())
            .eq_opt("levelId", filter.level_id.clone())
            .eq_opt("exhibitSpaceId", filter.exhibit_space_id.clone())
            .eq_opt("type", filter.piece_type.map(PieceType::as_str))
            .eq_opt("isActive", filter.is_active)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}
