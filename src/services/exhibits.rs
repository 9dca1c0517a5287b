//! Reads and writes around an exhibit's content: pieces, levels and itineraries

use async_trait::async_trait;
use serde_json::json;
use store_object::{CachedStore, Entity, Repository, SortKind, SortOrder, StoreError};

use crate::entities::{
    CulturalPiece, CulturalPieceFilter, ExhibitItinerary, ExhibitItineraryFilter, Level, LevelFilter,
    PieceType,
};

#[async_trait]
pub trait PieceQueries {
    async fn by_type(&self, piece_type: PieceType) -> Result<Vec<CulturalPiece>, StoreError>;

    async fn by_exhibit_space(&self, exhibit_space_id: &str) -> Result<Vec<CulturalPiece>, StoreError>;
}

#[async_trait]
impl<R: Repository<CulturalPiece>> PieceQueries for CachedStore<CulturalPiece, R> {
    async fn by_type(&self, piece_type: PieceType) -> Result<Vec<CulturalPiece>, StoreError> {
        let filter = CulturalPieceFilter {
            piece_type: Some(piece_type),
            ..Default::default()
        };
        self.list(&filter).await
    }

    async fn by_exhibit_space(&self, exhibit_space_id: &str) -> Result<Vec<CulturalPiece>, StoreError> {
        let filter = CulturalPieceFilter {
            exhibit_space_id: Some(exhibit_space_id.to_string()),
            ..Default::default()
        };
        self.list(&filter).await
    }
}

#[async_trait]
pub trait LevelQueries {
    /// Levels of an exhibit in visitor order
    async fn by_exhibit(&self, cultural_exhibit_id: &str) -> Result<Vec<Level>, StoreError>;

    /// Assign new positions to levels of one exhibit
    ///
    /// Every level is checked before the first update, so an unknown id or
    /// a level of another exhibit changes nothing.
    async fn reorder(&self, cultural_exhibit_id: &str, positions: &[(String, i32)]) -> Result<Vec<Level>, StoreError>;
}

#[async_trait]
impl<R: Repository<Level>> LevelQueries for CachedStore<Level, R> {
    async fn by_exhibit(&self, cultural_exhibit_id: &str) -> Result<Vec<Level>, StoreError> {
        let filter = LevelFilter {
            cultural_exhibit_id: Some(cultural_exhibit_id.to_string()),
            ..Default::default()
        };
        self.list(&filter).await
    }

    async fn reorder(&self, cultural_exhibit_id: &str, positions: &[(String, i32)]) -> Result<Vec<Level>, StoreError> {
        for (id, _) in positions {
            let level = self
                .repository()
                .find_by_id(id)
                .await?
                .ok_or_else(|| StoreError::not_found(Level::POLICY.entity, id.as_str()))?;
            if level.cultural_exhibit_id != cultural_exhibit_id {
                return Err(StoreError::validation(format!(
                    "level '{id}' does not belong to exhibit '{cultural_exhibit_id}'"
                )));
            }
        }

        let mut reordered = Vec::with_capacity(positions.len());
        for (id, order) in positions {
            reordered.push(self.update(id, json!({ "order": order })).await?);
        }
        Ok(reordered)
    }
}

#[async_trait]
pub trait ItineraryQueries {
    /// Curated itineraries of an exhibit, best ranked first
    async fn preferred(&self, cultural_exhibit_id: &str) -> Result<Vec<ExhibitItinerary>, StoreError>;

    /// Visitor-built itineraries of an exhibit, most liked first
    async fn custom(&self, cultural_exhibit_id: &str) -> Result<Vec<ExhibitItinerary>, StoreError>;

    async fn increment_likes(&self, id: &str) -> Result<ExhibitItinerary, StoreError>;
}

#[async_trait]
impl<R: Repository<ExhibitItinerary>> ItineraryQueries for CachedStore<ExhibitItinerary, R> {
    async fn preferred(&self, cultural_exhibit_id: &str) -> Result<Vec<ExhibitItinerary>, StoreError> {
        let filter = ExhibitItineraryFilter {
            cultural_exhibit_id: Some(cultural_exhibit_id.to_string()),
            is_active: Some(true),
            is_preferred: Some(true),
            ..Default::default()
        };
        let query = ExhibitItinerary::conditions(&filter)
            .order_by("rank", SortKind::Number, SortOrder::Asc)
            .order_by("likes", SortKind::Number, SortOrder::Desc);
        self.list_scoped("preferred", &filter, query).await
    }

    async fn custom(&self, cultural_exhibit_id: &str) -> Result<Vec<ExhibitItinerary>, StoreError> {
        let filter = ExhibitItineraryFilter {
            cultural_exhibit_id: Some(cultural_exhibit_id.to_string()),
            is_active: Some(true),
            is_custom: Some(true),
            ..Default::default()
        };
        let query = ExhibitItinerary::conditions(&filter)
            .order_by("likes", SortKind::Number, SortOrder::Desc)
            .order_by("createdAt", SortKind::Timestamp, SortOrder::Desc);
        self.list_scoped("custom", &filter, query).await
    }

    // Read-modify-write against the repository; concurrent likes can be lost.
    async fn increment_likes(&self, id: &str) -> Result<ExhibitItinerary, StoreError> {
        let current = self
            .repository()
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(ExhibitItinerary::POLICY.entity, id))?;
        self.update(id, json!({ "likes": current.likes + 1 })).await
    }
}
