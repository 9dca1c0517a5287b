//! Schema creation for every entity table
//!
//! Each entity lives in its own document table. Creation is idempotent, so
//! `auto_migrate` runs safely at every start.

use store_object::{Entity, table_ddl};

use crate::core::Curio;
use crate::entities::{
    ActivatedTicket, CulturalExhibit, CulturalPiece, ExhibitItinerary, ExhibitSpace, GeneralSettings, Level,
    LlmModel, Message, SurveyAnswer, SurveyQuestion, SurveyResponse, Ticket, Tour, User,
};
use crate::errors::CurioError;

/// Tables of all entities, in creation order
pub const ENTITY_TABLES: [&str; 15] = [
    CulturalExhibit::TABLE,
    ExhibitSpace::TABLE,
    Level::TABLE,
    CulturalPiece::TABLE,
    ExhibitItinerary::TABLE,
    Ticket::TABLE,
    ActivatedTicket::TABLE,
    Tour::TABLE,
    Message::TABLE,
    User::TABLE,
    SurveyQuestion::TABLE,
    SurveyResponse::TABLE,
    SurveyAnswer::TABLE,
    LlmModel::TABLE,
    GeneralSettings::TABLE,
];

/// Every statement `auto_migrate` executes, in order
pub fn migration_statements() -> Vec<String> {
    ENTITY_TABLES.iter().flat_map(|table| table_ddl(table)).collect()
}

impl Curio {
    /// Create any missing entity table and its document index
    pub async fn auto_migrate(&self) -> Result<(), CurioError> {
        let mut tx = self.pool().begin().await?;
        for statement in migration_statements() {
            crate::debug_log!("Executing migration statement: {}", statement);
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        tracing::info!(tables = ENTITY_TABLES.len(), "schema migration complete");
        Ok(())
    }
}
