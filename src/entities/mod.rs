//! Domain entities and their cache policies
//!
//! Each entity is a JSON document with camelCase members. Its `POLICY`
//! fixes the key shapes shared with other services on the same cache
//! instance, so prefixes must not change.

pub mod exhibit;
pub mod itinerary;
pub mod llm;
pub mod piece;
pub mod survey;
pub mod ticket;
pub mod tour;
pub mod user;

use std::collections::BTreeMap;

pub use exhibit::{CulturalExhibit, CulturalExhibitFilter, ExhibitSpace, ExhibitSpaceFilter, Level, LevelFilter};
pub use itinerary::{ExhibitItinerary, ExhibitItineraryFilter};
pub use llm::{GeneralSettings, LlmModel, LlmModelFilter, ACTIVE_MODEL_KEY, SETTINGS_ID, SETTINGS_KEY};
pub use piece::{CulturalPiece, CulturalPieceFilter, PieceType};
pub use survey::{
    QuestionType, SurveyAnswer, SurveyAnswerFilter, SurveyQuestion, SurveyQuestionFilter, SurveyResponse,
    SurveyResponseFilter,
};
pub use ticket::{ActivatedTicket, ActivatedTicketFilter, Ticket, TicketFilter, TicketType};
pub use tour::{Message, MessageFilter, Tour, TourFilter};
pub use user::{Gender, Language, Role, User, UserFilter};

/// Text keyed by language code
pub type LocalizedText = BTreeMap<String, String>;

/// Member names used in queries over several entities
pub(crate) mod fields {
    pub const CREATED_AT: &str = "createdAt";
    pub const CULTURAL_EXHIBIT_ID: &str = "culturalExhibitId";
}
