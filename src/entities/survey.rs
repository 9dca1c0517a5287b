use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use store_object::{Entity, QueryBuilder, SortKind, SortOrder};

use super::fields::CREATED_AT;
use super::user::Language;
use super::LocalizedText;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    SingleChoice,
    MultipleChoice,
    Input,
    Rating,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "SINGLE_CHOICE",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::Input => "INPUT",
            QuestionType::Rating => "RATING",
        }
    }
}

/// A question shown at the end of a tour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub is_active: bool,
    pub is_optional: bool,
    pub order: i32,
    pub questions: LocalizedText,
    /// Choices per language, empty for input questions
    pub answers: Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyQuestionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for SurveyQuestion {
    const TABLE: &'static str = "survey_questions";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "survey-question",
        "survey-question:",
        "survey-question:list:",
        TtlTier::Long,
    );
    type Filter = SurveyQuestionFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &SurveyQuestionFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt("isActive", filter.is_active)
            .eq_opt("type", filter.question_type.map(QuestionType::as_str))
            .order_by("order", SortKind::Number, SortOrder::Asc)
            .paginate(filter.limit, filter.offset)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyResponse {
    pub id: String,
    pub tour_id: Option<String>,
    pub user_id: Option<String>,
    pub itinerary_id: Option<String>,
    /// Answers keyed by question id
    pub responses: Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponseFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for SurveyResponse {
    const TABLE: &'static str = "survey_responses";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "survey-response",
        "survey-response:",
        "survey-response:list:",
        TtlTier::Short,
    );
    type Filter = SurveyResponseFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &SurveyResponseFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt("tourId", filter.tour_id.clone())
            .eq_opt("userId", filter.user_id.clone())
            .eq_opt("itineraryId", filter.itinerary_id.clone())
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}

/// One answered question inside a survey response
///
/// `question_text` keeps the wording the visitor saw, so an answer stays
/// readable after its question is edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyAnswer {
    pub id: String,
    pub survey_response_id: String,
    pub question_id: Option<String>,
    pub language: Language,
    pub question_text: String,
    /// Free text or single choice
    pub answer: Option<String>,
    /// Choices of a multiple-choice question
    pub answer_array: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnswerFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for SurveyAnswer {
    const TABLE: &'static str = "survey_answers";
    const POLICY: EntityPolicy = EntityPolicy::new(
        "survey-answer",
        "survey-answer:",
        "survey-answer:list:",
        TtlTier::Short,
    );
    type Filter = SurveyAnswerFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &SurveyAnswerFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt("surveyResponseId", filter.survey_response_id.clone())
            .eq_opt("questionId", filter.question_id.clone())
            .eq_opt("language", filter.language.map(Language::as_str))
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}
