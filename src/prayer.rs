//! Core data structures for the soulscribe journal.
//!
//! This module contains the durable journal record and the structured answer
//! returned by the generation service.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Denomination, JournalError, Language, PrayerStatus, PrayerStyle, ReliefLevel, Result,
};

/// Structured prayer content as produced by the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerResponse {
    pub title: String,
    pub prayer: String,
    pub verse: String,
    pub reference: String,
}

/// The parameters a prayer is generated with
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerRequest {
    pub user_input: String,
    pub language: Language,
    pub style: PrayerStyle,
    pub denomination: Denomination,
}

/// A single saved prayer in the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRecord {
    /// Unique identifier for the record
    pub id: String,
    /// Creation instant, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// The free text the prayer was generated from
    pub user_input: String,
    pub title: String,
    #[serde(rename = "prayer")]
    pub prayer_text: String,
    #[serde(rename = "verse")]
    pub verse_text: String,
    #[serde(rename = "reference")]
    pub verse_reference: String,
    pub language: Language,
    pub style: PrayerStyle,
    pub denomination: Denomination,
    #[serde(default)]
    pub status: PrayerStatus,
    /// When the prayer was marked answered, milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_note: Option<String>,
    /// Mood id chosen before praying, e.g. "anxiety"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relief_level: Option<ReliefLevel>,
}

impl PrayerRecord {
    /// Creates a new active record from a generated prayer and the request it answered
    pub fn new(
        request: &PrayerRequest,
        response: PrayerResponse,
        initial_mood: Option<String>,
        relief_level: Option<ReliefLevel>,
    ) -> Self {
        PrayerRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            user_input: request.user_input.clone(),
            title: response.title,
            prayer_text: response.prayer,
            verse_text: response.verse,
            verse_reference: response.reference,
            language: request.language,
            style: request.style,
            denomination: request.denomination,
            status: PrayerStatus::Active,
            answer_date: None,
            answer_note: None,
            initial_mood,
            relief_level,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.status == PrayerStatus::Answered
    }

    /// Applies the one-way `active -> answered` transition.
    ///
    /// The answer date and note are set together with the status, so a record is
    /// answered exactly when both are present.
    pub fn mark_answered(&mut self, note: impl Into<String>, answered_at: i64) -> Result<()> {
        if self.is_answered() {
            return Err(JournalError::InvalidTransition {
                id: self.id.clone(),
                message: "prayer is already answered".to_string(),
            });
        }

        self.status = PrayerStatus::Answered;
        self.answer_date = Some(answered_at);
        self.answer_note = Some(note.into());
        Ok(())
    }

    /// Consuming variant of [`PrayerRecord::mark_answered`]
    pub fn answered(mut self, note: impl Into<String>, answered_at: i64) -> Result<Self> {
        self.mark_answered(note, answered_at)?;
        Ok(self)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    fn request() -> PrayerRequest {
        PrayerRequest {
            user_input: "I am anxious about tomorrow".to_string(),
            language: Language::En,
            style: PrayerStyle::Short,
            denomination: Denomination::Catholic,
        }
    }

    fn response() -> PrayerResponse {
        PrayerResponse {
            title: "Peace for Tomorrow".to_string(),
            prayer: "Lord, calm my heart.".to_string(),
            verse: "Do not worry about tomorrow".to_string(),
            reference: "Matthew 6:34".to_string(),
        }
    }

    #[test]
    fn new_record_is_active_with_request_parameters() {
        let rec = PrayerRecord::new(&request(), response(), Some("anxiety".into()), None);

        assert_eq!(rec.status, PrayerStatus::Active);
        assert_eq!(rec.style, PrayerStyle::Short);
        assert_eq!(rec.denomination, Denomination::Catholic);
        assert_eq!(rec.verse_reference, "Matthew 6:34");
        assert!(rec.answer_date.is_none() && rec.answer_note.is_none());
        assert!(Uuid::parse_str(&rec.id).is_ok());
    }

    #[test]
    fn new_records_get_distinct_ids() {
        let a = PrayerRecord::new(&request(), response(), None, None);
        let b = PrayerRecord::new(&request(), response(), None, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn answering_sets_date_and_note_together() {
        let rec = record("a", 1).answered("recovered", 42).unwrap();

        assert!(rec.is_answered());
        assert_eq!(rec.answer_date, Some(42));
        assert_eq!(rec.answer_note.as_deref(), Some("recovered"));
    }

    #[test]
    fn answering_twice_is_rejected_and_keeps_first_answer() {
        let mut rec = record("a", 1).answered("first", 10).unwrap();
        let err = rec.mark_answered("second", 20).unwrap_err();

        assert!(matches!(err, JournalError::InvalidTransition { .. }));
        assert_eq!(rec.answer_note.as_deref(), Some("first"));
        assert_eq!(rec.answer_date, Some(10));
    }

    #[test]
    fn serializes_with_original_field_names() {
        let mut rec = record("a", 5);
        rec.relief_level = Some(ReliefLevel::Much);
        let value = serde_json::to_value(&rec).unwrap();

        assert_eq!(value["userInput"], "input for a");
        assert_eq!(value["prayer"], "Lord, grant me peace.");
        assert_eq!(value["reference"], "Psalm 46:10");
        assert_eq!(value["status"], "active");
        assert_eq!(value["reliefLevel"], "much");
        assert!(value.get("answerDate").is_none());
        assert!(value.get("initialMood").is_none());
    }

    #[test]
    fn deserializes_browser_entry() {
        let raw = r#"{
            "id": "x1", "timestamp": 1700000000000, "userInput": "tired",
            "title": "Rest", "prayer": "Give me rest.", "verse": "Come to me",
            "reference": "Matthew 11:28", "language": "ru", "style": "classic",
            "denomination": "orthodox", "status": "answered",
            "answerDate": 1700000100000, "answerNote": "slept well",
            "initialMood": "tired"
        }"#;
        let rec: PrayerRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(rec.language, Language::Ru);
        assert!(rec.is_answered());
        assert_eq!(rec.answer_note.as_deref(), Some("slept well"));
        assert_eq!(rec.initial_mood.as_deref(), Some("tired"));
        assert_eq!(rec.relief_level, None);
    }
}
