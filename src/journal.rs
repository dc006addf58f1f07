//! Journal view state.
//!
//! The journal screen is modelled as a [`JournalState`] value and a pure
//! [`reduce`] function. [`Journal`] pairs the reducer with a [`HistoryStore`] for
//! the events that need persistence (answer submission and deletion).
use std::sync::Arc;

use log::{debug, info};

use crate::{now_millis, sort_newest_first, HistoryStore, PrayerRecord, Result};

/// Which partition of the journal is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalTab {
    /// Open requests (`status == active`)
    #[default]
    Requests,
    /// Answered prayers (`status == answered`)
    Gratitude,
}

/// The single record that is not collapsed, if any
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Collapsed,
    Expanded { id: String },
    Answering { id: String, draft: String },
}

impl Focus {
    pub fn id(&self) -> Option<&str> {
        match self {
            Focus::Collapsed => None,
            Focus::Expanded { id } | Focus::Answering { id, .. } => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JournalState {
    /// All records, newest first
    pub records: Vec<PrayerRecord>,
    pub tab: JournalTab,
    pub focus: Focus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JournalEvent {
    /// Fresh contents of the store
    Loaded(Vec<PrayerRecord>),
    SwitchTab(JournalTab),
    /// User tapped a record
    Select(String),
    /// User pressed "mark as answered" on a record
    BeginAnswer(String),
    EditDraft(String),
    CancelAnswer,
    /// The answered record has been persisted
    AnswerCommitted(PrayerRecord),
    /// The record has been removed from the store
    Deleted(String),
}

impl JournalState {
    pub fn record(&self, id: &str) -> Option<&PrayerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Open requests, newest first
    pub fn active(&self) -> Vec<&PrayerRecord> {
        self.records.iter().filter(|r| !r.is_answered()).collect()
    }

    /// Answered prayers, newest first
    pub fn answered(&self) -> Vec<&PrayerRecord> {
        self.records.iter().filter(|r| r.is_answered()).collect()
    }

    /// The partition selected by the current tab
    pub fn visible(&self) -> Vec<&PrayerRecord> {
        match self.tab {
            JournalTab::Requests => self.active(),
            JournalTab::Gratitude => self.answered(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.focus.id() == Some(id)
    }

    /// The draft note, when a record is being answered
    pub fn draft(&self) -> Option<(&str, &str)> {
        match &self.focus {
            Focus::Answering { id, draft } => Some((id, draft)),
            _ => None,
        }
    }

    /// Whether "mark as answered" is offered for `id`
    pub fn can_answer(&self, id: &str) -> bool {
        self.record(id).is_some_and(|r| !r.is_answered())
    }
}

/// Applies one event to the journal state
pub fn reduce(mut state: JournalState, event: JournalEvent) -> JournalState {
    match event {
        JournalEvent::Loaded(mut records) => {
            sort_newest_first(&mut records);
            state.records = records;
            let vanished = state
                .focus
                .id()
                .is_some_and(|id| state.record(id).is_none());
            if vanished {
                state.focus = Focus::Collapsed;
            }
        }
        JournalEvent::SwitchTab(tab) => state.tab = tab,
        JournalEvent::Select(id) => {
            if state.focus.id() == Some(id.as_str()) {
                state.focus = Focus::Collapsed;
            } else if state.record(&id).is_some() {
                state.focus = Focus::Expanded { id };
            }
        }
        JournalEvent::BeginAnswer(id) => {
            if state.can_answer(&id) {
                let already_answering =
                    matches!(&state.focus, Focus::Answering { id: current, .. } if *current == id);
                if !already_answering {
                    state.focus = Focus::Answering {
                        id,
                        draft: String::new(),
                    };
                }
            }
        }
        JournalEvent::EditDraft(text) => {
            if let Focus::Answering { draft, .. } = &mut state.focus {
                *draft = text;
            }
        }
        JournalEvent::CancelAnswer => {
            if let Focus::Answering { id, .. } = &state.focus {
                state.focus = Focus::Expanded { id: id.clone() };
            }
        }
        JournalEvent::AnswerCommitted(record) => {
            if state.focus.id() == Some(record.id.as_str()) {
                state.focus = Focus::Collapsed;
            }
            if let Some(slot) = state.records.iter_mut().find(|r| r.id == record.id) {
                *slot = record;
            }
            state.tab = JournalTab::Gratitude;
        }
        JournalEvent::Deleted(id) => {
            state.records.retain(|r| r.id != id);
            if state.focus.id() == Some(id.as_str()) {
                state.focus = Focus::Collapsed;
            }
        }
    }
    state
}

/// The journal screen's controller
pub struct Journal {
    store: Arc<HistoryStore>,
    state: JournalState,
}

impl Journal {
    pub fn new(store: Arc<HistoryStore>) -> Self {
        Self {
            store,
            state: JournalState::default(),
        }
    }

    pub fn state(&self) -> &JournalState {
        &self.state
    }

    pub fn dispatch(&mut self, event: JournalEvent) {
        debug!("Journal event: {:?}", event);
        self.state = reduce(std::mem::take(&mut self.state), event);
    }

    /// Reloads all records from the store
    pub async fn refresh(&mut self) -> Result<()> {
        let records = self.store.list().await?;
        self.dispatch(JournalEvent::Loaded(records));
        Ok(())
    }

    /// Answers the record currently being drafted, using the current time.
    ///
    /// Returns the answered record, or `None` when no answer is being drafted.
    pub async fn submit_answer(&mut self) -> Result<Option<PrayerRecord>> {
        self.submit_answer_at(now_millis()).await
    }

    pub async fn submit_answer_at(&mut self, answered_at: i64) -> Result<Option<PrayerRecord>> {
        let Some((id, draft)) = self.state.draft() else {
            debug!("Submit ignored: no answer being drafted");
            return Ok(None);
        };
        let Some(record) = self.state.record(id) else {
            return Ok(None);
        };

        let answered = record.clone().answered(draft, answered_at)?;
        self.store.update(answered.clone()).await?;
        info!("Prayer {} marked as answered", answered.id);

        self.dispatch(JournalEvent::AnswerCommitted(answered.clone()));
        self.refresh().await?;
        Ok(Some(answered))
    }

    /// Deletes a record from the store and the view, whatever its state
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        self.dispatch(JournalEvent::Deleted(id.to_string()));
        Ok(())
    }
}
