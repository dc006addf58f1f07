//! Shared enumerations and CLI command definitions.
//!
//! The generation parameters, record status, share templates and the mood
//! annotations all live here, next to the subcommands that expose them.
use std::{fmt, path::PathBuf};

use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::JournalError;

/// A specialized Result type for soulscribe operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Target language of the generated prayer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    /// Human-readable name, as used in the generation prompt
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Ru => "Russian",
            Language::En => "English",
        }
    }
}

/// Tone of the generated prayer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrayerStyle {
    Modern,
    #[default]
    Classic,
    Short,
}

/// Christian tradition the prayer should reflect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    #[default]
    General,
    Orthodox,
    Catholic,
    Protestant,
}

/// Lifecycle status of a saved prayer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerStatus {
    #[default]
    Active,
    Answered,
}

/// Visual recipe used when exporting a verse as an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShareTemplate {
    Minimal,
    #[default]
    Atmospheric,
    Classic,
}

impl ShareTemplate {
    pub fn all() -> [ShareTemplate; 3] {
        [
            ShareTemplate::Minimal,
            ShareTemplate::Atmospheric,
            ShareTemplate::Classic,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShareTemplate::Minimal => "Minimal",
            ShareTemplate::Atmospheric => "Atmosphere",
            ShareTemplate::Classic => "Classic",
        }
    }
}

/// How the user felt before praying. Stored on the record by its id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mood {
    Anxiety,
    Sadness,
    Anger,
    Tired,
    Confused,
    Grateful,
}

impl Mood {
    pub fn id(&self) -> &'static str {
        match self {
            Mood::Anxiety => "anxiety",
            Mood::Sadness => "sadness",
            Mood::Anger => "anger",
            Mood::Tired => "tired",
            Mood::Confused => "confused",
            Mood::Grateful => "grateful",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "anxiety" => Some(Mood::Anxiety),
            "sadness" => Some(Mood::Sadness),
            "anger" => Some(Mood::Anger),
            "tired" => Some(Mood::Tired),
            "confused" => Some(Mood::Confused),
            "grateful" => Some(Mood::Grateful),
            _ => None,
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Mood::Anxiety, Language::En) => "Anxiety",
            (Mood::Anxiety, Language::Ru) => "Тревога",
            (Mood::Sadness, Language::En) => "Sadness",
            (Mood::Sadness, Language::Ru) => "Грусть",
            (Mood::Anger, Language::En) => "Anger",
            (Mood::Anger, Language::Ru) => "Гнев",
            (Mood::Tired, Language::En) => "Tired",
            (Mood::Tired, Language::Ru) => "Усталость",
            (Mood::Confused, Language::En) => "Confused",
            (Mood::Confused, Language::Ru) => "Смятение",
            (Mood::Grateful, Language::En) => "Grateful",
            (Mood::Grateful, Language::Ru) => "Благодарность",
        }
    }
}

/// Post-prayer feedback on how much relief the prayer brought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReliefLevel {
    None,
    Little,
    Much,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Ru => write!(f, "ru"),
            Language::En => write!(f, "en"),
        }
    }
}

impl fmt::Display for PrayerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrayerStyle::Modern => write!(f, "modern"),
            PrayerStyle::Classic => write!(f, "classic"),
            PrayerStyle::Short => write!(f, "short"),
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denomination::General => write!(f, "general"),
            Denomination::Orthodox => write!(f, "orthodox"),
            Denomination::Catholic => write!(f, "catholic"),
            Denomination::Protestant => write!(f, "protestant"),
        }
    }
}

impl fmt::Display for PrayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrayerStatus::Active => write!(f, "active"),
            PrayerStatus::Answered => write!(f, "answered"),
        }
    }
}

impl fmt::Display for ShareTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareTemplate::Minimal => write!(f, "minimal"),
            ShareTemplate::Atmospheric => write!(f, "atmospheric"),
            ShareTemplate::Classic => write!(f, "classic"),
        }
    }
}

impl fmt::Display for ReliefLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReliefLevel::None => write!(f, "none"),
            ReliefLevel::Little => write!(f, "little"),
            ReliefLevel::Much => write!(f, "much"),
        }
    }
}

/// Preset starting points for a prayer, offered when the user has no words yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuickTopic {
    Health,
    Work,
    Burnout,
    Loneliness,
    Family,
}

impl QuickTopic {
    pub fn all() -> [QuickTopic; 5] {
        [
            QuickTopic::Health,
            QuickTopic::Work,
            QuickTopic::Burnout,
            QuickTopic::Loneliness,
            QuickTopic::Family,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            QuickTopic::Health => "health",
            QuickTopic::Work => "work",
            QuickTopic::Burnout => "burnout",
            QuickTopic::Loneliness => "loneliness",
            QuickTopic::Family => "family",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            QuickTopic::Health => "💊",
            QuickTopic::Work => "💼",
            QuickTopic::Burnout => "🔋",
            QuickTopic::Loneliness => "🌑",
            QuickTopic::Family => "🏠",
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (QuickTopic::Health, Language::En) => "Health",
            (QuickTopic::Health, Language::Ru) => "Здоровье",
            (QuickTopic::Work, Language::En) => "Work",
            (QuickTopic::Work, Language::Ru) => "Работа",
            (QuickTopic::Burnout, Language::En) => "Burnout",
            (QuickTopic::Burnout, Language::Ru) => "Выгорание",
            (QuickTopic::Loneliness, Language::En) => "Loneliness",
            (QuickTopic::Loneliness, Language::Ru) => "Одиночество",
            (QuickTopic::Family, Language::En) => "Family",
            (QuickTopic::Family, Language::Ru) => "Семья",
        }
    }

    /// Starter text for the prayer request
    pub fn text(&self, language: Language) -> &'static str {
        match (self, language) {
            (QuickTopic::Health, Language::En) => {
                "Lord, I ask for Your healing and protection for my loved ones. \
                 Grant us health and strength..."
            }
            (QuickTopic::Health, Language::Ru) => {
                "Господи, прошу Твоего исцеления и защиты для моих близких. \
                 Даруй нам здоровье и силы..."
            }
            (QuickTopic::Work, Language::En) => {
                "Lord, times are tough at work, and I fear I cannot cope. \
                 Give me wisdom and patience..."
            }
            (QuickTopic::Work, Language::Ru) => {
                "Господи, на работе сложные времена, я боюсь не справиться. \
                 Дай мне мудрости и терпения..."
            }
            (QuickTopic::Burnout, Language::En) => {
                "Lord, I feel my strength failing, and I find no joy in my work. \
                 Renew my spirit and give me rest..."
            }
            (QuickTopic::Burnout, Language::Ru) => {
                "Господи, я чувствую, что мои силы на исходе, работа не приносит радости. \
                 Обнови дух мой и дай мне покой..."
            }
            (QuickTopic::Loneliness, Language::En) => {
                "Lord, I feel so lonely and empty inside. \
                 Be near me and remind me of Your love..."
            }
            (QuickTopic::Loneliness, Language::Ru) => {
                "Господи, мне так одиноко и пусто на душе. \
                 Будь рядом со мной и напомни о Твоей любви..."
            }
            (QuickTopic::Family, Language::En) => {
                "Lord, there is discord in my family. \
                 Help us restore peace, understanding, and love..."
            }
            (QuickTopic::Family, Language::Ru) => {
                "Господи, в моей семье разлад. \
                 Помоги нам вернуть мир, понимание и любовь..."
            }
        }
    }
}

/// The text to pray about: the user's own words when given, otherwise the topic's
/// starter text in `language`
pub fn prayer_text(
    text: Option<String>,
    topic: Option<QuickTopic>,
    language: Language,
) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
        .or_else(|| topic.map(|topic| topic.text(language).to_string()))
}

/// Where an exported share image is headed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShareTarget {
    /// Direct download with the fixed download file name
    #[default]
    Download,
    /// Attachment handed to a native share surface
    Share,
}

/// Available subcommands for the soulscribe application
#[derive(Subcommand)]
pub enum Commands {
    /// Turn a description of how you feel into a prayer
    Pray {
        /// What is on your heart
        #[clap(required_unless_present = "topic")]
        text: Option<String>,

        /// Start from a preset topic when you have no words yet
        #[clap(short, long, value_enum)]
        topic: Option<QuickTopic>,

        /// Language of the prayer (defaults to the configured language)
        #[clap(short, long, value_enum)]
        language: Option<Language>,

        /// Prayer style (defaults to the configured style)
        #[clap(short, long, value_enum)]
        style: Option<PrayerStyle>,

        /// Tradition to reflect (defaults to the configured denomination)
        #[clap(short, long, value_enum)]
        denomination: Option<Denomination>,

        /// How you feel right now
        #[clap(short, long, value_enum)]
        mood: Option<Mood>,

        /// How much relief the prayer brought
        #[clap(short, long, value_enum)]
        relief: Option<ReliefLevel>,

        /// Save the prayer to the journal
        #[clap(long)]
        save: bool,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List saved prayers, newest first
    List {
        /// Show answered prayers instead of open requests
        #[clap(short, long)]
        answered: bool,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Only show IDs and titles
        #[clap(short, long)]
        brief: bool,
    },

    /// View a prayer by ID
    View {
        /// ID of the prayer to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Mark a prayer as answered
    Answer {
        /// ID of the prayer
        id: String,

        /// How the prayer was answered
        #[clap(short, long)]
        note: String,
    },

    /// Delete a prayer by ID
    Delete {
        /// ID of the prayer to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Export a prayer's verse as a shareable image
    Share {
        /// ID of the prayer whose verse to export
        id: String,

        /// Visual template
        #[clap(short, long, value_enum, default_value_t = ShareTemplate::Atmospheric)]
        template: ShareTemplate,

        /// Directory to write the image to (default uses config setting)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// File name convention: direct download or share attachment
        #[clap(long, value_enum, default_value_t = ShareTarget::Download)]
        target: ShareTarget,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Write the current configuration to the config file
        #[clap(short, long)]
        init: bool,
    },
}
