use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    sync::Arc,
};

use log::{debug, info, warn};

use crate::{
    export_image, format_millis, prayer_text, preview, render_share_image, split_sentences,
    typesetter_from_config, Commands, Config, GeminiClient, HistoryStore, Journal, JournalError,
    JournalEvent, JournalTab, Mood, PrayerGenerator, PrayerRecord, PrayerRequest, ReliefLevel,
    Result, ShareTarget, ShareTemplate,
};

/// Options of the `pray` subcommand, bundled for [`App::pray`]
pub struct PrayOptions {
    pub request: PrayerRequest,
    pub mood: Option<Mood>,
    pub relief: Option<ReliefLevel>,
    pub save: bool,
    pub json: bool,
}

/// CLI Application handler - processes CLI commands against the journal
pub struct App {
    /// The prayer journal
    store: Arc<HistoryStore>,

    /// Application configuration
    config: Config,

    /// Where `config --init` writes the configuration
    config_path: Option<PathBuf>,

    /// Generation backend; built from config on first use when not injected
    generator: Option<Arc<dyn PrayerGenerator>>,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given store and config
    pub fn new(
        store: Arc<HistoryStore>,
        config: Config,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Self {
        Self {
            store,
            config,
            config_path,
            generator: None,
            verbose,
        }
    }

    /// Use `generator` instead of the configured Gemini client
    pub fn with_generator(mut self, generator: Arc<dyn PrayerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Run the CLI application with the given command
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Pray {
                text,
                topic,
                language,
                style,
                denomination,
                mood,
                relief,
                save,
                json,
            } => {
                let language = language.unwrap_or(self.config.default_language);
                let own_words = text.as_deref().is_some_and(|t| !t.trim().is_empty());
                let user_input = prayer_text(text, topic, language).ok_or_else(|| {
                    JournalError::InvalidInput {
                        message: "describe what is on your heart or pick a --topic".to_string(),
                    }
                })?;
                if let (Some(topic), false) = (topic, own_words) {
                    debug!("Praying from the {} topic", topic.id());
                    if !json {
                        println!("{} {}\n", topic.emoji(), topic.label(language));
                    }
                }

                let request = PrayerRequest {
                    user_input,
                    language,
                    style: style.unwrap_or(self.config.default_style),
                    denomination: denomination.unwrap_or(self.config.default_denomination),
                };
                self.pray(PrayOptions {
                    request,
                    mood,
                    relief,
                    save,
                    json,
                })
                .await?;
            }

            Commands::List {
                answered,
                json,
                brief,
            } => self.list(answered, json, brief).await?,

            Commands::View { id, json } => self.view(&id, json).await?,

            Commands::Answer { id, note } => {
                self.answer(&id, &note).await?;
            }

            Commands::Delete { id, force } => self.delete(&id, force).await?,

            Commands::Share {
                id,
                template,
                output,
                target,
            } => {
                self.share(&id, template, output, target).await?;
            }

            Commands::Config { show, init } => self.handle_config(show, init)?,
        }

        Ok(())
    }

    fn generator(&self) -> Result<Arc<dyn PrayerGenerator>> {
        match &self.generator {
            Some(generator) => Ok(Arc::clone(generator)),
            None => Ok(Arc::new(GeminiClient::from_config(&self.config)?)),
        }
    }

    /// Generates a prayer, prints it and optionally saves it.
    ///
    /// Returns the saved record when `save` was requested.
    pub async fn pray(&self, options: PrayOptions) -> Result<Option<PrayerRecord>> {
        let generator = self.generator()?;

        let response = match generator.generate(&options.request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Generation failed: {}", e);
                eprintln!("Something went wrong while composing your prayer. Please try again.");
                return Err(e);
            }
        };

        let record = PrayerRecord::new(
            &options.request,
            response,
            options.mood.map(|m| m.id().to_string()),
            options.relief,
        );

        if options.json {
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            self.print_prayer(&record);
        }

        if !options.save {
            return Ok(None);
        }

        self.store.append(record.clone()).await?;
        println!("Prayer saved with ID: {}", record.id);
        Ok(Some(record))
    }

    fn print_prayer(&self, record: &PrayerRecord) {
        println!("{}\n", console::style(&record.title).bold());
        for sentence in split_sentences(&record.prayer_text) {
            println!("{}", sentence.trim());
        }
        println!();
        println!("{}", console::style(format!("\"{}\"", record.verse_text)).italic());
        println!(
            "{}",
            console::style(format!("- {}", record.verse_reference.to_uppercase())).dim()
        );
    }

    async fn load_journal(&self) -> Result<Journal> {
        let mut journal = Journal::new(Arc::clone(&self.store));
        journal.refresh().await?;
        Ok(journal)
    }

    /// List one partition of the journal, newest first
    async fn list(&self, answered: bool, json: bool, brief: bool) -> Result<()> {
        let mut journal = self.load_journal().await?;
        let tab = if answered {
            JournalTab::Gratitude
        } else {
            JournalTab::Requests
        };
        journal.dispatch(JournalEvent::SwitchTab(tab));

        let state = journal.state();
        let records = state.visible();

        if json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        println!(
            "Requests ({})  Gratitude ({})\n",
            state.active().len(),
            state.answered().len()
        );

        if records.is_empty() {
            match tab {
                JournalTab::Gratitude => println!("No answered prayers yet. Keep believing."),
                JournalTab::Requests => println!("Your journal is currently empty."),
            }
            return Ok(());
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, record) in records.iter().enumerate() {
            if brief {
                println!("{}  {}", record.id, record.title);
                continue;
            }

            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }
            println!(
                "ID: {} | {}",
                record.id,
                format_millis(record.timestamp)
            );
            println!("{}", console::style(&record.title).bold());
            if let Some(mood) = record.initial_mood.as_deref().and_then(Mood::from_id) {
                println!("Mood: {}", console::style(mood.label(record.language)).cyan());
            }
            println!("{}", preview(&record.prayer_text, 100));
            if let (Some(date), Some(note)) = (record.answer_date, &record.answer_note) {
                println!(
                    "{} {}: {}",
                    console::style("Answered").yellow(),
                    format_millis(date),
                    note
                );
            }
        }

        Ok(())
    }

    async fn find(&self, id: &str) -> Result<PrayerRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| JournalError::RecordNotFound { id: id.to_string() })
    }

    async fn view(&self, id: &str, json: bool) -> Result<()> {
        let record = self.find(id).await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&record)?);
            return Ok(());
        }

        println!(
            "ID: {} | {} | {} / {} / {}",
            record.id,
            format_millis(record.timestamp),
            record.language,
            record.style,
            record.denomination
        );
        self.print_prayer(&record);
        println!("\nOriginal thought: \"{}\"", record.user_input);
        if let Some(relief) = record.relief_level {
            println!("Relief: {}", relief);
        }
        if let (Some(date), Some(note)) = (record.answer_date, &record.answer_note) {
            println!(
                "\n{} ({})\n{}",
                console::style("How God answered").yellow().bold(),
                format_millis(date),
                note
            );
        }
        Ok(())
    }

    /// Marks a prayer as answered with `note`, going through the journal's state machine
    pub async fn answer(&self, id: &str, note: &str) -> Result<PrayerRecord> {
        let mut journal = self.load_journal().await?;

        let record = journal
            .state()
            .record(id)
            .ok_or_else(|| JournalError::RecordNotFound { id: id.to_string() })?;
        if record.is_answered() {
            return Err(JournalError::InvalidTransition {
                id: id.to_string(),
                message: "prayer is already answered".to_string(),
            });
        }

        journal.dispatch(JournalEvent::Select(id.to_string()));
        journal.dispatch(JournalEvent::BeginAnswer(id.to_string()));
        journal.dispatch(JournalEvent::EditDraft(note.to_string()));

        let answered = journal
            .submit_answer()
            .await?
            .ok_or_else(|| JournalError::RecordNotFound { id: id.to_string() })?;

        println!("Prayer marked as answered. Moved to Gratitude.");
        Ok(answered)
    }

    async fn delete(&self, id: &str, force: bool) -> Result<()> {
        let record = self.find(id).await?;

        if !force {
            println!("You are about to delete the following prayer:");
            println!("ID:      {}", record.id);
            println!("Title:   {}", record.title);
            println!("Created: {}", format_millis(record.timestamp));

            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this prayer? [y/N]: ");
            stdout().flush()?;

            let mut input = String::new();
            stdin().read_line(&mut input)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        let mut journal = self.load_journal().await?;
        journal.delete(id).await?;
        println!("Prayer {} deleted.", id);
        Ok(())
    }

    /// Renders the prayer's verse with `template` and writes it to disk
    pub async fn share(
        &self,
        id: &str,
        template: ShareTemplate,
        output: Option<PathBuf>,
        target: ShareTarget,
    ) -> Result<PathBuf> {
        let record = self.find(id).await?;
        let typesetter = typesetter_from_config(&self.config)?;

        let uri = render_share_image(
            &record.verse_text,
            &record.verse_reference,
            template,
            typesetter.as_ref(),
        )?;

        let dir = output.unwrap_or_else(|| self.config.export_dir.clone());
        let path = export_image(&uri, &dir, target)?;
        println!("Saved {} card to {}", template.label(), path.display());
        Ok(path)
    }

    fn handle_config(&self, show: bool, init: bool) -> Result<()> {
        if init {
            let path = self
                .config_path
                .clone()
                .ok_or_else(|| JournalError::ConfigError {
                    message: "could not determine config file location".to_string(),
                })?;
            self.config.save(&path)?;
            println!("Configuration written to {}", path.display());
        }

        if show || !init {
            let mut shown = self.config.clone();
            if shown.api_key.is_some() {
                shown.api_key = Some("********".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&shown)?);
            if self.verbose {
                info!("Journal key: {}", self.store.key());
            }
        }
        Ok(())
    }
}
