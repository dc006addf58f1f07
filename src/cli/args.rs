use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    name = "soulscribe",
    version,
    about = "Prayer journal: turn what is on your heart into a prayer, keep it, share its verse"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory holding the journal (overrides the config file)
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the soulscribe application
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Denomination, Language, Mood, QuickTopic, ShareTarget, ShareTemplate};

    #[test]
    fn parses_pray_with_options() {
        let cli = Cli::try_parse_from([
            "soulscribe",
            "pray",
            "I feel lost",
            "--denomination",
            "catholic",
            "--mood",
            "confused",
            "--save",
        ])
        .unwrap();

        match cli.command {
            Commands::Pray {
                text,
                denomination,
                mood,
                save,
                language,
                ..
            } => {
                assert_eq!(text.as_deref(), Some("I feel lost"));
                assert_eq!(denomination, Some(Denomination::Catholic));
                assert_eq!(mood, Some(Mood::Confused));
                assert!(save);
                assert_eq!(language, None);
            }
            _ => panic!("expected pray"),
        }
    }

    #[test]
    fn share_defaults_to_atmospheric_download() {
        let cli = Cli::try_parse_from(["soulscribe", "-v", "share", "abc"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Share {
                id,
                template,
                target,
                output,
            } => {
                assert_eq!(id, "abc");
                assert_eq!(template, ShareTemplate::Atmospheric);
                assert_eq!(target, ShareTarget::Download);
                assert!(output.is_none());
            }
            _ => panic!("expected share"),
        }
    }

    #[test]
    fn pray_accepts_a_topic_instead_of_text() {
        let cli =
            Cli::try_parse_from(["soulscribe", "pray", "--topic", "burnout", "-l", "en"]).unwrap();

        match cli.command {
            Commands::Pray {
                text,
                topic,
                language,
                ..
            } => {
                assert_eq!(text, None);
                assert_eq!(topic, Some(QuickTopic::Burnout));
                assert_eq!(language, Some(Language::En));
            }
            _ => panic!("expected pray"),
        }
    }

    #[test]
    fn pray_needs_text_or_topic() {
        assert!(Cli::try_parse_from(["soulscribe", "pray"]).is_err());
        assert!(Cli::try_parse_from(["soulscribe", "pray", "--topic", "weather"]).is_err());
    }

    #[test]
    fn answer_requires_note() {
        assert!(Cli::try_parse_from(["soulscribe", "answer", "abc"]).is_err());
    }
}
