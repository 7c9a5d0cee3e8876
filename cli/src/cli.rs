use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ask the Gita Ashram a question or consult the decision compass
#[derive(Parser, Debug)]
#[command(name = "gita-ashram", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file (defaults to ~/.config/gita-ashram/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// URL of the chat-gita endpoint
    #[arg(long, env = "ASHRAM_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Directory holding the prefill mailbox
    #[arg(long, env = "ASHRAM_MAILBOX_DIR", global = true)]
    pub mailbox_dir: Option<PathBuf>,

    /// Write the rendered HTML to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a free-text question
    Ask {
        /// The question; when omitted you are prompted, starting from any pending follow-up
        #[arg(index = 1)]
        question: Option<String>,
    },

    /// Describe a dilemma and receive structured guidance
    Compass(CompassArgs),

    /// Write a default config file if none exists
    InitConfig,
}

#[derive(clap::Args, Debug)]
pub struct CompassArgs {
    /// Your situation or dilemma (required)
    #[arg(short, long, default_value = "")]
    pub situation: String,

    /// Area of life the decision touches
    #[arg(long, default_value = "")]
    pub life_area: String,

    /// What you are feeling about it
    #[arg(long, default_value = "")]
    pub emotion: String,

    /// The outcome you hope for
    #[arg(long, default_value = "")]
    pub desired_outcome: String,

    /// Anything limiting your options
    #[arg(long, default_value = "")]
    pub constraints: String,

    /// Queue a deeper question about verse N (1-based) for `ask`
    #[arg(long, value_name = "N")]
    pub follow_up: Option<usize>,

    /// Choose a verse to follow up on from a list
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_compass() {
        let args = Args::try_parse_from([
            "gita-ashram",
            "compass",
            "--situation",
            "Should I relocate?",
            "--emotion",
            "uncertain",
            "--follow-up",
            "2",
            "-o",
            "out.html",
        ])
        .unwrap();

        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        match args.command {
            Some(Command::Compass(compass)) => {
                assert_eq!(compass.situation, "Should I relocate?");
                assert_eq!(compass.emotion, "uncertain");
                assert_eq!(compass.life_area, "");
                assert_eq!(compass.follow_up, Some(2));
                assert!(!compass.interactive);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_ask_without_question() {
        let args = Args::try_parse_from(["gita-ashram", "ask"]).unwrap();
        assert!(matches!(args.command, Some(Command::Ask { question: None })));
    }
}
