use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "samachar",
    version,
    about = "Classify Nepali news articles with a remote model"
)]
pub struct Cli {
    /// Configuration file (default: ./samachar.yaml, then the user config dir)
    #[arg(long, global = true, env = "SAMACHAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the classification service; overrides the configuration
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Print the service's JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Cmd>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Cmd {
    /// Interactive terminal client (default)
    Tui,
    /// Classify one article given as TEXT, a file, or stdin
    Classify {
        text: Option<String>,
        #[arg(long, short, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Check that the service has its models loaded
    Health,
    /// Show the service banner
    Status,
    /// Ask the service to reload its model files
    ReloadModels,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["samachar"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.json);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "samachar",
            "classify",
            "--file",
            "article.txt",
            "--url",
            "http://10.0.0.2:8000",
            "--json",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Cmd::Classify {
                text: None,
                file: Some(PathBuf::from("article.txt")),
            })
        );
        assert_eq!(cli.url.as_deref(), Some("http://10.0.0.2:8000"));
        assert!(cli.json);
    }

    #[test]
    fn text_and_file_conflict() {
        assert!(Cli::try_parse_from(["samachar", "classify", "text", "-f", "a.txt"]).is_err());
    }

    #[test]
    fn reload_models_is_kebab_case() {
        let cli = Cli::try_parse_from(["samachar", "reload-models"]).unwrap();
        assert_eq!(cli.command, Some(Cmd::ReloadModels));
    }
}
