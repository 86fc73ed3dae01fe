// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Each subcommand stands in for one of the note-editor actions:
// - get      -> "Get GitHub File" (insert a code block plus its control)
// - refresh  -> clicking the refresh button on a control
// - pin      -> clicking the commit id to pin/unpin it
// - repos    -> listing the repositories the token can see
// - commits  -> showing what the commit tracker knows about a repository
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gh_embed::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "gh-embed",
    version,
    about = "Embed files from GitHub repositories into notes as code blocks",
    long_about = "gh-embed fetches the newest version of a file from GitHub and prints it as a \
                  fenced code block together with a refresh/pin control you can paste into a note."
)]
pub struct Cli {
    /// Settings file (TOML). Missing files are ignored.
    #[arg(long, global = true, env = "GH_EMBED_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a file and print its control and code block
    ///
    /// Example: gh-embed get myaccount::myrepo:src/app.py
    Get {
        /// File reference: [account::][repository:]path
        reference: String,

        /// Output the fetched file as JSON instead of a code block
        #[arg(long)]
        json: bool,

        /// Create the control unpinned so it can be refreshed right away
        #[arg(long)]
        unpinned: bool,
    },

    /// Re-fetch the file behind a saved control
    ///
    /// Example: gh-embed refresh '{{renderer :github_abcde, me::repo:a.py, 1a2b3c, Init, false}}'
    Refresh {
        /// The control text as saved in the note
        control: String,

        /// Output the fetched file as JSON instead of a code block
        #[arg(long)]
        json: bool,
    },

    /// Toggle the pin flag of a saved control
    Pin {
        /// The control text as saved in the note
        control: String,
    },

    /// List repositories of the authenticated account
    Repos {
        #[arg(long)]
        json: bool,
    },

    /// List the commits of a repository, newest marked
    ///
    /// Example: gh-embed commits myaccount::myrepo:
    Commits {
        /// Reference naming the repository; the path part is ignored
        reference: String,

        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from(["gh-embed", "get", "me::repo:a.py", "--unpinned"]).unwrap();
        match cli.command {
            Commands::Get {
                reference,
                json,
                unpinned,
            } => {
                assert_eq!(reference, "me::repo:a.py");
                assert!(!json);
                assert!(unpinned);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["gh-embed", "repos", "--config", "other.toml", "--json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Commands::Repos { json: true }));
    }

    #[test]
    fn test_clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
