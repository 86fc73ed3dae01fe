// src/lib.rs
// =============================================================================
// Library root for gh-embed.
//
// Resolve a reference, fetch the newest version of the file it points at and
// render it as a code block with a refresh/pin control:
//
//   let settings = Settings::load(Path::new(DEFAULT_CONFIG_FILE))?;
//   let mut fetcher = FileFetcher::new(&settings)?;
//   let reference = Reference::resolve("octocat::hello:src/app.py", &settings);
//   match fetcher.fetch(&reference).await {
//       Ok(file) => println!("{}", render_code_block(&file)),
//       Err(failure) => eprintln!("{}", failure.notification()),
//   }
// =============================================================================

pub mod config;
pub mod embed;
pub mod error;
pub mod github;

pub use config::{Settings, SettingsError, DEFAULT_CONFIG_FILE};
pub use embed::{render_code_block, Control, ControlError};
pub use error::{FailureKind, FetchFailure, NetworkError};
pub use github::{FileFetcher, Reference, RetrievedFile};
