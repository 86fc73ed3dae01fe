// src/embed/control.rs
// =============================================================================
// The refresh/pin control saved next to an embedded file.
//
// It is stored in the note as a renderer macro:
//
//   {{renderer :github_<slot>, <account>::<repo>:<path>, <commit id>, <commit message>, <pinned>}}
//
// The commit id and message are optional. The pin flag is always the last
// segment. Commit messages can contain commas, so everything between the id
// and the pin flag belongs to the message. Commas in the file reference are
// written as %2C (and '%' as %25) so the reference stays one segment.
//
// A pinned control refuses to refresh; the user has to unpin it first.
//
// Rust concepts:
// - FromStr: Lets us write "text".parse::<Control>()
// - Display: The inverse, used when writing the control back into the note
// =============================================================================

use std::{fmt, str::FromStr};

use rand::Rng;
use thiserror::Error;

use crate::config::Settings;
use crate::github::{Reference, RetrievedFile};

const OPEN: &str = "{{renderer ";
const CLOSE: &str = "}}";
const TYPE_PREFIX: &str = ":github_";
const SLOT_LEN: usize = 5;
const SHORT_ID_LEN: usize = 7;
const SEPARATOR: char = ',';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ControlError {
    #[error("Not a GitHub control: {0}")]
    NotAControl(String),
    #[error("The control has no file reference")]
    MissingReference,
    #[error("Expected true or false for the pin flag, got '{0}'")]
    BadPinFlag(String),
    #[error("Cannot refresh a pinned file. Click on pin then try again.")]
    Pinned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub slot: String,
    pub reference: Reference,
    pub commit_id: Option<String>,
    pub commit_message: Option<String>,
    pub pinned: bool,
}

impl Control {
    /// A new control with a random slot id and no commit yet.
    pub fn new(reference: Reference, pinned: bool) -> Self {
        Control {
            slot: random_slot(),
            reference,
            commit_id: None,
            commit_message: None,
            pinned,
        }
    }

    /// Stores the commit a fetch came from. Missing values keep the old ones.
    pub fn record(&mut self, file: &RetrievedFile) {
        if let Some(id) = &file.source_commit_id {
            self.commit_id = Some(id.clone());
        }
        if let Some(message) = &file.source_commit_message {
            self.commit_message = Some(message.clone());
        }
    }

    pub fn toggle_pin(&mut self) {
        self.pinned = !self.pinned;
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn ensure_refreshable(&self) -> Result<(), ControlError> {
        if self.pinned {
            Err(ControlError::Pinned)
        } else {
            Ok(())
        }
    }

    pub fn short_commit_id(&self) -> Option<&str> {
        self.commit_id
            .as_deref()
            .map(|id| id.get(..SHORT_ID_LEN).unwrap_or(id))
    }

    /// Button text: file name, refresh symbol, short commit id and a pin.
    pub fn label(&self) -> String {
        format!(
            "{} 🔄 {}{}",
            self.reference.file_name(),
            self.short_commit_id().unwrap_or_default(),
            if self.pinned { "📌" } else { "" }
        )
    }
}

// Same idea as a random 5-letter id: enough to tell controls apart in a note
fn random_slot() -> String {
    let mut rng = rand::thread_rng();
    (0..SLOT_LEN)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Type and slot, then the reference (escaped, see escape_reference)
        write!(
            f,
            "{}{}{}, {}",
            OPEN,
            TYPE_PREFIX,
            self.slot,
            escape_reference(&self.reference.to_string())
        )?;
        // A message is only written when there is an id before it
        if let Some(id) = &self.commit_id {
            write!(f, ", {}", id)?;
            if let Some(message) = &self.commit_message {
                write!(f, ", {}", message)?;
            }
        }
        write!(f, ", {}{}", self.pinned, CLOSE)
    }
}

impl FromStr for Control {
    type Err = ControlError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        // Peel off "{{renderer " and "}}"
        let inner = text
            .trim()
            .strip_prefix(OPEN)
            .and_then(|t| t.strip_suffix(CLOSE))
            .ok_or_else(|| ControlError::NotAControl(text.to_string()))?;

        let parts: Vec<&str> = inner.split(SEPARATOR).collect();

        // First segment is the renderer type, e.g. ":github_abcde"
        let slot = parts[0]
            .trim()
            .strip_prefix(TYPE_PREFIX)
            .ok_or_else(|| ControlError::NotAControl(text.to_string()))?;

        // At the very least: type, reference, pin flag
        if parts.len() < 3 {
            return Err(ControlError::MissingReference);
        }

        let reference = parts[1].trim();
        if reference.is_empty() {
            return Err(ControlError::MissingReference);
        }
        // the saved form always spells out account and repository
        let reference = Reference::resolve(&unescape_reference(reference), &Settings::default());

        // The pin flag is always last, whatever the message contains
        let last = parts.len() - 1;
        let pinned = match parts[last].trim() {
            "true" => true,
            "false" => false,
            other => return Err(ControlError::BadPinFlag(other.to_string())),
        };

        // Segment 2 is the id (if any), everything up to the flag is the message
        let commit_id = (last > 2)
            .then(|| parts[2].trim().to_string())
            .filter(|id| !id.is_empty());
        let commit_message = (last > 3)
            .then(|| parts[3..last].join(",").trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(Control {
            slot: slot.to_string(),
            reference,
            commit_id,
            commit_message,
            pinned,
        })
    }
}

// Keeps a comma inside the path from being read as a segment separator.
// '%' is escaped too so a literal "%2C" in a path survives the round trip.
fn escape_reference(reference: &str) -> String {
    reference.replace('%', "%25").replace(SEPARATOR, "%2C")
}

// Only "%25" and "%2C" are ever produced, and every '%' starts one of them,
// so undoing %2C first can't split a %25 apart
fn unescape_reference(reference: &str) -> String {
    reference.replace("%2C", ",").replace("%25", "%")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Display and FromStr are a pair
//    - Display writes the control into the note (control.to_string())
//    - FromStr reads it back ("...".parse::<Control>())
//    - The tests check that parse(to_string(c)) == c
//
// 2. What is bool::then()?
//    - (condition).then(|| value) gives Some(value) if true, None if false
//    - Handy for optional segments that only exist past a certain index
//
// 3. Why does ensure_refreshable() return a Result?
//    - Refusing to refresh a pinned file is an expected outcome, not a crash
//    - The caller decides how to tell the user (main.rs prints it)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn reference() -> Reference {
        Reference {
            account: "myaccount".to_string(),
            repository: "myrepo".to_string(),
            path: "src/app.py".to_string(),
        }
    }

    fn control(commit_id: Option<&str>, commit_message: Option<&str>, pinned: bool) -> Control {
        Control {
            slot: "abcde".to_string(),
            reference: reference(),
            commit_id: commit_id.map(str::to_string),
            commit_message: commit_message.map(str::to_string),
            pinned,
        }
    }

    #[test]
    fn test_display_full() {
        let c = control(Some("0123456789"), Some("Fix parser"), true);
        assert_eq!(
            c.to_string(),
            "{{renderer :github_abcde, myaccount::myrepo:src/app.py, 0123456789, Fix parser, true}}"
        );
    }

    #[test]
    fn test_display_without_commit() {
        let c = control(None, None, false);
        assert_eq!(
            c.to_string(),
            "{{renderer :github_abcde, myaccount::myrepo:src/app.py, false}}"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        for c in [
            control(Some("0123456789"), Some("Fix parser"), true),
            control(Some("0123456789"), None, false),
            control(None, None, true),
        ] {
            assert_eq!(c.to_string().parse::<Control>().unwrap(), c);
        }
    }

    #[test]
    fn test_parse_message_with_commas() {
        let c = control(Some("abc"), Some("Add a, b, and c"), false);
        let parsed: Control = c.to_string().parse().unwrap();
        assert_eq!(parsed.commit_message.as_deref(), Some("Add a, b, and c"));
        assert!(!parsed.is_pinned());
    }

    #[test]
    fn test_path_with_comma_round_trips() {
        let mut c = control(Some("abc"), Some("msg"), false);
        c.reference.path = "docs/a,b%2C.md".to_string();

        let text = c.to_string();
        assert!(text.contains("myaccount::myrepo:docs/a%2Cb%252C.md, abc"));
        assert_eq!(text.parse::<Control>().unwrap(), c);
    }

    #[test]
    fn test_parse_rejects_other_text() {
        assert!(matches!(
            "just some note".parse::<Control>(),
            Err(ControlError::NotAControl(_))
        ));
        assert!(matches!(
            "{{renderer :youtube_abcde, x, true}}".parse::<Control>(),
            Err(ControlError::NotAControl(_))
        ));
        assert_eq!(
            "{{renderer :github_abcde, true}}".parse::<Control>(),
            Err(ControlError::MissingReference)
        );
        assert_eq!(
            "{{renderer :github_abcde, a::b:c.py, maybe}}".parse::<Control>(),
            Err(ControlError::BadPinFlag("maybe".to_string()))
        );
    }

    #[test]
    fn test_pinned_control_refuses_refresh() {
        let mut c = control(Some("abc"), None, true);
        assert_eq!(c.ensure_refreshable(), Err(ControlError::Pinned));

        c.toggle_pin();
        assert_eq!(c.ensure_refreshable(), Ok(()));
        assert!(c.to_string().ends_with(", false}}"));
    }

    #[test]
    fn test_record_keeps_old_values_when_missing() {
        let mut c = control(Some("old"), Some("old message"), false);
        c.record(&RetrievedFile {
            content: String::new(),
            kind: None,
            source_commit_id: Some("new".to_string()),
            source_commit_message: None,
        });

        assert_eq!(c.commit_id.as_deref(), Some("new"));
        assert_eq!(c.commit_message.as_deref(), Some("old message"));
    }

    #[test]
    fn test_new_control_has_random_lowercase_slot() {
        let c = Control::new(reference(), true);
        assert_eq!(c.slot.len(), 5);
        assert!(c.slot.chars().all(|ch| ch.is_ascii_lowercase()));
        assert!(c.is_pinned());
    }

    #[test]
    fn test_label() {
        let c = control(Some("0123456789"), None, true);
        assert_eq!(c.label(), "app.py 🔄 0123456📌");
        assert_eq!(control(None, None, false).label(), "app.py 🔄 ");
    }
}
