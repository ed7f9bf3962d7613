use crate::config::HistoryConfig;
use crate::entropy::{Rating, StrengthAssessment};
use crate::error::{HistoryError, StoreCorruption};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const VISIBLE_PREFIX: usize = 4;
const MASK_CHAR: char = '*';
const DESCRIPTION_WIDTH: usize = 20;
const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub password: String,
    pub description: String,
    pub created_at: String,
    pub entropy: f64,
    pub strength: Rating,
}

impl HistoryEntry {
    pub fn new(password: &str, description: &str, assessment: StrengthAssessment) -> Self {
        Self {
            password: password.to_owned(),
            description: description.to_owned(),
            created_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            entropy: assessment.entropy_bits,
            strength: assessment.rating,
        }
    }

    pub fn masked_password(&self) -> String {
        mask(&self.password)
    }
}

fn mask(password: &str) -> String {
    password
        .chars()
        .enumerate()
        .map(|(i, c)| if i < VISIBLE_PREFIX { c } else { MASK_CHAR })
        .collect()
}

/// Entries as read from (or just written to) the history file.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub entries: Vec<HistoryEntry>,
    /// Set when the file could not be parsed and was treated as empty.
    pub corruption: Option<StoreCorruption>,
}

impl Snapshot {
    pub fn render(&self) -> String {
        render_table(&self.entries)
    }
}

pub fn render_table(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No password history found\n".to_owned();
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(
        out,
        "{:<20} | {:<20} | {:<12} | {:<20}",
        "Created At", "Description", "Strength", "Password"
    );
    let _ = writeln!(out, "{}", rule);

    for entry in entries {
        let description: String = entry.description.chars().take(DESCRIPTION_WIDTH).collect();
        let _ = writeln!(
            out,
            "{:<20} | {:<20} | {:<12} | {:<20}",
            entry.created_at,
            description,
            entry.strength,
            entry.masked_password()
        );
    }

    let _ = writeln!(out, "{}\n", rule);
    out
}

/// JSON-file backed, size-bounded log of saved passwords.
///
/// Every mutation reads the whole file and rewrites it. There is no locking:
/// two processes appending at once keep only the last writer's version.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    config: HistoryConfig,
}

impl HistoryStore {
    pub fn new(config: HistoryConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn load(&self) -> Result<Snapshot, HistoryError> {
        let path = self.path();

        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No history file at {}", path.display());
                return Ok(Snapshot::default());
            }
            Err(source) => {
                return Err(HistoryError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        match serde_json::from_slice::<Vec<HistoryEntry>>(&contents) {
            Ok(entries) => {
                log::debug!("Loaded {} history entries from {}", entries.len(), path.display());
                Ok(Snapshot {
                    entries,
                    corruption: None,
                })
            }
            Err(source) => {
                let corruption = StoreCorruption {
                    path: path.to_path_buf(),
                    source,
                };
                log::debug!("{}", corruption);
                Ok(Snapshot {
                    entries: Vec::new(),
                    corruption: Some(corruption),
                })
            }
        }
    }

    /// Overwrites the history file with `entries`.
    pub fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        entries.serialize(&mut serializer)?;

        fs::write(self.path(), &buf).map_err(|source| HistoryError::Io {
            path: self.path().to_path_buf(),
            source,
        })?;

        log::debug!("Wrote {} history entries to {}", entries.len(), self.path().display());
        Ok(())
    }

    /// Appends `entry`, evicting the oldest entries beyond the capacity.
    ///
    /// The returned snapshot holds what was written, plus any corruption
    /// found while reading the previous contents.
    pub fn append(&self, entry: HistoryEntry) -> Result<Snapshot, HistoryError> {
        let mut snapshot = self.load()?;
        snapshot.entries.push(entry);

        let max = self.config.max_entries;
        if snapshot.entries.len() > max {
            let excess = snapshot.entries.len() - max;
            snapshot.entries.drain(..excess);
            log::debug!("Evicted {} oldest history entries", excess);
        }

        self.save(&snapshot.entries)?;
        Ok(snapshot)
    }

    pub fn render(&self) -> Result<String, HistoryError> {
        Ok(self.load()?.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, max_entries: usize) -> HistoryStore {
        HistoryStore::new(HistoryConfig {
            path: dir.path().join("history.json"),
            max_entries,
        })
    }

    fn entry(password: &str, description: &str) -> HistoryEntry {
        HistoryEntry {
            password: password.to_string(),
            description: description.to_string(),
            created_at: "2024-03-01 12:30:00".to_string(),
            entropy: 10.5,
            strength: Rating::VeryWeak,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let snapshot = store_in(&dir, 10).load().unwrap();

        assert!(snapshot.entries.is_empty());
        assert!(snapshot.corruption.is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, 10);
        let entries = vec![entry("Abcd1234!", "mail"), entry("Zz9#Zz9#", "")];

        store.save(&entries).unwrap();
        let snapshot = store.load().unwrap();

        assert_eq!(snapshot.entries, entries);
        assert!(snapshot.corruption.is_none());
    }

    #[test]
    fn test_file_layout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, 10);
        store.save(&[entry("Abcd1234!", "mail")]).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();

        assert_eq!(value[0]["password"], "Abcd1234!");
        assert_eq!(value[0]["description"], "mail");
        assert_eq!(value[0]["created_at"], "2024-03-01 12:30:00");
        assert_eq!(value[0]["entropy"], 10.5);
        assert_eq!(value[0]["strength"], "Very Weak");
        assert!(contents.contains("\n        \"password\""), "Expected 4-space indentation");
    }

    #[test]
    fn test_reads_foreign_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, 10);
        fs::write(
            store.path(),
            r#"[{"password": "Qw3!rty", "description": "router", "created_at": "2023-11-05 08:00:01", "entropy": 7, "strength": "Very Strong"}]"#,
        )
        .unwrap();

        let snapshot = store.load().unwrap();

        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].entropy, 7.0);
        assert_eq!(snapshot.entries[0].strength, Rating::VeryStrong);
    }

    #[test]
    fn test_append_evicts_oldest() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, 3);

        for i in 0..5 {
            store.append(entry(&format!("pass{}", i), &i.to_string())).unwrap();
        }

        let descriptions: Vec<String> = store
            .load()
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.description)
            .collect();
        assert_eq!(descriptions, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_corrupted_file_recovery() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, 10);
        fs::write(store.path(), "[{ not json").unwrap();

        let snapshot = store.load().unwrap();
        assert!(snapshot.entries.is_empty());
        assert!(snapshot.corruption.is_some());

        let written = store.append(entry("Abcd1234!", "fresh")).unwrap();
        assert!(written.corruption.is_some());
        assert_eq!(written.entries.len(), 1);

        let reloaded = store.load().unwrap();
        assert!(reloaded.corruption.is_none());
        assert_eq!(reloaded.entries, vec![entry("Abcd1234!", "fresh")]);
    }

    #[test]
    fn test_invalid_utf8_is_corruption() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, 10);
        fs::write(store.path(), [0xff, 0xfe, b'[', b']']).unwrap();

        let snapshot = store.load().unwrap();
        assert!(snapshot.entries.is_empty());
        assert!(snapshot.corruption.is_some());

        store.append(entry("Abcd1234!", "fresh")).unwrap();

        let reloaded = store.load().unwrap();
        assert!(reloaded.corruption.is_none());
        assert_eq!(reloaded.entries, vec![entry("Abcd1234!", "fresh")]);
    }

    #[test]
    fn test_wrong_shape_is_corruption() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, 10);
        fs::write(store.path(), r#"{"password": "x"}"#).unwrap();

        let snapshot = store.load().unwrap();
        assert!(snapshot.entries.is_empty());
        assert!(snapshot.corruption.is_some());
    }

    #[test]
    fn test_unwritable_path_is_fatal() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(HistoryConfig {
            path: dir.path().join("missing").join("history.json"),
            max_entries: 10,
        });

        let err = store.append(entry("Abcd1234!", "")).unwrap_err();
        assert!(matches!(err, HistoryError::Io { .. }));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("Abcd1234!"), "Abcd*****");
        assert_eq!(mask("Abcd"), "Abcd");
        assert_eq!(mask("Ab"), "Ab");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_render_table() {
        let entries = vec![
            entry("Abcd1234!", "mail"),
            entry("Wxyz", "a description that is far too long"),
        ];

        let table = render_table(&entries);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[1], "=".repeat(80));
        assert_eq!(
            lines[2],
            format!(
                "Created At{} | Description{} | Strength{} | Password{}",
                " ".repeat(10),
                " ".repeat(9),
                " ".repeat(4),
                " ".repeat(12)
            )
        );
        assert_eq!(
            lines[4],
            format!(
                "2024-03-01 12:30:00{} | mail{} | Very Weak{} | Abcd*****{}",
                " ".repeat(1),
                " ".repeat(16),
                " ".repeat(3),
                " ".repeat(11)
            )
        );
        assert_eq!(
            lines[5],
            format!(
                "2024-03-01 12:30:00  | a description that i | Very Weak{} | Wxyz{}",
                " ".repeat(3),
                " ".repeat(16)
            )
        );
        assert_eq!(lines[6], "=".repeat(80));
    }

    #[test]
    fn test_render_empty() {
        let dir = TempDir::new().unwrap();
        let table = store_in(&dir, 10).render().unwrap();
        assert_eq!(table, "No password history found\n");
    }

    #[test]
    fn test_new_entry_timestamp_format() {
        let assessment = crate::entropy::assess("Abcd1234!");
        let entry = HistoryEntry::new("Abcd1234!", "", assessment);

        assert!(chrono::NaiveDateTime::parse_from_str(&entry.created_at, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(entry.entropy, assessment.entropy_bits);
        assert_eq!(entry.strength, assessment.rating);
    }
}
