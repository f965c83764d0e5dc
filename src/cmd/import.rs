// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::CONFIG_FILE_NAME;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// A deck file: an optional topic and a list of cards.
///
/// ```toml
/// topic = "Spanish"
///
/// [[cards]]
/// front = "dog"
/// back = "perro"
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckFile {
    topic: Option<String>,
    #[serde(default)]
    cards: Vec<DeckCard>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckCard {
    front: String,
    back: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportReport {
    pub files: usize,
    pub added: usize,
    /// Cards already in the database.
    pub skipped: usize,
}

/// Import a deck file, or every `.toml` deck under a directory. Cards that
/// already exist keep their review state. The import is all or nothing: one
/// bad deck and no cards are added.
pub fn import_decks(db: &Database, path: &Path, now: Timestamp) -> Fallible<ImportReport> {
    if !path.exists() {
        return fail(format!("{} does not exist.", path.display()));
    }
    let report = db.in_transaction(|| {
        let mut report = ImportReport::default();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let file = entry.path();
            if !file.is_file() || file.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            if file.file_name().is_some_and(|name| name == CONFIG_FILE_NAME) {
                continue;
            }
            import_file(db, file, now, &mut report)?;
        }
        Ok(report)
    })?;
    log::info!(
        "Imported {} files: {} cards added, {} skipped.",
        report.files,
        report.added,
        report.skipped
    );
    Ok(report)
}

fn import_file(
    db: &Database,
    file: &Path,
    now: Timestamp,
    report: &mut ImportReport,
) -> Fallible<()> {
    log::debug!("Importing {}", file.display());
    let deck: DeckFile = match toml::from_str(&read_to_string(file)?) {
        Ok(deck) => deck,
        Err(e) => return fail(format!("{}: {e}", file.display())),
    };
    let topic = match deck.topic {
        Some(topic) => topic,
        None => file
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default(),
    };
    for entry in deck.cards {
        let card = Card::new(topic.as_str(), entry.front, entry.back, now);
        if db.contains_card(card.id())? {
            report.skipped += 1;
        } else {
            db.add_card(&card)?;
            report.added += 1;
        }
    }
    report.files += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::store::CardStore;

    const SPANISH: &str = r#"
topic = "Spanish"

[[cards]]
front = "dog"
back = "perro"

[[cards]]
front = "cat"
back = "gato"
"#;

    const FRENCH: &str = r#"
[[cards]]
front = "dog"
back = "chien"
"#;

    #[test]
    fn test_import_directory() -> Fallible<()> {
        let dir = tempdir()?;
        create_dir_all(dir.path().join("languages"))?;
        write(dir.path().join("languages/spanish.toml"), SPANISH)?;
        write(dir.path().join("languages/french.toml"), FRENCH)?;
        write(dir.path().join("notes.md"), "# not a deck")?;
        write(dir.path().join(CONFIG_FILE_NAME), "cards_per_session = 10")?;

        let db = Database::open_in_memory()?;
        let report = import_decks(&db, dir.path(), Timestamp::now())?;
        assert_eq!(
            report,
            ImportReport {
                files: 2,
                added: 3,
                skipped: 0,
            }
        );
        assert_eq!(db.cards_in_topic("french")?.len(), 1);
        assert_eq!(db.cards_in_topic("Spanish")?.len(), 2);

        let again = import_decks(&db, dir.path(), Timestamp::now())?;
        assert_eq!(again.added, 0);
        assert_eq!(again.skipped, 3);
        Ok(())
    }

    #[test]
    fn test_invalid_deck() -> Fallible<()> {
        let dir = tempdir()?;
        let file = dir.path().join("broken.toml");
        write(&file, "[[cards]]\nfront = \"only a front\"\n")?;
        let db = Database::open_in_memory()?;
        assert!(import_decks(&db, &file, Timestamp::now()).is_err());
        assert_eq!(db.card_count()?, 0);
        Ok(())
    }

    #[test]
    fn test_bad_deck_rolls_back_the_whole_import() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("a_spanish.toml"), SPANISH)?;
        write(dir.path().join("b_broken.toml"), "[[cards]]\nfront = 1\n")?;
        write(dir.path().join("c_french.toml"), FRENCH)?;
        let db = Database::open_in_memory()?;
        assert!(import_decks(&db, dir.path(), Timestamp::now()).is_err());
        assert_eq!(db.card_count()?, 0);
        Ok(())
    }

    #[test]
    fn test_missing_path() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let missing = Path::new("./no/such/deck.toml");
        assert!(import_decks(&db, missing, Timestamp::now()).is_err());
        Ok(())
    }
}
