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

use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::db::Database;
use crate::due::select_due_cards;
use crate::error::Fallible;
use crate::store::CardStore;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone, Copy)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    card_count: usize,
    due_count: usize,
    review_count: usize,
    session_count: usize,
}

pub fn collection_stats(db: &Database, now: Timestamp) -> Fallible<Stats> {
    Ok(Stats {
        card_count: db.card_count()?,
        due_count: select_due_cards(db.all_cards()?, now).len(),
        review_count: db.review_count()?,
        session_count: db.session_count()?,
    })
}

pub fn print_stats(stats: &Stats, format: StatsFormat, output: &mut impl Write) -> Fallible<()> {
    match format {
        StatsFormat::Text => {
            writeln!(output, "Cards:    {}", stats.card_count)?;
            writeln!(output, "Due now:  {}", stats.due_count)?;
            writeln!(output, "Reviews:  {}", stats.review_count)?;
            writeln!(output, "Sessions: {}", stats.session_count)?;
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(stats)?;
            writeln!(output, "{}", stats_json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::types::card::Card;

    #[test]
    fn test_stats() -> Fallible<()> {
        let now = Timestamp::now();
        let db = Database::open_in_memory()?;
        db.add_card(&Card::new("Music", "Notes in an octave?", "12", now))?;
        db.add_card(&Card::new("Music", "Lines on a staff?", "5", now + Duration::days(1)))?;
        let stats = collection_stats(&db, now)?;
        assert_eq!(
            stats,
            Stats {
                card_count: 2,
                due_count: 1,
                review_count: 0,
                session_count: 0,
            }
        );

        let mut output = Vec::new();
        print_stats(&stats, StatsFormat::Json, &mut output)?;
        let json: serde_json::Value = serde_json::from_slice(&output)?;
        assert_eq!(json["cardCount"], 2);
        assert_eq!(json["dueCount"], 1);
        Ok(())
    }
}
