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

use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;

use crate::cmd::add::add_card;
use crate::cmd::delete::delete_card;
use crate::cmd::drill::drill;
use crate::cmd::due::due_cards;
use crate::cmd::due::print_due_cards;
use crate::cmd::history::print_history;
use crate::cmd::import::import_decks;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::collection_stats;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Add a card. New cards are due immediately.
    Add {
        /// The question.
        front: String,
        /// The answer.
        back: String,
        /// The topic the card belongs to.
        #[arg(long)]
        topic: Option<String>,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Import cards from a TOML deck file, or every deck file under a directory.
    ///
    /// If any deck fails to parse, nothing is imported.
    Import {
        /// Path to a deck file or a directory of deck files.
        path: PathBuf,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// List the cards due now, in review order.
    Due {
        /// Only list cards in this topic.
        #[arg(long)]
        topic: Option<String>,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Review the cards due now.
    Drill {
        /// Only review cards in this topic.
        #[arg(long)]
        topic: Option<String>,
        /// The most cards to review. Defaults to `cards_per_session` from the configuration.
        #[arg(long)]
        limit: Option<usize>,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Delete a card and its review history.
    Delete {
        /// The card id, or a unique prefix of it as printed by `due`.
        card: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Show a card's review history.
    History {
        /// The card id, or a unique prefix of it as printed by `due`.
        card: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Print collection statistics.
    Stats {
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Add {
            front,
            back,
            topic,
            directory,
        } => {
            let collection = Collection::new(directory)?;
            let card = add_card(
                &collection.db,
                topic.as_deref(),
                &front,
                &back,
                Timestamp::now(),
            )?;
            println!("Added card {}.", card.id().short());
            Ok(())
        }
        Command::Import { path, directory } => {
            let collection = Collection::new(directory)?;
            let report = import_decks(&collection.db, &path, Timestamp::now())?;
            println!(
                "Imported {} cards from {} files ({} already present).",
                report.added, report.files, report.skipped
            );
            Ok(())
        }
        Command::Due { topic, directory } => {
            let collection = Collection::new(directory)?;
            let cards = due_cards(&collection.db, topic.as_deref(), Timestamp::now())?;
            print_due_cards(&cards, &mut stdout())
        }
        Command::Drill {
            topic,
            limit,
            directory,
        } => {
            let collection = Collection::new(directory)?;
            drill(collection, topic, limit)
        }
        Command::Delete { card, directory } => {
            let collection = Collection::new(directory)?;
            let card = delete_card(&collection.db, &card)?;
            println!("Deleted card {}.", card.id().short());
            Ok(())
        }
        Command::History { card, directory } => {
            let collection = Collection::new(directory)?;
            print_history(&collection.db, &card, &mut stdout())
        }
        Command::Stats { format, directory } => {
            let collection = Collection::new(directory)?;
            let stats = collection_stats(&collection.db, Timestamp::now())?;
            print_stats(&stats, format, &mut stdout())
        }
    }
}
