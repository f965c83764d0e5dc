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

use crate::db::Database;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// The topic given to cards added without one.
pub const DEFAULT_TOPIC: &str = "General";

/// Create a card, due immediately.
pub fn add_card(
    db: &Database,
    topic: Option<&str>,
    front: &str,
    back: &str,
    now: Timestamp,
) -> Fallible<Card> {
    let card = Card::new(topic.unwrap_or(DEFAULT_TOPIC), front, back, now);
    db.add_card(&card)?;
    log::info!("Added card {} to {}.", card.id().short(), card.topic());
    Ok(card)
}
