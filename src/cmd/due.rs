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

use std::io::Write;

use crate::due::select_due_cards;
use crate::error::Fallible;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// The cards due at `now`, in the order a session would present them.
pub fn due_cards(
    store: &impl CardStore,
    topic: Option<&str>,
    now: Timestamp,
) -> Fallible<Vec<Card>> {
    let cards = match topic {
        Some(topic) => store.cards_in_topic(topic)?,
        None => store.all_cards()?,
    };
    Ok(select_due_cards(cards, now))
}

pub fn print_due_cards(cards: &[Card], output: &mut impl Write) -> Fallible<()> {
    if cards.is_empty() {
        writeln!(output, "No cards due.")?;
        return Ok(());
    }
    for card in cards {
        writeln!(
            output,
            "{}  {}  [{}] {}",
            card.id().short(),
            card.next_review_date(),
            card.topic(),
            card.front()
        )?;
    }
    writeln!(output, "{} cards due.", cards.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::db::Database;

    #[test]
    fn test_due_listing() -> Fallible<()> {
        let t0 = Timestamp::new(Utc.with_ymd_and_hms(2025, 8, 20, 10, 0, 0).unwrap());
        let db = Database::open_in_memory()?;
        let cards = [
            Card::new("History", "Year of the Battle of Hastings?", "1066", t0),
            Card::new("History", "First Roman emperor?", "Augustus", t0 + Duration::hours(1)),
            Card::new("Art", "Painter of the Night Watch?", "Rembrandt", t0 + Duration::days(2)),
        ];
        for card in &cards {
            db.add_card(card)?;
        }

        let due = due_cards(&db, None, t0 + Duration::hours(2))?;
        let fronts: Vec<&str> = due.iter().map(|c| c.front()).collect();
        assert_eq!(
            fronts,
            vec!["Year of the Battle of Hastings?", "First Roman emperor?"]
        );
        assert!(due_cards(&db, Some("Art"), t0 + Duration::hours(2))?.is_empty());

        let mut output = Vec::new();
        print_due_cards(&due, &mut output)?;
        let output = String::from_utf8_lossy(&output);
        assert!(output.contains("2025-08-20 10:00  [History] Year of the Battle of Hastings?"));
        assert!(output.ends_with("2 cards due.\n"));
        Ok(())
    }
}
