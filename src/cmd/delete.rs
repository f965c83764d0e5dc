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

/// Delete the card whose id starts with `prefix`, along with its review
/// history. Returns the deleted card.
pub fn delete_card(db: &Database, prefix: &str) -> Fallible<Card> {
    let card = db.get_card(db.find_card(prefix)?)?;
    db.delete_card(card.id())?;
    log::info!("Deleted card {} from {}.", card.id().short(), card.topic());
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_delete_card() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Geography", "Capital of Peru?", "Lima", Timestamp::now());
        db.add_card(&card)?;
        let deleted = delete_card(&db, &card.id().short())?;
        assert_eq!(deleted, card);
        assert_eq!(db.card_count()?, 0);
        assert!(delete_card(&db, &card.id().short()).is_err());
        Ok(())
    }
}
