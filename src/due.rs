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

use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// Select the cards due at `now`, earliest due first. Cards due at the same
/// instant are ordered by id, so the result depends only on the input set.
pub fn select_due_cards(cards: impl IntoIterator<Item = Card>, now: Timestamp) -> Vec<Card> {
    let mut due: Vec<Card> = cards
        .into_iter()
        .filter(|card| card.state().is_due(now))
        .collect();
    due.sort_by(|a, b| {
        a.next_review_date()
            .cmp(&b.next_review_date())
            .then_with(|| a.id().cmp(&b.id()))
    });
    due
}
