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

use crate::error::Fallible;
use crate::session::ReviewOutcome;
use crate::session::SessionSummary;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

pub type SessionId = i64;

/// One row of the review log.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewRecord {
    pub session_id: SessionId,
    pub card_id: CardId,
    pub reviewed_at: Timestamp,
    pub quality: u8,
    pub previous_ease_factor: f64,
    pub new_ease_factor: f64,
    pub previous_interval: u32,
    pub new_interval: u32,
    pub next_review_date: Timestamp,
}

impl ReviewRecord {
    pub fn new(session_id: SessionId, outcome: &ReviewOutcome) -> Self {
        let state = outcome.card.state();
        Self {
            session_id,
            card_id: outcome.card.id(),
            reviewed_at: outcome.reviewed_at,
            quality: outcome.quality.value(),
            previous_ease_factor: outcome.previous.ease_factor,
            new_ease_factor: state.ease_factor,
            previous_interval: outcome.previous.interval_days,
            new_interval: state.interval_days,
            next_review_date: state.next_review_date,
        }
    }
}

/// Where cards and their review history live. Implementations are scoped to
/// a single learner.
pub trait CardStore {
    /// Every card, with its current review state.
    fn all_cards(&self) -> Fallible<Vec<Card>>;

    /// The cards in one topic.
    fn cards_in_topic(&self, topic: &str) -> Fallible<Vec<Card>>;

    /// Replace a card's review state and append the matching row to the
    /// review log. Either both writes land or neither does. Fails if the card
    /// does not exist.
    fn apply_review(
        &self,
        card_id: CardId,
        state: &ReviewState,
        record: &ReviewRecord,
    ) -> Fallible<()>;

    /// Open a session record.
    fn begin_session(&self, topic: Option<&str>, started_at: Timestamp) -> Fallible<SessionId>;

    /// Stamp a session record with its summary.
    fn complete_session(&self, session_id: SessionId, summary: &SessionSummary) -> Fallible<()>;
}
