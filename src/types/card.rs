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

use serde::Serialize;

use crate::types::card_id::CardId;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

/// A question and answer pair together with its scheduling state.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// The content hash of the topic, front, and back.
    id: CardId,
    /// The topic this card belongs to.
    topic: String,
    front: String,
    back: String,
    created_at: Timestamp,
    state: ReviewState,
}

impl Card {
    /// A new card, due immediately.
    pub fn new(
        topic: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        let topic = topic.into().trim().to_string();
        let front = front.into().trim().to_string();
        let back = back.into().trim().to_string();
        let id = CardId::of_content(&topic, &front, &back);
        Self {
            id,
            topic,
            front,
            back,
            created_at,
            state: ReviewState::new(created_at),
        }
    }

    /// Rebuild a card loaded from storage.
    pub fn from_parts(
        id: CardId,
        topic: String,
        front: String,
        back: String,
        created_at: Timestamp,
        state: ReviewState,
    ) -> Self {
        Self {
            id,
            topic,
            front,
            back,
            created_at,
            state,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn next_review_date(&self) -> Timestamp {
        self.state.next_review_date
    }

    /// The same card with a new review state.
    pub fn with_state(self, state: ReviewState) -> Self {
        Self { state, ..self }
    }
}
