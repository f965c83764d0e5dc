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

//! A study session over a fixed snapshot of due cards.
//!
//! A session only exists once it has been started, so "not started" is the
//! absence of a `Session` value. From there it is either in progress or
//! complete, and completion is terminal.

use serde::Serialize;

use crate::error::ReviewError;
use crate::sm2::Quality;
use crate::sm2::schedule;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionStatus {
    InProgress,
    Complete,
}

pub struct Session {
    /// The due cards, captured when the session started. Never refreshed.
    cards: Vec<Card>,
    /// Index of the card being presented.
    current_index: usize,
    cards_reviewed: usize,
    correct_answers: usize,
    started_at: Timestamp,
}

/// The result of one accepted review: what the caller must persist.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewOutcome {
    /// The card with its new review state.
    pub card: Card,
    /// The card's review state before this review.
    pub previous: ReviewState,
    pub quality: Quality,
    pub reviewed_at: Timestamp,
}

/// The durable record of a finished session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub started_at: Timestamp,
    pub completed_at: Timestamp,
    pub duration_minutes: i64,
    pub cards_reviewed: usize,
    pub correct_answers: usize,
}

impl Session {
    /// Start a session over `due_cards`, presented in the given order. With
    /// no cards the session is complete from the start.
    pub fn start(due_cards: Vec<Card>, started_at: Timestamp) -> Self {
        log::debug!("Starting session with {} due cards.", due_cards.len());
        Self {
            cards: due_cards,
            current_index: 0,
            cards_reviewed: 0,
            correct_answers: 0,
            started_at,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.current_index >= self.cards.len() {
            SessionStatus::Complete
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == SessionStatus::Complete
    }

    /// The card to present next, or `None` once the session is complete.
    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.current_index)
    }

    /// Grade the card at the cursor and move to the next one.
    ///
    /// The review must be for the current card. Nothing changes if the
    /// review is rejected.
    pub fn submit_review(
        &mut self,
        card_id: CardId,
        quality: u8,
        now: Timestamp,
    ) -> Result<ReviewOutcome, ReviewError> {
        let expected = match self.current_card() {
            Some(card) => card.id(),
            None => return Err(ReviewError::SessionAlreadyComplete),
        };
        if card_id != expected {
            return Err(ReviewError::OutOfOrderReview {
                expected,
                received: card_id,
            });
        }
        let quality = Quality::new(quality)?;

        let card = self.cards[self.current_index].clone();
        let previous = *card.state();
        let card = card.with_state(schedule(&previous, quality, now));
        self.cards[self.current_index] = card.clone();

        self.cards_reviewed += 1;
        if quality.is_pass() {
            self.correct_answers += 1;
        }
        self.current_index += 1;
        log::debug!(
            "Reviewed card {} with quality {}; next due in {} days.",
            card.id().short(),
            quality.value(),
            card.state().interval_days
        );

        Ok(ReviewOutcome {
            card,
            previous,
            quality,
            reviewed_at: now,
        })
    }

    /// Fraction of reviews that passed. Zero before the first review.
    pub fn accuracy(&self) -> f64 {
        if self.cards_reviewed == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.cards_reviewed as f64
        }
    }

    /// Fraction of the snapshot already reviewed, in `0.0..=1.0`. Zero for an
    /// empty session.
    pub fn progress(&self) -> f64 {
        if self.cards.is_empty() {
            0.0
        } else {
            self.current_index.min(self.cards.len()) as f64 / self.cards.len() as f64
        }
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    pub fn cards_reviewed(&self) -> usize {
        self.cards_reviewed
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn summary(&self, completed_at: Timestamp) -> SessionSummary {
        SessionSummary {
            started_at: self.started_at,
            completed_at,
            duration_minutes: completed_at.minutes_since(self.started_at),
            cards_reviewed: self.cards_reviewed,
            correct_answers: self.correct_answers,
        }
    }
}
