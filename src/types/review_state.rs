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

use crate::sm2::INITIAL_EASE_FACTOR;
use crate::sm2::INITIAL_INTERVAL;
use crate::types::timestamp::Timestamp;

/// The scheduling state attached to every card. Replaced as a whole after
/// each review, never patched field by field.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    /// How fast the interval grows after a successful recall. Never below
    /// 1.3.
    pub ease_factor: f64,
    /// Days until the next review. Never below 1.
    pub interval_days: u32,
    /// Consecutive successful recalls since the last failure.
    pub repetitions: u32,
    /// When the card becomes due.
    pub next_review_date: Timestamp,
}

impl ReviewState {
    /// The state of a card that has never been reviewed. It is due at
    /// `created_at`.
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            ease_factor: INITIAL_EASE_FACTOR,
            interval_days: INITIAL_INTERVAL,
            repetitions: 0,
            next_review_date: created_at,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review_date <= now
    }
}
