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

//! The SM-2 scheduler. Every caller goes through [`review_card`]; nothing
//! else in the crate computes ease factors or intervals.

use crate::error::ReviewError;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

/// The ease factor of a card that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// The ease factor never drops below this. There is no upper bound.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// The interval after the first successful recall, and after any failure.
pub const INITIAL_INTERVAL: u32 = 1;

/// The interval after the second consecutive successful recall.
pub const SECOND_INTERVAL: u32 = 6;

/// The longest interval, in days, a card can be scheduled out. Ease has no
/// upper bound, so without this a run of perfect reviews overflows.
pub const MAX_INTERVAL: u32 = 36_500;

/// Ratings at or above this count as a successful recall.
pub const PASS_THRESHOLD: u8 = 3;

/// The highest rating.
pub const MAX_QUALITY: u8 = 5;

/// A recall rating in `0..=5`. Constructing one is the only place a rating
/// is validated.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Result<Self, ReviewError> {
        if value > MAX_QUALITY {
            return Err(ReviewError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether the rating counts as a successful recall.
    pub fn is_pass(self) -> bool {
        self.0 >= PASS_THRESHOLD
    }
}

impl TryFrom<u8> for Quality {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

/// Compute a card's state after a review with the given rating, processed
/// at `now`. Pure: the prior state is not touched.
pub fn review_card(
    prior: &ReviewState,
    quality: u8,
    now: Timestamp,
) -> Result<ReviewState, ReviewError> {
    let quality = Quality::new(quality)?;
    Ok(schedule(prior, quality, now))
}

/// [`review_card`] for an already validated rating.
pub fn schedule(prior: &ReviewState, quality: Quality, now: Timestamp) -> ReviewState {
    // The ease factor moves on every review, pass or fail.
    let ease_factor = new_ease_factor(prior.ease_factor, quality);
    let (interval_days, repetitions) = if quality.is_pass() {
        let repetitions = prior.repetitions + 1;
        let interval = match repetitions {
            1 => INITIAL_INTERVAL,
            2 => SECOND_INTERVAL,
            _ => mature_interval(prior.interval_days, ease_factor),
        };
        (interval, repetitions)
    } else {
        (INITIAL_INTERVAL, 0)
    };
    ReviewState {
        ease_factor: round_to_hundredths(ease_factor),
        interval_days,
        repetitions,
        next_review_date: now.plus_days(interval_days),
    }
}

/// `EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at 1.3.
fn new_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let distance = f64::from(MAX_QUALITY - quality.value());
    let delta = 0.1 - distance * (0.08 + distance * 0.02);
    (ease_factor + delta).max(MIN_EASE_FACTOR)
}

/// `round(I * EF)`, clamped to `1..=MAX_INTERVAL` before leaving `f64`.
fn mature_interval(prior_interval: u32, ease_factor: f64) -> u32 {
    let interval = (f64::from(prior_interval) * ease_factor).round();
    interval.clamp(f64::from(INITIAL_INTERVAL), f64::from(MAX_INTERVAL)) as u32
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
