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

/// The rating buttons offered to the learner. This table is the only
/// mapping from labels to SM-2 quality values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
    Perfect,
    Excellent,
}

pub const RATINGS: [Rating; 6] = [
    Rating::Again,
    Rating::Hard,
    Rating::Good,
    Rating::Easy,
    Rating::Perfect,
    Rating::Excellent,
];

impl Rating {
    pub fn quality(self) -> u8 {
        match self {
            Rating::Again => 0,
            Rating::Hard => 1,
            Rating::Good => 2,
            Rating::Easy => 3,
            Rating::Perfect => 4,
            Rating::Excellent => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
            Rating::Perfect => "Perfect",
            Rating::Excellent => "Excellent",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rating::Again => "Complete blackout",
            Rating::Hard => "Incorrect response; correct one remembered",
            Rating::Good => "Incorrect response; correct one seemed easy",
            Rating::Easy => "Correct response recalled with serious difficulty",
            Rating::Perfect => "Correct response after a hesitation",
            Rating::Excellent => "Perfect response",
        }
    }

    /// Parse either the quality digit or the label, ignoring case.
    pub fn parse(input: &str) -> Option<Rating> {
        let input = input.trim();
        RATINGS.into_iter().find(|rating| {
            input == rating.quality().to_string() || input.eq_ignore_ascii_case(rating.label())
        })
    }
}
