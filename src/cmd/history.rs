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

use crate::db::Database;
use crate::error::Fallible;

/// Print a card and every review it has had, oldest first.
pub fn print_history(db: &Database, prefix: &str, output: &mut impl Write) -> Fallible<()> {
    let card = db.get_card(db.find_card(prefix)?)?;
    writeln!(output, "[{}] {}", card.topic(), card.front())?;
    writeln!(output, "{}", card.back())?;
    let reviews = db.reviews_for_card(card.id())?;
    if reviews.is_empty() {
        writeln!(output, "Never reviewed.")?;
    }
    for review in &reviews {
        writeln!(
            output,
            "{}  quality {}  ease {:.2} -> {:.2}  interval {} -> {} days",
            review.reviewed_at,
            review.quality,
            review.previous_ease_factor,
            review.new_ease_factor,
            review.previous_interval,
            review.new_interval
        )?;
    }
    let state = card.state();
    writeln!(
        output,
        "Next review {} (ease {:.2}, {} repetitions).",
        state.next_review_date, state.ease_factor, state.repetitions
    )?;
    Ok(())
}
