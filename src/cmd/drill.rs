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

pub mod rating;

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::cmd::drill::rating::RATINGS;
use crate::cmd::drill::rating::Rating;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::CardStore;
use crate::study::Study;
use crate::study::SubmitError;

/// How many times a review is written before the session is given up.
const SAVE_ATTEMPTS: usize = 3;

/// Run a drill session in the terminal.
pub fn drill(
    collection: Collection,
    topic: Option<String>,
    limit: Option<usize>,
) -> Fallible<()> {
    let limit = limit.unwrap_or(collection.config.cards_per_session);
    if limit == 0 {
        return fail("the card limit must be at least 1.");
    }
    let study = Study::new(collection.db, SystemClock);
    let mut input = stdin().lock();
    let mut output = stdout();
    run_drill(&study, topic.as_deref(), limit, &mut input, &mut output)
}

enum Prompt {
    Line(String),
    Quit,
}

fn read_prompt(input: &mut impl BufRead) -> Fallible<Prompt> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Prompt::Quit);
    }
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        Ok(Prompt::Quit)
    } else {
        Ok(Prompt::Line(line.to_string()))
    }
}

/// The drill loop, over arbitrary input and output so it can be driven from
/// tests. Entering `q` (or closing the input) abandons the session.
pub fn run_drill<S: CardStore, C: Clock>(
    study: &Study<S, C>,
    topic: Option<&str>,
    limit: usize,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<()> {
    let mut session = study.start(topic, limit)?;
    if session.session().is_complete() {
        writeln!(output, "No cards due.")?;
        return Ok(());
    }

    while let Some(card) = session.session().current_card().cloned() {
        let position = session.session().cards_reviewed() + 1;
        let total = session.session().total_cards();
        writeln!(output)?;
        writeln!(output, "[{position}/{total}] {}", card.topic())?;
        writeln!(output, "Q: {}", card.front())?;
        writeln!(output, "[press enter to reveal, q to quit]")?;
        output.flush()?;
        if let Prompt::Quit = read_prompt(input)? {
            study.abandon(session);
            writeln!(output, "Session abandoned.")?;
            return Ok(());
        }
        writeln!(output, "A: {}", card.back())?;

        let rating = loop {
            for rating in RATINGS {
                writeln!(
                    output,
                    "  {} = {} ({})",
                    rating.quality(),
                    rating.label(),
                    rating.description()
                )?;
            }
            write!(output, "Grade: ")?;
            output.flush()?;
            match read_prompt(input)? {
                Prompt::Quit => {
                    study.abandon(session);
                    writeln!(output, "Session abandoned.")?;
                    return Ok(());
                }
                Prompt::Line(line) => match Rating::parse(&line) {
                    Some(rating) => break rating,
                    None => writeln!(output, "Invalid grade: {line:?}.")?,
                },
            }
        };
        let mut result = study.submit(&mut session, card.id(), rating.quality());
        let mut attempts = 1;
        loop {
            match result {
                Ok(_) => break,
                Err(SubmitError::Persist { outcome, .. }) if attempts < SAVE_ATTEMPTS => {
                    attempts += 1;
                    result = study.save(&session, *outcome);
                }
                Err(SubmitError::Persist { outcome, source }) => {
                    let card_id = outcome.card.id();
                    study.abandon(session);
                    return fail(format!(
                        "the review of card {} was not saved: {source}",
                        card_id.short()
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    let session = session.session();
    writeln!(output)?;
    writeln!(output, "Session complete.")?;
    writeln!(output, "Cards reviewed: {}", session.cards_reviewed())?;
    writeln!(output, "Accuracy: {:.0}%", session.accuracy() * 100.0)?;
    writeln!(
        output,
        "Duration: {} minutes",
        study.clock().now().minutes_since(session.started_at())
    )?;
    Ok(())
}
