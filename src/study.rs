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

use thiserror::Error;

use crate::clock::Clock;
use crate::due::select_due_cards;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::ReviewError;
use crate::session::ReviewOutcome;
use crate::session::Session;
use crate::store::CardStore;
use crate::store::ReviewRecord;
use crate::store::SessionId;
use crate::types::card_id::CardId;

/// Ties a session to the store and clock: selects the due set, persists
/// every review as soon as it is accepted, and records the summary when the
/// session completes.
pub struct Study<S: CardStore, C: Clock> {
    store: S,
    clock: C,
}

/// A session together with the id of its record in the store.
pub struct StudySession {
    id: SessionId,
    session: Session,
}

impl StudySession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    /// The session rejected the review. Nothing was changed.
    #[error(transparent)]
    Review(#[from] ReviewError),
    /// The session accepted the review but persisting it failed. The outcome
    /// can be handed back to [`Study::save`] to retry.
    #[error("failed to save review: {source}")]
    Persist {
        outcome: Box<ReviewOutcome>,
        source: ErrorReport,
    },
    /// Every review was saved but the session summary was not.
    #[error("failed to save session summary: {0}")]
    Summary(ErrorReport),
}

impl From<SubmitError> for ErrorReport {
    fn from(value: SubmitError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

impl<S: CardStore, C: Clock> Study<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start a session over the cards due now, optionally restricted to one
    /// topic, with at most `limit` cards. The due set is captured here and
    /// never re-queried.
    pub fn start(&self, topic: Option<&str>, limit: usize) -> Fallible<StudySession> {
        let now = self.clock.now();
        let cards = match topic {
            Some(topic) => self.store.cards_in_topic(topic)?,
            None => self.store.all_cards()?,
        };
        let mut due = select_due_cards(cards, now);
        if due.len() > limit {
            log::debug!("Limiting session to {limit} of {} due cards.", due.len());
            due.truncate(limit);
        }
        let id = self.store.begin_session(topic, now)?;
        let session = Session::start(due, now);
        if session.is_complete() {
            log::info!("No cards due.");
            self.store.complete_session(id, &session.summary(now))?;
        } else {
            log::info!("Session {id} started with {} cards.", session.total_cards());
        }
        Ok(StudySession { id, session })
    }

    /// Grade the current card of `study`, persist the result, and close the
    /// session record if this was the last card.
    pub fn submit(
        &self,
        study: &mut StudySession,
        card_id: CardId,
        quality: u8,
    ) -> Result<ReviewOutcome, SubmitError> {
        let now = self.clock.now();
        let outcome = study.session.submit_review(card_id, quality, now)?;
        self.save(study, outcome)
    }

    /// Persist a review the session has accepted, and close the session
    /// record if it was the last card. This is also how a review returned in
    /// [`SubmitError::Persist`] is retried.
    pub fn save(
        &self,
        study: &StudySession,
        outcome: ReviewOutcome,
    ) -> Result<ReviewOutcome, SubmitError> {
        let record = ReviewRecord::new(study.id, &outcome);
        let card = &outcome.card;
        if let Err(source) = self.store.apply_review(card.id(), card.state(), &record) {
            log::warn!("Failed to save review of card {}: {source}", card.id().short());
            return Err(SubmitError::Persist {
                outcome: Box::new(outcome),
                source,
            });
        }
        if study.session.is_complete() {
            let summary = study.session.summary(outcome.reviewed_at);
            self.store
                .complete_session(study.id, &summary)
                .map_err(SubmitError::Summary)?;
            log::info!(
                "Session {} complete: {} of {} correct in {} minutes.",
                study.id,
                summary.correct_answers,
                summary.cards_reviewed,
                summary.duration_minutes
            );
        }
        Ok(outcome)
    }

    /// Stop a session early. Reviews already submitted stay saved; the
    /// session record is left without a summary.
    pub fn abandon(&self, study: StudySession) {
        log::info!(
            "Session {} abandoned after {} of {} cards.",
            study.id,
            study.session.cards_reviewed(),
            study.session.total_cards()
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::db::Database;
    use crate::store::testing::FlakyStore;
    use crate::types::card::Card;
    use crate::types::timestamp::Timestamp;

    fn t0() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 9, 1, 19, 0, 0).unwrap())
    }

    fn study_with(cards: &[Card]) -> Fallible<Study<Database, ManualClock>> {
        let db = Database::open_in_memory()?;
        for card in cards {
            db.add_card(card)?;
        }
        Ok(Study::new(db, ManualClock::new(t0() + Duration::hours(1))))
    }

    fn current(study: &StudySession) -> CardId {
        study.session().current_card().map(|c| c.id()).unwrap()
    }

    #[test]
    fn test_full_session() -> Fallible<()> {
        let cards = vec![
            Card::new("Spanish", "dog", "perro", t0()),
            Card::new("Spanish", "cat", "gato", t0()),
            Card::new("Spanish", "bird", "pájaro", t0()),
        ];
        let study = study_with(&cards)?;
        let mut session = study.start(None, 20)?;
        assert_eq!(session.session().total_cards(), 3);

        for quality in [5, 1, 4] {
            study.clock().advance(Duration::minutes(2));
            let id = current(&session);
            let outcome = study.submit(&mut session, id, quality)?;
            let stored = study.store().get_card(id)?;
            assert_eq!(stored.state(), outcome.card.state());
        }
        assert!(session.session().is_complete());
        assert_eq!(study.store().review_count()?, 3);

        let summary = study.store().session_summary(session.id())?.unwrap();
        assert_eq!(summary.cards_reviewed, 3);
        assert_eq!(summary.correct_answers, 2);
        assert_eq!(summary.duration_minutes, 6);
        Ok(())
    }

    #[test]
    fn test_due_set_is_a_snapshot() -> Fallible<()> {
        let now_due = Card::new("Spanish", "dog", "perro", t0());
        let later = Card::new("Spanish", "cat", "gato", t0() + Duration::hours(2));
        let study = study_with(&[now_due, later])?;
        let mut session = study.start(None, 20)?;
        assert_eq!(session.session().total_cards(), 1);

        study.clock().advance(Duration::hours(3));
        let id = current(&session);
        study.submit(&mut session, id, 4)?;
        assert!(session.session().is_complete());
        assert_eq!(session.session().total_cards(), 1);

        // A fresh session sees the card that became due in the meantime.
        let next = study.start(None, 20)?;
        assert_eq!(next.session().total_cards(), 1);
        assert_ne!(current(&next), id);
        Ok(())
    }

    #[test]
    fn test_reviewed_cards_leave_the_due_set() -> Fallible<()> {
        let study = study_with(&[Card::new("Spanish", "dog", "perro", t0())])?;
        let mut session = study.start(None, 20)?;
        let id = current(&session);
        study.submit(&mut session, id, 3)?;

        let next = study.start(None, 20)?;
        assert!(next.session().is_complete());
        assert!(study.store().session_summary(next.id())?.is_some());
        Ok(())
    }

    #[test]
    fn test_limit_and_topic() -> Fallible<()> {
        let cards = vec![
            Card::new("Spanish", "dog", "perro", t0()),
            Card::new("Spanish", "cat", "gato", t0()),
            Card::new("French", "dog", "chien", t0()),
        ];
        let study = study_with(&cards)?;
        assert_eq!(study.start(None, 2)?.session().total_cards(), 2);
        let french = study.start(Some("French"), 20)?;
        assert_eq!(french.session().total_cards(), 1);
        assert_eq!(
            french.session().current_card().map(|c| c.back()),
            Some("chien")
        );
        Ok(())
    }

    #[test]
    fn test_rejected_review_is_not_persisted() -> Fallible<()> {
        let cards = vec![
            Card::new("Spanish", "dog", "perro", t0()),
            Card::new("Spanish", "cat", "gato", t0()),
        ];
        let study = study_with(&cards)?;
        let mut session = study.start(None, 20)?;
        let first = current(&session);
        let other = cards.iter().map(|c| c.id()).find(|id| *id != first).unwrap();

        let result = study.submit(&mut session, other, 4);
        assert!(matches!(
            result,
            Err(SubmitError::Review(ReviewError::OutOfOrderReview { .. }))
        ));
        let result = study.submit(&mut session, first, 9);
        assert!(matches!(
            result,
            Err(SubmitError::Review(ReviewError::InvalidQuality(9)))
        ));
        assert_eq!(study.store().review_count()?, 0);
        Ok(())
    }

    #[test]
    fn test_abandoned_session_keeps_submitted_reviews() -> Fallible<()> {
        let cards = vec![
            Card::new("Spanish", "dog", "perro", t0()),
            Card::new("Spanish", "cat", "gato", t0()),
        ];
        let study = study_with(&cards)?;
        let mut session = study.start(None, 20)?;
        let id = current(&session);
        study.submit(&mut session, id, 5)?;
        let session_id = session.id();
        study.abandon(session);

        assert_eq!(study.store().review_count()?, 1);
        assert_eq!(study.store().get_card(id)?.state().repetitions, 1);
        assert_eq!(study.store().session_summary(session_id)?, None);
        Ok(())
    }

    #[test]
    fn test_failed_save_can_be_retried() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Spanish", "dog", "perro", t0());
        db.add_card(&card)?;
        let study = Study::new(FlakyStore::new(db, 1), ManualClock::new(t0()));
        let mut session = study.start(None, 20)?;

        let result = study.submit(&mut session, card.id(), 4);
        let Err(SubmitError::Persist { outcome, .. }) = result else {
            panic!("the first save should fail");
        };
        assert!(session.session().is_complete());
        assert_eq!(study.store().db.review_count()?, 0);
        assert_eq!(study.store().db.get_card(card.id())?.state(), card.state());
        assert_eq!(study.store().db.session_summary(session.id())?, None);

        study.save(&session, *outcome)?;
        assert_eq!(study.store().db.review_count()?, 1);
        assert_eq!(study.store().db.get_card(card.id())?.state().repetitions, 1);
        assert!(study.store().db.session_summary(session.id())?.is_some());
        Ok(())
    }
}
