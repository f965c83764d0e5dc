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

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::session::SessionSummary;
use crate::store::CardStore;
use crate::store::ReviewRecord;
use crate::store::SessionId;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

const CARD_COLUMNS: &str = "card_id, topic, front, back, created_at, ease_factor, interval_days, repetitions, next_review_date";

/// The SQLite card store.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        log::debug!("Opening database at {database_path}");
        let conn = Connection::open(database_path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(mut conn: Connection) -> Fallible<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Insert a new card.
    ///
    /// If a card with the same id exists, returns an error.
    pub fn add_card(&self, card: &Card) -> Fallible<()> {
        if self.contains_card(card.id())? {
            return fail(format!("card {} already exists.", card.id().short()));
        }
        log::debug!("Adding new card: {}", card.id());
        let state = card.state();
        let sql = format!("insert into cards ({CARD_COLUMNS}) values (?, ?, ?, ?, ?, ?, ?, ?, ?);");
        self.conn.execute(
            &sql,
            (
                card.id(),
                card.topic(),
                card.front(),
                card.back(),
                card.created_at(),
                state.ease_factor,
                state.interval_days,
                state.repetitions,
                state.next_review_date,
            ),
        )?;
        Ok(())
    }

    pub fn contains_card(&self, card_id: CardId) -> Fallible<bool> {
        let sql = "select count(*) from cards where card_id = ?;";
        let count: i64 = self.conn.query_row(sql, [card_id], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Get a card by id.
    ///
    /// If no card with the given id exists, returns an error.
    pub fn get_card(&self, card_id: CardId) -> Fallible<Card> {
        let sql = format!("select {CARD_COLUMNS} from cards where card_id = ?;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([card_id])?;
        match rows.next()? {
            Some(row) => Ok(card_from_row(row)?),
            None => fail(format!("no card with id {card_id}.")),
        }
    }

    /// Delete a card and its review history.
    pub fn delete_card(&self, card_id: CardId) -> Fallible<()> {
        let deleted = self
            .conn
            .execute("delete from cards where card_id = ?;", [card_id])?;
        if deleted == 0 {
            return fail(format!("no card with id {card_id}."));
        }
        log::debug!("Deleted card {card_id}");
        Ok(())
    }

    /// Replace a card's review state.
    pub fn update_review_state(&self, card_id: CardId, state: &ReviewState) -> Fallible<()> {
        let sql = "update cards set ease_factor = ?, interval_days = ?, repetitions = ?, next_review_date = ? where card_id = ?;";
        let updated = self.conn.execute(
            sql,
            (
                state.ease_factor,
                state.interval_days,
                state.repetitions,
                state.next_review_date,
                card_id,
            ),
        )?;
        if updated == 0 {
            return fail(format!("no card with id {card_id}."));
        }
        Ok(())
    }

    /// Append a row to the review log.
    pub fn record_review(&self, record: &ReviewRecord) -> Fallible<()> {
        let sql = "insert into reviews (session_id, card_id, reviewed_at, quality, previous_ease_factor, new_ease_factor, previous_interval, new_interval, next_review_date) values (?, ?, ?, ?, ?, ?, ?, ?, ?);";
        self.conn.execute(
            sql,
            (
                record.session_id,
                record.card_id,
                record.reviewed_at,
                record.quality,
                record.previous_ease_factor,
                record.new_ease_factor,
                record.previous_interval,
                record.new_interval,
                record.next_review_date,
            ),
        )?;
        Ok(())
    }

    /// Find the card whose id starts with `prefix`, as printed by `due`.
    pub fn find_card(&self, prefix: &str) -> Fallible<CardId> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return fail(format!("invalid card id: {prefix:?}."));
        }
        let sql = "select card_id from cards where substr(card_id, 1, ?) = ? limit 2;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((prefix.len() as i64, prefix.as_str()))?;
        let mut matches: Vec<CardId> = Vec::new();
        while let Some(row) = rows.next()? {
            matches.push(row.get(0)?);
        }
        match matches.as_slice() {
            [card_id] => Ok(*card_id),
            [] => fail(format!("no card with id {prefix}.")),
            _ => fail(format!("card id {prefix} is ambiguous.")),
        }
    }

    /// Run `f` in a transaction. If it fails, everything it wrote is rolled
    /// back.
    pub fn in_transaction<T>(&self, f: impl FnOnce() -> Fallible<T>) -> Fallible<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f()?;
        tx.commit()?;
        Ok(value)
    }

    pub fn card_count(&self) -> Fallible<usize> {
        self.count("select count(*) from cards;")
    }

    pub fn review_count(&self) -> Fallible<usize> {
        self.count("select count(*) from reviews;")
    }

    pub fn session_count(&self) -> Fallible<usize> {
        self.count("select count(*) from sessions;")
    }

    /// The review log for one card, oldest first.
    pub fn reviews_for_card(&self, card_id: CardId) -> Fallible<Vec<ReviewRecord>> {
        let sql = "select session_id, card_id, reviewed_at, quality, previous_ease_factor, new_ease_factor, previous_interval, new_interval, next_review_date from reviews where card_id = ? order by reviewed_at, review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([card_id])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(ReviewRecord {
                session_id: row.get(0)?,
                card_id: row.get(1)?,
                reviewed_at: row.get(2)?,
                quality: row.get(3)?,
                previous_ease_factor: row.get(4)?,
                new_ease_factor: row.get(5)?,
                previous_interval: row.get(6)?,
                new_interval: row.get(7)?,
                next_review_date: row.get(8)?,
            });
        }
        Ok(records)
    }

    /// The summary of a session, if it was completed.
    pub fn session_summary(&self, session_id: SessionId) -> Fallible<Option<SessionSummary>> {
        let sql = "select started_at, completed_at, duration_minutes, cards_reviewed, correct_answers from sessions where session_id = ?;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([session_id])?;
        let Some(row) = rows.next()? else {
            return fail(format!("no session with id {session_id}."));
        };
        let completed_at: Option<Timestamp> = row.get(1)?;
        match completed_at {
            None => Ok(None),
            Some(completed_at) => Ok(Some(SessionSummary {
                started_at: row.get(0)?,
                completed_at,
                duration_minutes: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                cards_reviewed: row.get::<_, i64>(3)? as usize,
                correct_answers: row.get::<_, i64>(4)? as usize,
            })),
        }
    }

    fn count(&self, sql: &str) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query_cards(&self, sql: &str, params: impl rusqlite::Params) -> Fallible<Vec<Card>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(card_from_row(row)?);
        }
        Ok(cards)
    }
}

impl CardStore for Database {
    fn all_cards(&self) -> Fallible<Vec<Card>> {
        let sql = format!("select {CARD_COLUMNS} from cards;");
        self.query_cards(&sql, [])
    }

    fn cards_in_topic(&self, topic: &str) -> Fallible<Vec<Card>> {
        let sql = format!("select {CARD_COLUMNS} from cards where topic = ?;");
        self.query_cards(&sql, [topic])
    }

    fn apply_review(
        &self,
        card_id: CardId,
        state: &ReviewState,
        record: &ReviewRecord,
    ) -> Fallible<()> {
        self.in_transaction(|| {
            self.update_review_state(card_id, state)?;
            self.record_review(record)
        })
    }

    fn begin_session(&self, topic: Option<&str>, started_at: Timestamp) -> Fallible<SessionId> {
        let sql = "insert into sessions (topic, started_at) values (?, ?) returning session_id;";
        let session_id: SessionId = self
            .conn
            .query_row(sql, (topic, started_at), |row| row.get(0))?;
        log::debug!("Opened session {session_id}");
        Ok(session_id)
    }

    fn complete_session(&self, session_id: SessionId, summary: &SessionSummary) -> Fallible<()> {
        let sql = "update sessions set completed_at = ?, duration_minutes = ?, cards_reviewed = ?, correct_answers = ? where session_id = ?;";
        let updated = self.conn.execute(
            sql,
            (
                summary.completed_at,
                summary.duration_minutes,
                summary.cards_reviewed as i64,
                summary.correct_answers as i64,
                session_id,
            ),
        )?;
        if updated == 0 {
            return fail(format!("no session with id {session_id}."));
        }
        log::debug!("Completed session {session_id}");
        Ok(())
    }
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    let state = ReviewState {
        ease_factor: row.get(5)?,
        interval_days: row.get(6)?,
        repetitions: row.get(7)?,
        next_review_date: row.get(8)?,
    };
    Ok(Card::from_parts(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        state,
    ))
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;
    use crate::sm2::review_card;

    fn t0() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 7, 14, 7, 45, 0).unwrap())
    }

    #[test]
    fn test_add_and_load_cards() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let a = Card::new("Physics", "Unit of force?", "Newton", t0());
        let b = Card::new("Chemistry", "Symbol for gold?", "Au", t0());
        db.add_card(&a)?;
        db.add_card(&b)?;
        assert_eq!(db.card_count()?, 2);
        let mut all = db.all_cards()?;
        all.sort_by_key(|card| card.id());
        let mut expected = vec![a.clone(), b];
        expected.sort_by_key(|card| card.id());
        assert_eq!(all, expected);
        assert_eq!(db.cards_in_topic("Physics")?, vec![a.clone()]);
        assert_eq!(db.get_card(a.id())?, a);
        Ok(())
    }

    #[test]
    fn test_duplicate_card_is_rejected() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Physics", "Unit of force?", "Newton", t0());
        db.add_card(&card)?;
        assert!(db.add_card(&card).is_err());
        assert_eq!(db.card_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_update_review_state() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Physics", "Unit of force?", "Newton", t0());
        db.add_card(&card)?;
        let state = review_card(card.state(), 5, t0())?;
        db.update_review_state(card.id(), &state)?;
        assert_eq!(db.get_card(card.id())?.state(), &state);

        let missing = CardId::of_content("x", "y", "z");
        assert!(db.update_review_state(missing, &state).is_err());
        Ok(())
    }

    #[test]
    fn test_session_and_review_log() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Physics", "Unit of force?", "Newton", t0());
        db.add_card(&card)?;

        let session_id = db.begin_session(Some("Physics"), t0())?;
        assert_eq!(db.session_summary(session_id)?, None);

        let state = review_card(card.state(), 2, t0())?;
        let record = ReviewRecord {
            session_id,
            card_id: card.id(),
            reviewed_at: t0(),
            quality: 2,
            previous_ease_factor: card.state().ease_factor,
            new_ease_factor: state.ease_factor,
            previous_interval: card.state().interval_days,
            new_interval: state.interval_days,
            next_review_date: state.next_review_date,
        };
        db.record_review(&record)?;
        assert_eq!(db.reviews_for_card(card.id())?, vec![record]);
        assert_eq!(db.review_count()?, 1);

        let summary = SessionSummary {
            started_at: t0(),
            completed_at: t0() + Duration::minutes(3),
            duration_minutes: 3,
            cards_reviewed: 1,
            correct_answers: 0,
        };
        db.complete_session(session_id, &summary)?;
        assert_eq!(db.session_summary(session_id)?, Some(summary));
        assert_eq!(db.session_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_delete_card_cascades_to_reviews() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Physics", "Unit of force?", "Newton", t0());
        db.add_card(&card)?;
        let session_id = db.begin_session(None, t0())?;
        let state = review_card(card.state(), 4, t0())?;
        db.record_review(&ReviewRecord {
            session_id,
            card_id: card.id(),
            reviewed_at: t0(),
            quality: 4,
            previous_ease_factor: 2.5,
            new_ease_factor: state.ease_factor,
            previous_interval: 1,
            new_interval: state.interval_days,
            next_review_date: state.next_review_date,
        })?;
        db.delete_card(card.id())?;
        assert_eq!(db.card_count()?, 0);
        assert_eq!(db.review_count()?, 0);
        assert!(db.delete_card(card.id()).is_err());
        Ok(())
    }

    #[test]
    fn test_reopen_keeps_data() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("studycards.db");
        let path = path.to_str().unwrap();
        let card = Card::new("Physics", "Unit of force?", "Newton", t0());
        {
            let db = Database::new(path)?;
            db.add_card(&card)?;
        }
        let db = Database::new(path)?;
        assert_eq!(db.all_cards()?, vec![card]);
        Ok(())
    }

    #[test]
    fn test_apply_review_is_all_or_nothing() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Physics", "Unit of force?", "Newton", t0());
        db.add_card(&card)?;
        let state = review_card(card.state(), 5, t0())?;
        let orphan = ReviewRecord {
            session_id: 42,
            card_id: card.id(),
            reviewed_at: t0(),
            quality: 5,
            previous_ease_factor: card.state().ease_factor,
            new_ease_factor: state.ease_factor,
            previous_interval: card.state().interval_days,
            new_interval: state.interval_days,
            next_review_date: state.next_review_date,
        };
        // No such session: the log insert fails, so the state update is undone.
        assert!(db.apply_review(card.id(), &state, &orphan).is_err());
        assert_eq!(db.get_card(card.id())?.state(), card.state());
        assert_eq!(db.review_count()?, 0);

        let session_id = db.begin_session(None, t0())?;
        let record = ReviewRecord {
            session_id,
            ..orphan
        };
        db.apply_review(card.id(), &state, &record)?;
        assert_eq!(db.get_card(card.id())?.state(), &state);
        assert_eq!(db.reviews_for_card(card.id())?, vec![record]);
        Ok(())
    }

    #[test]
    fn test_find_card() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        let card = Card::new("Physics", "Unit of force?", "Newton", t0());
        db.add_card(&card)?;
        let short = card.id().short();
        assert_eq!(db.find_card(&short)?, card.id());
        assert_eq!(db.find_card(&short.to_uppercase())?, card.id());
        assert_eq!(db.find_card(&card.id().to_hex())?, card.id());
        assert!(db.find_card("").is_err());
        assert!(db.find_card("not-hex").is_err());
        let other = if short.starts_with('0') { "1" } else { "0" };
        assert!(db.find_card(&format!("{other}{}", &short[1..])).is_err());
        Ok(())
    }
}
