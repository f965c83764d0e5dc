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

//! studycards: a local spaced repetition tool.
//!
//! - [`sm2`]: the SM-2 scheduler, a pure function from a card's review state
//!   and a rating to its next review state.
//! - [`due`] and [`session`]: due-set selection and the study session state
//!   machine.
//! - [`study`]: wires a session to a [`store::CardStore`] and a
//!   [`clock::Clock`].
//! - [`db`]: the SQLite card store.

pub mod cli;
pub mod clock;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod db;
pub mod due;
pub mod error;
pub mod session;
pub mod sm2;
pub mod store;
pub mod study;
pub mod types;

pub use error::ErrorReport;
pub use error::Fallible;
pub use error::ReviewError;
pub use error::fail;
pub use session::Session;
pub use session::SessionStatus;
pub use sm2::Quality;
pub use sm2::review_card;
pub use types::card::Card;
pub use types::card_id::CardId;
pub use types::review_state::ReviewState;
pub use types::timestamp::Timestamp;
