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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// Name of the configuration file inside a collection directory.
pub const CONFIG_FILE_NAME: &str = "studycards.toml";

pub const DEFAULT_CARDS_PER_SESSION: usize = 20;
pub const MIN_CARDS_PER_SESSION: usize = 5;
pub const MAX_CARDS_PER_SESSION: usize = 50;

/// Per-collection settings, read from `studycards.toml`.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The most cards a drill session will present.
    pub cards_per_session: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cards_per_session: DEFAULT_CARDS_PER_SESSION,
        }
    }
}

impl Config {
    /// Load the configuration file, falling back to the defaults if it does
    /// not exist.
    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            log::debug!("No configuration file, using defaults.");
            return Ok(Self::default());
        }
        log::debug!("Loading configuration from {}", path.display());
        Self::parse(&read_to_string(path)?)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Fallible<()> {
        let range = MIN_CARDS_PER_SESSION..=MAX_CARDS_PER_SESSION;
        if !range.contains(&self.cards_per_session) {
            return fail(format!(
                "cards_per_session must be between {MIN_CARDS_PER_SESSION} and {MAX_CARDS_PER_SESSION}, got {}.",
                self.cards_per_session
            ));
        }
        Ok(())
    }
}
