//! Daily play allowance, persisted under a single key.

use chrono::{NaiveDate, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::LIVES_KEY;
use crate::store::{KeyValueStore, StoreError};

/// Source of "today". Days roll over at UTC midnight in the shipped calendar.
pub trait Calendar {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A fixed date is its own calendar.
impl Calendar for NaiveDate {
    fn today(&self) -> NaiveDate {
        *self
    }
}

/// Stored form: `{ "date": "YYYY-MM-DD", "remainingLives": n }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LivesRecord {
    pub date: NaiveDate,
    pub remaining_lives: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivesState {
    pub date: NaiveDate,
    pub remaining: u32,
}

pub struct LivesManager<S, C> {
    store: S,
    calendar: C,
    allotment: u32,
    state: LivesState,
}

impl<S: KeyValueStore, C: Calendar> LivesManager<S, C> {
    /// Reads the stored record, resetting it when it belongs to another day.
    pub fn load(store: S, calendar: C, allotment: u32) -> Self {
        let today = calendar.today();
        let mut manager = LivesManager {
            store,
            calendar,
            allotment,
            state: LivesState { date: today, remaining: allotment },
        };
        manager.load_lives();
        manager
    }

    pub fn load_lives(&mut self) {
        let today = self.calendar.today();

        match self.read_record() {
            Some(record) if record.date == today => {
                let remaining = record.remaining_lives.clamp(0, self.allotment as i64) as u32;
                self.state = LivesState { date: today, remaining };
                info!("{} lives left for {}", remaining, today);
            }
            _ => {
                info!("New day {}, granting {} lives", today, self.allotment);
                self.state = LivesState { date: today, remaining: self.allotment };
                self.persist();
            }
        }
    }

    /// Reloads if the calendar day moved on since the last load.
    pub fn refresh(&mut self) {
        if self.calendar.today() != self.state.date {
            self.load_lives();
        }
    }

    pub fn can_start(&self) -> bool {
        self.state.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.state.remaining
    }

    pub fn state(&self) -> LivesState {
        self.state
    }

    /// Takes one life from today's allowance, never going below zero. A game
    /// that ran past midnight is charged against the new day's allotment.
    pub fn consume_life_on_game_over(&mut self) -> u32 {
        self.refresh();
        self.state.remaining = self.state.remaining.saturating_sub(1);
        self.persist();
        info!("Life used, {} left", self.state.remaining);
        self.state.remaining
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    ///////////////////////////////////////////////////////////////////////////

    fn read_record(&self) -> Option<LivesRecord> {
        let raw = match self.store.get(LIVES_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("Could not read lives record: {}", err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Discarding malformed lives record {:?}: {}", raw, err);
                None
            }
        }
    }

    fn persist(&mut self) {
        let record = LivesRecord {
            date: self.state.date,
            remaining_lives: self.state.remaining as i64,
        };

        let result = serde_json::to_string(&record)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(LIVES_KEY, &json));

        if let Err(err) = result {
            error!("Failed to save lives record: {}", err);
        }
    }
}
