use crate::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The capacity of each per-difficulty ranking.
pub const MAX_SCORES: usize = 5;
/// The placeholder for an unfilled ranking slot.
pub const UNSET_INITIALS: &str = "---";
/// The time of an unfilled ranking slot. Doubles as "worse than anything achievable": the in-game
/// timer forces a loss before it can reach this value.
pub const UNSET_TIME: u16 = 999;

/// One leaderboard row: three initials and a completion time in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub initials: String,
    pub time: u16,
}

impl ScoreEntry {
    /// The placeholder entry an empty slot holds.
    pub fn sentinel() -> Self {
        ScoreEntry {
            initials: UNSET_INITIALS.to_string(),
            time: UNSET_TIME,
        }
    }
}

/// The per-difficulty rankings, each ascending by time.
///
/// This is also the on-disk document: the serde shape *is* the validation the load path applies.
/// A file missing a difficulty key, holding a non-list, or holding an entry without both fields
/// fails to deserialize and the ledger falls back to [`ScoreTable::default`]. On-disk order is
/// trusted to already be rank order once the shape validates; nothing re-sorts on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    easy: Vec<ScoreEntry>,
    medium: Vec<ScoreEntry>,
    hard: Vec<ScoreEntry>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        let sentinels = || vec![ScoreEntry::sentinel(); MAX_SCORES];

        ScoreTable {
            easy: sentinels(),
            medium: sentinels(),
            hard: sentinels(),
        }
    }
}

impl ScoreTable {
    pub fn entries(&self, difficulty: Difficulty) -> &[ScoreEntry] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn entries_mut(&mut self, difficulty: Difficulty) -> &mut Vec<ScoreEntry> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Whether the given time earns a slot in the difficulty's ranking: either the ranking is not
    /// full yet, or the time strictly beats the current worst (last) entry.
    pub fn qualifies(&self, difficulty: Difficulty, time: u16) -> bool {
        let entries = self.entries(difficulty);

        match entries.last() {
            Some(worst) if entries.len() >= MAX_SCORES => time < worst.time,
            _ => true,
        }
    }

    /// Inserts a new entry at its rank and truncates the ranking back to [`MAX_SCORES`].
    ///
    /// The insertion point is the first entry with a strictly greater time, so existing entries
    /// win ties. A non-qualifying entry sorts last and falls off the capacity cut, which makes an
    /// unconditional insert harmless.
    pub fn insert(&mut self, difficulty: Difficulty, initials: &str, time: u16) {
        let entries = self.entries_mut(difficulty);

        let position = entries
            .iter()
            .position(|entry| time < entry.time)
            .unwrap_or(entries.len());

        entries.insert(
            position,
            ScoreEntry {
                initials: initials.to_string(),
                time,
            },
        );
        entries.truncate(MAX_SCORES);
    }
}

/// The score table plus the file it lives in.
///
/// Every operation on the ledger is infallible from the caller's point of view: a missing or
/// unreadable file loads as the default table, and a failed save leaves the in-memory table
/// authoritative for the rest of the session. The only user-visible effect of a broken storage is
/// that a new entry may not survive a restart.
#[derive(Debug)]
pub struct ScoreLedger {
    path: PathBuf,
    table: ScoreTable,
}

impl ScoreLedger {
    /// Reads the table from the given file, falling back to the default table on any read, parse
    /// or shape failure. This fallback is the designed recovery path, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();

        ScoreLedger { path, table }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn qualifies(&self, difficulty: Difficulty, time: u16) -> bool {
        self.table.qualifies(difficulty, time)
    }

    /// Inserts the entry into the in-memory table and persists the result right away.
    pub fn insert(&mut self, difficulty: Difficulty, initials: &str, time: u16) {
        self.table.insert(difficulty, initials, time);
        self.save();
    }

    /// Best-effort durable write: the whole document goes to a sibling temp file which is synced
    /// and then renamed over the target, so an abrupt power loss leaves either the old file or the
    /// new one under the real name, never a torn write. Failures are swallowed.
    pub fn save(&self) {
        let _ = self.try_save();
    }

    fn try_save(&self) -> io::Result<()> {
        let bytes = serde_json::to_vec(&self.table)?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}
