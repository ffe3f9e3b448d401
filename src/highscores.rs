//! High score leaderboards
//!
//! Each bucket holds at most five entries sorted by score, highest first.
//! A store is either one flat list shared by every difficulty or one table
//! per difficulty, persisted as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PLAYER_NAME, MAX_LEADERBOARD_ENTRIES};
use crate::persistence;
use crate::settings::Difficulty;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    /// Build an entry, clipping the name to `max_name_len` characters.
    /// Blank names become the default player name.
    pub fn new(name: &str, score: u32, max_name_len: usize) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.chars().take(max_name_len).collect()
        };
        Self { name, score }
    }
}

/// An ordered table of at most `MAX_LEADERBOARD_ENTRIES` entries
///
/// Entries are only reachable through constructors that sort and truncate,
/// so a table is always valid to persist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct LeaderboardTable {
    entries: Vec<LeaderboardEntry>,
}

impl LeaderboardTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a table from arbitrary entries (sorted, truncated)
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        // sort_by is stable: equal scores keep insertion order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_LEADERBOARD_ENTRIES
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u32) -> bool {
        if !self.is_full() {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Append an entry, re-sort descending (stable on ties), truncate
    pub fn insert(&self, entry: LeaderboardEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self::from_entries(entries)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Get the lowest listed score (if any)
    pub fn lowest_score(&self) -> Option<u32> {
        self.entries.last().map(|e| e.score)
    }

    fn clip_names(mut self, max_name_len: usize) -> Self {
        for entry in &mut self.entries {
            if entry.name.chars().count() > max_name_len {
                entry.name = entry.name.chars().take(max_name_len).collect();
            }
        }
        self
    }
}

impl<'de> Deserialize<'de> for LeaderboardTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<LeaderboardEntry>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}

/// How a store partitions its tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLayout {
    /// One list shared by every difficulty
    Flat,
    /// One table per difficulty
    PerDifficulty,
}

/// A leaderboard partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Shared,
    Level(Difficulty),
}

impl Bucket {
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Shared => "All",
            Bucket::Level(d) => d.as_str(),
        }
    }
}

impl StoreLayout {
    pub fn bucket(&self, difficulty: Difficulty) -> Bucket {
        match self {
            StoreLayout::Flat => Bucket::Shared,
            StoreLayout::PerDifficulty => Bucket::Level(difficulty),
        }
    }

    pub fn buckets(&self) -> Vec<Bucket> {
        match self {
            StoreLayout::Flat => vec![Bucket::Shared],
            StoreLayout::PerDifficulty => Difficulty::ALL.iter().map(|d| Bucket::Level(*d)).collect(),
        }
    }
}

/// Every table of a store, one per bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboards {
    layout: StoreLayout,
    tables: BTreeMap<Bucket, LeaderboardTable>,
}

impl Leaderboards {
    /// Empty tables for every bucket of the layout
    pub fn empty(layout: StoreLayout) -> Self {
        let tables = layout
            .buckets()
            .into_iter()
            .map(|b| (b, LeaderboardTable::new()))
            .collect();
        Self { layout, tables }
    }

    pub fn layout(&self) -> StoreLayout {
        self.layout
    }

    /// The table a difficulty's scores are ranked in
    pub fn table(&self, difficulty: Difficulty) -> &LeaderboardTable {
        let bucket = self.layout.bucket(difficulty);
        // every bucket is populated at construction
        &self.tables[&bucket]
    }

    /// Replace a difficulty's table
    pub fn set_table(&mut self, difficulty: Difficulty, table: LeaderboardTable) {
        self.tables.insert(self.layout.bucket(difficulty), table);
    }

    /// Tables in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &LeaderboardTable)> {
        self.tables.iter().map(|(b, t)| (*b, t))
    }

    /// Record a score if it qualifies. Returns the rank achieved (1-indexed).
    pub fn record(&mut self, difficulty: Difficulty, entry: LeaderboardEntry) -> Option<usize> {
        let table = self.table(difficulty);
        let rank = table.potential_rank(entry.score)?;
        let updated = table.insert(entry);
        self.set_table(difficulty, updated);
        Some(rank)
    }
}

/// Leaderboard file bound to a path and layout
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
    layout: StoreLayout,
    max_name_len: usize,
}

/// On-disk shape of a bucketed store
type BucketedFile = BTreeMap<Difficulty, LeaderboardTable>;

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>, layout: StoreLayout, max_name_len: usize) -> Self {
        Self {
            path: path.into(),
            layout,
            max_name_len,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> StoreLayout {
        self.layout
    }

    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    /// Load one difficulty's table
    pub fn load(&self, difficulty: Difficulty) -> LeaderboardTable {
        self.load_all().table(difficulty).clone()
    }

    /// Load every table. Missing or unreadable storage yields empty tables
    /// and nothing is created on disk.
    pub fn load_all(&self) -> Leaderboards {
        let mut boards = Leaderboards::empty(self.layout);
        let loaded = match self.layout {
            StoreLayout::Flat => persistence::read_json::<LeaderboardTable>(&self.path).map(|t| {
                t.map(|table| {
                    boards.tables.insert(Bucket::Shared, table.clip_names(self.max_name_len));
                })
            }),
            StoreLayout::PerDifficulty => {
                persistence::read_json::<BucketedFile>(&self.path).map(|file| {
                    file.map(|file| {
                        for (difficulty, table) in file {
                            boards.set_table(difficulty, table.clip_names(self.max_name_len));
                        }
                    })
                })
            }
        };

        match loaded {
            Ok(Some(())) => log::info!("Loaded high scores from {}", self.path.display()),
            Ok(None) => log::info!("No high scores found, starting fresh"),
            Err(e) => {
                log::warn!("High scores unreadable, starting fresh: {e:#}");
                boards = Leaderboards::empty(self.layout);
            }
        }
        boards
    }

    /// Overwrite the backing file with every table
    pub fn persist(&self, boards: &Leaderboards) -> anyhow::Result<()> {
        match self.layout {
            StoreLayout::Flat => {
                let table = boards
                    .tables
                    .get(&Bucket::Shared)
                    .cloned()
                    .unwrap_or_default();
                persistence::write_json(&self.path, &table)?;
            }
            StoreLayout::PerDifficulty => {
                let file: BucketedFile = Difficulty::ALL
                    .iter()
                    .map(|d| (*d, boards.table(*d).clone()))
                    .collect();
                persistence::write_json(&self.path, &file)?;
            }
        }
        log::info!("High scores saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score, 20)
    }

    fn full_table() -> LeaderboardTable {
        LeaderboardTable::from_entries(vec![
            entry("A", 50),
            entry("B", 40),
            entry("C", 30),
            entry("D", 20),
            entry("E", 10),
        ])
    }

    #[test]
    fn test_insert_between_existing_scores() {
        let table = LeaderboardTable::from_entries(vec![entry("A", 50), entry("B", 30)]);
        let table = table.insert(entry("C", 40));
        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "C", "B"]);
        let scores: Vec<_> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, [50, 40, 30]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let table = LeaderboardTable::from_entries(vec![entry("first", 10)]);
        let table = table.insert(entry("second", 10));
        assert_eq!(table.entries()[0].name, "first");
        assert_eq!(table.entries()[1].name, "second");
    }

    #[test]
    fn test_qualifies() {
        let empty = LeaderboardTable::new();
        assert!(empty.qualifies(0));

        let full = full_table();
        assert!(!full.qualifies(10));
        assert!(!full.qualifies(5));
        assert!(full.qualifies(11));
    }

    #[test]
    fn test_potential_rank() {
        let full = full_table();
        assert_eq!(full.potential_rank(100), Some(1));
        assert_eq!(full.potential_rank(35), Some(3));
        assert_eq!(full.potential_rank(10), None);

        let short = LeaderboardTable::from_entries(vec![entry("A", 5)]);
        assert_eq!(short.potential_rank(5), Some(2));
    }

    #[test]
    fn test_insert_truncates_to_capacity() {
        let table = full_table().insert(entry("F", 45));
        assert_eq!(table.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(table.lowest_score(), Some(20));
        assert_eq!(table.top_score(), Some(50));
    }

    #[test]
    fn test_entry_name_rules() {
        assert_eq!(LeaderboardEntry::new("   ", 3, 10).name, DEFAULT_PLAYER_NAME);
        assert_eq!(LeaderboardEntry::new("abcdefghijklmnop", 3, 10).name, "abcdefghij");
    }

    #[test]
    fn test_record_per_difficulty() {
        let mut boards = Leaderboards::empty(StoreLayout::PerDifficulty);
        assert_eq!(boards.record(Difficulty::Hard, entry("X", 7)), Some(1));
        assert_eq!(boards.table(Difficulty::Hard).len(), 1);
        assert!(boards.table(Difficulty::Easy).is_empty());
    }

    #[test]
    fn test_flat_layout_shares_one_table() {
        let mut boards = Leaderboards::empty(StoreLayout::Flat);
        boards.record(Difficulty::Easy, entry("X", 7));
        assert_eq!(boards.table(Difficulty::Hard).len(), 1);
        assert_eq!(boards.iter().count(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty_and_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let store = LeaderboardStore::new(&path, StoreLayout::PerDifficulty, 20);

        let boards = store.load_all();
        for d in Difficulty::ALL {
            assert!(boards.table(d).is_empty());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "").unwrap();
        let store = LeaderboardStore::new(&path, StoreLayout::PerDifficulty, 20);
        for d in Difficulty::ALL {
            assert!(store.load(d).is_empty());
        }
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "{\"easy\": [{\"name\": 4}]").unwrap();
        let store = LeaderboardStore::new(&path, StoreLayout::PerDifficulty, 20);
        assert!(store.load(Difficulty::Easy).is_empty());
    }

    #[test]
    fn test_load_partial_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"{"hard": [{"name": "Z", "score": 9}]}"#).unwrap();
        let store = LeaderboardStore::new(&path, StoreLayout::PerDifficulty, 20);
        let boards = store.load_all();
        assert_eq!(boards.table(Difficulty::Hard).top_score(), Some(9));
        assert!(boards.table(Difficulty::Medium).is_empty());
    }

    #[test]
    fn test_load_normalizes_unsorted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.json");
        std::fs::write(
            &path,
            r#"[{"name":"a","score":1},{"name":"b","score":9},{"name":"c","score":3},
                {"name":"d","score":4},{"name":"e","score":5},{"name":"a-very-long-name","score":6}]"#,
        )
        .unwrap();
        let store = LeaderboardStore::new(&path, StoreLayout::Flat, 10);
        let table = store.load(Difficulty::Easy);
        let scores: Vec<_> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, [9, 6, 5, 4, 3]);
        assert_eq!(table.entries()[1].name, "a-very-lon");
    }

    #[test]
    fn test_persist_flat_writes_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.json");
        let store = LeaderboardStore::new(&path, StoreLayout::Flat, 10);
        let mut boards = store.load_all();
        boards.record(Difficulty::Medium, entry("Zed", 12));
        store.persist(&boards).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!([{"name": "Zed", "score": 12}]));
        assert_eq!(store.load_all(), boards);
    }

    #[test]
    fn test_persist_bucketed_writes_all_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snake.json");
        let store = LeaderboardStore::new(&path, StoreLayout::PerDifficulty, 20);
        let mut boards = store.load_all();
        boards.record(Difficulty::Easy, entry("Ann", 3));
        store.persist(&boards).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["easy"][0]["name"], "Ann");
        assert_eq!(raw["medium"], serde_json::json!([]));
        assert_eq!(raw["hard"], serde_json::json!([]));
    }

    proptest! {
        #[test]
        fn prop_insert_keeps_table_sorted_and_bounded(
            scores in proptest::collection::vec(0u32..1000, 0..30)
        ) {
            let mut table = LeaderboardTable::new();
            for (i, score) in scores.iter().enumerate() {
                table = table.insert(entry(&format!("p{i}"), *score));
                prop_assert!(table.len() <= MAX_LEADERBOARD_ENTRIES);
                let sorted = table.entries().windows(2).all(|w| w[0].score >= w[1].score);
                prop_assert!(sorted);
            }
        }

        #[test]
        fn prop_qualifies_matches_rule(
            scores in proptest::collection::vec(0u32..100, 0..8),
            candidate in 0u32..120
        ) {
            let table = LeaderboardTable::from_entries(
                scores.iter().map(|s| entry("p", *s)).collect(),
            );
            let expected = table.len() < MAX_LEADERBOARD_ENTRIES
                || candidate > table.lowest_score().unwrap_or(0);
            prop_assert_eq!(table.qualifies(candidate), expected);
        }
    }
}
