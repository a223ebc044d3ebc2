use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a monitored item, normally a placement group id such as `2.1f`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(pool, seed)` for ids shaped `<decimal pool>.<hex seed>`.
    fn pg_parts(&self) -> Option<(u64, u64)> {
        let (pool, seed) = self.0.split_once('.')?;
        let pool = pool.parse::<u64>().ok()?;
        let seed = u64::from_str_radix(seed, 16).ok()?;
        Some((pool, seed))
    }
}

impl Ord for ItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.pg_parts(), other.pg_parts()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Shallow,
    Deep,
}

impl Category {
    /// Derives the scrub kind from a PG state such as `active+clean+scrubbing+deep`.
    pub fn from_pg_state(state: &str) -> Self {
        if state.split('+').any(|part| part == "deep") {
            Category::Deep
        } else {
            Category::Shallow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Shallow => "scrub",
            Category::Deep => "deep-scrub",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    /// Progress advanced since the last cycle, or the item just appeared.
    Rising,
    /// Stalled but still inside the idle tolerance.
    Idle,
    #[default]
    None,
}

impl VisualState {
    pub fn marker(&self) -> &'static str {
        match self {
            VisualState::Rising => "^",
            VisualState::Idle => "~",
            VisualState::None => " ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub progress_counter: u64,
    pub total_units: u64,
    pub category: Category,
    pub primary_osd: Option<i64>,
    pub visual_state: VisualState,
}

impl ItemRecord {
    pub fn new(id: impl Into<ItemId>, progress_counter: u64, total_units: u64) -> Self {
        Self {
            id: id.into(),
            progress_counter,
            total_units,
            category: Category::default(),
            primary_osd: None,
            visual_state: VisualState::None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_primary(mut self, osd: i64) -> Self {
        self.primary_osd = Some(osd);
        self
    }

    /// Completion percentage, or `None` when the item has no units to process.
    pub fn percent(&self) -> Option<f64> {
        if self.total_units == 0 {
            return None;
        }
        Some(self.progress_counter as f64 / self.total_units as f64 * 100.0)
    }
}

/// One atomic read of every monitored item, keyed and ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    items: BTreeMap<ItemId, ItemRecord>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemRecord> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.values()
    }
}

impl FromIterator<ItemRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ItemRecord>>(iter: I) -> Self {
        let items = iter
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self { items }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub shallow: usize,
    pub deep: usize,
}

impl CategoryCounts {
    pub fn tally<'a>(items: impl IntoIterator<Item = &'a ItemRecord>) -> Self {
        let mut counts = Self::default();
        for item in items {
            match item.category {
                Category::Shallow => counts.shallow += 1,
                Category::Deep => counts.deep += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.shallow + self.deep
    }
}
