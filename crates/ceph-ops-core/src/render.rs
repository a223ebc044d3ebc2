use crate::model::{CategoryCounts, ItemRecord, VisualState};

/// Summary and column header rows above the item table.
pub const RESERVED_ROWS: usize = 2;

pub const NO_DATA: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTone {
    Summary,
    Header,
    Item(VisualState),
    Notice,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub text: String,
    pub tone: LineTone,
}

/// A full frame: exactly `viewport_height` lines of exactly `viewport_width` chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub lines: Vec<ScreenLine>,
}

impl Screen {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }

    pub fn item_rows(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line.tone, LineTone::Item(_)))
            .count()
    }
}

/// Lays out classified items for a fixed viewport. Pure; overflow rows are dropped.
pub fn render(
    items: &[ItemRecord],
    counts: &CategoryCounts,
    viewport_height: usize,
    viewport_width: usize,
) -> Screen {
    let capacity = viewport_height.saturating_sub(RESERVED_ROWS);
    let mut lines = Vec::with_capacity(viewport_height);

    let summary = summary_text(counts);
    lines.push(line(summary, LineTone::Summary, viewport_width));
    lines.push(line(header_text(), LineTone::Header, viewport_width));

    if items.is_empty() && capacity > 0 {
        lines.push(line(
            "  no active scrubs".to_string(),
            LineTone::Notice,
            viewport_width,
        ));
    }
    for item in items.iter().take(capacity) {
        lines.push(line(
            row_text(item),
            LineTone::Item(item.visual_state),
            viewport_width,
        ));
    }

    while lines.len() < viewport_height {
        lines.push(line(String::new(), LineTone::Blank, viewport_width));
    }
    lines.truncate(viewport_height);

    Screen { lines }
}

pub fn format_percent(item: &ItemRecord) -> String {
    match item.percent() {
        Some(pct) => format!("{pct:.2}%"),
        None => NO_DATA.to_string(),
    }
}

fn summary_text(counts: &CategoryCounts) -> String {
    format!(
        "scrub: {}  deep-scrub: {}  active: {}   [q] quit  [r] refresh",
        counts.shallow,
        counts.deep,
        counts.total()
    )
}

fn header_text() -> String {
    format!(
        "  {:<10} {:<10} {:>7} {:>10} {:>10} {:>9}",
        "PG", "TYPE", "PRIMARY", "SCRUBBED", "OBJECTS", "PROGRESS"
    )
}

fn row_text(item: &ItemRecord) -> String {
    let primary = item
        .primary_osd
        .map(|osd| format!("osd.{osd}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {:<10} {:<10} {:>7} {:>10} {:>10} {:>9}",
        item.visual_state.marker(),
        item.id.as_str(),
        item.category.as_str(),
        primary,
        item.progress_counter,
        item.total_units,
        format_percent(item)
    )
}

fn line(text: String, tone: LineTone, width: usize) -> ScreenLine {
    ScreenLine {
        text: fit(&text, width),
        tone,
    }
}

fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn items(n: usize) -> Vec<ItemRecord> {
        (0..n)
            .map(|i| {
                let mut item = ItemRecord::new(format!("1.{i:x}"), 10, 40);
                item.visual_state = VisualState::Rising;
                item
            })
            .collect()
    }

    #[test]
    fn overflow_is_truncated_to_capacity() {
        let list = items(20);
        let counts = CategoryCounts::tally(&list);
        let screen = render(&list, &counts, 10, 80);
        assert_eq!(screen.lines.len(), 10);
        assert_eq!(screen.item_rows(), 8);
    }

    #[test]
    fn short_lists_are_padded_to_full_height_and_width() {
        let list = items(2);
        let screen = render(&list, &CategoryCounts::tally(&list), 10, 72);
        assert_eq!(screen.lines.len(), 10);
        assert!(screen.texts().all(|text| text.chars().count() == 72));
        assert_eq!(
            screen.lines.last().map(|line| line.tone),
            Some(LineTone::Blank)
        );
    }

    #[test]
    fn zero_units_render_no_data_marker() {
        let mut item = ItemRecord::new("4.2", 17, 0).with_category(Category::Deep);
        item.visual_state = VisualState::Idle;
        let screen = render(&[item], &CategoryCounts::default(), 5, 100);
        let row = screen.lines[2].text.clone();
        assert!(row.contains(NO_DATA));
        assert!(!row.contains("NaN"));
        assert!(!row.contains("inf"));
        assert!(row.starts_with('~'));
    }

    #[test]
    fn percent_uses_two_decimals() {
        let item = ItemRecord::new("1.0", 1, 3);
        assert_eq!(format_percent(&item), "33.33%");
    }

    #[test]
    fn empty_result_shows_notice() {
        let screen = render(&[], &CategoryCounts::default(), 6, 60);
        assert_eq!(screen.lines[2].tone, LineTone::Notice);
        assert!(screen.lines[2].text.contains("no active scrubs"));
        let summary = &screen.lines[0].text;
        assert!(summary.starts_with("scrub: 0  deep-scrub: 0  active: 0"));
    }

    #[test]
    fn tiny_viewport_emits_only_what_fits() {
        let list = items(3);
        let screen = render(&list, &CategoryCounts::tally(&list), 1, 20);
        assert_eq!(screen.lines.len(), 1);
        assert_eq!(screen.lines[0].tone, LineTone::Summary);
    }
}
