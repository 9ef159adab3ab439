use super::{CORNER_LABEL, char_width, display_subject};
use crate::routine::RoutineData;

const MIN_LABEL_WIDTH: usize = 12;
const MIN_SUBJECT_WIDTH: usize = 8;
const COLUMN_SEPARATOR: &str = " | ";

/// Fixed widths of the box-drawn clipboard table.
pub const BOX_LABEL_WIDTH: usize = 12;
pub const BOX_SUBJECT_WIDTH: usize = 14;
const BOX_LABEL_HEADER: &str = "Class";

/// Plain-text table with padded columns.
///
/// The label column is as wide as the longest class name (at least 12), and
/// every data column as wide as the longest subject anywhere (at least 8).
/// Class names are left-padded so they sit flush against the first separator.
pub fn plain_table(data: &RoutineData, title: &str) -> String {
    let label_width = data
        .classes()
        .iter()
        .map(|class| char_width(class.name()))
        .fold(MIN_LABEL_WIDTH, usize::max);
    let subject_width = data
        .classes()
        .iter()
        .flat_map(|class| class.subjects())
        .map(|subject| char_width(subject))
        .fold(MIN_SUBJECT_WIDTH, usize::max);

    let mut out = String::new();
    out.push_str(title);
    out.push_str("\n\n");

    let mut header = vec![pad(CORNER_LABEL, label_width)];
    header.extend(data.dates().iter().map(|date| pad(date, subject_width)));
    out.push_str(header.join(COLUMN_SEPARATOR).trim_end());
    out.push('\n');

    let rule_width =
        label_width + data.date_count() * (COLUMN_SEPARATOR.len() + subject_width);
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');

    for class in data.classes() {
        let mut cells = vec![pad_left(class.name(), label_width)];
        cells.extend(
            class
                .subjects()
                .iter()
                .map(|subject| pad(display_subject(subject), subject_width)),
        );
        out.push_str(cells.join(COLUMN_SEPARATOR).trim_end());
        out.push('\n');
    }
    out
}

/// Box-drawn table for pasting into chat and mail clients.
///
/// Columns have fixed widths; longer values are cut and end with `…`.
pub fn box_table(data: &RoutineData, title: &str) -> String {
    let widths: Vec<usize> = std::iter::once(BOX_LABEL_WIDTH)
        .chain(std::iter::repeat_n(BOX_SUBJECT_WIDTH, data.date_count()))
        .collect();

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule(&widths, '┌', '┬', '┐'));

    let header: Vec<&str> = std::iter::once(BOX_LABEL_HEADER)
        .chain(data.dates().iter().map(String::as_str))
        .collect();
    out.push_str(&boxed_row(&header, &widths));
    out.push_str(&rule(&widths, '├', '┼', '┤'));

    for class in data.classes() {
        let cells: Vec<&str> = std::iter::once(class.name())
            .chain(class.subjects().iter().map(|s| display_subject(s)))
            .collect();
        out.push_str(&boxed_row(&cells, &widths));
    }
    out.push_str(&rule(&widths, '└', '┴', '┘'));
    out
}

fn rule(widths: &[usize], left: char, joint: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&joint.to_string()))
}

fn boxed_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (cell, width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(&pad(&fit(cell, *width), *width));
        line.push_str(" │");
    }
    line.push('\n');
    line
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(char_width(value));
    format!("{value}{}", " ".repeat(fill))
}

fn pad_left(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(char_width(value));
    format!("{}{value}", " ".repeat(fill))
}

fn fit(value: &str, width: usize) -> String {
    if char_width(value) <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::ClassRow;

    fn sample() -> RoutineData {
        RoutineData::new(
            vec!["D1".into(), "D2".into()],
            vec![
                ClassRow::new("A", vec!["m".into(), String::new()]),
                ClassRow::new("Grade Twelve Science", vec!["Mathematics".into(), "s".into()]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn plain_table_widths_follow_longest_values() {
        let text = plain_table(&sample(), "Routine");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Routine");
        // label width 20 ("Grade Twelve Science"), subject width 11 ("Mathematics")
        assert_eq!(lines[2], "Class / Date         | D1          | D2");
        assert_eq!(lines[3], "-".repeat(20 + 2 * (3 + 11)));
        assert_eq!(lines[4], "                   A | m           | -");
        assert_eq!(lines[5], "Grade Twelve Science | Mathematics | s");
    }

    #[test]
    fn plain_table_respects_minimum_widths() {
        let data = RoutineData::default();
        let text = plain_table(&data, "T");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "Class / Date | Select Date");
        assert_eq!(lines[3].len(), 12 + 3 + 8);
        assert_eq!(lines[4], "             | -");
    }

    #[test]
    fn box_table_has_fixed_columns() {
        let text = box_table(&sample(), "Routine");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Routine");
        assert!(lines[1].starts_with('┌') && lines[1].ends_with('┐'));
        assert_eq!(lines[2], "│ Class        │ D1             │ D2             │");
        assert_eq!(lines[4], "│ A            │ m              │ -              │");
        assert_eq!(lines[5], "│ Grade Twelv… │ Mathematics    │ s              │");
        assert!(lines[6].starts_with('└'));
        let widths: Vec<usize> = lines[1..].iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }
}
