use super::CORNER_LABEL;
use crate::routine::RoutineData;
use csv::{QuoteStyle, WriterBuilder};
use tracing::warn;

/// CSV with every field quoted: a title line, the date header, then one line
/// per class. Empty subjects stay empty fields.
pub fn csv_document(data: &RoutineData, title: &str) -> String {
    let mut records: Vec<Vec<&str>> = Vec::with_capacity(data.class_count() + 2);
    records.push(vec![title]);
    records.push(
        std::iter::once(CORNER_LABEL)
            .chain(data.dates().iter().map(String::as_str))
            .collect(),
    );
    for class in data.classes() {
        records.push(
            std::iter::once(class.name())
                .chain(class.subjects().iter().map(String::as_str))
                .collect(),
        );
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(Vec::new());
    for record in &records {
        if let Err(err) = writer.write_record(record) {
            warn!(error = %err, "failed to encode csv record");
        }
    }
    match writer.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            warn!(error = %err, "failed to flush csv export");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::ClassRow;

    #[test]
    fn quotes_every_field_and_doubles_embedded_quotes() {
        let data = RoutineData::new(
            vec!["D1".into(), "D \"2\"".into()],
            vec![ClassRow::new("A, B", vec!["m".into(), String::new()])],
        )
        .unwrap();
        let csv = csv_document(&data, "Exam Routine");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "\"Exam Routine\"");
        assert_eq!(lines[1], "\"Class / Date\",\"D1\",\"D \"\"2\"\"\"");
        assert_eq!(lines[2], "\"A, B\",\"m\",\"\"");
        assert_eq!(lines.len(), 3);
    }
}
