use routine_editor::export::text::{BOX_LABEL_WIDTH, BOX_SUBJECT_WIDTH};
use routine_editor::{ClassRow, ExportFormat, RoutineData, export, export_all};

fn two_dates() -> RoutineData {
    RoutineData::new(
        vec!["D1".into(), "D2".into()],
        vec![ClassRow::new("A", vec!["m".into(), "s".into()])],
    )
    .unwrap()
}

fn with_gap() -> RoutineData {
    RoutineData::new(
        vec!["D1".into(), "D2".into()],
        vec![ClassRow::new("A", vec!["m".into(), String::new()])],
    )
    .unwrap()
}

#[test]
fn csv_header_and_rows_follow_snapshot_order() {
    let payload = export(&two_dates(), "Exam Routine", ExportFormat::Csv);
    let lines: Vec<&str> = payload.content.lines().collect();
    assert_eq!(lines[1], r#""Class / Date","D1","D2""#);
    assert_eq!(lines[2], r#""A","m","s""#);
    assert_eq!(payload.filename, "Exam_Routine.csv");
    assert_eq!(payload.mime_type, "text/csv;charset=utf-8");
}

#[test]
fn empty_subject_is_dash_for_people_and_blank_for_csv() {
    let data = with_gap();
    let text = export(&data, "R", ExportFormat::Text).content;
    let html = export(&data, "R", ExportFormat::Html).content;
    let word = export(&data, "R", ExportFormat::Word).content;
    let clip = export(&data, "R", ExportFormat::Clipboard).content;
    let csv = export(&data, "R", ExportFormat::Csv).content;

    assert!(text.lines().any(|l| l.trim_start().starts_with("A |") && l.ends_with("| -")));
    assert!(html.contains("<td>m</td><td>-</td>"));
    assert!(word.contains("<td>m</td><td>-</td>"));
    assert!(clip.contains("│ -"));
    assert!(csv.lines().any(|l| l == r#""A","m","""#));
    assert!(!csv.contains('-'));
}

#[test]
fn exports_reflect_the_snapshot_they_are_given() {
    let before = two_dates();
    let after = before.set_subject(0, 0, "Physics").unwrap();
    assert!(!export(&before, "R", ExportFormat::Html).content.contains("Physics"));
    assert!(export(&after, "R", ExportFormat::Html).content.contains("Physics"));
}

#[test]
fn html_and_word_differ_only_in_processor_hints() {
    let data = two_dates();
    let html = export(&data, "Final Exams", ExportFormat::Html);
    let word = export(&data, "Final Exams", ExportFormat::Word);
    assert_eq!(html.filename, "Final_Exams.html");
    assert_eq!(word.filename, "Final_Exams.doc");
    assert!(word.content.contains("xmlns:w="));
    assert!(!html.content.contains("xmlns:w="));
    for doc in [&html.content, &word.content] {
        let d1 = doc.find("<th>D1</th>").unwrap();
        let d2 = doc.find("<th>D2</th>").unwrap();
        assert!(d1 < d2);
    }
}

#[test]
fn clipboard_table_uses_fixed_widths() {
    let data = RoutineData::new(
        vec!["Monday 3 March 2025".into()],
        vec![ClassRow::new("A", vec!["Computer Science".into()])],
    )
    .unwrap();
    let payload = export(&data, "Routine", ExportFormat::Clipboard);
    let lines: Vec<&str> = payload.content.lines().collect();
    assert_eq!(lines[0], "Routine");
    let expected = 1 + (BOX_LABEL_WIDTH + 3) + (BOX_SUBJECT_WIDTH + 3);
    for line in &lines[1..] {
        assert_eq!(line.chars().count(), expected, "misaligned line: {line}");
    }
    assert!(payload.content.contains("Computer Scie… │"));
}

#[test]
fn default_routine_exports_are_well_formed() {
    let payloads = export_all(&RoutineData::default(), "Exam Routine");
    assert_eq!(payloads.len(), 5);
    for payload in &payloads {
        assert!(!payload.content.is_empty());
        assert!(payload.filename.starts_with("Exam_Routine."));
    }
    let html = &payloads[1].content;
    assert!(html.trim_end().ends_with("</html>"));
}
