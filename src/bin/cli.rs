use routine_editor::export::text::{box_table, plain_table};
use routine_editor::{
    ClipboardError, ClipboardSink, EditKey, EditTarget, ExportFormat, JsonFileSource, LoadState,
    Refusal, RoutineData, RoutineEdit, RoutineOptions, RoutineSession, copy_with_fallback,
    load_routine_from_json, save_routine_to_json,
};
use std::fs;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing_subscriber::EnvFilter;

fn render(session: &RoutineSession) -> String {
    if session.options().compact {
        plain_table(session.snapshot(), session.title())
    } else {
        box_table(session.snapshot(), session.title())
    }
}

fn print_help() {
    println!(
        "Commands (rows and columns start at 1):\n  help                               Show this help\n  show                               Show current routine\n  date <col> <text...>               Set a date label\n  class <row> <text...>              Set a class name\n  subject <row> <col> <text...>      Set a subject\n  edit date <col>                    Start editing a date label\n  edit class <row>                   Start editing a class name\n  edit subject <row> <col>           Start editing a subject\n    (while editing: type the new value, then :ok to confirm, :esc to abort)\n  add class                          Append a class row\n  add date                           Append a date column\n  del class <row>                    Delete a class row\n  del date <col>                     Delete a date column\n  export <doc|html|txt|csv|clip> [path]\n                                     Export the routine\n  classes <json_path>                Initialize classes from a class list response\n  save <path>                        Save routine as JSON\n  load <path>                        Load routine from JSON\n  quit|exit                          Exit"
    );
}

fn parse_index(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.parse::<usize>().ok())
        .and_then(|v| v.checked_sub(1))
}

fn rest_of_line(input: &str, skip: usize) -> &str {
    let mut rest = input.trim_start();
    for _ in 0..skip {
        rest = rest
            .split_once(char::is_whitespace)
            .map(|(_, tail)| tail.trim_start())
            .unwrap_or("");
    }
    rest
}

fn parse_target(kind: Option<&str>, a: Option<&str>, b: Option<&str>) -> Option<EditTarget> {
    match kind? {
        "date" => Some(EditTarget::Date {
            col: parse_index(a)?,
        }),
        "class" => Some(EditTarget::ClassName {
            row: parse_index(a)?,
        }),
        "subject" => Some(EditTarget::Subject {
            row: parse_index(a)?,
            col: parse_index(b)?,
        }),
        _ => None,
    }
}

fn describe_refusal(reason: &Refusal) -> String {
    match reason {
        Refusal::NotEditing => "Nothing is being edited.".to_string(),
        other => format!("Ignored: {other}."),
    }
}

fn report(session: &RoutineSession, result: Result<(), Refusal>, done: &str) {
    match result {
        Ok(()) => println!("{done}\n{}", render(session)),
        Err(reason) => println!("{}", describe_refusal(&reason)),
    }
}

/// Pipes text into the command named by `ROUTINE_CLIPBOARD_CMD` (e.g. `pbcopy`).
struct CommandClipboard;

impl ClipboardSink for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let command = std::env::var("ROUTINE_CLIPBOARD_CMD")
            .map_err(|_| ClipboardError::new("no clipboard command configured"))?;
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ClipboardError::new("empty clipboard command"))?;
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| ClipboardError::new(e.to_string()))?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| ClipboardError::new(e.to_string()))?;
        }
        let status = child
            .wait()
            .map_err(|e| ClipboardError::new(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::new(format!("clipboard command exited with {status}")))
        }
    }
}

/// Prints the text so the user can copy it by hand.
struct ManualCopy;

impl ClipboardSink for ManualCopy {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = io::stdout().lock();
        writeln!(out, "--- copy below ---\n{text}--- copy above ---")
            .map_err(|e| ClipboardError::new(e.to_string()))
    }
}

fn export_command(session: &RoutineSession, format: Option<&str>, path: Option<&str>) {
    let Some(format) = format.and_then(|name| name.parse::<ExportFormat>().ok()) else {
        println!("Usage: export <doc|html|txt|csv|clip> [path]");
        return;
    };
    let payload = session.export(format);
    if format == ExportFormat::Clipboard && path.is_none() {
        let outcome = copy_with_fallback(&payload, &CommandClipboard, &ManualCopy);
        println!("{}", outcome.acknowledgement());
        return;
    }
    let target = path.unwrap_or(&payload.filename);
    match fs::write(target, &payload.content) {
        Ok(()) => println!(
            "Exported {} ({}) to {}",
            format.as_str(),
            payload.mime_type,
            target
        ),
        Err(e) => println!("Export error: {e}"),
    }
}

fn load_classes(session: &mut RoutineSession, path: &str) {
    session.load_classes(&JsonFileSource::new(path));
    match session.load_state() {
        LoadState::Failed => println!("Could not load class list; keeping current routine."),
        _ => println!("Class list processed.\n{}", render(session)),
    }
}

#[cfg(feature = "sqlite")]
fn open_session(options: RoutineOptions) -> RoutineSession {
    use routine_editor::{RoutineStore, SqliteRoutineStore, StoreSink};

    let Ok(db_path) = std::env::var("ROUTINE_DB") else {
        return RoutineSession::new(options);
    };
    match SqliteRoutineStore::new(&db_path) {
        Ok(store) => {
            let session = match store.load_routine() {
                Ok(Some(data)) => RoutineSession::with_data(options, data),
                Ok(None) => RoutineSession::new(options),
                Err(e) => {
                    println!("Stored routine unreadable ({e}); starting fresh.");
                    RoutineSession::new(options)
                }
            };
            session.with_change_sink(StoreSink::new(store))
        }
        Err(e) => {
            println!("Could not open {db_path}: {e}");
            RoutineSession::new(options)
        }
    }
}

#[cfg(not(feature = "sqlite"))]
fn open_session(options: RoutineOptions) -> RoutineSession {
    RoutineSession::new(options)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut session = open_session(RoutineOptions::from_env());
    if let Ok(path) = std::env::var("ROUTINE_CLASS_LIST") {
        session.load_classes(&JsonFileSource::new(path));
    }

    println!("Routine Editor (CLI) - type 'help' for commands\n");
    println!("{}", render(&session));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        if session.editing_target().is_some() {
            print!("edit> ");
        } else {
            print!("> ");
        }
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let raw = line.trim_end_matches(['\r', '\n']);

        if session.editing_target().is_some() {
            match raw.trim() {
                ":ok" => {
                    let result = session.handle_key(EditKey::Confirm);
                    report(&session, result, "Edit committed.");
                }
                ":esc" => {
                    let _ = session.handle_key(EditKey::Abort);
                    println!("Edit cancelled.");
                }
                _ => {
                    let _ = session.update_pending(raw);
                }
            }
            continue;
        }

        let input = raw.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render(&session)),
            "date" => match parse_index(parts.next()) {
                Some(col) => {
                    let value = rest_of_line(input, 2).to_string();
                    let result = session.apply(RoutineEdit::SetDateLabel { col, value });
                    report(&session, result, "Date updated.");
                }
                None => println!("Usage: date <col> <text...>"),
            },
            "class" => match parse_index(parts.next()) {
                Some(row) => {
                    let value = rest_of_line(input, 2).to_string();
                    let result = session.apply(RoutineEdit::SetClassName { row, value });
                    report(&session, result, "Class updated.");
                }
                None => println!("Usage: class <row> <text...>"),
            },
            "subject" => match (parse_index(parts.next()), parse_index(parts.next())) {
                (Some(row), Some(col)) => {
                    let value = rest_of_line(input, 3).to_string();
                    let result = session.apply(RoutineEdit::SetSubject { row, col, value });
                    report(&session, result, "Subject updated.");
                }
                _ => println!("Usage: subject <row> <col> <text...>"),
            },
            "edit" => {
                let target = parse_target(parts.next(), parts.next(), parts.next());
                match target {
                    Some(target) => match session.begin_edit(target) {
                        Ok(()) => println!(
                            "Editing (current value: '{}'). Type the new value, then :ok or :esc.",
                            session.pending_value().unwrap_or_default()
                        ),
                        Err(reason) => println!("{}", describe_refusal(&reason)),
                    },
                    None => println!("Usage: edit <date <col>|class <row>|subject <row> <col>>"),
                }
            }
            "add" => match parts.next() {
                Some("class") => {
                    let result = session.add_class();
                    report(&session, result, "Class added.");
                }
                Some("date") => {
                    let result = session.add_date();
                    report(&session, result, "Date added.");
                }
                _ => println!("Usage: add <class|date>"),
            },
            "del" => match (parts.next(), parse_index(parts.next())) {
                (Some("class"), Some(row)) => {
                    let result = session.delete_class(row);
                    report(&session, result, "Class deleted.");
                }
                (Some("date"), Some(col)) => {
                    let result = session.delete_date(col);
                    report(&session, result, "Date deleted.");
                }
                _ => println!("Usage: del <class|date> <index>"),
            },
            "export" => export_command(&session, parts.next(), parts.next()),
            "classes" => match parts.next() {
                Some(path) => load_classes(&mut session, path),
                None => println!("Usage: classes <json_path>"),
            },
            "save" => match parts.next() {
                Some(path) => {
                    match save_routine_to_json(session.snapshot(), Some(session.title()), path) {
                        Ok(()) => println!("Routine saved to {path}"),
                        Err(e) => println!("Save error: {e}"),
                    }
                }
                None => println!("Usage: save <path>"),
            },
            "load" => match parts.next() {
                Some(path) => match load_routine_from_json(path) {
                    Ok((data, _)) => load_routine(&mut session, data, path),
                    Err(e) => println!("Load error: {e}"),
                },
                None => println!("Usage: load <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}

fn load_routine(session: &mut RoutineSession, data: RoutineData, path: &str) {
    match session.replace(data) {
        Ok(()) => println!("Routine loaded from {path}\n{}", render(session)),
        Err(reason) => println!("{}", describe_refusal(&reason)),
    }
}
