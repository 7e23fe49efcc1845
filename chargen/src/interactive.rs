//! Interactive improvement mode.
//!
//! A line-oriented protocol over stdin for spending ability score
//! improvements on the generated character:
//! - Lines starting with `#` are commands (status, level, sheet, save, quit)
//! - Any other line is an allocation such as `STR+2` or `DEX+1, WIS+1`
//! - Responses are tagged `[APPLIED]`, `[STATUS]`, `[ERROR]` and so on

use anyhow::Result;
use chargen_core::{schedule_progress, AllocationRequest, CharacterSession};
use std::io::{BufRead, Write};

const HELP: &str = "\
  STR+2 | DEX+1,WIS+1  - Spend an improvement
  #preview <request>   - Show what an improvement would change
  #status              - Show improvements earned and spent
  #level <n>           - Change the character's level
  #sheet               - Print the character sheet
  #json                - Print the JSON export
  #save-text <dir>     - Write the character sheet into a directory
  #save-json <path>    - Write the JSON export (a directory gets Name.json)
  #load <path>         - Load a JSON export
  #help                - Show this help
  #quit                - Exit";

/// Print entitlement status and schedule progress.
pub fn print_status(session: &CharacterSession, out: &mut impl Write) -> Result<()> {
    let Some(record) = session.character() else {
        writeln!(out, "[ERROR] No character loaded")?;
        return Ok(());
    };
    let status = record.entitlement_status();
    writeln!(out, "[STATUS] {} (level {} {})", record.name, record.level(), record.class)?;
    writeln!(out, "  Improvements: {status}")?;

    let steps: Vec<String> = schedule_progress(record.class, record.level())
        .iter()
        .map(|step| {
            let mark = if step.reached { "reached" } else { "pending" };
            format!("Level {} {mark}", step.level)
        })
        .collect();
    writeln!(out, "  Schedule: {}", steps.join(" | "))?;
    if let Some(next) = record.schedule().next_after(record.level()) {
        writeln!(out, "  Next improvement at level {next}")?;
    }
    if status.remaining > 0 {
        writeln!(out, "  Tip: {}", record.class.data().improvement_tip)?;
    }
    Ok(())
}

/// Run the protocol until `#quit` or end of input.
pub async fn run_interactive(
    session: &mut CharacterSession,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "=== Ability Score Improvements ===")?;
    print_status(session, out)?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "{HELP}")?;
    writeln!(out)?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(command) = line.strip_prefix('#') else {
            apply(session, line, out)?;
            out.flush()?;
            continue;
        };

        let (verb, rest) = command
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((command, ""));

        match verb {
            "quit" | "exit" => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            "status" => print_status(session, out)?,
            "improve" => apply(session, rest, out)?,
            "preview" => match rest.parse::<AllocationRequest>() {
                Ok(request) => match session.preview(&request) {
                    Ok(changes) => {
                        writeln!(out, "[PREVIEW] {request}")?;
                        for change in changes {
                            writeln!(out, "  {change}")?;
                        }
                    }
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                },
                Err(e) => writeln!(out, "[ERROR] {e}")?,
            },
            "level" => match rest.parse::<u8>() {
                Ok(level) => match session.set_level(level) {
                    Ok(status) => writeln!(out, "[LEVEL] Now level {level}: {status}")?,
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                },
                Err(_) => writeln!(out, "[ERROR] Usage: #level <1-20>")?,
            },
            "sheet" => match session.sheet_text() {
                Ok(text) => write!(out, "{text}")?,
                Err(e) => writeln!(out, "[ERROR] {e}")?,
            },
            "json" => match session.sheet_json() {
                Ok(json) => writeln!(out, "{json}")?,
                Err(e) => writeln!(out, "[ERROR] {e}")?,
            },
            "save-text" if !rest.is_empty() => match session.export_text(rest).await {
                Ok(path) => writeln!(out, "[SAVED] Character sheet written to {}", path.display())?,
                Err(e) => writeln!(out, "[ERROR] Save failed: {e}")?,
            },
            "save-json" if !rest.is_empty() => match session.export_json(rest).await {
                Ok(path) => writeln!(out, "[SAVED] Character written to {}", path.display())?,
                Err(e) => writeln!(out, "[ERROR] Save failed: {e}")?,
            },
            "load" if !rest.is_empty() => match session.load_json(rest).await {
                Ok(record) => writeln!(out, "[LOADED] {} from {rest}", record.name)?,
                Err(e) => writeln!(out, "[ERROR] Load failed: {e}")?,
            },
            "save-text" | "save-json" | "load" => {
                writeln!(out, "[ERROR] Usage: #{verb} <path>")?;
            }
            "help" => {
                writeln!(out, "[HELP]")?;
                writeln!(out, "{HELP}")?;
            }
            _ => writeln!(out, "[ERROR] Unknown command. Type #help for help.")?,
        }
        out.flush()?;
    }

    Ok(())
}

fn apply(session: &mut CharacterSession, text: &str, out: &mut impl Write) -> Result<()> {
    let request = match text.parse::<AllocationRequest>() {
        Ok(request) => request,
        Err(e) => {
            writeln!(out, "[ERROR] {e}")?;
            return Ok(());
        }
    };

    match session.submit_allocation(&request) {
        Ok(outcome) => {
            writeln!(out, "[APPLIED] {request}")?;
            for change in &outcome.changes {
                writeln!(out, "  {change}")?;
            }
            writeln!(out, "  {} improvement(s) remaining", outcome.remaining)?;
        }
        Err(e) => writeln!(out, "[ERROR] {e}")?,
    }
    Ok(())
}
