//! Notes commands - list, show, add, edit and delete study notes

use std::io::{self, Read};
use std::process::exit;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input};
use serde::Serialize;
use serde_json::json;
use smartstudy_core::domain::PREVIEW_CHARS;
use smartstudy_core::{DeleteOutcome, LogEvent, Note, OperationResult, StudyContext};

use super::{get_context, get_logger, log_event, log_failure};
use crate::output;

#[derive(Subcommand)]
pub enum NotesCommands {
    /// List your notes, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note in full
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new note
    Add {
        /// Note title
        #[arg(long)]
        title: Option<String>,
        /// Note content (use - to read from stdin)
        #[arg(long)]
        content: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note
    Edit {
        /// Note ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content (use - to read from stdin)
        #[arg(long)]
        content: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: String,
        /// Delete without asking (required when there is no terminal)
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: NotesCommands) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context(logger.clone())?;
    let interactive = atty::is(atty::Stream::Stdin);

    match command {
        NotesCommands::List { json } => list(&ctx, json),
        NotesCommands::Show { id, json } => show(&ctx, &id, json),
        NotesCommands::Add { title, content, json } => {
            let title = resolve_field(title, "", interactive, |current| prompt("Title", current))?;
            let content = resolve_content(content, "", interactive, io::stdin().lock(), |current| {
                prompt("Content", current)
            })?;

            let result = ctx.notes_mut().and_then(|notes| notes.add(&title, &content));
            match &result {
                Ok(_) => log_event(&logger, LogEvent::new("note_added").with_command("notes add")),
                Err(e) => log_failure(&logger, LogEvent::new("note_add_failed").with_command("notes add"), e),
            }
            if json {
                return emit_json(result.into());
            }
            let note = result?;
            output::success("Note added successfully!");
            println!("{}", note.id.dimmed());
            Ok(())
        }
        NotesCommands::Edit { id, title, content, json } => {
            let existing = find_note(&ctx, &id)?;
            let title = resolve_field(title, &existing.title, interactive, |current| {
                prompt("Title", current)
            })?;
            let content = resolve_content(
                content,
                &existing.content,
                interactive,
                io::stdin().lock(),
                |current| prompt("Content", current),
            )?;

            let result = ctx
                .notes_mut()
                .and_then(|notes| notes.update(&id, &title, &content));
            match &result {
                Ok(_) => log_event(&logger, LogEvent::new("note_updated").with_command("notes edit")),
                Err(e) => log_failure(&logger, LogEvent::new("note_update_failed").with_command("notes edit"), e),
            }
            if json {
                return emit_json(result.into());
            }
            result?;
            output::success("Note updated successfully!");
            Ok(())
        }
        NotesCommands::Delete { id, force, json } => {
            let mut prompt_error = None;
            let result = ctx.notes_mut().and_then(|notes| {
                notes.delete(&id, |note| {
                    let ask = || -> Result<bool> {
                        Ok(Confirm::new()
                            .with_prompt(format!(
                                "Are you sure you want to delete \"{}\"?",
                                note.title
                            ))
                            .default(false)
                            .interact()?)
                    };
                    match confirm_delete(force, interactive, ask) {
                        Ok(answer) => answer,
                        Err(e) => {
                            prompt_error = Some(e);
                            false
                        }
                    }
                })
            });
            if let Some(e) = prompt_error {
                return Err(e);
            }
            match &result {
                Ok(DeleteOutcome::Deleted(_)) => {
                    log_event(&logger, LogEvent::new("note_deleted").with_command("notes delete"))
                }
                Ok(DeleteOutcome::Declined) => {}
                Err(e) => log_failure(&logger, LogEvent::new("note_delete_failed").with_command("notes delete"), e),
            }

            let declined = matches!(result, Ok(DeleteOutcome::Declined));
            if json {
                let mut envelope: OperationResult<DeleteOutcome> = result.into();
                if declined && !interactive {
                    envelope = envelope.with_context("hint", json!(FORCE_HINT));
                }
                return emit_json(envelope);
            }

            match result? {
                DeleteOutcome::Deleted(_) => output::success("Note deleted successfully!"),
                DeleteOutcome::Declined if !interactive => {
                    println!("{}", format!("Cancelled. {}", FORCE_HINT).dimmed())
                }
                DeleteOutcome::Declined => println!("{}", "Cancelled".dimmed()),
            }
            Ok(())
        }
    }
}

fn list(ctx: &StudyContext, json: bool) -> Result<()> {
    let notes = ctx.notes()?;

    if json {
        println!("{}", serde_json::to_string_pretty(notes.list())?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("{}", "No notes yet".bold());
        println!("Run `study notes add` to create your first study note!");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Preview", "Updated"]);
    for note in notes.list() {
        table.add_row(vec![
            note.id.clone(),
            note.title.clone(),
            note.preview(PREVIEW_CHARS),
            output::format_date(&note.updated_at),
        ]);
    }
    println!("{}", table);
    println!("{} note(s)", notes.len());
    Ok(())
}

fn show(ctx: &StudyContext, id: &str, json: bool) -> Result<()> {
    let note = find_note(ctx, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
        return Ok(());
    }

    println!("{}", note.title.bold());
    println!(
        "{}",
        format!(
            "Created {}  Updated {}",
            output::format_date(&note.created_at),
            output::format_date(&note.updated_at)
        )
        .dimmed()
    );
    println!();
    println!("{}", note.content);
    Ok(())
}

fn find_note(ctx: &StudyContext, id: &str) -> Result<Note> {
    ctx.notes()?
        .get_by_id(id)
        .cloned()
        .ok_or_else(|| smartstudy_core::Error::not_found(format!("Note {}", id)).into())
}

const FORCE_HINT: &str = "No terminal to confirm on; pass --force to delete without a prompt";

fn prompt(label: &str, current: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?)
}

/// New value for a note field
///
/// An omitted flag prompts on a terminal and otherwise keeps `current`, so
/// running without a terminal never blanks a field nobody asked to change.
fn resolve_field<P>(given: Option<String>, current: &str, interactive: bool, prompt: P) -> Result<String>
where
    P: FnOnce(&str) -> Result<String>,
{
    match given {
        Some(value) => Ok(value),
        None if interactive => prompt(current),
        None => Ok(current.to_string()),
    }
}

/// Like `resolve_field`, but `-` reads the content from `stdin`
fn resolve_content<R, P>(
    given: Option<String>,
    current: &str,
    interactive: bool,
    mut stdin: R,
    prompt: P,
) -> Result<String>
where
    R: Read,
    P: FnOnce(&str) -> Result<String>,
{
    if given.as_deref() == Some("-") {
        let mut buffer = String::new();
        stdin.read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    resolve_field(given, current, interactive, prompt)
}

/// Only `--force` skips the question; without a terminal to ask on, the
/// delete is declined
fn confirm_delete<A>(force: bool, interactive: bool, ask: A) -> Result<bool>
where
    A: FnOnce() -> Result<bool>,
{
    if force {
        return Ok(true);
    }
    if !interactive {
        return Ok(false);
    }
    ask()
}

/// Print the operation envelope; exit with code 1 on failure
fn emit_json<T: Serialize>(envelope: OperationResult<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if !envelope.success {
        exit(1);
    }
    Ok(())
}
