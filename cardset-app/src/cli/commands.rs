use crate::cli::opts::*;
use crate::config::Config;

use anyhow::{bail, Context, Result};
use cardset_core::export::{download_file_name, download_text, print_page, share_url};
use cardset_core::{
    CoreError, CursorError, FlashcardGroup, FlashcardStore, GroupDraft, ReviewSession, Storage,
    TermDraft,
};
use cardset_json::JsonFileStorage;
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

pub type Store = FlashcardStore<Box<dyn Storage>>;

pub fn open_store(config: &Config) -> Result<Store> {
    let dir = config.data_dir();
    let storage = JsonFileStorage::open_in(&dir, config.max_backups)
        .with_context(|| format!("opening data dir {}", dir.display()))?;
    debug!(dir = %dir.display(), slot = %config.slot, "opening store");
    let storage: Box<dyn Storage> = Box::new(storage);
    Ok(FlashcardStore::open_slot(storage, config.slot.clone()))
}

/// Runs every command that does not take over the terminal or the network.
pub fn run_cli(
    store: &mut Store,
    config: &Config,
    cmd: Command,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    match cmd {
        Command::Create(a) => create_cmd(store, a, out),
        Command::List => list_cmd(store, out),
        Command::Show(a) => show_cmd(store, a, out),
        Command::Delete(a) => delete_cmd(store, a, out, input),
        Command::Export(a) => export_cmd(store, a, out),
        Command::Share(a) => {
            let group = find_group(store, &a.id)?;
            let origin = a.origin.as_deref().unwrap_or(&config.share_origin);
            writeln!(out, "{}", share_url(origin, &group.id))?;
            Ok(())
        }
        Command::Import(a) => import_cmd(store, a, out),
        Command::Tui | Command::Serve(_) => bail!("this command is handled by main"),
    }
}

fn create_cmd(store: &mut Store, a: CreateArgs, out: &mut dyn Write) -> Result<()> {
    let mut draft = GroupDraft::new(a.title, a.description);
    draft.image = a.image;
    for raw in &a.terms {
        draft.terms.push(parse_term_flag(raw)?);
    }
    if let Some(path) = &a.from_csv {
        draft.terms.extend(read_terms_csv(path)?);
    }
    let new_group = draft.validate().map_err(CoreError::from)?;
    let id = store.create(new_group).id.clone();
    writeln!(out, "{id}")?;
    check_saved(store, "created")
}

/// A one-shot command's in-memory state dies with the process, so a failed
/// write is reported as a failure rather than left in the log.
fn check_saved(store: &Store, what: &str) -> Result<()> {
    match store.last_persist_error() {
        Some(e) => bail!("{what}, but could not save: {e}"),
        None => Ok(()),
    }
}

fn parse_term_flag(raw: &str) -> Result<TermDraft> {
    let Some((term, definition)) = raw.split_once('=') else {
        bail!("--term expects TERM=DEFINITION, got {raw:?}");
    };
    Ok(TermDraft::new(term.trim(), definition.trim()))
}

fn read_terms_csv(path: &Path) -> Result<Vec<TermDraft>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut terms = Vec::new();
    for rec in rdr.deserialize::<TermDraft>() {
        terms.push(rec?);
    }
    Ok(terms)
}

fn list_cmd(store: &Store, out: &mut dyn Write) -> Result<()> {
    if store.is_empty() {
        writeln!(out, "No flashcards yet. Create your first one with `cardset create`.")?;
        return Ok(());
    }
    for g in store.groups() {
        writeln!(out, "{}\t{}\t{}", g.id, g.title, g.card_label())?;
    }
    Ok(())
}

fn show_cmd(store: &Store, a: ShowArgs, out: &mut dyn Write) -> Result<()> {
    let group = find_group(store, &a.id)?;
    let mut session = ReviewSession::new(group)?;
    let index = a.term.checked_sub(1).ok_or(CursorError::OutOfRange {
        index: 0,
        len: group.term_count(),
    })?;
    session.jump_to(index)?;

    writeln!(out, "{}\n{}\n{}\n", group.title, group.description, group.card_label())?;
    let current = session.current_term();
    writeln!(out, "[{}] {}", session.progress_label(), current.term)?;
    writeln!(out, "      {}", current.definition)?;
    if current.image.is_some() {
        writeln!(out, "      [image]")?;
    }
    writeln!(out, "\nCards:")?;
    for (i, t) in group.terms.iter().enumerate() {
        let marker = if i == session.cursor().position() { '>' } else { ' ' };
        writeln!(out, "{marker} {:>2}. {}", i + 1, t.term)?;
    }
    Ok(())
}

fn delete_cmd(
    store: &mut Store,
    a: DeleteArgs,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    if let (Some(group), false) = (store.get(&a.id), a.yes) {
        write!(out, "Delete \"{}\"? This cannot be undone. [y/N] ", group.title)?;
        out.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        if !matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "cancelled")?;
            return Ok(());
        }
    }
    if store.delete(&a.id) {
        writeln!(out, "deleted {}", a.id)?;
    } else {
        writeln!(out, "not found: {} (nothing deleted)", a.id)?;
    }
    check_saved(store, "deleted")
}

fn export_cmd(store: &Store, a: ExportArgs, out: &mut dyn Write) -> Result<()> {
    let group = find_group(store, &a.id)?;
    match a.format {
        ExportFormat::Txt => {
            let path = a
                .out
                .unwrap_or_else(|| download_file_name(group).into());
            std::fs::write(&path, download_text(group))?;
            writeln!(out, "wrote {}", path.display())?;
        }
        ExportFormat::Json => {
            let s = serde_json::to_string_pretty(group)?;
            emit(a.out.as_deref(), s.as_bytes(), out)?;
        }
        ExportFormat::Csv => {
            let bytes = terms_csv(group)?;
            emit(a.out.as_deref(), &bytes, out)?;
        }
        ExportFormat::Print => {
            emit(a.out.as_deref(), print_page(group).as_bytes(), out)?;
        }
    }
    Ok(())
}

fn terms_csv(group: &FlashcardGroup) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["term", "definition", "image"])?;
    for t in &group.terms {
        wtr.write_record([
            t.term.as_str(),
            t.definition.as_str(),
            t.image.as_deref().unwrap_or(""),
        ])?;
    }
    wtr.into_inner().map_err(|e| anyhow::anyhow!("csv: {}", e.error()))
}

fn emit(path: Option<&Path>, bytes: &[u8], out: &mut dyn Write) -> Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, bytes)?;
            writeln!(out, "wrote {}", p.display())?;
        }
        None => {
            out.write_all(bytes)?;
            if !bytes.ends_with(b"\n") {
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Either one exported group or a whole saved collection.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Many(Vec<GroupDraft>),
    One(GroupDraft),
}

fn import_cmd(store: &mut Store, a: ImportArgs, out: &mut dyn Write) -> Result<()> {
    let data = std::fs::read_to_string(&a.path)
        .with_context(|| format!("reading {}", a.path.display()))?;
    let drafts = match serde_json::from_str::<ImportFile>(&data)? {
        ImportFile::Many(v) => v,
        ImportFile::One(d) => vec![d],
    };
    let total = drafts.len();
    let mut imported = 0usize;
    for (i, d) in drafts.into_iter().enumerate() {
        match d.validate() {
            Ok(g) => {
                store.create(g);
                imported += 1;
            }
            Err(e) => writeln!(out, "skipped group #{}: {e}", i + 1)?,
        }
    }
    if imported == 0 && total > 0 {
        bail!("no valid groups in {}", a.path.display());
    }
    writeln!(out, "imported {imported} group(s)")?;
    check_saved(store, "imported")
}

fn find_group<'a>(store: &'a Store, id: &str) -> Result<&'a FlashcardGroup> {
    store.get(id).ok_or_else(|| {
        CoreError::NotFound(format!(
            "flashcard {id} (run `cardset list` to see saved groups)"
        ))
        .into()
    })
}
