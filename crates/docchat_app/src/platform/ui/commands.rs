use std::path::Path;

use docchat_core::{AppViewModel, DocumentId, PickedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Upload {
        files: Vec<PickedFile>,
        rejected: Vec<String>,
    },
    Toggle(Vec<DocumentId>),
    ShowDocuments,
    Help,
    Quit,
    Invalid(String),
}

/// Lines starting with `:` are commands; anything else is a question, kept
/// verbatim.
pub fn parse(line: &str, view: &AppViewModel) -> Command {
    let Some(rest) = line.trim_start().strip_prefix(':') else {
        return Command::Ask(line.to_string());
    };
    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match name {
        "upload" | "u" => parse_upload(&args),
        "toggle" | "t" => parse_toggle(&args, view),
        "docs" | "d" => Command::ShowDocuments,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command :{other} (try :help)")),
    }
}

fn parse_upload(args: &[&str]) -> Command {
    if args.is_empty() {
        return Command::Invalid("usage: :upload <file.pdf>...".to_string());
    }
    let (pdfs, rejected): (Vec<&str>, Vec<&str>) =
        args.iter().copied().partition(|arg| is_pdf(*arg));
    Command::Upload {
        files: pdfs.into_iter().map(PickedFile::new).collect(),
        rejected: rejected.into_iter().map(ToOwned::to_owned).collect(),
    }
}

pub fn is_pdf(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn parse_toggle(args: &[&str], view: &AppViewModel) -> Command {
    if args.is_empty() {
        return Command::Invalid("usage: :toggle <n|id>...".to_string());
    }
    let mut ids = Vec::with_capacity(args.len());
    for arg in args {
        match arg.parse::<usize>() {
            Ok(number) => match number.checked_sub(1).and_then(|idx| view.documents.get(idx)) {
                Some(row) => ids.push(row.id.clone()),
                None => return Command::Invalid(format!("no document #{number}")),
            },
            Err(_) => ids.push(DocumentId::new(*arg)),
        }
    }
    Command::Toggle(ids)
}
