#![allow(clippy::collapsible_if)]

use std::{fs::OpenOptions, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use element_edit::{
    editor::MessageLevel, languages::LanguageRegistry, resolver::ResolverOrder, Command,
    EditorService, ElementCommands, MemoryEditor, Position, Range, Selection, Settings,
    TextDocument,
};
use env_logger::{Builder, Target};

/// Run one element command against a file
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Source file to operate on
    file: PathBuf,

    #[arg(short, long, value_enum)]
    command: Command,

    /// 1-based `line:column`, or `line:column-line:column` for a selection. Repeat for
    /// several cursors.
    #[arg(long = "cursor", default_value = "1:1")]
    cursors: Vec<CursorArg>,

    /// Language identifier; detected from the file extension when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    resolver_order: Option<ResolverOrder>,

    /// Write the result back to the file
    #[arg(short, long)]
    write: bool,

    /// Print a unified diff instead of the full result
    #[arg(short, long, conflicts_with = "write")]
    diff: bool,
}

#[derive(Debug, Clone, Copy)]
struct CursorArg(Selection);

impl FromStr for CursorArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        fn position(s: &str) -> Result<Position> {
            let (line, column) = s
                .split_once(':')
                .ok_or_else(|| anyhow!("expected line:column, got {s}"))?;
            let line = line.trim().parse::<usize>()?;
            let column = column.trim().parse::<usize>()?;
            if line == 0 || column == 0 {
                bail!("lines and columns start at 1");
            }
            Ok(Position::new(line - 1, column - 1))
        }

        Ok(Self(match s.split_once('-') {
            Some((anchor, active)) => Selection {
                anchor: position(anchor)?,
                active: position(active)?,
            },
            None => Selection::cursor(position(s)?),
        }))
    }
}

fn init_logging() -> Result<()> {
    if let Ok(log_location) = std::env::var("LOG_LOCATION") {
        let path = PathBuf::from(&*shellexpand::tilde(&log_location));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Builder::from_default_env()
            .target(Target::Pipe(Box::new(
                OpenOptions::new().create(true).append(true).open(path)?,
            )))
            .init();
    } else {
        Builder::from_default_env().init();
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(order) = cli.resolver_order {
        settings = settings.with_resolver_order(order);
    }

    let registry = LanguageRegistry::with_cache_capacity(settings.tree_cache_capacity());
    let file_name = cli.file.to_string_lossy().to_string();
    let language_id = match cli.language {
        Some(language) => language,
        None => registry
            .detect_language_from_path(&file_name)
            .map(|name| name.to_string())
            .ok_or_else(|| anyhow!("cannot tell the language of {file_name}; pass --language"))?,
    };

    let original = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("could not read {file_name}"))?;
    let document = TextDocument::new(file_name.clone(), language_id, &original);
    let mut editor = MemoryEditor::new(document)
        .with_selections(cli.cursors.iter().map(|cursor| cursor.0).collect());

    let mut commands = ElementCommands::new(registry.into(), settings);
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let result = runtime.block_on(commands.run(&mut editor, cli.command));

    for (level, message) in editor.messages() {
        eprintln!("{level}: {message}");
    }
    for selection in editor.selections() {
        eprintln!("selection: {}", describe(selection.range()));
    }
    if let Some(clipboard) = editor.clipboard() {
        eprintln!("clipboard:\n{clipboard}");
    }

    let edited = editor.text();
    if cli.diff {
        print!("{}", diffy::create_patch(&original, &edited));
    } else if cli.write {
        if edited != original {
            std::fs::write(&cli.file, &edited)
                .with_context(|| format!("could not write {file_name}"))?;
        }
    } else {
        print!("{edited}");
    }

    match result {
        Err(error) if error.level() == Some(MessageLevel::Error) => Err(error.into()),
        _ => Ok(()),
    }
}

fn describe(range: Range) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line + 1,
        range.start.character + 1,
        range.end.line + 1,
        range.end.character + 1
    )
}
