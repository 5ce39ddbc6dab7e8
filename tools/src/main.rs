mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Command, HELP};
use libcombobox_core::{
    entries_from_json_str, Collection, ComboBoxContext, ComboBoxProps, ComboBoxState, Config,
    Entry, FocusStrategy, Key, ListCollection,
};
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Drive a combo box from the terminal, one command per line.
#[derive(Parser)]
#[command(name = "combobox-repl")]
struct Args {
    /// JSON array of entries (`{"type": "item", "key": .., "text": ..}` or
    /// `{"type": "section", "title": .., "children": [..]}`)
    #[arg(long)]
    items: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

type Value = serde_json::Value;

fn load_collection(path: Option<&PathBuf>) -> Result<ListCollection<Value>> {
    let Some(path) = path else {
        println!("ℹ Using built-in demo list");
        return Ok(demo_collection()?);
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let entries = entries_from_json_str::<Value>(&json)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let collection = ListCollection::from_entries(entries)?;
    println!("✓ Loaded {} nodes from {}", collection.size(), path.display());
    Ok(collection)
}

fn demo_collection() -> libcombobox_core::Result<ListCollection<Value>> {
    ListCollection::from_entries(vec![
        Entry::section(
            "fruits",
            "Fruits",
            vec![
                Entry::item("apple", "Apple"),
                Entry::item("apricot", "Apricot"),
                Entry::item("banana", "Banana"),
                Entry::item("cherry", "Cherry"),
                Entry::item("creme", "Crème de cassis"),
            ],
        ),
        Entry::section(
            "vegetables",
            "Vegetables",
            vec![
                Entry::item("carrot", "Carrot"),
                Entry::item("celery", "Celery"),
                Entry::item("sweet-potato", "Sweet Potato"),
            ],
        ),
    ])
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = Config::load_toml(path)?;
            println!("✓ Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

fn render(ctx: &ComboBoxContext) {
    let selected = ctx.selected_key.as_ref().map_or("-", Key::as_str);
    let tail = ctx.suggestion_tail().unwrap_or("");
    println!(
        "  input: \"{}\"{}  selected: {}  open: {}",
        ctx.input_value,
        if tail.is_empty() {
            String::new()
        } else {
            format!(" [{tail}]")
        },
        selected,
        if ctx.is_open { "yes" } else { "no" }
    );
    if !ctx.is_open {
        return;
    }
    for row in &ctx.rows {
        let indent = "  ".repeat(row.level);
        if row.is_section {
            println!("    {indent}{}", row.text);
            continue;
        }
        let marker = if row.is_focused { '▸' } else { ' ' };
        let check = if row.is_selected { " ✓" } else { "" };
        println!("   {marker}{indent}{}{check}", row.text);
    }
}

fn run(state: &mut ComboBoxState<Value>, command: Command) {
    match command {
        Command::Type(text) => state.set_input_value(&text),
        Command::Select(key) => state.set_selected_key(Some(Key::new(key))),
        Command::Clear => state.set_input_value(""),
        Command::Open => state.open(None),
        Command::Close => state.close(),
        Command::Toggle => state.toggle(None),
        Command::Down => {
            if state.is_open() {
                state.focus_next();
            } else {
                state.open(Some(FocusStrategy::First));
            }
        }
        Command::Up => {
            if state.is_open() {
                state.focus_previous();
            } else {
                state.open(Some(FocusStrategy::Last));
            }
        }
        Command::Enter => {
            if !state.select_focused_item() {
                println!("  (nothing focused)");
            }
        }
        Command::Tab => {
            if !state.accept_suggestion() {
                println!("  (no suggestion)");
            }
        }
        Command::Focus => state.set_focused(true),
        Command::Blur => state.set_focused(false),
        Command::Show => {}
        Command::Stats => {
            let (hits, misses) = state.cache_stats();
            let rate = state
                .cache_hit_rate()
                .map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}%"));
            println!(
                "  cache: {} views, {hits} hits, {misses} misses, hit rate {rate}",
                state.cache_size()
            );
        }
        Command::Help => println!("{HELP}"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let collection = load_collection(args.items.as_ref())?;

    let props = ComboBoxProps::new(collection)
        .with_config(config)
        .on_input_change(|value| println!("  ← input changed: \"{value}\""))
        .on_selection_change(|key| match key {
            Some(key) => println!("  ← selection changed: {key}"),
            None => println!("  ← selection cleared"),
        })
        .on_open_change(|open| println!("  ← open changed: {open}"));
    let mut state = ComboBoxState::new(props)?;
    state.set_focused(true);

    println!("Ready! Type text to filter, :help for commands, Ctrl+D to exit.");
    println!();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match Command::parse(&line) {
            Ok(Some(command)) => {
                tracing::debug!(?command, "running command");
                let show_state = command != Command::Help;
                run(&mut state, command);
                if show_state {
                    render(&state.context());
                }
            }
            Ok(None) => continue,
            Err(e) => eprintln!("Error: {e}"),
        }
        println!();
    }
    Ok(())
}
