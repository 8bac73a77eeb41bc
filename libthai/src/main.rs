use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use libthai::{
    CorpusFile, Engine, KeyEvent, Lookup, PhoneticEngine, RenderState, SessionState, ThaiConfig,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "libthai", about = "Romanized Thai to Thai script lookup")]
struct Cli {
    /// Corpus file (.tsv, .txt, .json or .bin). Defaults to the built-in rows.
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Phonetic algorithm: thai or cross
    #[arg(long, global = true)]
    engine: Option<PhoneticEngine>,

    /// Number of suggestions (1-9)
    #[arg(short, global = true)]
    k: Option<usize>,

    /// Debug logging and component scores
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Shortcut for `lookup <query>`
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot lookup
    Lookup { query: String },
    /// Line mode: one query per line, `quit` exits
    Repl,
    /// Keystroke mode: digits select, space accepts, enter commits, esc quits
    Realtime,
    /// One query per line in, JSON lines out
    Batch {
        #[arg(long)]
        input: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_engine(cli: &Cli) -> Result<Engine> {
    let mut config = match &cli.config {
        Some(path) => ThaiConfig::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ThaiConfig::default(),
    };
    if let Some(engine) = cli.engine {
        config.phonetic_engine = engine;
    }
    if let Some(k) = cli.k {
        config.base_mut().top_k = k;
    }

    let engine = match &cli.corpus {
        Some(path) => {
            let file = CorpusFile::open(path)
                .with_context(|| format!("opening corpus {}", path.display()))?;
            Engine::from_provider(&file, config)
                .with_context(|| format!("building index from {}", path.display()))?
        }
        None => Engine::builtin(config).context("building index from built-in rows")?,
    };
    Ok(engine)
}

fn print_results(query: &str, results: &[Lookup], verbose: bool) {
    if results.is_empty() {
        println!("  → (no match for '{}')", query);
        return;
    }
    for (i, r) in results.iter().enumerate() {
        if verbose {
            println!(
                "  {}. {}  ({}, score: {:.1})",
                i + 1,
                r.canonical_form,
                r.romanized_form,
                r.score
            );
        } else {
            println!("  {}. {} (score: {:.1})", i + 1, r.canonical_form, r.score);
        }
    }
}

fn run_lookup(engine: &Engine, query: &str, verbose: bool) {
    let results = engine.lookup_default(query);
    print_results(query, &results, verbose);
}

fn run_repl(engine: &Engine, verbose: bool) -> Result<()> {
    println!("═══════════════════════════════════════════════════");
    println!("  libthai - Romanized Thai Lookup ({} engine)", engine.phonetic_engine());
    println!("═══════════════════════════════════════════════════");
    println!();
    println!("Type romanized Thai and press Enter.");
    println!("Examples: sawatdee, narak, khopkhun");
    println!("Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" | "q" => break,
            _ => {
                run_lookup(engine, input, verbose);
                println!();
            }
        }
    }

    if verbose {
        let stats = engine.cache_stats();
        println!(
            "cache: {} hits, {} misses, {}/{} entries",
            stats.hits, stats.misses, stats.size, stats.capacity
        );
    }
    Ok(())
}

fn run_batch(engine: &Engine, input: &Path) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("reading queries from {}", input.display()))?;
    let queries: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .collect();

    let results = engine.lookup_batch(&queries, engine.config().base.top_k);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (query, found) in queries.iter().zip(results) {
        let line = serde_json::json!({ "query": query, "results": found });
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Restores cooked mode on every exit path.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn map_key(key: event::KeyEvent) -> Option<KeyEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyEvent::Escape)
        }
        KeyCode::Char(ch) => KeyEvent::from_char(ch),
        KeyCode::Enter => Some(KeyEvent::Enter),
        KeyCode::Backspace => Some(KeyEvent::Backspace),
        KeyCode::Esc => Some(KeyEvent::Escape),
        _ => None,
    }
}

fn draw(out: &mut impl Write, render: &RenderState, verbose: bool) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    write!(out, "{}", render.output)?;
    if !render.buffer.is_empty() {
        write!(out, "[{}]", render.buffer)?;
    }
    if render.state == SessionState::Suggesting {
        write!(out, "  ")?;
        for (i, s) in render.suggestions.iter().enumerate() {
            if verbose {
                let c = &s.components;
                write!(
                    out,
                    " {}.{}({:.0}: sx {:.2} ed {:.2} ng {:.2} px {:.2} +{:.1})",
                    i + 1,
                    s.canonical_form(),
                    s.score,
                    c.soundex_match,
                    c.edit_distance,
                    c.ngram_similarity,
                    c.prefix_bonus,
                    c.priority_boost
                )?;
            } else {
                write!(out, " {}.{}", i + 1, s.canonical_form())?;
            }
        }
    }
    out.flush()
}

fn run_realtime(engine: &Engine, verbose: bool) -> Result<()> {
    println!("Realtime mode ({} engine)", engine.phonetic_engine());
    println!("1-9 select, space takes the top match, enter commits the line, esc quits.");

    let mut session = engine.session();
    let mut stdout = io::stdout();
    let _guard = RawModeGuard::enable()?;

    loop {
        let key = match event::read().context("reading terminal event")? {
            Event::Key(key) => match map_key(key) {
                Some(k) => k,
                None => continue,
            },
            _ => continue,
        };

        let result = session.feed(key);
        draw(&mut stdout, &result.render, verbose)?;
        if let Some(notice) = &result.notice {
            tracing::debug!(%notice, "session notice");
        }

        match result.render.state {
            SessionState::Committed => {
                let committed = result.committed.unwrap_or_default();
                execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                write!(stdout, "✓ {}\r\n", committed)?;
                stdout.flush()?;
                session.reset();
            }
            SessionState::Terminated => {
                write!(stdout, "\r\n")?;
                stdout.flush()?;
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let engine = build_engine(&cli)?;

    match (&cli.command, &cli.query) {
        (Some(Commands::Lookup { query }), _) | (None, Some(query)) => {
            run_lookup(&engine, query, cli.verbose);
            Ok(())
        }
        (Some(Commands::Repl), _) | (None, None) => run_repl(&engine, cli.verbose),
        (Some(Commands::Realtime), _) => run_realtime(&engine, cli.verbose),
        (Some(Commands::Batch { input }), _) => run_batch(&engine, input),
    }
}
