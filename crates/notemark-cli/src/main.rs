//! `notemark` - parse, restore and inspect markdown-flavored notes.
use anyhow::{Context, Result, bail};
use clap::{Parser as ClapParser, Subcommand};
use notemark_config::Config;
use notemark_syntax::{Document, Parser, format_tree, render_html, tags};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(ClapParser)]
#[command(name = "notemark")]
#[command(about = "Parse and inspect markdown-flavored notes")]
struct Args {
    /// Config file to use instead of ~/.config/notemark/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log parser decisions (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the syntax tree of a note
    Parse {
        /// Note to read, `-` for stdin
        file: PathBuf,
        /// Print the tree as JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },
    /// Parse a note and print the restored source
    Stringify {
        /// Note to read, `-` for stdin
        file: PathBuf,
    },
    /// Render a note as an HTML fragment
    Html {
        /// Note to read, `-` for stdin
        file: PathBuf,
    },
    /// List the tags used across notes
    Tags {
        /// Notes or folders to scan; defaults to `notes_path` from the config
        paths: Vec<PathBuf>,
        /// Show how many notes use each tag
        #[arg(long)]
        count: bool,
        /// Only print tags missing from this comma-separated list
        #[arg(long, value_delimiter = ',')]
        suggest: Option<Vec<String>>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let registry = config
        .registry()
        .context("Invalid `disabled_rules` in parser config")?;
    let parser = Parser::new(&registry, config.parser_options());

    match args.command {
        Command::Parse { file, json } => {
            let doc = parser.parse(&read_note(&file)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print!("{}", format_tree(&doc.children));
            }
        }
        Command::Stringify { file } => {
            print!("{}", parser.parse(&read_note(&file)?).stringify());
        }
        Command::Html { file } => {
            println!("{}", render_html(&parser.parse(&read_note(&file)?)));
        }
        Command::Tags {
            paths,
            count,
            suggest,
        } => {
            let paths = if paths.is_empty() {
                match config.notes_path {
                    Some(notes_path) => vec![notes_path],
                    None => bail!(
                        "No notes given and no `notes_path` set in {}",
                        args.config.unwrap_or_else(Config::config_path).display()
                    ),
                }
            } else {
                paths
            };
            let docs = parse_all(&parser, &paths)?;
            for line in tag_report(&docs, count, suggest.as_deref()) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = path.map_or_else(Config::config_path, Path::to_path_buf);
    match Config::load_from_path(&config_path)? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        }
        None if path.is_some() => bail!("Config file {} not found", config_path.display()),
        None => Ok(Config::default()),
    }
}

/// Read a note from a file, or from stdin for `-`.
fn read_note(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read note from stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Every `.md` file under `dir`.
fn collect_notes(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_notes(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            found.push(path);
        }
    }
    Ok(())
}

fn parse_all(parser: &Parser<'_>, paths: &[PathBuf]) -> Result<Vec<Document>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut notes = Vec::new();
            collect_notes(path, &mut notes)?;
            notes.sort();
            files.extend(notes);
        } else {
            files.push(path.clone());
        }
    }
    log::debug!("Scanning {} notes for tags", files.len());

    files
        .iter()
        .map(|file| Ok(parser.parse(&read_note(file)?)))
        .collect()
}

fn tag_report(docs: &[Document], count: bool, suggest: Option<&[String]>) -> Vec<String> {
    if let Some(existing) = suggest {
        return tags::suggest_tags(docs, existing);
    }
    let counts = tags::count_tags(docs);
    if count {
        counts
            .into_iter()
            .map(|(tag, n)| format!("{n}\t#{tag}"))
            .collect()
    } else {
        counts.into_keys().map(|tag| format!("#{tag}")).collect()
    }
}
