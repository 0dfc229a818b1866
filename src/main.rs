//! txtreader - Entry Point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use txtreader::config::{resolve_config, KeyBindings};
use txtreader::library::Library;
use txtreader::model::{BookSummary, BookTitle};
use txtreader::view::{page_viewport, run_reader, ColorConfig, ReaderStyles};

/// txtreader - read plain-text e-books in the terminal
#[derive(Parser, Debug)]
#[command(name = "txtreader")]
#[command(version)]
#[command(about = "Terminal reader for plain-text e-books with chapter detection and resumable pagination")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Library directory (overrides config and TXTREADER_LIBRARY_DIR)
    #[arg(long, global = true)]
    pub library_dir: Option<PathBuf>,

    /// Disable colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Import a text file; its file name (without extension) becomes the title
    Import {
        /// Path to the .txt file
        path: PathBuf,
    },
    /// List imported books with reading progress
    List,
    /// Print a book's chapter headings
    Chapters {
        /// Book title
        #[arg(value_parser = parse_title)]
        title: BookTitle,
    },
    /// Delete a book and its stored text
    Remove {
        /// Book title
        #[arg(value_parser = parse_title)]
        title: BookTitle,
    },
    /// Open a book in the pager at its last position
    Read {
        /// Book title
        #[arg(value_parser = parse_title)]
        title: BookTitle,
    },
}

fn parse_title(raw: &str) -> Result<BookTitle, txtreader::model::InvalidTitle> {
    BookTitle::new(raw)
}

fn format_summary(book: &BookSummary) -> String {
    format!(
        "{}\t{:>3}%\t{}/{}",
        book.title, book.progress, book.last_position, book.length
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = resolve_config(args.config.clone(), args.library_dir.clone())?;

    txtreader::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let library = Library::from_config(&config)?;

    match args.command {
        Command::Import { path } => {
            let record = library.import(&path)?;
            println!("Imported '{}' ({} lines)", record.title, record.length);
        }
        Command::List => {
            let books = library.list()?;
            if books.is_empty() {
                println!("No books imported yet.");
            }
            for book in &books {
                println!("{}", format_summary(book));
            }
        }
        Command::Chapters { title } => {
            for (ordinal, marker) in library.chapters(&title)?.iter().enumerate() {
                println!("{:>4}\t{:>6}\t{}", ordinal + 1, marker.start, marker.title);
            }
        }
        Command::Remove { title } => {
            library.remove(&title)?;
            println!("Removed '{}'", title);
        }
        Command::Read { title } => {
            let (width, height) = crossterm::terminal::size()?;
            let session = library.open(&title, page_viewport(width, height))?;
            let styles = ReaderStyles::with_color_config(ColorConfig::from_env_and_args(args.no_color));
            let session = run_reader(session, KeyBindings::default(), styles)?;
            session.flush_position();
            info!(title = %title, position = session.position(), "Closed book");
        }
    }

    Ok(())
}
