use std::{
    fs,
    io::{self, BufRead, Read, Write},
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::webloc::{self, WeblocDocument};

/// Path argument that stands for standard input or output.
const STDIO_PATH: &str = "-";

#[derive(Parser, Debug)]
#[command(
    version,
    name = "webloc",
    about = "Read and write macOS .webloc URL bookmark files"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub subcommand: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the URL stored in a webloc file.
    Read {
        /// The webloc file to read. Reads standard input when omitted or `-`.
        path: Option<PathBuf>,
    },
    /// Store a URL in a webloc file, overwriting it if it exists.
    Save {
        /// Where to write the webloc. `-` writes it to standard output.
        path: PathBuf,
        /// The URL to store. Read as one line from standard input when omitted.
        url: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read from standard input")]
    Stdin(#[source] io::Error),
    #[error("Failed to write to standard output")]
    Stdout(#[source] io::Error),
    #[error("Standard input ended before a URL was given")]
    NoUrl,
    #[error("{origin} is not a valid webloc file")]
    Format {
        origin: String,
        #[source]
        source: webloc::Error,
    },
    #[error("Failed to encode {url:?} as a webloc")]
    Encode {
        url: String,
        #[source]
        source: webloc::Error,
    },
}

impl Cli {
    /// Run the parsed command against the process's standard streams.
    pub fn run(self) -> Result<(), Error> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.subcommand.run(stdin.lock(), stdout.lock())
    }
}

impl Command {
    /// Run the command, with `input` and `output` standing in for stdin and stdout.
    pub fn run<R: BufRead, W: Write>(self, input: R, mut output: W) -> Result<(), Error> {
        match self {
            Command::Read { path } => {
                let doc = read_document(path.as_deref(), input)?;
                writeln!(output, "{doc}").map_err(Error::Stdout)?;
            }
            Command::Save { path, url } => {
                let url = match url {
                    Some(url) => url,
                    None => read_url_line(input)?,
                };
                if let Err(error) = Url::parse(&url) {
                    warn!(%error, url = %url, "saving a value that is not an absolute URL");
                }
                let doc = WeblocDocument::new(url);
                let bytes = doc.to_bytes().map_err(|source| Error::Encode {
                    url: doc.url().to_owned(),
                    source,
                })?;
                if is_stdio(&path) {
                    output.write_all(&bytes).map_err(Error::Stdout)?;
                } else {
                    fs::write(&path, &bytes).map_err(|source| Error::Write {
                        path: path.clone(),
                        source,
                    })?;
                    debug!(path = %path.display(), bytes = bytes.len(), "wrote webloc");
                }
            }
        }
        output.flush().map_err(Error::Stdout)
    }
}

fn is_stdio(path: &Path) -> bool {
    path == Path::new(STDIO_PATH)
}

fn read_document<R: Read>(path: Option<&Path>, mut input: R) -> Result<WeblocDocument, Error> {
    let (origin, bytes) = match path.filter(|p| !is_stdio(p)) {
        Some(path) => {
            let bytes = fs::read(path).map_err(|source| Error::Read {
                path: path.to_owned(),
                source,
            })?;
            (path.display().to_string(), bytes)
        }
        None => {
            let mut bytes = Vec::new();
            input.read_to_end(&mut bytes).map_err(Error::Stdin)?;
            ("standard input".to_owned(), bytes)
        }
    };
    debug!(%origin, bytes = bytes.len(), "read webloc");
    WeblocDocument::from_bytes(&bytes).map_err(|source| Error::Format { origin, source })
}

/// Read exactly one line, dropping only its line terminator.
fn read_url_line<R: BufRead>(mut input: R) -> Result<String, Error> {
    let mut line = String::new();
    if input.read_line(&mut line).map_err(Error::Stdin)? == 0 {
        return Err(Error::NoUrl);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}
