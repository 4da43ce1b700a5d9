//! `.env`-style files: `NAME=VALUE` per line.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Variable name to value, sorted by name.
pub type EnvSnapshot = BTreeMap<String, String>;

/// Default location of the env file, relative to the working directory.
pub const DEFAULT_DOTENV_PATH: &str = ".env";

#[derive(thiserror::Error, Debug)]
pub enum DotenvError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Parse the contents of an env file.
///
/// Blank lines and `#` comments are skipped, as are lines without `=` or
/// with an empty name. An `export ` prefix is accepted. Names and values
/// are trimmed and one pair of matching surrounding quotes is removed from
/// the value. Later definitions of a name win.
pub fn parse_dotenv(content: &str) -> EnvSnapshot {
    let mut vars = EnvSnapshot::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        vars.insert(name.to_string(), unquote(value.trim()).to_string());
    }
    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Read and parse an env file. A missing file yields an empty snapshot.
pub fn read_dotenv(path: impl AsRef<Path>) -> Result<EnvSnapshot, DotenvError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(parse_dotenv(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EnvSnapshot::new()),
        Err(source) => Err(DotenvError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Export the variables of an env file into the process environment.
///
/// Variables already set in the process keep their value. Returns
/// `Ok(false)` when the file does not exist.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, DotenvError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    for (name, value) in read_dotenv(path)? {
        if std::env::var_os(&name).is_none() {
            std::env::set_var(name, value);
        }
    }
    Ok(true)
}
