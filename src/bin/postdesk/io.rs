#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::client::CliError;

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

/// File contents win over the inline value.
pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    match file {
        Some(path) => read_file(&path).map(Some),
        None => Ok(val),
    }
}

/// Password from a file (trailing newline stripped) or the environment.
pub fn read_password(file: Option<PathBuf>, env: Option<String>) -> Result<String, CliError> {
    let password = match file {
        Some(path) => read_file(&path)?.trim_end_matches(['\r', '\n']).to_string(),
        None => env.unwrap_or_default(),
    };
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(password)
}

/// Ask a yes/no question on stderr and read the answer from `input`.
/// Anything other than `y`/`yes` declines.
pub fn confirm_with(prompt: &str, input: &mut impl BufRead) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn confirm(prompt: &str) -> bool {
    confirm_with(prompt, &mut io::stdin().lock())
}
