//! System clipboard access

use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn read() -> Result<String> {
    let mut clipboard = Clipboard::new().context("opening system clipboard")?;
    clipboard.get_text().context("reading text from clipboard")
}

pub fn write(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("opening system clipboard")?;
    clipboard
        .set_text(text.to_owned())
        .context("writing text to clipboard")
}
