//! Clipboard reformatter
//!
//! Reads the clipboard once, reflows a pasted model answer into headings and
//! wrapped paragraphs, and writes the result back.

use anyhow::Result;
use clap::Parser;
use ollama_idea_relay::reformat::{self, clipboard};

#[derive(Parser, Debug)]
#[command(name = "reformat-clipboard", about = "Reformat model output on the clipboard")]
struct Args {
    /// Column to wrap paragraphs at
    #[arg(long, default_value_t = reformat::DEFAULT_WIDTH)]
    width: usize,

    /// Print the result instead of writing it back to the clipboard
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let unformatted = clipboard::read()?;
    let formatted = reformat::format_text(&unformatted, args.width);

    if args.stdout {
        println!("{formatted}");
    } else {
        clipboard::write(&formatted)?;
        println!("Formatted text copied to clipboard.");
    }

    Ok(())
}
