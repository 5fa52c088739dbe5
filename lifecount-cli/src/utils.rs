use std::io::Write;

use eyre::Result;

pub fn clear_terminal() -> Result<()> {
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush()?;
    Ok(())
}

/// A text bar for a 0-100 ratio.
pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress.min(100) as usize * width) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
