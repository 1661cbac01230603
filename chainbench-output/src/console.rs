//! Operator-facing console lines: phase banners and the cooldown countdown

use colored::*;
use std::io::{self, Write};

/// Announce a phase on stdout
pub fn print_banner(message: &str) {
    println!("{}", message.bright_cyan().bold());
}

/// Redraw the countdown in place
pub fn print_countdown(remaining_secs: u64) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\r{}", countdown_line(remaining_secs))?;
    stdout.flush()
}

/// Clear the countdown line
pub fn clear_countdown() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\r{}\r", " ".repeat(40))?;
    stdout.flush()
}

pub fn countdown_line(remaining_secs: u64) -> String {
    format!("Cooldown countdown: {} ", remaining_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_line() {
        assert_eq!(countdown_line(900), "Cooldown countdown: 900 ");
    }
}
