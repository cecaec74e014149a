//! Blocking terminal prompts backing the portal's dialogs.

use std::io::{self, BufRead, Write};

use subscription_portal::pages::Dialog;

/// Reads confirmations from stdin and writes prompts and alerts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalDialog;

impl Dialog for TerminalDialog {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = io::stderr().lock();
        // A broken terminal reads as "no".
        let prompted = write!(stderr, "{message} [y/N] ").and_then(|()| stderr.flush());
        if prompted.is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("» {message}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
