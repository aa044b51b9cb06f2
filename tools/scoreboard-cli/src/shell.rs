//! Interactive `SB> ` prompt

use crate::command::HELP;
use crate::session::{Outcome, Session};
use colored::*;
use player_registry::DEFAULT_TABLE_WIDTH;
use std::io::{self, BufRead, Write};

/// Prompt printed before every command
pub const PROMPT: &str = "SB> ";

/// Terminal height assumed when the size cannot be queried
const FALLBACK_HEIGHT: usize = 24;

/// Current terminal size as (columns, rows), or 80x24 when unknown
pub fn terminal_size() -> (usize, usize) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => (cols as usize, rows as usize),
        _ => (DEFAULT_TABLE_WIDTH, FALLBACK_HEIGHT),
    }
}

/// Read commands from `input` until `exit` or end of input
///
/// `width` is queried before every table so resizes are picked up.
pub fn run<R, W, F>(session: &mut Session, input: R, mut out: W, width: F) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    F: Fn() -> usize,
{
    write!(out, "{}", session.registry().render(width()))?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        match session.handle_line(&line) {
            Ok(Outcome::Nothing) => {}
            Ok(Outcome::Table) => write!(out, "{}", session.registry().render(width()))?,
            Ok(Outcome::Changed(message)) => {
                writeln!(out, "{}", message.green())?;
                write!(out, "{}", session.registry().render(width()))?;
            }
            Ok(Outcome::Info(message)) => writeln!(out, "{message}")?,
            Ok(Outcome::Help) => print_help(&mut out)?,
            Ok(Outcome::Exit) => break,
            Err(e) if e.is_warning() => writeln!(out, "{} {e}", "<Warning>:".yellow().bold())?,
            Err(e) => writeln!(out, "{} {e}", "<Error>:".red().bold())?,
        }
    }

    Ok(())
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Available commands:".cyan().bold())?;
    let column = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    for (usage, description) in HELP {
        writeln!(out, "  {usage:<column$}  {description}")?;
    }
    writeln!(out, "A <target> is a rank (1 is the top) or a player name.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_registry::PlayerRegistry;

    fn run_script(session: &mut Session, script: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        run(session, script.as_bytes(), &mut out, || 40).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_script_updates_table() {
        let mut session = Session::new(PlayerRegistry::new(0, 10, 255), None, None);
        let output = run_script(&mut session, "player add Alice 5\nplayer add Bob 5\nwin Bob\n");

        assert!(output.starts_with(" ---"));
        assert!(output.contains("Added Alice"));
        assert!(output.contains("Win recorded, score is now 6"));
        assert!(output.ends_with(&format!("{PROMPT}\n")));

        let last_table = output.rsplit("Win recorded").next().unwrap();
        let bob = last_table.find("| Bob").unwrap();
        let alice = last_table.find("| Alice").unwrap();
        assert!(bob < alice);
    }

    #[test]
    fn test_errors_and_warnings_keep_running() {
        let mut session = Session::new(PlayerRegistry::new(1, 10, 255), None, None);
        let output = run_script(&mut session, "win Nobody\nremove 1\nloss 5\nplayer 1\nexit\n");

        assert!(output.contains("<Warning>: Player 'Nobody' not found"));
        assert!(output.contains("<Error>: Unknown command 'remove'"));
        assert!(output.contains("<Error>: Invalid rank 5: registry holds 1 player(s)"));
        assert!(output.contains("1. Player - score 0"));
        assert_eq!(session.registry().len(), 1);
    }

    #[test]
    fn test_help_lists_commands() {
        let mut session = Session::new(PlayerRegistry::default(), None, None);
        let output = run_script(&mut session, "help\nquit\n");

        for (usage, _) in HELP {
            assert!(output.contains(usage), "missing {usage}");
        }
    }
}
