//! Parse interactive stdin commands into view commands.

use std::io::{self, BufRead};
use std::thread;

use gatewatch_core::{LogLimit, SiteSelection, ViewCommand};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

pub const HELP: &str = "commands: r (reload) | s <site|all> | n <10|30|50> | q (quit)";

/// `Ok(None)` for blank lines; `Err` carries a message for the user.
pub fn parse_command(line: &str) -> Result<Option<ViewCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    match (verb, arg) {
        ("r" | "reload", None) => Ok(Some(ViewCommand::Reload)),
        ("q" | "quit", None) => Ok(Some(ViewCommand::Quit)),
        ("s" | "site", Some(site)) => Ok(Some(ViewCommand::SelectSite(SiteSelection::parse(site)))),
        ("n" | "count", Some(n)) => n.parse::<LogLimit>().map(|limit| Some(ViewCommand::SetLogLimit(limit))),
        _ => Err(format!("unrecognised command {:?}; {}", line.trim(), HELP)),
    }
}

/// Why [`forward_commands`] stopped reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderEnd {
    /// `q` was forwarded.
    Quit,
    /// The loop dropped its receiver.
    Closed,
    /// Input ran out (or became unreadable).
    Eof,
}

/// Blocking line reader feeding the refresh loop. Must run on a plain thread,
/// never inside the async runtime, since it blocks on both input and the channel.
pub fn forward_commands<R: BufRead>(reader: R, tx: &mpsc::Sender<ViewCommand>) -> ReaderEnd {
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        match parse_command(&line) {
            Ok(Some(command)) => {
                let quit = command == ViewCommand::Quit;
                if tx.blocking_send(command).is_err() {
                    return ReaderEnd::Closed;
                }
                if quit {
                    return ReaderEnd::Quit;
                }
            }
            Ok(None) => {}
            Err(message) => eprintln!("{}", message),
        }
    }
    ReaderEnd::Eof
}

/// Read commands on a dedicated thread. The thread is not part of the runtime, so
/// a read still pending at shutdown does not hold the process open. At end of
/// input the sender is kept until the loop exits, so a closed stdin does not stop
/// the board.
pub fn spawn_command_reader<R>(reader: R, tx: mpsc::Sender<ViewCommand>, runtime: Handle) -> io::Result<thread::JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            if forward_commands(reader, &tx) == ReaderEnd::Eof {
                runtime.block_on(tx.closed());
            }
        })
}
