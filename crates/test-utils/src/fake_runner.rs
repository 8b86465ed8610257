use std::sync::{Arc, Mutex};
use std::time::Duration;

use gradefleet::exec::{CommandResult, CommandRunner, Invocation, RunFuture};

type Matcher = Arc<dyn Fn(&Invocation) -> bool + Send + Sync>;

#[derive(Clone)]
enum Reply {
    Result(CommandResult),
    Panic(String),
}

#[derive(Clone)]
struct Rule {
    matches: Matcher,
    reply: Reply,
    delay: Option<Duration>,
}

/// A scripted command runner that:
/// - records every invocation it receives
/// - answers with the first rule whose matcher accepts the invocation
/// - falls back to an empty `success` for anything unscripted
#[derive(Clone, Default)]
pub struct FakeRunner {
    rules: Arc<Mutex<Vec<Rule>>>,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl std::fmt::Debug for FakeRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeRunner")
            .field("calls", &self.calls.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, matches: Matcher, reply: Reply, delay: Option<Duration>) {
        self.rules.lock().unwrap().push(Rule {
            matches,
            reply,
            delay,
        });
    }

    /// Reply with `result` to any command line containing `needle`.
    pub fn on(self, needle: &str, result: CommandResult) -> Self {
        let needle = needle.to_string();
        self.push(
            Arc::new(move |inv: &Invocation| inv.command_line().contains(&needle)),
            Reply::Result(result),
            None,
        );
        self
    }

    /// Like [`on`](Self::on), but only after sleeping for `delay`.
    pub fn on_delayed(self, needle: &str, delay: Duration, result: CommandResult) -> Self {
        let needle = needle.to_string();
        self.push(
            Arc::new(move |inv: &Invocation| inv.command_line().contains(&needle)),
            Reply::Result(result),
            Some(delay),
        );
        self
    }

    /// Reply with `result` when the command line contains `needle` and the
    /// working directory contains `dir`.
    pub fn on_in(self, dir: &str, needle: &str, result: CommandResult) -> Self {
        let needle = needle.to_string();
        let dir = dir.to_string();
        self.push(
            Arc::new(move |inv: &Invocation| {
                inv.cwd.to_string_lossy().contains(&dir) && inv.command_line().contains(&needle)
            }),
            Reply::Result(result),
            None,
        );
        self
    }

    /// Panic inside the runner for matching commands.
    pub fn panic_on(self, needle: &str, message: &str) -> Self {
        let needle = needle.to_string();
        self.push(
            Arc::new(move |inv: &Invocation| inv.command_line().contains(&needle)),
            Reply::Panic(message.to_string()),
            None,
        );
        self
    }

    /// Everything run so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines run so far, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }

    /// How many recorded command lines contain `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|l| l.contains(needle))
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: Invocation) -> RunFuture<'_> {
        let rule = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|r| (r.matches)(&invocation))
            .cloned();
        self.calls.lock().unwrap().push(invocation);

        Box::pin(async move {
            let Some(rule) = rule else {
                return CommandResult::success("");
            };
            if let Some(delay) = rule.delay {
                tokio::time::sleep(delay).await;
            }
            match rule.reply {
                Reply::Result(result) => result,
                Reply::Panic(message) => panic!("{message}"),
            }
        })
    }
}
