use std::future::Future;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::warn;

/// Yes/no prompt capability. `true` means proceed.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrompt {
    pub id: u64,
    pub message: String,
}

struct Slot {
    prompt: PendingPrompt,
    reply: oneshot::Sender<bool>,
}

#[derive(Default)]
struct DialogState {
    next_id: u64,
    slot: Option<Slot>,
}

/// Confirmation dialog backed by a single pending-request slot. While a
/// prompt is open any further request resolves `false` straight away.
#[derive(Clone, Default)]
pub struct ConfirmService {
    state: Arc<Mutex<DialogState>>,
}

impl ConfirmService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The prompt currently shown, if any.
    pub fn pending(&self) -> Option<PendingPrompt> {
        self.lock().slot.as_ref().map(|s| s.prompt.clone())
    }

    pub fn is_open(&self) -> bool {
        self.lock().slot.is_some()
    }

    /// Answers the open prompt. Returns false when nothing was pending.
    pub fn resolve(&self, answer: bool) -> bool {
        let slot = self.lock().slot.take();
        match slot {
            Some(slot) => {
                let _ = slot.reply.send(answer);
                true
            }
            None => false,
        }
    }

    pub fn accept(&self) -> bool {
        self.resolve(true)
    }

    pub fn cancel(&self) -> bool {
        self.resolve(false)
    }

    /// Escape dismisses the prompt as a "no".
    pub fn escape(&self) -> bool {
        self.cancel()
    }

    fn open(&self, message: &str) -> Option<oneshot::Receiver<bool>> {
        let mut state = self.lock();
        if let Some(current) = &state.slot {
            warn!(
                pending = %current.prompt.message,
                requested = %message,
                "Confirmation already pending, declining new request"
            );
            return None;
        }
        state.next_id += 1;
        let (tx, rx) = oneshot::channel();
        state.slot = Some(Slot {
            prompt: PendingPrompt {
                id: state.next_id,
                message: message.to_string(),
            },
            reply: tx,
        });
        Some(rx)
    }
}

impl Confirmer for ConfirmService {
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send {
        let rx = self.open(message);
        async move {
            match rx {
                // A dropped sender (service torn down) counts as "no".
                Some(rx) => rx.await.unwrap_or(false),
                None => false,
            }
        }
    }
}

/// Always answers the same way. Backs `--yes` and non-interactive use.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    fn confirm(&self, _message: &str) -> impl Future<Output = bool> + Send {
        std::future::ready(self.0)
    }
}

/// Asks on the terminal with a `[y/N]` prompt; end of input means no.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl TerminalConfirm {
    pub fn ask<R: BufRead, W: Write>(message: &str, input: &mut R, output: &mut W) -> bool {
        if write!(output, "{} [y/N] ", message).and_then(|_| output.flush()).is_err() {
            return false;
        }
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

impl Confirmer for TerminalConfirm {
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send {
        let message = message.to_string();
        async move {
            tokio::task::spawn_blocking(move || {
                let stdin = std::io::stdin();
                let mut stderr = std::io::stderr();
                TerminalConfirm::ask(&message, &mut stdin.lock(), &mut stderr)
            })
            .await
            .unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn accept_resolves_the_pending_prompt() {
        let dialog = ConfirmService::new();
        let waiting = dialog.confirm("Are you sure you want to delete this job?");
        let prompt = dialog.pending().unwrap();
        assert_eq!(prompt.message, "Are you sure you want to delete this job?");

        assert!(dialog.accept());
        assert!(waiting.await);
        assert!(!dialog.is_open());
    }

    #[tokio::test]
    async fn escape_resolves_false() {
        let dialog = ConfirmService::new();
        let waiting = dialog.confirm("Delete?");
        assert!(dialog.escape());
        assert!(!waiting.await);
    }

    #[tokio::test]
    async fn second_request_is_declined_while_one_is_open() {
        let dialog = ConfirmService::new();
        let first = dialog.confirm("first");
        assert!(!dialog.confirm("second").await);

        assert_eq!(dialog.pending().unwrap().message, "first");
        dialog.accept();
        assert!(first.await);
    }

    #[test]
    fn resolving_with_nothing_pending_is_a_noop() {
        let dialog = ConfirmService::new();
        assert!(!dialog.accept());
        assert!(!dialog.escape());
    }

    #[test]
    fn auto_confirm_answers_immediately() {
        assert!(tokio_test::block_on(AutoConfirm(true).confirm("Delete?")));
        assert!(!tokio_test::block_on(AutoConfirm(false).confirm("Delete?")));
    }

    #[test]
    fn terminal_prompt_reads_yes_and_no() {
        let mut out = Vec::new();
        assert!(TerminalConfirm::ask("Delete?", &mut Cursor::new("y\n"), &mut out));
        assert!(TerminalConfirm::ask("Delete?", &mut Cursor::new(" YES \n"), &mut out));
        assert!(!TerminalConfirm::ask("Delete?", &mut Cursor::new("n\n"), &mut out));
        assert!(!TerminalConfirm::ask("Delete?", &mut Cursor::new(""), &mut out));
        assert!(String::from_utf8(out).unwrap().starts_with("Delete? [y/N] "));
    }
}
