//! Incremental input session.
//!
//! `InputSession` owns the romanized buffer, the current suggestion list and the
//! output committed so far. Each key event is handled to completion (mutate,
//! re-rank, render) before `feed` returns; there is no background work.
//!
//! State transitions:
//!
//! | key        | from                  | to                          |
//! |------------|-----------------------|-----------------------------|
//! | char       | Empty/Typing/Suggesting | Suggesting, or Typing on no match |
//! | backspace  | Typing/Suggesting     | Empty when the buffer empties, else re-ranked |
//! | digit 1..K | Suggesting            | Empty (suggestion appended to output) |
//! | space      | Suggesting            | same as digit 1             |
//! | enter      | any live state        | Committed (output flushed)  |
//! | escape     | any live state        | Terminated (output dropped) |
//!
//! `Committed` and `Terminated` ignore further keys until [`InputSession::reset`].

use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::candidate::ScoredCandidate;
use crate::ranker::Ranker;
use crate::scorer::{Scorer, SimilarityScorer};

/// Keyboard events understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable character input
    Char(char),
    /// Digit key, selects suggestion N (1-based) while suggesting
    Number(u8),
    /// Accept the top suggestion
    Space,
    /// Accept and flush the committed output
    Enter,
    /// Drop everything and quit
    Escape,
    /// Delete the last buffered character
    Backspace,
}

impl KeyEvent {
    /// Map a raw terminal character to a key event.
    ///
    /// Digits become `Number`, `\r`/`\n` Enter, DEL/BS Backspace, ESC and
    /// Ctrl+C Escape. Any other control character yields `None`.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0'..='9' => Some(KeyEvent::Number(ch as u8 - b'0')),
            ' ' => Some(KeyEvent::Space),
            '\r' | '\n' => Some(KeyEvent::Enter),
            '\u{7f}' | '\u{08}' => Some(KeyEvent::Backspace),
            '\u{1b}' | '\u{03}' => Some(KeyEvent::Escape),
            c if c.is_control() => None,
            c => Some(KeyEvent::Char(c)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Typing,
    Suggesting,
    Committed,
    Terminated,
}

impl SessionState {
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Committed | SessionState::Terminated)
    }
}

/// Non-fatal conditions surfaced alongside a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The buffer produced an empty suggestion list.
    NoMatch,
    /// A digit key beyond the available suggestions was ignored.
    InvalidSelection { requested: u8, available: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoMatch => write!(f, "no match"),
            Notice::InvalidSelection {
                requested,
                available,
            } => write!(
                f,
                "no suggestion {} ({} available)",
                requested, available
            ),
        }
    }
}

/// Snapshot of everything a front end needs to draw the session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub state: SessionState,
    pub buffer: String,
    /// Output committed by selections, not yet flushed.
    pub output: String,
    pub suggestions: Vec<ScoredCandidate>,
}

/// Result of one `feed` call.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedResult {
    pub render: RenderState,
    /// The flushed output, set only by the key that commits the session.
    pub committed: Option<String>,
    pub notice: Option<Notice>,
}

/// Keystroke-driven suggestion and commit state machine.
pub struct InputSession<S = SimilarityScorer> {
    ranker: Arc<Ranker<S>>,
    top_k: usize,
    state: SessionState,
    buffer: String,
    suggestions: Vec<ScoredCandidate>,
    output: String,
}

impl<S: Scorer> InputSession<S> {
    /// Start a session over a shared ranker, showing up to `top_k` suggestions.
    pub fn new(ranker: Arc<Ranker<S>>, top_k: usize) -> Self {
        Self {
            ranker,
            top_k,
            state: SessionState::Empty,
            buffer: String::new(),
            suggestions: Vec::new(),
            output: String::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn suggestions(&self) -> &[ScoredCandidate] {
        &self.suggestions
    }

    /// Output committed by selections so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Start over with an empty buffer and output, keeping the ranker.
    pub fn reset(&mut self) {
        self.state = SessionState::Empty;
        self.buffer.clear();
        self.suggestions.clear();
        self.output.clear();
    }

    pub fn render(&self) -> RenderState {
        RenderState {
            state: self.state,
            buffer: self.buffer.clone(),
            output: self.output.clone(),
            suggestions: self.suggestions.clone(),
        }
    }

    /// Handle one key event to completion.
    pub fn feed(&mut self, key: KeyEvent) -> FeedResult {
        trace!(?key, state = ?self.state, "feed");

        if self.state.is_finished() {
            return self.result(None, None);
        }

        match key {
            KeyEvent::Char(ch) => {
                if ch.is_control() || ch.is_whitespace() {
                    return self.result(None, None);
                }
                self.buffer.push(ch);
                let notice = self.rerank();
                self.result(None, notice)
            }
            KeyEvent::Backspace => {
                if self.buffer.pop().is_some() {
                    if self.buffer.is_empty() {
                        self.suggestions.clear();
                        self.state = SessionState::Empty;
                        return self.result(None, None);
                    }
                    let notice = self.rerank();
                    self.result(None, notice)
                } else {
                    // nothing buffered: edit the pending output instead
                    self.output.pop();
                    self.result(None, None)
                }
            }
            KeyEvent::Number(n) => {
                if self.state != SessionState::Suggesting {
                    return self.result(None, None);
                }
                let available = self.suggestions.len();
                if n == 0 || usize::from(n) > available {
                    let notice = Notice::InvalidSelection {
                        requested: n,
                        available,
                    };
                    debug!(%notice, "ignored selection");
                    return self.result(None, Some(notice));
                }
                self.select(usize::from(n) - 1);
                self.result(None, None)
            }
            KeyEvent::Space => {
                if self.state == SessionState::Suggesting {
                    self.select(0);
                }
                self.result(None, None)
            }
            KeyEvent::Enter => {
                if self.state == SessionState::Suggesting {
                    self.select(0);
                }
                self.buffer.clear();
                self.suggestions.clear();
                self.state = SessionState::Committed;
                let flushed = std::mem::take(&mut self.output);
                debug!(output = %flushed, "session committed");
                self.result(Some(flushed), None)
            }
            KeyEvent::Escape => {
                self.buffer.clear();
                self.suggestions.clear();
                self.output.clear();
                self.state = SessionState::Terminated;
                debug!("session terminated");
                self.result(None, None)
            }
        }
    }

    /// Append suggestion `index` to the output and clear the buffer.
    fn select(&mut self, index: usize) {
        if let Some(chosen) = self.suggestions.get(index) {
            debug!(
                buffer = %self.buffer,
                selected = chosen.canonical_form(),
                index,
                "suggestion selected"
            );
            self.output.push_str(chosen.canonical_form());
            self.buffer.clear();
            self.suggestions.clear();
            self.state = SessionState::Empty;
        }
    }

    fn rerank(&mut self) -> Option<Notice> {
        self.suggestions = self.ranker.rank(&self.buffer, self.top_k);
        if self.suggestions.is_empty() {
            self.state = SessionState::Typing;
            Some(Notice::NoMatch)
        } else {
            self.state = SessionState::Suggesting;
            None
        }
    }

    fn result(&self, committed: Option<String>, notice: Option<Notice>) -> FeedResult {
        FeedResult {
            render: self.render(),
            committed,
            notice,
        }
    }
}

impl<S> fmt::Debug for InputSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSession")
            .field("state", &self.state)
            .field("buffer", &self.buffer)
            .field("suggestions", &self.suggestions.len())
            .field("output", &self.output)
            .finish()
    }
}
