//! End-to-end keystroke scenarios for `InputSession`, driven the way a
//! terminal front end drives it: raw characters mapped through
//! `KeyEvent::from_char`.

use libthai_core::{
    Category, Config, CorpusIndex, CorpusRow, Engine, InputSession, KeyEvent, NoPhoneticCode,
    Notice, SessionState,
};
use std::sync::Arc;

fn engine(rows: Vec<CorpusRow>) -> Engine {
    let index = Arc::new(CorpusIndex::build(rows, &NoPhoneticCode).unwrap());
    Engine::new(index, Arc::new(NoPhoneticCode), Config::default()).unwrap()
}

fn type_keys(session: &mut InputSession, raw: &str) -> Option<String> {
    let mut committed = None;
    for ch in raw.chars() {
        if let Some(key) = KeyEvent::from_char(ch) {
            if let Some(out) = session.feed(key).committed {
                committed = Some(out);
            }
        }
    }
    committed
}

#[test]
fn space_accepts_the_only_candidate() {
    let engine = engine(vec![CorpusRow::new("tha", "ท่า", Category::Generic)]);
    let mut session = engine.session();

    for ch in ['t', 'h', 'a'] {
        let r = session.feed(KeyEvent::Char(ch));
        assert_eq!(r.render.state, SessionState::Suggesting);
    }
    assert_eq!(session.suggestions()[0].canonical_form(), "ท่า");

    let r = session.feed(KeyEvent::Space);
    assert_eq!(r.render.output, "ท่า");
    assert_eq!(r.render.buffer, "");
    assert_eq!(r.render.state, SessionState::Empty);
    assert!(r.render.suggestions.is_empty());
}

#[test]
fn backspace_to_empty_clears_suggestions() {
    let engine = engine(vec![CorpusRow::new("tha", "ท่า", Category::Generic)]);
    let mut session = engine.session();

    session.feed(KeyEvent::Char('x'));
    let r = session.feed(KeyEvent::Backspace);
    assert_eq!(r.render.state, SessionState::Empty);
    assert!(r.render.suggestions.is_empty());
    assert!(r.render.buffer.is_empty());
}

#[test]
fn backspace_reranks_in_place() {
    let engine = engine(vec![
        CorpusRow::new("kon", "คน", Category::Generic),
        CorpusRow::new("ko", "ก็", Category::Generic),
    ]);
    let mut session = engine.session();
    type_keys(&mut session, "kon");
    assert_eq!(session.suggestions()[0].canonical_form(), "คน");

    let r = session.feed(KeyEvent::Backspace);
    assert_eq!(r.render.buffer, "ko");
    assert_eq!(r.render.state, SessionState::Suggesting);
    assert_eq!(r.render.suggestions[0].canonical_form(), "ก็");
}

#[test]
fn sentence_built_from_selections_is_flushed_on_enter() {
    let engine = engine(vec![
        CorpusRow::new("chan", "ฉัน", Category::Generic),
        CorpusRow::new("rak", "รัก", Category::Generic),
        CorpusRow::new("khun", "คุณ", Category::Generic),
    ]);
    let mut session = engine.session();

    // selection by digit, by space, then enter accepts the last one
    let committed = type_keys(&mut session, "chan1rak khun\r");
    assert_eq!(committed.as_deref(), Some("ฉันรักคุณ"));
    assert_eq!(session.state(), SessionState::Committed);
}

#[test]
fn escape_never_flushes() {
    let engine = engine(vec![CorpusRow::new("rak", "รัก", Category::Generic)]);
    let mut session = engine.session();
    let committed = type_keys(&mut session, "rak \u{1b}");
    assert!(committed.is_none());
    assert_eq!(session.state(), SessionState::Terminated);
    assert!(session.output().is_empty());

    // ctrl+c behaves the same
    session.reset();
    assert!(type_keys(&mut session, "rak\u{03}").is_none());
    assert_eq!(session.state(), SessionState::Terminated);
}

#[test]
fn out_of_range_digit_leaves_state_untouched() {
    let engine = engine(vec![
        CorpusRow::new("rak", "รัก", Category::Generic),
        CorpusRow::new("rok", "รก", Category::Generic),
    ]);
    let mut session = engine.session();
    type_keys(&mut session, "rak");

    let r = session.feed(KeyEvent::Number(7));
    assert_eq!(
        r.notice,
        Some(Notice::InvalidSelection {
            requested: 7,
            available: 2
        })
    );
    assert_eq!(r.render.state, SessionState::Suggesting);
    assert_eq!(r.render.buffer, "rak");
    assert!(r.render.output.is_empty());
}

#[test]
fn enter_on_empty_buffer_flushes_selected_output() {
    let engine = engine(vec![CorpusRow::new("rak", "รัก", Category::Generic)]);
    let mut session = engine.session();
    type_keys(&mut session, "rak ");
    assert_eq!(session.output(), "รัก");

    let r = session.feed(KeyEvent::Enter);
    assert_eq!(r.committed.as_deref(), Some("รัก"));
}

#[test]
fn sessions_share_one_index() {
    let engine = engine(vec![CorpusRow::new("tha", "ท่า", Category::Generic)]);
    let mut a = engine.session();
    let mut b = engine.session();
    type_keys(&mut a, "tha ");
    type_keys(&mut b, "th");
    assert_eq!(a.output(), "ท่า");
    assert_eq!(b.buffer(), "th");
    assert!(Arc::ptr_eq(engine.index(), engine.ranker().index()));
}
