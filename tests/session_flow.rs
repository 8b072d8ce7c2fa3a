use std::collections::{BTreeSet, VecDeque};
use std::io;
use std::time::Duration;

use mcq_tui::{
    run_session, AnsiRenderer, Answer, AnswerStore, InputRead, Item, ItemKind, PersistReport,
    RawInput, Session, SingleSelection, StdinBufferOptions, Terminal, Termination,
    YesNoSelection,
};
use pretty_assertions::assert_eq;

enum Step {
    Bytes(&'static [u8]),
    Pause,
    Signal,
}

/// Replays keyboard bytes, then reports end of input.
struct ReplayTerminal {
    steps: VecDeque<Step>,
    raw: bool,
    starts: usize,
    stops: usize,
    signal: bool,
}

impl ReplayTerminal {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            raw: false,
            starts: 0,
            stops: 0,
            signal: false,
        }
    }
}

impl Terminal for ReplayTerminal {
    fn start(&mut self) -> io::Result<()> {
        self.raw = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.raw = false;
        self.stops += 1;
        Ok(())
    }

    fn read_input(&mut self, buf: &mut [u8], _timeout_ms: i32) -> io::Result<InputRead> {
        match self.steps.pop_front() {
            Some(Step::Bytes(bytes)) => {
                buf[..bytes.len()].copy_from_slice(bytes);
                Ok(InputRead::Bytes(bytes.len()))
            }
            Some(Step::Pause) => {
                std::thread::sleep(Duration::from_millis(2));
                Ok(InputRead::Timeout)
            }
            Some(Step::Signal) => {
                self.signal = true;
                Ok(InputRead::Timeout)
            }
            None => Ok(InputRead::Closed),
        }
    }

    fn take_interrupt(&mut self) -> bool {
        std::mem::take(&mut self.signal)
    }
}

#[derive(Default)]
struct MemoryStore {
    persisted: Vec<Vec<Answer>>,
}

impl AnswerStore for MemoryStore {
    type Error = io::Error;

    fn persist(&mut self, session: &Session) -> io::Result<PersistReport> {
        self.persisted.push(
            session
                .items()
                .iter()
                .map(|item| item.answer().clone())
                .collect(),
        );
        Ok(PersistReport {
            answered: session.answered_count(),
            total: session.len(),
        })
    }
}

fn quiz() -> Session {
    Session::new(vec![
        Item::new(
            ItemKind::SingleChoice,
            "Capital of France?",
            vec!["London".into(), "Paris".into(), "Berlin".into()],
        )
        .unwrap()
        .with_reference_answer(2)
        .unwrap(),
        Item::new(
            ItemKind::MultiChoice,
            "Pick languages",
            vec!["Rust".into(), "Go".into(), "C".into()],
        )
        .unwrap(),
        Item::new(ItemKind::YesNoOther, "Working this weekend?", Vec::new()).unwrap(),
    ])
    .unwrap()
}

struct Run {
    termination: Termination,
    answers: Vec<Answer>,
    current_index: usize,
    screen: String,
    terminal: ReplayTerminal,
    persist_calls: usize,
}

fn run(steps: Vec<Step>) -> Run {
    let mut terminal = ReplayTerminal::new(steps);
    let mut store = MemoryStore::default();
    let mut renderer = AnsiRenderer::new(Vec::new(), false);

    let outcome = {
        let mut input =
            RawInput::acquire(&mut terminal, StdinBufferOptions { timeout_ms: 0 }).unwrap();
        let outcome = run_session(quiz(), &mut input, &mut renderer, &mut store);
        input.release().unwrap();
        outcome
    };

    Run {
        termination: outcome.termination,
        answers: outcome
            .session
            .items()
            .iter()
            .map(|item| item.answer().clone())
            .collect(),
        current_index: outcome.session.current_index(),
        screen: String::from_utf8(renderer.into_inner()).unwrap(),
        terminal,
        persist_calls: store.persisted.len(),
    }
}

#[test]
fn keystrokes_answer_every_kind_and_quit() {
    let run = run(vec![
        Step::Bytes(b"2\r"),
        Step::Bytes(b"13\r"),
        Step::Bytes(b"y\r"),
        Step::Bytes(b"qy"),
    ]);

    assert_eq!(run.termination, Termination::Quit);
    assert_eq!(
        run.answers,
        vec![
            Answer::Single(Some(SingleSelection::Option(2))),
            Answer::Multi(BTreeSet::from([1, 3])),
            Answer::YesNo(Some(YesNoSelection::Yes)),
        ]
    );
    assert_eq!(run.persist_calls, 1);
    assert!(run.screen.contains("Question 3 of 3"));
    assert!(run.screen.contains("Your Answers"));
    assert!(run.screen.contains("Quit quiz? [y/N]"));
    assert!(!run.terminal.raw);
    assert_eq!((run.terminal.starts, run.terminal.stops), (1, 1));
}

#[test]
fn arrows_navigate_and_end_of_input_interrupts() {
    let run = run(vec![
        Step::Bytes(b"\x1b[C"),
        Step::Bytes(b"2"),
        Step::Bytes(b"\x1b[D"),
        Step::Bytes(b"\x1bOD"),
        Step::Bytes(b"3"),
    ]);

    assert_eq!(run.termination, Termination::Interrupted);
    assert_eq!(run.current_index, 0);
    assert_eq!(
        run.answers,
        vec![
            Answer::Single(Some(SingleSelection::Option(3))),
            Answer::Multi(BTreeSet::from([2])),
            Answer::YesNo(None),
        ]
    );
    assert_eq!(run.persist_calls, 1);
}

#[test]
fn rejected_jump_keeps_position() {
    let run = run(vec![
        Step::Bytes(b"1"),
        Step::Bytes(b"j5\r"),
        Step::Bytes(b"\x1b"),
        Step::Pause,
        Step::Signal,
    ]);

    assert_eq!(run.termination, Termination::Interrupted);
    assert_eq!(run.current_index, 0);
    assert_eq!(
        run.answers[0],
        Answer::Single(Some(SingleSelection::Option(1)))
    );
    assert!(run
        .screen
        .contains("Invalid question number. Must be between 1 and 3"));
    assert!(run.screen.contains("Jump to question (1-3)"));
}

#[test]
fn other_text_is_typed_in_raw_mode() {
    let run = run(vec![
        Step::Bytes(b"0"),
        Step::Bytes(b"Lyonx\x7f"),
        Step::Bytes(b"\r"),
        Step::Bytes(b"\r"),
        Step::Bytes(b"s"),
        Step::Bytes(b"z"),
    ]);

    assert_eq!(
        run.answers[0],
        Answer::Single(Some(SingleSelection::Other("Lyon".into())))
    );
    assert_eq!(run.current_index, 1);
    assert!(run.screen.contains("Enter your answer (Other): Lyon"));
    assert!(run.screen.contains("Other: Lyon"));
}
