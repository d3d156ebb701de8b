#![forbid(unsafe_code)]

//! Scripted sessions for the tutorial examples.
//!
//! Each example is driven through a fixed interaction. A [`Transcript`]
//! records the view after every step, and the number of re-renders the
//! host would have performed: one per notification received from the
//! component's observables.

use std::cell::Cell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};
use vdocs_reactive::{Record, RecordId, Subscription};

use crate::component::Component;
use crate::handling_input::{HandlingInput, InputMsg};
use crate::hello_world::HelloWorld;
use crate::strings::TutorialContext;
use crate::todo::TodoStore;
use crate::todo::options::{TodoMsg, TodoOptions};
use crate::todo::setup::{TodoBindings, setup};

/// Draft typed during the todo sessions.
pub const SCRIPTED_DRAFT: &str = "Learn Rust";

/// A runnable example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleKind {
    HelloWorld,
    HandlingInput,
    TodoSetup,
    TodoOptions,
}

impl ExampleKind {
    pub const ALL: [Self; 4] = [
        Self::HelloWorld,
        Self::HandlingInput,
        Self::TodoSetup,
        Self::TodoOptions,
    ];

    /// Command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HelloWorld => "hello-world",
            Self::HandlingInput => "handling-input",
            Self::TodoSetup => "todo-setup",
            Self::TodoOptions => "todo-options",
        }
    }

    /// Examples selected by `name`; `all` selects every example.
    #[must_use]
    pub fn select(name: &str) -> Option<Vec<Self>> {
        if name.eq_ignore_ascii_case("all") {
            return Some(Self::ALL.to_vec());
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .map(|kind| vec![kind])
    }
}

impl fmt::Display for ExampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The view after one scripted step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub step: String,
    pub view: String,
}

/// Everything one scripted session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub example: &'static str,
    pub locale: String,
    pub frames: Vec<Frame>,
    /// Notifications the host received.
    pub renders: usize,
    /// Final todo records, for the todo examples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Record>>,
}

impl Transcript {
    fn new(kind: ExampleKind, ctx: &TutorialContext) -> Self {
        Self {
            example: kind.name(),
            locale: ctx.locale().to_string(),
            frames: Vec::new(),
            renders: 0,
            todos: None,
        }
    }

    fn push(&mut self, step: impl Into<String>, view: String) {
        self.frames.push(Frame {
            step: step.into(),
            view,
        });
    }
}

/// Counts notifications on behalf of a host.
#[derive(Debug, Default, Clone)]
struct RenderCounter(Rc<Cell<usize>>);

impl RenderCounter {
    fn hook<T: ?Sized + 'static>(&self) -> impl Fn(&T) + 'static {
        let count = Rc::clone(&self.0);
        move |_: &T| count.set(count.get() + 1)
    }

    fn get(&self) -> usize {
        self.0.get()
    }
}

/// Run one example to completion.
#[must_use]
pub fn run_example(kind: ExampleKind, ctx: &TutorialContext) -> Transcript {
    info!(example = %kind, locale = %ctx.locale(), "running example");
    let transcript = match kind {
        ExampleKind::HelloWorld => hello_world(ctx),
        ExampleKind::HandlingInput => handling_input(ctx),
        ExampleKind::TodoSetup => todo_setup(ctx),
        ExampleKind::TodoOptions => todo_options(ctx),
    };
    debug!(
        example = %kind,
        frames = transcript.frames.len(),
        renders = transcript.renders,
        "example finished"
    );
    transcript
}

fn hello_world(ctx: &TutorialContext) -> Transcript {
    let mut transcript = Transcript::new(ExampleKind::HelloWorld, ctx);
    let hello = HelloWorld::new(ctx);
    transcript.push("initial", hello.view_string());
    transcript
}

fn handling_input(ctx: &TutorialContext) -> Transcript {
    let mut transcript = Transcript::new(ExampleKind::HandlingInput, ctx);
    let mut input = HandlingInput::new(ctx);
    let counter = RenderCounter::default();
    let _subs: [Subscription; 2] = [
        input.message().subscribe(counter.hook::<String>()),
        input.notices().subscribe(counter.hook::<[Record]>()),
    ];

    transcript.push("initial", input.view_string());
    for (step, msg) in [("reverse", InputMsg::Reverse), ("notify", InputMsg::Notify)] {
        input.update(msg);
        transcript.push(step, input.view_string());
    }
    transcript.renders = counter.get();
    transcript
}

/// The interaction both todo styles go through.
fn todo_script(first: RecordId) -> [(String, TodoMsg); 3] {
    [
        (
            format!("draft {SCRIPTED_DRAFT}"),
            TodoMsg::SetDraft(SCRIPTED_DRAFT.into()),
        ),
        ("add".into(), TodoMsg::Add),
        (format!("remove #{first}"), TodoMsg::Remove(first)),
    ]
}

fn watch_store(store: &TodoStore, counter: &RenderCounter) -> [Subscription; 2] {
    [
        store.new_todo().subscribe(counter.hook::<String>()),
        store.todos().subscribe(counter.hook::<[Record]>()),
    ]
}

fn first_id(records: &[Record]) -> RecordId {
    records.first().map_or(RecordId::new(0), Record::id)
}

fn todo_options(ctx: &TutorialContext) -> Transcript {
    let mut transcript = Transcript::new(ExampleKind::TodoOptions, ctx);
    let mut todo = TodoOptions::new(ctx);
    let counter = RenderCounter::default();
    let _subs = watch_store(todo.data(), &counter);

    transcript.push("initial", todo.view_string());
    let first = todo.data().todos().with_records(first_id);
    for (step, msg) in todo_script(first) {
        todo.update(msg);
        transcript.push(step, todo.view_string());
    }
    transcript.renders = counter.get();
    transcript.todos = Some(todo.data().todos().snapshot());
    transcript
}

fn apply_to_bindings(bindings: &TodoBindings, msg: TodoMsg) {
    match msg {
        TodoMsg::SetDraft(text) => bindings.new_todo.set(text),
        TodoMsg::Add => {
            (bindings.add_todo)();
        }
        TodoMsg::Remove(id) => {
            if let Some(todo) = bindings.todos.get(id) {
                (bindings.remove_todo)(&todo);
            }
        }
    }
}

fn todo_setup(ctx: &TutorialContext) -> Transcript {
    let mut transcript = Transcript::new(ExampleKind::TodoSetup, ctx);
    let bindings = setup(ctx);
    let counter = RenderCounter::default();
    let _subs = [
        bindings.new_todo.subscribe(counter.hook::<String>()),
        bindings.todos.subscribe(counter.hook::<[Record]>()),
    ];

    transcript.push("initial", bindings.view_string());
    let first = bindings.todos.with_records(first_id);
    for (step, msg) in todo_script(first) {
        apply_to_bindings(&bindings, msg);
        transcript.push(step, bindings.view_string());
    }
    transcript.renders = counter.get();
    transcript.todos = Some(bindings.todos.snapshot());
    transcript
}

/// Run `kinds` in order and write their transcripts to `out`.
///
/// Text output separates examples with a `== name ==` banner; JSON output
/// is one transcript object per line.
pub fn run_all<W: Write>(
    kinds: &[ExampleKind],
    ctx: &TutorialContext,
    json: bool,
    out: &mut W,
) -> io::Result<()> {
    for &kind in kinds {
        let transcript = run_example(kind, ctx);
        if json {
            serde_json::to_writer(&mut *out, &transcript)?;
            writeln!(out)?;
        } else {
            write_text(&transcript, out)?;
        }
    }
    out.flush()
}

fn write_text<W: Write>(transcript: &Transcript, out: &mut W) -> io::Result<()> {
    writeln!(out, "== {} ({}) ==", transcript.example, transcript.locale)?;
    for frame in &transcript.frames {
        writeln!(out, "-- {}", frame.step)?;
        writeln!(out, "{}", frame.view)?;
    }
    writeln!(out, "({} re-renders)", transcript.renders)?;
    writeln!(out)
}
