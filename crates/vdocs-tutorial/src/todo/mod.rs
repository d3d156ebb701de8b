#![forbid(unsafe_code)]

//! The todo-list example, shared by both authoring styles.
//!
//! [`TodoStore`] holds the state: a draft cell and a list of todos seeded
//! with the three tutorial entries. [`setup`](setup::setup) exposes it as
//! handles plus closures, [`TodoOptions`](options::TodoOptions) as a
//! message-driven [`Component`](crate::Component). Both drive the same
//! store operations and render through [`render_todos`], so equal inputs
//! give equal views.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Removing an unknown id | Stale handle or double click | `remove_todo` returns `false`, nothing fires |
//! | Empty draft added | Host skips validation | Appended as an empty todo |

pub mod options;
pub mod setup;

use std::fmt::Write as _;

use tracing::debug;
use vdocs_reactive::{ListConfig, ObservableCell, ObservableList, Record, RecordId};

use crate::strings::{TODO_ADD, TODO_DRAFT, TODO_HEADER, TutorialContext};

/// Draft plus todo list.
#[derive(Debug, Clone)]
pub struct TodoStore {
    new_todo: ObservableCell<String>,
    todos: ObservableList,
}

impl TodoStore {
    /// Store seeded with the localized tutorial todos, ids from 0.
    #[must_use]
    pub fn new(ctx: &TutorialContext) -> Self {
        Self::with_config(ctx, ListConfig::default())
    }

    #[must_use]
    pub fn with_config(ctx: &TutorialContext, config: ListConfig) -> Self {
        Self {
            new_todo: ObservableCell::new(String::new()),
            todos: ObservableList::seeded(config, ctx.todo_seeds()),
        }
    }

    #[must_use]
    pub fn new_todo(&self) -> &ObservableCell<String> {
        &self.new_todo
    }

    #[must_use]
    pub fn todos(&self) -> &ObservableList {
        &self.todos
    }

    /// Replace the draft text.
    pub fn set_draft(&self, text: impl Into<String>) {
        self.new_todo.set(text.into());
    }

    /// Append the draft as a todo, then clear the draft.
    ///
    /// Todos subscribers see the new record before draft subscribers see
    /// the empty string.
    pub fn add_todo(&self) -> Record {
        let text = self.new_todo.get();
        let record = self.todos.append(text);
        self.new_todo.set(String::new());
        debug!(id = %record.id(), "todo added");
        record
    }

    /// Remove the todo with `id`; `false` if it was not there.
    pub fn remove_todo(&self, id: RecordId) -> bool {
        let removed = self.todos.remove_by_id(id);
        debug!(%id, removed, "todo remove requested");
        removed
    }

    /// Render the current state.
    #[must_use]
    pub fn view_string(&self, ctx: &TutorialContext) -> String {
        let draft = self.new_todo.get();
        self.todos
            .with_records(|records| render_todos(ctx, &draft, records))
    }
}

/// Render a todo list view.
///
/// ```text
/// 3 afazeres
/// Novo afazer: Learn Rust [Adicionar Afazer]
/// - #0 Learn HTML [X]
/// ```
#[must_use]
pub fn render_todos(ctx: &TutorialContext, draft: &str, records: &[Record]) -> String {
    let mut out = ctx.plural(TODO_HEADER, records.len());
    out.push('\n');
    out.push_str(&ctx.format(TODO_DRAFT, &[("draft", draft)]));
    out.push_str(" [");
    out.push_str(&ctx.text(TODO_ADD));
    out.push(']');
    for record in records {
        let _ = write!(out, "\n- #{} {} [X]", record.id(), record.text());
    }
    out
}
