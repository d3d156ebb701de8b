#![forbid(unsafe_code)]

//! Setup-function style: build the state once, hand back handles and
//! closures bound to it.

use std::fmt;

use vdocs_reactive::{ListConfig, ObservableCell, ObservableList, Record};

use super::{TodoStore, render_todos};
use crate::strings::TutorialContext;

/// What [`setup`] exposes to the template.
pub struct TodoBindings {
    pub new_todo: ObservableCell<String>,
    pub todos: ObservableList,
    /// Append the draft and clear it.
    pub add_todo: Box<dyn Fn() -> Record>,
    /// Remove the given todo by identity.
    pub remove_todo: Box<dyn Fn(&Record) -> bool>,
    ctx: TutorialContext,
}

impl TodoBindings {
    /// Render through the same view as the options style.
    #[must_use]
    pub fn view_string(&self) -> String {
        let draft = self.new_todo.get();
        self.todos
            .with_records(|records| render_todos(&self.ctx, &draft, records))
    }
}

impl fmt::Debug for TodoBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoBindings")
            .field("new_todo", &self.new_todo)
            .field("todos", &self.todos)
            .finish_non_exhaustive()
    }
}

/// Create the todo state and its bound operations.
#[must_use]
pub fn setup(ctx: &TutorialContext) -> TodoBindings {
    setup_with_config(ctx, ListConfig::default())
}

#[must_use]
pub fn setup_with_config(ctx: &TutorialContext, config: ListConfig) -> TodoBindings {
    let store = TodoStore::with_config(ctx, config);
    let add_store = store.clone();
    let remove_store = store.clone();
    TodoBindings {
        new_todo: store.new_todo().clone(),
        todos: store.todos().clone(),
        add_todo: Box::new(move || add_store.add_todo()),
        remove_todo: Box::new(move |todo: &Record| remove_store.remove_todo(todo.id())),
        ctx: ctx.clone(),
    }
}
