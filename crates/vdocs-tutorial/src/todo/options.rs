#![forbid(unsafe_code)]

//! Options style: state lives in the component, methods are messages.

use vdocs_reactive::{ListConfig, RecordId};

use super::TodoStore;
use crate::component::Component;
use crate::strings::TutorialContext;

/// Messages understood by [`TodoOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoMsg {
    /// The input's new value.
    SetDraft(String),
    /// The "add todo" button.
    Add,
    /// A todo's remove button.
    Remove(RecordId),
}

/// Message-driven todo component.
#[derive(Debug, Clone)]
pub struct TodoOptions {
    ctx: TutorialContext,
    data: TodoStore,
}

impl TodoOptions {
    #[must_use]
    pub fn new(ctx: &TutorialContext) -> Self {
        Self::with_config(ctx, ListConfig::default())
    }

    #[must_use]
    pub fn with_config(ctx: &TutorialContext, config: ListConfig) -> Self {
        Self {
            ctx: ctx.clone(),
            data: TodoStore::with_config(ctx, config),
        }
    }

    /// The component's reactive data.
    #[must_use]
    pub fn data(&self) -> &TodoStore {
        &self.data
    }
}

impl Component for TodoOptions {
    type Message = TodoMsg;

    fn update(&mut self, msg: TodoMsg) {
        match msg {
            TodoMsg::SetDraft(text) => self.data.set_draft(text),
            TodoMsg::Add => {
                self.data.add_todo();
            }
            TodoMsg::Remove(id) => {
                self.data.remove_todo(id);
            }
        }
    }

    fn view_string(&self) -> String {
        self.data.view_string(&self.ctx)
    }
}
