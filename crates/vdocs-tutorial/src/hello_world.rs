#![forbid(unsafe_code)]

//! The declarative-rendering example: one observable greeting.

use std::convert::Infallible;

use vdocs_reactive::ObservableCell;

use crate::component::Component;
use crate::strings::{HELLO_MESSAGE, TutorialContext};

/// A greeting bound to an observable cell.
#[derive(Debug, Clone)]
pub struct HelloWorld {
    message: ObservableCell<String>,
}

impl HelloWorld {
    /// Greeting seeded from the localized catalog.
    #[must_use]
    pub fn new(ctx: &TutorialContext) -> Self {
        Self {
            message: ObservableCell::new(ctx.text(HELLO_MESSAGE)),
        }
    }

    #[must_use]
    pub fn message(&self) -> &ObservableCell<String> {
        &self.message
    }
}

impl Component for HelloWorld {
    type Message = Infallible;

    fn update(&mut self, msg: Infallible) {
        match msg {}
    }

    fn view_string(&self) -> String {
        self.message.get()
    }
}
