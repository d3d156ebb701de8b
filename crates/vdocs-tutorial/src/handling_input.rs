#![forbid(unsafe_code)]

//! The user-input example: reversing a message and a "prevent default"
//! notice.
//!
//! # Invariants
//!
//! | Invariant | Guarantee |
//! |-----------|-----------|
//! | One mutation per reversal | `reverse_message` is a single `update`, so subscribers fire once |
//! | Grapheme-safe | Reversal keeps extended grapheme clusters intact |
//! | Notices are appended | Every `notify` adds one record to `notices` |

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;
use vdocs_reactive::{ObservableCell, ObservableList, Record};

use crate::component::Component;
use crate::strings::{HELLO_MESSAGE, INPUT_NAVIGATION_PREVENTED, TutorialContext};

/// Reverse `text` by grapheme cluster.
#[must_use]
pub fn reverse_graphemes(text: &str) -> String {
    text.graphemes(true).rev().collect()
}

/// Messages understood by [`HandlingInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMsg {
    /// The "reverse message" button.
    Reverse,
    /// The link whose default navigation is prevented.
    Notify,
}

/// Message reversal plus the prevented-navigation notice.
#[derive(Debug, Clone)]
pub struct HandlingInput {
    ctx: TutorialContext,
    message: ObservableCell<String>,
    notices: ObservableList,
}

impl HandlingInput {
    #[must_use]
    pub fn new(ctx: &TutorialContext) -> Self {
        Self {
            ctx: ctx.clone(),
            message: ObservableCell::new(ctx.text(HELLO_MESSAGE)),
            notices: ObservableList::new(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &ObservableCell<String> {
        &self.message
    }

    /// Notices emitted so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> &ObservableList {
        &self.notices
    }

    /// Reverse the message in place.
    pub fn reverse_message(&self) {
        self.message.update(|m| *m = reverse_graphemes(m));
    }

    /// Emit the localized "navigation was prevented" notice.
    pub fn notify(&self) -> Record {
        let notice = self.ctx.text(INPUT_NAVIGATION_PREVENTED);
        debug!(locale = %self.ctx.locale(), "navigation prevented");
        self.notices.append(notice)
    }
}

impl Component for HandlingInput {
    type Message = InputMsg;

    fn update(&mut self, msg: InputMsg) {
        match msg {
            InputMsg::Reverse => self.reverse_message(),
            InputMsg::Notify => {
                self.notify();
            }
        }
    }

    fn view_string(&self) -> String {
        let mut out = self.message.get();
        self.notices.with_records(|records| {
            for record in records {
                out.push('\n');
                out.push_str("! ");
                out.push_str(record.text());
            }
        });
        out
    }
}
