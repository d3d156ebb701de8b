#![forbid(unsafe_code)]

//! The guide's tutorial examples on top of `vdocs-reactive`.
//!
//! - [`HelloWorld`]: a single observable greeting.
//! - [`HandlingInput`]: message reversal and a prevented-navigation notice.
//! - [`todo`]: the todo list, written once as a setup function
//!   ([`todo::setup::setup`]) and once as a message-driven
//!   [`Component`] ([`todo::options::TodoOptions`]).
//!
//! All user-facing text comes from [`strings::tutorial_catalog`], rendered
//! in the locale held by a [`TutorialContext`].

pub mod cli;
pub mod component;
pub mod handling_input;
pub mod hello_world;
pub mod runner;
pub mod strings;
pub mod todo;

pub use component::Component;
pub use handling_input::{HandlingInput, InputMsg, reverse_graphemes};
pub use hello_world::HelloWorld;
pub use runner::{ExampleKind, Frame, Transcript, run_all, run_example};
pub use strings::{TutorialContext, tutorial_catalog};
pub use todo::TodoStore;
pub use todo::options::{TodoMsg, TodoOptions};
pub use todo::setup::{TodoBindings, setup};
