#![forbid(unsafe_code)]

//! Options-style component trait.
//!
//! A component owns its reactive state, reacts to messages in
//! [`Component::update`], and renders itself as plain text. Hosts that want
//! automatic re-rendering subscribe to the component's observables instead
//! of polling the view.
//!
//! # Example
//!
//! ```
//! use vdocs_tutorial::{Component, HelloWorld, TutorialContext};
//!
//! let ctx = TutorialContext::builtin("en").unwrap();
//! let hello = HelloWorld::new(&ctx);
//! assert_eq!(hello.view_string(), "Hello World!");
//! ```

/// A message-driven component rendering to a string.
pub trait Component {
    /// Messages the component understands.
    type Message;

    /// Apply one message to the component's state.
    fn update(&mut self, msg: Self::Message);

    /// Render the current state.
    fn view_string(&self) -> String;
}
