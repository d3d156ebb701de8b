//! The setup-function and options styles must be indistinguishable from
//! the outside: the same messages give the same records, the same draft,
//! the same view and the same number of notifications.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use tracing::Level;
use vdocs_reactive::{Record, RecordId};
use vdocs_tutorial::{
    Component, ExampleKind, TodoBindings, TodoMsg, TodoOptions, TutorialContext, run_example,
    setup,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

fn msg_strategy() -> impl Strategy<Value = TodoMsg> {
    prop_oneof![
        "[a-zA-Z ]{0,12}".prop_map(TodoMsg::SetDraft),
        Just(TodoMsg::Add),
        (0u64..8).prop_map(|id| TodoMsg::Remove(RecordId::new(id))),
    ]
}

fn apply(bindings: &TodoBindings, msg: TodoMsg) {
    match msg {
        TodoMsg::SetDraft(text) => bindings.new_todo.set(text),
        TodoMsg::Add => {
            (bindings.add_todo)();
        }
        TodoMsg::Remove(id) => {
            // The template only offers remove buttons for rendered todos;
            // an unknown id is passed as a detached record.
            let todo = bindings
                .todos
                .get(id)
                .unwrap_or_else(|| Record::new(id, ""));
            (bindings.remove_todo)(&todo);
        }
    }
}

fn counter() -> (Rc<Cell<usize>>, impl Fn(&[Record]) + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, move |_: &[Record]| c.set(c.get() + 1))
}

proptest! {
    #[test]
    fn both_styles_agree(
        locale in prop_oneof![Just("pt-BR"), Just("en")],
        msgs in prop::collection::vec(msg_strategy(), 0..24),
    ) {
        let ctx = TutorialContext::builtin(locale).expect("context");
        let bindings = setup(&ctx);
        let mut options = TodoOptions::new(&ctx);

        let (setup_count, setup_hook) = counter();
        let (options_count, options_hook) = counter();
        let _a = bindings.todos.subscribe(setup_hook);
        let _b = options.data().todos().subscribe(options_hook);

        for msg in msgs {
            apply(&bindings, msg.clone());
            options.update(msg);
            prop_assert_eq!(bindings.todos.snapshot(), options.data().todos().snapshot());
            prop_assert_eq!(bindings.new_todo.get(), options.data().new_todo().get());
        }

        prop_assert_eq!(bindings.view_string(), options.view_string());
        prop_assert_eq!(setup_count.get(), options_count.get());
        prop_assert_eq!(bindings.todos.version(), options.data().todos().version());
    }

    #[test]
    fn ids_are_never_reused(adds in 1usize..16) {
        let ctx = TutorialContext::builtin("en").expect("context");
        let mut options = TodoOptions::new(&ctx);
        let mut last = None;
        for _ in 0..adds {
            options.update(TodoMsg::Add);
            let newest = options.data().todos().with_records(|r| r.last().map(Record::id));
            prop_assert!(newest > last);
            last = newest;
            if let Some(id) = newest {
                options.update(TodoMsg::Remove(id));
            }
        }
        prop_assert_eq!(options.data().todos().len(), 3);
    }
}

#[test]
fn scripted_sessions_match() {
    init_tracing();
    for locale in ["pt-BR", "en"] {
        let ctx = TutorialContext::builtin(locale).expect("context");
        let setup_run = run_example(ExampleKind::TodoSetup, &ctx);
        let options_run = run_example(ExampleKind::TodoOptions, &ctx);
        assert_eq!(setup_run.frames, options_run.frames);
        assert_eq!(setup_run.todos, options_run.todos);
        assert_eq!(setup_run.renders, options_run.renders);
        assert_ne!(setup_run.example, options_run.example);
    }
}

#[test]
fn portuguese_session_reads_naturally() {
    init_tracing();
    let ctx = TutorialContext::builtin("pt-BR").expect("context");
    let run = run_example(ExampleKind::TodoOptions, &ctx);
    let views: Vec<&str> = run.frames.iter().map(|f| f.view.as_str()).collect();
    assert_eq!(
        views[0],
        "3 afazeres\n\
         Novo afazer:  [Adicionar Afazer]\n\
         - #0 Learn HTML [X]\n\
         - #1 Learn JavaScript [X]\n\
         - #2 Learn Vue [X]"
    );
    assert!(views[1].contains("Novo afazer: Learn Rust [Adicionar Afazer]"));
    assert!(views[2].starts_with("4 afazeres\n"));
    assert!(views[3].starts_with("3 afazeres\n"));
    assert!(!views[3].contains("Learn HTML"));
}
