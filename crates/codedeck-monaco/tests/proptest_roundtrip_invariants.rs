#![forbid(unsafe_code)]

//! Property tests for the capture/restore text invariants.

use std::rc::Rc;

use codedeck_core::CodeBlock;
use codedeck_monaco::{DeckHost, EditorBinder};
use codedeck_monaco::testing::{FakeLoader, ScriptedDeck};
use proptest::prelude::*;

proptest! {
    #[test]
    fn trim_start_is_idempotent(text in ".*") {
        let once = text.trim_start();
        prop_assert_eq!(once.trim_start(), once);
    }

    #[test]
    fn exit_entry_round_trip_restores_trimmed_text(text in ".*") {
        let deck = Rc::new(ScriptedDeck::new());
        let coding = deck.add_slide();
        let other = deck.add_slide();
        let block = deck.add_block(coding, CodeBlock::new("code").class("monaco").content("seed"));
        deck.set_current(coding);

        let mut loader = FakeLoader::new();
        let binder = EditorBinder::init(deck.clone(), &mut loader).expect("init succeeds");
        let runtime = loader.runtime();
        deck.fire_ready();

        runtime.editor(block).expect("editor created").replace_text(&text);

        deck.navigate_to(other);
        {
            let document = deck.document();
            let document = document.borrow();
            prop_assert_eq!(
                document.block(block).expect("block exists").stored_template(),
                Some(text.trim_start())
            );
        }

        deck.navigate_to(coding);
        prop_assert!(binder.is_bound(block));
        let spec = runtime.last_spec_for(block).expect("editor recreated");
        prop_assert_eq!(spec.text, text.trim_start());
    }
}
