//! Property: plain (non-synchronizable) commands pass through synchronization
//! verbatim, preserving count and order for any batch.

use proptest::prelude::*;

use mirror_shared::{flatten_command, CommandSynchronizer, OpenVisibility};
use mirror_test::{Note, ToyWorld};

static TEXTS: [&str; 8] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
];

proptest! {
    #[test]
    fn plain_batches_pass_through_in_order(indices in prop::collection::vec(0usize..TEXTS.len(), 0..32)) {
        let world = ToyWorld::new();
        let mut synchronizer = CommandSynchronizer::new();

        let commands: Vec<_> = indices
            .iter()
            .map(|&i| Note::handle(TEXTS[i]))
            .collect();

        let result = synchronizer.synchronize(&world, &OpenVisibility, &"K1", &commands);

        match result {
            None => prop_assert!(commands.is_empty()),
            Some(command) => {
                let flat = flatten_command(&command);
                prop_assert_eq!(flat.len(), commands.len());
                for (sent, seen) in commands.iter().zip(flat.iter()) {
                    prop_assert!(std::rc::Rc::ptr_eq(sent, seen));
                }
            }
        }
    }

    #[test]
    fn passthrough_never_buffers_pending_state(indices in prop::collection::vec(0usize..TEXTS.len(), 0..32)) {
        let world = ToyWorld::new();
        let mut synchronizer = CommandSynchronizer::new();

        let commands: Vec<_> = indices
            .iter()
            .map(|&i| Note::handle(TEXTS[i]))
            .collect();

        synchronizer.synchronize(&world, &OpenVisibility, &"K1", &commands);
        // A second key sees the same batch the same way: nothing was consumed
        // or deferred by the first pass.
        let result = synchronizer.synchronize(&world, &OpenVisibility, &"K2", &commands);
        match result {
            None => prop_assert!(commands.is_empty()),
            Some(command) => prop_assert_eq!(flatten_command(&command).len(), commands.len()),
        }
    }
}
