use mirror_shared::{CommandHandle, ObjectManager, TransactionToken, TransactionType};

/// One frame of the authoritative transaction stack.
///
/// Commands committed inside the frame are recorded here; whether they also
/// stream out immediately depends on the whole stack being `None`-typed.
pub(crate) struct OpenTransaction<M: ObjectManager> {
    pub transaction_type: TransactionType,
    pub token: Option<TransactionToken>,
    pub commands: Vec<CommandHandle<M>>,
    // History length when the frame opened; commands streamed inside the
    // frame occupy history[history_mark..] until the next frame's mark.
    pub history_mark: usize,
}

impl<M: ObjectManager> OpenTransaction<M> {
    pub fn new(
        transaction_type: TransactionType,
        token: Option<TransactionToken>,
        history_mark: usize,
    ) -> Self {
        Self {
            transaction_type,
            token,
            commands: Vec::new(),
            history_mark,
        }
    }
}
