use std::{fmt::Debug, hash::Hash, slice};

use log::{info, trace, warn};

use mirror_shared::{
    CommandError, CommandHandle, CommandSynchronizer, ObjectManager, ObserverHandle,
    TransactionError, TransactionToken, TransactionType, VisibilityStrategy,
};

use crate::{
    error::SourceError,
    registry::ObserverRegistry,
    scope::ScopeMut,
    source::{command_group::CommandGroupScope, open_transaction::OpenTransaction},
};

/// The fan-out hub: owns the authoritative manager, one visibility strategy,
/// and the command synchronizer, and pushes every committed command to the
/// registered observers that may see it.
///
/// All reactions run synchronously inside the call that caused the
/// authoritative mutation, so for a single event every observer sees its
/// consequence, in registration order, before control returns to the caller.
/// Because the source owns the manager, "subscribing to commit and
/// transaction-end events" takes the form of interception: authoritative
/// mutation enters through [`execute`](ReplicationSource::execute) and the
/// transaction methods, and visibility mutation through
/// [`scope_mut`](ReplicationSource::scope_mut).
pub struct ReplicationSource<M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    manager: M,
    visibility: V,
    synchronizer: CommandSynchronizer<M>,
    observers: ObserverRegistry<M, K>,
    // Every committed command, in commit order; the basis of each new
    // observer's initial full sync.
    history: Vec<CommandHandle<M>>,
    transactions: Vec<OpenTransaction<M>>,
    // Deferred-delivery tokens: (object, key) pairs scheduled by a
    // visibility true-transition and cancelled by a false-transition before
    // realization. Insertion-ordered for deterministic flushing.
    scheduled_flushes: Vec<(M::Object, K)>,
}

impl<M, K, V> ReplicationSource<M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    pub fn new(manager: M, visibility: V) -> Self {
        Self {
            manager,
            visibility,
            synchronizer: CommandSynchronizer::new(),
            observers: ObserverRegistry::new(),
            history: Vec::new(),
            transactions: Vec::new(),
            scheduled_flushes: Vec::new(),
        }
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn visibility(&self) -> &V {
        &self.visibility
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.observers.contains_key(key)
    }

    pub fn transaction_depth(&self) -> usize {
        self.transactions.len()
    }

    pub fn has_pending_update(&self, object: &M::Object) -> bool {
        self.synchronizer.has_pending(object)
    }

    /// Registers `observer` under `key` and delivers its initial full sync:
    /// the accumulated command history synchronized for `key`. While
    /// streamed transactions are open, the committed prefix and each open
    /// frame's streamed commands arrive as separate calls, each frame
    /// bracketed by its begin notification, so the newcomer can unwind the
    /// frames if they later roll back.
    pub fn register(&mut self, key: K, observer: ObserverHandle<M>) -> Result<(), SourceError> {
        self.observers.insert(key, observer)?;
        info!("ReplicationSource: registered observer under key {:?}", key);

        // Streamed-into-history commands only exist for the leading run of
        // `None`-typed frames; a batched frame stops both the streaming and
        // the begin notifications.
        let open_frames: Vec<(TransactionType, usize)> = self
            .transactions
            .iter()
            .take_while(|frame| frame.transaction_type == TransactionType::None)
            .map(|frame| (frame.transaction_type, frame.history_mark))
            .collect();
        let committed_end = open_frames
            .first()
            .map_or(self.history.len(), |(_, mark)| *mark);
        self.deliver_history_range(&key, 0, committed_end);

        for (index, (transaction_type, start)) in open_frames.iter().enumerate() {
            let end = open_frames
                .get(index + 1)
                .map_or(self.history.len(), |(_, mark)| *mark);
            if let Some(observer) = self.observers.get(&key) {
                observer.borrow_mut().begin_transaction(*transaction_type);
            }
            self.deliver_history_range(&key, *start, end);
        }
        Ok(())
    }

    /// Removes the observer under `key`; it receives no further deliveries.
    /// Any scheduled flush for the key is cancelled.
    pub fn deregister(&mut self, key: &K) -> Result<(), SourceError> {
        self.observers.remove(key)?;
        self.scheduled_flushes.retain(|(_, k)| k != key);
        info!("ReplicationSource: deregistered observer under key {:?}", key);
        Ok(())
    }

    /// Commits one command on the authoritative manager.
    ///
    /// Outside any transaction the command fans out to every registered
    /// observer immediately; inside one it is recorded in the innermost
    /// frame, and additionally streamed if the whole stack is `None`-typed.
    pub fn execute(&mut self, command: CommandHandle<M>) -> Result<(), CommandError> {
        command.execute(&mut self.manager)?;

        if !self.transactions.is_empty() {
            let streaming = self.is_streaming();
            if let Some(frame) = self.transactions.last_mut() {
                frame.commands.push(command.clone());
            }
            if streaming {
                self.history.push(command.clone());
                self.fan_out(slice::from_ref(&command));
            }
            return Ok(());
        }

        self.history.push(command.clone());
        self.fan_out(slice::from_ref(&command));
        self.realize_scheduled_flushes();
        Ok(())
    }

    pub fn begin_transaction(&mut self, transaction_type: TransactionType) {
        self.begin_transaction_with_token(transaction_type, None);
    }

    pub fn begin_transaction_with_token(
        &mut self,
        transaction_type: TransactionType,
        token: Option<TransactionToken>,
    ) {
        let streaming_before = self.stack_all_streaming();
        self.transactions.push(OpenTransaction::new(
            transaction_type,
            token,
            self.history.len(),
        ));

        // Observers hear about a streamed group as it happens, before its
        // first contained command; a batched frame stays silent until commit.
        if transaction_type == TransactionType::None && streaming_before {
            self.notify_begin(transaction_type);
        }
    }

    pub fn end_transaction(&mut self, commit: bool) -> Result<(), SourceError> {
        self.end_transaction_with_token(commit, None)
    }

    pub fn end_transaction_with_token(
        &mut self,
        commit: bool,
        token: Option<TransactionToken>,
    ) -> Result<(), SourceError> {
        // Validate the token before popping so a mismatch leaves the stack
        // intact.
        if let Some(frame) = self.transactions.last() {
            if frame.token != token {
                return Err(TransactionError::TokenMismatch {
                    began_with: format!("{:?}", frame.token),
                    ended_with: format!("{:?}", token),
                }
                .into());
            }
        }
        let Some(frame) = self.transactions.pop() else {
            return Err(TransactionError::NoOpenTransaction.into());
        };

        let streamed = frame.transaction_type == TransactionType::None
            && self.stack_all_streaming();

        if streamed {
            // Contained commands already went out one by one; atomicity is
            // explicitly not guaranteed for them.
            if commit {
                if let Some(parent) = self.transactions.last_mut() {
                    parent.commands.extend(frame.commands);
                }
            } else {
                self.rollback_commands(&frame.commands)?;
                self.history
                    .truncate(self.history.len() - frame.commands.len());
            }
            self.notify_end(commit);
        } else if commit {
            if self.is_streaming() {
                // A batched frame closing into a streaming stack delivers its
                // batch now; the parent keeps the commands for its own
                // potential rollback.
                self.history.extend(frame.commands.iter().cloned());
                self.fan_out(&frame.commands);
                if let Some(parent) = self.transactions.last_mut() {
                    parent.commands.extend(frame.commands);
                }
            } else if let Some(parent) = self.transactions.last_mut() {
                parent.commands.extend(frame.commands);
            } else {
                // Outermost commit: the whole transaction synchronizes as one
                // unit per key, so flattening spans it.
                self.history.extend(frame.commands.iter().cloned());
                self.fan_out(&frame.commands);
            }
        } else {
            // Rolled-back batched frame: nothing was or will be delivered.
            self.rollback_commands(&frame.commands)?;
        }

        if self.transactions.is_empty() {
            self.realize_scheduled_flushes();
        }
        Ok(())
    }

    /// Opens a scoped command group: commands executed through the scope
    /// commit individually on the manager but reach observers as one
    /// composite event when the scope closes.
    pub fn command_group(&mut self) -> CommandGroupScope<'_, M, K, V> {
        CommandGroupScope::new(self)
    }

    /// Mutable access to the visibility strategy, bracketed so that any
    /// notifications the mutation raises are processed when the guard drops.
    pub fn scope_mut(&mut self) -> ScopeMut<'_, M, K, V> {
        ScopeMut::new(self)
    }

    pub(crate) fn visibility_raw_mut(&mut self) -> &mut V {
        &mut self.visibility
    }

    /// Applies a command to the manager without publishing it; the command
    /// group scope publishes the whole group on drop.
    pub(crate) fn apply_only(&mut self, command: &CommandHandle<M>) -> Result<(), CommandError> {
        command.execute(&mut self.manager)
    }

    /// Publishes a group of already-applied commands as one authoritative
    /// event.
    pub(crate) fn commit_executed_group(&mut self, command: CommandHandle<M>) {
        if !self.transactions.is_empty() {
            let streaming = self.is_streaming();
            if let Some(frame) = self.transactions.last_mut() {
                frame.commands.push(command.clone());
            }
            if streaming {
                self.history.push(command.clone());
                self.fan_out(slice::from_ref(&command));
            }
            return;
        }
        self.history.push(command.clone());
        self.fan_out(slice::from_ref(&command));
        self.realize_scheduled_flushes();
    }

    /// Drains the strategy's visibility notifications: a true-transition
    /// schedules a deferred flush for (object, key), a false-transition
    /// cancels a not-yet-realized one. Flushes realize at the next ordinary
    /// synchronization point, which is right away when no transaction is
    /// open.
    pub(crate) fn process_visibility_events(&mut self) {
        for event in self.visibility.drain_events() {
            if event.visible {
                let already = self
                    .scheduled_flushes
                    .iter()
                    .any(|(o, k)| *o == event.object && *k == event.key);
                if !already {
                    self.scheduled_flushes.push((event.object, event.key));
                }
            } else {
                self.scheduled_flushes
                    .retain(|(o, k)| !(*o == event.object && *k == event.key));
            }
        }
        if self.transactions.is_empty() {
            self.realize_scheduled_flushes();
        }
    }

    fn realize_scheduled_flushes(&mut self) {
        if self.scheduled_flushes.is_empty() {
            return;
        }
        let scheduled = std::mem::take(&mut self.scheduled_flushes);
        for (object, key) in scheduled {
            let Some(update) = self.synchronizer.update(&object) else {
                continue;
            };
            if update.is_empty() {
                continue;
            }
            trace!(
                "ReplicationSource: flushing deferred update for {:?} to {:?}",
                object,
                key
            );
            self.deliver(&key, update);
        }
    }

    fn deliver_history_range(&mut self, key: &K, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let result = self.synchronizer.synchronize(
            &self.manager,
            &self.visibility,
            key,
            &self.history[start..end],
        );
        if let Some(command) = result {
            if !command.is_empty() {
                self.deliver(key, command);
            }
        }
    }

    fn fan_out(&mut self, commands: &[CommandHandle<M>]) {
        if commands.is_empty() {
            return;
        }
        let keys: Vec<K> = self.observers.keys().collect();
        for key in keys {
            let result =
                self.synchronizer
                    .synchronize(&self.manager, &self.visibility, &key, commands);
            if let Some(result) = result {
                if !result.is_empty() {
                    self.deliver(&key, result);
                }
            }
        }
    }

    fn deliver(&self, key: &K, command: CommandHandle<M>) {
        let Some(observer) = self.observers.get(key) else {
            return;
        };
        if let Err(err) = observer.borrow_mut().synchronize(command) {
            warn!("ReplicationSource: observer {:?} failed to apply: {}", key, err);
        }
    }

    fn notify_begin(&self, transaction_type: TransactionType) {
        for (_, observer) in self.observers.iter() {
            observer.borrow_mut().begin_transaction(transaction_type);
        }
    }

    fn notify_end(&self, commit: bool) {
        for (_, observer) in self.observers.iter() {
            observer.borrow_mut().end_current_transaction(commit);
        }
    }

    fn rollback_commands(&mut self, commands: &[CommandHandle<M>]) -> Result<(), SourceError> {
        for command in commands.iter().rev() {
            command
                .unexecute(&mut self.manager)
                .map_err(TransactionError::from)?;
        }
        Ok(())
    }

    /// Vacuously true for an empty stack.
    fn stack_all_streaming(&self) -> bool {
        self.transactions
            .iter()
            .all(|frame| frame.transaction_type == TransactionType::None)
    }

    /// Commands stream (deliver as they commit) only while the entire open
    /// stack is `None`-typed; any atomic or master ancestor defers delivery
    /// to the outermost commit.
    fn is_streaming(&self) -> bool {
        !self.transactions.is_empty() && self.stack_all_streaming()
    }
}
