//! The task manager: syscall state machine over the three containers.
//!
//! One `TaskManager` owns the arena, the ready queue, the mailboxes and the
//! event wait lists, and is the only code that moves tasks between states.
//! It is a plain value constructed from a [`KernelConfig`]; tests build as
//! many as they like, each fully isolated.
//!
//! ## Error policy
//!
//! No syscall aborts the kernel. Every rejected request writes a negative
//! sentinel from [`KernelError`] into the caller's return register and
//! re-queues the caller ready, so a task that passes garbage arguments only
//! hurts itself.
//!
//! ## Reference staleness
//!
//! Queues store [`TaskRef`]s (tid + slot generation). A task can exit while
//! references to it still sit in the ready queue or an event wait list;
//! those references are recognized by their stale generation and silently
//! dropped when popped. Nothing ever chases a dangling task.

use crate::audit::{ScheduleEvent, ScheduleLog};
use crate::mailbox::MailboxTable;
use crate::pool::{TaskPool, TaskRef};
use crate::ready_queue::ReadyQueue;
use crate::task::{Parentage, PendingTransfer, TaskDescriptor, TaskState};
use core_types::{ConfigError, EventId, KernelConfig, Priority, Tid, PARENT_EXITED_BIT};
use hal::{StackRegion, TaskContext};
use kernel_api::{KernelError, TrapCause};
use std::collections::{HashMap, VecDeque};

/// The kernel's scheduling and IPC state.
#[derive(Debug)]
pub struct TaskManager {
    config: KernelConfig,
    pool: TaskPool,
    ready: ReadyQueue,
    mailboxes: MailboxTable,
    event_waits: HashMap<EventId, VecDeque<TaskRef>>,
    audit: ScheduleLog,
}

impl TaskManager {
    /// Builds an empty manager from a validated configuration.
    pub fn new(config: KernelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pool: TaskPool::new(config.clone()),
            ready: ReadyQueue::new(config.priority_levels),
            mailboxes: MailboxTable::new(config.max_tasks),
            event_waits: HashMap::new(),
            audit: ScheduleLog::new(),
            config,
        })
    }

    /// Creates a parentless boot task and queues it ready.
    ///
    /// Used before the dispatch loop starts; later tasks are created through
    /// the Create syscall and carry a parent link.
    pub fn bootstrap(&mut self, priority: Priority, entry: usize) -> Result<Tid, KernelError> {
        if !self.config.priority_in_range(priority) {
            return Err(KernelError::InvalidPriority(priority.level()));
        }
        let tid = self
            .spawn(None, priority, entry)
            .ok_or(KernelError::PoolExhausted)?;
        self.requeue_ready(tid);
        Ok(tid)
    }

    /// Pops the most urgent ready task and marks it active.
    ///
    /// Stale references left behind by exited tasks are dropped here.
    /// `None` means every live task is blocked: the idle condition.
    pub fn next_ready(&mut self) -> Option<Tid> {
        loop {
            let entry = self.ready.pop()?;
            if !self.pool.is_current(entry) {
                continue;
            }
            let Some(task) = self.pool.get_mut(entry.tid) else {
                continue;
            };
            if task.state() != TaskState::Ready {
                continue;
            }
            task.state = TaskState::Active;
            self.audit.record(ScheduleEvent::TaskActivated { tid: entry.tid });
            return Some(entry.tid);
        }
    }

    /// Mutable access to a live task's saved context, for the trampoline.
    pub fn context_mut(&mut self, tid: Tid) -> Option<&mut TaskContext> {
        self.pool.get_mut(tid).map(|task| &mut task.context)
    }

    /// Applies one trap from the task that was just running.
    pub fn handle(&mut self, caller: Tid, cause: TrapCause) {
        match cause {
            TrapCause::Create { priority, entry } => self.sys_create(caller, priority, entry),
            TrapCause::MyTid => self.complete(caller, caller.as_return_value()),
            TrapCause::MyParentTid => self.sys_my_parent_tid(caller),
            TrapCause::Yield => self.complete(caller, 0),
            TrapCause::Exit => self.sys_exit(caller),
            TrapCause::Send {
                target,
                message,
                reply_capacity,
            } => self.sys_send(caller, target, message, reply_capacity),
            TrapCause::Receive { capacity } => self.sys_receive(caller, capacity),
            TrapCause::Reply { to, reply } => self.sys_reply(caller, to, reply),
            TrapCause::AwaitEvent { event } => self.sys_await_event(caller, event),
            TrapCause::Interrupt { event, value } => {
                // The interrupted task asked for nothing; keep it runnable.
                self.requeue_ready(caller);
                self.wake_up_tasks_on_event(event, value);
            }
        }
    }

    /// Wakes every task blocked on `event`, writing `value` into each one's
    /// return register. Returns how many tasks were woken.
    pub fn wake_up_tasks_on_event(&mut self, event: EventId, value: i64) -> usize {
        let waiters = self.event_waits.remove(&event).unwrap_or_default();
        let mut woken = 0;
        for entry in waiters {
            if !self.pool.is_current(entry) {
                continue;
            }
            let waiting = self
                .pool
                .get(entry.tid)
                .map(|t| matches!(t.state(), TaskState::EventWait { event: e } if e == event))
                .unwrap_or(false);
            if !waiting {
                continue;
            }
            if let Some(task) = self.pool.get_mut(entry.tid) {
                task.context.set_return_value(value);
            }
            self.requeue_ready(entry.tid);
            woken += 1;
        }
        self.audit.record(ScheduleEvent::EventFired { event, woken });
        woken
    }

    // --- syscalls ---

    fn sys_create(&mut self, caller: Tid, priority: Priority, entry: usize) {
        if !self.config.priority_in_range(priority) {
            return self.fail(caller, KernelError::InvalidPriority(priority.level()));
        }
        if self.pool.is_exhausted() {
            return self.fail(caller, KernelError::PoolExhausted);
        }
        let parent = self.pool.task_ref(caller).map(|r| Parentage {
            tid: r.tid,
            generation: r.generation,
        });
        let Some(child) = self.spawn(parent, priority, entry) else {
            return self.fail(caller, KernelError::PoolExhausted);
        };
        // The creator resumes first: it is queued ahead of the child.
        self.complete(caller, child.as_return_value());
        self.requeue_ready(child);
    }

    fn sys_my_parent_tid(&mut self, caller: Tid) {
        let parent = self.pool.get(caller).and_then(TaskDescriptor::parent);
        let value = match parent {
            // The boot task: no parent ever existed, tag with a zero tid.
            None => PARENT_EXITED_BIT,
            Some(link) => {
                let alive = self.pool.is_current(TaskRef {
                    tid: link.tid,
                    generation: link.generation,
                });
                if alive {
                    link.tid.as_return_value()
                } else {
                    link.tid.as_return_value() | PARENT_EXITED_BIT
                }
            }
        };
        self.complete(caller, value);
    }

    fn sys_exit(&mut self, caller: Tid) {
        // The slot is freed; the mailbox and any queued references are left
        // as-is and become stale. Senders already rendezvous-parked on this
        // task stay blocked forever.
        self.audit.record(ScheduleEvent::TaskExited { tid: caller });
        self.pool.free(caller);
    }

    fn sys_send(&mut self, caller: Tid, target: Tid, message: Vec<u8>, reply_capacity: usize) {
        if target == caller {
            return self.fail(caller, KernelError::SelfSend);
        }
        if self.pool.get(target).is_none() {
            return self.fail(caller, KernelError::InvalidTid(target.raw()));
        }
        let receiver_waiting = self
            .pool
            .get(target)
            .map(|t| t.state() == TaskState::ReceiveWait)
            .unwrap_or(false);

        if receiver_waiting {
            // Receiver arrived first: rendezvous immediately.
            let capacity = match self.pool.get_mut(target).and_then(|t| t.pending.take()) {
                Some(PendingTransfer::AwaitingSender { capacity }) => capacity,
                _ => 0,
            };
            let mut copied = 0;
            if let Some(receiver) = self.pool.get_mut(target) {
                receiver.context.set_sender(caller);
                copied = receiver.context.deliver(&message, capacity);
                receiver.context.set_return_value(copied as i64);
            }
            self.audit.record(ScheduleEvent::MessageCopied {
                from: caller,
                to: target,
                bytes: copied,
            });
            self.block(caller, TaskState::ReplyWait, Some(PendingTransfer::AwaitingReply {
                reply_capacity,
            }));
            self.requeue_ready(target);
        } else {
            // Sender arrived first: park in the target's mailbox. The
            // message bytes stay with the sender until a Receive drains it.
            self.block(
                caller,
                TaskState::SendWait,
                Some(PendingTransfer::AwaitingReceiver {
                    message,
                    reply_capacity,
                }),
            );
            if let (Some(sender_ref), Some(slot)) =
                (self.pool.task_ref(caller), self.config.slot_of_tid(target))
            {
                self.mailboxes.slot_mut(slot).enqueue(sender_ref);
            }
        }
    }

    fn sys_receive(&mut self, caller: Tid, capacity: usize) {
        let Some(slot) = self.config.slot_of_tid(caller) else {
            return;
        };
        while let Some(sender_ref) = self.mailboxes.slot_mut(slot).dequeue() {
            if !self.pool.is_current(sender_ref) {
                continue;
            }
            let sender = sender_ref.tid;
            let taken = self.pool.get_mut(sender).and_then(|t| {
                if t.state() == TaskState::SendWait {
                    t.pending.take()
                } else {
                    None
                }
            });
            let Some(PendingTransfer::AwaitingReceiver {
                message,
                reply_capacity,
            }) = taken
            else {
                continue;
            };
            let mut copied = 0;
            if let Some(receiver) = self.pool.get_mut(caller) {
                receiver.context.set_sender(sender);
                copied = receiver.context.deliver(&message, capacity);
            }
            self.audit.record(ScheduleEvent::MessageCopied {
                from: sender,
                to: caller,
                bytes: copied,
            });
            self.block(sender, TaskState::ReplyWait, Some(PendingTransfer::AwaitingReply {
                reply_capacity,
            }));
            self.complete(caller, copied as i64);
            return;
        }
        // Empty mailbox: block until a sender shows up.
        self.block(
            caller,
            TaskState::ReceiveWait,
            Some(PendingTransfer::AwaitingSender { capacity }),
        );
    }

    fn sys_reply(&mut self, caller: Tid, to: Tid, reply: Vec<u8>) {
        if self.pool.get(to).is_none() {
            return self.fail(caller, KernelError::InvalidTid(to.raw()));
        }
        let taken = self.pool.get_mut(to).and_then(|t| {
            if t.state() == TaskState::ReplyWait {
                t.pending.take()
            } else {
                None
            }
        });
        let Some(PendingTransfer::AwaitingReply { reply_capacity }) = taken else {
            // Live task, but not rendezvoused with anyone: a double reply,
            // or the tid was reused since the Receive.
            return self.fail(caller, KernelError::StaleReplyTarget(to.raw()));
        };
        let mut copied = 0;
        if let Some(sender) = self.pool.get_mut(to) {
            copied = sender.context.deliver(&reply, reply_capacity);
            sender.context.set_return_value(copied as i64);
        }
        self.audit.record(ScheduleEvent::MessageCopied {
            from: caller,
            to,
            bytes: copied,
        });
        // The unblocked sender goes ready ahead of the replier.
        self.requeue_ready(to);
        self.complete(caller, copied as i64);
    }

    fn sys_await_event(&mut self, caller: Tid, event: EventId) {
        self.block(caller, TaskState::EventWait { event }, None);
        if let Some(entry) = self.pool.task_ref(caller) {
            self.event_waits.entry(event).or_default().push_back(entry);
        }
    }

    // --- transitions ---

    fn spawn(&mut self, parent: Option<Parentage>, priority: Priority, entry: usize) -> Option<Tid> {
        let config = self.config.clone();
        let tid = self.pool.allocate(parent, priority, |slot| {
            TaskContext::seed(entry, StackRegion::for_slot(&config, slot), config.stack_align)
        })?;
        self.audit.record(ScheduleEvent::TaskCreated {
            tid,
            parent: parent.map(|p| p.tid),
            priority,
        });
        Some(tid)
    }

    /// Marks a task ready and queues it at the back of its priority level.
    fn requeue_ready(&mut self, tid: Tid) {
        let priority = match self.pool.get_mut(tid) {
            Some(task) => {
                task.state = TaskState::Ready;
                task.priority()
            }
            None => return,
        };
        if let Some(entry) = self.pool.task_ref(tid) {
            self.ready.push(entry, priority);
            self.audit.record(ScheduleEvent::TaskReadied { tid });
        }
    }

    /// Writes a result into the caller's return register and re-queues it.
    fn complete(&mut self, caller: Tid, value: i64) {
        if let Some(task) = self.pool.get_mut(caller) {
            task.context.set_return_value(value);
        }
        self.requeue_ready(caller);
    }

    /// Rejects a syscall: sentinel into the return register, caller stays
    /// runnable.
    fn fail(&mut self, caller: Tid, error: KernelError) {
        self.audit.record(ScheduleEvent::SyscallFailed {
            tid: caller,
            code: error.code(),
        });
        self.complete(caller, error.code());
    }

    /// Moves a task out of Active into a wait state.
    fn block(&mut self, tid: Tid, state: TaskState, pending: Option<PendingTransfer>) {
        if let Some(task) = self.pool.get_mut(tid) {
            task.state = state;
            task.pending = pending;
        }
        self.audit.record(ScheduleEvent::TaskBlocked { tid, state });
    }

    // --- inspection ---

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn task(&self, tid: Tid) -> Option<&TaskDescriptor> {
        self.pool.get(tid)
    }

    pub fn task_state(&self, tid: Tid) -> Option<TaskState> {
        self.pool.get(tid).map(TaskDescriptor::state)
    }

    pub fn context(&self, tid: Tid) -> Option<&TaskContext> {
        self.pool.get(tid).map(TaskDescriptor::context)
    }

    pub fn task_count(&self) -> usize {
        self.pool.num_allocated()
    }

    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    /// Senders currently queued on `tid`'s mailbox, stale entries included.
    pub fn mailbox_len(&self, tid: Tid) -> usize {
        match self.config.slot_of_tid(tid) {
            Some(slot) => self.mailboxes.slot(slot).len(),
            None => 0,
        }
    }

    pub fn event_waiter_count(&self, event: EventId) -> usize {
        self.event_waits.get(&event).map(VecDeque::len).unwrap_or(0)
    }

    pub fn audit_log(&self) -> &ScheduleLog {
        &self.audit
    }

    pub fn audit_log_mut(&mut self) -> &mut ScheduleLog {
        &mut self.audit
    }
}
