//! Ordered sequence owned by a single worker thread. Callers never touch the storage, they send
//! commands over a channel and wait for the worker's reply where there is one.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, error, warn};
use triage::{Entry, PriorityQueue};

use crate::list::OrderedList;

type SendBack<T> = Sender<T>;

enum Command<E, P> {
    Add(Entry<E, P>),
    Update(Entry<E, P>),
    Upsert(Entry<E, P>),
    Pop(SendBack<Option<Entry<E, P>>>),
    Drain(usize, SendBack<Vec<E>>),
    Len(SendBack<usize>),
    Stop,
}

/// Worker side of a [`ChanneledQueue`].
struct Storage<E, P> {
    list: OrderedList<E, P>,
    command_sink: Receiver<Command<E, P>>,
}

impl<E, P> Storage<E, P>
where
    E: PartialEq,
    P: Ord,
{
    /// Blocks the thread it is running on until the queue is stopped or dropped.
    /// Commands are applied one at a time in the order they were received.
    fn run(mut self) {
        debug!("sequence worker started");

        while let Ok(command) = self.command_sink.recv() {
            match command {
                Command::Add(entry) => self.list.insert(entry),
                Command::Update(entry) => {
                    if self.list.remove(&entry.element).is_some() {
                        self.list.insert(entry);
                    }
                }
                Command::Upsert(entry) => {
                    self.list.remove(&entry.element);
                    self.list.insert(entry);
                }
                Command::Pop(send_back) => reply(send_back, self.list.pop_front()),
                Command::Drain(n, send_back) => {
                    let mut drained = Vec::with_capacity(n.min(self.list.len()));
                    for _ in 0..n {
                        let Some(entry) = self.list.pop_front() else {
                            break;
                        };
                        drained.push(entry.element);
                    }
                    reply(send_back, drained);
                }
                Command::Len(send_back) => reply(send_back, self.list.len()),
                Command::Stop => break,
            }
        }

        debug!(remaining = self.list.len(), "sequence worker stopped");
    }
}

fn reply<T>(send_back: SendBack<T>, value: T) {
    send_back
        .send(value)
        .inspect_err(|_| warn!("requester has hung up, reply is thrown away"))
        .ok();
}

/// Linearizable like [`LockedQueue`](crate::LockedQueue): the worker applies one command at a
/// time. `add`, `update` and `upsert` return as soon as the command is queued, `pop`, `drain` and
/// `len` wait for the worker, which has applied every command sent before them by then.
///
/// Dropping the queue stops the worker and drops the remaining entries.
pub struct ChanneledQueue<E, P> {
    command_source: Sender<Command<E, P>>,
    runner: Option<JoinHandle<()>>,
}

impl<E, P> ChanneledQueue<E, P>
where
    E: PartialEq + Send + 'static,
    P: Ord + Send + 'static,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (command_source, command_sink) = crossbeam::channel::unbounded();
        let storage = Storage {
            list: OrderedList::with_capacity(capacity),
            command_sink,
        };

        let runner = thread::spawn(move || storage.run());
        Self {
            command_source,
            runner: Some(runner),
        }
    }
}

impl<E, P> Default for ChanneledQueue<E, P>
where
    E: PartialEq + Send + 'static,
    P: Ord + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, P> ChanneledQueue<E, P> {
    fn submit(&self, command: Command<E, P>) {
        if self.command_source.send(command).is_err() {
            error!("sequence worker is not listening, command is dropped");
        }
    }

    /// Sends a command carrying a reply channel and waits for the answer.
    fn request<T>(&self, command: impl FnOnce(SendBack<T>) -> Command<E, P>) -> Option<T> {
        let (send_back, answer) = crossbeam::channel::bounded(1);
        if self.command_source.send(command(send_back)).is_err() {
            error!("sequence worker is not listening, request is dropped");
            return None;
        }
        answer
            .recv()
            .inspect_err(|_| error!("sequence worker hung up before replying"))
            .ok()
    }
}

impl<E, P> Drop for ChanneledQueue<E, P> {
    fn drop(&mut self) {
        self.command_source.send(Command::Stop).ok();
        if let Some(runner) = self.runner.take() {
            if runner.join().is_err() {
                error!("sequence worker panicked");
            }
        }
    }
}

impl<E, P> PriorityQueue<E, P> for ChanneledQueue<E, P>
where
    E: PartialEq + Send + 'static,
    P: Ord + Send + 'static,
{
    fn add(&self, element: E, priority: P) {
        self.submit(Command::Add(Entry::new(element, priority)));
    }

    fn pop_entry(&self) -> Option<Entry<E, P>> {
        self.request(Command::Pop).flatten()
    }

    fn update(&self, element: E, priority: P) {
        self.submit(Command::Update(Entry::new(element, priority)));
    }

    fn upsert(&self, element: E, priority: P) {
        self.submit(Command::Upsert(Entry::new(element, priority)));
    }

    fn len(&self) -> usize {
        self.request(Command::Len).unwrap_or_default()
    }

    fn drain(&self, n: usize) -> Vec<E> {
        self.request(|send_back| Command::Drain(n, send_back))
            .unwrap_or_default()
    }
}
