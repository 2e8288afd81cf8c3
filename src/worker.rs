//! Runs the store on its own thread so the render loop never waits on SQLite.
//!
//! The UI submits a [`Request`] and gets a [`Ticket`] back. The worker answers
//! every request with a [`Reply`] carrying the same ticket, the outcome of
//! the action, and a fresh read of all transactions. Requests are handled
//! one at a time in submission order, so tickets come back in ascending order.
//! The caller decides which replies are stale and drops them.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use crate::db::{write_csv, TransactionStore};
use crate::error::StoreError;
use crate::models::{NewTransaction, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Ticket(u64);

#[derive(Debug, Clone)]
pub(crate) enum Request {
    ReadAll,
    Create(NewTransaction),
    Update(Transaction),
    Delete(i64),
    /// Write everything to a CSV file.
    Export(PathBuf),
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Self::ReadAll => "read_all",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Export(_) => "export",
        }
    }
}

/// What a successful request did.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Done {
    Loaded,
    Created(Transaction),
    Updated(Transaction),
    Deleted(Transaction),
    Exported { path: PathBuf, count: usize },
}

#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) ticket: Ticket,
    pub(crate) action: Result<Done, StoreError>,
    /// Read after the action ran, whether or not it succeeded.
    pub(crate) transactions: Result<Vec<Transaction>, StoreError>,
}

struct Job {
    ticket: Ticket,
    request: Request,
}

pub(crate) struct Worker {
    jobs: Option<Sender<Job>>,
    replies: Receiver<Reply>,
    handle: Option<JoinHandle<()>>,
    next_ticket: u64,
}

impl Worker {
    pub(crate) fn spawn<S>(store: S) -> Result<Self>
    where
        S: TransactionStore + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();
        let handle = std::thread::Builder::new()
            .name("store-worker".into())
            .spawn(move || serve(store, job_rx, reply_tx))
            .context("Failed to start storage worker")?;

        Ok(Self {
            jobs: Some(job_tx),
            replies: reply_rx,
            handle: Some(handle),
            next_ticket: 0,
        })
    }

    pub(crate) fn submit(&mut self, request: Request) -> Result<Ticket, StoreError> {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        let jobs = self.jobs.as_ref().ok_or(StoreError::WorkerGone)?;
        jobs.send(Job { ticket, request })
            .map_err(|_| StoreError::WorkerGone)?;
        Ok(ticket)
    }

    /// Next finished reply, if any. Never blocks.
    pub(crate) fn try_recv(&self) -> Result<Option<Reply>, StoreError> {
        match self.replies.try_recv() {
            Ok(reply) => Ok(Some(reply)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(StoreError::WorkerGone),
        }
    }

    #[cfg(test)]
    pub(crate) fn recv(&self) -> Result<Reply, StoreError> {
        self.replies
            .recv_timeout(std::time::Duration::from_secs(5))
            .map_err(|_| StoreError::WorkerGone)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("storage worker panicked");
            }
        }
    }
}

fn serve<S: TransactionStore>(mut store: S, jobs: Receiver<Job>, replies: Sender<Reply>) {
    for Job { ticket, request } in jobs {
        tracing::debug!(ticket = ticket.0, request = request.name(), "store request");

        let action = match request {
            Request::ReadAll => Ok(Done::Loaded),
            Request::Create(new) => store.create(&new).map(Done::Created),
            Request::Update(txn) => store.update(&txn).map(|()| Done::Updated(txn)),
            Request::Delete(id) => store.delete(id).map(Done::Deleted),
            Request::Export(path) => store
                .read_all()
                .and_then(|all| write_csv(&path, &all))
                .map(|count| Done::Exported { path, count }),
        };
        if let Err(e) = &action {
            if !e.is_not_found() {
                tracing::error!(ticket = ticket.0, error = %e, "store request failed");
            }
        }

        let transactions = store.read_all();
        if let Err(e) = &transactions {
            tracing::error!(ticket = ticket.0, error = %e, "reload failed");
        }

        if replies
            .send(Reply {
                ticket,
                action,
                transactions,
            })
            .is_err()
        {
            // Nobody is listening any more.
            break;
        }
    }
    tracing::debug!("storage worker stopped");
}
