use csv::Writer;
use serde::{Deserialize, Serialize};
use std::io::{sink, Sink, Write};
use std::ops::{Add, AddAssign};
use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

pub trait Message: Send {
    fn iteration(&self) -> usize;
    fn get_info(&self) -> MessageInfo;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageInfo {
    pub evaluations: usize,
    pub cpu_time: Duration,
    pub n_improvements: usize,
    pub changes: usize,
    pub best_time: f64,
    pub best_fitness: f64,
}

impl Default for MessageInfo {
    fn default() -> Self {
        Self {
            evaluations: 0,
            cpu_time: Duration::default(),
            n_improvements: 0,
            changes: 0,
            best_time: f64::INFINITY,
            best_fitness: 0.0,
        }
    }
}

impl MessageInfo {
    pub fn new(
        evaluations: usize,
        n_improvements: usize,
        changes: usize,
        cpu_time: Duration,
        best_time: f64,
        best_fitness: f64,
    ) -> Self {
        Self {
            evaluations,
            cpu_time,
            n_improvements,
            changes,
            best_time,
            best_fitness,
        }
    }
}

impl Add for MessageInfo {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            evaluations: self.evaluations + other.evaluations,
            n_improvements: self.n_improvements + other.n_improvements,
            changes: self.changes + other.changes,
            cpu_time: self.cpu_time + other.cpu_time,
            best_time: self.best_time.min(other.best_time),
            best_fitness: self.best_fitness.max(other.best_fitness),
        }
    }
}

impl AddAssign for MessageInfo {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// One CSV line: the summed statistics of `aggregation_rate` iterations.
#[derive(Debug, Serialize, Deserialize)]
struct Row {
    iteration: usize,
    evaluations: usize,
    n_improvements: usize,
    changes: usize,
    cpu_time_us: u64,
    best_time: f64,
    best_fitness: f64,
}

/// Collects statistics messages sent by an engine and its workers and writes
/// them as CSV, one row per `aggregation_rate` iterations.
pub struct Supervisor<M: Message, W: Write> {
    sender: Sender<M>,
    receiver: Receiver<M>,
    messages: Vec<MessageInfo>,
    aggregation_rate: usize,
    writer: Writer<W>,
}

impl<M: Message, W: Write> Supervisor<M, W> {
    pub fn new(aggregation_rate: usize, writer: Writer<W>) -> Self {
        let (tx, rx) = mpsc::channel();
        Supervisor {
            sender: tx,
            receiver: rx,
            messages: Vec::default(),
            aggregation_rate: aggregation_rate.max(1),
            writer,
        }
    }

    pub fn sender(&self) -> Sender<M> {
        self.sender.clone()
    }

    /// Folds every message received so far into its iteration bucket.
    pub fn prepare_next(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            let idx = message.iteration() / self.aggregation_rate;
            if idx >= self.messages.len() {
                self.messages.resize_with(idx + 1, Default::default);
            }
            self.messages[idx] += message.get_info();
        }
    }

    pub fn aggregated(&self) -> &[MessageInfo] {
        &self.messages
    }

    /// Drains the channel and writes all buckets.
    pub fn aggregate_receive(&mut self) -> Result<(), csv::Error> {
        self.prepare_next();
        for (idx, info) in self.messages.iter().enumerate() {
            self.writer.serialize(Row {
                iteration: idx * self.aggregation_rate,
                evaluations: info.evaluations,
                n_improvements: info.n_improvements,
                changes: info.changes,
                cpu_time_us: info.cpu_time.as_micros() as u64,
                best_time: info.best_time,
                best_fitness: info.best_fitness,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<M: Message> Default for Supervisor<M, Sink> {
    fn default() -> Self {
        Supervisor::new(1, Writer::from_writer(sink()))
    }
}
