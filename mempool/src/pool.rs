//! A fee-ordered transaction pool with a fixed upper bound.

use std::io::{BufRead, Write};

use mempool_collections::BoundedDualHeap;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::transaction::Transaction;

/// Number of transactions a pool keeps unless told otherwise.
pub const DEFAULT_CAPACITY: usize = 5000;

/// Holds the highest-fee transactions seen so far.
///
/// When full, pushing a transaction drops the one with the lowest total fee
/// (which may be the newcomer).
///
/// # Example
///
/// ```
/// use mempool::MemPool;
///
/// let input = "\
/// TxHash=A Gas=10 FeePerGas=1.5 Signature=SA
/// TxHash=B Gas=10 FeePerGas=3 Signature=SB
/// ";
///
/// let mut pool = MemPool::with_capacity(10);
/// pool.read_transactions(input.as_bytes()).unwrap();
///
/// let mut output = Vec::new();
/// pool.write_transactions(&mut output).unwrap();
///
/// assert_eq!(
///     String::from_utf8(output).unwrap(),
///     "TxHash=B Gas=10 FeePerGas=3 Signature=SB\nTxHash=A Gas=10 FeePerGas=1.5 Signature=SA"
/// );
/// ```
#[derive(Debug)]
pub struct MemPool {
    queue: BoundedDualHeap<Transaction>,
}

impl MemPool {
    /// Creates an empty pool holding up to [`DEFAULT_CAPACITY`] transactions.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty pool holding up to `capacity` transactions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: BoundedDualHeap::new(capacity),
        }
    }

    /// Returns the number of transactions held.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if the pool is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the maximum number of transactions held.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Adds a transaction, returning whichever one was dropped to make room.
    pub fn push(&mut self, tx: Transaction) -> Option<Transaction> {
        let evicted = self.queue.push(tx);
        if let Some(dropped) = &evicted {
            debug!(hash = %dropped.hash, fee = dropped.fee(), "evicted lowest-fee transaction");
        }
        evicted
    }

    /// Removes and returns the transaction with the highest total fee.
    pub fn pop(&mut self) -> Option<Transaction> {
        self.queue.try_pop()
    }

    /// Reads one transaction per line into the pool.
    ///
    /// Lines holding only whitespace are skipped. The first malformed line
    /// stops reading; transactions from earlier lines stay in the pool.
    /// Returns the number of transactions read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) for a malformed line and
    /// [`Error::Io`](crate::Error::Io) if the reader fails.
    pub fn read_transactions<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut read = 0;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let tx: Transaction = line.parse().inspect_err(|error| {
                warn!(line = number + 1, %error, "rejected transaction");
            })?;
            self.push(tx);
            read += 1;
        }

        info!(read, held = self.len(), "transactions loaded");
        Ok(read)
    }

    /// Drains the pool into `writer`, highest fee first.
    ///
    /// Records are separated by `\n` with no trailing newline; an empty pool
    /// writes nothing. Returns the number of transactions written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the writer fails. Records
    /// already popped at that point are gone from the pool.
    pub fn write_transactions<W: Write>(&mut self, mut writer: W) -> Result<usize> {
        let mut written = 0;

        while let Some(tx) = self.queue.try_pop() {
            if written > 0 {
                writer.write_all(b"\n")?;
            }
            write!(writer, "{tx}")?;
            written += 1;
        }
        writer.flush()?;

        info!(written, "transactions written");
        Ok(written)
    }
}

impl Default for MemPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads every transaction from `reader` and writes the best `capacity` of
/// them to `writer`, highest fee first.
///
/// Nothing is written if reading fails.
pub fn prioritize<R: BufRead, W: Write>(reader: R, writer: W, capacity: usize) -> Result<usize> {
    let mut pool = MemPool::with_capacity(capacity);
    pool.read_transactions(reader)?;
    pool.write_transactions(writer)
}
