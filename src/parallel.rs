use std::{panic, thread};

use crate::{FromRecordBytes, Handle, MarcError, Reader, Result};

/// Number of records a worker processes between `on_batch_complete` calls.
pub const BATCH_SIZE: usize = 1024;

/// Trait for types that can process records in parallel.
///
/// This is implemented by the **processor** not by the **reader**.
/// For the **reader**, see the [`ParallelReader`] trait.
pub trait ParallelProcessor<M>: Send + Clone {
    /// Process a single record along with its position in the index
    fn process_record(&mut self, idx: usize, record: M) -> Result<()>;

    /// Called after every batch of records
    /// Default implementation does nothing
    fn on_batch_complete(&mut self) -> Result<()> {
        Ok(())
    }

    /// Set the thread ID for this processor
    ///
    /// Each thread calls this method with its own unique ID before processing.
    #[allow(unused_variables)]
    fn set_tid(&mut self, _tid: usize) {
        // Default implementation does nothing
    }

    /// Get the thread ID for this processor
    fn get_tid(&self) -> Option<usize> {
        None
    }
}

/// Trait for readers that can process records in parallel
///
/// This is implemented by the **reader** not by the **processor**.
/// For the **processor**, see the [`ParallelProcessor`] trait.
pub trait ParallelReader<M> {
    /// Splits the records into contiguous ranges, one per thread.
    ///
    /// `num_threads == 0` uses every available core. The first error from any
    /// thread is returned once all threads have stopped.
    fn process_parallel<P: ParallelProcessor<M>>(&self, processor: P, num_threads: usize)
        -> Result<()>;
}

impl<R, M> ParallelReader<M> for Reader<R, M>
where
    R: Handle + Send,
    M: FromRecordBytes,
{
    fn process_parallel<P: ParallelProcessor<M>>(
        &self,
        processor: P,
        num_threads: usize,
    ) -> Result<()> {
        if self.is_closed() {
            return Err(MarcError::Closed);
        }
        let num_threads = if num_threads == 0 {
            num_cpus::get()
        } else {
            num_threads.min(num_cpus::get())
        };
        let records_per_thread = self.len() / num_threads;
        let remainder = self.len() % num_threads; // for last thread
        log::debug!(
            "processing {} records on {} threads",
            self.len(),
            num_threads
        );

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(num_threads);
            for tid in 0..num_threads {
                let start = tid * records_per_thread;
                let end = if tid == num_threads - 1 {
                    start + records_per_thread + remainder
                } else {
                    start + records_per_thread
                };
                let mut thread_processor = processor.clone();
                thread_processor.set_tid(tid);
                let handle = scope.spawn(move || -> Result<()> {
                    let mut batch_start = start;
                    while batch_start < end {
                        let batch_end = (batch_start + BATCH_SIZE).min(end);
                        for idx in batch_start..batch_end {
                            let record = self.get(idx)?;
                            thread_processor.process_record(idx, record)?;
                        }
                        thread_processor.on_batch_complete()?;
                        batch_start = batch_end;
                    }
                    Ok(())
                });
                handles.push(handle);
            }

            let mut outcome = Ok(());
            for handle in handles {
                let result = handle.join().unwrap_or_else(|e| panic::resume_unwind(e));
                if outcome.is_ok() {
                    outcome = result;
                }
            }
            outcome
        })
    }
}
