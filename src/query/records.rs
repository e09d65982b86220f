//! Record stream
//!
//! The raw bytes of matched records, in the order the store sent them. The
//! stream owns its source (normally the HTTP response body) and releases it
//! exactly once: on [`RecordStream::close`], or on drop if close was never
//! reached. Closing twice is a no-op.

use async_trait::async_trait;
use std::fmt;
use std::io::{self, Write};

/// A source of raw record bytes
#[async_trait]
pub trait RecordSource: Send {
    /// Next chunk of bytes, or `None` once the source is exhausted
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;
}

#[async_trait]
impl RecordSource for reqwest::Response {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.chunk()
            .await
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .map_err(io::Error::other)
    }
}

/// Owned stream of record bytes
pub struct RecordStream {
    source: Option<Box<dyn RecordSource>>,
}

impl RecordStream {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
        }
    }

    /// A stream with no bytes and nothing to release
    pub fn empty() -> Self {
        Self { source: None }
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Copy every remaining byte to `out`, then flush it.
    ///
    /// Returns the number of bytes written. A closed stream copies nothing.
    pub async fn copy_to<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<u64> {
        let Some(source) = self.source.as_mut() else {
            return Ok(0);
        };

        let mut copied = 0u64;
        while let Some(chunk) = source.next_chunk().await? {
            out.write_all(&chunk)?;
            copied += chunk.len() as u64;
        }
        out.flush()?;

        Ok(copied)
    }

    /// Release the underlying source. Returns `true` if this call released it.
    pub fn close(&mut self) -> bool {
        match self.source.take() {
            Some(source) => {
                drop(source);
                tracing::trace!("record stream released");
                true
            }
            None => false,
        }
    }
}

impl Drop for RecordStream {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStream")
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory source that counts how many times it is released
    pub struct TrackedSource {
        chunks: VecDeque<io::Result<Vec<u8>>>,
        releases: Arc<AtomicUsize>,
    }

    impl TrackedSource {
        pub fn new(chunks: Vec<io::Result<Vec<u8>>>) -> (Self, Arc<AtomicUsize>) {
            let releases = Arc::new(AtomicUsize::new(0));
            let source = Self {
                chunks: chunks.into(),
                releases: releases.clone(),
            };
            (source, releases)
        }

        pub fn with_chunks(chunks: &[&str]) -> (Self, Arc<AtomicUsize>) {
            Self::new(chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect())
        }
    }

    #[async_trait]
    impl RecordSource for TrackedSource {
        async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
            self.chunks.pop_front().transpose()
        }
    }

    impl Drop for TrackedSource {
        fn drop(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn releases(counter: &Arc<AtomicUsize>) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Writer that fails every write
    pub struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
