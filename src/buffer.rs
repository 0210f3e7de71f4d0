// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reusable byte buffers for formatting log records.

use std::ops::Deref;
use std::ops::DerefMut;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;

const DEFAULT_MAX_POOLED: usize = 64;

// Larger buffers are dropped instead of being kept around after a huge record.
const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// A pool of byte buffers, so formatting a record does not allocate in the steady state.
///
/// The pool holds at most a fixed number of idle buffers; getting from an empty pool allocates a
/// new buffer and returning to a full pool drops it.
///
/// # Examples
///
/// ```
/// use stratalog::buffer::BufferPool;
///
/// let pool = BufferPool::default();
/// let mut buf = pool.get();
/// buf.extend_from_slice(b"hello");
/// assert_eq!(&buf[..], b"hello");
/// ```
#[derive(Debug)]
pub struct BufferPool {
    sender: Sender<Vec<u8>>,
    receiver: Receiver<Vec<u8>>,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POOLED)
    }
}

impl BufferPool {
    /// Create a pool keeping at most `max_pooled` idle buffers.
    pub fn new(max_pooled: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(max_pooled);
        Self { sender, receiver }
    }

    /// Take an empty buffer from the pool, allocating one if none is idle.
    pub fn get(&self) -> Buffer<'_> {
        let mut bytes = self.receiver.try_recv().unwrap_or_default();
        bytes.clear();
        Buffer { bytes, pool: self }
    }

    /// The number of idle buffers.
    pub fn idle(&self) -> usize {
        self.receiver.len()
    }

    fn put(&self, bytes: Vec<u8>) {
        if bytes.capacity() <= MAX_POOLED_CAPACITY {
            let _ = self.sender.try_send(bytes);
        }
    }
}

/// A byte buffer borrowed from a [`BufferPool`], returned to it on drop.
#[derive(Debug)]
pub struct Buffer<'a> {
    bytes: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for Buffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl DerefMut for Buffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bytes
    }
}

impl Drop for Buffer<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.bytes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_reused_and_cleared() {
        let pool = BufferPool::new(4);
        let ptr = {
            let mut buf = pool.get();
            buf.extend_from_slice(b"first record");
            buf.as_ptr()
        };
        assert_eq!(pool.idle(), 1);

        let buf = pool.get();
        assert!(buf.is_empty());
        assert_eq!(buf.as_ptr(), ptr);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_pool_is_bounded() {
        let pool = BufferPool::new(2);
        let bufs = (0..5)
            .map(|_| {
                let mut buf = pool.get();
                buf.push(b'x');
                buf
            })
            .collect::<Vec<_>>();
        drop(bufs);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_oversized_buffer_is_not_pooled() {
        let pool = BufferPool::new(2);
        {
            let mut buf = pool.get();
            buf.resize(MAX_POOLED_CAPACITY + 1, b'x');
        }
        assert_eq!(pool.idle(), 0);
    }
}
