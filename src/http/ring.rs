/// Fixed-capacity byte ring used to stage request bytes for one connection.
///
/// Bytes are appended at the write cursor and consumed from the read cursor,
/// both wrapping at `capacity`. The backing storage is allocated once and never
/// grows; when it is full, [`CircularBuffer::append`] simply writes fewer bytes
/// than it was given.
#[derive(Debug)]
pub struct CircularBuffer {
    data: Box<[u8]>,
    read_pos: usize,
    write_pos: usize,
    len: usize,
}

impl CircularBuffer {
    /// Creates an empty buffer holding at most `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "circular buffer capacity must be non-zero");
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            read_pos: 0,
            write_pos: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of buffered, unread bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left for [`append`](Self::append).
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Copies as much of `src` as fits and returns how many bytes were written.
    ///
    /// A return value smaller than `src.len()` means the buffer filled up.
    pub fn append(&mut self, src: &[u8]) -> usize {
        let count = src.len().min(self.remaining());
        if count == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let first = count.min(capacity - self.write_pos);
        self.data[self.write_pos..self.write_pos + first].copy_from_slice(&src[..first]);
        // wrapped tail
        self.data[..count - first].copy_from_slice(&src[first..count]);

        self.write_pos = (self.write_pos + count) % capacity;
        self.len += count;
        count
    }

    /// Returns the byte `offset` positions past the read cursor.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= self.len()`.
    pub fn peek(&self, offset: usize) -> u8 {
        assert!(
            offset < self.len,
            "peek offset {offset} out of range for {} buffered bytes",
            self.len
        );
        self.data[(self.read_pos + offset) % self.capacity()]
    }

    /// Discards `n` bytes from the front of the buffer.
    ///
    /// # Panics
    ///
    /// Panics if `n > self.len()`.
    pub fn consume(&mut self, n: usize) {
        assert!(
            n <= self.len,
            "cannot consume {n} bytes, only {} buffered",
            self.len
        );
        self.read_pos = (self.read_pos + n) % self.capacity();
        self.len -= n;
    }

    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.len = 0;
    }
}
