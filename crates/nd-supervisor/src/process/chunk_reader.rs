use tokio::io::{AsyncRead, AsyncReadExt};

const READ_BUFFER_SIZE: usize = 4096;

/// Lazy sequence of text chunks read from one process pipe.
///
/// Each call to [`next_chunk`](Self::next_chunk) returns whatever arrived
/// since the previous call, decoded as UTF-8. A multi-byte character split
/// across two reads is held back until it is complete; invalid bytes become
/// U+FFFD.
pub struct ChunkReader<R> {
    reader: R,
    buf: Box<[u8]>,
    pending: Vec<u8>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; READ_BUFFER_SIZE].into_boxed_slice(),
            pending: Vec::new(),
            eof: false,
        }
    }

    /// Next decoded chunk, or `None` once the pipe is closed and drained.
    pub async fn next_chunk(&mut self) -> std::io::Result<Option<String>> {
        while !self.eof {
            let n = self.reader.read(&mut self.buf).await?;
            if n == 0 {
                self.eof = true;
                break;
            }

            self.pending.extend_from_slice(&self.buf[..n]);
            let text = self.decode_pending();
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }

        if self.pending.is_empty() {
            return Ok(None);
        }

        // Truncated sequence at EOF
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Ok(Some(tail))
    }

    /// Read until EOF and return everything as one string.
    pub async fn read_to_end(mut self) -> std::io::Result<String> {
        let mut out = String::new();
        while let Some(chunk) = self.next_chunk().await? {
            out.push_str(&chunk);
        }
        Ok(out)
    }

    fn decode_pending(&mut self) -> String {
        let mut out = String::new();
        let mut consumed = 0;

        loop {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = consumed + e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[consumed..valid_end]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed = valid_end + len;
                        }
                        None => {
                            // Incomplete sequence: keep it for the next read
                            consumed = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..consumed);
        out
    }
}
