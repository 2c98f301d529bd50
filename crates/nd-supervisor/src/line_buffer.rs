use tracing::warn;

/// Reassembles complete lines from arbitrarily split chunks.
#[derive(Debug)]
pub struct LineBuffer {
    pending: String,
    max_bytes: usize,
}

impl LineBuffer {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            pending: String::new(),
            max_bytes,
        }
    }

    /// Append a chunk and return every line it completed, without terminators.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let mut line: String = self.pending.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }

        if self.pending.len() > self.max_bytes {
            warn!(
                bytes = self.pending.len(),
                limit = self.max_bytes,
                "Discarding overlong partial output line"
            );
            self.pending.clear();
        }

        lines
    }

    /// Flush the trailing partial line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
