use std::collections::VecDeque;

/// Ring buffer of the most recent console lines.
#[derive(Debug)]
pub(crate) struct LogBuffer {
    max_lines: usize,
    lines: VecDeque<String>,
}

impl LogBuffer {
    pub(crate) fn new(max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        Self {
            max_lines,
            lines: VecDeque::with_capacity(max_lines.min(4096)),
        }
    }

    pub(crate) fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    /// Up to `count` most recent lines, oldest first.
    pub(crate) fn recent(&self, count: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(start).cloned().collect()
    }

    pub(crate) fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines.max(1);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }
}
