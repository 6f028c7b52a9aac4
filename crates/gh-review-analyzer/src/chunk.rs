//! Splitting large files into reviewable chunks.
//!
//! Model context limits what a single request should carry. Oversized
//! numbered-code payloads are split at line granularity; each line keeps
//! its original number prefix, so findings from any chunk still address
//! the real file.

/// Limits a single analyzer request must stay within.
#[derive(Debug, Clone, Copy)]
pub struct ChunkLimits {
    pub max_lines: usize,
    pub max_chars: usize,
}

impl ChunkLimits {
    pub fn new(max_lines: usize, max_chars: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
            max_chars: max_chars.max(1),
        }
    }
}

/// Check if code exceeds the limits.
pub fn is_large(code: &str, limits: ChunkLimits) -> bool {
    code.lines().count() > limits.max_lines || code.len() > limits.max_chars
}

/// Split code into chunks, each within the limits.
///
/// Small code is returned as-is in a single chunk.
pub fn chunk_code(code: &str, limits: ChunkLimits) -> Vec<String> {
    if !is_large(code, limits) {
        return vec![code.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_chars = 0usize;

    for line in code.lines() {
        let line_len = line.len() + 1;

        let would_exceed_lines = current.len() >= limits.max_lines;
        let would_exceed_chars = current_chars + line_len > limits.max_chars;

        if !current.is_empty() && (would_exceed_lines || would_exceed_chars) {
            chunks.push(current.join("\n"));
            current.clear();
            current_chars = 0;
        }

        current.push(line);
        current_chars += line_len;
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered_code(lines: usize) -> String {
        (1..=lines)
            .map(|n| format!("{:>4}| line {}", n, n))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_small_code_is_one_chunk() {
        let code = numbered_code(10);
        let chunks = chunk_code(&code, ChunkLimits::new(200, 15_000));
        assert_eq!(chunks, vec![code]);
    }

    #[test]
    fn test_line_limit_splits() {
        let code = numbered_code(45);
        let chunks = chunk_code(&code, ChunkLimits::new(20, 15_000));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].lines().count(), 20);
        assert_eq!(chunks[1].lines().count(), 20);
        assert_eq!(chunks[2].lines().count(), 5);
    }

    #[test]
    fn test_char_limit_splits() {
        let code = numbered_code(10);
        let chunks = chunk_code(&code, ChunkLimits::new(200, 40));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 40 || chunk.lines().count() == 1);
        }
    }

    #[test]
    fn test_no_lines_lost_or_reordered() {
        let code = numbered_code(100);
        let chunks = chunk_code(&code, ChunkLimits::new(7, 15_000));
        let rejoined = chunks.join("\n");
        assert_eq!(rejoined, code);
    }

    #[test]
    fn test_is_large() {
        let limits = ChunkLimits::new(5, 1000);
        assert!(!is_large(&numbered_code(5), limits));
        assert!(is_large(&numbered_code(6), limits));
        assert!(is_large(&"x".repeat(1001), ChunkLimits::new(100, 1000)));
    }
}
