//! Multi-document YAML stream reader
//!
//! Splits a stream on `---` document markers without parsing it, so each
//! document's original bytes (formatting, comments) can be written back out
//! untouched. Splitting follows the Kubernetes YAML reader: a line that starts
//! with `---` and is otherwise blank or a comment ends the current document.

use std::io::{self, BufRead};

const SEPARATOR: &[u8] = b"---";

/// Reads YAML documents one at a time from a buffered stream
pub struct DocumentReader<R> {
    reader: R,
}

impl<R: BufRead> DocumentReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next document, `None` at end of stream
    ///
    /// Separators with nothing between them do not produce empty documents.
    pub fn read_document(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buffer = Vec::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Ok((!buffer.is_empty()).then_some(buffer));
            }

            if is_separator(&line) {
                if !buffer.is_empty() {
                    return Ok(Some(buffer));
                }
                continue;
            }

            buffer.extend_from_slice(&line);
        }
    }
}

impl<R: BufRead> Iterator for DocumentReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_document().transpose()
    }
}

fn is_separator(line: &[u8]) -> bool {
    let Some(rest) = line.strip_prefix(SEPARATOR) else {
        return false;
    };
    let rest = String::from_utf8_lossy(rest);
    let trimmed = rest.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Collapse trailing newlines to exactly one
///
/// Keeps the CRD files we write back out clean for YAML linters.
pub fn normalize_trailing_newlines(mut doc: Vec<u8>) -> Vec<u8> {
    while doc.last() == Some(&b'\n') {
        doc.pop();
    }
    doc.push(b'\n');
    doc
}

/// Whether a document holds anything besides blank lines and comments
pub fn has_content(doc: &[u8]) -> bool {
    String::from_utf8_lossy(doc).lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<String> {
        DocumentReader::new(input.as_bytes())
            .map(|doc| String::from_utf8(doc.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_split_documents() {
        let docs = split("a: 1\n---\nb: 2\n---\nc: 3\n");
        assert_eq!(docs, vec!["a: 1\n", "b: 2\n", "c: 3\n"]);
    }

    #[test]
    fn test_leading_and_repeated_separators() {
        let docs = split("---\n---\na: 1\n---\n---\n\n---\nb: 2");
        assert_eq!(docs, vec!["a: 1\n", "\n", "b: 2"]);
    }

    #[test]
    fn test_separator_with_comment() {
        let docs = split("a: 1\n--- # next\nb: 2\n");
        assert_eq!(docs, vec!["a: 1\n", "b: 2\n"]);
    }

    #[test]
    fn test_separator_lookalikes_are_content() {
        let docs = split("a: |\n  ----\n--- b\n");
        assert_eq!(docs, vec!["a: |\n  ----\n--- b\n"]);

        let docs = split("a: 1\n----\nb: 2\n");
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_empty_stream() {
        assert!(split("").is_empty());
        assert!(split("---\n").is_empty());
    }

    #[test]
    fn test_normalize_trailing_newlines() {
        assert_eq!(normalize_trailing_newlines(b"a: 1\n\n\n".to_vec()), b"a: 1\n");
        assert_eq!(normalize_trailing_newlines(b"a: 1".to_vec()), b"a: 1\n");
        assert_eq!(normalize_trailing_newlines(b"a: 1\n".to_vec()), b"a: 1\n");
    }

    #[test]
    fn test_has_content() {
        assert!(has_content(b"# header\nkind: Foo\n"));
        assert!(!has_content(b"\n  \n"));
        assert!(!has_content(b"# Source: eck-operator/templates/crds.yaml\n"));
    }
}
