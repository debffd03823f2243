//! CoNLL-U adapter
//!
//! Ten tab-separated columns per token; we only need ID (column 1) and
//! HEAD (column 7). Multi-word token ranges (`3-4`) and empty nodes (`5.1`)
//! carry no HEAD of their own and are skipped.

use super::ParseError;
use node_distance_fast::Sentence;

const ID: usize = 0;
const HEAD: usize = 6;
const MIN_COLUMNS: usize = HEAD + 1;

pub(super) fn parse(content: &str) -> Result<Vec<Sentence>, ParseError> {
    let mut sentences = Vec::new();
    let mut edges: Vec<(u32, u32)> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            flush(&mut sentences, &mut edges);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return Err(ParseError::new(
                line_no,
                format!("expected at least {MIN_COLUMNS} tab-separated columns, found {}", columns.len()),
            ));
        }

        let id = columns[ID];
        if id.contains('-') || id.contains('.') {
            continue;
        }
        let id: u32 = id
            .parse()
            .map_err(|_| ParseError::new(line_no, format!("invalid token ID '{id}'")))?;
        let head = columns[HEAD];
        let head: u32 = head
            .parse()
            .map_err(|_| ParseError::new(line_no, format!("invalid HEAD '{head}' for token {id}")))?;

        edges.push((head, id));
    }
    flush(&mut sentences, &mut edges);

    Ok(sentences)
}

fn flush(sentences: &mut Vec<Sentence>, edges: &mut Vec<(u32, u32)>) {
    if edges.is_empty() {
        return;
    }
    let edges = std::mem::take(edges);
    sentences.push(Sentence {
        num_nodes: edges.len() + 1,
        edges,
    });
}
