//! JSON Lines adapter: one serialized `Sentence` per line

use super::ParseError;
use node_distance_fast::Sentence;

pub(super) fn parse(content: &str) -> Result<Vec<Sentence>, ParseError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<Sentence>(line).map_err(|e| ParseError::new(idx + 1, e.to_string()))
        })
        .collect()
}
