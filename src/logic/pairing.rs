//! Pairing pass: ordered entities -> round pairs + byes.

use crate::models::{Match, Round};

/// Result of one pairing pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pairing {
    pub pairs: Round,
    /// At most one name: the last entity of an odd-length list.
    pub byes: Vec<String>,
}

/// Pair consecutive names in input order. An odd trailing name becomes a bye.
///
/// No shuffling or seeding: the same input always yields the same pairing.
pub fn generate(entities: &[String]) -> Pairing {
    let mut chunks = entities.chunks_exact(2);
    let pairs = chunks
        .by_ref()
        .map(|pair| Match::new(pair[0].clone(), pair[1].clone()))
        .collect();
    let byes = chunks.remainder().to_vec();
    Pairing { pairs, byes }
}

/// Parse operator input such as `Red, Blue, "Green, Inc."` into entity names.
///
/// The input is read as a single CSV record; names are trimmed and empty ones dropped.
pub fn parse_team_list(input: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());
    let mut names = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => names.extend(
                record
                    .iter()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            ),
            Err(e) => log::warn!("Could not parse team list: {}", e),
        }
    }
    names
}
