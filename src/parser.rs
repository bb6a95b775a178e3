use crate::error::TourError;
use crate::ir::{NodeId, Tour};

pub const DELIMITER: char = ',';

/// Parses a comma-separated tour such as `1,2,3,4`.
///
/// Whitespace around each entry is ignored. Blank input is a validation
/// error; any entry that is not an integer (including an empty one between
/// two commas) is a parse error.
pub fn parse_tour(input: &str) -> Result<Tour, TourError> {
    if input.trim().is_empty() {
        return Err(TourError::empty_tour(input));
    }

    let stops = input
        .split(DELIMITER)
        .enumerate()
        .map(|(idx, raw)| parse_stop(raw, idx + 1))
        .collect::<Result<Vec<NodeId>, TourError>>()?;

    tracing::info!(stops = stops.len(), "parsed tour: {:?}", stops);
    Tour::new(stops).map_err(|_| TourError::empty_tour(input))
}

fn parse_stop(raw: &str, position: usize) -> Result<NodeId, TourError> {
    let token = raw.trim();
    token.parse::<NodeId>().map_err(|source| TourError::Parse {
        token: token.to_string(),
        position,
        source,
    })
}
