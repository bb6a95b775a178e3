//! Synthetic city datasets: one `<id> <x> <y>` line per city.
//!
//! The files feed route-finding tools; the renderer never reads them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_FILE_NAME: &str = "large_cities.txt";
pub const DEFAULT_NUM_CITIES: usize = 2000;
pub const COORD_MIN: i64 = 0;
pub const COORD_MAX: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    /// 1-based line number.
    pub id: usize,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone)]
pub struct DatasetSpec {
    pub num_cities: usize,
    pub min: i64,
    pub max: i64,
    pub seed: Option<u64>,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            num_cities: DEFAULT_NUM_CITIES,
            min: COORD_MIN,
            max: COORD_MAX,
            seed: None,
        }
    }
}

impl DatasetSpec {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("coordinate range is empty: {min}..={max}")]
    EmptyRange { min: i64, max: i64 },
    #[error("line {line:?}: expected 3 fields, found {found}")]
    FieldCount { line: String, found: usize },
    #[error("line {line:?}: field {field:?} is not an integer")]
    BadField { line: String, field: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Draws `x` and `y` independently and uniformly from `[min, max]`.
pub fn generate_cities<R: Rng>(rng: &mut R, spec: &DatasetSpec) -> Result<Vec<City>, DatasetError> {
    if spec.min > spec.max {
        return Err(DatasetError::EmptyRange {
            min: spec.min,
            max: spec.max,
        });
    }
    Ok((1..=spec.num_cities)
        .map(|id| City {
            id,
            x: rng.gen_range(spec.min..=spec.max),
            y: rng.gen_range(spec.min..=spec.max),
        })
        .collect())
}

pub fn write_cities<W: Write>(mut out: W, cities: &[City]) -> std::io::Result<()> {
    for city in cities {
        writeln!(out, "{} {} {}", city.id, city.x, city.y)?;
    }
    out.flush()
}

/// Generates a dataset and writes it to `path`, returning the city count.
pub fn write_dataset(path: &Path, spec: &DatasetSpec) -> Result<usize, DatasetError> {
    let cities = generate_cities(&mut spec.rng(), spec)?;
    let file = File::create(path)?;
    write_cities(BufWriter::new(file), &cities)?;
    tracing::info!(path = %path.display(), cities = cities.len(), "wrote city dataset");
    Ok(cities.len())
}

pub fn parse_city_line(line: &str) -> Result<City, DatasetError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(DatasetError::FieldCount {
            line: line.to_string(),
            found: fields.len(),
        });
    }
    let bad = |field: &str| DatasetError::BadField {
        line: line.to_string(),
        field: field.to_string(),
    };
    Ok(City {
        id: fields[0].parse().map_err(|_| bad(fields[0]))?,
        x: fields[1].parse().map_err(|_| bad(fields[1]))?,
        y: fields[2].parse().map_err(|_| bad(fields[2]))?,
    })
}
