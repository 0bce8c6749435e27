//! Instance file loading.
//!
//! Format:
//!
//! ```text
//! 3 2
//! B . .
//! A A B
//! ```
//!
//! The header gives the number of towers and their capacity. Exactly
//! `capacity` rows follow, top row first, with one token per tower: a color
//! label or `.` for an empty slot. Anything after the grid is ignored.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::InstanceError;
use crate::state::{Color, TowerState, EMPTY_SLOT};

/// Parse an instance from its text.
pub fn parse_instance(text: &str) -> Result<TowerState, InstanceError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(InstanceError::Empty)?;
    let (tower_count, size) = parse_header(header)?;

    let mut towers: Vec<Vec<Color>> = vec![Vec::new(); tower_count];
    let mut rows = 0;
    for (offset, line) in lines.take(size).enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != tower_count {
            return Err(InstanceError::ColumnCount {
                line: offset + 2,
                expected: tower_count,
                found: tokens.len(),
            });
        }
        for (tower, token) in towers.iter_mut().zip(tokens) {
            if token != EMPTY_SLOT {
                tower.push(Color::new(token));
            }
        }
        rows += 1;
    }
    if rows != size {
        return Err(InstanceError::MissingRows {
            expected: size,
            found: rows,
        });
    }

    // rows were read top to bottom
    for tower in &mut towers {
        tower.reverse();
    }

    let state = TowerState::new(size, towers)?;
    debug!(
        towers = tower_count,
        capacity = size,
        disks = state.disk_count(),
        "parsed instance"
    );
    Ok(state)
}

fn parse_header(line: &str) -> Result<(usize, usize), InstanceError> {
    let invalid = || InstanceError::InvalidHeader {
        line: line.to_string(),
    };
    let mut fields = line.split_whitespace();
    let tower_count: usize = fields
        .next()
        .and_then(|field| field.parse().ok())
        .ok_or_else(invalid)?;
    let size: usize = fields
        .next()
        .and_then(|field| field.parse().ok())
        .ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }
    if tower_count == 0 || size == 0 {
        return Err(InstanceError::ZeroDimension { tower_count, size });
    }
    Ok((tower_count, size))
}

/// Read and parse an instance file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<TowerState, InstanceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| InstanceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_instance(&text)
}
