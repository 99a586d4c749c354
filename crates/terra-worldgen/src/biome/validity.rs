//! Validity predicate for a biome layout.
//!
//! Kept free of generation state: the retry drivers hand it counts and act on
//! the verdict.

use std::collections::VecDeque;

use super::BiomeId;
use crate::settings::RegionRule;

/// Number of territories (or connected regions) per biome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionCounts {
    counts: [u32; BiomeId::COUNT],
}

impl RegionCounts {
    /// Count for `id`.
    pub fn get(&self, id: BiomeId) -> u32 {
        self.counts[id.index()]
    }

    /// Add one region of `id`.
    pub fn increment(&mut self, id: BiomeId) {
        self.counts[id.index()] += 1;
    }
}

/// Check `counts` against every rule.
///
/// # Errors
///
/// Returns a description of the first violated rule.
pub fn check(rules: &[RegionRule], counts: &RegionCounts) -> Result<(), String> {
    for rule in rules {
        let n = counts.get(rule.biome);
        if n < rule.min {
            return Err(format!(
                "{} has {n} region(s), needs at least {}",
                rule.biome, rule.min
            ));
        }
        if let Some(max) = rule.max
            && n > max
        {
            return Err(format!(
                "{} has {n} region(s), allows at most {max}",
                rule.biome
            ));
        }
    }
    Ok(())
}

/// Count 4-connected regions per biome in a row-major `width * height` grid.
pub fn count_regions(grid: &[BiomeId], width: usize, height: usize) -> RegionCounts {
    let mut counts = RegionCounts::default();
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();

    for start in 0..grid.len().min(width * height) {
        if visited[start] {
            continue;
        }
        let biome = grid[start];
        counts.increment(biome);
        visited[start] = true;
        queue.push_back(start);

        while let Some(i) = queue.pop_front() {
            let (col, row) = (i % width, i / width);
            let neighbours = [
                (col > 0).then(|| i - 1),
                (col + 1 < width).then(|| i + 1),
                (row > 0).then(|| i - width),
                (row + 1 < height).then(|| i + width),
            ];
            for n in neighbours.into_iter().flatten() {
                if !visited[n] && grid[n] == biome {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ValidationSettings;

    use crate::biome::BiomeId::{Desert as D, Jungle as J, Plains as P, Snow as S};

    #[test]
    fn test_default_rules() {
        let rules = ValidationSettings::default().rules;
        let mut counts = RegionCounts::default();
        assert!(check(&rules, &counts).is_err());

        counts.increment(S);
        counts.increment(D);
        counts.increment(J);
        assert_eq!(check(&rules, &counts), Ok(()));

        counts.increment(S);
        assert_eq!(check(&rules, &counts), Ok(()));

        counts.increment(S);
        let err = check(&rules, &counts).unwrap_err();
        assert!(err.contains("snow"), "unexpected reason: {err}");
    }

    #[test]
    fn test_count_regions_separates_disconnected_areas() {
        #[rustfmt::skip]
        let grid = [
            S, P, S,
            P, P, P,
            D, P, J,
        ];
        let counts = count_regions(&grid, 3, 3);
        assert_eq!(counts.get(S), 2);
        assert_eq!(counts.get(P), 1);
        assert_eq!(counts.get(D), 1);
        assert_eq!(counts.get(J), 1);
    }

    #[test]
    fn test_diagonals_are_not_connected() {
        #[rustfmt::skip]
        let grid = [
            S, P,
            P, S,
        ];
        let counts = count_regions(&grid, 2, 2);
        assert_eq!(counts.get(S), 2);
        assert_eq!(counts.get(P), 2);
    }

    #[test]
    fn test_row_wrap_is_not_adjacency() {
        #[rustfmt::skip]
        let grid = [
            P, P, S,
            S, P, P,
        ];
        let counts = count_regions(&grid, 3, 2);
        assert_eq!(counts.get(S), 2, "End of one row must not touch the start of the next");
        assert_eq!(counts.get(P), 1);
    }
}
