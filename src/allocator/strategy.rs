//! Placement strategies choosing which free block serves a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::block::MemoryBlock;
use crate::SimError;

/// Chooses a free block for a request of `size` bytes.
///
/// Returns the index into `blocks` (ascending address order), or `None` when
/// no free block is large enough.
pub trait PlacementStrategy: Send + Sync {
    fn select(&self, blocks: &[MemoryBlock], size: usize) -> Option<usize>;

    fn name(&self) -> &'static str;
}

fn candidates(blocks: &[MemoryBlock], size: usize) -> impl Iterator<Item = (usize, &MemoryBlock)> {
    blocks
        .iter()
        .enumerate()
        .filter(move |(_, b)| b.free && b.size >= size)
}

/// Lowest-address free block that fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn select(&self, blocks: &[MemoryBlock], size: usize) -> Option<usize> {
        candidates(blocks, size).map(|(i, _)| i).next()
    }

    fn name(&self) -> &'static str {
        "first_fit"
    }
}

/// Smallest free block that fits. Ties go to the lowest address.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementStrategy for BestFit {
    fn select(&self, blocks: &[MemoryBlock], size: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, block) in candidates(blocks, size) {
            // strict less-than keeps the earliest among equals
            if best.map_or(true, |(_, s)| block.size < s) {
                best = Some((i, block.size));
            }
        }
        best.map(|(i, _)| i)
    }

    fn name(&self) -> &'static str {
        "best_fit"
    }
}

/// Largest free block that fits. Ties go to the lowest address.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementStrategy for WorstFit {
    fn select(&self, blocks: &[MemoryBlock], size: usize) -> Option<usize> {
        let mut worst: Option<(usize, usize)> = None;
        for (i, block) in candidates(blocks, size) {
            if worst.map_or(true, |(_, s)| block.size > s) {
                worst = Some((i, block.size));
            }
        }
        worst.map(|(i, _)| i)
    }

    fn name(&self) -> &'static str {
        "worst_fit"
    }
}

/// Configured placement policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    FirstFit,
    BestFit,
    WorstFit,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::FirstFit, Strategy::BestFit, Strategy::WorstFit];

    /// The implementation backing this policy.
    pub fn placement(self) -> &'static dyn PlacementStrategy {
        match self {
            Self::FirstFit => &FirstFit,
            Self::BestFit => &BestFit,
            Self::WorstFit => &WorstFit,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.placement().name()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_fit" | "first" => Ok(Self::FirstFit),
            "best_fit" | "best" => Ok(Self::BestFit),
            "worst_fit" | "worst" => Ok(Self::WorstFit),
            other => Err(SimError::InvalidConfig(format!(
                "unknown placement strategy '{}' (expected first_fit, best_fit or worst_fit)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::BlockId;

    // free 100 @0, used 50 @100, free 300 @150, used 50 @450, free 100 @500, used 200 @600
    fn layout() -> Vec<MemoryBlock> {
        vec![
            MemoryBlock::free(0, 100),
            MemoryBlock::used(100, 50, BlockId(1)),
            MemoryBlock::free(150, 300),
            MemoryBlock::used(450, 50, BlockId(2)),
            MemoryBlock::free(500, 100),
            MemoryBlock::used(600, 200, BlockId(3)),
        ]
    }

    #[test]
    fn test_first_fit_picks_lowest_address() {
        let blocks = layout();
        assert_eq!(FirstFit.select(&blocks, 80), Some(0));
        assert_eq!(FirstFit.select(&blocks, 101), Some(2));
    }

    #[test]
    fn test_best_fit_ties_go_to_earliest() {
        let blocks = layout();
        // blocks 0 and 4 are both 100 bytes
        assert_eq!(BestFit.select(&blocks, 90), Some(0));
        assert_eq!(BestFit.select(&blocks, 150), Some(2));
    }

    #[test]
    fn test_worst_fit_picks_largest() {
        let blocks = layout();
        assert_eq!(WorstFit.select(&blocks, 10), Some(2));
    }

    #[test]
    fn test_worst_fit_ties_go_to_earliest() {
        let blocks = vec![
            MemoryBlock::free(0, 64),
            MemoryBlock::used(64, 32, BlockId(1)),
            MemoryBlock::free(96, 64),
        ];
        assert_eq!(WorstFit.select(&blocks, 8), Some(0));
    }

    #[test]
    fn test_no_candidate() {
        let blocks = layout();
        for strategy in Strategy::ALL {
            assert_eq!(strategy.placement().select(&blocks, 301), None, "{}", strategy);
        }
    }

    #[test]
    fn test_used_blocks_never_selected() {
        let blocks = vec![MemoryBlock::used(0, 1024, BlockId(9))];
        for strategy in Strategy::ALL {
            assert_eq!(strategy.placement().select(&blocks, 1), None);
        }
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("first_fit".parse::<Strategy>().unwrap(), Strategy::FirstFit);
        assert_eq!("Best-Fit".parse::<Strategy>().unwrap(), Strategy::BestFit);
        assert_eq!("worst".parse::<Strategy>().unwrap(), Strategy::WorstFit);
        assert!(matches!(
            "next_fit".parse::<Strategy>(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display_round_trips_names() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }
}
