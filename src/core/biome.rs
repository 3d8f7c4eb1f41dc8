use crate::core::block::BlockType;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Biome {
    SnowyTaiga,
    SnowyPlains,
    #[default]
    Plains,
    Forest,
    Swamp,
    Desert,
    Savanna,
    Jungle,
}

/// One row of the classification table. Rows are scanned in order; the first
/// row whose bounds contain the sample wins.
struct BiomeRule {
    max_temperature: f32,
    max_humidity: f32,
    biome: Biome,
}

const BIOME_TABLE: &[BiomeRule] = &[
    BiomeRule {
        max_temperature: 0.3,
        max_humidity: 0.5,
        biome: Biome::SnowyPlains,
    },
    BiomeRule {
        max_temperature: 0.3,
        max_humidity: f32::INFINITY,
        biome: Biome::SnowyTaiga,
    },
    BiomeRule {
        max_temperature: 0.6,
        max_humidity: 0.3,
        biome: Biome::Plains,
    },
    BiomeRule {
        max_temperature: 0.6,
        max_humidity: 0.6,
        biome: Biome::Forest,
    },
    BiomeRule {
        max_temperature: 0.6,
        max_humidity: f32::INFINITY,
        biome: Biome::Swamp,
    },
    BiomeRule {
        max_temperature: f32::INFINITY,
        max_humidity: 0.3,
        biome: Biome::Desert,
    },
    BiomeRule {
        max_temperature: f32::INFINITY,
        max_humidity: 0.6,
        biome: Biome::Savanna,
    },
    BiomeRule {
        max_temperature: f32::INFINITY,
        max_humidity: f32::INFINITY,
        biome: Biome::Jungle,
    },
];

impl Biome {
    /// Buckets normalized temperature/humidity samples (both in [0,1]) via
    /// the lookup table. Falls back to Plains, though the table's infinity
    /// rows make that unreachable with finite samples.
    pub fn classify(temperature: f32, humidity: f32) -> Biome {
        BIOME_TABLE
            .iter()
            .find(|rule| temperature < rule.max_temperature && humidity < rule.max_humidity)
            .map(|rule| rule.biome)
            .unwrap_or_default()
    }

    pub fn surface_block(&self) -> BlockType {
        match self {
            Biome::Desert => BlockType::Sand,
            Biome::SnowyPlains | Biome::SnowyTaiga => BlockType::Snow,
            _ => BlockType::Grass,
        }
    }

    /// Blocks in the 4 layers directly under the surface.
    pub fn subsurface_block(&self) -> BlockType {
        match self {
            Biome::Desert => BlockType::Sand,
            _ => BlockType::Dirt,
        }
    }

    /// Per-column tree probability; zero means the biome grows no trees.
    pub fn tree_threshold(&self) -> f32 {
        match self {
            Biome::Forest | Biome::SnowyTaiga | Biome::Jungle => 0.02,
            Biome::Plains | Biome::Savanna => 0.005,
            _ => 0.0,
        }
    }

    pub fn log_block(&self) -> BlockType {
        match self {
            Biome::SnowyTaiga => BlockType::SpruceLog,
            _ => BlockType::OakLog,
        }
    }

    pub fn leaves_block(&self) -> BlockType {
        match self {
            Biome::SnowyTaiga => BlockType::SpruceLeaves,
            _ => BlockType::OakLeaves,
        }
    }

    pub fn has_flowers(&self) -> bool {
        !matches!(self, Biome::Desert | Biome::SnowyPlains)
    }

    pub fn has_tall_grass(&self) -> bool {
        !matches!(self, Biome::Desert)
    }

    pub fn has_cacti(&self) -> bool {
        matches!(self, Biome::Desert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_matches_threshold_buckets() {
        assert_eq!(Biome::classify(0.1, 0.2), Biome::SnowyPlains);
        assert_eq!(Biome::classify(0.1, 0.8), Biome::SnowyTaiga);
        assert_eq!(Biome::classify(0.4, 0.1), Biome::Plains);
        assert_eq!(Biome::classify(0.4, 0.5), Biome::Forest);
        assert_eq!(Biome::classify(0.4, 0.9), Biome::Swamp);
        assert_eq!(Biome::classify(0.9, 0.1), Biome::Desert);
        assert_eq!(Biome::classify(0.9, 0.5), Biome::Savanna);
        assert_eq!(Biome::classify(0.9, 0.9), Biome::Jungle);
    }

    #[test]
    fn test_classify_is_total_over_sample_range() {
        let mut step = 0;
        while step <= 20 {
            let t = step as f32 / 20.0;
            let mut hstep = 0;
            while hstep <= 20 {
                let h = hstep as f32 / 20.0;
                // Must not panic; every sample lands in some bucket.
                let _ = Biome::classify(t, h);
                hstep += 1;
            }
            step += 1;
        }
    }

    #[test]
    fn test_boundary_values_fall_into_next_bucket() {
        // Exactly 0.3 fails `< 0.3` and lands in the temperate rows.
        assert_eq!(Biome::classify(0.3, 0.1), Biome::Plains);
        assert_eq!(Biome::classify(0.6, 0.1), Biome::Desert);
    }

    #[test]
    fn test_snowy_taiga_grows_spruce() {
        assert_eq!(Biome::SnowyTaiga.log_block(), BlockType::SpruceLog);
        assert_eq!(Biome::SnowyTaiga.leaves_block(), BlockType::SpruceLeaves);
        assert_eq!(Biome::Forest.log_block(), BlockType::OakLog);
    }

    #[test]
    fn test_desert_features() {
        assert!(Biome::Desert.has_cacti());
        assert!(!Biome::Desert.has_flowers());
        assert!(!Biome::Desert.has_tall_grass());
        assert_eq!(Biome::Desert.tree_threshold(), 0.0);
    }
}
