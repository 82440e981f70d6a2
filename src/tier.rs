//! Target tiers: a closed set of categories, each with a fixed data record.

use crate::effects::Rgb;
use rand::Rng;

/// Category of a target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    Soft,
    Armored,
    Explosive,
    Metallic,
}

/// Blast parameters, present only for explosive tiers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlastSpec {
    /// Blast radius as a multiple of the exploding target's radius.
    pub radius_scale: f32,
    pub power_scale: f32,
}

/// Per-tier constants.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TierSpec {
    pub name: &'static str,
    /// Relative spawn weight; all weights sum to 1.
    pub weight: f32,
    pub hp_scale: f32,
    pub mass_scale: f32,
    pub damage_scale: f32,
    /// Strike strength absorbed before any damage is dealt.
    pub threshold: f32,
    pub crack_scale: f32,
    pub debris_scale: f32,
    pub radius_scale: f32,
    pub hue_min: f32,
    pub hue_max: f32,
    pub saturation: f32,
    pub blast: Option<BlastSpec>,
}

const SOFT: TierSpec = TierSpec {
    name: "Soft",
    weight: 0.43,
    hp_scale: 0.78,
    mass_scale: 0.86,
    damage_scale: 1.28,
    threshold: 10.0,
    crack_scale: 1.3,
    debris_scale: 1.1,
    radius_scale: 1.0,
    hue_min: 26.0,
    hue_max: 45.0,
    saturation: 78.0,
    blast: None,
};

const ARMORED: TierSpec = TierSpec {
    name: "Armored",
    weight: 0.27,
    hp_scale: 1.72,
    mass_scale: 1.35,
    damage_scale: 0.56,
    threshold: 21.0,
    crack_scale: 0.72,
    debris_scale: 0.7,
    radius_scale: 1.0,
    hue_min: 198.0,
    hue_max: 220.0,
    saturation: 38.0,
    blast: None,
};

const EXPLOSIVE: TierSpec = TierSpec {
    name: "Explosive",
    weight: 0.18,
    hp_scale: 0.96,
    mass_scale: 0.96,
    damage_scale: 0.96,
    threshold: 13.0,
    crack_scale: 1.0,
    debris_scale: 1.45,
    radius_scale: 1.0,
    hue_min: 6.0,
    hue_max: 20.0,
    saturation: 84.0,
    blast: Some(BlastSpec { radius_scale: 4.3, power_scale: 1.1 }),
};

const METALLIC: TierSpec = TierSpec {
    name: "Metallic",
    weight: 0.12,
    hp_scale: 2.6,
    mass_scale: 2.3,
    damage_scale: 0.44,
    threshold: 30.0,
    crack_scale: 0.52,
    debris_scale: 0.46,
    radius_scale: 1.22,
    hue_min: 205.0,
    hue_max: 222.0,
    saturation: 22.0,
    blast: None,
};

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Soft, Tier::Armored, Tier::Explosive, Tier::Metallic];

    pub fn spec(self) -> &'static TierSpec {
        match self {
            Tier::Soft => &SOFT,
            Tier::Armored => &ARMORED,
            Tier::Explosive => &EXPLOSIVE,
            Tier::Metallic => &METALLIC,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn is_explosive(self) -> bool {
        self.spec().blast.is_some()
    }

    /// Weighted random tier.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Tier {
        Self::pick_excluding(rng, &[])
    }

    /// Weighted random tier, never returning one of `excluded`. The
    /// remaining weights are renormalised. Falls back to `Soft`.
    pub fn pick_excluding<R: Rng + ?Sized>(rng: &mut R, excluded: &[Tier]) -> Tier {
        let total: f32 = Self::ALL
            .iter()
            .filter(|t| !excluded.contains(t))
            .map(|t| t.spec().weight)
            .sum();
        if total <= 0.0 {
            return Tier::Soft;
        }

        let roll = rng.gen::<f32>() * total;
        let mut cumulative = 0.0;
        for tier in Self::ALL.iter().filter(|t| !excluded.contains(t)) {
            cumulative += tier.spec().weight;
            if roll <= cumulative {
                return *tier;
            }
        }
        Tier::Soft
    }

    /// Multiplier on chain recoil when the tip strikes this tier.
    pub fn recoil_scale(self) -> f32 {
        match self {
            Tier::Metallic => 1.45,
            Tier::Armored => 1.2,
            Tier::Soft | Tier::Explosive => 1.0,
        }
    }

    /// Ring tint for a tip impact.
    pub fn impact_tint(self) -> Rgb {
        match self {
            Tier::Armored => Rgb(164, 206, 255),
            Tier::Metallic => Rgb(194, 214, 232),
            Tier::Explosive => Rgb(255, 150, 105),
            Tier::Soft => Rgb::SPARK,
        }
    }

    /// Ring tint at the strike point when the target shatters.
    pub fn shatter_tint(self) -> Rgb {
        match self {
            Tier::Explosive => Rgb(255, 145, 100),
            Tier::Metallic => Rgb(196, 218, 238),
            Tier::Soft | Tier::Armored => Rgb::SPARK,
        }
    }

    /// Ring tint at the target's centre when it shatters.
    pub fn core_tint(self) -> Rgb {
        match self {
            Tier::Armored | Tier::Metallic => Rgb(184, 215, 255),
            Tier::Soft | Tier::Explosive => Rgb::SPARK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn weights_sum_to_one() {
        let total: f32 = Tier::ALL.iter().map(|t| t.spec().weight).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn only_explosive_carries_blast() {
        for tier in Tier::ALL {
            assert_eq!(tier.spec().blast.is_some(), tier == Tier::Explosive, "{}", tier.name());
            assert_eq!(tier.is_explosive(), tier == Tier::Explosive);
        }
    }

    #[test]
    fn excluded_tiers_never_picked() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..2000 {
            let tier = Tier::pick_excluding(&mut rng, &[Tier::Explosive, Tier::Metallic]);
            assert!(tier == Tier::Soft || tier == Tier::Armored);
        }
    }

    #[test]
    fn every_tier_reachable() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..2000 {
            let tier = Tier::pick(&mut rng);
            seen[Tier::ALL.iter().position(|t| *t == tier).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
