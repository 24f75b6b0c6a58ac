use crate::rng::GameRng;

use super::types::Point;

pub const FOOD_POINTS: u32 = 10;
pub const SPECIAL_FOOD_POINTS: u32 = 20;
pub const SPECIAL_FOOD_CHANCE: f64 = 0.1;

pub const MAX_ACTIVE_FRUITS: usize = 5;
pub const FRUIT_LIFETIME_TICKS: u32 = 300;

/// The single shared food. Exactly one exists while a session is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    pub position: Point,
    pub points: u32,
    /// Distinct colour tag for the rarer 20-point food.
    pub special: bool,
}

impl Food {
    pub fn at(position: Point, rng: &mut GameRng) -> Self {
        let special = rng.chance(SPECIAL_FOOD_CHANCE);
        Self {
            position,
            points: if special {
                SPECIAL_FOOD_POINTS
            } else {
                FOOD_POINTS
            },
            special,
        }
    }

    /// Placeholder food used between reset and the first proper placement.
    pub fn initial() -> Self {
        Self {
            position: Point::new(15, 15),
            points: FOOD_POINTS,
            special: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Spawn weight and point value per tier. Weights sum to 1.
    const TABLE: [(Rarity, f64, u32); 5] = [
        (Rarity::Common, 0.50, 5),
        (Rarity::Uncommon, 0.30, 15),
        (Rarity::Rare, 0.15, 30),
        (Rarity::Epic, 0.04, 50),
        (Rarity::Legendary, 0.01, 100),
    ];

    pub fn points(&self) -> u32 {
        Self::TABLE
            .iter()
            .find(|(rarity, _, _)| rarity == self)
            .map(|(_, _, points)| *points)
            .expect("Every rarity tier is in the table")
    }

    /// Cumulative-probability draw over the fixed table.
    pub fn draw(rng: &mut GameRng) -> Self {
        let roll: f64 = rng.random();
        let mut cumulative = 0.0;
        for (rarity, chance, _) in Self::TABLE {
            cumulative += chance;
            if roll <= cumulative {
                return rarity;
            }
        }
        Rarity::Common
    }
}

/// Transient bonus entity, versus-AI mode only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fruit {
    pub position: Point,
    pub rarity: Rarity,
    pub points: u32,
    pub remaining_lifetime: u32,
}

impl Fruit {
    pub fn at(position: Point, rarity: Rarity) -> Self {
        Self {
            position,
            rarity,
            points: rarity.points(),
            remaining_lifetime: FRUIT_LIFETIME_TICKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_point_values() {
        assert_eq!(Rarity::Common.points(), 5);
        assert_eq!(Rarity::Uncommon.points(), 15);
        assert_eq!(Rarity::Rare.points(), 30);
        assert_eq!(Rarity::Epic.points(), 50);
        assert_eq!(Rarity::Legendary.points(), 100);
    }

    #[test]
    fn test_rarity_draw_matches_weights_roughly() {
        let mut rng = GameRng::new(7);
        let mut common = 0usize;
        let mut legendary = 0usize;
        for _ in 0..10_000 {
            match Rarity::draw(&mut rng) {
                Rarity::Common => common += 1,
                Rarity::Legendary => legendary += 1,
                _ => {}
            }
        }
        assert!((4_000..6_000).contains(&common));
        assert!(legendary < 300);
    }

    #[test]
    fn test_fruit_starts_with_full_lifetime() {
        let fruit = Fruit::at(Point::new(3, 3), Rarity::Epic);
        assert_eq!(fruit.remaining_lifetime, FRUIT_LIFETIME_TICKS);
        assert_eq!(fruit.points, 50);
    }

    #[test]
    fn test_special_food_worth_double() {
        let mut rng = GameRng::new(1);
        let mut seen_special = false;
        for _ in 0..200 {
            let food = Food::at(Point::new(1, 1), &mut rng);
            if food.special {
                assert_eq!(food.points, SPECIAL_FOOD_POINTS);
                seen_special = true;
            } else {
                assert_eq!(food.points, FOOD_POINTS);
            }
        }
        assert!(seen_special);
    }
}
