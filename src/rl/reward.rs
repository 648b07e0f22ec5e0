use crate::game::{GridWorld, Position};

/// Reward for landing on the food cell
pub const FOOD_REWARD: f64 = 10.0;

/// Reward for sitting on the outer ring of the grid
pub const BOUNDARY_PENALTY: f64 = -5.0;

/// Reward for a head that has just moved to `head`.
///
/// Branches are checked in order: eating, then the boundary ring, then a
/// shaping term `1 / (manhattan + 1)` that is always in `(0, 1)` there.
pub fn reward(head: Position, food: Position, world: &GridWorld) -> f64 {
    if head == food {
        FOOD_REWARD
    } else if world.on_boundary(head) {
        BOUNDARY_PENALTY
    } else {
        1.0 / (head.manhattan_distance(food) as f64 + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_reward() {
        let world = GridWorld::new(80, 80);
        assert_eq!(reward(Position::new(5, 5), Position::new(5, 5), &world), 10.0);
    }

    #[test]
    fn test_food_on_boundary_still_rewards() {
        let world = GridWorld::new(80, 80);
        let corner = Position::new(0, 0);
        assert_eq!(reward(corner, corner, &world), FOOD_REWARD);
    }

    #[test]
    fn test_boundary_penalty_ignores_distance() {
        let world = GridWorld::new(80, 80);
        assert_eq!(reward(Position::new(0, 10), Position::new(1, 10), &world), -5.0);
        assert_eq!(reward(Position::new(0, 10), Position::new(70, 70), &world), -5.0);
        assert_eq!(reward(Position::new(79, 40), Position::new(40, 40), &world), -5.0);
        assert_eq!(reward(Position::new(40, 79), Position::new(40, 40), &world), -5.0);
    }

    #[test]
    fn test_shaping_reward() {
        let world = GridWorld::new(80, 80);
        assert_eq!(
            reward(Position::new(10, 10), Position::new(13, 14), &world),
            1.0 / 8.0
        );
        assert_eq!(
            reward(Position::new(10, 10), Position::new(11, 10), &world),
            0.5
        );
    }

    #[test]
    fn test_shaping_decays_with_distance() {
        let world = GridWorld::new(80, 80);
        let food = Position::new(40, 40);
        let near = reward(Position::new(38, 40), food, &world);
        let far = reward(Position::new(20, 40), food, &world);
        assert!(near > far);
        assert!(far > 0.0);
    }
}
