use duel_snake::game::{Action, Direction, GameConfig, GridWorld, Position, SnakeId};
use duel_snake::rl::{reward, FileStore, QTable, QTableStore, SnakeAgent, State};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

fn agent(world: GridWorld, x: i32, y: i32, direction: Direction) -> SnakeAgent {
    SnakeAgent::new(
        SnakeId::First,
        world,
        Position::new(x, y),
        direction,
        QTable::new(world),
    )
}

fn random_state<R: Rng>(world: GridWorld, rng: &mut R) -> State {
    State::new(world.random_cell(rng), Direction::random(rng))
}

#[test]
fn test_left_then_right_restores_heading() {
    let world = GridWorld::new(10, 10);
    for direction in Direction::ALL {
        let mut snake = agent(world, 5, 5, direction);
        snake.apply_action(Action::TurnLeft);
        snake.apply_action(Action::TurnRight);
        assert_eq!(snake.direction(), direction);
    }
}

#[test]
fn test_update_matches_formula() {
    let world = GridWorld::new(6, 5);
    let mut rng = StdRng::seed_from_u64(17);
    let mut snake = agent(world, 2, 2, Direction::Right);

    for _ in 0..500 {
        let state = random_state(world, &mut rng);
        let next = random_state(world, &mut rng);
        let action = Action::ALL[rng.gen_range(0..Action::COUNT)];
        let r: f64 = rng.gen_range(-5.0..10.0);
        let (alpha, gamma) = (0.1, 0.9);

        let old = snake.q_table().get(state, action);
        let next_max = snake
            .q_table()
            .action_values(next)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let expected = (1.0 - alpha) * old + alpha * (r + gamma * next_max);

        snake.update_q_table(state, action, r, next, alpha, gamma);
        assert_eq!(snake.q_table().get(state, action), expected);
    }
}

#[test]
fn test_move_fails_exactly_when_leaving_grid() {
    let world = GridWorld::new(7, 5);
    for x in 0..7 {
        for y in 0..5 {
            for direction in Direction::ALL {
                let mut snake = agent(world, x, y, direction);
                let target = Position::new(x, y).moved_in_direction(direction);
                let moved = snake.advance();
                assert_eq!(moved, world.in_bounds(target));
                if !moved {
                    assert_eq!(snake.head(), Position::new(x, y));
                    assert_eq!(snake.length(), 1);
                }
            }
        }
    }
}

#[test]
fn test_length_bounded_by_score() {
    let world = GridWorld::new(15, 15);
    let mut rng = StdRng::seed_from_u64(23);
    let mut snake = agent(world, 7, 7, Direction::Up);

    for _ in 0..2000 {
        if rng.gen_bool(0.1) {
            snake.grow();
        }
        snake.apply_action(Action::ALL[rng.gen_range(0..Action::COUNT)]);
        snake.advance();
        assert!(snake.length() <= snake.score() as usize + 1);
    }
}

#[test]
fn test_straight_run_hits_right_wall_on_sixtieth_step() {
    let config = GameConfig::default();
    let world = config.world();
    let mut snake = agent(world, 20, 40, Direction::Right);

    for step in 1..=80 {
        let before: Vec<_> = snake.body().copied().collect();
        let moved = snake.advance();
        if step < 60 {
            assert!(moved, "step {} should stay in bounds", step);
        } else {
            assert!(!moved, "step {} should hit the wall", step);
            assert_eq!(snake.body().copied().collect::<Vec<_>>(), before);
            assert_eq!(snake.head(), Position::new(79, 40));
            break;
        }
    }
}

#[test]
fn test_reward_scenarios() {
    let world = GridWorld::new(80, 80);

    assert_eq!(reward(Position::new(5, 5), Position::new(5, 5), &world), 10.0);
    assert_eq!(reward(Position::new(0, 10), Position::new(30, 30), &world), -5.0);
    assert_eq!(
        reward(Position::new(10, 10), Position::new(13, 14), &world),
        1.0 / 8.0
    );

    // Eating on the boundary ring still counts as eating
    let edge = Position::new(79, 0);
    assert_eq!(reward(edge, edge, &world), 10.0);
}

#[test]
fn test_eating_grows_on_following_move() {
    let world = GridWorld::new(20, 20);
    let mut snake = agent(world, 4, 5, Direction::Right);
    let food = Position::new(5, 5);

    assert!(snake.advance());
    assert_eq!(snake.head(), food);
    snake.grow();
    assert_eq!(snake.score(), 1);
    assert_eq!(snake.length(), 1);

    assert!(snake.advance());
    assert_eq!(snake.length(), 2);
}

#[test]
fn test_saved_tables_reload_identically() {
    let temp_dir = TempDir::new().unwrap();
    let world = GridWorld::new(8, 6);
    let mut rng = StdRng::seed_from_u64(31);

    let mut first = agent(world, 3, 3, Direction::Down);
    let mut second = agent(world, 5, 3, Direction::Up);
    for _ in 0..1000 {
        let (s, n) = (random_state(world, &mut rng), random_state(world, &mut rng));
        let a = Action::ALL[rng.gen_range(0..Action::COUNT)];
        first.update_q_table(s, a, rng.gen_range(-5.0..10.0), n, 0.1, 0.9);
        second.update_q_table(n, a, 1.0 / rng.gen_range(1.0..50.0), s, 0.1, 0.9);
    }

    let mut store = FileStore::new(temp_dir.path());
    store.save([first.q_table(), second.q_table()]).unwrap();
    let [loaded_first, loaded_second] = store.load(world);
    let (loaded_first, loaded_second) = (loaded_first.unwrap(), loaded_second.unwrap());

    for x in 0..8 {
        for y in 0..6 {
            for direction in Direction::ALL {
                let state = State::new(Position::new(x, y), direction);
                for action in Action::ALL {
                    assert_eq!(
                        loaded_first.get(state, action).to_bits(),
                        first.q_table().get(state, action).to_bits()
                    );
                    assert_eq!(
                        loaded_second.get(state, action).to_bits(),
                        second.q_table().get(state, action).to_bits()
                    );
                }
            }
        }
    }
}
