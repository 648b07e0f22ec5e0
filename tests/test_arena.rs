use duel_snake::game::{
    Arena, Decision, DecisionSource, EpisodeSummary, GameConfig, Phase, SnakeId,
};
use duel_snake::rl::{FileStore, MemoryStore, QLearningConfig, QTableStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

/// Records every summary it is shown and restarts a fixed number of times
struct Operator {
    restarts_left: usize,
    seen: Vec<EpisodeSummary>,
}

impl DecisionSource for Operator {
    fn decide(&mut self, summary: &EpisodeSummary) -> Decision {
        self.seen.push(*summary);
        if self.restarts_left == 0 {
            Decision::Exit
        } else {
            self.restarts_left -= 1;
            Decision::Restart
        }
    }
}

fn play<S: QTableStore>(arena: &mut Arena<StdRng, S>, operator: &mut Operator) {
    let mut guard = 0;
    while !arena.is_stopped() {
        if arena.is_running() {
            arena.tick().unwrap();
            guard += 1;
            if guard % 5_000 == 0 {
                arena.end_episode().unwrap();
            }
        } else {
            arena.consult(operator);
        }
    }
}

#[test]
fn test_operator_drives_episode_lifecycle() {
    let mut arena = Arena::new(
        GameConfig::new(16, 16),
        QLearningConfig::default(),
        MemoryStore::new(),
        StdRng::seed_from_u64(8),
    );
    let mut operator = Operator {
        restarts_left: 3,
        seen: Vec::new(),
    };

    play(&mut arena, &mut operator);

    assert_eq!(arena.phase(), Phase::Stopped);
    assert_eq!(operator.seen.len(), 4);
    let episodes: Vec<_> = operator.seen.iter().map(|s| s.episode).collect();
    assert_eq!(episodes, vec![1, 2, 3, 4]);
    assert_eq!(arena.store().saves(), 4);
}

#[test]
fn test_tables_survive_process_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = GameConfig::new(12, 12);

    let mut arena = Arena::new(
        config.clone(),
        QLearningConfig::default(),
        FileStore::new(temp_dir.path()),
        StdRng::seed_from_u64(3),
    );
    let mut operator = Operator {
        restarts_left: 2,
        seen: Vec::new(),
    };
    play(&mut arena, &mut operator);

    let learned = [
        arena.agent(SnakeId::First).q_table().clone(),
        arena.agent(SnakeId::Second).q_table().clone(),
    ];
    assert!(learned[0].values().iter().any(|v| *v != 0.0));

    // A fresh process picks up where the last one stopped
    let resumed = Arena::new(
        config,
        QLearningConfig::default(),
        FileStore::new(temp_dir.path()),
        StdRng::seed_from_u64(99),
    );
    assert_eq!(resumed.agent(SnakeId::First).q_table(), &learned[0]);
    assert_eq!(resumed.agent(SnakeId::Second).q_table(), &learned[1]);
}

#[test]
fn test_mismatched_saved_tables_start_cold() {
    let temp_dir = TempDir::new().unwrap();

    let mut small = Arena::new(
        GameConfig::new(8, 8),
        QLearningConfig::default(),
        FileStore::new(temp_dir.path()),
        StdRng::seed_from_u64(1),
    );
    small.shutdown().unwrap();

    let large = Arena::new(
        GameConfig::new(10, 10),
        QLearningConfig::default(),
        FileStore::new(temp_dir.path()),
        StdRng::seed_from_u64(1),
    );
    assert!(large
        .agent(SnakeId::First)
        .q_table()
        .values()
        .iter()
        .all(|v| *v == 0.0));
    assert!(large.is_running());
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut arena = Arena::new(
            GameConfig::new(14, 14),
            QLearningConfig::default(),
            MemoryStore::new(),
            StdRng::seed_from_u64(seed),
        );
        let mut operator = Operator {
            restarts_left: 4,
            seen: Vec::new(),
        };
        play(&mut arena, &mut operator);
        (operator.seen, arena.agent(SnakeId::Second).q_table().clone())
    };

    assert_eq!(run(21), run(21));
}
