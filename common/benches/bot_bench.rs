use criterion::{criterion_group, criterion_main, Criterion, SamplingMode};
use std::hint::black_box;
use std::time::Duration;
use tron_common::games::SessionRng;
use tron_common::games::tron::{
    Arena, ArenaView, BotController, BotDifficulty, Direction, EntityId, GameMode, LightCycle, Opponent,
    Point, RandomSideSpawn, RoundSettings, RoundState, Spawn, TronRound,
};

const WIDTH: i32 = 120;
const HEIGHT: i32 = 40;

/// Two long trails snaking across the arena so the flood fill has walls to hit.
fn mid_game_cycles() -> (LightCycle, LightCycle) {
    let mut me = LightCycle::new(EntityId::FIRST, Spawn::new(Point::new(10, 5), Direction::Right));
    let mut rival = LightCycle::new(EntityId::SECOND, Spawn::new(Point::new(110, 35), Direction::Left));

    for lap in 0..6 {
        let (forward, back) = if lap % 2 == 0 {
            (Direction::Right, Direction::Left)
        } else {
            (Direction::Left, Direction::Right)
        };
        for _ in 0..80 {
            me.move_forward();
            rival.move_forward();
        }
        me.set_heading(Direction::Down);
        rival.set_heading(Direction::Up);
        for _ in 0..2 {
            me.move_forward();
            rival.move_forward();
        }
        me.set_heading(back);
        rival.set_heading(forward);
    }
    (me, rival)
}

fn bench_single_decision(difficulty: BotDifficulty, me: &LightCycle, rival: &LightCycle) {
    let view = ArenaView {
        arena: Arena::new(WIDTH, HEIGHT),
        me,
        opponents: vec![Opponent {
            cycle: rival,
            alive: true,
        }],
    };
    let controller = BotController::new(difficulty.weights());
    let mut rng = SessionRng::new(1);
    black_box(controller.calculate_move(&view, &mut rng));
}

fn bench_bot_vs_bot_round() {
    let settings = RoundSettings::new(WIDTH, HEIGHT, GameMode::VsBot);
    let Ok(mut round) = TronRound::new(
        &settings,
        Box::new(RandomSideSpawn::default()),
        SessionRng::from_random(),
    ) else {
        return;
    };
    round.set_pilot(
        EntityId::FIRST,
        Some(Box::new(BotController::new(settings.bot_weights.clone()))),
    );
    while round.state() == RoundState::Playing {
        round.tick();
    }
}

fn bot_bench(c: &mut Criterion) {
    let (me, rival) = mid_game_cycles();

    let mut group = c.benchmark_group("tron_bot");
    group
        .sampling_mode(SamplingMode::Flat)
        .sample_size(20)
        .measurement_time(Duration::from_secs(30));

    for difficulty in [BotDifficulty::Easy, BotDifficulty::Medium, BotDifficulty::Hard] {
        group.bench_function(format!("decision_mid_game_{:?}", difficulty), |b| {
            b.iter(|| bench_single_decision(difficulty, &me, &rival))
        });
    }

    group.bench_function("bot_vs_bot_round", |b| b.iter(bench_bot_vs_bot_round));

    group.finish();
}

criterion_group!(benches, bot_bench);
criterion_main!(benches);
