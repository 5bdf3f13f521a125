use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use changesim::session::{
    GameCode, GameService, GameSession, SessionError, SessionStore, SessionStoreError,
    NEWS_FEED_LIMIT,
};
use changesim::simulation::{
    calculate_score, resolve_round, Decision, GameState, ScenarioCatalog, ScoreTier,
    SubmittedDecision, SubmittedDecisions,
};

#[derive(Default)]
struct MemoryStore {
    sessions: Mutex<HashMap<GameCode, GameSession>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, session: GameSession) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.code) {
            return Err(SessionStoreError::Duplicate(session.code));
        }
        guard.insert(session.code.clone(), session);
        Ok(())
    }

    fn update(&self, session: GameSession) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(session.code.clone(), session);
        Ok(())
    }

    fn fetch(&self, code: &GameCode) -> Result<Option<GameSession>, SessionStoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(code).cloned())
    }
}

fn seeded_service(seed: u64) -> GameService<MemoryStore> {
    GameService::new(
        Arc::new(MemoryStore::default()),
        ScenarioCatalog::standard(),
        Some(seed),
    )
}

/// First option on every choice, an even split on every allocation.
fn scripted_submission(decisions: &[Decision]) -> SubmittedDecisions {
    decisions
        .iter()
        .filter_map(|decision| {
            let answer = match decision {
                Decision::Choice { options, .. } => {
                    SubmittedDecision::Choice(options.first()?.id.to_string())
                }
                Decision::Allocation { config, .. } => {
                    let categories = config.categories.len();
                    let per = config.effective_budget() / categories as f64;
                    SubmittedDecision::Allocation(vec![per; categories])
                }
                Decision::Ranking { .. } => return None,
            };
            Some((decision.id().to_string(), answer))
        })
        .collect()
}

#[test]
fn a_full_game_stays_bounded_and_ends_scored() {
    let service = seeded_service(11);
    let created = service.create_game().expect("game created");
    service
        .join_game(&created.code, "Team Aurora")
        .expect("player joins");
    service
        .start_game(&created.code, &created.facilitator_key)
        .expect("game starts");

    let total_rounds = service.catalog().rounds();
    let mut final_resolution = None;
    for round in 1..=total_rounds {
        let scenario = service
            .catalog()
            .for_round(round)
            .expect("scenario for round")
            .clone();
        service
            .submit_decisions(&created.code, scripted_submission(&scenario.decisions))
            .expect("submission accepted");
        let resolved = service
            .resolve_round(&created.code, &created.facilitator_key)
            .expect("round resolves");

        let metrics = resolved.state.metrics;
        for value in [
            metrics.bp, metrics.ca, metrics.ee, metrics.tr, metrics.rs, metrics.lc, metrics.mo,
        ] {
            assert!((0.0..=100.0).contains(&value), "metric out of range: {value}");
        }
        assert!(resolved.news_feed.len() <= NEWS_FEED_LIMIT);
        final_resolution = Some(resolved);
    }

    let last = final_resolution.expect("at least one round resolved");
    assert!(last.game_ended);
    assert_eq!(last.next_round, None);

    let score = last.final_score.expect("final score present");
    assert_eq!(score, calculate_score(&last.state.metrics));
    assert!(matches!(
        score.tier,
        ScoreTier::Thriving | ScoreTier::Stabilising | ScoreTier::Struggling | ScoreTier::Failing
    ));

    let view = service.snapshot(&created.code).expect("snapshot");
    assert!(view.ended);
    assert_eq!(view.metric_history.len(), usize::from(total_rounds) + 1);
    assert!(matches!(
        service.submit_decisions(&created.code, SubmittedDecisions::new()),
        Err(SessionError::GameEnded)
    ));
}

#[test]
fn identical_seeds_produce_identical_games() {
    let play = |seed: u64| {
        let service = seeded_service(seed);
        let created = service.create_game().expect("game created");
        service
            .join_game(&created.code, "Team Aurora")
            .expect("player joins");
        service
            .start_game(&created.code, &created.facilitator_key)
            .expect("game starts");

        let mut trace = Vec::new();
        for round in 1..=service.catalog().rounds() {
            let scenario = service
                .catalog()
                .for_round(round)
                .expect("scenario for round")
                .clone();
            service
                .submit_decisions(&created.code, scripted_submission(&scenario.decisions))
                .expect("submission accepted");
            let resolved = service
                .resolve_round(&created.code, &created.facilitator_key)
                .expect("round resolves");
            trace.push((
                resolved.state.metrics,
                resolved.state.bridges_stage,
                resolved.event.map(|event| event.id),
            ));
        }
        (created.code, trace)
    };

    let (code_a, trace_a) = play(77);
    let (code_b, trace_b) = play(77);
    assert_eq!(code_a, code_b);
    assert_eq!(trace_a, trace_b);
}

#[test]
fn the_pure_resolver_is_deterministic_without_a_service() {
    let catalog = ScenarioCatalog::standard();
    let mut state = GameState::opening();

    for round in 1..=catalog.rounds() {
        let scenario = catalog.for_round(round).expect("scenario for round");
        let submission = scripted_submission(&scenario.decisions);

        let first = resolve_round(&state, scenario, &submission).expect("resolves");
        let second = resolve_round(&state, scenario, &submission).expect("resolves");
        assert_eq!(first.state.metrics, second.state.metrics);
        assert_eq!(first.summary, second.summary);

        state = first.state;
    }

    assert_eq!(state.metrics, state.metrics.clamp());
}
