use std::sync::Arc;

use clap::Args;

use changesim::error::AppError;
use changesim::session::GameService;
use changesim::simulation::{
    Decision, MetricKind, ScenarioCatalog, SubmittedDecision, SubmittedDecisions,
};

use crate::infra::InMemorySessionStore;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Engine seed for the demo playthrough (fixed default keeps runs comparable)
    #[arg(long, default_value_t = 2024)]
    pub(crate) seed: u64,
    /// Show the full news feed after every round instead of only new items
    #[arg(long)]
    pub(crate) full_feed: bool,
}

/// Play a complete game against a seeded service: first option on every
/// choice, an even split on every allocation.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemorySessionStore::default());
    let service = GameService::new(store, ScenarioCatalog::standard(), Some(args.seed));

    let created = service.create_game()?;
    service.join_game(&created.code, "Demo Facilitator Team")?;
    service.start_game(&created.code, &created.facilitator_key)?;

    println!("Change leadership simulation demo (seed {})", args.seed);
    println!("Game code: {}", created.code);

    let mut seen_news = 0usize;
    for round in 1..=service.catalog().rounds() {
        let scenario = service
            .catalog()
            .for_round(round)
            .expect("catalog covers every round")
            .clone();

        println!("\n== Round {}: {} ==", round, scenario.title);
        println!("{}", scenario.narrative);

        service.submit_decisions(&created.code, scripted_submission(&scenario.decisions))?;
        let resolved = service.resolve_round(&created.code, &created.facilitator_key)?;

        println!("{}", resolved.summary);
        for outcome in &resolved.outcomes {
            println!("  - {}", outcome);
        }
        if let Some(event) = &resolved.event {
            println!("  ! {}: {}", event.title, event.description);
        }

        let feed = &resolved.news_feed;
        let fresh = if args.full_feed {
            &feed[..]
        } else {
            &feed[seen_news.min(feed.len())..]
        };
        if !fresh.is_empty() {
            println!("  News:");
            for item in fresh {
                println!("    [{}] {}", item.category.label(), item.text);
            }
        }
        seen_news = feed.len();

        println!("  Metrics:");
        for kind in MetricKind::ordered() {
            println!(
                "    {:<22} {:>5.1}",
                kind.label(),
                resolved.state.metrics.get(kind)
            );
        }

        if let Some(score) = resolved.final_score {
            println!(
                "\nFinal score: {} ({})",
                score.score,
                score.tier.label()
            );
        }
    }

    Ok(())
}

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
