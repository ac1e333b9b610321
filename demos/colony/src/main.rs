//! colony: a week in a small settlement driven by one shared behavior tree.
//!
//! Every citizen walks the same tree (`trees/colony.json`, or the file given
//! as the first argument): sleep at home at night, work a static job or haul
//! resources by day, wander when there is nothing else to do.
//!
//! Set `BT_LAYOUT=columns` to store execution state column-wise.

mod logging;
mod world;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use bt_agent::StorageLayout;
use bt_core::{AgentId, SimConfig, SimRng, Status, Tick};
use bt_sim::{InterpreterConfig, RunnerBuilder, RunnerConfig, TickObserver, TickStats};
use bt_tree::Topology;
use tracing::info;

use world::{ColonyConfig, ColonyWorld};

// ── Constants ─────────────────────────────────────────────────────────────────

const CITIZENS:           usize = 2_000;
const SEED:               u64   = 42;
const TICK_DURATION_SECS: u32   = 600; // 1 tick = 10 minutes
const SIM_DAYS:           u64   = 7;
const TICKS_PER_DAY:      u64   = 86_400 / TICK_DURATION_SECS as u64;
const SHOWN_CITIZENS:     usize = 8;

const BUILTIN_TREE: &str = include_str!("../trees/colony.json");

// ── Observer ──────────────────────────────────────────────────────────────────

/// Counts finished passes per outcome over the whole run.
#[derive(Default)]
struct PassCounter {
    succeeded:    u64,
    failed:       u64,
    step_limited: u64,
    total:        TickStats,
}

impl TickObserver for PassCounter {
    fn on_pass_complete(&mut self, _tick: Tick, _agent: AgentId, status: Status) {
        match status {
            Status::Success => self.succeeded += 1,
            _ => self.failed += 1,
        }
    }

    fn on_step_limit(&mut self, _tick: Tick, _agent: AgentId) {
        self.step_limited += 1;
    }

    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        self.total.merge(stats);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_tree(arg: Option<&str>) -> Result<Topology> {
    match arg {
        Some(path) => bt_tree::load_tree_json(Path::new(path))
            .with_context(|| format!("loading behavior tree from {path}")),
        None => bt_tree::load_tree_str(BUILTIN_TREE).context("parsing built-in colony tree"),
    }
}

fn main() -> Result<()> {
    logging::init();

    let tree_arg = std::env::args().nth(1);
    let layout: StorageLayout = match std::env::var("BT_LAYOUT") {
        Ok(s) => s.parse()?,
        Err(_) => StorageLayout::default(),
    };

    println!("=== colony: rust_bt behavior trees ===");
    println!("Citizens: {CITIZENS}  |  Days: {SIM_DAYS}  |  Seed: {SEED}  |  Layout: {layout}");
    println!();

    // 1. Tree.
    let topology = load_tree(tree_arg.as_deref())?;
    println!(
        "Tree: {} nodes, {} leaves, depth {}, {} repeaters",
        topology.len(),
        topology.leaf_count(),
        topology.depth(),
        topology.repeater_count(),
    );

    // 2. World.
    let config = SimConfig {
        tick_duration_secs:    TICK_DURATION_SECS,
        total_ticks:           SIM_DAYS * TICKS_PER_DAY,
        seed:                  SEED,
        report_interval_ticks: TICKS_PER_DAY / 4,
    };
    config.validate()?;
    let mut rng = SimRng::new(config.seed);
    let world = ColonyWorld::new(
        ColonyConfig {
            citizens:           CITIZENS,
            dwellings:          CITIZENS / 4,
            dwelling_capacity:  4,
            workplaces:         CITIZENS / 20,
            workplace_capacity: 12,
            static_workplaces:  CITIZENS / 40,
            world_size:         500.0,
            walk_speed:         25.0,
            paths_per_tick:     CITIZENS / 4,
            tasks_per_tick:     CITIZENS / 50,
            day_start_hour:     7,
            night_start_hour:   21,
        },
        &mut rng.child(1),
    )?;

    // 3. Runner.
    let mut runner = RunnerBuilder::new(topology, world)
        .agents(CITIZENS)
        .config(RunnerConfig {
            layout,
            interpreter: InterpreterConfig::default(),
            num_threads: 0,
        })
        .build()?;
    anyhow::ensure!(
        runner.provider().citizen_count() == runner.len(),
        "world has {} citizens but the runner holds {} agents",
        runner.provider().citizen_count(),
        runner.len(),
    );

    // 4. Run.
    let mut clock = config.make_clock();
    let mut observer = PassCounter::default();
    let t0 = Instant::now();

    while clock.current_tick < config.end_tick() {
        runner.provider().set_hour(clock.hour_of_day());
        runner.provider().post_tasks();
        runner.tick_all(&mut observer);
        runner.provider_mut().service_paths(&mut rng);
        clock.advance();

        if config.report_interval_ticks > 0 && clock.current_tick.0 % config.report_interval_ticks == 0 {
            let s = runner.provider().summary();
            println!(
                "{clock}  housed {:>5}  employed {:>5}  indoors {:>5}  walking {:>5}  carrying {:>4}  backlog {:>4}  deliveries {:>6}",
                s.housed, s.employed, s.indoors, s.walking, s.carrying, s.pending_paths, s.deliveries,
            );
        }
    }
    let elapsed = t0.elapsed();
    info!(ticks = config.total_ticks, secs = elapsed.as_secs_f64(), "run complete");

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  passes succeeded : {}", observer.succeeded);
    println!("  passes failed    : {}", observer.failed);
    println!("  step-limited     : {}", observer.step_limited);
    println!("  node evaluations : {}", observer.total.steps);
    println!();

    println!("{:<8} {:<10} {:<32}", "Citizen", "Suspended", "Cursor");
    println!("{}", "-".repeat(52));
    for i in 0..SHOWN_CITIZENS.min(runner.len()) {
        let agent = AgentId(i as u32);
        let suspended = runner.is_at_suspension(agent)?;
        let cursor = runner
            .snapshot(agent)
            .and_then(|s| runner.topology().get(s.cursor))
            .map_or_else(|| "(pass complete)".to_string(), |node| node.spec().to_string());
        println!("{:<8} {:<10} {:<32}", i, if suspended { "yes" } else { "no" }, cursor);
    }

    // 6. Save the tree that was run.
    let out_dir = PathBuf::from("output/colony");
    std::fs::create_dir_all(&out_dir)?;
    let out = out_dir.join("colony.json");
    bt_tree::save_tree_json(runner.topology(), &out)?;
    println!();
    println!("Tree written to {}", out.display());

    Ok(())
}
