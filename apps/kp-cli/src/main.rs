use clap::{Parser, Subcommand};
use kp_core::{Control, State, control_from_slice, state_from_slice};
use kp_plan::{CageProblem, Edge, EdgeOutcome, Interpolator, PlanError, PlanResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "kp-cli")]
#[command(about = "Kinoplan CLI - edge feasibility and cost checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default problem configuration, or write it to a file
    Config {
        /// Output YAML file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a problem configuration file
    Validate {
        /// Path to the problem YAML file
        config_path: PathBuf,
    },
    /// Check and price a single edge
    Evaluate {
        /// Path to the problem YAML file (defaults to the built-in problem)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Start state, 10 comma-separated values (defaults to the problem's start)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        state: Option<Vec<f64>>,
        /// Control: duration, thrust_x, thrust_y, alpha
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        control: Vec<f64>,
        /// Also report the simulator's sub-step states
        #[arg(long)]
        via_points: bool,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Evaluate random controls from the start state in parallel
    Sample {
        /// Path to the problem YAML file (defaults to the built-in problem)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of controls to sample
        #[arg(short = 'n', long, default_value_t = 32)]
        count: usize,
        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct EdgeReport {
    control: Vec<f64>,
    verdict: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    via_points: Vec<Vec<f64>>,
}

impl EdgeReport {
    fn new(control: &Control, outcome: &EdgeOutcome) -> Self {
        let (verdict, end, error) = match outcome {
            EdgeOutcome::Infeasible => ("infeasible", None, None),
            EdgeOutcome::Feasible { end, .. } => ("feasible", Some(end.as_slice().to_vec()), None),
            EdgeOutcome::Unevaluable(err) => ("unevaluable", None, Some(err.to_string())),
        };
        Self {
            control: control.as_slice().to_vec(),
            verdict,
            cost: outcome.cost(),
            end,
            error,
            via_points: Vec::new(),
        }
    }
}

fn main() -> PlanResult<()> {
    // Initialize tracing (honours RUST_LOG)
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { output } => cmd_config(output.as_deref()),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Evaluate {
            config,
            state,
            control,
            via_points,
            json,
        } => cmd_evaluate(config.as_deref(), state.as_deref(), &control, via_points, json),
        Commands::Sample {
            config,
            count,
            seed,
            json,
        } => cmd_sample(config.as_deref(), count, seed, json),
    }
}

fn load_problem(config: Option<&Path>) -> PlanResult<CageProblem> {
    match config {
        Some(path) => {
            info!(path = %path.display(), "loading problem");
            kp_plan::load_yaml(path)
        }
        None => Ok(CageProblem::default()),
    }
}

fn cmd_config(output: Option<&Path>) -> PlanResult<()> {
    let problem = CageProblem::default();
    match output {
        Some(path) => {
            kp_plan::save_yaml(path, &problem)?;
            println!("✓ Wrote default problem to {}", path.display());
        }
        None => print!("{}", problem.to_yaml_string()?),
    }
    Ok(())
}

fn cmd_validate(config_path: &Path) -> PlanResult<()> {
    println!("Validating problem: {}", config_path.display());
    let problem = kp_plan::load_yaml(config_path)?;
    let start = problem.start()?;
    let mut space = problem.control_space()?;
    if !space.state_feasible(&start)? {
        return Err(PlanError::config("start state is infeasible"));
    }
    println!("✓ Problem is valid");
    Ok(())
}

fn cmd_evaluate(
    config: Option<&Path>,
    state: Option<&[f64]>,
    control: &[f64],
    via_points: bool,
    json: bool,
) -> PlanResult<()> {
    let problem = load_problem(config)?;
    let x: State = match state {
        Some(values) => state_from_slice(values).map_err(|e| PlanError::config(e.to_string()))?,
        None => problem.start()?,
    };
    let u = control_from_slice(control).map_err(|e| PlanError::config(e.to_string()))?;

    let mut evaluator = problem.evaluator()?;
    let outcome = evaluator.evaluate(&Edge::new(x, u));
    let mut report = EdgeReport::new(&u, &outcome);

    if via_points && outcome.is_feasible() {
        let mut points = Vec::new();
        let mut interp = evaluator.space_mut().interpolator(&x, &u);
        interp.end_with_via_points(&mut points)?;
        info!(count = points.len(), length = interp.length(), "recorded via points");
        report.via_points = points.iter().map(|p| p.as_slice().to_vec()).collect();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Edge from {:?}", x.as_slice());
    println!("  control: {:?}", report.control);
    match &outcome {
        EdgeOutcome::Feasible { end, cost } => {
            println!("✓ Feasible");
            println!("  end:      {:?}", end.as_slice());
            println!("  progress: {:.6}", cost.progress);
            println!("  time:     {:.6}", cost.time);
            if let Some(energy) = cost.energy {
                println!("  energy:   {:.6}", energy);
            }
            println!("  total:    {:.6}", cost.total());
        }
        EdgeOutcome::Infeasible => println!("✗ Infeasible"),
        EdgeOutcome::Unevaluable(err) => println!("✗ Could not propagate: {err}"),
    }
    if !report.via_points.is_empty() {
        println!("  via points: {}", report.via_points.len());
    }
    Ok(())
}

fn cmd_sample(config: Option<&Path>, count: usize, seed: u64, json: bool) -> PlanResult<()> {
    let problem = load_problem(config)?;
    let start = problem.start()?;
    let template = problem.evaluator()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let edges: Vec<Edge> = (0..count)
        .map(|_| Edge::new(start, template.space().sample_control(&mut rng)))
        .collect();

    info!(count, seed, "evaluating sampled edges");
    let outcomes = kp_plan::evaluate_edges(&template, &edges);
    let reports: Vec<EdgeReport> = edges
        .iter()
        .zip(&outcomes)
        .map(|(edge, outcome)| EdgeReport::new(&edge.control, outcome))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let feasible = outcomes.iter().filter(|o| o.is_feasible()).count();
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, EdgeOutcome::Unevaluable(_)))
        .count();
    println!("Sampled {count} edges from the start state (seed {seed})");
    println!("  feasible:    {feasible}");
    println!("  infeasible:  {}", count - feasible - failed);
    println!("  unevaluable: {failed}");

    let goal = problem.goal_set()?;
    let best = outcomes
        .iter()
        .zip(&edges)
        .filter_map(|(o, e)| match o {
            EdgeOutcome::Feasible { end, cost } => Some((cost.total(), e, end)),
            _ => None,
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));
    if let Some((cost, edge, end)) = best {
        println!("  cheapest:    {:.6} via {:?}", cost, edge.control.as_slice());
        println!("  reaches goal: {}", goal.contains(end));
    }
    Ok(())
}
