use clap::{Parser, Subcommand, ValueEnum};
use pm_map::{BinaryMapper, ZpfBoundarySets, convex_hull};
use pm_model::{GibbsModel, HullEquilibrium, LowerHull, ModelError};
use pm_project::{CompiledProject, Project, ProjectResult};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pm-cli")]
#[command(about = "PhaseMap CLI - Binary phase diagram boundary mapping", long_about = None)]
struct Cli {
    /// Log every temperature row and equilibrium solve
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Print the convex hull assemblage along the composition axis
    Hull {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Temperature in kelvin
        #[arg(short, long)]
        temperature: f64,
    },
    /// Map two-phase boundaries over the project's T-X grid
    Map {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Log hull and equilibrium counts at the end
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Boundary records grouped by phase pair
    Json,
    /// One tie-line per row
    Csv,
}

fn main() -> ProjectResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Hull {
            project_path,
            temperature,
        } => cmd_hull(&project_path, temperature),
        Commands::Map {
            project_path,
            output,
            format,
            summary,
        } => cmd_map(&project_path, output.as_deref(), format, cli.verbose, summary),
    }
}

fn load(project_path: &Path) -> ProjectResult<(Project, CompiledProject)> {
    let project = pm_project::load(project_path)?;
    let compiled = pm_project::compile(&project)?;
    Ok((project, compiled))
}

fn cmd_validate(project_path: &Path) -> ProjectResult<()> {
    println!("Validating project: {}", project_path.display());
    let (project, compiled) = load(project_path)?;
    println!("✓ Project is valid: {}", project.name);
    println!(
        "  {} phases, {} temperatures, {} compositions of {}",
        compiled.phases.len(),
        compiled.conditions.temperatures.len(),
        compiled.conditions.composition.values.len(),
        compiled.conditions.independent_component()
    );
    Ok(())
}

fn cmd_hull(project_path: &Path, temperature: f64) -> ProjectResult<()> {
    let (_project, compiled) = load(project_path)?;
    let hyperplane = LowerHull::default();
    let state = compiled.conditions.state(temperature)?;
    let hull = convex_hull(
        &compiled.model,
        &hyperplane,
        &compiled.phases,
        &state,
        &[compiled.conditions.composition_condition()],
        &compiled.options.hull,
    )?;

    let comp = compiled.conditions.independent_component();
    let idx = component_index(&compiled.model, comp)?;
    println!("Convex hull at T = {:.2} K ({:.3} s)", temperature, hull.elapsed_s);
    for (target, point) in hull.compositions.iter().zip(&hull.points) {
        let slots: Vec<String> = point
            .slots
            .iter()
            .filter(|s| s.is_occupied())
            .map(|s| format!("{}@{:.4} ({:.3})", s.phase, s.composition[idx], s.fraction))
            .collect();
        println!("  X({}) = {:.4}: {}", comp, target[idx], slots.join(", "));
    }
    Ok(())
}

fn component_index(model: &dyn GibbsModel, component: &str) -> ProjectResult<usize> {
    let idx = model
        .components()
        .iter()
        .position(|c| c == component)
        .ok_or_else(|| ModelError::UnknownComponent {
            name: component.to_string(),
        })?;
    Ok(idx)
}

fn cmd_map(
    project_path: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    verbose: bool,
    summary: bool,
) -> ProjectResult<()> {
    let (project, mut compiled) = load(project_path)?;
    compiled.options.verbose = verbose;
    compiled.options.summary = summary;

    let hyperplane = LowerHull::default();
    let solver =
        HullEquilibrium::new(&compiled.model, &hyperplane).with_options(compiled.equilibrium);
    let mapper = BinaryMapper::new(
        &compiled.model,
        &solver,
        &hyperplane,
        &compiled.phases,
        &compiled.conditions,
        &compiled.options,
    )?;

    let (xtol, ttol) = mapper.tolerances();
    tracing::info!(
        project = %project.name,
        temperatures = mapper.conditions().temperatures.len(),
        point_density = mapper.options().hull.point_density,
        xtol,
        ttol,
        "mapping"
    );
    let mut zpf = mapper.new_boundary_sets();
    let stats = mapper.map(&mut zpf)?;

    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&zpf.export())?,
        OutputFormat::Csv => tielines_csv(&zpf),
    };
    if let Some(path) = output {
        std::fs::write(path, text)?;
        println!(
            "✓ Wrote {} boundary records ({} phase pairs, {} equilibria) to {}",
            zpf.len(),
            zpf.phase_pairs().count(),
            stats.equilibria.count(),
            path.display()
        );
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn tielines_csv(zpf: &ZpfBoundarySets) -> String {
    let comp = zpf.indep_comp();
    let mut csv = format!("phase_1,phase_2,temperature_k,x_{comp}_1,x_{comp}_2\n");
    for t in zpf.tielines() {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            t.phases[0], t.phases[1], t.temperature, t.compositions[0], t.compositions[1]
        ));
    }
    csv
}
