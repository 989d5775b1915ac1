use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::Result;
use ising_wmc::condensed::two_d_condense_cnf;
use ising_wmc::formula::WeightedCnf;
use ising_wmc::generators::{nearest_neighbor_2d, nearest_neighbor_3d, random_graph_seeded, three_d_grid, two_d_grid};
use ising_wmc::model::IsingModel;
use ising_wmc::pan::write_pan_format;

#[derive(Parser)]
#[command(author, version, about = "Generate Ising models and their WMC encodings")]
struct Cli {
    /// Write the model in UAI08 format
    #[arg(long, value_name = "FILE")]
    uai: Option<PathBuf>,

    /// Write the weighted CNF in weighted DIMACS format
    #[arg(long, value_name = "FILE")]
    cnf: Option<PathBuf>,

    /// Write the interaction graph in DOT format
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Write the two-file Pan format with this prefix (into --pan-dir)
    #[arg(long, value_name = "PREFIX")]
    pan: Option<String>,

    /// Directory for the Pan files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pan_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Square grid with nearest-neighbour couplings
    Grid2d {
        #[arg(short = 'x', long, default_value_t = 4)]
        width: usize,
        #[arg(short = 'y', long, default_value_t = 4)]
        height: usize,
        /// Coupling strength J
        #[arg(short = 'j', long, default_value_t = 1.0, allow_hyphen_values = true)]
        coupling: f64,
        #[arg(short, long, default_value_t = 1.0)]
        beta: f64,
    },

    /// Cubic grid with nearest-neighbour couplings
    Grid3d {
        #[arg(short = 'x', long, default_value_t = 3)]
        width: usize,
        #[arg(short = 'y', long, default_value_t = 3)]
        height: usize,
        #[arg(short = 'z', long, default_value_t = 3)]
        depth: usize,
        #[arg(short = 'j', long, default_value_t = 1.0, allow_hyphen_values = true)]
        coupling: f64,
        #[arg(short, long, default_value_t = 1.0)]
        beta: f64,
    },

    /// Random graph with uniformly drawn couplings
    Random {
        #[arg(short, long, default_value_t = 50)]
        n: usize,
        /// Expected degree of each site
        #[arg(short, long, default_value_t = 3.0)]
        degree: f64,
        #[arg(short, long, default_value_t = 1.0)]
        beta: f64,
        #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
        j_min: f64,
        #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
        j_max: f64,
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },

    /// Condensed (face-parity) encoding of the n x n lattice; only --cnf applies
    Condense {
        #[arg(short, long, default_value_t = 4)]
        n: usize,
    },

    /// Read a UAI08 model and re-export it
    Convert {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn write_cnf(cnf: &WeightedCnf, path: &Path) -> Result<()> {
    cnf.write_dimacs(BufWriter::new(File::create(path)?))?;
    log::info!("Wrote {} variables and {} clauses to {:?}", cnf.num_vars(), cnf.num_clauses(), path);
    Ok(())
}

fn export(model: &IsingModel, cli: &Cli) -> Result<()> {
    log::info!(
        "Model: {} sites, {} fields, {} couplings, beta = {}, mu = {}",
        model.num_sites(),
        model.num_unary_funcs(),
        model.num_binary_funcs(),
        model.beta(),
        model.mu()
    );

    if let Some(path) = &cli.uai {
        model.to_uai08(path)?;
        log::info!("Wrote UAI08 model to {:?}", path);
    }
    if let Some(path) = &cli.cnf {
        write_cnf(&model.to_wmc()?, path)?;
    }
    if let Some(path) = &cli.dot {
        std::fs::write(path, model.to_dot()?)?;
        log::info!("Wrote DOT graph to {:?}", path);
    }
    if let Some(prefix) = &cli.pan {
        write_pan_format(model, &cli.pan_dir, prefix)?;
        log::info!("Wrote Pan files with prefix {:?} to {:?}", prefix, cli.pan_dir);
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();

    let model = match cli.command {
        Commands::Grid2d {
            width,
            height,
            coupling,
            beta,
        } => two_d_grid(width, height, nearest_neighbor_2d(coupling), beta)?,
        Commands::Grid3d {
            width,
            height,
            depth,
            coupling,
            beta,
        } => three_d_grid(width, height, depth, nearest_neighbor_3d(coupling), beta)?,
        Commands::Random {
            n,
            degree,
            beta,
            j_min,
            j_max,
            seed,
        } => random_graph_seeded(n, degree, beta, j_min, j_max, seed)?,
        Commands::Condense { n } => {
            let cnf = two_d_condense_cnf(n);
            match &cli.cnf {
                Some(path) => write_cnf(&cnf, path)?,
                None => print!("{}", cnf.to_dimacs_string()),
            }
            return Ok(());
        }
        Commands::Convert { ref input } => IsingModel::from_uai08(input)?,
    };

    export(&model, &cli)
}
