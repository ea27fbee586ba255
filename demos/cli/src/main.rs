use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use nalgebra::{Const, SVector};
use rayon::prelude::*;

use stf::{
    SpaceTimeFunction,
    describe::{Description, Dimension},
    fd,
};

/// Evaluates space-time function descriptions
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,

    /// Input file, as a JSON description
    #[clap(short, long)]
    input: PathBuf,

    /// Dimension to build (defaults to the description's own, then 3)
    #[clap(short, long)]
    dim: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the value, time derivative, and gradient at one position
    Eval {
        /// Position, as comma-separated coordinates
        #[clap(
            short,
            long,
            value_delimiter = ',',
            allow_hyphen_values = true,
            required = true
        )]
        pos: Vec<f64>,

        /// Time at which to evaluate
        #[clap(short, long, default_value_t = 0.0)]
        time: f64,
    },

    /// Compares analytic gradients against central differences on a grid
    Check {
        /// Time at which to evaluate
        #[clap(short, long, default_value_t = 0.5)]
        time: f64,

        /// Number of samples along each axis
        #[clap(short, long, default_value_t = 8)]
        samples: usize,

        #[clap(flatten)]
        region: Region,
    },

    /// Samples the `z = 0` plane and writes values as CSV
    Slice {
        /// Number of samples along each axis
        #[clap(short, long, default_value_t = 64)]
        size: usize,

        /// Time at which to evaluate
        #[clap(short, long, default_value_t = 0.0)]
        time: f64,

        /// Name of a `.csv` file to write (defaults to stdout)
        #[clap(short, long)]
        out: Option<PathBuf>,

        #[clap(flatten)]
        region: Region,
    },
}

#[derive(Parser)]
struct Region {
    /// Half-width of the sampled region, centered on the origin
    #[clap(short, long, default_value_t = 1.0)]
    extent: f64,
}

impl Region {
    /// Position of sample `i` out of `n`, at the center of its cell
    fn coord(&self, i: usize, n: usize) -> f64 {
        ((i as f64 + 0.5) / n as f64 * 2.0 - 1.0) * self.extent
    }
}

////////////////////////////////////////////////////////////////////////////////

fn eval<const N: usize>(
    f: &dyn SpaceTimeFunction<N>,
    pos: &[f64],
    time: f64,
) -> Result<()> {
    ensure!(pos.len() == N, "expected {N} coordinates, got {}", pos.len());
    let p = SVector::<f64, N>::from_column_slice(pos);
    println!("value:           {}", f.value(&p, time)?);
    println!("time derivative: {}", f.time_derivative(&p, time)?);
    println!("gradient:        {}", f.gradient(&p, time)?);
    Ok(())
}

fn check<const N: usize>(
    f: &dyn SpaceTimeFunction<N>,
    time: f64,
    samples: usize,
    region: &Region,
) -> Result<()> {
    ensure!(samples > 0, "need at least one sample per axis");
    let count = samples.pow(N as u32);
    let start = Instant::now();
    let errors = (0..count)
        .into_par_iter()
        .map(|mut index| -> Result<_, stf::Error> {
            let mut p = SVector::<f64, N>::zeros();
            for i in 0..N {
                p[i] = region.coord(index % samples, samples);
                index /= samples;
            }
            let g = f.gradient(&p, time)?;
            let n = f.finite_difference_gradient(&p, time, fd::STEP)?;
            Ok((g.max_abs_diff(&n), p))
        })
        .collect::<Result<Vec<_>, stf::Error>>()?;
    info!("Checked {count} points in {:?}", start.elapsed());

    let (err, worst) = errors
        .into_iter()
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .context("no samples were checked")?;
    println!(
        "max gradient error: {err:e} at {:?}, t = {time}",
        worst.as_slice()
    );
    Ok(())
}

fn slice<const N: usize>(
    f: &dyn SpaceTimeFunction<N>,
    size: usize,
    time: f64,
    out: Option<PathBuf>,
    region: &Region,
) -> Result<()> {
    let start = Instant::now();
    let rows = (0..size)
        .into_par_iter()
        .map(|j| {
            (0..size)
                .map(|i| {
                    let mut p = SVector::<f64, N>::zeros();
                    p[0] = region.coord(i, size);
                    p[1] = region.coord(j, size);
                    f.value(&p, time)
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, stf::Error>>()?;
    info!("Sampled {size}x{size} slice in {:?}", start.elapsed());

    let mut w: Box<dyn Write> = match out {
        Some(path) => {
            Box::new(std::io::BufWriter::new(std::fs::File::create(path)?))
        }
        None => Box::new(std::io::stdout().lock()),
    };
    writeln!(w, "x,y,value")?;
    for (j, row) in rows.iter().enumerate() {
        for (i, v) in row.iter().enumerate() {
            let x = region.coord(i, size);
            let y = region.coord(j, size);
            writeln!(w, "{x},{y},{v}")?;
        }
    }
    w.flush()?;
    Ok(())
}

fn run<const N: usize>(desc: &Description, cmd: Command) -> Result<()>
where
    Const<N>: Dimension<N>,
{
    let start = Instant::now();
    let f = desc.build::<N>()?;
    info!("Built {N}D function in {:?}", start.elapsed());

    match cmd {
        Command::Eval { pos, time } => eval(&*f, &pos, time),
        Command::Check {
            time,
            samples,
            region,
        } => check(&*f, time, samples, &region),
        Command::Slice {
            size,
            time,
            out,
            region,
        } => slice(&*f, size, time, out, &region),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    let now = Instant::now();
    let args = Args::parse();
    let desc = Description::load(&args.input)?;
    info!("Loaded file in {:?}", now.elapsed());

    match args.dim.or(desc.dimension()).unwrap_or(3) {
        2 => run::<2>(&desc, args.cmd),
        3 => run::<3>(&desc, args.cmd),
        d => bail!("unsupported dimension {d}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;
    use std::sync::Arc;
    use stf::{implicit::Ball, space_time::Sweep, transform::Translation};

    fn moving_ball() -> Sweep<2> {
        Sweep::new(
            Arc::new(Ball::new(0.5, Vector2::zeros()).unwrap()),
            Arc::new(Translation::new(Vector2::new(0.3, 0.2))),
        )
    }

    #[test]
    fn check_grid() {
        let f = moving_ball();
        let region = Region { extent: 1.5 };
        assert!(check::<2>(&f, 0.5, 4, &region).is_ok());
        assert!(check::<2>(&f, 0.5, 0, &region).is_err());
    }

    #[test]
    fn cell_centers() {
        let region = Region { extent: 2.0 };
        assert_eq!(region.coord(0, 4), -1.5);
        assert_eq!(region.coord(3, 4), 1.5);
    }
}
