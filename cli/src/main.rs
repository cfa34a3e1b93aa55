//! exportgrid CLI - layout-to-grid conversion tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use exportgrid::{ExportGrid, GridResult, JsonFormat, Layout, MatrixOptions, Phase, Progress};

#[derive(Parser)]
#[command(name = "exportgrid")]
#[command(version)]
#[command(about = "Convert positioned report layouts into export grids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the grid and write it as JSON
    Build {
        /// Input layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Print cell ownership as plain text
    Dump {
        /// Input layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Show layout and grid statistics
    Info {
        /// Input layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Write the deduplicated pictures to a directory
    Pictures {
        /// Input layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Show version information
    Version,
}

/// Grid building options shared by every command.
#[derive(Args)]
struct GridArgs {
    /// Merge tolerance in points
    #[arg(long, value_name = "POINTS", conflicts_with_all = ["precise", "editable"])]
    tolerance: Option<f32>,

    /// Pixel-exact tolerance (0.5)
    #[arg(long, conflicts_with = "editable")]
    precise: bool,

    /// Coarse, editable tolerance (8.0)
    #[arg(long)]
    editable: bool,

    /// Zoom factor applied to all geometry
    #[arg(long, default_value = "1.0")]
    zoom: f32,

    /// Maximum column width
    #[arg(long, value_name = "POINTS")]
    max_cell_width: Option<f32>,

    /// Maximum row height
    #[arg(long, value_name = "POINTS")]
    max_cell_height: Option<f32>,

    /// Remove borders drawn twice across a shared edge
    #[arg(long)]
    optimize_borders: bool,

    /// Add a full-bleed background object
    #[arg(long)]
    fill_area: bool,

    /// Crop the background object to the content bounds
    #[arg(long, requires = "fill_area")]
    crop: bool,

    /// Place rotated text as pictures
    #[arg(long)]
    rotated_as_image: bool,

    /// Hash pictures on a single thread
    #[arg(long)]
    sequential: bool,
}

impl GridArgs {
    fn to_options(&self) -> MatrixOptions {
        let mut options = if self.editable {
            MatrixOptions::editable()
        } else {
            MatrixOptions::precise()
        };
        if let Some(tolerance) = self.tolerance {
            options = options.with_tolerance(tolerance);
        }
        if let Some(width) = self.max_cell_width {
            options = options.with_max_cell_width(width);
        }
        if let Some(height) = self.max_cell_height {
            options = options.with_max_cell_height(height);
        }
        options
            .with_fill_area(self.fill_area)
            .with_crop_fill_area(self.crop)
            .with_zoom(self.zoom)
            .with_optimized_borders(self.optimize_borders)
            .with_rotated_as_image(self.rotated_as_image)
            .with_parallel(!self.sequential)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Build {
            input,
            output,
            compact,
            grid,
        }) => cmd_build(&input, output.as_deref(), compact, &grid),
        Some(Commands::Dump {
            input,
            output,
            grid,
        }) => cmd_dump(&input, output.as_deref(), &grid),
        Some(Commands::Info { input, grid }) => cmd_info(&input, &grid),
        Some(Commands::Pictures {
            input,
            output,
            grid,
        }) => cmd_pictures(&input, output.as_deref(), &grid),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: exportgrid <COMMAND> <FILE>".yellow());
            println!("       exportgrid --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Load a layout and build its grid behind a progress bar.
fn build_grid(
    layout: &Layout,
    options: MatrixOptions,
) -> Result<GridResult, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(layout.page_count() as u64 + 4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    log::debug!("Building grid with {:?}", options);
    let bar = pb.clone();
    let callback = move |progress: &Progress| {
        bar.set_message(match progress.phase {
            Phase::Placing => format!(
                "{} ({}/{})",
                progress.phase, progress.current_page, progress.total_pages
            ),
            phase => phase.to_string(),
        });
        bar.inc(1);
    };

    let result = ExportGrid::new()
        .with_options(options)
        .with_progress(Box::new(callback))
        .build(layout);
    pb.finish_and_clear();
    Ok(result?)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_build(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    grid: &GridArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let layout = Layout::from_file(input)?;
    let result = build_grid(&layout, grid.to_options())?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    write_output(output, &result.to_json(format)?)
}

fn cmd_dump(
    input: &Path,
    output: Option<&Path>,
    grid: &GridArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let layout = Layout::from_file(input)?;
    let result = build_grid(&layout, grid.to_options())?;
    write_output(output, &result.to_text()?)
}

fn cmd_info(input: &Path, grid: &GridArgs) -> Result<(), Box<dyn std::error::Error>> {
    let layout = Layout::from_file(input)?;
    let options = grid.to_options();
    let tolerance = options.tolerance;
    let result = build_grid(&layout, options)?;
    let stats = result.stats();

    println!("{}", "Layout Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), layout.page_count());
    println!("{}: {}", "Components".bold(), layout.component_count());
    println!("{}: {}", "Tolerance".bold(), tolerance);

    println!();
    println!("{}", "Grid Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Columns".bold(), stats.column_count);
    println!("{}: {}", "Rows".bold(), stats.row_count);
    println!(
        "{}: {} ({} empty)",
        "Cells".bold(),
        stats.cell_count(),
        stats.empty_cell_count
    );
    println!("{}: {}", "Objects".bold(), stats.live_count);
    println!("{}: {}", "Fragments".bold(), stats.fragment_count);
    println!("{}: {}", "Merged cells".bold(), stats.merged_count);
    println!("{}: {}", "Text cells".bold(), stats.text_count);
    println!("{}: {}", "Styles".bold(), stats.style_count);
    println!("{}: {}", "Pictures".bold(), stats.picture_count);

    Ok(())
}

fn cmd_pictures(
    input: &Path,
    output: Option<&Path>,
    grid: &GridArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let layout = Layout::from_file(input)?;
    let result = build_grid(&layout, grid.to_options())?;

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let mut count = 0;
    for (id, picture) in result.matrix().pictures().enumerate() {
        let filename = picture.suggested_filename(id);
        fs::write(output_dir.join(&filename), &picture.data)?;
        println!("{} {}", "Extracted".green(), filename);
        count += 1;
    }

    println!("\n{} {} pictures extracted", "Done!".green().bold(), count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "exportgrid".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout-to-grid conversion tool");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_args(args: &[&str]) -> GridArgs {
        let mut argv = vec!["exportgrid", "info", "layout.json"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Info { grid, .. }) => grid,
            _ => panic!("expected the info command"),
        }
    }

    #[test]
    fn test_default_options() {
        let options = grid_args(&[]).to_options();
        assert_eq!(options, MatrixOptions::precise());
    }

    #[test]
    fn test_grid_flags() {
        let options = grid_args(&[
            "--editable",
            "--zoom",
            "2",
            "--fill-area",
            "--crop",
            "--optimize-borders",
            "--sequential",
        ])
        .to_options();

        assert_eq!(options.tolerance, exportgrid::EDITABLE_TOLERANCE);
        assert_eq!(options.zoom, 2.0);
        assert!(options.fill_area && options.crop_fill_area);
        assert!(options.optimize_borders);
        assert!(!options.parallel);
    }

    #[test]
    fn test_conflicting_presets_rejected() {
        let argv = ["exportgrid", "info", "layout.json", "--precise", "--editable"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_crop_requires_fill_area() {
        let argv = ["exportgrid", "info", "layout.json", "--crop"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_pictures_accepts_grid_flags() {
        let argv = ["exportgrid", "pictures", "layout.json", "--rotated-as-image"];
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Pictures { grid, .. }) => assert!(grid.to_options().rotated_as_image),
            _ => panic!("expected the pictures command"),
        }
    }

    #[test]
    fn test_pictures_extracts_rotated_text() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("layout.json");
        let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let layout = Layout::new().with_page(
            exportgrid::PageInfo::a4(),
            vec![exportgrid::ComponentInfo::text(0.0, 0.0, 20.0, 100.0, "Side")
                .with_rotation(90)
                .with_picture(png)],
        );
        fs::write(&input, layout.to_json(JsonFormat::Compact).unwrap()).unwrap();

        let out = dir.path().join("pictures");
        let grid = grid_args(&["--rotated-as-image"]);
        cmd_pictures(&input, Some(&out), &grid).unwrap();
        assert!(out.join("picture0.png").exists());
    }

    #[test]
    fn test_nan_zoom_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("layout.json");
        let layout = Layout::new().with_page(
            exportgrid::PageInfo::a4(),
            vec![exportgrid::ComponentInfo::text(0.0, 0.0, 10.0, 10.0, "x")],
        );
        fs::write(&input, layout.to_json(JsonFormat::Compact).unwrap()).unwrap();

        let grid = grid_args(&["--zoom", "NaN"]);
        assert!(cmd_build(&input, None, false, &grid).is_err());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        write_output(Some(&path), "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
