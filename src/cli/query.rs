use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Args;
use tracing::info;

use crate::cli::{parse_coordinate, CatalogArgs, OutputFormat};
use crate::core::band::Band;
use crate::core::order::CoordinateOrder;
use crate::filter::document::FilterDocument;
use crate::index::interval::IntervalIndex;
use crate::index::track::Track;
use crate::merge::window::{TrackMerger, WindowedResult};
use crate::parsing::bed::parse_bed_file;

#[derive(Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// BED file of one track; repeat for several tracks
    #[arg(short, long = "track", required = true)]
    pub tracks: Vec<PathBuf>,

    /// Query coordinate as contig:offset
    #[arg(short, long)]
    pub coordinate: String,

    /// Number of distinct borders to report left of the coordinate
    #[arg(short, long, default_value = "5")]
    pub left: usize,

    /// Number of distinct borders to report right of the coordinate
    #[arg(short, long, default_value = "5")]
    pub right: usize,

    /// JSON filter applied to every track
    #[arg(long)]
    pub filter: Option<PathBuf>,
}

pub fn run(args: QueryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (catalog, genome) = args.catalog.load()?;
    let order = Arc::new(CoordinateOrder::from_catalog(&catalog)?);
    if !order.contains_genome(&genome) {
        return Err(anyhow!("Genome '{}' is not in the catalog", genome));
    }
    let coord = parse_coordinate(&args.coordinate, &genome)?;

    let mut tracks = Vec::with_capacity(args.tracks.len());
    for path in &args.tracks {
        let id = track_id(path)?;
        let bands = parse_bed_file(path, &genome, &id)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let track = Track::new(id, Arc::clone(&order), bands)
            .with_context(|| format!("Failed to index {}", path.display()))?;
        if verbose {
            eprintln!("Track {}: {} bands", track.id, track.index.len());
        }
        tracks.push(track);
    }

    if let Some(path) = &args.filter {
        let query = FilterDocument::load_from_file(path)?.build()?;
        tracks = tracks
            .iter()
            .map(|track| track.filtered(&query))
            .collect::<Result<Vec<_>, _>>()?;
    }

    let indexes: Vec<&IntervalIndex> = tracks.iter().map(|t| &t.index).collect();
    let merger = TrackMerger::new(order);
    let result = merger.query(&coord, args.left, args.right, &indexes)?;
    info!("{} bands around {}", result.bands.len(), coord);

    match format {
        OutputFormat::Text => print_text(&args, &coord.to_string(), &result),
        OutputFormat::Json => print_json(&args, &coord.to_string(), &result)?,
        OutputFormat::Tsv => print_tsv(&result),
    }

    Ok(())
}

/// Track id from a BED path: the file name without compression and BED
/// extensions
fn track_id(path: &Path) -> anyhow::Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Cannot derive a track id from {}", path.display()))?;
    let mut id = name;
    for ext in [".gz", ".bgz", ".bed"] {
        if let Some(stripped) = id.strip_suffix(ext) {
            id = stripped;
        }
    }
    Ok(id.to_string())
}

fn print_text(args: &QueryArgs, coord: &str, result: &WindowedResult) {
    println!("Window around {} (left {}, right {})", coord, args.left, args.right);
    println!("{}", "=".repeat(60));

    if result.bands.is_empty() {
        println!("\nNo bands found.");
    } else {
        println!();
        for band in &result.bands {
            println!(
                "  {:<12} {:<20} {}:{}-{}",
                band.track,
                band.name,
                band.start.contig.id(),
                band.start.offset,
                band.end.offset
            );
        }
    }

    println!("\nLeftmost: {}", result.is_leftmost);
    println!("Rightmost: {}", result.is_rightmost);
}

fn band_json(band: &Band) -> serde_json::Value {
    serde_json::json!({
        "track": band.track.as_ref(),
        "name": band.name,
        "contig": band.start.contig.id(),
        "start": band.start.offset,
        "end": band.end.offset,
        "properties": band.properties,
    })
}

fn print_json(args: &QueryArgs, coord: &str, result: &WindowedResult) -> anyhow::Result<()> {
    let bands: Vec<serde_json::Value> = result.bands.iter().map(|b| band_json(b)).collect();
    let output = serde_json::json!({
        "coordinate": coord,
        "left": args.left,
        "right": args.right,
        "is_leftmost": result.is_leftmost,
        "is_rightmost": result.is_rightmost,
        "bands": bands,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(result: &WindowedResult) {
    println!("track\tname\tcontig\tstart\tend");
    for band in &result.bands {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            band.track,
            band.name,
            band.start.contig.id(),
            band.start.offset,
            band.end.offset
        );
    }
}
