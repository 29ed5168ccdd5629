use clap::Args;

use crate::catalog::store::ReferenceCatalog;
use crate::cli::{CatalogArgs, OutputFormat};
use crate::core::contig::Contig;

#[derive(Args)]
pub struct ContigsArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

pub fn run(args: ContigsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (catalog, genome) = args.catalog.load()?;
    let contigs = catalog.contigs(&genome)?;

    if verbose {
        let total: u64 = contigs.iter().filter_map(Contig::length).sum();
        eprintln!("{}: {} contigs, {} bases", genome, contigs.len(), total);
    }

    match format {
        OutputFormat::Text => {
            println!("Contigs of {} ({})", genome, contigs.len());
            println!("{}", "=".repeat(60));
            for (rank, contig) in contigs.iter().enumerate() {
                println!(
                    "  {:>4}  {:<24} {:>12}",
                    rank,
                    contig.id(),
                    display_length(contig)
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "genome": genome,
                "contigs": contigs
                    .iter()
                    .map(|c| serde_json::json!({ "id": c.id(), "length": c.length() }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("rank\tcontig\tlength");
            for (rank, contig) in contigs.iter().enumerate() {
                println!("{}\t{}\t{}", rank, contig.id(), display_length(contig));
            }
        }
    }

    Ok(())
}

fn display_length(contig: &Contig) -> String {
    contig
        .length()
        .map_or_else(|| "-".to_string(), |l| l.to_string())
}
