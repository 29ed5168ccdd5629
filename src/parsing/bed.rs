//! Parser for BED files.
//!
//! Format: `chrom\tstart\tend[\tname[\tscore[\tstrand[\t...]]]]`, 0-based
//! half-open coordinates. Columns past the sixth are ignored. Files ending
//! in `.gz` or `.bgz` are decompressed on the fly.

use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::core::band::Band;
use crate::core::contig::Contig;
use crate::core::coordinate::GenomicCoordinate;
use crate::parsing::fasta::is_gzipped;
use crate::parsing::ParseError;
use crate::utils::validation::check_band_limit;

/// Parse a BED file into the bands of one track
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error of
/// [`parse_bed_text`].
pub fn parse_bed_file(path: &Path, genome: &str, track: &str) -> Result<Vec<Band>, ParseError> {
    let content = if is_gzipped(path) {
        let mut content = String::new();
        MultiGzDecoder::new(std::fs::File::open(path)?).read_to_string(&mut content)?;
        content
    } else {
        std::fs::read_to_string(path)?
    };
    parse_bed_text(&content, genome, track)
}

/// Parse BED text into the bands of one track
///
/// # Errors
///
/// Returns `ParseError::InvalidRecord` for a line with missing or unparsable
/// fields, `ParseError::Band` for an inverted interval, or
/// `ParseError::TooManyRecords` if the band limit is exceeded.
pub fn parse_bed_text(text: &str, genome: &str, track: &str) -> Result<Vec<Band>, ParseError> {
    let mut bands = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_number = i + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }

        if check_band_limit(bands.len()).is_some() {
            return Err(ParseError::TooManyRecords(bands.len()));
        }

        bands.push(parse_bed_line(line, line_number, genome, track)?);
    }

    Ok(bands)
}

fn parse_bed_line(
    line: &str,
    line_number: usize,
    genome: &str,
    track: &str,
) -> Result<Band, ParseError> {
    let invalid = |message: String| ParseError::InvalidRecord {
        line: line_number,
        message,
    };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(invalid(format!(
            "expected at least 3 tab-separated fields, found {}",
            fields.len()
        )));
    }

    let chrom = fields[0];
    if chrom.is_empty() {
        return Err(invalid("empty chrom".to_string()));
    }
    let start: u64 = fields[1]
        .parse()
        .map_err(|_| invalid(format!("invalid start '{}'", fields[1])))?;
    let end: u64 = fields[2]
        .parse()
        .map_err(|_| invalid(format!("invalid end '{}'", fields[2])))?;

    let name = match fields.get(3) {
        Some(name) if !name.is_empty() && *name != "." => (*name).to_string(),
        _ => format!("{chrom}:{start}-{end}"),
    };

    let contig = Contig::new(genome, chrom);
    let mut band = Band::new(
        track,
        GenomicCoordinate::new(contig.clone(), start),
        GenomicCoordinate::new(contig, end),
        name,
    )
    .map_err(|source| ParseError::Band {
        line: line_number,
        source,
    })?;

    if let Some(score) = fields.get(4).filter(|s| !s.is_empty() && **s != ".") {
        if score.parse::<f64>().is_err() {
            return Err(invalid(format!("invalid score '{score}'")));
        }
        band = band.with_property("score", *score);
    }

    if let Some(strand) = fields.get(5).filter(|s| !s.is_empty()) {
        if !matches!(*strand, "+" | "-" | ".") {
            return Err(invalid(format!("invalid strand '{strand}'")));
        }
        band = band.with_property("strand", *strand);
    }

    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PropertyValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_bed_text() {
        let bed = "track name=genes\n# comment\nchr1\t10\t20\tgeneA\t500\t+\nchr1\t30\t40\n";

        let bands = parse_bed_text(bed, "hg38", "genes").unwrap();
        assert_eq!(bands.len(), 2);

        assert_eq!(bands[0].name, "geneA");
        assert_eq!(bands[0].start.offset, 10);
        assert_eq!(bands[0].end.offset, 20);
        assert_eq!(bands[0].start.contig, Contig::new("hg38", "chr1"));
        assert_eq!(&*bands[0].track, "genes");
        assert_eq!(bands[0].property("score"), Some(&PropertyValue::from("500")));
        assert_eq!(bands[0].property("strand"), Some(&PropertyValue::from("+")));

        assert_eq!(bands[1].name, "chr1:30-40");
        assert!(bands[1].properties.is_empty());
    }

    #[test]
    fn test_parse_bed_reports_line_of_bad_record() {
        let bed = "chr1\t10\t20\nchr1\tten\t20\n";
        let err = parse_bed_text(bed, "hg38", "t").unwrap_err();
        assert!(matches!(err, ParseError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_parse_bed_rejects_inverted_interval() {
        let err = parse_bed_text("chr1\t20\t10\n", "hg38", "t").unwrap_err();
        assert!(matches!(err, ParseError::Band { line: 1, .. }));
    }

    #[test]
    fn test_parse_bed_rejects_short_line_and_bad_strand() {
        assert!(parse_bed_text("chr1\t20\n", "hg38", "t").is_err());
        assert!(parse_bed_text("chr1\t1\t2\tx\t0\t?\n", "hg38", "t").is_err());
    }

    #[test]
    fn test_parse_bed_file() {
        let mut temp = NamedTempFile::with_suffix(".bed").unwrap();
        temp.write_all(b"chrX\t0\t5\tfirst\n").unwrap();
        temp.flush().unwrap();

        let bands = parse_bed_file(temp.path(), "hg38", "t").unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].name, "first");
    }

    #[test]
    fn test_parse_gzipped_bed_file() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"chrX\t0\t5\tfirst\nchrX\t7\t9\tsecond\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut temp = NamedTempFile::with_suffix(".bed.gz").unwrap();
        temp.write_all(&compressed).unwrap();
        temp.flush().unwrap();

        let bands = parse_bed_file(temp.path(), "hg38", "t").unwrap();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[1].name, "second");
        assert_eq!(bands[1].end.offset, 9);
    }
}
