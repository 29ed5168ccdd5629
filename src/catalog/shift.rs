//! Coordinate arithmetic across contig boundaries.
//!
//! A genome is treated as the concatenation of its contigs in catalog order.
//! Walking past the end of a contig hops to the first position of the next one
//! and the hop itself costs one position. Walks that would leave the genome
//! saturate at `first_contig:0` or `last_contig:LEN`.

use crate::catalog::store::CatalogError;
use crate::core::contig::Contig;
use crate::core::coordinate::GenomicCoordinate;

fn contig_rank(contigs: &[Contig], contig: &Contig) -> Result<usize, CatalogError> {
    contigs
        .iter()
        .position(|c| c == contig)
        .ok_or_else(|| CatalogError::ContigNotFound {
            genome: contig.genome().to_string(),
            contig: contig.id().to_string(),
        })
}

fn contig_length(contig: &Contig) -> Result<u64, CatalogError> {
    contig.length().ok_or_else(|| CatalogError::UnresolvedLength {
        genome: contig.genome().to_string(),
        contig: contig.id().to_string(),
    })
}

/// Locate `coord` in `contigs`, checking that its offset lies on the contig
fn locate(contigs: &[Contig], coord: &GenomicCoordinate) -> Result<(usize, u64), CatalogError> {
    let rank = contig_rank(contigs, &coord.contig)?;
    let length = contig_length(&contigs[rank])?;
    if coord.offset > length {
        return Err(CatalogError::CoordinateOutOfBounds(format!(
            "{coord} lies beyond the end of {} (length {length})",
            coord.contig.id()
        )));
    }
    Ok((rank, coord.offset))
}

/// Move `coord` left by `distance` positions.
///
/// # Errors
///
/// Returns `CatalogError::ContigNotFound` if the coordinate's contig is not in
/// `contigs`, `CatalogError::UnresolvedLength` if a traversed contig has no
/// length, or `CatalogError::CoordinateOutOfBounds` if the start coordinate
/// lies past its contig's end.
pub fn left_gap_aware_shift(
    contigs: &[Contig],
    coord: &GenomicCoordinate,
    distance: u64,
) -> Result<GenomicCoordinate, CatalogError> {
    let (mut rank, mut offset) = locate(contigs, coord)?;
    let mut remaining = distance;

    loop {
        if remaining <= offset {
            offset -= remaining;
            break;
        }
        if rank == 0 {
            offset = 0;
            break;
        }
        remaining -= offset + 1;
        rank -= 1;
        offset = contig_length(&contigs[rank])?;
    }

    Ok(GenomicCoordinate::new(contigs[rank].clone(), offset))
}

/// Move `coord` right by `distance` positions.
///
/// # Errors
///
/// Fails like [`left_gap_aware_shift`].
pub fn right_gap_aware_shift(
    contigs: &[Contig],
    coord: &GenomicCoordinate,
    distance: u64,
) -> Result<GenomicCoordinate, CatalogError> {
    let (mut rank, mut offset) = locate(contigs, coord)?;
    let mut remaining = distance;

    loop {
        let length = contig_length(&contigs[rank])?;
        let room = length - offset;
        if remaining <= room {
            offset += remaining;
            break;
        }
        if rank + 1 == contigs.len() {
            offset = length;
            break;
        }
        remaining -= room + 1;
        rank += 1;
        offset = 0;
    }

    Ok(GenomicCoordinate::new(contigs[rank].clone(), offset))
}

/// Move `coord` by a signed `offset`: negative walks left, positive right.
///
/// # Errors
///
/// Fails like [`left_gap_aware_shift`].
pub fn shift_coordinate(
    contigs: &[Contig],
    coord: &GenomicCoordinate,
    offset: i64,
) -> Result<GenomicCoordinate, CatalogError> {
    if offset < 0 {
        left_gap_aware_shift(contigs, coord, offset.unsigned_abs())
    } else {
        right_gap_aware_shift(contigs, coord, offset.unsigned_abs())
    }
}
