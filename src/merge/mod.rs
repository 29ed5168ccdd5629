//! Windowed queries across several tracks.
//!
//! Each track is indexed on its own, so the borders of one track know nothing
//! about the borders of another. [`TrackMerger`](window::TrackMerger) collects
//! candidates from every index independently (in parallel), then ranks the
//! union of their borders to pick one coherent window of `left`/`right`
//! borders around the query coordinate.

pub mod window;
