use extract::EnrichedRecord;
use index::IndexStats;
use query::SearchTrace;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct PipelineMetrics {
    // Counts
    records_read: AtomicUsize,
    records_without_text: AtomicUsize,
    funerary_records: AtomicUsize,
    gazetteer_entries: AtomicUsize,
    eligible_places: AtomicUsize,
    places_with_stems: AtomicUsize,
    raw_candidates: AtomicUsize,
    false_positives: AtomicUsize,
    duplicates: AtomicUsize,
    too_close: AtomicUsize,
    migrants: AtomicUsize,

    // Timing (in microseconds)
    ingest_time_us: AtomicU64,
    extract_time_us: AtomicU64,
    index_time_us: AtomicU64,
    search_time_us: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records_read: AtomicUsize::new(0),
            records_without_text: AtomicUsize::new(0),
            funerary_records: AtomicUsize::new(0),
            gazetteer_entries: AtomicUsize::new(0),
            eligible_places: AtomicUsize::new(0),
            places_with_stems: AtomicUsize::new(0),
            raw_candidates: AtomicUsize::new(0),
            false_positives: AtomicUsize::new(0),
            duplicates: AtomicUsize::new(0),
            too_close: AtomicUsize::new(0),
            migrants: AtomicUsize::new(0),
            ingest_time_us: AtomicU64::new(0),
            extract_time_us: AtomicU64::new(0),
            index_time_us: AtomicU64::new(0),
            search_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_ingest(&self, duration: Duration, records: usize) {
        self.ingest_time_us.fetch_add(micros(duration), Ordering::Relaxed);
        self.records_read.fetch_add(records, Ordering::Relaxed);
    }

    pub fn record_extract(&self, duration: Duration, records: &[EnrichedRecord]) {
        self.extract_time_us.fetch_add(micros(duration), Ordering::Relaxed);
        let without_text = records.iter().filter(|r| r.cleantext.is_none()).count();
        let funerary = records.iter().filter(|r| r.demographics.funerary).count();
        self.records_without_text.fetch_add(without_text, Ordering::Relaxed);
        self.funerary_records.fetch_add(funerary, Ordering::Relaxed);
    }

    pub fn record_index(&self, duration: Duration, stats: IndexStats) {
        self.index_time_us.fetch_add(micros(duration), Ordering::Relaxed);
        self.gazetteer_entries.fetch_add(stats.entries, Ordering::Relaxed);
        self.eligible_places.fetch_add(stats.eligible, Ordering::Relaxed);
        self.places_with_stems.fetch_add(stats.with_stems, Ordering::Relaxed);
    }

    pub fn record_search(&self, duration: Duration, trace: &SearchTrace) {
        self.search_time_us.fetch_add(micros(duration), Ordering::Relaxed);
        self.raw_candidates.fetch_add(trace.matching.raw_candidates, Ordering::Relaxed);
        self.false_positives.fetch_add(trace.matching.false_positives, Ordering::Relaxed);
        self.duplicates.fetch_add(trace.matching.duplicates, Ordering::Relaxed);
        self.too_close.fetch_add(trace.resolving.too_close, Ordering::Relaxed);
        self.migrants.fetch_add(trace.resolving.resolved, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_read: self.records_read.load(Ordering::Relaxed),
            records_without_text: self.records_without_text.load(Ordering::Relaxed),
            funerary_records: self.funerary_records.load(Ordering::Relaxed),
            gazetteer_entries: self.gazetteer_entries.load(Ordering::Relaxed),
            eligible_places: self.eligible_places.load(Ordering::Relaxed),
            places_with_stems: self.places_with_stems.load(Ordering::Relaxed),
            raw_candidates: self.raw_candidates.load(Ordering::Relaxed),
            false_positives: self.false_positives.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            too_close: self.too_close.load(Ordering::Relaxed),
            migrants: self.migrants.load(Ordering::Relaxed),
            ingest_time_ms: millis(&self.ingest_time_us),
            extract_time_ms: millis(&self.extract_time_us),
            index_time_ms: millis(&self.index_time_us),
            search_time_ms: millis(&self.search_time_us),
        }
    }
}

fn micros(duration: Duration) -> u64 {
    duration.as_micros() as u64
}

fn millis(total_us: &AtomicU64) -> f64 {
    total_us.load(Ordering::Relaxed) as f64 / 1000.0
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub records_read: usize,
    pub records_without_text: usize,
    pub funerary_records: usize,
    pub gazetteer_entries: usize,
    pub eligible_places: usize,
    pub places_with_stems: usize,
    pub raw_candidates: usize,
    pub false_positives: usize,
    pub duplicates: usize,
    pub too_close: usize,
    pub migrants: usize,
    pub ingest_time_ms: f64,
    pub extract_time_ms: f64,
    pub index_time_ms: f64,
    pub search_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
