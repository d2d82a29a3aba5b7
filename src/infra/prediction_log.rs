// ============================================================
// Layer 6 — Prediction Log
// ============================================================
// The append-only CSV history of predictions:
//
//   Issuer Name,Industry,Debt to Equity,EBITDA Margin,
//   Interest Coverage,Issue Size (₹Cr),DefaultFlag,Predicted Rating
//   Acme Co,Retail,1.5,10.0,3.0,100.0,0,AA
//   ...
//
// Rules:
//   - The file is created with the canonical header on first use
//   - Every append checks the header first; a file with any other
//     header is refused (SchemaMismatch) until `migrate` rewrites it
//   - A row is encoded in memory, then written with ONE write_all
//     on a file opened in append mode; a write that fails part way
//     is truncated back, so no partial row survives
//   - A log whose last data row lacks its newline is refused, never
//     glued onto
//   - A new log appears atomically with its header (hard link of a
//     prepared file), so concurrent processes never write it twice
//   - Header check + append run under a Mutex, so callers sharing
//     one PredictionLog across threads never interleave rows
//   - Rows are never updated or deleted

use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use crate::domain::error::LogWriteError;
use crate::domain::record::{parse_default_flag, PredictionLogEntry, LOG_HEADER};

/// Distinguishes header files prepared by handles in one process
static NEXT_TMP: AtomicU64 = AtomicU64::new(0);

/// Outcome of `PredictionLog::migrate`.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    /// Data rows in the log after migration
    pub rows: usize,
    /// Canonical columns the legacy file lacked (written empty)
    pub filled_columns: Vec<String>,
    /// Copy of the legacy file; None when nothing was rewritten
    pub backup: Option<PathBuf>,
}

pub struct PredictionLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the log with its header if absent; verify the header
    /// if present.
    pub fn ensure_created(&self) -> Result<(), LogWriteError> {
        let _guard = self.lock();
        self.check_or_write_header()
    }

    /// Append exactly one row.
    ///
    /// A file whose last line is unterminated is refused untouched,
    /// except for a bare header, which gets its newline first. A
    /// failed write is cut back to the previous length.
    pub fn append(&self, entry: &PredictionLogEntry) -> Result<(), LogWriteError> {
        let row = encode_row(entry).map_err(|reason| self.malformed(reason))?;

        let _guard = self.lock();
        self.check_or_write_header()?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io(e))?;
        self.terminate_header_line(&mut file)?;

        write_row(&mut file, &row).map_err(|e| self.io(e))?;

        tracing::debug!(
            "Logged prediction {} for '{}' to '{}'",
            entry.predicted_rating,
            entry.issuer_name,
            self.path.display(),
        );
        Ok(())
    }

    /// Every row in insertion order. A missing log reads as empty.
    pub fn read_all(&self) -> Result<Vec<PredictionLogEntry>, LogWriteError> {
        let _guard = self.lock();
        match read_header(&self.path).map_err(|e| self.classify(e))? {
            None => return Ok(Vec::new()),
            Some(found) => self.expect_canonical(found)?,
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| self.malformed(e.to_string()))?;

        let mut entries = Vec::new();
        for (i, row) in reader.deserialize::<PredictionLogEntry>().enumerate() {
            let entry = row.map_err(|e| self.malformed(format!("line {}: {e}", i + 2)))?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Rewrite a legacy log into the canonical schema.
    ///
    /// Legacy column names are matched through `aliases`; columns may
    /// appear in any order. A missing DefaultFlag column is written
    /// as empty cells, any other missing column or any unrecognised
    /// column aborts without touching the file. The legacy file is
    /// kept as `<path>.bak`.
    pub fn migrate(&self) -> Result<MigrationReport, LogWriteError> {
        let _guard = self.lock();

        if !self.path.exists() {
            return Err(self.io(io::Error::new(io::ErrorKind::NotFound, "no log to migrate")));
        }

        let header = match read_header(&self.path).map_err(|e| self.classify(e))? {
            Some(h) => h,
            None => {
                self.check_or_write_header()?;
                return Ok(MigrationReport { rows: 0, filled_columns: Vec::new(), backup: None });
            }
        };

        if header == LOG_HEADER {
            let rows = count_data_rows(&self.path).map_err(|e| self.malformed(e.to_string()))?;
            tracing::info!("Log '{}' already uses the canonical schema", self.path.display());
            return Ok(MigrationReport { rows, filled_columns: Vec::new(), backup: None });
        }

        // For each canonical column: index of the legacy column feeding it
        let mut mapping: Vec<Option<usize>> = Vec::with_capacity(LOG_HEADER.len());
        let mut used   = vec![false; header.len()];
        let mut filled = Vec::new();
        for canonical in LOG_HEADER {
            let found = header
                .iter()
                .position(|h| aliases(canonical).iter().any(|a| a.eq_ignore_ascii_case(h)));
            match found {
                Some(i) => {
                    used[i] = true;
                    mapping.push(Some(i));
                }
                None if canonical == "DefaultFlag" => {
                    filled.push(canonical.to_string());
                    mapping.push(None);
                }
                None => return Err(self.unmigratable(format!("no column maps to '{canonical}'"))),
            }
        }
        if let Some((extra, _)) = header.iter().zip(&used).find(|(_, used)| !**used) {
            return Err(self.unmigratable(format!("unrecognised column '{extra}'")));
        }

        let flag_column = LOG_HEADER.iter().position(|c| *c == "DefaultFlag");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| self.malformed(e.to_string()))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let line   = line + 2;
            let record = record.map_err(|e| self.malformed(format!("line {line}: {e}")))?;

            let mut out = Vec::with_capacity(LOG_HEADER.len());
            for (col, source) in mapping.iter().enumerate() {
                let raw = source.and_then(|i| record.get(i)).unwrap_or("").trim();
                if Some(col) == flag_column && !raw.is_empty() {
                    let flag = parse_default_flag(raw).ok_or_else(|| {
                        self.unmigratable(format!("line {line}: DefaultFlag '{raw}' is not Yes/No or 1/0"))
                    })?;
                    out.push(u8::from(flag).to_string());
                } else {
                    out.push(raw.to_string());
                }
            }
            rows.push(out);
        }

        let tmp = sibling(&self.path, ".migrating");
        write_rows(&tmp, &rows).map_err(|e| self.malformed(e.to_string()))?;

        let backup = sibling(&self.path, ".bak");
        fs::copy(&self.path, &backup).map_err(|e| self.io(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io(e))?;

        tracing::info!(
            "Migrated {} rows in '{}' to the canonical schema (backup: '{}')",
            rows.len(),
            self.path.display(),
            backup.display(),
        );
        Ok(MigrationReport { rows: rows.len(), filled_columns: filled, backup: Some(backup) })
    }

    // ── internals (caller holds the lock) ─────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded state is the file itself; a panic elsewhere does
        // not leave it half-updated
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_or_write_header(&self) -> Result<(), LogWriteError> {
        match read_header(&self.path).map_err(|e| self.classify(e))? {
            Some(found) => self.expect_canonical(found),
            None if self.path.exists() => {
                // Present but empty
                let header = encode_header().map_err(|reason| self.malformed(reason))?;
                let mut file = OpenOptions::new()
                    .append(true)
                    .open(&self.path)
                    .map_err(|e| self.io(e))?;
                file.write_all(&header).map_err(|e| self.io(e))
            }
            None => self.create_with_header(),
        }
    }

    /// Publish a new log that already holds its header. The hard link
    /// fails if another process created the file first; its header is
    /// then checked like any existing one.
    fn create_with_header(&self) -> Result<(), LogWriteError> {
        let header = encode_header().map_err(|reason| self.malformed(reason))?;
        let nonce  = NEXT_TMP.fetch_add(1, Ordering::Relaxed);
        let tmp    = sibling(&self.path, &format!(".{}-{nonce}.new", std::process::id()));
        fs::write(&tmp, &header).map_err(|e| self.io(e))?;

        let linked = fs::hard_link(&tmp, &self.path);
        if let Err(e) = fs::remove_file(&tmp) {
            tracing::warn!("Could not remove '{}': {e}", tmp.display());
        }
        match linked {
            Ok(()) => {
                tracing::debug!("Created prediction log '{}'", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => self.check_or_write_header(),
            Err(e) => Err(self.io(e)),
        }
    }

    /// Make sure the next byte written starts a new line. Only a log
    /// consisting of the header alone may be repaired here; a data row
    /// without its newline is an interrupted write by someone else.
    fn terminate_header_line(&self, file: &mut File) -> Result<(), LogWriteError> {
        let len = file.metadata().map_err(|e| self.io(e))?.len();
        if len == 0 {
            return Ok(());
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(|e| self.io(e))?;
        file.read_exact(&mut last).map_err(|e| self.io(e))?;
        if last[0] == b'\n' {
            return Ok(());
        }

        let mut content = Vec::new();
        file.seek(SeekFrom::Start(0)).map_err(|e| self.io(e))?;
        file.read_to_end(&mut content).map_err(|e| self.io(e))?;
        if content.contains(&b'\n') {
            return Err(self.malformed(
                "last row has no line terminator (interrupted write?); \
                 remove or complete it before logging more predictions",
            ));
        }

        file.write_all(b"\n").map_err(|e| self.io(e))?;
        tracing::debug!("Terminated header line of '{}'", self.path.display());
        Ok(())
    }

    fn expect_canonical(&self, found: Vec<String>) -> Result<(), LogWriteError> {
        if found == LOG_HEADER {
            return Ok(());
        }
        Err(LogWriteError::SchemaMismatch {
            path:     self.path.clone(),
            found,
            expected: LOG_HEADER.iter().map(|c| c.to_string()).collect(),
        })
    }

    fn classify(&self, e: csv::Error) -> LogWriteError {
        match e.into_kind() {
            csv::ErrorKind::Io(source) => self.io(source),
            other => self.malformed(format!("{other:?}")),
        }
    }

    fn io(&self, source: io::Error) -> LogWriteError {
        LogWriteError::Io { path: self.path.clone(), source }
    }

    fn malformed(&self, reason: impl Into<String>) -> LogWriteError {
        LogWriteError::Malformed { path: self.path.clone(), reason: reason.into() }
    }

    fn unmigratable(&self, reason: impl Into<String>) -> LogWriteError {
        LogWriteError::Unmigratable { path: self.path.clone(), reason: reason.into() }
    }
}

/// Legacy spellings accepted for each canonical column
fn aliases(canonical: &str) -> &'static [&'static str] {
    match canonical {
        "Issuer Name"       => &["Issuer Name", "Issuer"],
        "Industry"          => &["Industry"],
        "Debt to Equity"    => &["Debt to Equity", "Debt to Equity Ratio"],
        "EBITDA Margin"     => &["EBITDA Margin", "EBITDA Margin (%)"],
        "Interest Coverage" => &["Interest Coverage", "Interest Coverage Ratio"],
        "Issue Size (₹Cr)"  => &["Issue Size (₹Cr)", "Issue Size", "Issue Size (₹ Crores)"],
        "DefaultFlag"       => &["DefaultFlag", "Default Flag"],
        "Predicted Rating"  => &["Predicted Rating"],
        _ => &[],
    }
}

/// First record of the file, or None when the file is missing or empty.
fn read_header(path: &Path) -> Result<Option<Vec<String>>, csv::Error> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut record = csv::StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(None);
    }
    Ok(Some(
        record
            .iter()
            .map(|c| c.trim_start_matches('\u{feff}').trim().to_string())
            .collect(),
    ))
}

fn count_data_rows(path: &Path) -> Result<usize, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut n = 0;
    for record in reader.records() {
        record?;
        n += 1;
    }
    Ok(n)
}

fn encode_header() -> Result<Vec<u8>, String> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    w.write_record(LOG_HEADER).map_err(|e| e.to_string())?;
    w.into_inner().map_err(|e| e.to_string())
}

fn encode_row(entry: &PredictionLogEntry) -> Result<Vec<u8>, String> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    w.serialize(entry).map_err(|e| e.to_string())?;
    w.into_inner().map_err(|e| e.to_string())
}

fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(LOG_HEADER)?;
    for row in rows {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Where a log row lands; `truncate` undoes a partial write.
trait RowSink: Write {
    fn size(&self) -> io::Result<u64>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl RowSink for File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Write the whole row or nothing of it.
fn write_row<S: RowSink>(sink: &mut S, row: &[u8]) -> io::Result<()> {
    let len = sink.size()?;
    if let Err(e) = sink.write_all(row) {
        if let Err(undo) = sink.truncate(len) {
            tracing::error!("Could not remove a partially written row: {undo}");
        }
        return Err(e);
    }
    Ok(())
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(issuer: &str, rating: &str) -> PredictionLogEntry {
        PredictionLogEntry {
            issuer_name:       issuer.into(),
            industry:          "Retail".into(),
            debt_to_equity:    1.5,
            ebitda_margin:     -10.0,
            interest_coverage: 3.0,
            issue_size:        100.0,
            default_flag:      Some(0),
            predicted_rating:  rating.into(),
        }
    }

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_first_append_writes_header_then_row() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("history.csv"));
        log.append(&entry("Acme Co", "AA")).unwrap();

        let lines = lines(log.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], LOG_HEADER.join(","));
        assert_eq!(lines[1].split(',').count(), LOG_HEADER.len());
    }

    #[test]
    fn test_each_append_adds_exactly_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        PredictionLog::new(&path).append(&entry("Acme Co", "AA")).unwrap();

        // A fresh handle on the same file must not repeat the header
        let log = PredictionLog::new(&path);
        for i in 0..3 {
            log.append(&entry("Beta Ltd", "A")).unwrap();
            assert_eq!(log.read_all().unwrap().len(), 2 + i);
        }
        assert_eq!(lines(&path).iter().filter(|l| l.starts_with("Issuer Name")).count(), 1);
    }

    #[test]
    fn test_read_back_matches_written_entries() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("history.csv"));
        let a   = entry("Gamma, Delta & Sons", "BBB");
        let b   = entry("Acme Co", "AAA");
        log.append(&a).unwrap();
        log.append(&b).unwrap();
        assert_eq!(log.read_all().unwrap(), vec![a, b]);
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("none.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_header_refused_and_file_untouched() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let legacy = "Issuer Name,Industry,Debt to Equity,EBITDA Margin,Interest Coverage,Issue Size (₹Cr),Predicted Rating\n\
                      Acme Co,Retail,1.5,10.0,3.0,100,AA\n";
        fs::write(&path, legacy).unwrap();

        let log = PredictionLog::new(&path);
        let err = log.append(&entry("Beta Ltd", "A")).unwrap_err();
        assert!(matches!(err, LogWriteError::SchemaMismatch { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), legacy);
    }

    #[test]
    fn test_unwritable_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let log = PredictionLog::new(dir.path());
        assert!(matches!(log.append(&entry("Acme Co", "AA")), Err(LogWriteError::Io { .. })));
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(PredictionLog::new(dir.path().join("history.csv")));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        log.append(&entry(&format!("Issuer {t}-{i}"), "AA")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let rows = log.read_all().unwrap();
        assert_eq!(rows.len(), 200);
        assert!(rows.iter().all(|r| r.predicted_rating == "AA"));
    }

    #[test]
    fn test_header_without_newline_gets_one_before_first_row() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path, LOG_HEADER.join(",")).unwrap();

        let log = PredictionLog::new(&path);
        log.append(&entry("Acme Co", "AA")).unwrap();

        let lines = lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], LOG_HEADER.join(","));
        assert_eq!(log.read_all().unwrap(), vec![entry("Acme Co", "AA")]);
    }

    #[test]
    fn test_unterminated_row_refused_and_file_untouched() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let log  = PredictionLog::new(&path);
        log.append(&entry("Acme Co", "AA")).unwrap();
        let intact = fs::read_to_string(&path).unwrap();

        // A row cut short by an interrupted writer
        let torn = format!("{intact}Beta Ltd,Bank");
        fs::write(&path, &torn).unwrap();

        let err = log.append(&entry("Gamma", "A")).unwrap_err();
        assert!(matches!(err, LogWriteError::Malformed { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), torn);

        // Once the torn tail is gone, the earlier row is still the only one
        fs::write(&path, &intact).unwrap();
        assert_eq!(log.read_all().unwrap().len(), 1);
        log.append(&entry("Gamma", "A")).unwrap();
        assert_eq!(log.read_all().unwrap().len(), 2);
    }

    /// Accepts `budget` bytes, then fails like a full disk.
    struct FillingDisk {
        bytes:  Vec<u8>,
        budget: usize,
    }

    impl Write for FillingDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
            }
            let n = buf.len().min(self.budget);
            self.bytes.extend_from_slice(&buf[..n]);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl RowSink for FillingDisk {
        fn size(&self) -> io::Result<u64> {
            Ok(self.bytes.len() as u64)
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            self.bytes.truncate(len as usize);
            Ok(())
        }
    }

    #[test]
    fn test_short_write_leaves_no_partial_row() {
        let prior = format!("{}\nAcme Co,Retail,1.5,10.0,3.0,100.0,0,AA\n", LOG_HEADER.join(","));
        let mut disk = FillingDisk { bytes: prior.clone().into_bytes(), budget: 12 };

        let row = encode_row(&entry("Beta Ltd", "A")).unwrap();
        assert!(write_row(&mut disk, &row).is_err());
        assert_eq!(String::from_utf8(disk.bytes).unwrap(), prior);
    }

    #[test]
    fn test_row_within_budget_is_written_whole() {
        let row      = encode_row(&entry("Beta Ltd", "A")).unwrap();
        let mut disk = FillingDisk { bytes: Vec::new(), budget: 1024 };
        write_row(&mut disk, &row).unwrap();
        assert_eq!(disk.bytes, row);
    }

    #[test]
    fn test_independent_handles_write_one_header() {
        // Separate handles share no Mutex, like separate processes
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let log = PredictionLog::new(path);
                    for i in 0..10 {
                        log.append(&entry(&format!("Issuer {t}-{i}"), "BB")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let lines = lines(&path);
        assert_eq!(lines.iter().filter(|l| l.starts_with("Issuer Name")).count(), 1);
        assert_eq!(PredictionLog::new(&path).read_all().unwrap().len(), 40);

        // No prepared header files are left behind
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_migrate_fills_missing_flag_and_reorders() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path,
            "Industry,Issuer,Debt to Equity,EBITDA Margin (%),Interest Coverage,Issue Size,Predicted Rating\n\
             Retail,Acme Co,1.5,10.0,3.0,100,AA\n\
             Banking,Beta Ltd,0.4,25.0,9.0,500,AAA\n").unwrap();

        let log    = PredictionLog::new(&path);
        let report = log.migrate().unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.filled_columns, vec!["DefaultFlag".to_string()]);
        assert!(report.backup.as_ref().unwrap().exists());

        let rows = log.read_all().unwrap();
        assert_eq!(rows[0].issuer_name, "Acme Co");
        assert_eq!(rows[0].industry, "Retail");
        assert_eq!(rows[0].default_flag, None);
        assert_eq!(rows[1].predicted_rating, "AAA");

        // Appends work again after migration
        log.append(&entry("Gamma", "A")).unwrap();
        assert_eq!(log.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_migrate_normalises_yes_no_flags() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path,
            "Issuer Name,Industry,Debt to Equity,EBITDA Margin,Interest Coverage,Issue Size (₹Cr),Default Flag,Predicted Rating\n\
             Acme Co,Retail,1.5,10.0,3.0,100,Yes,AA\n").unwrap();

        let log = PredictionLog::new(&path);
        log.migrate().unwrap();
        assert_eq!(log.read_all().unwrap()[0].default_flag, Some(1));
    }

    #[test]
    fn test_migrate_refuses_unknown_columns() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let body = "Issuer Name,Industry,Debt to Equity,EBITDA Margin,Interest Coverage,Issue Size,Predicted Rating,Analyst\n\
                    Acme Co,Retail,1.5,10.0,3.0,100,AA,jd\n";
        fs::write(&path, body).unwrap();

        let err = PredictionLog::new(&path).migrate().unwrap_err();
        assert!(matches!(err, LogWriteError::Unmigratable { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), body);
    }

    #[test]
    fn test_migrate_canonical_log_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("history.csv"));
        log.append(&entry("Acme Co", "AA")).unwrap();

        let report = log.migrate().unwrap();
        assert_eq!(report, MigrationReport { rows: 1, filled_columns: vec![], backup: None });
    }
}
