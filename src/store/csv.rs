use super::{RecordStore, Row, StoreError};
use crate::core::{compare_sequences, next_user_id, user_id_sequence, CsvColumns, Record};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const LOCK_ATTEMPTS: u32 = 200;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Record store backed by a single comma separated file.
///
/// Every lookup is a full scan of the file. Appends take an advisory exclusive
/// lock on the file, which only keeps out other writers that also lock it.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvRecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    /// Opens the store for reading, `None` if it has not been created
    fn open_reader(&self, has_headers: bool) -> Result<Option<csv::Reader<File>>, StoreError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(
                csv::ReaderBuilder::new()
                    .has_headers(has_headers)
                    .flexible(true)
                    .from_reader(file),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Visits the id of every data row, skipping rows that cannot be decoded.
    fn scan_ids<F>(&self, mut visit: F) -> Result<(), StoreError>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let Some(mut rdr) = self.open_reader(true)? else {
            return Ok(());
        };
        for (line, result) in rdr.records().enumerate() {
            match result {
                Ok(row) => {
                    if let Some(id) = row.get(0) {
                        if visit(id).is_break() {
                            break;
                        }
                    }
                }
                Err(e) if e.is_io_error() => return Err(self.csv_error(e)),
                Err(e) => {
                    log::warn!(
                        "Skipping malformed row {} in {}: {}",
                        line + 2,
                        self.path.display(),
                        e
                    );
                }
            }
        }
        Ok(())
    }

    /// Takes the exclusive append lock, giving up after a bounded number of attempts
    fn lock(&self, file: &File) -> Result<(), StoreError> {
        for _ in 0..LOCK_ATTEMPTS {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    thread::sleep(LOCK_RETRY_DELAY)
                }
                Err(e) => return Err(self.io_error(e)),
            }
        }
        Err(StoreError::Locked {
            path: self.path.clone(),
        })
    }
}

impl RecordStore for CsvRecordStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn is_registered(&self, id: &str) -> Result<bool, StoreError> {
        let mut found = false;
        self.scan_ids(|stored| {
            if stored == id {
                found = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }

    fn next_id(&self) -> Result<String, StoreError> {
        let mut max_sequence: Option<String> = None;
        self.scan_ids(|id| {
            if let Some(sequence) = user_id_sequence(id) {
                let higher = max_sequence
                    .as_deref()
                    .map_or(true, |max| compare_sequences(sequence, max).is_gt());
                if higher {
                    max_sequence = Some(sequence.to_string());
                }
            }
            ControlFlow::Continue(())
        })?;
        log::debug!(
            "Highest user id sequence in {}: {:?}",
            self.path.display(),
            max_sequence
        );
        Ok(next_user_id(max_sequence.as_deref()))
    }

    fn append(&self, record: &Record) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        // released when `file` is dropped, on every return path
        self.lock(&file)?;

        // decided under the lock, so concurrent creators write a single header
        let existing_len = file.metadata().map_err(|e| self.io_error(e))?.len();
        let is_new = existing_len == 0;

        if !is_new && self.is_registered(record.id())? {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }

        let mut bytes = Vec::new();
        if !is_new && !ends_with_newline(&mut file, existing_len).map_err(|e| self.io_error(e))? {
            bytes.push(b'\n');
        }
        bytes.extend(encode_row(record, is_new).map_err(|e| self.csv_error(e))?);

        write_or_roll_back(&mut file, &bytes, existing_len, &self.path)
            .map_err(|e| self.io_error(e))?;

        if is_new {
            log::info!("Created record store {}", self.path.display());
        }
        log::info!("Appended record {} to {}", record.id(), self.path.display());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Row>, StoreError> {
        let Some(mut rdr) = self.open_reader(false)? else {
            return Ok(Vec::new());
        };
        let mut rows = Vec::new();
        // byte records, so rows with invalid UTF-8 are still listed
        for result in rdr.byte_records() {
            match result {
                Ok(row) => rows.push(
                    row.iter()
                        .map(|field| String::from_utf8_lossy(field).into_owned())
                        .collect(),
                ),
                Err(e) if e.is_io_error() => return Err(self.csv_error(e)),
                Err(e) => log::warn!("Skipping unreadable row in {}: {}", self.path.display(), e),
            }
        }
        Ok(rows)
    }
}

/// Serialises a record (and optionally the header) into one buffer, so it is written in one go
fn encode_row(record: &Record, with_header: bool) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if with_header {
        wtr.write_record(Record::header())?;
    }
    wtr.serialize(record)?;
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

/// Destination of an append that can be made durable or cut back to an earlier length
trait AppendTarget: Write {
    fn sync(&mut self) -> io::Result<()>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Writes and syncs `bytes`, cutting the target back to `existing_len` if either fails
fn write_or_roll_back<T: AppendTarget>(
    target: &mut T,
    bytes: &[u8],
    existing_len: u64,
    path: &Path,
) -> io::Result<()> {
    let result = target.write_all(bytes).and_then(|()| target.sync());
    if result.is_err() {
        log::warn!(
            "Append to {} failed, truncating back to {} bytes",
            path.display(),
            existing_len
        );
        if let Err(truncate_err) = target.truncate(existing_len) {
            log::warn!("Failed to roll back {}: {}", path.display(), truncate_err);
        }
    }
    result
}

fn ends_with_newline(file: &mut File, len: u64) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
