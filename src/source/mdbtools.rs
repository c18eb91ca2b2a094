//! Access database reader built on the mdbtools executables.
//!
//! Table names come from `mdb-tables -1`; each table is exported once with
//! `mdb-export` and parsed by polars, then served from memory. Only the
//! configured date columns are read as timestamps, using the layout the
//! export was asked to write. Equality lookups build an index on first use, so joining N
//! stations costs one export and one hash pass over the daily table.

use super::{Backend, Database, MemoryTable, Row, RowIter, Value, ensure_column};
use crate::config::MdbToolsConfig;
use crate::error::{EcofiError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{AnyValue, CsvReadOptions, DataFrame, SerReader};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{Cursor, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;
use tracing::debug;

/// Magic bytes at offset 0 of every Jet/ACE file
const FILE_MAGIC: [u8; 4] = [0x00, 0x01, 0x00, 0x00];
const JET_SIGNATURE: &[u8] = b"Standard Jet DB";
const ACE_SIGNATURE: &[u8] = b"Standard ACE DB";
/// Offset of the engine version byte
const VERSION_OFFSET: usize = 0x14;

/// Storage engine generation of an Access file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessVersion {
    /// Access 97 `.mdb`
    Jet3,
    /// Access 2000-2003 `.mdb`
    Jet4,
    /// Access 2007+ `.accdb`, with the raw format byte
    Ace(u8),
}

impl AccessVersion {
    /// Identify the engine from the first bytes of a file
    pub fn from_header(header: &[u8]) -> Option<Self> {
        if header.len() <= VERSION_OFFSET || header[..4] != FILE_MAGIC {
            return None;
        }
        let signature = &header[4..4 + JET_SIGNATURE.len()];
        let version = header[VERSION_OFFSET];
        if signature == JET_SIGNATURE {
            match version {
                0 => Some(AccessVersion::Jet3),
                1 => Some(AccessVersion::Jet4),
                other => Some(AccessVersion::Ace(other)),
            }
        } else if signature == ACE_SIGNATURE {
            Some(AccessVersion::Ace(version))
        } else {
            None
        }
    }
}

impl fmt::Display for AccessVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessVersion::Jet3 => write!(f, "Jet 3"),
            AccessVersion::Jet4 => write!(f, "Jet 4"),
            AccessVersion::Ace(format) => write!(f, "ACE (format {format})"),
        }
    }
}

/// Check the Jet/ACE signature of a file
pub fn read_signature(path: &Path) -> Result<AccessVersion> {
    let mut header = [0u8; VERSION_OFFSET + 1];
    let mut file = File::open(path)?;
    match file.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(EcofiError::NotAccessDatabase {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(EcofiError::Io(e)),
    }
    AccessVersion::from_header(&header).ok_or_else(|| EcofiError::NotAccessDatabase {
        path: path.to_path_buf(),
    })
}

/// Backend that opens Access files through mdbtools
#[derive(Debug, Clone, Default)]
pub struct MdbTools {
    config: MdbToolsConfig,
}

impl MdbTools {
    pub fn new(config: MdbToolsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MdbToolsConfig {
        &self.config
    }
}

impl Backend for MdbTools {
    type Database = MdbDatabase;

    fn open(&self, path: &Path) -> Result<MdbDatabase> {
        let version = read_signature(path)?;
        debug!("Opened {} ({})", path.display(), version);
        Ok(MdbDatabase {
            path: path.to_path_buf(),
            config: self.config.clone(),
            version,
            tables: RefCell::new(HashMap::new()),
        })
    }
}

/// An open Access file; exported tables are cached for the life of the handle
#[derive(Debug)]
pub struct MdbDatabase {
    path: PathBuf,
    config: MdbToolsConfig,
    version: AccessVersion,
    tables: RefCell<HashMap<String, Rc<MemoryTable>>>,
}

impl MdbDatabase {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> AccessVersion {
        self.version
    }

    fn load(&self, name: &str) -> Result<Rc<MemoryTable>> {
        if let Some(table) = self.tables.borrow().get(name) {
            return Ok(Rc::clone(table));
        }

        let mut command = Command::new(self.config.mdb_export());
        command
            .arg("-D")
            .arg(&self.config.datetime_format)
            .arg("-T")
            .arg(&self.config.datetime_format)
            .arg(&self.path)
            .arg(name);
        let table = Rc::new(parse_export(run(command)?, &self.config)?);
        debug!(
            "Exported table {} ({} rows, {} columns)",
            name,
            table.len(),
            table.columns().len()
        );

        self.tables
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&table));
        Ok(table)
    }
}

impl Database for MdbDatabase {
    fn table_names(&self) -> Result<BTreeSet<String>> {
        let mut command = Command::new(self.config.mdb_tables());
        command.arg("-1").arg(&self.path);
        let stdout = run(command)?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn columns(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.load(table)?.columns().to_vec())
    }

    fn rows(&self, table: &str) -> Result<RowIter<'_>> {
        let table = self.load(table)?;
        Ok(Box::new(
            (0..table.len()).map(move |i| -> Result<Row> { Ok(table.rows()[i].clone()) }),
        ))
    }

    fn find_rows(&self, table: &str, column: &str, key: i64) -> Result<RowIter<'_>> {
        ensure_column(self, table, column)?;
        let mut source = self.load(table)?;
        if !source.has_index(column) {
            self.tables.borrow_mut().remove(table);
            Rc::make_mut(&mut source).create_index(column);
            self.tables
                .borrow_mut()
                .insert(table.to_string(), Rc::clone(&source));
        }

        let positions = source
            .lookup(column, key)
            .map(<[usize]>::to_vec)
            .unwrap_or_default();
        Ok(Box::new(positions.into_iter().map(
            move |i| -> Result<Row> { Ok(source.rows()[i].clone()) },
        )))
    }
}

/// Run a tool to completion and return its stdout
fn run(mut command: Command) -> Result<Vec<u8>> {
    let tool = command.get_program().to_string_lossy().to_string();
    debug!("Running {:?}", command);
    let output = command
        .output()
        .map_err(|source| EcofiError::ToolMissing {
            tool: tool.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(EcofiError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}

/// Parse `mdb-export` CSV output into a typed table
pub(crate) fn parse_export(csv: Vec<u8>, config: &MdbToolsConfig) -> Result<MemoryTable> {
    if csv.iter().all(u8::is_ascii_whitespace) {
        return Ok(MemoryTable::default());
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(csv))
        .finish()?;

    frame_to_table(&frame, config)
}

fn frame_to_table(frame: &DataFrame, config: &MdbToolsConfig) -> Result<MemoryTable> {
    let mut table = MemoryTable::new(
        frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string()),
    );

    for position in 0..frame.height() {
        let mut row = Row::new();
        for column in frame.get_columns() {
            let name = column.name().as_str();
            if let Some(value) = cell_value(column.get(position)?) {
                let value = if config.is_date_column(name) {
                    date_value(value, &config.datetime_format)
                } else {
                    value
                };
                row.insert(name, value);
            }
        }
        table.push(row);
    }

    Ok(table)
}

fn cell_value(value: AnyValue<'_>) -> Option<Value> {
    match value {
        AnyValue::Null => None,
        AnyValue::Boolean(v) => Some(Value::Boolean(v)),
        AnyValue::Int32(v) => Some(Value::Int(i64::from(v))),
        AnyValue::Int64(v) => Some(Value::Int(v)),
        AnyValue::UInt32(v) => Some(Value::Int(i64::from(v))),
        AnyValue::Float32(v) => Some(Value::Double(f64::from(v))),
        AnyValue::Float64(v) => Some(Value::Double(v)),
        AnyValue::String(v) => Some(Value::Text(v.to_string())),
        AnyValue::StringOwned(v) => Some(Value::Text(v.to_string())),
        other => Some(Value::Text(other.to_string())),
    }
}

/// Read a date column cell with the export layout; cells that do not match are left as they are
fn date_value(value: Value, format: &str) -> Value {
    let parsed = match &value {
        Value::Text(text) => parse_timestamp(text, format),
        Value::Int(v) => parse_timestamp(&v.to_string(), format),
        _ => None,
    };
    parsed.map_or(value, Value::DateTime)
}

fn parse_timestamp(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn access_header(signature: &[u8], version: u8) -> Vec<u8> {
        let mut header = vec![0u8; 0x80];
        header[..4].copy_from_slice(&FILE_MAGIC);
        header[4..4 + signature.len()].copy_from_slice(signature);
        header[VERSION_OFFSET] = version;
        header
    }

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_detects_engine_versions() {
        assert_eq!(
            AccessVersion::from_header(&access_header(JET_SIGNATURE, 0)),
            Some(AccessVersion::Jet3)
        );
        assert_eq!(
            AccessVersion::from_header(&access_header(JET_SIGNATURE, 1)),
            Some(AccessVersion::Jet4)
        );
        assert_eq!(
            AccessVersion::from_header(&access_header(ACE_SIGNATURE, 3)),
            Some(AccessVersion::Ace(3))
        );
        assert_eq!(AccessVersion::from_header(b"PK\x03\x04 not access"), None);
    }

    #[test]
    fn test_read_signature_rejects_other_files() {
        let text = write_temp(b"wscode,wsname\n1,A\n2,B\n3,C\n");
        assert!(matches!(
            read_signature(text.path()),
            Err(EcofiError::NotAccessDatabase { .. })
        ));

        let short = write_temp(&FILE_MAGIC);
        assert!(matches!(
            read_signature(short.path()),
            Err(EcofiError::NotAccessDatabase { .. })
        ));
    }

    #[test]
    fn test_open_checks_signature_only() {
        let file = write_temp(&access_header(ACE_SIGNATURE, 2));
        let database = MdbTools::default().open(file.path()).unwrap();
        assert_eq!(database.version(), AccessVersion::Ace(2));
        assert_eq!(database.path(), file.path());
    }

    #[test]
    fn test_missing_tools_are_reported() {
        let file = write_temp(&access_header(JET_SIGNATURE, 1));
        let empty_dir = TempDir::new().unwrap();
        let backend = MdbTools::new(MdbToolsConfig::default().with_tools_dir(empty_dir.path()));
        let database = backend.open(file.path()).unwrap();

        match database.table_names() {
            Err(EcofiError::ToolMissing { tool, .. }) => assert!(tool.ends_with("mdb-tables")),
            other => panic!("Expected ToolMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_reads_cell_types() {
        let csv = b"wscode,weatherdate,tmin,wsname\n\
                    1,2020-01-01 00:00:00,2.5,\"A\"\n\
                    2,2020-01-02 00:00:00,,\"B\"\n"
            .to_vec();
        let table = parse_export(csv, &MdbToolsConfig::default()).unwrap();

        assert_eq!(table.columns(), ["wscode", "weatherdate", "tmin", "wsname"]);
        assert_eq!(table.len(), 2);

        let first = &table.rows()[0];
        assert_eq!(first.get_int("wscode").unwrap(), Some(1));
        assert_eq!(first.get_double("tmin").unwrap(), Some(2.5));
        assert_eq!(first.get("wsname"), Some(&Value::from("A")));
        let date = first.get_date("weatherdate").unwrap().unwrap();
        assert_eq!(date.format("%Y%m%d").to_string(), "20200101");

        let second = &table.rows()[1];
        assert_eq!(second.get("tmin"), None);
    }

    #[test]
    fn test_parse_export_of_empty_output() {
        let table = parse_export(b"\n".to_vec(), &MdbToolsConfig::default()).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_date_like_text_stays_text() {
        let csv = b"wscode,wsname,wstype,weatherdate\n\
                    1,\"2020-01-01\",\"2021-06-30\",\"2020-01-01 00:00:00\"\n\
                    2,\"2020-01-02\",\"2021-07-01\",\"2020-01-02 00:00:00\"\n"
            .to_vec();
        let table = parse_export(csv, &MdbToolsConfig::default()).unwrap();

        let first = &table.rows()[0];
        assert_eq!(first.get("wsname"), Some(&Value::from("2020-01-01")));
        assert_eq!(first.get("wstype"), Some(&Value::from("2021-06-30")));
        assert_eq!(first.get("wsname").unwrap().to_string(), "2020-01-01");
        let date = first.get_date("weatherdate").unwrap().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_time(NaiveTime::MIN));
    }

    #[test]
    fn test_date_columns_use_export_layout() {
        let config = MdbToolsConfig::default().with_datetime_format("%d/%m/%Y");
        let csv = b"wscode,weatherdate,wsname\n\
                    1,15/03/2021,\"15/03/2021\"\n\
                    2,not a date,\"x\"\n"
            .to_vec();
        let table = parse_export(csv, &config).unwrap();

        let date = table.rows()[0].get_date("weatherdate").unwrap().unwrap();
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2021, 3, 15).unwrap());
        assert_eq!(table.rows()[0].get("wsname"), Some(&Value::from("15/03/2021")));
        assert!(matches!(
            table.rows()[1].get_date("weatherdate"),
            Err(EcofiError::CellType { .. })
        ));
    }

    #[test]
    fn test_compact_date_layout_read_from_integers() {
        let config = MdbToolsConfig::default().with_datetime_format("%Y%m%d");
        let table = parse_export(b"wscode,weatherdate\n1,20200131\n".to_vec(), &config).unwrap();

        let date = table.rows()[0].get_date("weatherdate").unwrap().unwrap();
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
    }

    #[cfg(unix)]
    mod stub_tools {
        use super::*;
        use crate::source::format_double;
        use crate::translator::EcofiTranslator;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        const WS_CSV: &str = "wscode,wsname,wslat,wstype\n\
                              1,\"A\",45.0,\"2020-01-01\"\n\
                              2,\"B\",,\"2020-02-01\"\n";

        const WDATADAY_CSV: &str = "wscode,weatherdate,tmin,windtot\n\
                                    2,\"2020-01-01 00:00:00\",5.0,1.0\n\
                                    1,\"2020-01-01 00:00:00\",2.0,3.0\n\
                                    2,\"2020-01-02 00:00:00\",6.0,\n\
                                    1,\"2020-01-02 00:00:00\",3.0,\n";

        const MDB_TABLES_SCRIPT: &str = "#!/bin/sh\nprintf 'ws\\nwdataday\\nlookup\\n'\n";

        // Serves <table>.csv from its own directory and logs each export
        const MDB_EXPORT_SCRIPT: &str = r#"#!/bin/sh
dir=$(dirname "$0")
for table; do :; done
echo "$table" >> "$dir/exports.log"
cat "$dir/$table.csv"
"#;

        fn install(dir: &Path, name: &str, script: &str) {
            let path = dir.join(name);
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        fn tools_dir() -> TempDir {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("ws.csv"), WS_CSV).unwrap();
            fs::write(dir.path().join("wdataday.csv"), WDATADAY_CSV).unwrap();
            install(dir.path(), "mdb-tables", MDB_TABLES_SCRIPT);
            install(dir.path(), "mdb-export", MDB_EXPORT_SCRIPT);
            dir
        }

        fn exports(dir: &Path) -> Vec<String> {
            fs::read_to_string(dir.join("exports.log"))
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        fn backend(dir: &Path) -> MdbTools {
            MdbTools::new(MdbToolsConfig::default().with_tools_dir(dir))
        }

        #[test]
        fn test_translates_access_file() {
            let tools = tools_dir();
            let file = write_temp(&access_header(ACE_SIGNATURE, 2));

            let translator = EcofiTranslator::new(backend(tools.path()));
            let (dataset, stats) = translator.read_with_stats(file.path());

            assert!(stats.is_complete());
            assert_eq!(dataset.len(), 2);

            let first = &dataset.weathers()[0];
            assert_eq!(first.get("wst_id"), Some("1"));
            assert_eq!(first.get("wst_name"), Some("A"));
            assert_eq!(first.get("wst_lat"), Some("45.0"));
            assert_eq!(first.get("ecofi_wstype"), Some("2020-01-01"));
            let days = first.daily_weather();
            assert_eq!(days.len(), 2);
            assert_eq!(days.get(0).unwrap().get("w_date"), Some("20200101"));
            assert_eq!(days.get(0).unwrap().get("tmin"), Some("2.0"));
            assert_eq!(
                days.get(0).unwrap().get("wind"),
                Some(format_double(3.0 * 86.4).as_str())
            );
            assert_eq!(days.get(1).unwrap().get("w_date"), Some("20200102"));
            assert!(!days.get(1).unwrap().contains_key("wind"));

            let second = &dataset.weathers()[1];
            assert_eq!(second.get("wst_id"), Some("2"));
            assert!(!second.fields().contains_key("wst_lat"));
            let tmin: Vec<&str> = second
                .daily_weather()
                .iter()
                .filter_map(|day| day.get("tmin"))
                .collect();
            assert_eq!(tmin, ["5.0", "6.0"]);
            assert_eq!(second.daily_weather().get(0).unwrap().get("wind"), Some("86.4"));

            assert_eq!(exports(tools.path()), ["ws", "wdataday"]);
        }

        #[test]
        fn test_lookup_index_built_once() {
            let tools = tools_dir();
            let file = write_temp(&access_header(JET_SIGNATURE, 1));
            let database = backend(tools.path()).open(file.path()).unwrap();

            let names: Vec<String> = database.table_names().unwrap().into_iter().collect();
            assert_eq!(names, ["lookup", "wdataday", "ws"]);

            let tmin_for = |code: i64| -> Vec<f64> {
                database
                    .find_rows("wdataday", "wscode", code)
                    .unwrap()
                    .map(|row| row.unwrap().get_double("tmin").unwrap().unwrap())
                    .collect()
            };

            assert_eq!(tmin_for(1), [2.0, 3.0]);
            let indexed = Rc::clone(&database.tables.borrow()["wdataday"]);
            assert!(indexed.has_index("wscode"));

            assert_eq!(tmin_for(2), [5.0, 6.0]);
            assert_eq!(tmin_for(3), Vec::<f64>::new());
            assert!(Rc::ptr_eq(&indexed, &database.tables.borrow()["wdataday"]));

            assert_eq!(database.rows("ws").unwrap().count(), 2);
            assert_eq!(database.rows("ws").unwrap().count(), 2);
            assert_eq!(exports(tools.path()), ["wdataday", "ws"]);
        }
    }
}
