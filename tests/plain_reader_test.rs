use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use typed_table::config::Config;
use typed_table::data::column::SortOrder;
use typed_table::data::plain_reader::{PlainReader, RegexFormatter};
use typed_table::data::value::CellValue;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file.flush().unwrap();
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

#[test]
fn test_read_csv_file_from_disk() {
    let file = write_temp(
        "# exported sales\n\
         Date,Item,Sales,Paid\n\
         2014-1-1,Printer,10,yes\n\
         2014-1-9,Printer,2,no\n\
         2014-2-3,Scanner,7,yes\n",
    );

    let reader = PlainReader::new();
    let mut table = reader.read(&path_of(&file)).unwrap();

    assert_eq!(table.row_count(), 3);
    assert_eq!(
        table.type_descriptors(),
        vec!["date(y-M-d)", "string", "number", "boolean(YES_NO)"]
    );

    let stats = reader.read_stats();
    assert_eq!(stats.lines, 5);
    assert_eq!(stats.comments, 1);
    assert_eq!(stats.rows, 3);

    table.sort("Date", SortOrder::Desc).unwrap();
    assert_eq!(table.get_formatted_row(0).unwrap()[0], "2014-2-3");
}

#[test]
fn test_read_tsv_without_header() {
    let file = write_temp("10:30\tAlpha\n09:15\tBeta\n");

    let table = PlainReader::new()
        .read_tsv(&path_of(&file), false)
        .unwrap();

    assert_eq!(table.headers(), vec!["0", "1"]);
    assert_eq!(table.type_descriptors(), vec!["time(HH:mm)", "string"]);
    assert_eq!(table.get_formatted_column(0).unwrap(), vec!["10:30", "09:15"]);
}

#[test]
fn test_formatter_and_validator_on_file() {
    let file = write_temp(
        "Day,Amount\n\
         21.4.2014,5\n\
         22.4.2014,-3\n\
         23.4.2014,8\n",
    );

    let mut reader = PlainReader::new();
    reader
        .set_formatter(0, RegexFormatter::new(r"^(\d+)\.(\d+)\.(\d+)$", "$3-$2-$1").unwrap())
        .set_validator(1, |value: &str| !value.starts_with('-'));
    let table = reader.read_csv(&path_of(&file), true).unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.type_descriptors()[0], "date(y-M-d)");
    assert_eq!(
        table.get_formatted_column(0).unwrap(),
        vec!["2014-4-21", "2014-4-23"]
    );
    assert_eq!(table.get_column(1).unwrap()[1], CellValue::Number(8.0));
    assert_eq!(reader.read_stats().dropped, 1);
}

#[test]
fn test_reader_driven_by_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[reader]
delimiter = ";"
comment = "--"
types = ["", "string"]
names = ["When"]
"#,
    )
    .unwrap();
    let data_path = dir.path().join("data.txt");
    fs::write(&data_path, "-- header follows\nDate;Code\n2014-1-1;007\n").unwrap();

    let config = Config::load_from(&config_path).unwrap();
    let reader = PlainReader::from_config(&config.reader);
    let table = reader
        .read_with(
            &data_path.to_string_lossy(),
            &config.reader.delimiter,
            config.reader.header,
        )
        .unwrap();

    assert_eq!(table.headers(), vec!["When", "Code"]);
    assert_eq!(table.type_descriptors(), vec!["date(y-M-d)", "string"]);
    assert_eq!(table.get_formatted_row(0).unwrap(), vec!["2014-1-1", "007"]);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");
    let missing = missing.to_string_lossy();

    let err = PlainReader::new().read(&missing).unwrap_err();
    assert!(
        format!("{:#}", err).contains(&*missing),
        "Error should name the file: {:#}",
        err
    );
}

#[test]
fn test_empty_file_is_an_error() {
    let file = write_temp("");
    assert!(PlainReader::new().read(&path_of(&file)).is_err());

    let file = write_temp("# only comments\n");
    assert!(PlainReader::new().read(&path_of(&file)).is_err());
}
