// Loader and dataset slot tests
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use tempfile::NamedTempFile;

use taxi_trip_analytics::{
    data::{parse_timestamp, source_for_path, Column, CsvSource, DataError, DataSource, JsonSource},
    storage::{DatasetSlot, StorageError},
};

const HEADER: &str = "VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,\
trip_distance,PULocationID,DOLocationID,payment_type,fare_amount,tip_amount,total_amount,\
congestion_surcharge,Airport_fee";

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_source() {
    // Create a CSV file with one complete row and one sparse row
    let contents = format!(
        "{}\n\
         2,2024-01-01 00:57:55,2024-01-01 01:17:43,1.0,1.72,186,79,2,17.7,0.0,22.7,2.5,0.0\n\
         1,2024-01-01 03:00:00,2024-01-01 03:10:00,,2.5,140,236,1,10.0,,15.0,,\n",
        HEADER
    );
    let file = write_temp(".csv", &contents);

    let source = CsvSource::new(file.path(), ',');
    let dataset = source.read().unwrap();

    assert_eq!(dataset.len(), 2);

    let first = dataset.get_row(0).unwrap();
    assert_eq!(first.vendor_id, Some(2));
    // Integral floats load into integer columns
    assert_eq!(first.passenger_count, Some(1));
    assert_eq!(first.pickup_datetime, Some(parse_timestamp("2024-01-01 00:57:55").unwrap()));
    assert_eq!(first.total_amount, Some(22.7));

    let second = dataset.get_row(1).unwrap();
    assert_eq!(second.passenger_count, None);
    assert_eq!(second.tip_amount, None);
    assert_eq!(second.airport_fee, None);

    assert_eq!(dataset.null_count(Column::CongestionSurcharge), 1);
}

#[test]
fn test_csv_headers_ignore_case_and_extra_columns() {
    let contents = "store_and_fwd_flag,vendorid,TPEP_PICKUP_DATETIME,tpep_dropoff_datetime,\
passenger_count,trip_distance,PULocationID,DOLocationID,payment_type,fare_amount,tip_amount,\
total_amount,congestion_surcharge,airport_fee\n\
N,1,2024-01-01T08:00:00,2024-01-01T08:30:00,2,3.0,10,20,1,12.0,2.0,16.0,2.5,1.75\n";
    let dataset = CsvSource::read_from(contents.as_bytes(), ',').unwrap();

    let row = dataset.get_row(0).unwrap();
    assert_eq!(row.vendor_id, Some(1));
    assert_eq!(row.airport_fee, Some(1.75));
}

#[test]
fn test_csv_custom_delimiter() {
    let contents = format!(
        "{}\n1;2024-01-01;2024-01-01 00:20:00;1;1.0;1;2;1;5.0;1.0;7.0;0;0\n",
        HEADER.replace(',', ";")
    );
    let dataset = CsvSource::read_from(contents.as_bytes(), ';').unwrap();

    assert_eq!(dataset.len(), 1);
    // Date-only timestamps mean midnight
    assert_eq!(
        dataset.get_row(0).unwrap().pickup_datetime,
        Some(parse_timestamp("2024-01-01 00:00:00").unwrap())
    );
}

#[test]
fn test_csv_missing_column() {
    let contents = HEADER.replace(",Airport_fee", "") + "\n";
    let result = CsvSource::read_from(contents.as_bytes(), ',');

    match result {
        Err(DataError::MissingColumn(name)) => assert_eq!(name, "Airport_fee"),
        other => panic!("Expected a missing column error, got {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn test_csv_parse_errors() {
    let bad_number = format!(
        "{}\n1,2024-01-01,2024-01-01,1,far,1,2,1,5.0,1.0,7.0,0,0\n",
        HEADER
    );
    assert!(matches!(
        CsvSource::read_from(bad_number.as_bytes(), ','),
        Err(DataError::ParseError(_))
    ));

    let fractional_id = format!(
        "{}\n1.5,2024-01-01,2024-01-01,1,1.0,1,2,1,5.0,1.0,7.0,0,0\n",
        HEADER
    );
    assert!(matches!(
        CsvSource::read_from(fractional_id.as_bytes(), ','),
        Err(DataError::ParseError(_))
    ));

    let bad_timestamp = format!(
        "{}\n1,yesterday,2024-01-01,1,1.0,1,2,1,5.0,1.0,7.0,0,0\n",
        HEADER
    );
    assert!(matches!(
        CsvSource::read_from(bad_timestamp.as_bytes(), ','),
        Err(DataError::ParseError(_))
    ));
}

#[test]
fn test_json_source() {
    let contents = r#"[
        {"VendorID": 2, "tpep_pickup_datetime": "2024-01-01 10:00:00",
         "tpep_dropoff_datetime": "2024-01-01 10:15:00", "passenger_count": 1.0,
         "trip_distance": 3, "fare_amount": 14.2, "total_amount": 18.5,
         "Airport_fee": null, "store_and_fwd_flag": "N"},
        {"VendorID": 1, "payment_type": 2}
    ]"#;
    let file = write_temp(".json", contents);

    let dataset = JsonSource::new(file.path()).read().unwrap();

    assert_eq!(dataset.len(), 2);

    let first = dataset.get_row(0).unwrap();
    assert_eq!(first.passenger_count, Some(1));
    assert_eq!(first.trip_distance, Some(3.0));
    assert_eq!(first.airport_fee, None);
    assert_eq!(first.duration_minutes(), Some(15.0));

    let second = dataset.get_row(1).unwrap();
    assert_eq!(second.payment_type, Some(2));
    assert_eq!(second.pickup_datetime, None);
}

#[test]
fn test_json_rejects_non_array() {
    let result = JsonSource::read_from(r#"{"VendorID": 1}"#.as_bytes());
    assert!(matches!(result, Err(DataError::ParseError(_))));

    let result = JsonSource::read_from(r#"[{"VendorID": "two"}]"#.as_bytes());
    assert!(matches!(result, Err(DataError::ParseError(_))));
}

#[test]
fn test_source_for_path() {
    let file = write_temp(".json", r#"[{"VendorID": 1}]"#);
    let source = source_for_path(file.path(), ',');

    assert_eq!(source.read().unwrap().len(), 1);
}

#[test]
fn test_missing_file() {
    let source = CsvSource::new("/nonexistent/trips.csv", ',');
    assert!(matches!(source.read(), Err(DataError::IoError(_))));
}

#[test]
fn test_dataset_slot() {
    let slot = DatasetSlot::new();
    assert!(!slot.is_initialized());
    assert!(matches!(slot.current(), Err(StorageError::NotInitialized)));

    let contents = format!(
        "{}\n1,2024-01-01,2024-01-01 00:20:00,1,1.0,1,2,1,5.0,1.0,7.0,0,0\n",
        HEADER
    );
    let file = write_temp(".csv", &contents);

    let loaded = slot.load(&CsvSource::new(file.path(), ',')).unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(slot.is_initialized());

    // The slot is filled once
    let again = slot.load(&CsvSource::new(file.path(), ','));
    assert!(matches!(again, Err(StorageError::AlreadyInitialized)));
    assert_eq!(slot.current().unwrap().len(), 1);
}

#[test]
fn test_dataset_slot_load_failure_leaves_slot_empty() {
    let slot = DatasetSlot::new();
    let result = slot.load(&CsvSource::new("/nonexistent/trips.csv", ','));

    assert!(matches!(result, Err(StorageError::DataError(DataError::IoError(_)))));
    assert!(!slot.is_initialized());
}
