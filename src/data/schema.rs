// Trip record schema
// Author: Gabriel Demetrios Lafis

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use super::{DataError, Record, Value};

/// Represents a data type for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Float,
    Timestamp,
}

/// Columns of the trip schema, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    VendorId,
    PickupDatetime,
    DropoffDatetime,
    PassengerCount,
    TripDistance,
    PuLocationId,
    DoLocationId,
    PaymentType,
    FareAmount,
    TipAmount,
    TotalAmount,
    CongestionSurcharge,
    AirportFee,
}

impl Column {
    /// All columns in schema order
    pub const ALL: [Column; 13] = [
        Column::VendorId,
        Column::PickupDatetime,
        Column::DropoffDatetime,
        Column::PassengerCount,
        Column::TripDistance,
        Column::PuLocationId,
        Column::DoLocationId,
        Column::PaymentType,
        Column::FareAmount,
        Column::TipAmount,
        Column::TotalAmount,
        Column::CongestionSurcharge,
        Column::AirportFee,
    ];

    /// Canonical column name, as found in the trip data files
    pub fn name(&self) -> &'static str {
        match self {
            Column::VendorId => "VendorID",
            Column::PickupDatetime => "tpep_pickup_datetime",
            Column::DropoffDatetime => "tpep_dropoff_datetime",
            Column::PassengerCount => "passenger_count",
            Column::TripDistance => "trip_distance",
            Column::PuLocationId => "PULocationID",
            Column::DoLocationId => "DOLocationID",
            Column::PaymentType => "payment_type",
            Column::FareAmount => "fare_amount",
            Column::TipAmount => "tip_amount",
            Column::TotalAmount => "total_amount",
            Column::CongestionSurcharge => "congestion_surcharge",
            Column::AirportFee => "Airport_fee",
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Column::PickupDatetime | Column::DropoffDatetime => DataType::Timestamp,
            Column::VendorId
            | Column::PassengerCount
            | Column::PuLocationId
            | Column::DoLocationId
            | Column::PaymentType => DataType::Integer,
            Column::TripDistance
            | Column::FareAmount
            | Column::TipAmount
            | Column::TotalAmount
            | Column::CongestionSurcharge
            | Column::AirportFee => DataType::Float,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = DataError;

    /// Resolve a column by name, ignoring ASCII case
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|column| column.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))
    }
}

/// One taxi trip
///
/// Every field is independently nullable. No ordering is enforced between
/// pickup and dropoff, and monetary fields may be negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripRecord {
    pub vendor_id: Option<i64>,
    pub pickup_datetime: Option<NaiveDateTime>,
    pub dropoff_datetime: Option<NaiveDateTime>,
    pub passenger_count: Option<i64>,
    pub trip_distance: Option<f64>,
    pub pu_location_id: Option<i64>,
    pub do_location_id: Option<i64>,
    pub payment_type: Option<i64>,
    pub fare_amount: Option<f64>,
    pub tip_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub congestion_surcharge: Option<f64>,
    pub airport_fee: Option<f64>,
}

impl TripRecord {
    /// Get the value of a column
    pub fn get(&self, column: Column) -> Value {
        match column {
            Column::PickupDatetime => self.pickup_datetime.into(),
            Column::DropoffDatetime => self.dropoff_datetime.into(),
            _ => match column.data_type() {
                DataType::Integer => self.integer(column).into(),
                _ => self.float(column).into(),
            },
        }
    }

    /// Get an integer column; `None` for absent values and non-integer columns
    pub fn integer(&self, column: Column) -> Option<i64> {
        match column {
            Column::VendorId => self.vendor_id,
            Column::PassengerCount => self.passenger_count,
            Column::PuLocationId => self.pu_location_id,
            Column::DoLocationId => self.do_location_id,
            Column::PaymentType => self.payment_type,
            _ => None,
        }
    }

    /// Get a numeric column as a float, widening integer columns
    pub fn float(&self, column: Column) -> Option<f64> {
        match column {
            Column::TripDistance => self.trip_distance,
            Column::FareAmount => self.fare_amount,
            Column::TipAmount => self.tip_amount,
            Column::TotalAmount => self.total_amount,
            Column::CongestionSurcharge => self.congestion_surcharge,
            Column::AirportFee => self.airport_fee,
            _ => self.integer(column).map(|i| i as f64),
        }
    }

    /// Get a timestamp column
    pub fn timestamp(&self, column: Column) -> Option<NaiveDateTime> {
        match column {
            Column::PickupDatetime => self.pickup_datetime,
            Column::DropoffDatetime => self.dropoff_datetime,
            _ => None,
        }
    }

    /// Sort key for ordering rows by any column
    ///
    /// Timestamps order by their offset from the epoch.
    pub fn ordinal(&self, column: Column) -> Option<f64> {
        match column.data_type() {
            DataType::Timestamp => self.timestamp(column).map(|ts| {
                let since_epoch = ts - NaiveDateTime::default();
                since_epoch.num_milliseconds() as f64 / 1000.0
            }),
            _ => self.float(column),
        }
    }

    /// Set a column from a loaded value
    ///
    /// Integer columns accept integral floats, since nullable integer columns
    /// are commonly exported as floats. Timestamp columns take strings.
    pub fn set(&mut self, column: Column, value: Value) -> Result<(), DataError> {
        let mismatch = |value: &Value| {
            DataError::ParseError(format!(
                "Column '{}' expects {:?}, got {:?}",
                column, column.data_type(), value
            ))
        };

        match column.data_type() {
            DataType::Timestamp => {
                let ts = match &value {
                    Value::Null => None,
                    Value::String(s) => Some(parse_timestamp(s)?),
                    other => return Err(mismatch(other)),
                };
                match column {
                    Column::PickupDatetime => self.pickup_datetime = ts,
                    _ => self.dropoff_datetime = ts,
                }
            }
            DataType::Integer => {
                let i = match &value {
                    Value::Null => None,
                    Value::Integer(i) => Some(*i),
                    Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
                    Value::Float(f) if f.is_nan() => None,
                    other => return Err(mismatch(other)),
                };
                match column {
                    Column::VendorId => self.vendor_id = i,
                    Column::PassengerCount => self.passenger_count = i,
                    Column::PuLocationId => self.pu_location_id = i,
                    Column::DoLocationId => self.do_location_id = i,
                    _ => self.payment_type = i,
                }
            }
            DataType::Float => {
                let f = match &value {
                    Value::Null => None,
                    Value::Float(f) if f.is_nan() => None,
                    other => Some(other.as_f64().ok_or_else(|| mismatch(other))?),
                };
                match column {
                    Column::TripDistance => self.trip_distance = f,
                    Column::FareAmount => self.fare_amount = f,
                    Column::TipAmount => self.tip_amount = f,
                    Column::TotalAmount => self.total_amount = f,
                    Column::CongestionSurcharge => self.congestion_surcharge = f,
                    _ => self.airport_fee = f,
                }
            }
        }

        Ok(())
    }

    /// Check whether a column is absent on this row
    pub fn is_null(&self, column: Column) -> bool {
        self.get(column).is_null()
    }

    /// Trip duration in minutes; negative when the timestamps are inverted
    pub fn duration_minutes(&self) -> Option<f64> {
        match (self.pickup_datetime, self.dropoff_datetime) {
            (Some(pickup), Some(dropoff)) => {
                let elapsed = dropoff - pickup;
                let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
                Some(seconds / 60.0)
            }
            _ => None,
        }
    }

    /// Render the row with canonical column names in schema order
    pub fn to_record(&self) -> Record {
        Column::ALL
            .iter()
            .map(|column| (column.name().to_string(), self.get(*column)))
            .collect()
    }
}

/// Parse a timestamp in any of the accepted formats
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (both with optional
/// fractional seconds) and a bare `YYYY-MM-DD`, which means midnight.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, DataError> {
    let input = input.trim();

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DataError::ParseError(format!("Invalid timestamp '{}'", input)))
}
