/// Asset identifiers are free-form strings (e.g. `BR-P3`).
pub type AssetId = String;

/// Sensor identifiers are unique per asset (e.g. `DISP-P3-02`).
pub type SensorId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
