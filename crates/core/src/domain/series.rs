use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar reduced to the only field the trend fit consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}
