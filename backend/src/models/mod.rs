pub mod course;
pub mod interval;
pub mod macros;
pub mod meeting;
pub mod time;

pub use course::*;
pub use interval::*;
pub use meeting::*;
pub use time::{format_hhmm, minutes_of_day, parse_hhmm, time_from_minutes, weekday_name};

crate::define_id_type!(i64, StudentId);
