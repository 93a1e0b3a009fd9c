mod perf;
pub mod time_utils;

pub use time_utils::{AppInstant, format_ago, format_bar_time};
