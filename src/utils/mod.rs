mod time_utils;

pub use time_utils::{TimeUtils, epoch_sec_to_utc, format_request_time, is_zero_instant, parse_ledger_time};
