pub mod payload;
pub mod record;
pub mod report;
pub mod season;
pub mod vote;

pub use payload::AnimePayload;
pub use record::{RawListEntry, RawSeriesInfo, RecordConversionError, TrackingRecord, WatchStatus};
pub use report::{RunError, RunSummary, SeasonStats};
pub use season::{
    add_weeks, chronological, days_between, format_date, generate_season_tag, parse_sheet_date,
    Season,
    SeasonName,
};
pub use vote::{parse_vote_cell, VoteCell};
