pub const POSITION_NAME: &str = "position_name";
pub const FULLNAME: &str = "fullname";
pub const FINAL_MATCH_RATE: &str = "final_match_rate";
pub const GRADE_NAME: &str = "grade_name";

pub const TV_PREFIX: &str = "tv_";
pub const BENCH_PREFIX: &str = "bench_";
pub const TGV_PREFIX: &str = "tgv_";

pub const GAP_TV: &str = "gap_tv";
pub const TGV_AVG: &str = "tgv_avg";

pub fn required_columns() -> &'static [&'static str] {
    &[POSITION_NAME, FULLNAME, FINAL_MATCH_RATE]
}
