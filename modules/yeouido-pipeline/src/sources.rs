/// Naver News section listing pages. Section pages share one markup family:
/// a card list under `.sa_list` and a load-more control labeled 기사 더보기.
pub const SECTION_BASE_URL: &str = "https://news.naver.com/section";

/// Default sections: politics (100), economy (101), society (102).
pub const DEFAULT_SECTIONS: &[&str] = &["100", "101", "102"];

pub fn section_url(section_id: &str) -> String {
    format!("{SECTION_BASE_URL}/{section_id}")
}
