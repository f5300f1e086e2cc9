//! 投票格解析
//!
//! 投票表的每个单元格都是固定格式：`Ep. NN: X to Y`，
//! 另外还有轮空标记 `BYE` 和空白格。

use serde::{Deserialize, Serialize};

/// 投票格前缀
pub const VOTE_CELL_PREFIX: &str = "Ep. ";

/// 第一集投票格前缀（用于推断开播日期）
pub const FIRST_EPISODE_PREFIX: &str = "Ep. 01";

/// 轮空标记
pub const BYE_MARKER: &str = "BYE";

/// 一个投票格的解析结果
///
/// 数值字段为 `None` 表示该部分无法解析（相当于 NaN），
/// 调用方必须显式检查 [`VoteCell::is_valid`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCell {
    /// 单元格在行中的位置（第 0 列是标题）
    pub week_index: usize,
    pub episode: Option<u32>,
    pub votes_for: Option<u32>,
    pub votes_against: Option<u32>,
}

impl VoteCell {
    /// 三个数值字段是否都解析成功
    pub fn is_valid(&self) -> bool {
        self.episode.is_some() && self.votes_for.is_some() && self.votes_against.is_some()
    }

    /// 反对票严格多于赞成票时才算被投下，平票算通过
    ///
    /// 票数无法解析时返回 `false`，调用方应先检查 [`VoteCell::is_valid`]。
    pub fn is_voted_off(&self) -> bool {
        matches!((self.votes_for, self.votes_against), (Some(f), Some(a)) if f < a)
    }
}

/// 解析一个投票格
///
/// 按单个空格切分：第 1 段去掉末尾冒号是集数，第 2 段是赞成票，第 4 段是反对票。
/// 每段都只取开头的数字部分，任何输入都不会 panic。
///
/// # 示例
/// ```
/// use fridayfellows_updater::models::parse_vote_cell;
///
/// let cell = parse_vote_cell(5, "Ep. 01: 3 to 4");
/// assert_eq!(cell.episode, Some(1));
/// assert_eq!(cell.votes_against, Some(4));
/// ```
pub fn parse_vote_cell(week_index: usize, raw: &str) -> VoteCell {
    let parts: Vec<&str> = raw.split(' ').collect();

    let episode = parts
        .get(1)
        .map(|p| p.strip_suffix(':').unwrap_or(p))
        .and_then(|p| parse_leading_int(p));
    let votes_for = parts.get(2).and_then(|p| parse_leading_int(p));
    let votes_against = parts.get(4).and_then(|p| parse_leading_int(p));

    VoteCell {
        week_index,
        episode,
        votes_for,
        votes_against,
    }
}

/// 只解析字符串开头的连续数字，遇到第一个非数字字符即停止
fn parse_leading_int(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}

/// 是否为投票格
pub fn is_vote_cell(cell: &str) -> bool {
    cell.starts_with(VOTE_CELL_PREFIX)
}

/// 是否为轮空标记
pub fn is_bye(cell: &str) -> bool {
    cell.trim() == BYE_MARKER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vote_cell_keeps_week_index() {
        let cell = parse_vote_cell(5, "Ep. 01: 3 to 4");
        assert_eq!(cell.week_index, 5);
    }

    #[test]
    fn test_parse_vote_cell_well_formed() {
        let cell = parse_vote_cell(1, "Ep. 01: 3 to 4");
        assert_eq!(
            cell,
            VoteCell {
                week_index: 1,
                episode: Some(1),
                votes_for: Some(3),
                votes_against: Some(4),
            }
        );
        assert!(cell.is_valid());
    }

    #[test]
    fn test_parse_vote_cell_two_digit_votes() {
        let cell = parse_vote_cell(9, "Ep. 24: 12 to 10");
        assert_eq!(cell.episode, Some(24));
        assert_eq!(cell.votes_for, Some(12));
        assert_eq!(cell.votes_against, Some(10));
    }

    #[test]
    fn test_parse_vote_cell_invalid_episode() {
        let cell = parse_vote_cell(1, "Ep. ZZ: 3 to 4");
        assert_eq!(cell.episode, None);
        assert_eq!(cell.votes_for, Some(3));
        assert!(!cell.is_valid());
    }

    #[test]
    fn test_parse_vote_cell_invalid_votes_for() {
        let cell = parse_vote_cell(1, "Ep. 01: ZZ to 4");
        assert_eq!(cell.votes_for, None);
        assert_eq!(cell.votes_against, Some(4));
    }

    #[test]
    fn test_parse_vote_cell_invalid_votes_against() {
        let cell = parse_vote_cell(1, "Ep. 01: 3 to ZZ");
        assert_eq!(cell.votes_against, None);
        assert!(!cell.is_valid());
    }

    #[test]
    fn test_parse_vote_cell_garbage_never_panics() {
        for raw in ["", "BYE", "Ep.", "Ep. ", "🎉 🎉 🎉", "Ep. 1"] {
            let cell = parse_vote_cell(3, raw);
            assert!(!cell.is_valid(), "{:?} 不应被视为有效", raw);
        }
    }

    #[test]
    fn test_leading_int_stops_at_non_digit() {
        assert_eq!(parse_leading_int("07x"), Some(7));
        assert_eq!(parse_leading_int("x07"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_tie_is_not_voted_off() {
        assert!(!parse_vote_cell(1, "Ep. 03: 3 to 3").is_voted_off());
        assert!(parse_vote_cell(1, "Ep. 03: 3 to 4").is_voted_off());
        assert!(!parse_vote_cell(1, "Ep. 03: x to 4").is_voted_off());
    }

    #[test]
    fn test_cell_markers() {
        assert!(is_vote_cell("Ep. 02: 1 to 0"));
        assert!(!is_vote_cell("BYE"));
        assert!(is_bye("BYE"));
        assert!(!is_bye(""));
    }
}
