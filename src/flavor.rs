//! Display text: rank titles, excuses, grade and course labels
//!
//! None of this affects gameplay.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::sim::{Grade, UnitLabel};

/// Reasons given for being held back, one is picked per game over
pub const EXCUSES: [&str; 11] = [
    "目覚まし時計が壊れました",
    "電車が遅延しました（嘘）",
    "教授の滑舌が悪すぎました",
    "レポートの提出先を間違えました",
    "前日に飲みすぎました",
    "人生という名の授業に出席していました",
    "布団が離してくれませんでした",
    "なぜか教室に入れませんでした",
    "モラトリアムを恐れた計画的留年ですね",
    "勉強時間よりもバイトを優先しすぎました",
    "出席確認代行がバレました",
];

/// Rank title thresholds (exclusive upper bound, title)
const RANKS: [(u64, &str); 6] = [
    (10, "ピカピカの1年生"),
    (30, "慣れてきた2年生"),
    (60, "レポートに追われる3年生"),
    (100, "悟りを開いた4年生"),
    (120, "え！内定先あるのに卒業単位が1単位だけ足りない？！5年生"),
    (150, "伝説の留年王"),
];

const TOP_RANK: &str = "単位の神 (GOD)";

/// Always shown while playing
pub const ALERT: &str = "フル単必須！";
/// Extra alert once the player is panicking
pub const PANIC_ALERT: &str = "ヤバイ！";

pub fn rank_title(score: u64) -> &'static str {
    RANKS
        .iter()
        .find(|(limit, _)| score < *limit)
        .map(|(_, title)| *title)
        .unwrap_or(TOP_RANK)
}

/// Alerts shown in the HUD while playing
pub fn alert_text(score: u64, panic_threshold: u64) -> Vec<&'static str> {
    if score > panic_threshold {
        vec![ALERT, PANIC_ALERT]
    } else {
        vec![ALERT]
    }
}

pub fn pick_excuse<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    EXCUSES.choose(rng).copied().unwrap_or(EXCUSES[0])
}

impl UnitLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitLabel::Required => "必修",
            UnitLabel::Elective => "選択",
            UnitLabel::Lab => "実験",
            UnitLabel::Language => "語学",
            UnitLabel::PhysEd => "体育",
        }
    }
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Excellent => "秀",
            Grade::Superior => "優",
            Grade::Good => "良",
            Grade::Passing => "可",
        }
    }

    /// CSS color for the popup text
    pub fn css_color(&self) -> &'static str {
        match self {
            Grade::Excellent => "#fbbf24",
            Grade::Superior => "#38bdf8",
            Grade::Good | Grade::Passing => "#ffffff",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(rank_title(0), "ピカピカの1年生");
        assert_eq!(rank_title(9), "ピカピカの1年生");
        assert_eq!(rank_title(10), "慣れてきた2年生");
        assert_eq!(rank_title(99), "悟りを開いた4年生");
        assert_eq!(rank_title(149), "伝説の留年王");
        assert_eq!(rank_title(150), TOP_RANK);
        assert_eq!(rank_title(u64::MAX), TOP_RANK);
    }

    #[test]
    fn test_excuse_comes_from_pool() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..50 {
            assert!(EXCUSES.contains(&pick_excuse(&mut rng)));
        }
    }

    #[test]
    fn test_panic_alert_after_threshold() {
        assert_eq!(alert_text(50, 50), vec![ALERT]);
        assert_eq!(alert_text(51, 50), vec![ALERT, PANIC_ALERT]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Grade::Excellent.as_str(), "秀");
        assert_eq!(Grade::Passing.as_str(), "可");
        assert_eq!(UnitLabel::Lab.as_str(), "実験");
    }
}
