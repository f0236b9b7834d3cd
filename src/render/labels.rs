//! Fixed display lookups for item kinds, transport modes and checks.

use crate::{
    audit::CheckKind,
    types::{ItemKind, TransportMode},
};

impl ItemKind {
    /// Japanese display label. `Other` doubles as the fallback entry.
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Meetup => "集合",
            ItemKind::Move => "移動",
            ItemKind::Meal => "食事",
            ItemKind::Cafe => "カフェ",
            ItemKind::Activity => "アクティビティ",
            ItemKind::Shopping => "ショッピング",
            ItemKind::Rest => "休憩",
            ItemKind::Breakup => "解散",
            ItemKind::Other => "その他",
        }
    }

    /// Badge colour classes. `Other` doubles as the fallback entry.
    pub fn color_class(&self) -> &'static str {
        match self {
            ItemKind::Meetup => "bg-blue-100 text-blue-800",
            ItemKind::Move => "bg-gray-100 text-gray-800",
            ItemKind::Meal => "bg-orange-100 text-orange-800",
            ItemKind::Cafe => "bg-amber-100 text-amber-800",
            ItemKind::Activity => "bg-green-100 text-green-800",
            ItemKind::Shopping => "bg-pink-100 text-pink-800",
            ItemKind::Rest => "bg-purple-100 text-purple-800",
            ItemKind::Breakup => "bg-red-100 text-red-800",
            ItemKind::Other => "bg-slate-100 text-slate-800",
        }
    }
}

impl TransportMode {
    /// `None` for `Unspecified`, which the meta strip suppresses.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TransportMode::Walk => Some("徒歩"),
            TransportMode::Transit => Some("公共交通機関"),
            TransportMode::Car => Some("車"),
            TransportMode::Unspecified => None,
        }
    }
}

impl CheckKind {
    pub fn caption(&self) -> &'static str {
        match self {
            CheckKind::TimeWindow => "集合・解散時刻どおり",
            CheckKind::Continuity => "行程に空き・重複なし",
            CheckKind::Rounding => "30分単位",
        }
    }
}

pub fn check_glyph(passed: bool) -> &'static str {
    if passed {
        "✅"
    } else {
        "❌"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_uses_other_entries() {
        let kind = ItemKind::from_tag("unknown_type_xyz");
        assert_eq!(kind.label(), ItemKind::Other.label());
        assert_eq!(kind.color_class(), ItemKind::Other.color_class());
    }

    #[test]
    fn test_every_kind_has_distinct_color() {
        let mut classes: Vec<_> = ItemKind::ALL.iter().map(|k| k.color_class()).collect();
        classes.sort_unstable();
        classes.dedup();
        assert_eq!(classes.len(), ItemKind::ALL.len());
    }

    #[test]
    fn test_unspecified_transport_has_no_label() {
        assert_eq!(TransportMode::Unspecified.label(), None);
        assert_eq!(TransportMode::Walk.label(), Some("徒歩"));
    }

    #[test]
    fn test_check_captions_and_glyphs() {
        assert_eq!(CheckKind::Rounding.caption(), "30分単位");
        assert_eq!(check_glyph(true), "✅");
        assert_eq!(check_glyph(false), "❌");
    }
}
