//! Mapping from predicted labels to user-facing advice
//!
//! A fixed, declaration-ordered table. Multi-tag predictions flatten into one
//! advice string per fired tag; anything without a dedicated entry (including
//! the "all good" labels) gets the encouragement fallback.

use crate::labels::Label;

/// Tag -> advice sentence. Declaration order is the tie-break order for
/// anything that iterates the table.
pub const ADVICE: &[(&str, &str)] = &[
    (
        "Reduce Dining Out",
        "Consider cooking at home more often to save on dining expenses.",
    ),
    (
        "Cut Back on Leisure",
        "Try free or low-cost leisure activities to save money.",
    ),
    (
        "Consider Energy Saving Tips",
        "Look into energy-saving tips to reduce your utility bills.",
    ),
    (
        "Optimize Grocery Shopping",
        "Plan your grocery shopping better by making a list and sticking to it, and avoid shopping when hungry.",
    ),
    (
        "Review and Reduce Subscriptions",
        "Review your subscriptions and cancel those you rarely use.",
    ),
    (
        "Plan Travel More Efficiently",
        "Plan your travels in advance to get better deals and reduce impulsive expenses.",
    ),
    (
        "Limit Clothing Purchases",
        "Consider buying fewer clothes and focusing on versatile items.",
    ),
    (
        "Low Savings",
        "Your spending is outpacing your savings this month. Review your largest expense categories for cuts.",
    ),
    (
        "Exceeded Budget",
        "You went past your usual spending in at least one category. Try to bring next month back in line.",
    ),
];

/// Fallback for labels with no dedicated advice ("Maintain Good Habits",
/// "High Savings", "Within Budget", and anything unrecognized)
pub const FALLBACK_ADVICE: &str = "Great job! Keep up the good savings habits.";

/// Advice sentence for a single predicted tag
pub fn advice_for_tag(tag: &str) -> &'static str {
    ADVICE
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, advice)| *advice)
        .unwrap_or(FALLBACK_ADVICE)
}

/// Flatten predicted labels into one advice string per fired tag, in
/// prediction order
pub fn recommendations(labels: &[Label]) -> Vec<String> {
    labels
        .iter()
        .flat_map(|label| label.iter().map(|tag| advice_for_tag(tag).to_string()))
        .collect()
}
