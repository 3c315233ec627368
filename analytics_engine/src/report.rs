//! Result-to-text rendering for the persistence and posting collaborators.

use crate::stats::round4;
use chirp_models::{FrequencyTable, SignificanceResult};

/// Message for an empty post collection. Kept separate from the
/// no-significant-difference wording so the two outcomes can never be
/// confused.
pub fn no_data(subject: &str) -> String {
    format!("No posts found for {}.", subject)
}

/// One human-readable line for a frequency table.
pub fn summarize_table(subject: &str, table: &FrequencyTable) -> String {
    if table.is_empty() {
        return no_data(subject);
    }

    let preview: Vec<String> = table
        .iter()
        .take(10)
        .map(|entry| format!("{} ({})", entry.word, entry.count))
        .collect();
    format!("Top words for {}: {}", subject, preview.join(", "))
}

/// Flat `word,count` rows for the table, one per line.
pub fn render_rows(table: &FrequencyTable) -> String {
    let mut out = String::from("word,count\n");
    for entry in table.iter() {
        out.push_str(&entry.word);
        out.push(',');
        out.push_str(&entry.count.to_string());
        out.push('\n');
    }
    out
}

/// Narrative summary of a two-user engagement comparison.
///
/// Statistics are sign-corrected so the named user's statistic always
/// reads positive, and everything is rounded to 4 decimals before
/// formatting. When both metrics are significant but point at different
/// users, each metric gets its own sentence.
pub fn format_summary(result: &SignificanceResult, user_a: &str, user_b: &str) -> String {
    let favorites = metric_sentence(
        "favorites",
        result.favorites_statistic,
        result.favorites_p_value,
        user_a,
        user_b,
    );
    let reshares = metric_sentence(
        "reshares",
        result.reshares_statistic,
        result.reshares_p_value,
        user_a,
        user_b,
    );

    match (result.favorites_significant, result.reshares_significant) {
        (true, false) => favorites,
        (false, true) => reshares,
        (true, true) => {
            let same_direction = (result.favorites_statistic > 0.0)
                == (result.reshares_statistic > 0.0);
            if same_direction {
                let (winner, loser) = if result.favorites_statistic > 0.0 {
                    (user_a, user_b)
                } else {
                    (user_b, user_a)
                };
                format!(
                    "@{} has statistically more favorites and reshares on their posts than @{}! \
                     (p-value: {} (favorites), {} (reshares); t-statistic: {} (favorites), {} (reshares))",
                    winner,
                    loser,
                    round4(result.favorites_p_value),
                    round4(result.reshares_p_value),
                    round4(result.favorites_statistic.abs()),
                    round4(result.reshares_statistic.abs()),
                )
            } else {
                format!("{} {}", favorites, reshares)
            }
        }
        (false, false) => format!(
            "Neither @{} nor @{} has statistically more favorites or reshares on their posts \
             than the other! (p-value: {} (favorites), {} (reshares); t-statistic: {} (favorites), {} (reshares))",
            user_a,
            user_b,
            round4(result.favorites_p_value),
            round4(result.reshares_p_value),
            round4(result.favorites_statistic),
            round4(result.reshares_statistic),
        ),
    }
}

fn metric_sentence(metric: &str, statistic: f64, p_value: f64, user_a: &str, user_b: &str) -> String {
    let (winner, loser) = if statistic > 0.0 {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    };
    format!(
        "@{} has statistically more {} on their posts than @{}! (p-value: {}, t-statistic: {})",
        winner,
        metric,
        loser,
        round4(p_value),
        round4(statistic.abs()),
    )
}
