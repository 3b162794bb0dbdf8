//! Terminal output for classification results and fetched works.

use std::fmt::Write;

use sdg_core::{Prediction, Work};

const BAR_CELLS: usize = 30;

// ── Public API ──

/// Print ranked predictions as an aligned table with a score bar per goal.
pub fn print_predictions(predictions: &[Prediction]) {
    print!("{}", format_predictions(predictions));
}

/// Print the metadata a fetched work contributes to its classification text.
pub fn print_work_card(doi: &str, work: &Work, text: &str) {
    println!("=== {doi} ===");
    if let Some(title) = work.title() {
        println!("{title}");
    }
    println!();

    println!("Metadata");
    if let Some(id) = &work.id {
        println!("  {:<14} {}", "openalex_id", id);
    }
    if let Some(topic) = work.primary_topic.as_ref().and_then(|t| t.display_name.as_deref()) {
        println!("  {:<14} {}", "primary_topic", topic);
    }
    let keywords: Vec<&str> = work
        .keywords
        .iter()
        .flatten()
        .filter_map(|k| k.display_name.as_deref())
        .collect();
    if !keywords.is_empty() {
        println!("  {:<14} {}", "keywords", keywords.join(", "));
    }
    println!(
        "  {:<14} {}",
        "abstract",
        if work.abstract_inverted_index.is_some() { "yes" } else { "no" }
    );
    println!("  {:<14} {} chars", "text", text.chars().count());
    println!();
}

// ── Formatting ──

fn format_predictions(predictions: &[Prediction]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<5} {:<40} {:>7}", "SDG", "Goal", "Score");
    for p in predictions {
        let _ = writeln!(
            out,
            "  {:<5} {:<40} {:>7.4}  {}",
            p.sdg.code,
            truncate(&p.sdg.name, 40),
            p.prediction,
            bar(p.prediction)
        );
    }
    out
}

fn bar(score: f32) -> String {
    let cells = if score.is_finite() {
        (score.clamp(0.0, 1.0) * BAR_CELLS as f32).round() as usize
    } else {
        0
    };
    "█".repeat(cells)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max - 1).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdg_core::Goal;

    #[test]
    fn table_keeps_input_order() {
        let preds = vec![
            Prediction::new(Goal::from_number(7).unwrap(), 0.91),
            Prediction::new(Goal::from_number(13).unwrap(), 0.4),
        ];
        let out = format_predictions(&preds);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Score"));
        assert!(lines[1].trim_start().starts_with("7 "));
        assert!(lines[1].contains("Affordable and clean energy"));
        assert!(lines[1].contains("0.9100"));
        assert!(lines[2].trim_start().starts_with("13 "));
    }

    #[test]
    fn bar_is_clamped() {
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(0.5).chars().count(), BAR_CELLS / 2);
        assert_eq!(bar(3.0).chars().count(), BAR_CELLS);
        assert_eq!(bar(f32::NAN), "");
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "Industry, innovation and infrastructure and then some more";
        let cut = truncate(name, 40);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("Zero hunger", 40), "Zero hunger");
    }
}
