// Terminal output for evaluation results.
//
// Score lines go to stdout uncolored and unrounded so they can be piped.
// Everything else is decoration: the matrix summary goes to stderr and the
// details table is colored.

use colored::Colorize;

use crate::classify::evaluate::Evaluation;
use crate::features::matrix::FeatureMatrix;

/// `<model>: <accuracy>` with the accuracy at full precision.
pub fn score_line(eval: &Evaluation) -> String {
    format!("{}: {:?}", eval.model, eval.accuracy)
}

/// Print one score line per evaluation.
pub fn display_scores(evaluations: &[Evaluation]) {
    for eval in evaluations {
        println!("{}", score_line(eval));
    }
}

/// Print the confusion metrics behind each accuracy.
pub fn display_details(evaluations: &[Evaluation]) {
    println!("\n{}", "=== Held-out evaluation ===".bold());
    println!(
        "  {:<8} {:>6} {:>6}  {:>6} {:>6} {:>6} {:>6}",
        "Model".dimmed(),
        "Train".dimmed(),
        "Test".dimmed(),
        "Acc".dimmed(),
        "Prec".dimmed(),
        "Rec".dimmed(),
        "F1".dimmed(),
    );
    println!("  {}", "-".repeat(54).dimmed());

    for eval in evaluations {
        let m = &eval.metrics;
        println!(
            "  {:<8} {:>6} {:>6}  {} {:>6.3} {:>6.3} {:>6.3}",
            eval.model,
            eval.train_rows,
            eval.test_rows,
            colorize_accuracy(m.accuracy),
            m.precision,
            m.recall,
            m.f1,
        );
        println!(
            "           {}",
            format!("tp={} fp={} tn={} fn={}", m.tp, m.fp, m.tn, m.fn_count).dimmed()
        );
    }
}

/// Summary of the feature matrix, plus a warning line when some
/// documents had no weighted words.
pub fn matrix_summary(features: &FeatureMatrix) -> String {
    let mut text = format!(
        "  {} documents -> {}-dim features",
        features.num_rows(),
        features.dim
    );
    if !features.empty_rows.is_empty() {
        text.push_str(&format!(
            "\n  {} {} documents had no weighted words (zero features)",
            "Warning:".yellow(),
            features.empty_rows.len()
        ));
    }
    text
}

/// Print the matrix summary to stderr.
pub fn display_matrix_summary(features: &FeatureMatrix) {
    eprintln!("{}", matrix_summary(features));
}

fn colorize_accuracy(accuracy: f64) -> colored::ColoredString {
    let text = format!("{accuracy:>6.3}");
    if accuracy >= 0.8 {
        text.green()
    } else if accuracy >= 0.6 {
        text.yellow()
    } else {
        text.red()
    }
}
