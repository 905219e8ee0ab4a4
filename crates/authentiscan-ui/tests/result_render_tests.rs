//! Integration tests for the result renderer.

use authentiscan_core::{AnalysisVerdict, FactorKey, MediaType};
use authentiscan_ui::{RESET_LABEL, ResultView, default_factor_text, render_result};

#[test]
fn result_render_tests_ai_verdict_uses_detected_layout_with_defaults() {
    let view = render_result(MediaType::Image, &AnalysisVerdict::new(true, 91.0));

    assert!(view.is_ai_detected());
    let panel = view.panel();
    assert_eq!(panel.headline, "It's AI Made Image");
    assert_eq!(panel.confidence_text, "91%");
    assert_eq!(panel.confidence_percent, 91);
    assert_eq!(panel.reset_label, RESET_LABEL);
    assert_eq!(panel.factors.len(), 4);
    for row in &panel.factors {
        assert_eq!(row.text, default_factor_text(row.key, true));
    }
}

#[test]
fn result_render_tests_provider_text_overrides_defaults() {
    let verdict =
        AnalysisVerdict::new(false, 97.2).with_factor(FactorKey::Artifacts, "Clean edges");
    let view = render_result(MediaType::Image, &verdict);

    let ResultView::Authentic(panel) = view else {
        panic!("expected authentic layout");
    };
    let artifacts = panel
        .factors
        .iter()
        .find(|row| row.key == FactorKey::Artifacts)
        .expect("artifacts row should exist");
    assert_eq!(artifacts.text, "Clean edges");
    assert_eq!(panel.confidence_text, "97%");
}

#[test]
fn result_render_tests_confidence_is_clamped() {
    let mut verdict = AnalysisVerdict::new(true, 50.0);
    verdict.confidence_percent = 180.0;
    assert_eq!(render_result(MediaType::Image, &verdict).panel().confidence_percent, 100);

    verdict.confidence_percent = -4.0;
    assert_eq!(render_result(MediaType::Image, &verdict).panel().confidence_text, "0%");
}

#[test]
fn result_render_tests_factor_rows_follow_display_order() {
    let view = render_result(MediaType::Video, &AnalysisVerdict::new(true, 80.0));
    let keys: Vec<FactorKey> = view.panel().factors.iter().map(|row| row.key).collect();
    assert_eq!(keys, FactorKey::ALL.to_vec());
}
