use contract_guard::core::config::GuardConfig;
use contract_guard::core::report::{Finding, RunStatus};
use contract_guard::validators::{EDITOR_HEADER, EDITOR_SOURCE, PluginContext, UI_INDEX, gui};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
  <input id="gain" type="range">
  <script type="module">
    import * as Juce from "./js/juce/index.js";
    const gainState = Juce.getSliderState("gain");
  </script>
</body>
</html>
"#;

const SCRIPT: &str = r#"
const bypassState = Juce.getToggleButtonState("bypass");
"#;

const HEADER_GOOD: &str = r#"#pragma once
#include "PluginProcessor.h"

class GainEditor : public juce::AudioProcessorEditor
{
public:
    explicit GainEditor(GainProcessor&);

private:
    GainProcessor& processorRef;

    std::unique_ptr<juce::WebSliderRelay> gainRelay;
    std::unique_ptr<juce::WebToggleButtonRelay> bypassRelay;

    std::unique_ptr<juce::WebBrowserComponent> webView;

    std::unique_ptr<juce::WebSliderParameterAttachment> gainAttachment;
    std::unique_ptr<juce::WebToggleButtonParameterAttachment> bypassAttachment;
};
"#;

const SOURCE: &str = r#"#include "PluginEditor.h"

GainEditor::GainEditor(GainProcessor& p)
    : AudioProcessorEditor(&p), processorRef(p)
{
    gainRelay = std::make_unique<juce::WebSliderRelay>("gain");
    bypassRelay = std::make_unique<juce::WebToggleButtonRelay>("bypass");

    webView = std::make_unique<juce::WebBrowserComponent>(
        juce::WebBrowserComponent::Options{}
            .withNativeIntegrationEnabled()
            .withOptionsFrom(*gainRelay)
            .withOptionsFrom(*bypassRelay));

    gainAttachment = std::make_unique<juce::WebSliderParameterAttachment>(
        *processorRef.apvts.getParameter("gain"), *gainRelay, nullptr);
    bypassAttachment = std::make_unique<juce::WebToggleButtonParameterAttachment>(
        *processorRef.apvts.getParameter("bypass"), *bypassRelay, nullptr);
}
"#;

fn write_plugin(root: &Path, header: &str, source: &str) {
    fs::create_dir_all(root.join("ui/public/js")).unwrap();
    fs::create_dir_all(root.join("Source")).unwrap();
    fs::write(root.join(UI_INDEX), HTML).unwrap();
    fs::write(root.join("ui/public/js/controls.js"), SCRIPT).unwrap();
    fs::write(root.join(EDITOR_HEADER), header).unwrap();
    fs::write(root.join(EDITOR_SOURCE), source).unwrap();
}

#[test]
fn well_formed_editor_passes() {
    let tmp = tempdir().unwrap();
    write_plugin(tmp.path(), HEADER_GOOD, SOURCE);
    let config = GuardConfig::default();
    let report = gui::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::Passed, "{:?}", report.results);
    assert_eq!(report.passes().count(), 2);
}

#[test]
fn relay_declared_after_view_is_one_ordering_error() {
    let header = HEADER_GOOD.replace(
        "    std::unique_ptr<juce::WebToggleButtonRelay> bypassRelay;\n",
        "",
    );
    let header = header.replace(
        "    std::unique_ptr<juce::WebBrowserComponent> webView;\n",
        "    std::unique_ptr<juce::WebBrowserComponent> webView;\n    std::unique_ptr<juce::WebToggleButtonRelay> bypassRelay;\n",
    );
    let tmp = tempdir().unwrap();
    write_plugin(tmp.path(), &header, SOURCE);

    let config = GuardConfig::default();
    let report = gui::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert_eq!(errors[0].finding, Finding::OrderingViolation);
    assert!(errors[0].message.contains("line 15"));
    assert!(errors[0].message.contains("line 14"));
}

#[test]
fn ui_parameter_without_relay_fails_and_unregistered_relay_warns() {
    let source = SOURCE
        .replace(
            "    bypassRelay = std::make_unique<juce::WebToggleButtonRelay>(\"bypass\");\n",
            "    bypassRelay = std::make_unique<juce::WebToggleButtonRelay>(\"mute\");\n",
        )
        .replace("            .withOptionsFrom(*gainRelay)\n", "");
    let tmp = tempdir().unwrap();
    write_plugin(tmp.path(), HEADER_GOOD, &source);

    let config = GuardConfig::default();
    let report = gui::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("bypass"));
    let warnings: Vec<String> = report.warnings().map(|w| w.message.clone()).collect();
    assert!(warnings.iter().any(|w| w.contains("mute")), "{:?}", warnings);
    assert!(
        warnings.iter().any(|w| w.contains("'gainRelay'") && w.contains("withOptionsFrom")),
        "{:?}",
        warnings
    );
}

#[test]
fn missing_view_skips_only_the_ordering_check() {
    let header = HEADER_GOOD.replace(
        "    std::unique_ptr<juce::WebBrowserComponent> webView;\n",
        "",
    );
    let tmp = tempdir().unwrap();
    write_plugin(tmp.path(), &header, SOURCE);

    let config = GuardConfig::default();
    let report = gui::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::Passed);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].check, "member-order");
}

#[test]
fn page_without_bindings_has_nothing_to_check() {
    let tmp = tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("ui/public")).unwrap();
    fs::write(tmp.path().join(UI_INDEX), "<html><body>static</body></html>").unwrap();
    let config = GuardConfig::default();
    let report = gui::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::NothingToCheck);
}

#[test]
fn attachment_declared_before_view_is_one_ordering_error() {
    let header = HEADER_GOOD.replace(
        "    std::unique_ptr<juce::WebSliderParameterAttachment> gainAttachment;\n",
        "",
    );
    let header = header.replace(
        "    std::unique_ptr<juce::WebBrowserComponent> webView;\n",
        "    std::unique_ptr<juce::WebSliderParameterAttachment> gainAttachment;\n    std::unique_ptr<juce::WebBrowserComponent> webView;\n",
    );
    let tmp = tempdir().unwrap();
    write_plugin(tmp.path(), &header, SOURCE);

    let config = GuardConfig::default();
    let report = gui::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert_eq!(errors[0].finding, Finding::OrderingViolation);
    assert!(errors[0].message.contains("'gainAttachment'"));
    assert!(errors[0].message.contains("line 15"));
    assert!(errors[0].message.contains("line 16"));
}

#[test]
fn absent_editor_sources_are_skipped() {
    let tmp = tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("ui/public")).unwrap();
    fs::write(tmp.path().join(UI_INDEX), HTML).unwrap();
    let config = GuardConfig::default();
    let report = gui::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::NothingToCheck, "{:?}", report.results);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].reason, format!("{EDITOR_SOURCE} not found"));
}
