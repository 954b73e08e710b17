use contract_guard::core::config::GuardConfig;
use contract_guard::core::report::{Finding, RunStatus};
use contract_guard::validators::{PROCESSOR_HEADER, PROCESSOR_SOURCE, PluginContext, dsp};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ARCH: &str = "# Architecture

## Core Components

- Input gain: `juce::dsp::Gain<float>`
- Tone filter: `juce::dsp::IIR::Filter<float>` per channel
- Room: `juce::dsp::Reverb`

Processing runs on `juce::dsp::AudioBlock<float>` views prepared with `juce::dsp::ProcessSpec`.
";

const HEADER: &str = "#pragma once
#include <juce_audio_processors/juce_audio_processors.h>
#include <juce_dsp/juce_dsp.h>

class VerbProcessor : public juce::AudioProcessor
{
private:
    juce::dsp::Gain<float> inputGain;
    juce::dsp::ProcessorDuplicator<juce::dsp::IIR::Filter<float>,
                                   juce::dsp::IIR::Coefficients<float>> toneFilter;
    juce::dsp::Reverb room;
};
";

const SOURCE: &str = "#include \"PluginProcessor.h\"

void VerbProcessor::prepareToPlay(double sampleRate, int samplesPerBlock)
{
    juce::dsp::ProcessSpec spec { sampleRate, (juce::uint32) samplesPerBlock, 2 };
    inputGain.prepare(spec);
    toneFilter.prepare(spec);
    room.prepare(spec);
}
";

fn write_plugin(root: &Path, arch: &str, header: &str, source: &str) {
    fs::create_dir_all(root.join(".ideas")).unwrap();
    fs::create_dir_all(root.join("Source")).unwrap();
    fs::write(root.join(".ideas/architecture.md"), arch).unwrap();
    fs::write(root.join(PROCESSOR_HEADER), header).unwrap();
    fs::write(root.join(PROCESSOR_SOURCE), source).unwrap();
}

#[test]
fn declared_and_prepared_components_pass() {
    let tmp = tempdir().unwrap();
    write_plugin(tmp.path(), ARCH, HEADER, SOURCE);
    let config = GuardConfig::default();
    let report = dsp::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::Passed, "{:?}", report.results);
    assert_eq!(report.passes().count(), 3);
}

#[test]
fn undeclared_component_is_listed() {
    let tmp = tempdir().unwrap();
    let header = HEADER.replace("    juce::dsp::Reverb room;\n", "");
    write_plugin(tmp.path(), ARCH, &header, SOURCE);
    let config = GuardConfig::default();
    let report = dsp::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].finding, Finding::MissingDeclaration);
    assert!(errors[0].message.ends_with("Reverb"), "{}", errors[0].message);
}

#[test]
fn missing_include_fails_and_missing_prepare_warns() {
    let tmp = tempdir().unwrap();
    let header = HEADER.replace("#include <juce_dsp/juce_dsp.h>\n", "");
    let source = SOURCE
        .lines()
        .filter(|l| !l.contains(".prepare("))
        .collect::<Vec<_>>()
        .join("\n");
    write_plugin(tmp.path(), ARCH, &header, &source);
    let config = GuardConfig::default();
    let report = dsp::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.errors().count(), 1);
    assert_eq!(report.warnings().count(), 1);
    assert_eq!(report.status(), RunStatus::Failed);
}

#[test]
fn architecture_without_dsp_types_is_skipped() {
    let tmp = tempdir().unwrap();
    write_plugin(tmp.path(), "# Architecture\n\nA simple gain stage.\n", "", "");
    let config = GuardConfig::default();
    let report = dsp::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::NothingToCheck);
}

#[test]
fn absent_processor_sources_are_skipped() {
    let tmp = tempdir().unwrap();
    fs::create_dir_all(tmp.path().join(".ideas")).unwrap();
    fs::write(tmp.path().join(".ideas/architecture.md"), ARCH).unwrap();
    let config = GuardConfig::default();
    let report = dsp::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::NothingToCheck, "{:?}", report.results);
    let checks: Vec<&str> = report.skipped.iter().map(|s| s.check.as_str()).collect();
    assert_eq!(checks, vec!["dsp-include", "dsp-components", "dsp-prepare"]);
}

#[test]
fn header_without_source_checks_only_the_header() {
    let tmp = tempdir().unwrap();
    fs::create_dir_all(tmp.path().join(".ideas")).unwrap();
    fs::create_dir_all(tmp.path().join("Source")).unwrap();
    fs::write(tmp.path().join(".ideas/architecture.md"), ARCH).unwrap();
    fs::write(tmp.path().join(PROCESSOR_HEADER), HEADER).unwrap();
    let config = GuardConfig::default();
    let report = dsp::validate(&PluginContext::new(tmp.path(), &config)).unwrap();
    assert_eq!(report.status(), RunStatus::Passed, "{:?}", report.results);
    assert_eq!(report.passes().count(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].check, "dsp-prepare");
}
