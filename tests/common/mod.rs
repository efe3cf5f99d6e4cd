//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `corpus`: a small operator catalog covering TOPs, CHOPs and a workflow page
//! - `index`: a `DocIndex` with the whole `corpus` added
//! - `state`: the same index behind a `DocState`, for tool handler tests

use opdocs_mcp::config::ServerConfig;
use opdocs_mcp::{DocIndex, DocState, Entry, Parameter};
use rstest::fixture;

/// Operator catalog shared by the integration tests.
///
/// Three TOPs, two CHOPs and one WORKFLOW page. "noise" appears in two
/// operator names and, for the workflow page, only in its description.
#[fixture]
pub fn corpus() -> Vec<Entry> {
    vec![
        Entry::new("noise_top", "Noise TOP", "TOP")
            .with_subcategory("Generators")
            .with_description("Generates 2D noise patterns such as Perlin and Simplex")
            .with_keywords(["perlin", "simplex", "random"])
            .with_tags(["generator", "texture"])
            .with_parameters(vec![
                Parameter::new("seed", "Random seed for the pattern"),
                Parameter::new("period", "Size of one noise cell"),
                Parameter::new("amplitude", "Output contrast"),
            ]),
        Entry::new("blur_top", "Blur TOP", "TOP")
            .with_subcategory("Filters")
            .with_description("Blurs an image with a configurable filter kernel")
            .with_keywords(["gaussian", "soften"])
            .with_tags(["filter", "image"])
            .with_parameters(vec![
                Parameter::new("size", "Blur radius in pixels"),
                Parameter::new("filter", "Kernel shape"),
            ]),
        Entry::new("feedback_top", "Feedback TOP", "TOP")
            .with_subcategory("Utilities")
            .with_description("Feeds the previous frame back into the network for trails")
            .with_keywords(["trails", "loop"])
            .with_tags(["image", "recursion"])
            .with_parameters(vec![
                Parameter::new("target", "TOP to copy each frame"),
                Parameter::new("reset", "Clear the accumulated image"),
            ]),
        Entry::new("noise_chop", "Noise CHOP", "CHOP")
            .with_subcategory("Generators")
            .with_description("Generates irregular noise channels for animation")
            .with_keywords(["random", "jitter"])
            .with_tags(["generator", "animation"])
            .with_parameters(vec![
                Parameter::new("seed", "Random seed"),
                Parameter::new("roughness", "Amount of high frequency detail"),
            ]),
        Entry::new("audio_device_in", "Audio Device In CHOP", "CHOP")
            .with_subcategory("Audio")
            .with_description("Receives audio input from a sound card or microphone")
            .with_keywords(["microphone", "sound"])
            .with_tags(["audio", "input", "hardware"])
            .with_parameters(vec![
                Parameter::new("device", "Input device"),
                Parameter::new("rate", "Sample rate"),
            ]),
        Entry::new("film_look", "Film Look Workflow", "WORKFLOW")
            .with_description("Combines grain noise, vignetting and color grading")
            .with_tags(["image", "workflow"]),
    ]
}

/// An index holding the whole corpus.
#[fixture]
pub fn index(corpus: Vec<Entry>) -> DocIndex {
    let mut index = DocIndex::default();
    for entry in corpus {
        index.add_entry(entry).expect("corpus entries have ids");
    }
    index
}

/// The corpus index behind shared tool state.
#[allow(dead_code)] // Used by tool handler tests only
#[fixture]
pub fn state(index: DocIndex) -> DocState {
    DocState::new(index, ServerConfig::default())
}

/// Ids of the results, in rank order.
#[allow(dead_code)] // Used across different integration test crates
pub fn ids(hits: &[opdocs_mcp::SearchHit]) -> Vec<&str> {
    hits.iter().map(|hit| hit.entry.id.as_str()).collect()
}
